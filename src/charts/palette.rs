//! Chart colour palette.

pub const PRIMARY: &str = "#2980b9";
pub const SECONDARY: &str = "#e74c3c";
pub const SUCCESS: &str = "#27ae60";
pub const WARNING: &str = "#f39c12";
pub const INFO: &str = "#3498db";
pub const DARK: &str = "#34495e";
pub const LIGHT: &str = "#ecf0f1";

/// Converts `#rrggbb` to a CSS `rgba(r, g, b, alpha)` string.
///
/// Returns `None` unless `hex` is exactly `#` followed by six hex digits.
///
/// # Examples
///
/// ```
/// use shadow_price::charts::palette::hex_to_rgba;
///
/// assert_eq!(hex_to_rgba("#2980b9", 0.1).as_deref(), Some("rgba(41, 128, 185, 0.1)"));
/// assert_eq!(hex_to_rgba("blue", 1.0), None);
/// ```
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Option<String> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
    Some(format!("rgba({r}, {g}, {b}, {alpha})"))
}
