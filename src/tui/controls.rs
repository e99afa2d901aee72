//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;
use crate::config::CalculatorConfig;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.select_next(),
        KeyCode::Right | KeyCode::Char('l' | '+' | '=') => app.nudge(1),
        KeyCode::Left | KeyCode::Char('h' | '-') => app.nudge(-1),
        KeyCode::PageUp => app.nudge(5),
        KeyCode::PageDown => app.nudge(-5),
        KeyCode::Char(c @ '1'..='9') => {
            let idx = c as usize - '1' as usize;
            if let Some(name) = CalculatorConfig::PRESETS.get(idx) {
                app.switch_preset(name);
            }
        }
        KeyCode::Char('r') => app.reset(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SliderKey;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn default_app() -> App {
        App::new(CalculatorConfig::default(), "default").expect("default config is valid")
    }

    #[test]
    fn arrows_select_and_nudge() {
        let mut app = default_app();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.calculator().values().demand, 205.0);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_key(), SliderKey::Transmission);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.calculator().values().transmission_capacity, 110.0);
    }

    #[test]
    fn number_keys_switch_presets() {
        let mut app = default_app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.preset_name, "heatwave");
        assert_eq!(app.calculator().values().weather_level, 5);

        // no sixth preset
        press(&mut app, KeyCode::Char('6'));
        assert_eq!(app.preset_name, "heatwave");
    }

    #[test]
    fn quit_keys() {
        let mut app = default_app();
        press(&mut app, KeyCode::Esc);
        assert!(app.quit);

        let mut app = default_app();
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.quit);
    }
}
