use retrohost_types::Scancode;
use winit::keyboard::KeyCode;

/// Translate a winit physical key into its USB HID usage id.
pub fn scancode_for(code: KeyCode) -> Option<Scancode> {
    let usage = match code {
        KeyCode::KeyA => 4,
        KeyCode::KeyB => 5,
        KeyCode::KeyC => 6,
        KeyCode::KeyD => 7,
        KeyCode::KeyE => 8,
        KeyCode::KeyF => 9,
        KeyCode::KeyG => 10,
        KeyCode::KeyH => 11,
        KeyCode::KeyI => 12,
        KeyCode::KeyJ => 13,
        KeyCode::KeyK => 14,
        KeyCode::KeyL => 15,
        KeyCode::KeyM => 16,
        KeyCode::KeyN => 17,
        KeyCode::KeyO => 18,
        KeyCode::KeyP => 19,
        KeyCode::KeyQ => 20,
        KeyCode::KeyR => 21,
        KeyCode::KeyS => 22,
        KeyCode::KeyT => 23,
        KeyCode::KeyU => 24,
        KeyCode::KeyV => 25,
        KeyCode::KeyW => 26,
        KeyCode::KeyX => 27,
        KeyCode::KeyY => 28,
        KeyCode::KeyZ => 29,
        KeyCode::Digit1 => 30,
        KeyCode::Digit2 => 31,
        KeyCode::Digit3 => 32,
        KeyCode::Digit4 => 33,
        KeyCode::Digit5 => 34,
        KeyCode::Digit6 => 35,
        KeyCode::Digit7 => 36,
        KeyCode::Digit8 => 37,
        KeyCode::Digit9 => 38,
        KeyCode::Digit0 => 39,
        KeyCode::Enter => 40,
        KeyCode::Escape => 41,
        KeyCode::Backspace => 42,
        KeyCode::Tab => 43,
        KeyCode::Space => 44,
        KeyCode::Minus => 45,
        KeyCode::Equal => 46,
        KeyCode::BracketLeft => 47,
        KeyCode::BracketRight => 48,
        KeyCode::Backslash => 49,
        KeyCode::Semicolon => 51,
        KeyCode::Quote => 52,
        KeyCode::Backquote => 53,
        KeyCode::Comma => 54,
        KeyCode::Period => 55,
        KeyCode::Slash => 56,
        KeyCode::CapsLock => 57,
        KeyCode::F1 => 58,
        KeyCode::F2 => 59,
        KeyCode::F3 => 60,
        KeyCode::F4 => 61,
        KeyCode::F5 => 62,
        KeyCode::F6 => 63,
        KeyCode::F7 => 64,
        KeyCode::F8 => 65,
        KeyCode::F9 => 66,
        KeyCode::F10 => 67,
        KeyCode::F11 => 68,
        KeyCode::F12 => 69,
        KeyCode::Insert => 73,
        KeyCode::Home => 74,
        KeyCode::PageUp => 75,
        KeyCode::Delete => 76,
        KeyCode::End => 77,
        KeyCode::PageDown => 78,
        KeyCode::ArrowRight => 79,
        KeyCode::ArrowLeft => 80,
        KeyCode::ArrowDown => 81,
        KeyCode::ArrowUp => 82,
        KeyCode::ControlLeft => 224,
        KeyCode::ShiftLeft => 225,
        KeyCode::AltLeft => 226,
        KeyCode::SuperLeft => 227,
        KeyCode::ControlRight => 228,
        KeyCode::ShiftRight => 229,
        KeyCode::AltRight => 230,
        KeyCode::SuperRight => 231,
        _ => return None,
    };
    Some(Scancode(usage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys_match_scancode_names() {
        assert_eq!(scancode_for(KeyCode::KeyZ), Some(Scancode::Z));
        assert_eq!(scancode_for(KeyCode::KeyX), Some(Scancode::X));
        assert_eq!(scancode_for(KeyCode::Enter), Some(Scancode::RETURN));
        assert_eq!(scancode_for(KeyCode::Escape), Some(Scancode::ESCAPE));
        assert_eq!(scancode_for(KeyCode::ArrowUp), Some(Scancode::UP));
        assert_eq!(scancode_for(KeyCode::ArrowLeft), Some(Scancode::LEFT));
        assert_eq!(scancode_for(KeyCode::ShiftRight), Some(Scancode::RSHIFT));
        assert_eq!(scancode_for(KeyCode::F1), Some(Scancode::F1));
        assert_eq!(scancode_for(KeyCode::Digit1), Scancode::from_name("Key1"));
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(scancode_for(KeyCode::MediaPlayPause), None);
        assert_eq!(scancode_for(KeyCode::NumpadEnter), None);
    }

    #[test]
    fn test_all_codes_fit_keyboard_state() {
        for code in [KeyCode::SuperRight, KeyCode::KeyA, KeyCode::PageDown] {
            let sc = scancode_for(code).unwrap();
            assert!(sc.index() < Scancode::COUNT);
        }
    }
}
