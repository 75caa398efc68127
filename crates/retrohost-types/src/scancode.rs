use serde::{Deserialize, Serialize};

/// Hardware key identifier (USB HID keyboard usage id).
///
/// The host keyboard-state array is indexed by this value. In configuration
/// files a scancode is written by name (`"Z"`, `"Left"`, `"Return"`) or as a
/// raw number prefixed with `#` (`"#100"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Scancode(pub u16);

impl Scancode {
    /// Size of a full keyboard-state array.
    pub const COUNT: usize = 512;

    pub const A: Self = Self(4);
    pub const C: Self = Self(6);
    pub const X: Self = Self(27);
    pub const Z: Self = Self(29);
    pub const RETURN: Self = Self(40);
    pub const ESCAPE: Self = Self(41);
    pub const BACKSPACE: Self = Self(42);
    pub const TAB: Self = Self(43);
    pub const SPACE: Self = Self(44);
    pub const F1: Self = Self(58);
    pub const RIGHT: Self = Self(79);
    pub const LEFT: Self = Self(80);
    pub const DOWN: Self = Self(81);
    pub const UP: Self = Self(82);
    pub const LCTRL: Self = Self(224);
    pub const LSHIFT: Self = Self(225);
    pub const LALT: Self = Self(226);
    pub const RCTRL: Self = Self(228);
    pub const RSHIFT: Self = Self(229);
    pub const RALT: Self = Self(230);

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Look up a scancode by its configuration name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(raw) = name.strip_prefix('#') {
            return raw.parse().ok().map(Self);
        }
        NAMED
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, code)| Self(code))
    }

    pub fn name(self) -> Option<&'static str> {
        NAMED
            .iter()
            .find(|&&(_, code)| code == self.0)
            .map(|&(n, _)| n)
    }
}

impl std::fmt::Display for Scancode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "#{}", self.0),
        }
    }
}

impl TryFrom<String> for Scancode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value).ok_or_else(|| format!("unknown scancode name: {value}"))
    }
}

impl From<Scancode> for String {
    fn from(code: Scancode) -> Self {
        code.to_string()
    }
}

const NAMED: &[(&str, u16)] = &[
    ("A", 4),
    ("B", 5),
    ("C", 6),
    ("D", 7),
    ("E", 8),
    ("F", 9),
    ("G", 10),
    ("H", 11),
    ("I", 12),
    ("J", 13),
    ("K", 14),
    ("L", 15),
    ("M", 16),
    ("N", 17),
    ("O", 18),
    ("P", 19),
    ("Q", 20),
    ("R", 21),
    ("S", 22),
    ("T", 23),
    ("U", 24),
    ("V", 25),
    ("W", 26),
    ("X", 27),
    ("Y", 28),
    ("Z", 29),
    ("Key1", 30),
    ("Key2", 31),
    ("Key3", 32),
    ("Key4", 33),
    ("Key5", 34),
    ("Key6", 35),
    ("Key7", 36),
    ("Key8", 37),
    ("Key9", 38),
    ("Key0", 39),
    ("Return", 40),
    ("Escape", 41),
    ("Backspace", 42),
    ("Tab", 43),
    ("Space", 44),
    ("F1", 58),
    ("F2", 59),
    ("F3", 60),
    ("F4", 61),
    ("F5", 62),
    ("F6", 63),
    ("F7", 64),
    ("F8", 65),
    ("F9", 66),
    ("F10", 67),
    ("F11", 68),
    ("F12", 69),
    ("Right", 79),
    ("Left", 80),
    ("Down", 81),
    ("Up", 82),
    ("LeftCtrl", 224),
    ("LeftShift", 225),
    ("LeftAlt", 226),
    ("RightCtrl", 228),
    ("RightShift", 229),
    ("RightAlt", 230),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(Scancode::from_name("z"), Some(Scancode::Z));
        assert_eq!(Scancode::from_name("RETURN"), Some(Scancode::RETURN));
        assert_eq!(Scancode::from_name("left"), Some(Scancode::LEFT));
        assert_eq!(Scancode::from_name("nope"), None);
    }

    #[test]
    fn raw_numeric_names() {
        assert_eq!(Scancode::from_name("#100"), Some(Scancode(100)));
        assert_eq!(Scancode::from_name("#x"), None);
        assert_eq!(Scancode(100).to_string(), "#100");
    }

    #[test]
    fn named_constants_agree_with_table() {
        assert_eq!(Scancode::UP.name(), Some("Up"));
        assert_eq!(Scancode::ESCAPE.name(), Some("Escape"));
        assert_eq!(Scancode::RSHIFT.name(), Some("RightShift"));
        assert!(NAMED.iter().all(|&(_, code)| (code as usize) < Scancode::COUNT));
    }

    #[test]
    fn serde_uses_names() {
        let json = serde_json::to_string(&Scancode::SPACE).unwrap();
        assert_eq!(json, "\"Space\"");
        let code: Scancode = serde_json::from_str("\"F1\"").unwrap();
        assert_eq!(code, Scancode::F1);
        assert!(serde_json::from_str::<Scancode>("\"Hyper\"").is_err());
    }
}
