use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use retrohost_types::{KeyId, Scancode};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// Fixed-capacity table from logical key to hardware scancode.
///
/// Always holds exactly one entry per [`KeyId`], in slot order. Built through
/// [`KeyBindings::new`], which rejects duplicate keys and scancodes bound to
/// more than one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    slots: [Option<Scancode>; KeyId::COUNT],
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut slots = [None; KeyId::COUNT];
        slots[KeyId::Up.index()] = Some(Scancode::UP);
        slots[KeyId::Down.index()] = Some(Scancode::DOWN);
        slots[KeyId::Left.index()] = Some(Scancode::LEFT);
        slots[KeyId::Right.index()] = Some(Scancode::RIGHT);
        slots[KeyId::Shoot.index()] = Some(Scancode::Z);
        slots[KeyId::Cancel.index()] = Some(Scancode::X);
        slots[KeyId::Pause.index()] = Some(Scancode::RETURN);
        Self { slots }
    }
}

impl KeyBindings {
    /// Build a table from explicit entries. Keys not mentioned stay unbound.
    pub fn new(entries: &[(KeyId, Option<Scancode>)]) -> Result<Self> {
        let mut slots = [None; KeyId::COUNT];
        let mut seen = [false; KeyId::COUNT];

        for &(key, code) in entries {
            if seen[key.index()] {
                bail!("key {key} is listed more than once");
            }
            seen[key.index()] = true;

            if let Some(code) = code
                && let Some(other) = KeyId::ALL
                    .iter()
                    .find(|other| slots[other.index()] == Some(code))
            {
                bail!("scancode {code} is bound to both {other} and {key}");
            }
            slots[key.index()] = code;
        }

        Ok(Self { slots })
    }

    /// A table with every key unbound.
    pub fn unbound() -> Self {
        Self {
            slots: [None; KeyId::COUNT],
        }
    }

    /// Load bindings from a JSON file. A missing file yields the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read key bindings {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("invalid key bindings in {}", path.display()))
    }

    /// Parse bindings from JSON like `{"Shoot": "Z", "Pause": null}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn binding(&self, key: KeyId) -> Option<Scancode> {
        self.slots[key.index()]
    }

    /// Entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (KeyId, Option<Scancode>)> + '_ {
        KeyId::ALL.iter().map(|&key| (key, self.slots[key.index()]))
    }

    /// The logical key bound to a scancode, if any.
    pub fn key_for(&self, code: Scancode) -> Option<KeyId> {
        self.iter()
            .find(|&(_, bound)| bound == Some(code))
            .map(|(key, _)| key)
    }
}

// Entries are collected in document order so repeated keys reach
// `KeyBindings::new` instead of overwriting each other.
impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BindingsVisitor;

        impl<'de> Visitor<'de> for BindingsVisitor {
            type Value = KeyBindings;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from key name to scancode name or null")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<KeyBindings, A::Error> {
                let mut entries = Vec::with_capacity(KeyId::COUNT);
                while let Some(entry) = map.next_entry::<KeyId, Option<Scancode>>()? {
                    entries.push(entry);
                }
                KeyBindings::new(&entries).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_map(BindingsVisitor)
    }
}
