//! Form keys: plugin-qualified record addresses

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BindError;

/// Opaque record address: owning plugin file name + local form ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormKey {
    pub plugin: String,
    pub id: u32,
}

impl FormKey {
    pub fn new(plugin: impl Into<String>, id: u32) -> Self {
        Self {
            plugin: plugin.into(),
            id,
        }
    }

    /// Parse a form link in the format `Plugin.esp|0xFormID` (hex) or
    /// `Plugin.esp|FormID` (decimal).
    pub fn parse(link: &str) -> Result<Self, BindError> {
        let mut parts = link.splitn(2, '|');
        let plugin = parts.next().unwrap_or("").trim();
        let id_str = match parts.next() {
            Some(s) => s.trim(),
            None => return Err(BindError::FormLink(link.to_string())),
        };
        if plugin.is_empty() || id_str.is_empty() {
            return Err(BindError::FormLink(link.to_string()));
        }

        let id = if let Some(hex) = id_str.strip_prefix("0x").or_else(|| id_str.strip_prefix("0X")) {
            u32::from_str_radix(hex, 16)
        } else {
            id_str.parse::<u32>()
        }
        .map_err(|_| BindError::FormLink(link.to_string()))?;

        Ok(Self::new(plugin, id))
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|0x{:06X}", self.plugin, self.id)
    }
}

impl FromStr for FormKey {
    type Err = BindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormKey::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_form_link() {
        let key = FormKey::parse("MyMod.esp|0x800").unwrap();
        assert_eq!(key.plugin, "MyMod.esp");
        assert_eq!(key.id, 0x800);
    }

    #[test]
    fn test_parse_decimal_form_link() {
        let key = FormKey::parse("Skyrim.esm|2048").unwrap();
        assert_eq!(key.id, 2048);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let key = FormKey::parse(" MyMod.esp | 0x12AB ").unwrap();
        assert_eq!(key.plugin, "MyMod.esp");
        assert_eq!(key.id, 0x12AB);
    }

    #[test]
    fn test_parse_rejects_malformed_links() {
        assert!(FormKey::parse("no-separator").is_err());
        assert!(FormKey::parse("MyMod.esp|").is_err());
        assert!(FormKey::parse("|0x800").is_err());
        assert!(FormKey::parse("MyMod.esp|0xZZZ").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let key = FormKey::new("Dawnguard.esm", 0x12AB);
        let shown = key.to_string();
        assert_eq!(shown, "Dawnguard.esm|0x0012AB");
        assert_eq!(FormKey::parse(&shown).unwrap(), key);
    }
}
