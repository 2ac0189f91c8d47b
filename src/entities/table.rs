//! Character reference lookup table

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

use super::data;
use crate::error::{Result, VttError};

/// Replacement for surrogates, out-of-range values and unknown code points
pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// Immutable lookup of named references and numeric substitutions
///
/// The standard table is built once and shared; tests and callers with
/// their own data construct one explicitly and hand it to the parser.
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    named: HashMap<String, String>,
    substitutes: HashMap<u32, String>,
}

/// One entry of the packaged JSON data, e.g. `{"index": "amp", "codepoints": [38]}`
#[derive(Debug, Deserialize)]
struct ReferenceEntry<K> {
    index: K,
    codepoints: Vec<u32>,
}

impl<K> ReferenceEntry<K> {
    fn text(&self) -> String {
        self.codepoints
            .iter()
            .filter_map(|&c| char::from_u32(c))
            .collect()
    }
}

static STANDARD: OnceLock<EntityTable> = OnceLock::new();

impl EntityTable {
    pub fn new(named: HashMap<String, String>, substitutes: HashMap<u32, String>) -> Self {
        Self { named, substitutes }
    }

    /// The built-in HTML5 table.
    pub fn standard() -> &'static EntityTable {
        STANDARD.get_or_init(|| {
            let named = data::NAMED
                .iter()
                .map(|&(name, text)| (name.to_string(), text.to_string()))
                .collect();
            let substitutes = data::SUBSTITUTES
                .iter()
                .map(|&(index, c)| (index, c.to_string()))
                .collect();
            EntityTable::new(named, substitutes)
        })
    }

    /// Load a table from the JSON arrays the reference data is published as.
    pub fn from_json(named_json: &str, substitutes_json: &str) -> Result<Self> {
        let named: Vec<ReferenceEntry<String>> = serde_json::from_str(named_json)
            .map_err(|e| VttError::EntityTable(format!("named references: {}", e)))?;
        let substitutes: Vec<ReferenceEntry<u32>> = serde_json::from_str(substitutes_json)
            .map_err(|e| VttError::EntityTable(format!("substitutes: {}", e)))?;

        Ok(Self {
            named: named
                .iter()
                .map(|entry| (entry.index.clone(), entry.text()))
                .collect(),
            substitutes: substitutes
                .iter()
                .map(|entry| (entry.index, entry.text()))
                .collect(),
        })
    }

    /// Replacement text for `&name;`, if the name is known.
    pub fn named(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }

    /// Replacement text for `&#value;`. Always resolves to something.
    pub fn numeric(&self, value: u64) -> String {
        if let Some(text) = u32::try_from(value)
            .ok()
            .and_then(|v| self.substitutes.get(&v))
        {
            return text.clone();
        }
        if (0xD800..=0xDFFF).contains(&value) || value > 0x10FFFF {
            return REPLACEMENT_CHARACTER.to_string();
        }
        u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(REPLACEMENT_CHARACTER)
            .to_string()
    }

    pub fn len(&self) -> usize {
        self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_named() {
        let table = EntityTable::standard();
        assert_eq!(table.named("amp"), Some("&"));
        assert_eq!(table.named("nbsp"), Some("\u{00A0}"));
        assert_eq!(table.named("lrm"), Some("\u{200E}"));
        assert_eq!(table.named("AMP;"), None);
        assert_eq!(table.named("unknownname"), None);
    }

    #[test]
    fn test_numeric_substitutions() {
        let table = EntityTable::standard();
        assert_eq!(table.numeric(0), "\u{FFFD}");
        assert_eq!(table.numeric(0x80), "\u{20AC}");
        assert_eq!(table.numeric(0x97), "\u{2014}");
    }

    #[test]
    fn test_numeric_invalid_ranges() {
        let table = EntityTable::standard();
        assert_eq!(table.numeric(0xD800), "\u{FFFD}");
        assert_eq!(table.numeric(0xDFFF), "\u{FFFD}");
        assert_eq!(table.numeric(0x110000), "\u{FFFD}");
        assert_eq!(table.numeric(u64::MAX), "\u{FFFD}");
        assert_eq!(table.numeric(0x41), "A");
        assert_eq!(table.numeric(0x1F600), "\u{1F600}");
    }

    #[test]
    fn test_from_json() {
        let table = EntityTable::from_json(
            r#"[{"index": "amp", "codepoints": [38]}, {"index": "NotEqualTilde", "codepoints": [8770, 824]}]"#,
            r#"[{"index": 0, "codepoints": [65533]}]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.named("amp"), Some("&"));
        assert_eq!(table.named("NotEqualTilde"), Some("\u{2242}\u{0338}"));
        assert_eq!(table.numeric(0), "\u{FFFD}");
        assert_eq!(table.numeric(0x80), "\u{0080}");
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let result = EntityTable::from_json("{not json", "[]");
        assert!(matches!(result, Err(VttError::EntityTable(_))));
    }
}
