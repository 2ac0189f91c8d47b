//! Character reference decoding
//!
//! A failed reference is never an error: the scanner is put back where it
//! was and the caller gets a literal `&`, so the rest of the text is
//! processed normally.

use super::table::EntityTable;
use crate::scanner::Scanner;

/// Characters after `&` that mean "this is not a reference"
const NOT_A_REFERENCE: [char; 6] = ['\t', '\n', '\u{000C}', ' ', '<', '&'];

/// Consume a character reference. The scanner must be positioned right
/// after the `&`.
///
/// `disallowed` is an extra character that cannot start a reference here
/// (`>` inside a tag annotation).
pub fn consume_character_reference(
    scanner: &mut Scanner,
    references: &EntityTable,
    disallowed: Option<char>,
) -> String {
    let start = scanner.position();
    match resolve_reference(scanner, references, disallowed) {
        Some(text) => text,
        None => {
            scanner.set_position(start);
            "&".to_string()
        }
    }
}

fn resolve_reference(
    scanner: &mut Scanner,
    references: &EntityTable,
    disallowed: Option<char>,
) -> Option<String> {
    let c = scanner.peek_char()?;
    if Some(c) == disallowed || NOT_A_REFERENCE.contains(&c) {
        return None;
    }

    if c == '#' {
        scanner.skip(1);
        let hexadecimal = matches!(scanner.peek_char(), Some('x' | 'X'));
        if hexadecimal {
            scanner.skip(1);
        }
        let value = scanner.scan_int(hexadecimal)?;
        if scanner.scan_char()? != ';' {
            return None;
        }
        return Some(references.numeric(value));
    }

    let name = scanner.scan_up_to(&';', 0)?;
    let text = references.named(&name)?;
    if scanner.scan_char()? != ';' {
        return None;
    }
    Some(text.to_string())
}

impl EntityTable {
    /// Decode every character reference in `text`.
    pub fn decode(&self, text: &str) -> String {
        let mut scanner = Scanner::new(text);
        let mut result = String::with_capacity(text.len());

        while !scanner.is_at_end() {
            if let Some(data) = scanner.scan_up_to(&'&', 0) {
                result.push_str(&data);
            }
            if scanner.scan_char() == Some('&') {
                result.push_str(&consume_character_reference(&mut scanner, self, None));
            }
        }
        result
    }
}

/// Decode every character reference in `text` using the standard table.
pub fn decode_html_entities(text: &str) -> String {
    EntityTable::standard().decode(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_named_reference() {
        assert_eq!(decode_html_entities("&amp;"), "&");
        assert_eq!(decode_html_entities("fish &amp; chips"), "fish & chips");
        assert_eq!(decode_html_entities("&lt;b&gt;"), "<b>");
    }

    #[test]
    fn test_numeric_reference() {
        assert_eq!(decode_html_entities("&#65;"), "A");
        assert_eq!(decode_html_entities("&#x41;"), "A");
        assert_eq!(decode_html_entities("&#X41;"), "A");
        assert_eq!(decode_html_entities("&#xD800;"), "\u{FFFD}");
        assert_eq!(decode_html_entities("&#0;"), "\u{FFFD}");
        assert_eq!(decode_html_entities("&#x110000;"), "\u{FFFD}");
        assert_eq!(decode_html_entities("&#150;"), "\u{2013}");
    }

    #[test]
    fn test_unknown_or_unterminated_kept_literal() {
        assert_eq!(decode_html_entities("&unknownname;"), "&unknownname;");
        assert_eq!(decode_html_entities("&amp"), "&amp");
        assert_eq!(decode_html_entities("&#65"), "&#65");
        assert_eq!(decode_html_entities("&#;"), "&#;");
        assert_eq!(decode_html_entities("&#x;"), "&#x;");
        assert_eq!(decode_html_entities("&;"), "&;");
    }

    #[test]
    fn test_not_a_reference() {
        assert_eq!(decode_html_entities("a & b"), "a & b");
        assert_eq!(decode_html_entities("&&amp;"), "&&");
        assert_eq!(decode_html_entities("&<"), "&<");
        assert_eq!(decode_html_entities("trailing &"), "trailing &");
    }

    #[test]
    fn test_disallowed_character() {
        let table = EntityTable::standard();
        let mut scanner = Scanner::new(">rest");
        assert_eq!(consume_character_reference(&mut scanner, table, Some('>')), "&");
        assert_eq!(scanner.position(), 0);

        let mut scanner = Scanner::new("gt;rest");
        assert_eq!(consume_character_reference(&mut scanner, table, Some('>')), ">");
        assert_eq!(scanner.peek(4).as_deref(), Some("rest"));
    }

    #[test]
    fn test_failed_reference_restores_position() {
        let table = EntityTable::standard();
        let mut scanner = Scanner::new("#12x");
        assert_eq!(consume_character_reference(&mut scanner, table, None), "&");
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_custom_table() {
        let mut named = HashMap::new();
        named.insert("smile".to_string(), "\u{263A}".to_string());
        let table = EntityTable::new(named, HashMap::new());

        assert_eq!(table.decode("&smile; &amp;"), "\u{263A} &amp;");
        assert_eq!(table.decode("&#0;"), "\u{0000}");
    }
}
