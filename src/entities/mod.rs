//! HTML character references
//!
//! This module handles the `&...;` escapes WebVTT allows in cue text:
//! - The immutable reference table (named + numeric substitutions)
//! - Consuming a single reference from a scanner
//! - Decoding every reference in a plain string

mod data;
pub mod decoder;
pub mod table;

pub use decoder::{consume_character_reference, decode_html_entities};
pub use table::EntityTable;
