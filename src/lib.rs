//! WebVTT subtitle parsing
//!
//! Reads WebVTT files into a list of cues, each with a markup tree:
//! - Block parsing with a forgiving cue timing grammar
//! - Cue text tokenizing with HTML character reference decoding
//! - Markup tree building (class, italic, bold, underline, ruby, voice, lang)
//! - Duplicate line removal for rolling auto-generated captions
//! - Flattening cue trees into styled text runs

pub mod config;
pub mod config_file;
pub mod cue;
pub mod dedup;
pub mod entities;
pub mod error;
pub mod parser;
pub mod render;
pub mod scanner;

#[cfg(test)]
pub(crate) mod tests;

pub use cue::{Cue, Node, NodeKind, Timing, WebVtt};
pub use dedup::deduplicate;
pub use entities::{decode_html_entities, EntityTable};
pub use error::{Result, VttError};
pub use parser::{parse_file, WebVttParser};
pub use render::{render, BaseStyle, StyledRun};
