//! WebVTT file parser
//!
//! Walks the file block by block:
//! - Signature line (`WEBVTT`), the only fatal check
//! - Optional header block
//! - Body blocks: cues, `STYLE` and `REGION` blocks, anything else ignored
//!
//! Cue payloads go through the tokenizer and tree builder. Malformed input
//! anywhere in the body is absorbed, never reported.

pub mod timing;
pub mod tokenizer;
pub mod tree;

use std::path::Path;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::cue::{Cue, Timing, WebVtt};
use crate::entities::EntityTable;
use crate::error::{Result, VttError};
use crate::scanner::Scanner;

use self::timing::parse_timing_line;
use self::tokenizer::CueTextTokenizer;
use self::tree::CueTreeBuilder;

pub(crate) const SPACE_DELIMITERS: [char; 3] = [' ', '\t', '\n'];
const NEWLINE: char = '\n';
const ARROW: &str = "-->";

/// What a block turned out to be
#[derive(Debug, Clone, PartialEq)]
enum Block {
    Unknown(String),
    Stylesheet(String),
    Region(String),
    Cue {
        id: Option<String>,
        timing: Timing,
        payload: String,
    },
    /// A cue block whose timing line did not parse
    BrokenCue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockType {
    Stylesheet,
    Region,
    Cue,
}

/// Single-use WebVTT parser over one input text
pub struct WebVttParser<'a> {
    scanner: Scanner,
    references: &'a EntityTable,
    seen_cue: bool,
}

impl WebVttParser<'static> {
    /// Create a parser using the standard character reference table.
    pub fn new(text: &str) -> Self {
        Self::with_references(text, EntityTable::standard())
    }
}

impl<'a> WebVttParser<'a> {
    pub fn with_references(text: &str, references: &'a EntityTable) -> Self {
        Self {
            scanner: Scanner::new(&normalize(text)),
            references,
            seen_cue: false,
        }
    }

    /// Parse the whole document.
    pub fn parse(mut self) -> Result<WebVtt> {
        let signature = self.scanner.scan_up_to(&SPACE_DELIMITERS, 0);
        if signature.as_deref() != Some("WEBVTT") {
            return Err(VttError::InvalidSignature);
        }
        // Rest of the signature line, and its newline.
        self.scanner.scan_up_to(&NEWLINE, 0);
        self.scanner.skip(1);

        let mut document = WebVtt::default();
        if self.scanner.is_at_end() {
            return Ok(document);
        }

        if self.scanner.peek_char() != Some(NEWLINE) {
            if let Block::Unknown(header) = self.parse_block(true) {
                if !header.is_empty() {
                    document.header = Some(header);
                }
            }
        } else {
            self.scanner.skip(1);
        }
        self.skip_blank_lines();

        let mut dropped = 0usize;
        while !self.scanner.is_at_end() {
            match self.parse_block(false) {
                Block::Cue {
                    id,
                    timing,
                    payload,
                } => {
                    let cue = self.build_cue(id, timing, &payload);
                    document.cues.push(cue);
                }
                Block::Stylesheet(text) => document.stylesheets.push(text),
                Block::Region(text) => document.regions.push(text),
                Block::BrokenCue => dropped += 1,
                Block::Unknown(text) => trace!("skipping unknown block {:?}", text),
            }
            self.skip_blank_lines();
        }

        debug!(
            "parsed {} cues ({} dropped with bad timings)",
            document.cues.len(),
            dropped
        );
        Ok(document)
    }

    fn skip_blank_lines(&mut self) {
        self.scanner.scan_while(&NEWLINE, 0);
    }

    fn build_cue(&self, id: Option<String>, timing: Timing, payload: &str) -> Cue {
        let tokens = CueTextTokenizer::new(payload, self.references).tokenize();
        let content = CueTreeBuilder::new().build(tokens);
        Cue {
            id,
            timing,
            content,
        }
    }

    /// Read one block: lines up to a blank line or the end of input.
    fn parse_block(&mut self, in_header: bool) -> Block {
        let mut line_count = 0;
        let mut prev_position = self.scanner.position();
        let mut buffer = String::new();
        let mut id = None;
        let mut seen_eof = false;
        let mut seen_arrow = false;
        let mut cue_timing = None;
        let mut block_type = None;

        while !seen_eof {
            let line = self.scanner.scan_up_to(&NEWLINE, 1);
            line_count += 1;
            seen_eof = self.scanner.is_at_end();

            let Some(line) = line else {
                break;
            };

            if line.contains(ARROW) && block_type != Some(BlockType::Cue) {
                if !in_header && (line_count == 1 || (line_count == 2 && !seen_arrow)) {
                    seen_arrow = true;
                    prev_position = self.scanner.position();
                    cue_timing = parse_timing_line(&line);
                    block_type = Some(BlockType::Cue);
                    if line_count == 2 {
                        id = Some(std::mem::take(&mut buffer));
                    }
                    self.seen_cue = true;
                } else {
                    // The arrow line starts the next block.
                    self.scanner.set_position(prev_position);
                    break;
                }
            } else {
                if !in_header && line_count == 2 && !self.seen_cue {
                    if buffer.starts_with("STYLE") {
                        block_type = Some(BlockType::Stylesheet);
                        buffer.clear();
                    } else if buffer.starts_with("REGION") {
                        block_type = Some(BlockType::Region);
                        buffer.clear();
                    }
                }
                if !buffer.is_empty() {
                    buffer.push(NEWLINE);
                }
                buffer.push_str(&line);
                prev_position = self.scanner.position();
            }
        }

        match block_type {
            None => Block::Unknown(buffer),
            Some(BlockType::Stylesheet) => Block::Stylesheet(buffer),
            Some(BlockType::Region) => Block::Region(buffer),
            Some(BlockType::Cue) => match cue_timing {
                Some(timing) => Block::Cue {
                    id,
                    timing,
                    payload: buffer,
                },
                None => {
                    debug!("dropping cue with unparsable timing");
                    Block::BrokenCue
                }
            },
        }
    }
}

/// Normalize line endings, NULs and a leading byte order mark.
fn normalize(text: &str) -> String {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    text.replace('\u{0000}', "\u{FFFD}")
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

impl WebVtt {
    /// Parse a WebVTT document with the standard reference table.
    pub fn parse(text: &str) -> Result<WebVtt> {
        WebVttParser::new(text).parse()
    }
}

impl FromStr for WebVtt {
    type Err = VttError;

    fn from_str(s: &str) -> Result<Self> {
        WebVtt::parse(s)
    }
}

/// Read and parse a WebVTT file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<WebVtt> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    debug!("parsing {}", path.display());
    WebVtt::parse(&content)
}
