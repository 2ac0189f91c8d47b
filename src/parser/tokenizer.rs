//! Cue text tokenizer
//!
//! Turns a cue payload into text runs, start/end tags and inline
//! timestamps. Character references are decoded in text and in tag
//! annotations. Running out of input in the middle of a tag drops the
//! partial tag; a pending text run is still returned.

use crate::entities::{consume_character_reference, EntityTable};
use crate::scanner::Scanner;

/// A cue text token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    TagStart {
        name: String,
        classes: Vec<String>,
        annotation: Option<String>,
    },
    TagEnd(String),
    Timestamp(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Data,
    Tag,
    StartTag,
    StartTagClass,
    StartTagAnnotation,
    EndTag,
    Timestamp,
}

/// Characters trimmed off an annotation
const ANNOTATION_WHITESPACE: [char; 5] = [' ', '\t', '\n', '\u{000C}', '\r'];

pub struct CueTextTokenizer<'a> {
    scanner: Scanner,
    references: &'a EntityTable,
}

impl<'a> CueTextTokenizer<'a> {
    pub fn new(text: &str, references: &'a EntityTable) -> Self {
        Self {
            scanner: Scanner::new(text),
            references,
        }
    }

    /// Tokenize the whole payload.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while !self.scanner.is_at_end() {
            if let Some(token) = self.next_token() {
                tokens.push(token);
            }
        }
        tokens
    }

    fn next_token(&mut self) -> Option<Token> {
        let mut state = State::Data;
        let mut result = String::new();
        let mut buffer = String::new();
        let mut classes: Vec<String> = Vec::new();

        while let Some(c) = self.scanner.scan_char() {
            match state {
                State::Data => match c {
                    '&' => {
                        result.push_str(&consume_character_reference(
                            &mut self.scanner,
                            self.references,
                            None,
                        ));
                    }
                    '<' if result.is_empty() => state = State::Tag,
                    '<' => {
                        self.scanner.skip(-1);
                        return Some(Token::Text(result));
                    }
                    _ => result.push(c),
                },
                State::Tag => match c {
                    '\t' | '\n' | '\u{000C}' | ' ' => state = State::StartTagAnnotation,
                    '.' => state = State::StartTagClass,
                    '/' => state = State::EndTag,
                    '0'..='9' => {
                        result.push(c);
                        state = State::Timestamp;
                    }
                    '>' => {
                        return Some(Token::TagStart {
                            name: String::new(),
                            classes,
                            annotation: None,
                        })
                    }
                    _ => {
                        result.push(c);
                        state = State::StartTag;
                    }
                },
                State::StartTag => match c {
                    '\t' | '\u{000C}' | ' ' => state = State::StartTagAnnotation,
                    '\n' => {
                        buffer.push(c);
                        state = State::StartTagAnnotation;
                    }
                    '.' => state = State::StartTagClass,
                    '>' => {
                        return Some(Token::TagStart {
                            name: result,
                            classes,
                            annotation: None,
                        })
                    }
                    _ => result.push(c),
                },
                State::StartTagClass => match c {
                    '\t' | '\u{000C}' | ' ' => {
                        flush_class(&mut classes, &mut buffer);
                        state = State::StartTagAnnotation;
                    }
                    '\n' => {
                        flush_class(&mut classes, &mut buffer);
                        buffer.push(c);
                        state = State::StartTagAnnotation;
                    }
                    '.' => flush_class(&mut classes, &mut buffer),
                    '>' => {
                        flush_class(&mut classes, &mut buffer);
                        return Some(Token::TagStart {
                            name: result,
                            classes,
                            annotation: None,
                        });
                    }
                    _ => buffer.push(c),
                },
                State::StartTagAnnotation => match c {
                    '&' => {
                        buffer.push_str(&consume_character_reference(
                            &mut self.scanner,
                            self.references,
                            Some('>'),
                        ));
                    }
                    '>' => {
                        let annotation = buffer.trim_matches(&ANNOTATION_WHITESPACE[..]);
                        return Some(Token::TagStart {
                            name: result,
                            classes,
                            annotation: Some(annotation.to_string()),
                        });
                    }
                    _ => buffer.push(c),
                },
                State::EndTag => match c {
                    '>' => return Some(Token::TagEnd(result)),
                    _ => result.push(c),
                },
                State::Timestamp => match c {
                    '>' => return Some(Token::Timestamp(result)),
                    _ => result.push(c),
                },
            }
        }

        // End of input: only a pending text run survives.
        if state == State::Data && !result.is_empty() {
            Some(Token::Text(result))
        } else {
            None
        }
    }
}

fn flush_class(classes: &mut Vec<String>, buffer: &mut String) {
    if !buffer.is_empty() {
        classes.push(std::mem::take(buffer));
    }
}
