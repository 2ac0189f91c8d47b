//! Duplicate line removal for rolling (ASR) captions
//!
//! Auto-generated captions often show a window of lines that scrolls up by
//! one line per cue, so every line appears twice. This pass drops:
//! - Lines that are empty or whitespace only
//! - Lines repeated from the previous cue, when the two cues are back to
//!   back and the line sits at the same index or one index lower
//! - Cues left with no text at all
//!
//! Cues that are not back to back are never compared, so repeated dialogue
//! in ordinary captions survives.

use tracing::debug;

use crate::cue::{Cue, Node, NodeKind, WebVtt};

/// Line separator characters inside text leaves
fn is_newline(c: char) -> bool {
    matches!(
        c,
        '\n' | '\u{000B}' | '\u{000C}' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

impl WebVtt {
    /// Copy of this document with duplicated lines and empty cues removed.
    pub fn deduplicated(&self) -> WebVtt {
        WebVtt {
            cues: deduplicate(&self.cues),
            header: self.header.clone(),
            stylesheets: self.stylesheets.clone(),
            regions: self.regions.clone(),
        }
    }
}

/// Remove duplicated lines across consecutive cues.
pub fn deduplicate(cues: &[Cue]) -> Vec<Cue> {
    let mut filtered = Vec::with_capacity(cues.len());
    let mut prev_lines: Vec<String> = Vec::new();
    let mut last_end = 0;
    let mut removed_lines = 0usize;

    for cue in cues {
        let consecutive = last_end == cue.timing.start;
        last_end = cue.timing.end;

        let lines = split_lines(&cue.content);
        let lines_text: Vec<String> = lines.iter().map(Node::text).collect();

        let ignored: Vec<bool> = lines_text
            .iter()
            .enumerate()
            .map(|(i, text)| {
                if text.trim().is_empty() {
                    return true;
                }
                consecutive
                    && (prev_lines.get(i) == Some(text) || prev_lines.get(i + 1) == Some(text))
            })
            .collect();

        let mut content = Node::root();
        let mut kept = 0;
        for (mut line, _) in lines.into_iter().zip(&ignored).filter(|(_, skip)| !**skip) {
            if kept > 0 {
                content.children.push(Node::text_leaf("\n"));
            }
            content.children.append(&mut line.children);
            kept += 1;
        }
        removed_lines += ignored.len() - kept;

        if content.is_empty() {
            continue;
        }
        prev_lines = lines_text;
        filtered.push(Cue {
            id: cue.id.clone(),
            timing: cue.timing,
            content,
        });
    }

    debug!(
        "deduplication kept {} of {} cues, removed {} lines",
        filtered.len(),
        cues.len(),
        removed_lines
    );
    filtered
}

/// Split a tree into one tree per line.
///
/// Text leaves split at line breaks. A break inside a nested element splits
/// that element too, so each line keeps the same wrapping (kind, classes,
/// annotation) it had in the original tree. Empty text fragments left at a
/// break are not kept.
pub fn split_lines(node: &Node) -> Vec<Node> {
    if let NodeKind::Text(text) = &node.kind {
        return text.split(is_newline).map(Node::text_leaf).collect();
    }

    let mut result = Vec::new();
    let mut buffer = Vec::new();
    for child in &node.children {
        for (i, line) in split_lines(child).into_iter().enumerate() {
            if i > 0 {
                result.push(node.empty_copy().with_children(std::mem::take(&mut buffer)));
            }
            if !matches!(&line.kind, NodeKind::Text(text) if text.is_empty()) {
                buffer.push(line);
            }
        }
    }
    result.push(node.empty_copy().with_children(buffer));
    result
}
