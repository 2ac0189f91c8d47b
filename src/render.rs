//! Styled text rendering of cue markup
//!
//! Flattens a cue tree into runs of text that share one style, the shape a
//! rich text widget or terminal printer wants. Bold, italic and underline
//! spans set their trait for everything below them; a voice name is shown
//! bold before the voice's text; ruby text is shown in parentheses after
//! its base; timestamps are dropped.

use serde::{Deserialize, Serialize};

use crate::cue::{voice_prefix, Node, NodeKind};

/// Traits applied to one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// Traits the cue text starts out with, before any markup applies
pub type BaseStyle = RunStyle;

impl RunStyle {
    fn for_node(self, kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Bold => Self { bold: true, ..self },
            NodeKind::Italic => Self { italic: true, ..self },
            NodeKind::Underline => Self {
                underline: true,
                ..self
            },
            _ => self,
        }
    }
}

/// A span of text with a single style
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledRun {
    pub text: String,
    pub style: RunStyle,
}

/// Render a cue tree into styled runs. Adjacent runs with the same style are
/// merged.
pub fn render(node: &Node, base: &BaseStyle) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    render_node(node, *base, &mut runs);
    runs
}

fn render_node(node: &Node, inherited: RunStyle, runs: &mut Vec<StyledRun>) {
    let style = inherited.for_node(&node.kind);
    match &node.kind {
        NodeKind::Text(text) => push_run(runs, text, style),
        NodeKind::Timestamp(_) => {}
        NodeKind::Voice => {
            let prefix = voice_prefix(node.annotation.as_deref());
            push_run(runs, &prefix, RunStyle { bold: true, ..style });
        }
        NodeKind::RubyText => {
            let mut inner = Vec::new();
            for child in &node.children {
                render_node(child, style, &mut inner);
            }
            if inner.iter().any(|run| !run.text.is_empty()) {
                push_run(runs, "(", style);
                for run in inner {
                    push_run(runs, &run.text, run.style);
                }
                push_run(runs, ")", style);
            }
            return;
        }
        _ => {}
    }
    for child in &node.children {
        render_node(child, style, runs);
    }
}

fn push_run(runs: &mut Vec<StyledRun>, text: &str, style: RunStyle) {
    if text.is_empty() {
        return;
    }
    match runs.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => runs.push(StyledRun {
            text: text.to_string(),
            style,
        }),
    }
}
