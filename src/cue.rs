//! Parsed WebVTT document model
//!
//! A document is an ordered list of cues; each cue owns a small markup tree
//! built from its payload. Trees are strictly owned top-down, so there are no
//! parent pointers and no way to build a cycle.

use std::fmt;

use serde::Serialize;

/// A parsed WebVTT document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebVtt {
    /// Cues in file order
    pub cues: Vec<Cue>,
    /// Raw text of the header block, if the file had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Raw contents of `STYLE` blocks
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stylesheets: Vec<String>,
    /// Raw contents of `REGION` blocks
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,
}

impl WebVtt {
    pub fn new(cues: Vec<Cue>) -> Self {
        Self {
            cues,
            ..Default::default()
        }
    }
}

/// Cue timings in milliseconds
///
/// Nothing forces `start <= end`; whatever the file says is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timing {
    pub start: i64,
    pub end: i64,
}

impl Timing {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> i64 {
        self.end - self.start
    }
}

/// Format milliseconds as `hh:mm:ss.ttt`
pub fn format_timestamp(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let ms = ms.unsigned_abs();
    format!(
        "{}{:02}:{:02}:{:02}.{:03}",
        sign,
        ms / 3_600_000,
        (ms / 60_000) % 60,
        (ms / 1000) % 60,
        ms % 1000
    )
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} --> {}",
            format_timestamp(self.start),
            format_timestamp(self.end)
        )
    }
}

/// A single timed caption
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cue {
    /// Optional identifier line preceding the timing line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub timing: Timing,
    /// Markup tree, always rooted at a `Root` node
    pub content: Node,
}

impl Cue {
    pub fn new(timing: Timing, content: Node) -> Self {
        Self {
            id: None,
            timing,
            content,
        }
    }

    /// Start time in seconds
    pub fn start_time(&self) -> f64 {
        self.timing.start as f64 / 1000.0
    }

    /// End time in seconds
    pub fn end_time(&self) -> f64 {
        self.timing.end as f64 / 1000.0
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.timing.duration() as f64 / 1000.0
    }

    /// Plain text rendering of the content tree.
    pub fn text(&self) -> String {
        self.content.text()
    }
}

/// Role of a node in the cue markup tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum NodeKind {
    Root,
    Class,
    Italic,
    Bold,
    Underline,
    Ruby,
    RubyText,
    Voice,
    Language,
    Text(String),
    Timestamp(String),
}

impl NodeKind {
    /// Map a cue text tag name to its node kind.
    pub fn from_tag(tag: &str) -> Option<NodeKind> {
        match tag {
            "c" => Some(NodeKind::Class),
            "i" => Some(NodeKind::Italic),
            "b" => Some(NodeKind::Bold),
            "u" => Some(NodeKind::Underline),
            "ruby" => Some(NodeKind::Ruby),
            "rt" => Some(NodeKind::RubyText),
            "v" => Some(NodeKind::Voice),
            "lang" => Some(NodeKind::Language),
            _ => None,
        }
    }

    /// Text and timestamps never own children.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeKind::Text(_) | NodeKind::Timestamp(_))
    }

    /// Kinds that may be nested inside an open node of the same kind.
    pub fn is_renestable(&self) -> bool {
        matches!(self, NodeKind::Class)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NodeKind::Root => write!(f, "_"),
            NodeKind::Class => write!(f, "c"),
            NodeKind::Italic => write!(f, "i"),
            NodeKind::Bold => write!(f, "b"),
            NodeKind::Underline => write!(f, "u"),
            NodeKind::Ruby => write!(f, "ruby"),
            NodeKind::RubyText => write!(f, "rt"),
            NodeKind::Voice => write!(f, "v"),
            NodeKind::Language => write!(f, "lang"),
            NodeKind::Text(text) => write!(f, "{:?}", text),
            NodeKind::Timestamp(timestamp) => write!(f, "\\{}\\", timestamp),
        }
    }
}

/// A node of the cue markup tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Voice name or language tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            classes: Vec::new(),
            annotation: None,
            children: Vec::new(),
        }
    }

    pub fn root() -> Self {
        Self::new(NodeKind::Root)
    }

    pub fn text_leaf(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(text.into()))
    }

    pub fn with_classes(mut self, classes: Vec<String>) -> Self {
        self.classes = classes;
        self
    }

    pub fn with_annotation(mut self, annotation: Option<String>) -> Self {
        self.annotation = annotation;
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Same kind, classes and annotation, no children.
    pub fn empty_copy(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            classes: self.classes.clone(),
            annotation: self.annotation.clone(),
            children: Vec::new(),
        }
    }

    /// Plain text of this subtree.
    ///
    /// Voices are prefixed with `"name: "`, ruby text is wrapped in
    /// parentheses and timestamps contribute nothing.
    pub fn text(&self) -> String {
        let mut result = String::new();
        self.write_text(&mut result);
        result
    }

    fn write_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Timestamp(_) => return,
            NodeKind::Voice => out.push_str(&voice_prefix(self.annotation.as_deref())),
            NodeKind::RubyText => {
                let inner = self.children_text();
                if !inner.is_empty() {
                    out.push('(');
                    out.push_str(&inner);
                    out.push(')');
                }
                return;
            }
            _ => {}
        }
        for child in &self.children {
            child.write_text(out);
        }
    }

    fn children_text(&self) -> String {
        let mut result = String::new();
        for child in &self.children {
            child.write_text(&mut result);
        }
        result
    }

    /// True when every text leaf below is the empty string.
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            NodeKind::Text(text) => text.is_empty(),
            _ => self.children.iter().all(Node::is_empty),
        }
    }
}

// Children are freed from an explicit stack so a deep chain of nested spans
// cannot overflow the call stack.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Prefix shown before a voice span, empty for an anonymous voice.
pub fn voice_prefix(annotation: Option<&str>) -> String {
    match annotation {
        Some(name) if !name.is_empty() => format!("{}: ", name),
        _ => String::new(),
    }
}

/// Compact tree notation: `_[b.loud[i["x"]]]`, `v("Bob")[...]`, `\00:01.000\`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for class in &self.classes {
            write!(f, ".{}", class)?;
        }
        if let Some(annotation) = &self.annotation {
            write!(f, "({:?})", annotation)?;
        }
        if !self.children.is_empty() {
            write!(f, "[")?;
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", child)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
