//! Cue markup tree builder
//!
//! Open elements live on a stack and are attached to their parent when they
//! close (or when the token stream ends). Nothing is ever appended to a node
//! while one of its children is still open, so attaching late keeps
//! document order.

use tracing::trace;

use super::tokenizer::Token;
use crate::cue::{Node, NodeKind};

/// Open elements allowed at once; deeper start tags are ignored.
pub const MAX_DEPTH: usize = 256;

/// Builds one cue's content tree from its tokens
#[derive(Debug)]
pub struct CueTreeBuilder {
    root: Node,
    stack: Vec<Node>,
}

impl Default for CueTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CueTreeBuilder {
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            stack: Vec::new(),
        }
    }

    /// Consume the tokens and return the root node.
    pub fn build(mut self, tokens: Vec<Token>) -> Node {
        for token in tokens {
            match token {
                Token::Text(text) => self.current().children.push(Node::text_leaf(text)),
                Token::Timestamp(timestamp) => self
                    .current()
                    .children
                    .push(Node::new(NodeKind::Timestamp(timestamp))),
                Token::TagStart {
                    name,
                    classes,
                    annotation,
                } => self.open(&name, classes, annotation),
                Token::TagEnd(name) => self.close(&name),
            }
        }
        while !self.stack.is_empty() {
            self.pop();
        }
        self.root
    }

    fn current(&mut self) -> &mut Node {
        self.stack.last_mut().unwrap_or(&mut self.root)
    }

    fn open(&mut self, name: &str, classes: Vec<String>, annotation: Option<String>) {
        let Some(kind) = NodeKind::from_tag(name) else {
            trace!("ignoring unknown start tag <{}>", name);
            return;
        };

        // A second unmatched <b> closes the first; class spans may stack.
        if !kind.is_renestable() {
            if let Some(depth) = self.stack.iter().rposition(|node| node.kind == kind) {
                while self.stack.len() > depth {
                    self.pop();
                }
            }
        }

        if self.stack.len() >= MAX_DEPTH {
            trace!("ignoring start tag <{}> nested deeper than {}", name, MAX_DEPTH);
            return;
        }

        let node = Node::new(kind)
            .with_classes(classes)
            .with_annotation(annotation);
        self.stack.push(node);
    }

    fn close(&mut self, name: &str) {
        let Some(kind) = NodeKind::from_tag(name) else {
            trace!("ignoring unknown end tag </{}>", name);
            return;
        };
        let Some(top) = self.stack.last().map(|node| node.kind.clone()) else {
            return;
        };

        if top == kind {
            self.pop();
        } else if kind == NodeKind::Ruby && top == NodeKind::RubyText {
            // </ruby> with the <rt> still open closes both.
            self.pop();
            if self.stack.last().map(|node| &node.kind) == Some(&NodeKind::Ruby) {
                self.pop();
            }
        } else {
            trace!("ignoring mismatched end tag </{}>", name);
        }
    }

    /// Close the innermost open node and attach it to its parent.
    fn pop(&mut self) {
        if let Some(node) = self.stack.pop() {
            self.current().children.push(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityTable;
    use crate::parser::tokenizer::CueTextTokenizer;

    fn build(payload: &str) -> String {
        let tokens = CueTextTokenizer::new(payload, EntityTable::standard()).tokenize();
        CueTreeBuilder::new().build(tokens).to_string()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(build("hello"), r#"_["hello"]"#);
        assert_eq!(build(""), "_");
    }

    #[test]
    fn test_nesting() {
        assert_eq!(build("<b><i>x</i></b>"), r#"_[b[i["x"]]]"#);
    }

    #[test]
    fn test_text_after_close() {
        assert_eq!(build("<i>a</i>b"), r#"_[i["a"], "b"]"#);
    }

    #[test]
    fn test_same_kind_auto_closes() {
        assert_eq!(build("<b>one<b>two"), r#"_[b["one"], b["two"]]"#);
    }

    #[test]
    fn test_auto_close_pops_intermediate_nodes() {
        assert_eq!(build("<b>a<i>b<b>c"), r#"_[b["a", i["b"]], b["c"]]"#);
    }

    #[test]
    fn test_class_renesting() {
        assert_eq!(build("<c.a><c.b>x"), r#"_[c.a[c.b["x"]]]"#);
    }

    #[test]
    fn test_implicit_ruby_text_close() {
        assert_eq!(
            build("<ruby>base<rt>note</ruby>"),
            r#"_[ruby["base", rt["note"]]]"#
        );
        assert_eq!(
            build("<ruby>base<rt>note</ruby> after"),
            r#"_[ruby["base", rt["note"]], " after"]"#
        );
    }

    #[test]
    fn test_explicit_ruby_text_close() {
        assert_eq!(
            build("<ruby>a<rt>b</rt>c<rt>d</rt></ruby>"),
            r#"_[ruby["a", rt["b"], "c", rt["d"]]]"#
        );
    }

    #[test]
    fn test_unknown_tags_ignored() {
        assert_eq!(build("<span>x</span>"), r#"_["x"]"#);
        assert_eq!(build("<>x"), r#"_["x"]"#);
    }

    #[test]
    fn test_mismatched_close_ignored() {
        assert_eq!(build("<b>x</i>y</b>z"), r#"_[b["x", "y"], "z"]"#);
        assert_eq!(build("</b>x"), r#"_["x"]"#);
    }

    #[test]
    fn test_voice_and_timestamp() {
        assert_eq!(
            build("<v.loud Bob>hi <00:00:01.000>there</v>"),
            r#"_[v.loud("Bob")["hi ", \00:00:01.000\, "there"]]"#
        );
    }

    #[test]
    fn test_depth_capped() {
        let payload = format!("{}x", "<c>".repeat(MAX_DEPTH + 10));
        let tokens = CueTextTokenizer::new(&payload, EntityTable::standard()).tokenize();
        let root = CueTreeBuilder::new().build(tokens);
        let mut node = &root;
        let mut depth = 0;
        while let Some(child) = node.children.first() {
            node = child;
            depth += 1;
        }
        // MAX_DEPTH class spans plus the text leaf
        assert_eq!(depth, MAX_DEPTH + 1);
        assert_eq!(node.kind, NodeKind::Text("x".to_string()));
    }

    #[test]
    fn test_lang() {
        assert_eq!(build("<lang en>hello</lang>"), r#"_[lang("en")["hello"]]"#);
    }
}
