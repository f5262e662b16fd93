//! # Raw Translation Units
//!
//! Defines the untyped, preprocessor-aware parse tree handed over by the
//! front-end parser. Front ends may build it in memory or ship it as JSON.
//!
//! ## Architecture
//!
//! ```text
//! C source → front end (lexer/parser, #if evaluation) → RawNode tree (JSON)
//! RawNode tree → Converter → Ast (variability-aware)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use code_model::raw::RawNode;
//!
//! let json = r#"{"type":"unit","kind":"return","children":[
//!     {"type":"literal","text":"return"},{"type":"literal","text":";"}]}"#;
//! let raw: RawNode = serde_json::from_str(json).unwrap();
//! assert_eq!(raw.kind(), "return");
//! assert_eq!(raw.child_count(), 2);
//! ```

use crate::nodes::CppBlockKind;
use formula::Formula;
use serde::{Deserialize, Serialize};

/// Kind reported by [`RawNode::kind`] for literal tokens.
pub const LITERAL_KIND: &str = "literal";

/// Kind reported by [`RawNode::kind`] for preprocessor blocks.
pub const PREPROCESSOR_KIND: &str = "preprocessor";

/// A node of the front-end parse tree.
///
/// # Variants
///
/// * `Literal` - A token or run of unparsed text
/// * `Unit` - A translation unit tagged with its construct kind (`if`, `block`, ...)
/// * `Preprocessor` - One `#if`/`#ifdef`/`#ifndef`/`#elif`/`#else` region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RawNode {
    Literal {
        text: String,
    },
    Unit {
        kind: String,
        #[serde(default)]
        children: Vec<RawNode>,
    },
    Preprocessor {
        /// Directive that opened the block.
        #[serde(rename = "blockKind")]
        block_kind: CppBlockKind,
        /// Effective condition of the block, already combined with the
        /// negated conditions of preceding `#if`/`#elif` siblings.
        condition: Formula,
        #[serde(default)]
        children: Vec<RawNode>,
    },
}

impl RawNode {
    /// Creates a literal token.
    pub fn literal(text: impl Into<String>) -> Self {
        RawNode::Literal { text: text.into() }
    }

    /// Creates a translation unit.
    pub fn unit(kind: impl Into<String>, children: Vec<RawNode>) -> Self {
        RawNode::Unit {
            kind: kind.into(),
            children,
        }
    }

    /// Splits `source` on whitespace into literal tokens.
    ///
    /// # Example
    ///
    /// ```rust
    /// use code_model::raw::RawNode;
    ///
    /// let tokens = RawNode::tokens("x > 0");
    /// assert_eq!(tokens.len(), 3);
    /// assert_eq!(tokens[1].text(), Some(">"));
    /// ```
    pub fn tokens(source: &str) -> Vec<RawNode> {
        source.split_whitespace().map(RawNode::literal).collect()
    }

    /// Creates a preprocessor block.
    pub fn preprocessor(block_kind: CppBlockKind, condition: Formula, children: Vec<RawNode>) -> Self {
        RawNode::Preprocessor {
            block_kind,
            condition,
            children,
        }
    }

    /// Parses a front-end export. Deeply nested preprocessor blocks do not
    /// hit serde_json's nesting limit.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        crate::serialize::deserialize_unbounded(serde_json::Deserializer::from_str(json))
    }

    /// Textual kind tag: the unit kind, [`LITERAL_KIND`] or [`PREPROCESSOR_KIND`].
    pub fn kind(&self) -> &str {
        match self {
            RawNode::Literal { .. } => LITERAL_KIND,
            RawNode::Unit { kind, .. } => kind,
            RawNode::Preprocessor { .. } => PREPROCESSOR_KIND,
        }
    }

    /// Ordered children; empty for literals.
    pub fn children(&self) -> &[RawNode] {
        match self {
            RawNode::Literal { .. } => &[],
            RawNode::Unit { children, .. } | RawNode::Preprocessor { children, .. } => children,
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Literal text, for literal tokens only.
    pub fn text(&self) -> Option<&str> {
        match self {
            RawNode::Literal { text } => Some(text),
            _ => None,
        }
    }

    /// True for a literal token with exactly this text.
    pub fn is_literal(&self, expected: &str) -> bool {
        self.text() == Some(expected)
    }

    /// True for a literal `{` or `}` token.
    pub fn is_brace(&self) -> bool {
        self.is_literal("{") || self.is_literal("}")
    }

    /// True for a unit of the given kind.
    pub fn is_unit(&self, expected: &str) -> bool {
        matches!(self, RawNode::Unit { kind, .. } if kind == expected)
    }

    /// Plain code: a literal, or a preprocessor block containing only plain code.
    ///
    /// # Example
    ///
    /// ```rust
    /// use code_model::raw::RawNode;
    /// use code_model::{CppBlockKind, Formula};
    ///
    /// let guarded = RawNode::preprocessor(CppBlockKind::Ifdef, Formula::var("A"), RawNode::tokens("x"));
    /// assert!(guarded.is_code());
    /// assert!(!RawNode::unit("block", vec![]).is_code());
    /// ```
    pub fn is_code(&self) -> bool {
        match self {
            RawNode::Literal { .. } => true,
            RawNode::Unit { .. } => false,
            RawNode::Preprocessor { children, .. } => children.iter().all(RawNode::is_code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_split_on_whitespace() {
        let tokens = RawNode::tokens("  int  x ;\n");
        let texts: Vec<_> = tokens.iter().filter_map(RawNode::text).collect();
        assert_eq!(texts, vec!["int", "x", ";"]);
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(RawNode::literal("x").kind(), LITERAL_KIND);
        assert_eq!(RawNode::unit("if", vec![]).kind(), "if");
        let block = RawNode::preprocessor(CppBlockKind::If, Formula::TRUE, vec![]);
        assert_eq!(block.kind(), PREPROCESSOR_KIND);
    }

    #[test]
    fn test_literal_has_no_children() {
        let lit = RawNode::literal(";");
        assert_eq!(lit.child_count(), 0);
        assert!(lit.is_literal(";"));
        assert!(!lit.is_brace());
        assert!(RawNode::literal("}").is_brace());
    }

    #[test]
    fn test_preprocessor_with_unit_is_not_code() {
        let block = RawNode::preprocessor(
            CppBlockKind::Ifdef,
            Formula::var("A"),
            vec![RawNode::unit("return", RawNode::tokens("return ;"))],
        );
        assert!(!block.is_code());
    }

    #[test]
    fn test_deeply_nested_export_parses() {
        let depth = 100;
        let mut raw = RawNode::unit("return", RawNode::tokens("return ;"));
        for level in 0..depth {
            raw = RawNode::preprocessor(
                CppBlockKind::Ifdef,
                Formula::var(format!("LEVEL_{level}")),
                vec![raw],
            );
        }
        let json = serde_json::to_string(&raw).unwrap();
        assert_eq!(RawNode::from_json_str(&json).unwrap(), raw);
    }

    #[test]
    fn test_deserialize_preprocessor_block() {
        let json = r#"{"type":"preprocessor","blockKind":"IFDEF",
            "condition":{"Variable":"FOO"},
            "children":[{"type":"literal","text":"x"}]}"#;
        let raw: RawNode = serde_json::from_str(json).unwrap();
        match raw {
            RawNode::Preprocessor { block_kind, condition, children } => {
                assert_eq!(block_kind, CppBlockKind::Ifdef);
                assert_eq!(condition, Formula::var("FOO"));
                assert_eq!(children.len(), 1);
            }
            other => panic!("expected preprocessor block, got {other:?}"),
        }
    }
}
