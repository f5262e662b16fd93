//! # Code Model Crate
//!
//! Variability-aware AST for C code. A preprocessor-aware front end hands
//! over a [`RawNode`] tree; the [`Converter`] turns it into an [`Ast`] whose
//! every node carries the presence condition under which it is compiled.
//!
//! ## Architecture
//!
//! ```text
//! C source → front end (tokens, #if regions) → RawNode tree
//! RawNode tree → Converter (condition scope + per-kind rules) → Ast
//! Ast → Visitor consumers (metrics, checks)
//! Ast ⇄ JSON cache (serialize)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use code_model::{convert_file, NodeKind, RawNode};
//!
//! let raw = RawNode::unit("unit", vec![
//!     RawNode::unit("expr_stmt", RawNode::tokens("x = 1 ;")),
//! ]);
//! let conversion = convert_file("demo.c", &raw).unwrap();
//! let ast = &conversion.ast;
//! let file = ast.root().unwrap();
//! let stmt = ast.nested_element(file, 0).unwrap();
//! assert!(matches!(ast[stmt].kind(), NodeKind::SingleStatement { .. }));
//! ```
//!
//! ## Design Principles
//!
//! - **Arena**: nodes live in one [`Ast`] and refer to each other by [`NodeId`]
//! - **Single owner**: every node has at most one owner; cross-links are plain ids
//! - **Soft degradation**: unsupported constructs become error elements plus diagnostics
//! - **No parsing of expressions**: statements keep their text as code spans

pub mod converter;
pub mod diagnostic;
pub mod error;
pub mod nodes;
pub mod raw;
pub mod render;
pub mod serialize;
pub mod tree;
pub mod visitor;

// Re-exports for convenience
pub use config::constants::{ConverterConfig, RenderConfig, UnknownKindPolicy};
pub use converter::{ConditionScope, Conversion, Converter};
pub use diagnostic::{Diagnostic, Severity};
pub use error::{AstError, ConvertError, FormatError};
pub use formula::Formula;
pub use nodes::{
    BranchKind, CaseKind, CppBlockKind, CppStatementKind, ElseKind, LoopKind, Node, NodeId,
    NodeKind, SourceLocation, StatementKind, TypeDefKind,
};
pub use raw::RawNode;
pub use serialize::{from_reader, read_json, to_writer, write_json};
pub use tree::Ast;
pub use visitor::{NodeCounter, Visitor};

use std::path::Path;

/// Converts a whole translation unit with the default configuration.
pub fn convert_file(source_file: impl AsRef<Path>, raw: &RawNode) -> Result<Conversion, ConvertError> {
    Converter::new(source_file, ConverterConfig::default()).convert_file(raw)
}
