//! # Raw Tree to AST Conversion
//!
//! Transforms a [`RawNode`] tree into a variability-aware [`Ast`].
//!
//! ## Structure
//!
//! ```text
//! converter/
//! ├── mod.rs          - Converter, condition scope, dispatch
//! ├── code.rs         - code merging and preprocessor blocks
//! ├── statements.rs   - file, block, simple statements, directives
//! ├── control_flow.rs - if/else, loops, switch/case
//! └── declarations.rs - functions, struct/union/enum, typedef
//! ```
//!
//! ## Example
//!
//! ```rust
//! use code_model::converter::Converter;
//! use code_model::raw::RawNode;
//! use code_model::{ConverterConfig, NodeKind};
//!
//! let raw = RawNode::unit("unit", vec![RawNode::unit("return", RawNode::tokens("return 0 ;"))]);
//! let conversion = Converter::new("main.c", ConverterConfig::default()).convert_file(&raw).unwrap();
//! let root = conversion.ast.root().unwrap();
//! assert!(matches!(conversion.ast[root].kind(), NodeKind::File { .. }));
//! ```

mod code;
mod control_flow;
mod declarations;
mod statements;

use crate::diagnostic::Diagnostic;
use crate::error::ConvertError;
use crate::nodes::{
    BranchKind, CaseKind, CppStatementKind, LoopKind, NodeId, NodeKind, SourceLocation,
    StatementKind, TypeDefKind,
};
use crate::raw::RawNode;
use crate::tree::Ast;
use config::constants::{
    ConverterConfig, UnknownKindPolicy, STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES,
};
use formula::Formula;
use stacker::maybe_grow;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Raw translation unit kinds understood by the converter.
pub mod kinds {
    pub const UNIT: &str = "unit";
    pub const FUNCTION: &str = "function";
    pub const BLOCK: &str = "block";
    pub const DECL_STMT: &str = "decl_stmt";
    pub const EXPR_STMT: &str = "expr_stmt";
    pub const CONTINUE: &str = "continue";
    pub const BREAK: &str = "break";
    pub const GOTO: &str = "goto";
    pub const RETURN: &str = "return";
    pub const EMPTY_STMT: &str = "empty_stmt";
    pub const LABEL: &str = "label";
    pub const IF: &str = "if";
    pub const ELSEIF: &str = "elseif";
    pub const ELSE: &str = "else";
    pub const FOR: &str = "for";
    pub const WHILE: &str = "while";
    pub const DO: &str = "do";
    pub const SWITCH: &str = "switch";
    pub const CASE: &str = "case";
    pub const DEFAULT: &str = "default";
    pub const ENUM: &str = "enum";
    pub const STRUCT: &str = "struct";
    pub const UNION: &str = "union";
    pub const TYPEDEF: &str = "typedef";
    pub const COMMENT: &str = "comment";
    pub const ERROR: &str = "error";
    pub const CPP_DEFINE: &str = "#define";
    pub const CPP_UNDEF: &str = "#undef";
    pub const CPP_INCLUDE: &str = "#include";
    pub const CPP_PRAGMA: &str = "#pragma";
    pub const CPP_ERROR: &str = "#error";
    pub const CPP_WARNING: &str = "#warning";
    pub const CPP_LINE: &str = "#line";
    pub const CPP_EMPTY: &str = "#";
}

// =============================================================================
// CONDITION SCOPE
// =============================================================================

/// Accumulated preprocessor condition at one point of the recursion.
///
/// Scopes are values: entering a block returns a new scope and leaves the
/// caller's scope untouched, so leaving the block needs no bookkeeping.
///
/// # Example
///
/// ```rust
/// use code_model::converter::ConditionScope;
/// use code_model::Formula;
///
/// let top = ConditionScope::default();
/// assert_eq!(top.current_condition(), Formula::TRUE);
///
/// let a = top.enter_block(&Formula::var("A"));
/// let ab = a.enter_block(&Formula::var("B"));
/// assert_eq!(a.current_condition(), Formula::var("A"));
/// assert_eq!(ab.current_condition(), Formula::var("A").and(&Formula::var("B")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionScope {
    accumulated: Option<Formula>,
}

impl ConditionScope {
    /// Conjunction of all enclosing block conditions, or `True` outside any block.
    pub fn current_condition(&self) -> Formula {
        self.accumulated.clone().unwrap_or(Formula::TRUE)
    }

    /// Scope for the body of a block with the given local condition.
    pub fn enter_block(&self, condition: &Formula) -> ConditionScope {
        let accumulated = match &self.accumulated {
            Some(previous) => previous.and(condition),
            None => condition.clone(),
        };
        ConditionScope {
            accumulated: Some(accumulated),
        }
    }
}

// =============================================================================
// CONVERTER
// =============================================================================

/// Result of converting one raw tree.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub ast: Ast,
    pub diagnostics: Vec<Diagnostic>,
}

/// Single-use converter for one source file.
///
/// The converter is consumed by [`Converter::convert`] / [`Converter::convert_file`];
/// convert each file with its own instance.
#[derive(Debug)]
pub struct Converter {
    source_file: Arc<Path>,
    config: ConverterConfig,
    ast: Ast,
    diagnostics: Vec<Diagnostic>,
}

impl Converter {
    pub fn new(source_file: impl AsRef<Path>, config: ConverterConfig) -> Self {
        Self {
            source_file: Arc::from(source_file.as_ref()),
            config,
            ast: Ast::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Converts a whole translation unit into a tree rooted at a `File` node.
    pub fn convert_file(self, raw: &RawNode) -> Result<Conversion, ConvertError> {
        if !raw.is_unit(kinds::UNIT) {
            return Err(ConvertError::UnexpectedRoot {
                kind: raw.kind().to_string(),
            });
        }
        self.convert(raw)
    }

    /// Converts any raw node. The resulting tree has no root when the node
    /// was dropped (unknown kind under [`UnknownKindPolicy::Skip`]).
    pub fn convert(mut self, raw: &RawNode) -> Result<Conversion, ConvertError> {
        let scope = ConditionScope::default();
        if let Some(root) = self.convert_node(raw, &scope)? {
            self.ast.set_root(root)?;
        }
        Ok(Conversion {
            ast: self.ast,
            diagnostics: self.diagnostics,
        })
    }

    /// Main dispatch. `None` means the node could not be produced and should
    /// be skipped by the caller.
    pub(crate) fn convert_node(
        &mut self,
        raw: &RawNode,
        scope: &ConditionScope,
    ) -> Result<Option<NodeId>, ConvertError> {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || match raw {
            RawNode::Literal { .. } => self.make_code(&[raw], scope, raw.kind()).map(Some),
            RawNode::Preprocessor {
                block_kind,
                condition,
                children,
            } => self
                .convert_cpp_block(*block_kind, condition, children, scope)
                .map(Some),
            RawNode::Unit { kind, children } => self.convert_unit(kind, children, scope),
        })
    }

    fn convert_unit(
        &mut self,
        kind: &str,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<Option<NodeId>, ConvertError> {
        let id = match kind {
            kinds::UNIT => self.convert_file_unit(children, scope)?,
            kinds::FUNCTION => self.convert_function(children, scope)?,
            kinds::BLOCK => self.convert_block(children, scope)?,
            kinds::DECL_STMT => self.convert_statement(StatementKind::Declaration, kind, children, scope)?,
            kinds::EXPR_STMT => self.convert_statement(StatementKind::Expression, kind, children, scope)?,
            kinds::CONTINUE => self.convert_statement(StatementKind::Continue, kind, children, scope)?,
            kinds::BREAK => self.convert_statement(StatementKind::Break, kind, children, scope)?,
            kinds::GOTO => self.convert_statement(StatementKind::Goto, kind, children, scope)?,
            kinds::RETURN => self.convert_statement(StatementKind::Return, kind, children, scope)?,
            kinds::EMPTY_STMT => self.convert_statement(StatementKind::Empty, kind, children, scope)?,
            kinds::LABEL => self.convert_label(children, scope)?,
            kinds::IF => self.convert_if(children, scope)?,
            kinds::ELSEIF => self.convert_else_branch(BranchKind::ElseIf, children, scope)?,
            kinds::ELSE => self.convert_else_branch(BranchKind::Else, children, scope)?,
            kinds::FOR => self.convert_loop(LoopKind::For, kind, children, scope)?,
            kinds::WHILE => self.convert_loop(LoopKind::While, kind, children, scope)?,
            kinds::DO => self.convert_do(children, scope)?,
            kinds::SWITCH => self.convert_switch(children, scope)?,
            kinds::CASE => self.convert_case(CaseKind::Case, kind, children, scope)?,
            kinds::DEFAULT => self.convert_case(CaseKind::Default, kind, children, scope)?,
            kinds::ENUM => self.convert_compound_type(TypeDefKind::Enum, kind, children, scope)?,
            kinds::STRUCT => self.convert_compound_type(TypeDefKind::Struct, kind, children, scope)?,
            kinds::UNION => self.convert_compound_type(TypeDefKind::Union, kind, children, scope)?,
            kinds::TYPEDEF => self.convert_typedef(children, scope)?,
            kinds::COMMENT => self.convert_comment(children, scope)?,
            kinds::ERROR => self.convert_error_unit(children, scope)?,
            kinds::CPP_DEFINE => self.convert_directive(CppStatementKind::Define, kind, children, scope)?,
            kinds::CPP_UNDEF => self.convert_directive(CppStatementKind::Undef, kind, children, scope)?,
            kinds::CPP_INCLUDE => self.convert_directive(CppStatementKind::Include, kind, children, scope)?,
            kinds::CPP_PRAGMA => self.convert_directive(CppStatementKind::Pragma, kind, children, scope)?,
            kinds::CPP_ERROR => self.convert_directive(CppStatementKind::Error, kind, children, scope)?,
            kinds::CPP_WARNING => self.convert_directive(CppStatementKind::Warning, kind, children, scope)?,
            kinds::CPP_LINE => self.convert_directive(CppStatementKind::Line, kind, children, scope)?,
            kinds::CPP_EMPTY => self.convert_directive(CppStatementKind::Empty, kind, children, scope)?,
            _ => return self.convert_unknown(kind, children, scope),
        };
        Ok(Some(id))
    }

    fn convert_unknown(
        &mut self,
        kind: &str,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<Option<NodeId>, ConvertError> {
        match self.config.unknown_kinds {
            UnknownKindPolicy::Skip => {
                debug!(kind, file = %self.source_file.display(), "skipping unsupported translation unit");
                Ok(None)
            }
            UnknownKindPolicy::Placeholder => {
                let message = format!("unsupported construct `{kind}`");
                warn!(kind, file = %self.source_file.display(), "{message}");
                self.diagnostics.push(
                    Diagnostic::warning(message.clone(), kind)
                        .with_hint("nested elements were converted below an error element".into()),
                );
                let placeholder = self.new_node(scope, NodeKind::ErrorElement { text: message })?;
                let nested = self.convert_sequence(children, scope, false, kind)?;
                self.nest_all(placeholder, nested)?;
                Ok(Some(placeholder))
            }
        }
    }

    // =========================================================================
    // SHARED HELPERS
    // =========================================================================

    /// Converts a structural child sequence. Runs of plain code are merged
    /// into one code node; units are converted one by one; dropped units
    /// are skipped.
    pub(crate) fn convert_sequence(
        &mut self,
        children: &[RawNode],
        scope: &ConditionScope,
        skip_braces: bool,
        kind: &str,
    ) -> Result<Vec<NodeId>, ConvertError> {
        let mut converted = Vec::new();
        let mut run: Vec<&RawNode> = Vec::new();
        for child in children {
            if skip_braces && child.is_brace() {
                continue;
            }
            if child.is_code() {
                run.push(child);
                continue;
            }
            if !run.is_empty() {
                converted.push(self.make_code(&run, scope, kind)?);
                run.clear();
            }
            if let Some(id) = self.convert_node(child, scope)? {
                converted.push(id);
            }
        }
        if !run.is_empty() {
            converted.push(self.make_code(&run, scope, kind)?);
        }
        Ok(converted)
    }

    /// Creates a node carrying the scope's presence condition and the file location.
    pub(crate) fn new_node(
        &mut self,
        scope: &ConditionScope,
        kind: NodeKind,
    ) -> Result<NodeId, ConvertError> {
        self.new_conditional_node(scope.current_condition(), None, kind)
    }

    pub(crate) fn new_conditional_node(
        &mut self,
        presence_condition: Formula,
        condition: Option<Formula>,
        kind: NodeKind,
    ) -> Result<NodeId, ConvertError> {
        let id = self.ast.add_node(presence_condition, condition, kind)?;
        self.ast
            .set_location(id, SourceLocation::in_file(self.source_file.clone()))?;
        Ok(id)
    }

    pub(crate) fn nest_all(&mut self, parent: NodeId, children: Vec<NodeId>) -> Result<(), ConvertError> {
        for child in children {
            self.ast.add_nested_element(parent, child)?;
        }
        Ok(())
    }

    pub(crate) fn nest_optional(&mut self, parent: NodeId, child: Option<NodeId>) -> Result<(), ConvertError> {
        if let Some(child) = child {
            self.ast.add_nested_element(parent, child)?;
        }
        Ok(())
    }

    /// Records a malformed construct and returns an error element standing in for it.
    pub(crate) fn malformed(
        &mut self,
        kind: &str,
        message: &str,
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        error!(kind, file = %self.source_file.display(), "{message}");
        self.diagnostics
            .push(Diagnostic::error(message.to_string(), kind));
        self.new_node(
            scope,
            NodeKind::ErrorElement {
                text: format!("{kind}: {message}"),
            },
        )
    }

    pub(crate) fn source_file(&self) -> &Path {
        &self.source_file
    }
}

/// Borrows every node of a slice, for code merging.
pub(crate) fn refs(nodes: &[RawNode]) -> Vec<&RawNode> {
    nodes.iter().collect()
}

#[cfg(test)]
mod tests;
