//! Depth-first traversal over an [`Ast`].
//!
//! [`Visitor::visit_node`] dispatches on the node kind; every per-kind method
//! defaults to [`walk_node`], which visits the node's code attributes (header,
//! condition, declaration...) and then its primary children in source order.
//! Overriding a method replaces the walk below that node unless the override
//! calls the matching `walk_*` helper itself.
//!
//! Non-owning links (reference targets, case lists, branch siblings) are never
//! followed, so each owned node is visited exactly once.
//!
//! ```rust
//! use code_model::{convert_file, Ast, NodeId, RawNode, Visitor};
//!
//! #[derive(Default)]
//! struct Statements(usize);
//!
//! impl<'ast> Visitor<'ast> for Statements {
//!     fn visit_single_statement(&mut self, _ast: &'ast Ast, _id: NodeId) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let raw = RawNode::unit("unit", vec![
//!     RawNode::unit("expr_stmt", RawNode::tokens("a ;")),
//!     RawNode::unit("return", RawNode::tokens("return ;")),
//! ]);
//! let ast = convert_file("a.c", &raw).unwrap().ast;
//! let mut counter = Statements::default();
//! ast.accept(ast.root().unwrap(), &mut counter);
//! assert_eq!(counter.0, 2);
//! ```

use crate::nodes::{NodeId, NodeKind};
use crate::tree::Ast;
use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use stacker::maybe_grow;
use std::collections::BTreeMap;

pub trait Visitor<'ast> {
    fn visit_node(&mut self, ast: &'ast Ast, id: NodeId) {
        match ast[id].kind() {
            NodeKind::File { .. } => self.visit_file(ast, id),
            NodeKind::Function { .. } => self.visit_function(ast, id),
            NodeKind::CompoundStatement => self.visit_compound_statement(ast, id),
            NodeKind::SingleStatement { .. } => self.visit_single_statement(ast, id),
            NodeKind::Label { .. } => self.visit_label(ast, id),
            NodeKind::BranchStatement { .. } => self.visit_branch_statement(ast, id),
            NodeKind::ElseStatement { .. } => self.visit_else_statement(ast, id),
            NodeKind::LoopStatement { .. } => self.visit_loop_statement(ast, id),
            NodeKind::SwitchStatement { .. } => self.visit_switch_statement(ast, id),
            NodeKind::CaseStatement { .. } => self.visit_case_statement(ast, id),
            NodeKind::TypeDefinition { .. } => self.visit_type_definition(ast, id),
            NodeKind::CodeList => self.visit_code_list(ast, id),
            NodeKind::Code { .. } => self.visit_code(ast, id),
            NodeKind::CppBlock { .. } => self.visit_cpp_block(ast, id),
            NodeKind::CppStatement { .. } => self.visit_cpp_statement(ast, id),
            NodeKind::Comment { .. } => self.visit_comment(ast, id),
            NodeKind::ErrorElement { .. } => self.visit_error_element(ast, id),
            NodeKind::ReferenceElement { .. } => self.visit_reference_element(ast, id),
        }
    }

    fn visit_file(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    /// Header first, then the body.
    fn visit_function(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_node(self, ast, id);
    }

    fn visit_compound_statement(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_single_statement(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_code_attributes(self, ast, id);
    }

    fn visit_label(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_code_attributes(self, ast, id);
    }

    fn visit_branch_statement(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_node(self, ast, id);
    }

    fn visit_else_statement(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_node(self, ast, id);
    }

    fn visit_loop_statement(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_node(self, ast, id);
    }

    /// Header, then the body. The case list is not walked again.
    fn visit_switch_statement(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_node(self, ast, id);
    }

    fn visit_case_statement(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_node(self, ast, id);
    }

    fn visit_type_definition(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_node(self, ast, id);
    }

    fn visit_code_list(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_code(&mut self, _ast: &'ast Ast, _id: NodeId) {}

    fn visit_cpp_block(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_cpp_statement(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_code_attributes(self, ast, id);
    }

    fn visit_comment(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_code_attributes(self, ast, id);
    }

    fn visit_error_element(&mut self, ast: &'ast Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_reference_element(&mut self, _ast: &'ast Ast, _id: NodeId) {}
}

/// Visits the code attributes, then the primary children of `id`.
pub fn walk_node<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, ast: &'ast Ast, id: NodeId) {
    walk_code_attributes(visitor, ast, id);
    walk_children(visitor, ast, id);
}

pub fn walk_code_attributes<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, ast: &'ast Ast, id: NodeId) {
    for attribute in ast[id].kind().code_attributes() {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            visitor.visit_node(ast, attribute)
        });
    }
}

pub fn walk_children<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, ast: &'ast Ast, id: NodeId) {
    for &child in ast[id].children() {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            visitor.visit_node(ast, child)
        });
    }
}

impl Ast {
    /// Starts `visitor` at `id`.
    pub fn accept<'ast, V: Visitor<'ast> + ?Sized>(&'ast self, id: NodeId, visitor: &mut V) {
        visitor.visit_node(self, id);
    }
}

/// Counts visited nodes per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeCounter {
    pub by_kind: BTreeMap<&'static str, usize>,
}

impl NodeCounter {
    pub fn total(&self) -> usize {
        self.by_kind.values().sum()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.by_kind.get(kind).copied().unwrap_or(0)
    }
}

impl<'ast> Visitor<'ast> for NodeCounter {
    fn visit_node(&mut self, ast: &'ast Ast, id: NodeId) {
        *self.by_kind.entry(ast[id].kind().name()).or_insert(0) += 1;
        walk_node(self, ast, id);
    }
}
