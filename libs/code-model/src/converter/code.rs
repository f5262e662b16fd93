//! Code merging.
//!
//! A contiguous range of raw children becomes one code node: adjacent
//! literal text collapses into a single `Code`, and every preprocessor
//! block becomes a `CppBlock` whose children are merged the same way.
//! Several parts are wrapped in a `CodeList`.

use super::{ConditionScope, Converter};
use crate::error::ConvertError;
use crate::nodes::{CppBlockKind, NodeId, NodeKind};
use crate::raw::RawNode;
use formula::Formula;

/// Pending output of one merge level.
#[derive(Default)]
struct CodeParts {
    text: String,
    parts: Vec<NodeId>,
}

impl CodeParts {
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(text);
    }
}

impl Converter {
    /// Merges `range` into a single code node.
    ///
    /// Returns the only part directly, or a `CodeList` holding all parts.
    /// An empty range (or one without any text or block) is an error.
    pub(crate) fn make_code(
        &mut self,
        range: &[&RawNode],
        scope: &ConditionScope,
        kind: &str,
    ) -> Result<NodeId, ConvertError> {
        let mut parts = self.merge_parts(range.iter().copied(), scope)?;
        match parts.len() {
            0 => Err(ConvertError::EmptyCodeRange {
                kind: kind.to_string(),
            }),
            1 => Ok(parts.remove(0)),
            _ => {
                let list = self.new_node(scope, NodeKind::CodeList)?;
                self.nest_all(list, parts)?;
                Ok(list)
            }
        }
    }

    fn merge_parts<'r>(
        &mut self,
        range: impl IntoIterator<Item = &'r RawNode>,
        scope: &ConditionScope,
    ) -> Result<Vec<NodeId>, ConvertError> {
        let mut pending = CodeParts::default();
        for raw in range {
            self.merge_into(raw, scope, &mut pending)?;
        }
        self.flush_text(&mut pending, scope)?;
        Ok(pending.parts)
    }

    fn merge_into(
        &mut self,
        raw: &RawNode,
        scope: &ConditionScope,
        pending: &mut CodeParts,
    ) -> Result<(), ConvertError> {
        match raw {
            RawNode::Literal { text } => pending.push_text(text),
            // units inside a code range contribute their tokens only
            RawNode::Unit { children, .. } => {
                for child in children {
                    self.merge_into(child, scope, pending)?;
                }
            }
            RawNode::Preprocessor {
                block_kind,
                condition,
                children,
            } => {
                self.flush_text(pending, scope)?;
                let (block, inner) = self.open_cpp_block(*block_kind, condition, scope)?;
                let nested = self.merge_parts(children, &inner)?;
                self.nest_all(block, nested)?;
                pending.parts.push(block);
            }
        }
        Ok(())
    }

    fn flush_text(&mut self, pending: &mut CodeParts, scope: &ConditionScope) -> Result<(), ConvertError> {
        if pending.text.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut pending.text);
        let code = self.new_node(scope, NodeKind::Code { text })?;
        pending.parts.push(code);
        Ok(())
    }

    /// Creates an empty `CppBlock` and the scope of its body.
    ///
    /// The block's presence condition already includes its own condition.
    pub(crate) fn open_cpp_block(
        &mut self,
        kind: CppBlockKind,
        condition: &Formula,
        scope: &ConditionScope,
    ) -> Result<(NodeId, ConditionScope), ConvertError> {
        let inner = scope.enter_block(condition);
        let block = self.new_conditional_node(
            inner.current_condition(),
            Some(condition.clone()),
            NodeKind::CppBlock { kind },
        )?;
        Ok((block, inner))
    }

    /// Preprocessor block in statement position: its body is converted structurally.
    pub(crate) fn convert_cpp_block(
        &mut self,
        kind: CppBlockKind,
        condition: &Formula,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let (block, inner) = self.open_cpp_block(kind, condition, scope)?;
        let nested = self.convert_sequence(children, &inner, false, kind.as_str())?;
        self.nest_all(block, nested)?;
        Ok(block)
    }
}
