//! File, block, simple statement, comment and directive rules.

use super::{kinds, refs, ConditionScope, Converter};
use crate::error::ConvertError;
use crate::nodes::{CppStatementKind, NodeId, NodeKind, StatementKind};
use crate::raw::RawNode;

impl Converter {
    /// `unit`: the whole file.
    pub(crate) fn convert_file_unit(
        &mut self,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let path = self.source_file().to_path_buf();
        let file = self.new_node(scope, NodeKind::File { path })?;
        let nested = self.convert_sequence(children, scope, false, kinds::UNIT)?;
        self.nest_all(file, nested)?;
        Ok(file)
    }

    /// `block`: every child except literal braces.
    pub(crate) fn convert_block(
        &mut self,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let block = self.new_node(scope, NodeKind::CompoundStatement)?;
        let nested = self.convert_sequence(children, scope, true, kinds::BLOCK)?;
        self.nest_all(block, nested)?;
        Ok(block)
    }

    /// Simple statements: all children merge into one code span.
    pub(crate) fn convert_statement(
        &mut self,
        kind: StatementKind,
        raw_kind: &str,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let code = self.make_code(&refs(children), scope, raw_kind)?;
        self.new_node(scope, NodeKind::SingleStatement { kind, code })
    }

    pub(crate) fn convert_label(
        &mut self,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let code = self.make_code(&refs(children), scope, kinds::LABEL)?;
        self.new_node(scope, NodeKind::Label { code })
    }

    pub(crate) fn convert_comment(
        &mut self,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let content = self.make_code(&refs(children), scope, kinds::COMMENT)?;
        self.new_node(scope, NodeKind::Comment { content })
    }

    /// Non-block directive; the tokens after the directive name become its expression.
    pub(crate) fn convert_directive(
        &mut self,
        kind: CppStatementKind,
        raw_kind: &str,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let tokens: Vec<&RawNode> = children
            .iter()
            .skip_while(|child| child.is_literal(raw_kind))
            .collect();
        let expression = if tokens.is_empty() {
            None
        } else {
            Some(self.make_code(&tokens, scope, raw_kind)?)
        };
        self.new_node(scope, NodeKind::CppStatement { kind, expression })
    }

    /// `error`: a region the front end failed to parse. Whatever it still
    /// recognized below is kept.
    pub(crate) fn convert_error_unit(
        &mut self,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let element = self.new_node(
            scope,
            NodeKind::ErrorElement {
                text: "syntax error reported by the front end".to_string(),
            },
        )?;
        let nested = self.convert_sequence(children, scope, false, kinds::ERROR)?;
        self.nest_all(element, nested)?;
        Ok(element)
    }
}
