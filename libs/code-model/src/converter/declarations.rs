//! Functions and type definitions.

use super::{kinds, refs, ConditionScope, Converter};
use crate::error::ConvertError;
use crate::nodes::{NodeId, NodeKind, TypeDefKind};
use crate::raw::RawNode;

impl Converter {
    /// `function`: header is everything but the last child (the body).
    pub(crate) fn convert_function(
        &mut self,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let Some((body, header)) = children.split_last() else {
            return self.malformed(kinds::FUNCTION, "function without body", scope);
        };
        if header.is_empty() {
            return self.malformed(kinds::FUNCTION, "function without header", scope);
        }
        let name = function_name(header);
        let header = self.make_code(&refs(header), scope, kinds::FUNCTION)?;
        let function = self.new_node(scope, NodeKind::Function { name, header })?;
        let body = self.convert_node(body, scope)?;
        self.nest_optional(function, body)?;
        Ok(function)
    }

    /// `struct` / `union` / `enum`.
    ///
    /// The body block is the second-to-last child when a trailing `;` is
    /// present and the last child otherwise (inline use inside a larger
    /// declaration).
    pub(crate) fn convert_compound_type(
        &mut self,
        kind: TypeDefKind,
        raw_kind: &str,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let end = declaration_end(children);
        let body_index = end
            .checked_sub(1)
            .filter(|&i| children[i].is_unit(kinds::BLOCK));
        let declaration = self.declaration_code(
            children[..body_index.unwrap_or(end)].iter().collect(),
            raw_kind,
            scope,
        )?;
        let definition = self.new_node(scope, NodeKind::TypeDefinition { kind, declaration })?;
        if let Some(index) = body_index {
            let nested = self.convert_sequence(children[index].children(), scope, true, raw_kind)?;
            self.nest_all(definition, nested)?;
        }
        Ok(definition)
    }

    /// `typedef`, with an optional struct/union/enum or block between the
    /// keyword and the alias name.
    pub(crate) fn convert_typedef(
        &mut self,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let end = declaration_end(children);
        let inner = children[..end].iter().position(|child| {
            [kinds::STRUCT, kinds::UNION, kinds::ENUM, kinds::BLOCK]
                .iter()
                .any(|k| child.is_unit(k))
        });
        let declaration_tokens: Vec<&RawNode> = children[..end]
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != inner)
            .map(|(_, child)| child)
            .collect();
        let declaration = self.declaration_code(declaration_tokens, kinds::TYPEDEF, scope)?;
        let definition = self.new_node(
            scope,
            NodeKind::TypeDefinition {
                kind: TypeDefKind::Typedef,
                declaration,
            },
        )?;

        match inner.map(|i| &children[i]) {
            Some(body) if body.is_unit(kinds::BLOCK) => {
                let nested = self.convert_sequence(body.children(), scope, true, kinds::TYPEDEF)?;
                self.nest_all(definition, nested)?;
            }
            Some(aggregate) => {
                let nested = self.convert_node(aggregate, scope)?;
                self.nest_optional(definition, nested)?;
            }
            None => {}
        }
        Ok(definition)
    }

    /// Merges the declaration tokens; an anonymous declaration falls back to
    /// the keyword itself.
    fn declaration_code(
        &mut self,
        tokens: Vec<&RawNode>,
        raw_kind: &str,
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        if tokens.is_empty() {
            let keyword = RawNode::literal(raw_kind);
            return self.make_code(&[&keyword], scope, raw_kind);
        }
        self.make_code(&tokens, scope, raw_kind)
    }
}

/// Number of children before a trailing `;`.
fn declaration_end(children: &[RawNode]) -> usize {
    let has_semicolon = children.last().is_some_and(|c| c.is_literal(";"));
    children.len() - usize::from(has_semicolon)
}

/// Function name: the identifier right before the first `(` of the header.
fn function_name(header: &[RawNode]) -> String {
    let text = header
        .iter()
        .filter_map(RawNode::text)
        .collect::<Vec<_>>()
        .join(" ");
    let before_parameters = text.split('(').next().unwrap_or_default();
    before_parameters
        .split_whitespace()
        .last()
        .map(|word| word.trim_start_matches('*').to_string())
        .unwrap_or_default()
}
