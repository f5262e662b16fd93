//! If-structures, loops and switch statements.

use super::{kinds, refs, ConditionScope, Converter};
use crate::error::ConvertError;
use crate::nodes::{BranchKind, CaseKind, LoopKind, NodeId, NodeKind};
use crate::raw::RawNode;

impl Converter {
    // =========================================================================
    // IF / ELSE IF / ELSE
    // =========================================================================

    /// `if`: the leading plain-code children form the condition; the rest is
    /// the then-part followed by the `elseif`/`else` branches.
    ///
    /// Every branch of the structure is a primary child of the `if` node, and
    /// each branch (the `if` included) lists all of them as siblings.
    pub(crate) fn convert_if(
        &mut self,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let split = first_structural(children).unwrap_or(children.len());
        let if_condition = self.optional_code(&children[..split], scope, kinds::IF)?;
        let branch = self.new_node(
            scope,
            NodeKind::BranchStatement {
                kind: BranchKind::If,
                if_condition,
                siblings: Vec::new(),
            },
        )?;

        let nested = self.convert_sequence(&children[split..], scope, true, kinds::IF)?;
        let mut siblings = vec![branch];
        for &child in &nested {
            self.collect_branches(child, &mut siblings);
        }
        self.nest_all(branch, nested)?;
        for &member in &siblings {
            self.ast.set_siblings(member, siblings.clone());
        }
        Ok(branch)
    }

    /// Finds `elseif`/`else` branches directly below an if, looking through
    /// preprocessor blocks and into chained else-if branches.
    fn collect_branches(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let node = &self.ast[id];
        match node.kind() {
            NodeKind::BranchStatement { kind, .. } if *kind != BranchKind::If => {
                out.push(id);
                for &child in node.children() {
                    self.collect_branches(child, out);
                }
            }
            NodeKind::CppBlock { .. } => {
                for &child in node.children() {
                    self.collect_branches(child, out);
                }
            }
            _ => {}
        }
    }

    /// `elseif` / `else`: an optional condition prefix, then the body with
    /// literal braces dropped.
    pub(crate) fn convert_else_branch(
        &mut self,
        kind: BranchKind,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let (if_condition, body) = match kind {
            BranchKind::ElseIf => {
                let Some(split) = first_structural(children) else {
                    return self.malformed(
                        kinds::ELSEIF,
                        "else-if branch has no statement after its condition",
                        scope,
                    );
                };
                let condition = self.optional_code(&children[..split], scope, kinds::ELSEIF)?;
                (condition, &children[split..])
            }
            _ => {
                let start = usize::from(children.first().is_some_and(|c| c.is_literal(kinds::ELSE)));
                (None, &children[start..])
            }
        };

        let branch = self.new_node(
            scope,
            NodeKind::BranchStatement {
                kind,
                if_condition,
                siblings: Vec::new(),
            },
        )?;
        let raw_kind = if kind == BranchKind::ElseIf { kinds::ELSEIF } else { kinds::ELSE };
        let nested = self.convert_sequence(body, scope, true, raw_kind)?;
        self.nest_all(branch, nested)?;
        Ok(branch)
    }

    /// Merges the non-brace children of `range`, or `None` if nothing is left.
    fn optional_code(
        &mut self,
        range: &[RawNode],
        scope: &ConditionScope,
        kind: &str,
    ) -> Result<Option<NodeId>, ConvertError> {
        let tokens: Vec<&RawNode> = range.iter().filter(|c| !c.is_brace()).collect();
        if tokens.is_empty() {
            return Ok(None);
        }
        self.make_code(&tokens, scope, kind).map(Some)
    }

    // =========================================================================
    // LOOPS
    // =========================================================================

    /// `for` / `while`: the last child is the body, the rest is the condition.
    pub(crate) fn convert_loop(
        &mut self,
        kind: LoopKind,
        raw_kind: &str,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let Some((body, condition)) = children.split_last() else {
            return self.malformed(raw_kind, "loop without body", scope);
        };
        if condition.is_empty() {
            return self.malformed(raw_kind, "loop without condition", scope);
        }
        let loop_condition = self.make_code(&refs(condition), scope, raw_kind)?;
        self.finish_loop(kind, loop_condition, body, scope)
    }

    /// `do`: `do <body> while <condition...> ;`.
    pub(crate) fn convert_do(
        &mut self,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        if children.len() < 5 {
            return self.malformed(
                kinds::DO,
                "do-while needs a body, a `while` keyword, a condition and `;`",
                scope,
            );
        }
        let condition = &children[3..children.len() - 1];
        let loop_condition = self.make_code(&refs(condition), scope, kinds::DO)?;
        self.finish_loop(LoopKind::DoWhile, loop_condition, &children[1], scope)
    }

    fn finish_loop(
        &mut self,
        kind: LoopKind,
        loop_condition: NodeId,
        body: &RawNode,
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let node = self.new_node(scope, NodeKind::LoopStatement { kind, loop_condition })?;
        let body = self.convert_node(body, scope)?;
        self.nest_optional(node, body)?;
        Ok(node)
    }

    // =========================================================================
    // SWITCH / CASE
    // =========================================================================

    /// `switch`: header is everything but the last child (the body).
    ///
    /// Statements following a case inside the body are regrouped under it,
    /// and the switch records its cases in source order.
    pub(crate) fn convert_switch(
        &mut self,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let Some((body, header)) = children.split_last() else {
            return self.malformed(kinds::SWITCH, "switch without body", scope);
        };
        if header.is_empty() {
            return self.malformed(kinds::SWITCH, "switch without header", scope);
        }
        let header = self.make_code(&refs(header), scope, kinds::SWITCH)?;
        let switch = self.new_node(
            scope,
            NodeKind::SwitchStatement {
                header,
                cases: Vec::new(),
            },
        )?;
        if let Some(body) = self.convert_node(body, scope)? {
            self.regroup_cases(body)?;
            self.ast.add_nested_element(switch, body)?;
        }
        let cases = self.collect_cases(switch);
        self.ast.set_cases(switch, cases);
        Ok(switch)
    }

    fn regroup_cases(&mut self, body: NodeId) -> Result<(), ConvertError> {
        if !matches!(self.ast[body].kind(), NodeKind::CompoundStatement) {
            return Ok(());
        }
        let statements = self.ast[body].children().to_vec();
        let mut current = None;
        for statement in statements {
            if matches!(self.ast[statement].kind(), NodeKind::CaseStatement { .. }) {
                current = Some(statement);
            } else if let Some(case) = current {
                self.ast.detach_nested_element(body, statement)?;
                self.ast.add_nested_element(case, statement)?;
            }
        }
        Ok(())
    }

    /// Case statements below `switch` in pre-order, not entering nested switches.
    fn collect_cases(&self, switch: NodeId) -> Vec<NodeId> {
        let mut cases = Vec::new();
        let mut stack: Vec<NodeId> = self.ast[switch].children().iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.ast[id];
            match node.kind() {
                NodeKind::SwitchStatement { .. } => continue,
                NodeKind::CaseStatement { .. } => cases.push(id),
                _ => {}
            }
            stack.extend(node.children().iter().rev().copied());
        }
        cases
    }

    /// `case` / `default`: a fixed-size condition prefix (3 tokens for
    /// `case x :`, the keyword alone for `default`), then the statements.
    pub(crate) fn convert_case(
        &mut self,
        kind: CaseKind,
        raw_kind: &str,
        children: &[RawNode],
        scope: &ConditionScope,
    ) -> Result<NodeId, ConvertError> {
        let prefix = match kind {
            CaseKind::Case => 3,
            CaseKind::Default => 1,
        }
        .min(children.len());
        let mut rest = &children[prefix..];
        let case_condition = match kind {
            CaseKind::Case if prefix > 0 => {
                Some(self.make_code(&refs(&children[..prefix]), scope, raw_kind)?)
            }
            CaseKind::Case => None,
            CaseKind::Default => {
                if rest.first().is_some_and(|c| c.is_literal(":")) {
                    rest = &rest[1..];
                }
                None
            }
        };
        let case = self.new_node(scope, NodeKind::CaseStatement { kind, case_condition })?;
        let nested = self.convert_sequence(rest, scope, false, raw_kind)?;
        self.nest_all(case, nested)?;
        Ok(case)
    }
}

/// Index of the first child that is not plain code.
fn first_structural(children: &[RawNode]) -> Option<usize> {
    children.iter().position(|child| !child.is_code())
}
