//! Structural tree equality, independent of arena indices.

use super::Ast;
use crate::nodes::{NodeId, NodeKind};
use std::collections::HashMap;

impl Ast {
    /// Compares the trees below the two roots kind-by-kind and field-by-field.
    ///
    /// Non-owning links must point at corresponding nodes of each tree.
    pub fn structurally_eq(&self, other: &Ast) -> bool {
        match (self.root, other.root) {
            (None, None) => true,
            (Some(a), Some(b)) => self.subtree_eq(a, other, b),
            _ => false,
        }
    }

    /// Subtree variant of [`Ast::structurally_eq`].
    pub fn subtree_eq(&self, a: NodeId, other: &Ast, b: NodeId) -> bool {
        let left = self.descendants(a);
        let right = other.descendants(b);
        if left.len() != right.len() {
            return false;
        }
        let mapping: HashMap<NodeId, NodeId> = left.iter().copied().zip(right.iter().copied()).collect();
        let same = |x: &NodeId, y: &NodeId| mapping.get(x) == Some(y);

        left.iter().zip(right.iter()).all(|(&x, &y)| {
            let (n, m) = (&self[x], &other[y]);
            n.presence_condition == m.presence_condition
                && n.condition == m.condition
                && n.location == m.location
                && n.children.len() == m.children.len()
                && n.children.iter().zip(m.children.iter()).all(|(p, q)| same(p, q))
                && kind_eq(&n.kind, &m.kind, &same)
        })
    }
}

fn kind_eq(a: &NodeKind, b: &NodeKind, same: &impl Fn(&NodeId, &NodeId) -> bool) -> bool {
    let opt = |x: &Option<NodeId>, y: &Option<NodeId>| match (x, y) {
        (Some(x), Some(y)) => same(x, y),
        (None, None) => true,
        _ => false,
    };
    let list = |x: &[NodeId], y: &[NodeId]| {
        x.len() == y.len() && x.iter().zip(y).all(|(p, q)| same(p, q))
    };
    match (a, b) {
        (NodeKind::File { path: p }, NodeKind::File { path: q }) => p == q,
        (NodeKind::Function { name: n, header: h }, NodeKind::Function { name: m, header: g }) => {
            n == m && same(h, g)
        }
        (NodeKind::CompoundStatement, NodeKind::CompoundStatement)
        | (NodeKind::CodeList, NodeKind::CodeList) => true,
        (
            NodeKind::SingleStatement { kind: k, code: c },
            NodeKind::SingleStatement { kind: l, code: d },
        ) => k == l && same(c, d),
        (NodeKind::Label { code: c }, NodeKind::Label { code: d }) => same(c, d),
        (
            NodeKind::BranchStatement { kind: k, if_condition: c, siblings: s },
            NodeKind::BranchStatement { kind: l, if_condition: d, siblings: t },
        ) => k == l && opt(c, d) && list(s, t),
        (
            NodeKind::ElseStatement { kind: k, else_condition: c },
            NodeKind::ElseStatement { kind: l, else_condition: d },
        ) => k == l && opt(c, d),
        (
            NodeKind::LoopStatement { kind: k, loop_condition: c },
            NodeKind::LoopStatement { kind: l, loop_condition: d },
        ) => k == l && same(c, d),
        (
            NodeKind::SwitchStatement { header: h, cases: c },
            NodeKind::SwitchStatement { header: g, cases: d },
        ) => same(h, g) && list(c, d),
        (
            NodeKind::CaseStatement { kind: k, case_condition: c },
            NodeKind::CaseStatement { kind: l, case_condition: d },
        ) => k == l && opt(c, d),
        (
            NodeKind::TypeDefinition { kind: k, declaration: c },
            NodeKind::TypeDefinition { kind: l, declaration: d },
        ) => k == l && same(c, d),
        (NodeKind::Code { text: t }, NodeKind::Code { text: u }) => t == u,
        (NodeKind::CppBlock { kind: k }, NodeKind::CppBlock { kind: l }) => k == l,
        (
            NodeKind::CppStatement { kind: k, expression: c },
            NodeKind::CppStatement { kind: l, expression: d },
        ) => k == l && opt(c, d),
        (NodeKind::Comment { content: c }, NodeKind::Comment { content: d }) => same(c, d),
        (NodeKind::ErrorElement { text: t }, NodeKind::ErrorElement { text: u }) => t == u,
        (NodeKind::ReferenceElement { target: t }, NodeKind::ReferenceElement { target: u }) => {
            same(t, u)
        }
        _ => false,
    }
}
