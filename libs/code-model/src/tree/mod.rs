//! # AST Arena
//!
//! [`Ast`] owns every node of one converted file. Nodes are addressed by
//! [`NodeId`]; each node has at most one owner, which is either its primary
//! parent or the node holding it as a code attribute.
//!
//! ## Usage
//!
//! ```rust
//! use code_model::{Ast, Formula, NodeKind};
//!
//! let mut ast = Ast::new();
//! let block = ast.add_node(Formula::TRUE, None, NodeKind::CompoundStatement).unwrap();
//! let code = ast.add_node(Formula::TRUE, None, NodeKind::Code { text: "x = 1 ;".into() }).unwrap();
//! ast.add_nested_element(block, code).unwrap();
//! assert_eq!(ast.nested_element_count(block), 1);
//! assert_eq!(ast.nested_element(block, 0).unwrap(), code);
//! ```

mod compare;

use crate::error::AstError;
use crate::nodes::{Node, NodeId, NodeKind, SourceLocation};
use formula::Formula;
use std::ops::Index;

/// Arena holding one variability-aware syntax tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the arena (including nodes not attached to the root).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Marks `id` as the root. The root must not be owned by another node.
    pub fn set_root(&mut self, id: NodeId) -> Result<(), AstError> {
        if self.get(id)?.parent.is_some() {
            return Err(AstError::AlreadyNested(id));
        }
        self.root = Some(id);
        Ok(())
    }

    /// Looks up a node, failing for ids of other trees.
    pub fn get(&self, id: NodeId) -> Result<&Node, AstError> {
        self.nodes.get(id.index()).ok_or(AstError::ForeignNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, AstError> {
        self.nodes.get_mut(id.index()).ok_or(AstError::ForeignNode(id))
    }

    /// Iterates over all nodes in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    /// Adds a node and takes ownership of its code attributes.
    ///
    /// Code attributes must be unowned code nodes of this tree; non-owning
    /// links (reference target, siblings, cases) must exist.
    pub fn add_node(
        &mut self,
        presence_condition: Formula,
        condition: Option<Formula>,
        kind: NodeKind,
    ) -> Result<NodeId, AstError> {
        for attr in kind.code_attributes() {
            let node = self.get(attr)?;
            if !node.kind.is_code() {
                return Err(AstError::NotCode { node: attr, kind: node.kind.name() });
            }
            if node.parent.is_some() {
                return Err(AstError::AlreadyNested(attr));
            }
        }
        for link in kind.references() {
            self.get(link)?;
        }
        Ok(self.push(Node::new(presence_condition, condition, kind)))
    }

    /// Appends a node without validation; links are patched by the caller.
    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let attributes = node.kind.code_attributes();
        self.nodes.push(node);
        for attr in attributes {
            if let Some(owned) = self.nodes.get_mut(attr.index()) {
                owned.parent = Some(id);
            }
        }
        id
    }

    /// Assembles a tree whose ownership was validated by the caller.
    pub(crate) fn from_parts(nodes: Vec<Node>, root: Option<NodeId>) -> Self {
        Self { nodes, root }
    }

    /// Attaches source file and line metadata after construction.
    pub fn set_location(&mut self, id: NodeId, location: SourceLocation) -> Result<(), AstError> {
        self.get_mut(id)?.location = location;
        Ok(())
    }

    // =========================================================================
    // PRIMARY NESTING
    // =========================================================================

    /// Number of primary children; `0` for leaf variants.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a node of this tree, like indexing; use
    /// [`Ast::get`] to check foreign ids first.
    pub fn nested_element_count(&self, id: NodeId) -> usize {
        self[id].children.len()
    }

    /// Bounds-checked access to the `index`-th primary child.
    pub fn nested_element(&self, id: NodeId, index: usize) -> Result<NodeId, AstError> {
        let children = &self.get(id)?.children;
        children.get(index).copied().ok_or(AstError::IndexOutOfBounds {
            node: id,
            index,
            len: children.len(),
        })
    }

    /// Appends `child` to the primary children of `parent`.
    pub fn add_nested_element(&mut self, parent: NodeId, child: NodeId) -> Result<(), AstError> {
        self.check_adoptable(parent, child)?;
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Replaces the direct child `old` of `parent` with `new`.
    ///
    /// `old` becomes unowned; `new` takes its position.
    pub fn replace_nested_element(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: NodeId,
    ) -> Result<(), AstError> {
        let position = self
            .get(parent)?
            .children
            .iter()
            .position(|&c| c == old)
            .ok_or(AstError::NotNested { parent, child: old })?;
        if old == new {
            return Ok(());
        }
        self.check_adoptable(parent, new)?;
        self.nodes[parent.index()].children[position] = new;
        self.nodes[old.index()].parent = None;
        self.nodes[new.index()].parent = Some(parent);
        Ok(())
    }

    /// Removes `child` from the primary children of `parent`, leaving it unowned.
    pub(crate) fn detach_nested_element(
        &mut self,
        parent: NodeId,
        child: NodeId,
    ) -> Result<(), AstError> {
        let position = self
            .get(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(AstError::NotNested { parent, child })?;
        self.nodes[parent.index()].children.remove(position);
        self.nodes[child.index()].parent = None;
        Ok(())
    }

    fn check_adoptable(&self, parent: NodeId, child: NodeId) -> Result<(), AstError> {
        let parent_node = self.get(parent)?;
        let child_node = self.get(child)?;
        if !parent_node.kind.accepts_children() {
            return Err(AstError::LeafNode { node: parent, kind: parent_node.kind.name() });
        }
        if child_node.parent.is_some() || self.root == Some(child) {
            return Err(AstError::AlreadyNested(child));
        }
        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == child {
                return Err(AstError::WouldCycle { parent, child });
            }
            cursor = self.nodes[current.index()].parent;
        }
        Ok(())
    }

    // =========================================================================
    // CROSS LINKS
    // =========================================================================

    /// Case statements recorded for a switch, in source order; empty for
    /// other variants.
    ///
    /// # Panics
    ///
    /// Panics if `switch` is not a node of this tree, like indexing; use
    /// [`Ast::get`] to check foreign ids first.
    pub fn cases_of(&self, switch: NodeId) -> &[NodeId] {
        match &self[switch].kind {
            NodeKind::SwitchStatement { cases, .. } => cases,
            _ => &[],
        }
    }

    /// All branches of the if-structure `branch` belongs to.
    ///
    /// # Panics
    ///
    /// Panics if `branch` is not a node of this tree, like indexing; use
    /// [`Ast::get`] to check foreign ids first.
    pub fn siblings_of(&self, branch: NodeId) -> &[NodeId] {
        match &self[branch].kind {
            NodeKind::BranchStatement { siblings, .. } => siblings,
            _ => &[],
        }
    }

    /// Target of a reference element.
    ///
    /// # Panics
    ///
    /// Panics if `reference` is not a node of this tree, like indexing; use
    /// [`Ast::get`] to check foreign ids first.
    pub fn reference_target(&self, reference: NodeId) -> Option<NodeId> {
        match self[reference].kind {
            NodeKind::ReferenceElement { target } => Some(target),
            _ => None,
        }
    }

    pub(crate) fn set_cases(&mut self, switch: NodeId, new_cases: Vec<NodeId>) {
        if let NodeKind::SwitchStatement { cases, .. } = &mut self.nodes[switch.index()].kind {
            *cases = new_cases;
        }
    }

    pub(crate) fn set_siblings(&mut self, branch: NodeId, new_siblings: Vec<NodeId>) {
        if let NodeKind::BranchStatement { siblings, .. } = &mut self.nodes[branch.index()].kind {
            *siblings = new_siblings;
        }
    }

    // =========================================================================
    // CODE TEXT
    // =========================================================================

    /// Space-joined text of a code node, ignoring conditional structure.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a node of this tree, like indexing; use
    /// [`Ast::get`] to check foreign ids first.
    ///
    /// # Example
    ///
    /// ```rust
    /// use code_model::{Ast, Formula, NodeKind};
    ///
    /// let mut ast = Ast::new();
    /// let code = ast.add_node(Formula::TRUE, None, NodeKind::Code { text: "x > 0".into() }).unwrap();
    /// assert_eq!(ast.code_text(code), "x > 0");
    /// ```
    pub fn code_text(&self, id: NodeId) -> String {
        match &self[id].kind {
            NodeKind::Code { text } => text.clone(),
            _ => self[id]
                .children
                .iter()
                .map(|&c| self.code_text(c))
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Ids reachable from `start` through primary nesting and code
    /// attributes, in pre-order (attributes before children).
    pub fn descendants(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            out.push(id);
            let node = &self[id];
            let owned = node.kind.code_attributes().into_iter().chain(node.children.iter().copied());
            let owned: Vec<NodeId> = owned.collect();
            stack.extend(owned.into_iter().rev());
        }
        out
    }
}

impl Index<NodeId> for Ast {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}
