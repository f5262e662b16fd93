//! Human-readable tree dumps.
//!
//! Each node renders on one line as `[presence condition] summary`, indented
//! one [`RENDER_INDENT`] per depth. Code attributes are summarized inline by
//! their text; only primary children get lines of their own.

use crate::nodes::{NodeId, NodeKind};
use crate::tree::Ast;
use config::constants::{RenderConfig, RENDER_INDENT, TRUNCATED_CONDITION};
use formula::Formula;

impl Ast {
    /// One-line, non-recursive summary of `id`.
    pub fn element_to_string(&self, id: NodeId, indent: usize) -> String {
        self.element_line(id, indent, RenderConfig::default().condition_display_limit)
    }

    /// `id` and all its descendants, one line each.
    ///
    /// # Example
    ///
    /// ```rust
    /// use code_model::{Ast, Formula, NodeKind};
    ///
    /// let mut ast = Ast::new();
    /// let block = ast.add_node(Formula::TRUE, None, NodeKind::CompoundStatement).unwrap();
    /// let code = ast.add_node(Formula::var("A"), None, NodeKind::Code { text: "x ;".into() }).unwrap();
    /// ast.add_nested_element(block, code).unwrap();
    /// assert_eq!(ast.render(block, 0), "[1] CompoundStatement\n\t[A] Code: x ;\n");
    /// ```
    pub fn render(&self, id: NodeId, indent: usize) -> String {
        self.render_with(id, indent, RenderConfig::default())
    }

    /// Like [`Ast::render`], eliding conditions longer than the configured limit.
    pub fn render_with(&self, id: NodeId, indent: usize, config: RenderConfig) -> String {
        let limit = config.condition_display_limit;
        let mut out = String::new();
        let mut stack = vec![(id, indent)];
        while let Some((current, depth)) = stack.pop() {
            out.push_str(&self.element_line(current, depth, limit));
            out.push('\n');
            stack.extend(self[current].children().iter().rev().map(|&c| (c, depth + 1)));
        }
        out
    }

    fn element_line(&self, id: NodeId, indent: usize, limit: usize) -> String {
        let node = &self[id];
        format!(
            "{}[{}] {}",
            RENDER_INDENT.repeat(indent),
            display_condition(node.presence_condition(), limit),
            self.summary(id, limit)
        )
    }

    fn summary(&self, id: NodeId, limit: usize) -> String {
        let node = &self[id];
        let text = |code: NodeId| self.code_text(code);
        let optional = |code: &Option<NodeId>| match code {
            Some(code) => format!(": {}", self.code_text(*code)),
            None => String::new(),
        };
        match node.kind() {
            NodeKind::File { path } => format!("File {}", path.display()),
            NodeKind::Function { name, header } => format!("Function {name}: {}", text(*header)),
            NodeKind::CompoundStatement => "CompoundStatement".to_string(),
            NodeKind::SingleStatement { kind, code } => format!("SingleStatement[{kind}]: {}", text(*code)),
            NodeKind::Label { code } => format!("Label: {}", text(*code)),
            NodeKind::BranchStatement { kind, if_condition, .. } => {
                format!("BranchStatement[{kind}]{}", optional(if_condition))
            }
            NodeKind::ElseStatement { kind, else_condition } => {
                format!("ElseStatement[{kind}]{}", optional(else_condition))
            }
            NodeKind::LoopStatement { kind, loop_condition } => {
                format!("LoopStatement[{kind}]: {}", text(*loop_condition))
            }
            NodeKind::SwitchStatement { header, cases } => {
                format!("SwitchStatement: {} ({} cases)", text(*header), cases.len())
            }
            NodeKind::CaseStatement { kind, case_condition } => {
                format!("CaseStatement[{kind}]{}", optional(case_condition))
            }
            NodeKind::TypeDefinition { kind, declaration } => {
                format!("TypeDefinition[{kind}]: {}", text(*declaration))
            }
            NodeKind::CodeList => "CodeList".to_string(),
            NodeKind::Code { text } => format!("Code: {text}"),
            NodeKind::CppBlock { kind } => match node.condition() {
                Some(condition) => format!("CppBlock[{kind}] {}", display_condition(condition, limit)),
                None => format!("CppBlock[{kind}]"),
            },
            NodeKind::CppStatement { kind, expression } => {
                format!("CppStatement[{kind}]{}", optional(expression))
            }
            NodeKind::Comment { content } => format!("Comment: {}", text(*content)),
            NodeKind::ErrorElement { text } => format!("ErrorElement: {text}"),
            NodeKind::ReferenceElement { target } => format!("ReferenceElement -> {target}"),
        }
    }
}

fn display_condition(condition: &Formula, limit: usize) -> String {
    let text = condition.to_string();
    if text.chars().count() > limit {
        TRUNCATED_CONDITION.to_string()
    } else {
        text
    }
}
