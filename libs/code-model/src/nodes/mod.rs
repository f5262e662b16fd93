//! Fundamental AST node definitions.
//!
//! Every node carries its presence condition, an optional local condition and
//! its source location. Nodes live in an [`Ast`](crate::Ast) arena and refer
//! to each other through [`NodeId`]s: primary children and code attributes
//! are owned, while reference targets, switch case lists and branch sibling
//! lists are plain non-owning ids into the same arena.

use config::constants::UNKNOWN_LINE;
use formula::Formula;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Stable index of a node inside one [`Ast`](crate::Ast).
///
/// # Examples
/// ```
/// use code_model::{Ast, Formula, NodeKind};
/// let mut ast = Ast::new();
/// let id = ast.add_node(Formula::TRUE, None, NodeKind::CodeList).unwrap();
/// assert_eq!(id.index(), 0);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Provenance of a node.
///
/// Lines use [`UNKNOWN_LINE`] when the front end does not report them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: Option<Arc<Path>>,
    pub line_start: i32,
    pub line_end: i32,
}

impl SourceLocation {
    /// Location in `file` with unknown lines.
    pub fn in_file(file: Arc<Path>) -> Self {
        Self {
            file: Some(file),
            ..Self::default()
        }
    }

    /// Returns a copy with the given line range.
    pub fn with_lines(mut self, line_start: i32, line_end: i32) -> Self {
        self.line_start = line_start;
        self.line_end = line_end;
        self
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self {
            file: None,
            line_start: UNKNOWN_LINE,
            line_end: UNKNOWN_LINE,
        }
    }
}

/// One element of the variability-aware AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) presence_condition: Formula,
    pub(crate) condition: Option<Formula>,
    pub(crate) location: SourceLocation,
    pub(crate) kind: NodeKind,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(presence_condition: Formula, condition: Option<Formula>, kind: NodeKind) -> Self {
        Self {
            presence_condition,
            condition,
            location: SourceLocation::default(),
            kind,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Accumulated condition under which this node is compiled.
    pub fn presence_condition(&self) -> &Formula {
        &self.presence_condition
    }

    /// Condition introduced by this node alone, if any.
    pub fn condition(&self) -> Option<&Formula> {
        self.condition.as_ref()
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Primary children, in source order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Owner of this node (primary parent or the node holding it as code).
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// The closed set of node variants.
///
/// Fields holding "code" (`header`, `code`, `if_condition`, ...) point at
/// [`NodeKind::Code`], [`NodeKind::CodeList`] or [`NodeKind::CppBlock`] nodes
/// owned by this node but not listed among its children.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    File { path: PathBuf },
    Function { name: String, header: NodeId },
    CompoundStatement,
    SingleStatement { kind: StatementKind, code: NodeId },
    /// Jump target; deliberately not counted as a statement.
    Label { code: NodeId },
    BranchStatement {
        kind: BranchKind,
        if_condition: Option<NodeId>,
        /// Every branch of the same if-structure, in source order.
        siblings: Vec<NodeId>,
    },
    ElseStatement { kind: ElseKind, else_condition: Option<NodeId> },
    LoopStatement { kind: LoopKind, loop_condition: NodeId },
    SwitchStatement {
        header: NodeId,
        /// Case statements of this switch, in source order.
        cases: Vec<NodeId>,
    },
    CaseStatement { kind: CaseKind, case_condition: Option<NodeId> },
    TypeDefinition { kind: TypeDefKind, declaration: NodeId },
    CodeList,
    Code { text: String },
    CppBlock { kind: CppBlockKind },
    CppStatement { kind: CppStatementKind, expression: Option<NodeId> },
    Comment { content: NodeId },
    ErrorElement { text: String },
    ReferenceElement { target: NodeId },
}

impl NodeKind {
    /// Discriminator name, also used by the JSON cache.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::File { .. } => "File",
            NodeKind::Function { .. } => "Function",
            NodeKind::CompoundStatement => "CompoundStatement",
            NodeKind::SingleStatement { .. } => "SingleStatement",
            NodeKind::Label { .. } => "Label",
            NodeKind::BranchStatement { .. } => "BranchStatement",
            NodeKind::ElseStatement { .. } => "ElseStatement",
            NodeKind::LoopStatement { .. } => "LoopStatement",
            NodeKind::SwitchStatement { .. } => "SwitchStatement",
            NodeKind::CaseStatement { .. } => "CaseStatement",
            NodeKind::TypeDefinition { .. } => "TypeDefinition",
            NodeKind::CodeList => "CodeList",
            NodeKind::Code { .. } => "Code",
            NodeKind::CppBlock { .. } => "CppBlock",
            NodeKind::CppStatement { .. } => "CppStatement",
            NodeKind::Comment { .. } => "Comment",
            NodeKind::ErrorElement { .. } => "ErrorElement",
            NodeKind::ReferenceElement { .. } => "ReferenceElement",
        }
    }

    /// Whether this variant may hold primary children.
    pub fn accepts_children(&self) -> bool {
        !matches!(
            self,
            NodeKind::SingleStatement { .. }
                | NodeKind::Label { .. }
                | NodeKind::Code { .. }
                | NodeKind::CppStatement { .. }
                | NodeKind::Comment { .. }
                | NodeKind::ReferenceElement { .. }
        )
    }

    /// Whether this variant is possibly-variable unparsed code.
    pub fn is_code(&self) -> bool {
        matches!(
            self,
            NodeKind::Code { .. } | NodeKind::CodeList | NodeKind::CppBlock { .. }
        )
    }

    /// Code attributes owned by this node, in source order.
    pub fn code_attributes(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Function { header, .. } | NodeKind::SwitchStatement { header, .. } => {
                vec![*header]
            }
            NodeKind::SingleStatement { code, .. } | NodeKind::Label { code } => vec![*code],
            NodeKind::LoopStatement { loop_condition, .. } => vec![*loop_condition],
            NodeKind::TypeDefinition { declaration, .. } => vec![*declaration],
            NodeKind::Comment { content } => vec![*content],
            NodeKind::BranchStatement { if_condition: code, .. }
            | NodeKind::ElseStatement { else_condition: code, .. }
            | NodeKind::CaseStatement { case_condition: code, .. }
            | NodeKind::CppStatement { expression: code, .. } => code.iter().copied().collect(),
            NodeKind::File { .. }
            | NodeKind::CompoundStatement
            | NodeKind::CodeList
            | NodeKind::Code { .. }
            | NodeKind::CppBlock { .. }
            | NodeKind::ErrorElement { .. }
            | NodeKind::ReferenceElement { .. } => Vec::new(),
        }
    }

    /// Non-owning links held by this node.
    pub fn references(&self) -> Vec<NodeId> {
        match self {
            NodeKind::BranchStatement { siblings, .. } => siblings.clone(),
            NodeKind::SwitchStatement { cases, .. } => cases.clone(),
            NodeKind::ReferenceElement { target } => vec![*target],
            _ => Vec::new(),
        }
    }
}

macro_rules! tag_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            /// Tag text as written by the front end and the JSON cache.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Parses the tag text.
            pub fn parse(text: &str) -> Option<Self> {
                match text {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

tag_enum! {
    /// What a [`NodeKind::SingleStatement`] contains.
    StatementKind {
        Declaration => "DECLARATION",
        Expression => "EXPRESSION",
        Continue => "CONTINUE",
        Break => "BREAK",
        Goto => "GOTO",
        Return => "RETURN",
        Empty => "EMPTY_STATEMENT",
    }
}

tag_enum! {
    BranchKind {
        If => "IF",
        ElseIf => "ELSE_IF",
        Else => "ELSE",
    }
}

tag_enum! {
    ElseKind {
        Else => "ELSE",
        ElseIf => "ELSE_IF",
    }
}

tag_enum! {
    LoopKind {
        For => "FOR",
        While => "WHILE",
        DoWhile => "DO_WHILE",
    }
}

tag_enum! {
    CaseKind {
        Case => "CASE",
        Default => "DEFAULT",
    }
}

tag_enum! {
    TypeDefKind {
        Struct => "STRUCT",
        Union => "UNION",
        Enum => "ENUM",
        Typedef => "TYPEDEF",
    }
}

tag_enum! {
    /// Directive opening a conditional region.
    CppBlockKind {
        If => "IF",
        Ifdef => "IFDEF",
        Ifndef => "IFNDEF",
        ElseIf => "ELSEIF",
        Else => "ELSE",
    }
}

tag_enum! {
    /// Non-block preprocessor directive.
    CppStatementKind {
        Define => "DEFINE",
        Undef => "UNDEF",
        Include => "INCLUDE",
        Pragma => "PRAGMA",
        Error => "ERROR",
        Warning => "WARNING",
        Line => "LINE",
        Empty => "EMPTY",
    }
}
