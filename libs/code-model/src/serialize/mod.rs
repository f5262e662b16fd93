//! # JSON Cache Format
//!
//! Persists a converted [`Ast`] and reads it back.
//!
//! The document is flat: every node reachable from the root appears once in
//! `nodes`, numbered in pre-order (code attributes before children). Owned
//! sub-nodes and non-owning links are written as those integer ids.
//!
//! ```text
//! { "version": 1, "root": 0, "nodes": [
//!   { "id": 0, "type": "File", "filePath": "src/a.c", "presenceCondition": "True",
//!     "sourceFile": "src/a.c", "lineStart": -1, "lineEnd": -1, "nested": [1] },
//!   ... ] }
//! ```
//!
//! Reading assigns arena slots to all ids first and resolves links in a
//! second pass. Any inconsistency (unknown id, duplicate id, non-code
//! attribute, case or sibling link to the wrong kind, second owner,
//! unreachable node) fails the whole read.

use crate::error::FormatError;
use crate::nodes::{
    BranchKind, CaseKind, CppBlockKind, CppStatementKind, ElseKind, LoopKind, Node, NodeId,
    NodeKind, SourceLocation, StatementKind, TypeDefKind,
};
use crate::tree::Ast;
use config::constants::CACHE_FORMAT_VERSION;
use formula::Formula;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// =============================================================================
// DOCUMENT SHAPE
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    version: u32,
    root: Option<u32>,
    #[serde(default)]
    nodes: Vec<NodeRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeRecord {
    id: u32,
    #[serde(flatten)]
    kind: KindRecord,
    presence_condition: Formula,
    #[serde(default)]
    condition: Option<Formula>,
    #[serde(default)]
    source_file: Option<String>,
    line_start: i32,
    line_end: i32,
    #[serde(default)]
    nested: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
enum KindRecord {
    File { file_path: String },
    Function { name: String, header: u32 },
    CompoundStatement,
    SingleStatement { statement_type: StatementKind, code: u32 },
    Label { code: u32 },
    BranchStatement { branch_type: BranchKind, if_condition: Option<u32>, siblings: Vec<u32> },
    ElseStatement { else_type: ElseKind, else_condition: Option<u32> },
    LoopStatement { loop_type: LoopKind, loop_condition: u32 },
    SwitchStatement { header: u32, cases: Vec<u32> },
    CaseStatement { case_type: CaseKind, case_condition: Option<u32> },
    TypeDefinition { type_kind: TypeDefKind, declaration: u32 },
    CodeList,
    Code { text: String },
    CppBlock { block_type: CppBlockKind },
    CppStatement { cpp_type: CppStatementKind, cpp_expression: Option<u32> },
    Comment { content: u32 },
    ErrorElement { error_text: String },
    ReferenceElement { target: u32 },
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Writes `ast` as JSON to `writer`.
pub fn to_writer<W: Write>(ast: &Ast, writer: W) -> Result<(), FormatError> {
    let document = Document::from_ast(ast)?;
    serde_json::to_writer_pretty(writer, &document)?;
    Ok(())
}

/// Reads a tree written by [`to_writer`].
pub fn from_reader<R: Read>(reader: R) -> Result<Ast, FormatError> {
    let document: Document = deserialize_unbounded(serde_json::Deserializer::from_reader(reader))?;
    document.into_ast()
}

/// Serializes `ast` into a JSON string.
///
/// # Example
///
/// ```rust
/// use code_model::{convert_file, RawNode};
/// use code_model::serialize::{from_json_str, to_json_string};
///
/// let raw = RawNode::unit("unit", vec![RawNode::unit("break", RawNode::tokens("break ;"))]);
/// let ast = convert_file("loop.c", &raw).unwrap().ast;
/// let json = to_json_string(&ast).unwrap();
/// assert!(from_json_str(&json).unwrap().structurally_eq(&ast));
/// ```
pub fn to_json_string(ast: &Ast) -> Result<String, FormatError> {
    let document = Document::from_ast(ast)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn from_json_str(json: &str) -> Result<Ast, FormatError> {
    let document: Document = deserialize_unbounded(serde_json::Deserializer::from_str(json))?;
    document.into_ast()
}

/// Writes `ast` to the file at `path`, replacing it.
pub fn write_json(ast: &Ast, path: impl AsRef<Path>) -> Result<(), FormatError> {
    let mut writer = BufWriter::new(File::create(path)?);
    to_writer(ast, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn read_json(path: impl AsRef<Path>) -> Result<Ast, FormatError> {
    from_reader(BufReader::new(File::open(path)?))
}

/// Deserializes without serde_json's nesting limit.
///
/// Presence conditions of deeply nested blocks are deep `And` chains; the
/// stack grows on demand instead of failing at a fixed depth.
pub(crate) fn deserialize_unbounded<'de, R, T>(
    mut deserializer: serde_json::Deserializer<R>,
) -> Result<T, serde_json::Error>
where
    R: serde_json::de::Read<'de>,
    T: DeserializeOwned,
{
    deserializer.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

// =============================================================================
// WRITING
// =============================================================================

impl Document {
    fn from_ast(ast: &Ast) -> Result<Self, FormatError> {
        let Some(root) = ast.root() else {
            return Ok(Document {
                version: CACHE_FORMAT_VERSION,
                root: None,
                nodes: Vec::new(),
            });
        };
        let order = ast.descendants(root);
        let serials: HashMap<NodeId, u32> = order
            .iter()
            .enumerate()
            .map(|(position, &id)| (id, position as u32))
            .collect();
        let serial = |from: NodeId, target: NodeId| {
            serials.get(&target).copied().ok_or_else(|| {
                FormatError::Structure(format!("{from} links to {target}, which is outside the tree"))
            })
        };

        let mut nodes = Vec::with_capacity(order.len());
        for (position, &id) in order.iter().enumerate() {
            let node = &ast[id];
            let one = |target: NodeId| serial(id, target);
            let optional = |target: Option<NodeId>| target.map(|t| serial(id, t)).transpose();
            let many = |targets: &[NodeId]| targets.iter().map(|&t| serial(id, t)).collect::<Result<Vec<_>, _>>();

            let kind = match node.kind() {
                NodeKind::File { path } => KindRecord::File { file_path: normalize_path(path) },
                NodeKind::Function { name, header } => KindRecord::Function {
                    name: name.clone(),
                    header: one(*header)?,
                },
                NodeKind::CompoundStatement => KindRecord::CompoundStatement,
                NodeKind::SingleStatement { kind, code } => KindRecord::SingleStatement {
                    statement_type: *kind,
                    code: one(*code)?,
                },
                NodeKind::Label { code } => KindRecord::Label { code: one(*code)? },
                NodeKind::BranchStatement { kind, if_condition, siblings } => KindRecord::BranchStatement {
                    branch_type: *kind,
                    if_condition: optional(*if_condition)?,
                    siblings: many(siblings)?,
                },
                NodeKind::ElseStatement { kind, else_condition } => KindRecord::ElseStatement {
                    else_type: *kind,
                    else_condition: optional(*else_condition)?,
                },
                NodeKind::LoopStatement { kind, loop_condition } => KindRecord::LoopStatement {
                    loop_type: *kind,
                    loop_condition: one(*loop_condition)?,
                },
                NodeKind::SwitchStatement { header, cases } => KindRecord::SwitchStatement {
                    header: one(*header)?,
                    cases: many(cases)?,
                },
                NodeKind::CaseStatement { kind, case_condition } => KindRecord::CaseStatement {
                    case_type: *kind,
                    case_condition: optional(*case_condition)?,
                },
                NodeKind::TypeDefinition { kind, declaration } => KindRecord::TypeDefinition {
                    type_kind: *kind,
                    declaration: one(*declaration)?,
                },
                NodeKind::CodeList => KindRecord::CodeList,
                NodeKind::Code { text } => KindRecord::Code { text: text.clone() },
                NodeKind::CppBlock { kind } => KindRecord::CppBlock { block_type: *kind },
                NodeKind::CppStatement { kind, expression } => KindRecord::CppStatement {
                    cpp_type: *kind,
                    cpp_expression: optional(*expression)?,
                },
                NodeKind::Comment { content } => KindRecord::Comment { content: one(*content)? },
                NodeKind::ErrorElement { text } => KindRecord::ErrorElement { error_text: text.clone() },
                NodeKind::ReferenceElement { target } => KindRecord::ReferenceElement { target: one(*target)? },
            };

            let location = node.location();
            nodes.push(NodeRecord {
                id: position as u32,
                kind,
                presence_condition: node.presence_condition().clone(),
                condition: node.condition().cloned(),
                source_file: location.file.as_deref().map(normalize_path),
                line_start: location.line_start,
                line_end: location.line_end,
                nested: many(node.children())?,
            });
        }

        Ok(Document {
            version: CACHE_FORMAT_VERSION,
            root: Some(0),
            nodes,
        })
    }
}

fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

// =============================================================================
// READING
// =============================================================================

impl Document {
    fn into_ast(self) -> Result<Ast, FormatError> {
        if self.version != CACHE_FORMAT_VERSION {
            return Err(FormatError::UnsupportedVersion {
                found: self.version,
                expected: CACHE_FORMAT_VERSION,
            });
        }

        // Pass 1: every id gets its arena slot.
        let mut slots: HashMap<u32, NodeId> = HashMap::with_capacity(self.nodes.len());
        for (position, record) in self.nodes.iter().enumerate() {
            if slots.insert(record.id, NodeId(position as u32)).is_some() {
                return Err(FormatError::DuplicateId(record.id));
            }
        }

        // Pass 2: resolve links and ownership.
        let mut files: HashMap<String, Arc<Path>> = HashMap::new();
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for record in self.nodes {
            let from = record.id;
            let resolve = |target: u32| {
                slots
                    .get(&target)
                    .copied()
                    .ok_or(FormatError::UnresolvedReference { from, target })
            };
            let kind = record.kind.resolve(&resolve)?;
            let children = record
                .nested
                .iter()
                .map(|&child| resolve(child))
                .collect::<Result<Vec<_>, _>>()?;
            if !children.is_empty() && !kind.accepts_children() {
                return Err(FormatError::Structure(format!(
                    "node {from} ({}) cannot hold nested elements",
                    kind.name()
                )));
            }
            let file = record.source_file.map(|name| {
                files
                    .entry(name)
                    .or_insert_with_key(|name| Arc::from(Path::new(name)))
                    .clone()
            });

            let mut node = Node::new(record.presence_condition, record.condition, kind);
            node.location = SourceLocation {
                file,
                line_start: record.line_start,
                line_end: record.line_end,
            };
            node.children = children;
            nodes.push(node);
        }

        let serials: Vec<u32> = {
            let mut by_slot = vec![0; slots.len()];
            for (&serial, &slot) in &slots {
                by_slot[slot.index()] = serial;
            }
            by_slot
        };
        assign_owners(&mut nodes, &serials)?;
        check_link_kinds(&nodes, &serials)?;

        let root = match self.root {
            Some(root) => Some(
                slots
                    .get(&root)
                    .copied()
                    .ok_or(FormatError::UnresolvedReference { from: root, target: root })?,
            ),
            None => None,
        };
        let ast = Ast::from_parts(nodes, root);
        check_reachable(&ast)?;
        Ok(ast)
    }
}

impl KindRecord {
    fn resolve(self, resolve: &impl Fn(u32) -> Result<NodeId, FormatError>) -> Result<NodeKind, FormatError> {
        let optional = |target: Option<u32>| target.map(resolve).transpose();
        let many = |targets: Vec<u32>| targets.into_iter().map(resolve).collect::<Result<Vec<_>, _>>();
        Ok(match self {
            KindRecord::File { file_path } => NodeKind::File { path: PathBuf::from(file_path) },
            KindRecord::Function { name, header } => NodeKind::Function { name, header: resolve(header)? },
            KindRecord::CompoundStatement => NodeKind::CompoundStatement,
            KindRecord::SingleStatement { statement_type, code } => NodeKind::SingleStatement {
                kind: statement_type,
                code: resolve(code)?,
            },
            KindRecord::Label { code } => NodeKind::Label { code: resolve(code)? },
            KindRecord::BranchStatement { branch_type, if_condition, siblings } => NodeKind::BranchStatement {
                kind: branch_type,
                if_condition: optional(if_condition)?,
                siblings: many(siblings)?,
            },
            KindRecord::ElseStatement { else_type, else_condition } => NodeKind::ElseStatement {
                kind: else_type,
                else_condition: optional(else_condition)?,
            },
            KindRecord::LoopStatement { loop_type, loop_condition } => NodeKind::LoopStatement {
                kind: loop_type,
                loop_condition: resolve(loop_condition)?,
            },
            KindRecord::SwitchStatement { header, cases } => NodeKind::SwitchStatement {
                header: resolve(header)?,
                cases: many(cases)?,
            },
            KindRecord::CaseStatement { case_type, case_condition } => NodeKind::CaseStatement {
                kind: case_type,
                case_condition: optional(case_condition)?,
            },
            KindRecord::TypeDefinition { type_kind, declaration } => NodeKind::TypeDefinition {
                kind: type_kind,
                declaration: resolve(declaration)?,
            },
            KindRecord::CodeList => NodeKind::CodeList,
            KindRecord::Code { text } => NodeKind::Code { text },
            KindRecord::CppBlock { block_type } => NodeKind::CppBlock { kind: block_type },
            KindRecord::CppStatement { cpp_type, cpp_expression } => NodeKind::CppStatement {
                kind: cpp_type,
                expression: optional(cpp_expression)?,
            },
            KindRecord::Comment { content } => NodeKind::Comment { content: resolve(content)? },
            KindRecord::ErrorElement { error_text } => NodeKind::ErrorElement { text: error_text },
            KindRecord::ReferenceElement { target } => NodeKind::ReferenceElement { target: resolve(target)? },
        })
    }
}

/// Sets every owned node's parent, rejecting non-code attributes and second owners.
fn assign_owners(nodes: &mut [Node], serials: &[u32]) -> Result<(), FormatError> {
    let mut owners: Vec<Option<NodeId>> = vec![None; nodes.len()];
    for (position, node) in nodes.iter().enumerate() {
        let owner = NodeId(position as u32);
        for attribute in node.kind.code_attributes() {
            if !nodes[attribute.index()].kind.is_code() {
                return Err(FormatError::InvalidCode(serials[attribute.index()]));
            }
            claim(&mut owners, owner, attribute, serials)?;
        }
        for &child in &node.children {
            claim(&mut owners, owner, child, serials)?;
        }
    }
    for (node, owner) in nodes.iter_mut().zip(owners) {
        node.parent = owner;
    }
    Ok(())
}

fn claim(
    owners: &mut [Option<NodeId>],
    owner: NodeId,
    owned: NodeId,
    serials: &[u32],
) -> Result<(), FormatError> {
    match owners[owned.index()].replace(owner) {
        Some(_) => Err(FormatError::Structure(format!(
            "node {} has more than one owner",
            serials[owned.index()]
        ))),
        None => Ok(()),
    }
}

/// Case lists must name case statements and sibling lists branch statements.
fn check_link_kinds(nodes: &[Node], serials: &[u32]) -> Result<(), FormatError> {
    for (position, node) in nodes.iter().enumerate() {
        let (links, expected): (&[NodeId], &str) = match &node.kind {
            NodeKind::SwitchStatement { cases, .. } => (cases, "CaseStatement"),
            NodeKind::BranchStatement { siblings, .. } => (siblings, "BranchStatement"),
            _ => continue,
        };
        for link in links {
            let found = nodes[link.index()].kind.name();
            if found != expected {
                return Err(FormatError::Structure(format!(
                    "node {} links to node {} ({found}) where a {expected} is required",
                    serials[position],
                    serials[link.index()]
                )));
            }
        }
    }
    Ok(())
}

/// Every node must hang below the root. With single ownership already
/// checked, this also rules out ownership cycles.
fn check_reachable(ast: &Ast) -> Result<(), FormatError> {
    let Some(root) = ast.root() else {
        return match ast.is_empty() {
            true => Ok(()),
            false => Err(FormatError::Structure("nodes present but no root".to_string())),
        };
    };
    if ast[root].parent().is_some() {
        return Err(FormatError::Structure("the root is owned by another node".to_string()));
    }
    let reachable = ast.descendants(root).len();
    if reachable != ast.len() {
        return Err(FormatError::Structure(format!(
            "{} of {} nodes are not reachable from the root",
            ast.len() - reachable,
            ast.len()
        )));
    }
    Ok(())
}
