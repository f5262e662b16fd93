//! Tests for the per-kind conversion rules.

use super::*;
use crate::diagnostic::Severity;
use crate::nodes::{CppBlockKind, ElseKind};

fn lit(text: &str) -> RawNode {
    RawNode::literal(text)
}

fn toks(source: &str) -> Vec<RawNode> {
    RawNode::tokens(source)
}

fn unit(kind: &str, children: Vec<RawNode>) -> RawNode {
    RawNode::unit(kind, children)
}

fn braced(statements: Vec<RawNode>) -> RawNode {
    let mut children = vec![lit("{")];
    children.extend(statements);
    children.push(lit("}"));
    unit(kinds::BLOCK, children)
}

fn stmt(kind: &str, source: &str) -> RawNode {
    unit(kind, toks(source))
}

fn convert_with(raw: &RawNode, config: ConverterConfig) -> Conversion {
    Converter::new("test.c", config).convert(raw).unwrap()
}

fn convert(raw: &RawNode) -> Conversion {
    convert_with(raw, ConverterConfig::default())
}

fn root(conversion: &Conversion) -> NodeId {
    conversion.ast.root().unwrap()
}

fn child(conversion: &Conversion, id: NodeId, index: usize) -> NodeId {
    conversion.ast.nested_element(id, index).unwrap()
}

// =============================================================================
// CONDITION SCOPE
// =============================================================================

#[test]
fn test_scope_starts_true_and_accumulates() {
    let top = ConditionScope::default();
    assert!(top.current_condition().is_true());

    let a = Formula::var("A");
    let b = Formula::var("B");
    let inner = top.enter_block(&a).enter_block(&b);
    assert_eq!(inner.current_condition(), a.and(&b));
    // entering never changes the outer scope
    assert!(top.current_condition().is_true());
}

// =============================================================================
// SIMPLE STATEMENTS
// =============================================================================

#[test]
fn test_simple_statement_kinds() {
    let cases = [
        (kinds::DECL_STMT, StatementKind::Declaration),
        (kinds::EXPR_STMT, StatementKind::Expression),
        (kinds::CONTINUE, StatementKind::Continue),
        (kinds::BREAK, StatementKind::Break),
        (kinds::GOTO, StatementKind::Goto),
        (kinds::RETURN, StatementKind::Return),
        (kinds::EMPTY_STMT, StatementKind::Empty),
    ];
    for (raw_kind, expected) in cases {
        let result = convert(&stmt(raw_kind, "a b ;"));
        let id = root(&result);
        match result.ast[id].kind() {
            NodeKind::SingleStatement { kind, code } => {
                assert_eq!(*kind, expected);
                assert_eq!(result.ast.code_text(*code), "a b ;");
            }
            other => panic!("{raw_kind}: expected SingleStatement, got {other:?}"),
        }
    }
}

#[test]
fn test_label_keeps_its_code() {
    let result = convert(&stmt(kinds::LABEL, "out :"));
    match result.ast[root(&result)].kind() {
        NodeKind::Label { code } => assert_eq!(result.ast.code_text(*code), "out :"),
        other => panic!("expected Label, got {other:?}"),
    }
}

#[test]
fn test_statement_without_tokens_is_an_error() {
    let err = Converter::new("test.c", ConverterConfig::default())
        .convert(&unit(kinds::RETURN, vec![]))
        .unwrap_err();
    assert_eq!(err, ConvertError::EmptyCodeRange { kind: "return".into() });
}

#[test]
fn test_block_skips_braces() {
    let result = convert(&braced(vec![stmt(kinds::EXPR_STMT, "x ++ ;")]));
    let block = root(&result);
    assert!(matches!(result.ast[block].kind(), NodeKind::CompoundStatement));
    assert_eq!(result.ast.nested_element_count(block), 1);
}

#[test]
fn test_nodes_carry_the_source_file() {
    let result = convert(&unit(kinds::UNIT, vec![stmt(kinds::RETURN, "return ;")]));
    for (_, node) in result.ast.iter() {
        assert_eq!(node.location().file.as_deref(), Some(std::path::Path::new("test.c")));
        assert_eq!(node.location().line_start, -1);
    }
}

// =============================================================================
// LOOPS
// =============================================================================

#[test]
fn test_for_loop_splits_condition_and_body() {
    let mut children = toks("( i = 0 ; i < n ; i ++ )");
    children.push(braced(vec![stmt(kinds::CONTINUE, "continue ;")]));
    let result = convert(&unit(kinds::FOR, children));
    let looped = root(&result);
    match result.ast[looped].kind() {
        NodeKind::LoopStatement { kind, loop_condition } => {
            assert_eq!(*kind, LoopKind::For);
            assert_eq!(result.ast.code_text(*loop_condition), "( i = 0 ; i < n ; i ++ )");
        }
        other => panic!("expected LoopStatement, got {other:?}"),
    }
    let body = child(&result, looped, 0);
    assert!(matches!(result.ast[body].kind(), NodeKind::CompoundStatement));
}

#[test]
fn test_do_while_offsets() {
    let raw = unit(
        kinds::DO,
        vec![lit("do"), braced(vec![]), lit("while"), lit("( x )"), lit(";")],
    );
    let result = convert(&raw);
    match result.ast[root(&result)].kind() {
        NodeKind::LoopStatement { kind, loop_condition } => {
            assert_eq!(*kind, LoopKind::DoWhile);
            assert_eq!(result.ast.code_text(*loop_condition), "( x )");
        }
        other => panic!("expected LoopStatement, got {other:?}"),
    }
}

#[test]
fn test_truncated_do_becomes_error_element() {
    let result = convert(&unit(kinds::DO, vec![lit("do"), braced(vec![])]));
    assert!(matches!(result.ast[root(&result)].kind(), NodeKind::ErrorElement { .. }));
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.diagnostics[0].is_error());
}

// =============================================================================
// IF STRUCTURES
// =============================================================================

fn branch_kind(result: &Conversion, id: NodeId) -> BranchKind {
    match result.ast[id].kind() {
        NodeKind::BranchStatement { kind, .. } => *kind,
        other => panic!("expected BranchStatement, got {other:?}"),
    }
}

#[test]
fn test_if_else_if_else_share_siblings() {
    let mut if_children = toks("( a )");
    if_children.push(braced(vec![stmt(kinds::RETURN, "return 1 ;")]));
    let mut elseif_children = toks("else if ( b )");
    elseif_children.push(braced(vec![stmt(kinds::RETURN, "return 2 ;")]));
    if_children.push(unit(kinds::ELSEIF, elseif_children));
    if_children.push(unit(kinds::ELSE, vec![lit("else"), braced(vec![stmt(kinds::RETURN, "return 3 ;")])]));

    let result = convert(&unit(kinds::IF, if_children));
    let branch = root(&result);
    assert_eq!(branch_kind(&result, branch), BranchKind::If);
    assert_eq!(result.ast.nested_element_count(branch), 3);

    let elseif = child(&result, branch, 1);
    let otherwise = child(&result, branch, 2);
    assert_eq!(branch_kind(&result, elseif), BranchKind::ElseIf);
    assert_eq!(branch_kind(&result, otherwise), BranchKind::Else);

    let expected = [branch, elseif, otherwise];
    for member in expected {
        assert_eq!(result.ast.siblings_of(member), &expected);
    }

    match result.ast[elseif].kind() {
        NodeKind::BranchStatement { if_condition: Some(cond), .. } => {
            assert_eq!(result.ast.code_text(*cond), "else if ( b )");
        }
        other => panic!("expected else-if condition, got {other:?}"),
    }
    match result.ast[otherwise].kind() {
        NodeKind::BranchStatement { if_condition, .. } => assert!(if_condition.is_none()),
        other => panic!("expected else branch, got {other:?}"),
    }
    // the else keyword is not part of the body
    assert_eq!(result.ast.nested_element_count(otherwise), 1);
}

#[test]
fn test_branch_inside_preprocessor_block_is_a_sibling() {
    let mut if_children = toks("( a )");
    if_children.push(braced(vec![]));
    if_children.push(RawNode::preprocessor(
        CppBlockKind::Ifdef,
        Formula::var("EXTRA"),
        vec![unit(kinds::ELSE, vec![braced(vec![])])],
    ));
    let result = convert(&unit(kinds::IF, if_children));
    let branch = root(&result);
    let guarded = child(&result, branch, 1);
    let otherwise = child(&result, guarded, 0);
    assert_eq!(result.ast.siblings_of(branch), &[branch, otherwise]);
    assert_eq!(result.ast[otherwise].presence_condition(), &Formula::var("EXTRA"));
}

#[test]
fn test_elseif_without_body_is_reported() {
    let mut if_children = toks("( a )");
    if_children.push(braced(vec![]));
    if_children.push(unit(kinds::ELSEIF, toks("else if ( b )")));
    let result = convert(&unit(kinds::IF, if_children));

    let branch = root(&result);
    let broken = child(&result, branch, 1);
    assert!(matches!(result.ast[broken].kind(), NodeKind::ErrorElement { .. }));
    assert_eq!(result.ast.siblings_of(branch), &[branch]);
    assert_eq!(result.diagnostics[0].severity, Severity::Error);
    assert_eq!(result.diagnostics[0].kind, kinds::ELSEIF);
}

#[test]
fn test_if_without_condition_tokens() {
    let result = convert(&unit(kinds::IF, vec![braced(vec![])]));
    match result.ast[root(&result)].kind() {
        NodeKind::BranchStatement { if_condition, .. } => assert!(if_condition.is_none()),
        other => panic!("expected BranchStatement, got {other:?}"),
    }
}

// =============================================================================
// SWITCH / CASE
// =============================================================================

fn switch_raw(body: Vec<RawNode>) -> RawNode {
    let mut children = toks("( x )");
    children.push(braced(body));
    unit(kinds::SWITCH, children)
}

#[test]
fn test_switch_regroups_statements_under_cases() {
    let raw = switch_raw(vec![
        unit(kinds::CASE, toks("case 1 :")),
        stmt(kinds::EXPR_STMT, "y = 1 ;"),
        stmt(kinds::BREAK, "break ;"),
        unit(kinds::DEFAULT, toks("default :")),
        stmt(kinds::BREAK, "break ;"),
    ]);
    let result = convert(&raw);
    let switch = root(&result);
    let cases = result.ast.cases_of(switch);
    assert_eq!(cases.len(), 2);

    let body = child(&result, switch, 0);
    assert_eq!(result.ast.nested_element_count(body), 2);
    assert_eq!(result.ast.nested_element_count(cases[0]), 2);
    assert_eq!(result.ast.nested_element_count(cases[1]), 1);

    match result.ast[cases[0]].kind() {
        NodeKind::CaseStatement { kind: CaseKind::Case, case_condition: Some(cond) } => {
            assert_eq!(result.ast.code_text(*cond), "case 1 :");
        }
        other => panic!("expected case, got {other:?}"),
    }
    assert!(matches!(
        result.ast[cases[1]].kind(),
        NodeKind::CaseStatement { kind: CaseKind::Default, case_condition: None }
    ));
}

#[test]
fn test_case_with_inline_statements() {
    let mut children = toks("case 2 :");
    children.push(stmt(kinds::RETURN, "return ;"));
    let result = convert(&unit(kinds::CASE, children));
    assert_eq!(result.ast.nested_element_count(root(&result)), 1);
}

#[test]
fn test_nested_switch_keeps_its_own_cases() {
    let inner = switch_raw(vec![
        unit(kinds::CASE, toks("case 'a' :")),
        unit(kinds::CASE, toks("case 'b' :")),
    ]);
    let raw = switch_raw(vec![unit(kinds::CASE, toks("case 1 :")), inner]);
    let result = convert(&raw);
    let outer = root(&result);
    assert_eq!(result.ast.cases_of(outer).len(), 1);

    let case = result.ast.cases_of(outer)[0];
    let nested_switch = child(&result, case, 0);
    assert_eq!(result.ast.cases_of(nested_switch).len(), 2);
}

// =============================================================================
// DECLARATIONS
// =============================================================================

fn declaration_text(result: &Conversion, id: NodeId) -> (TypeDefKind, String) {
    match result.ast[id].kind() {
        NodeKind::TypeDefinition { kind, declaration } => (*kind, result.ast.code_text(*declaration)),
        other => panic!("expected TypeDefinition, got {other:?}"),
    }
}

#[test]
fn test_struct_with_semicolon() {
    let raw = unit(
        kinds::STRUCT,
        vec![lit("struct"), lit("point"), braced(vec![stmt(kinds::DECL_STMT, "int x ;"), stmt(kinds::DECL_STMT, "int y ;")]), lit(";")],
    );
    let result = convert(&raw);
    let def = root(&result);
    assert_eq!(declaration_text(&result, def), (TypeDefKind::Struct, "struct point".to_string()));
    assert_eq!(result.ast.nested_element_count(def), 2);
}

#[test]
fn test_inline_union_without_semicolon() {
    let raw = unit(kinds::UNION, vec![lit("union"), lit("u"), braced(vec![stmt(kinds::DECL_STMT, "int i ;")])]);
    let result = convert(&raw);
    let def = root(&result);
    assert_eq!(declaration_text(&result, def), (TypeDefKind::Union, "union u".to_string()));
    assert_eq!(result.ast.nested_element_count(def), 1);
}

#[test]
fn test_forward_declaration_has_no_body() {
    let result = convert(&unit(kinds::ENUM, toks("enum color ;")));
    let def = root(&result);
    assert_eq!(declaration_text(&result, def), (TypeDefKind::Enum, "enum color".to_string()));
    assert_eq!(result.ast.nested_element_count(def), 0);
}

#[test]
fn test_anonymous_struct_uses_keyword() {
    let result = convert(&unit(kinds::STRUCT, vec![braced(vec![]), lit(";")]));
    assert_eq!(declaration_text(&result, root(&result)).1, "struct");
}

#[test]
fn test_typedef_with_nested_struct() {
    let inner = unit(kinds::STRUCT, vec![lit("struct"), braced(vec![stmt(kinds::DECL_STMT, "int x ;")])]);
    let raw = unit(kinds::TYPEDEF, vec![lit("typedef"), inner, lit("point_t"), lit(";")]);
    let result = convert(&raw);
    let def = root(&result);
    assert_eq!(declaration_text(&result, def), (TypeDefKind::Typedef, "typedef point_t".to_string()));
    let nested = child(&result, def, 0);
    assert_eq!(declaration_text(&result, nested).0, TypeDefKind::Struct);
}

#[test]
fn test_plain_typedef() {
    let result = convert(&unit(kinds::TYPEDEF, toks("typedef unsigned long size_t ;")));
    let def = root(&result);
    assert_eq!(declaration_text(&result, def).1, "typedef unsigned long size_t");
    assert_eq!(result.ast.nested_element_count(def), 0);
}

#[test]
fn test_function_header_and_body() {
    let mut children = toks("static int main ( void )");
    children.push(braced(vec![stmt(kinds::RETURN, "return 0 ;")]));
    let result = convert(&unit(kinds::FUNCTION, children));
    let function = root(&result);
    match result.ast[function].kind() {
        NodeKind::Function { name, header } => {
            assert_eq!(name, "main");
            assert_eq!(result.ast.code_text(*header), "static int main ( void )");
        }
        other => panic!("expected Function, got {other:?}"),
    }
    assert_eq!(result.ast.nested_element_count(function), 1);
}

// =============================================================================
// COMMENTS, DIRECTIVES, ERRORS
// =============================================================================

#[test]
fn test_comment_wraps_code() {
    let result = convert(&unit(kinds::COMMENT, vec![lit("/* note */")]));
    match result.ast[root(&result)].kind() {
        NodeKind::Comment { content } => assert_eq!(result.ast.code_text(*content), "/* note */"),
        other => panic!("expected Comment, got {other:?}"),
    }
}

#[test]
fn test_directive_expression() {
    let result = convert(&unit(kinds::CPP_DEFINE, toks("#define MAX 10")));
    match result.ast[root(&result)].kind() {
        NodeKind::CppStatement { kind, expression: Some(expr) } => {
            assert_eq!(*kind, CppStatementKind::Define);
            assert_eq!(result.ast.code_text(*expr), "MAX 10");
        }
        other => panic!("expected CppStatement, got {other:?}"),
    }

    let empty = convert(&unit(kinds::CPP_EMPTY, vec![lit("#")]));
    assert!(matches!(
        empty.ast[root(&empty)].kind(),
        NodeKind::CppStatement { kind: CppStatementKind::Empty, expression: None }
    ));
}

#[test]
fn test_error_unit_keeps_nested_elements() {
    let raw = unit(kinds::ERROR, vec![lit("@@"), stmt(kinds::RETURN, "return ;")]);
    let result = convert(&raw);
    let element = root(&result);
    assert!(matches!(result.ast[element].kind(), NodeKind::ErrorElement { .. }));
    assert_eq!(result.ast.nested_element_count(element), 2);
}

#[test]
fn test_else_kind_tags_are_distinct() {
    assert_ne!(ElseKind::Else.as_str(), ElseKind::ElseIf.as_str());
}

// =============================================================================
// UNKNOWN KINDS
// =============================================================================

#[test]
fn test_unknown_kind_placeholder() {
    let raw = unit(kinds::UNIT, vec![stmt("asm", "asm ( nop ) ;")]);
    let result = convert(&raw);
    let placeholder = child(&result, root(&result), 0);
    match result.ast[placeholder].kind() {
        NodeKind::ErrorElement { text } => assert_eq!(text, "unsupported construct `asm`"),
        other => panic!("expected ErrorElement, got {other:?}"),
    }
    let code = child(&result, placeholder, 0);
    assert_eq!(result.ast.code_text(code), "asm ( nop ) ;");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].severity, Severity::Warning);
}

#[test]
fn test_unknown_kind_skipped() {
    let config = ConverterConfig::new(UnknownKindPolicy::Skip);
    let raw = unit(kinds::UNIT, vec![stmt("asm", "asm ;"), stmt(kinds::RETURN, "return ;")]);
    let result = convert_with(&raw, config);
    let file = root(&result);
    assert_eq!(result.ast.nested_element_count(file), 1);
    assert!(result.diagnostics.is_empty());

    let dropped = convert_with(&stmt("asm", "asm ;"), config);
    assert_eq!(dropped.ast.root(), None);
}

#[test]
fn test_convert_file_requires_unit_root() {
    let err = Converter::new("test.c", ConverterConfig::default())
        .convert_file(&stmt(kinds::RETURN, "return ;"))
        .unwrap_err();
    assert_eq!(err, ConvertError::UnexpectedRoot { kind: "return".into() });
}

// =============================================================================
// PRESENCE CONDITIONS AND CODE MERGING
// =============================================================================

#[test]
fn test_structural_preprocessor_block() {
    let raw = unit(
        kinds::UNIT,
        vec![RawNode::preprocessor(CppBlockKind::Ifdef, Formula::var("A"), vec![stmt(kinds::RETURN, "return ;")])],
    );
    let result = convert(&raw);
    let file = root(&result);
    assert!(result.ast[file].presence_condition().is_true());

    let block = child(&result, file, 0);
    assert_eq!(result.ast[block].condition(), Some(&Formula::var("A")));
    assert_eq!(result.ast[block].presence_condition(), &Formula::var("A"));
    let ret = child(&result, block, 0);
    assert!(matches!(result.ast[ret].kind(), NodeKind::SingleStatement { .. }));
    assert_eq!(result.ast[ret].presence_condition(), &Formula::var("A"));
}

#[test]
fn test_statement_range_with_alternatives() {
    let raw = unit(
        kinds::DECL_STMT,
        vec![
            lit("int"),
            lit("x ="),
            RawNode::preprocessor(CppBlockKind::If, Formula::var("A"), vec![lit("1")]),
            RawNode::preprocessor(CppBlockKind::Else, !Formula::var("A"), vec![lit("2")]),
            lit(";"),
        ],
    );
    let result = convert(&raw);
    let code = match result.ast[root(&result)].kind() {
        NodeKind::SingleStatement { code, .. } => *code,
        other => panic!("expected SingleStatement, got {other:?}"),
    };
    assert!(matches!(result.ast[code].kind(), NodeKind::CodeList));
    let parts: Vec<&str> = result.ast[code].children().iter().map(|&p| result.ast[p].kind().name()).collect();
    assert_eq!(parts, vec!["Code", "CppBlock", "CppBlock", "Code"]);
    assert_eq!(result.ast.code_text(code), "int x = 1 2 ;");

    let alternative = child(&result, code, 2);
    assert_eq!(result.ast[alternative].presence_condition(), &!Formula::var("A"));
    let inner = child(&result, alternative, 0);
    assert_eq!(result.ast[inner].presence_condition(), &!Formula::var("A"));
}

#[test]
fn test_structural_sequence_merges_code_runs() {
    let raw = unit(
        kinds::UNIT,
        vec![lit("extern"), lit("int x ;"), stmt(kinds::RETURN, "return ;"), lit("tail")],
    );
    let result = convert(&raw);
    let file = root(&result);
    assert_eq!(result.ast.nested_element_count(file), 3);
    let first = child(&result, file, 0);
    assert_eq!(result.ast.code_text(first), "extern int x ;");
}
