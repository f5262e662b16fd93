//! Raw tree builders shared by the integration tests.

#![allow(dead_code)]

use code_model::raw::RawNode;
use code_model::{CppBlockKind, Formula};

pub fn lit(text: &str) -> RawNode {
    RawNode::literal(text)
}

pub fn stmt(kind: &str, source: &str) -> RawNode {
    RawNode::unit(kind, RawNode::tokens(source))
}

pub fn braced(statements: Vec<RawNode>) -> RawNode {
    let mut children = vec![lit("{")];
    children.extend(statements);
    children.push(lit("}"));
    RawNode::unit("block", children)
}

/// `tokens...` followed by a unit.
pub fn with_tail(kind: &str, source: &str, tail: RawNode) -> RawNode {
    let mut children = RawNode::tokens(source);
    children.push(tail);
    RawNode::unit(kind, children)
}

/// A small translation unit touching every construct the converter knows:
///
/// ```c
/// #include <stdio.h>
/// /* shapes */
/// struct point { int x ; int y ; } ;
/// typedef unsigned int uint ;
/// static int classify ( int v ) {
///   switch ( v ) { case 1 : return 1 ; case 2 : v ++ ; break ; default : break ; }
///   for ( ; ; ) { if ( v ) { break ; } else if ( w ) { v -- ; } else { continue ; } }
/// #ifdef DEBUG
///   printf ( "x" ) ;
/// #endif
///   do { v -- ; } while ( v ) ;
/// out :
///   return 0 ;
/// }
/// ```
pub fn sample_file() -> RawNode {
    let switch = with_tail(
        "switch",
        "( v )",
        braced(vec![
            stmt("case", "case 1 :"),
            stmt("return", "return 1 ;"),
            stmt("case", "case 2 :"),
            stmt("expr_stmt", "v ++ ;"),
            stmt("break", "break ;"),
            stmt("default", "default :"),
            stmt("break", "break ;"),
        ]),
    );

    let mut if_children = RawNode::tokens("( v )");
    if_children.push(braced(vec![stmt("break", "break ;")]));
    if_children.push(with_tail("elseif", "else if ( w )", braced(vec![stmt("expr_stmt", "v -- ;")])));
    if_children.push(RawNode::unit("else", vec![lit("else"), braced(vec![stmt("continue", "continue ;")])]));
    let for_loop = with_tail("for", "( ; ; )", braced(vec![RawNode::unit("if", if_children)]));

    let debug = RawNode::preprocessor(
        CppBlockKind::Ifdef,
        Formula::var("DEBUG"),
        vec![stmt("expr_stmt", "printf ( \"x\" ) ;")],
    );
    let do_loop = RawNode::unit(
        "do",
        vec![lit("do"), braced(vec![stmt("expr_stmt", "v -- ;")]), lit("while"), lit("( v )"), lit(";")],
    );

    let body = braced(vec![
        switch,
        for_loop,
        debug,
        do_loop,
        stmt("label", "out :"),
        stmt("return", "return 0 ;"),
    ]);

    RawNode::unit(
        "unit",
        vec![
            stmt("#include", "#include <stdio.h>"),
            RawNode::unit("comment", vec![lit("/* shapes */")]),
            RawNode::unit(
                "struct",
                vec![
                    lit("struct"),
                    lit("point"),
                    braced(vec![stmt("decl_stmt", "int x ;"), stmt("decl_stmt", "int y ;")]),
                    lit(";"),
                ],
            ),
            stmt("typedef", "typedef unsigned int uint ;"),
            with_tail("function", "static int classify ( int v )", body),
        ],
    )
}
