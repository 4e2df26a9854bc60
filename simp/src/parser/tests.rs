//! Parser tests for SIMP syntax

use crate::ast::{BinOp, CompoundOp, Expr, Program, Selector, Span, Target, TypeTag};
use crate::lexer::tokenize;
use crate::parser::parse;

/// Helper to parse a SIMP program and return the AST
fn parse_program(source: &str) -> crate::Result<Program> {
    let tokens = tokenize(source)?;
    parse("test.simp", source, tokens)
}

/// Helper to parse and expect success
fn parse_ok(source: &str) -> Program {
    parse_program(source).expect("Parse should succeed")
}

/// Helper to parse a single statement
fn parse_stmt(source: &str) -> Expr {
    let mut prog = parse_ok(source);
    assert_eq!(prog.stmts.len(), 1, "expected one statement in {source:?}");
    prog.stmts.remove(0).node
}

/// Helper to check if parsing fails
fn parse_fails(source: &str) -> bool {
    parse_program(source).is_err()
}

// ============================================
// Literals and variables
// ============================================

#[test]
fn test_parse_empty_program() {
    assert!(parse_ok("").stmts.is_empty());
}

#[test]
fn test_parse_literals() {
    assert_eq!(parse_stmt("42;"), Expr::Integer(42));
    assert_eq!(parse_stmt(r#""hi";"#), Expr::Text("hi".to_string()));
    assert_eq!(parse_stmt("'c';"), Expr::Character('c'));
}

#[test]
fn test_parse_array_literal() {
    match parse_stmt("[1, 2, 3];") {
        Expr::Array(items) => assert_eq!(items.len(), 3),
        other => panic!("Expected Array, got {other:?}"),
    }
    assert_eq!(parse_stmt("[];"), Expr::Array(vec![]));
}

#[test]
fn test_parse_index_read() {
    match parse_stmt("a[i + 1];") {
        Expr::VarIndex { array, index } => {
            assert_eq!(array.node, Expr::Var("a".to_string()));
            assert_eq!(array.span, Span::new(0, 1));
            assert_eq!(index.node.kind(), "Add");
        }
        other => panic!("Expected VarIndex, got {other:?}"),
    }
}

// ============================================
// Assignment
// ============================================

#[test]
fn test_parse_plain_assignment() {
    match parse_stmt("x = 5;") {
        Expr::VarAssign { ty, target, value } => {
            assert_eq!(ty, None);
            assert_eq!(target, Target::Name("x".to_string()));
            assert_eq!(value.node, Expr::Integer(5));
        }
        other => panic!("Expected VarAssign, got {other:?}"),
    }
}

#[test]
fn test_parse_typed_assignment() {
    for (source, tag) in [
        ("num x = 1;", TypeTag::Num),
        (r#"str s = "a";"#, TypeTag::Str),
        ("chr c = 'a';", TypeTag::Chr),
    ] {
        match parse_stmt(source) {
            Expr::VarAssign { ty, .. } => assert_eq!(ty, Some(tag)),
            other => panic!("Expected VarAssign, got {other:?}"),
        }
    }
}

#[test]
fn test_parse_index_assignment() {
    match parse_stmt("a[1] = 9;") {
        Expr::VarAssign {
            target: Target::Index { name, index },
            ..
        } => {
            assert_eq!(name, "a");
            assert_eq!(index.node, Expr::Integer(1));
        }
        other => panic!("Expected indexed VarAssign, got {other:?}"),
    }
}

#[test]
fn test_parse_compound_and_step() {
    match parse_stmt("total += i * 2;") {
        Expr::CompoundAssign { target, op, value } => {
            assert_eq!(target.name(), "total");
            assert_eq!(op, CompoundOp::AddAssign);
            assert_eq!(value.node.kind(), "Mul");
        }
        other => panic!("Expected CompoundAssign, got {other:?}"),
    }
    assert_eq!(parse_stmt("i++;"), Expr::Increment(Target::Name("i".to_string())));
    assert!(matches!(parse_stmt("a[0]--;"), Expr::Decrement(Target::Index { .. })));
}

#[test]
fn test_typed_index_assignment_rejected() {
    assert!(parse_fails("num a[0] = 1;"));
}

// ============================================
// Operators
// ============================================

#[test]
fn test_parse_precedence() {
    // 1 + 2 * 3 == 7 && x
    match parse_stmt("1 + 2 * 3 == 7 && x;") {
        Expr::Binary { left, op, right } => {
            assert_eq!(op, BinOp::And);
            assert_eq!(right.node, Expr::Var("x".to_string()));
            match left.node {
                Expr::Binary { left, op, .. } => {
                    assert_eq!(op, BinOp::Eq);
                    assert_eq!(left.node.kind(), "Add");
                }
                other => panic!("Expected comparison, got {other:?}"),
            }
        }
        other => panic!("Expected And, got {other:?}"),
    }
}

#[test]
fn test_parse_left_associative() {
    match parse_stmt("10 - 3 - 2;") {
        Expr::Binary { left, op, right } => {
            assert_eq!(op, BinOp::Sub);
            assert_eq!(left.node.kind(), "Sub");
            assert_eq!(right.node, Expr::Integer(2));
        }
        other => panic!("Expected Sub, got {other:?}"),
    }
}

#[test]
fn test_parse_parentheses() {
    match parse_stmt("(1 + 2) * 3;") {
        Expr::Binary { left, op, .. } => {
            assert_eq!(op, BinOp::Mul);
            assert_eq!(left.node.kind(), "Add");
        }
        other => panic!("Expected Mul, got {other:?}"),
    }
}

#[test]
fn test_parse_negation() {
    match parse_stmt("-x;") {
        Expr::Neg(inner) => assert_eq!(inner.node, Expr::Var("x".to_string())),
        other => panic!("Expected Neg, got {other:?}"),
    }
}

#[test]
fn test_chained_comparison_rejected() {
    assert!(parse_fails("1 < 2 < 3;"));
}

// ============================================
// Counters
// ============================================

#[test]
fn test_parse_counter_access() {
    match parse_stmt("x.c1;") {
        Expr::VarFunc { target, selector } => {
            assert_eq!(target.node, Expr::Var("x".to_string()));
            assert_eq!(selector, Selector::Reads);
        }
        other => panic!("Expected VarFunc, got {other:?}"),
    }
    match parse_stmt("a[2].c2;") {
        Expr::VarFunc { target, selector } => {
            assert_eq!(target.node.kind(), "VarIndex");
            assert_eq!(selector, Selector::Writes);
        }
        other => panic!("Expected VarFunc, got {other:?}"),
    }
}

#[test]
fn test_unknown_counter_rejected() {
    let err = parse_program("x.c3;").unwrap_err();
    assert!(err.message().contains("c3"));
    assert_eq!(err.span(), Some(Span::new(0, 4)));
}

// ============================================
// Output
// ============================================

#[test]
fn test_parse_print() {
    match parse_stmt("print(x);") {
        Expr::Print(value) => assert_eq!(value.node, Expr::Var("x".to_string())),
        other => panic!("Expected Print, got {other:?}"),
    }
    assert!(matches!(parse_stmt("print x + 1;"), Expr::Print(_)));
}

#[test]
fn test_parse_print_counter() {
    match parse_stmt("print(x.c2);") {
        Expr::PrintCounter { target, selector } => {
            assert_eq!(target.node, Expr::Var("x".to_string()));
            assert_eq!(selector, Selector::Writes);
        }
        other => panic!("Expected PrintCounter, got {other:?}"),
    }
}

#[test]
fn test_parse_fileprint() {
    match parse_stmt(r#"fileprint("out.txt", a);"#) {
        Expr::FilePrint { file, payload } => {
            assert_eq!(file.node, Expr::Text("out.txt".to_string()));
            assert_eq!(payload.node, Expr::Var("a".to_string()));
        }
        other => panic!("Expected FilePrint, got {other:?}"),
    }
    assert!(matches!(
        parse_stmt(r#"fileprint("out.txt", a.c1);"#),
        Expr::FilePrintCounter {
            selector: Selector::Reads,
            ..
        }
    ));
}

// ============================================
// Control flow and functions
// ============================================

#[test]
fn test_parse_if_else_chain() {
    let source = "if x < 1 { print(1); } else if x < 2 { print(2); } else { print(3); }";
    match parse_stmt(source) {
        Expr::If {
            then_branch,
            else_branch: Some(else_branch),
            ..
        } => {
            assert_eq!(then_branch.len(), 1);
            assert_eq!(else_branch.len(), 1);
            assert!(matches!(
                &else_branch[0].node,
                Expr::If {
                    else_branch: Some(_),
                    ..
                }
            ));
        }
        other => panic!("Expected If with else, got {other:?}"),
    }
}

#[test]
fn test_parse_if_without_else() {
    assert!(matches!(
        parse_stmt("if (x) { y = 1; }"),
        Expr::If {
            else_branch: None,
            ..
        }
    ));
}

#[test]
fn test_parse_for_loop() {
    match parse_stmt("for (num i = 1; i <= 3; i++) { print(i); }") {
        Expr::For {
            init,
            cond,
            step,
            body,
        } => {
            assert_eq!(init.node.kind(), "VarAssign");
            assert_eq!(cond.node.kind(), "Le");
            assert_eq!(step.node.kind(), "Increment");
            assert_eq!(body.len(), 1);
        }
        other => panic!("Expected For, got {other:?}"),
    }
}

#[test]
fn test_parse_for_loop_assignment_step() {
    assert!(matches!(
        parse_stmt("for (i = 0; i < 10; i = i + 2) { }"),
        Expr::For { .. }
    ));
}

#[test]
fn test_parse_while_loop() {
    match parse_stmt("while n > 0 { n -= 1; }") {
        Expr::While { cond, body } => {
            assert_eq!(cond.node.kind(), "Gt");
            assert_eq!(body[0].node.kind(), "SubAssign");
        }
        other => panic!("Expected While, got {other:?}"),
    }
}

#[test]
fn test_parse_function_declarations() {
    match parse_stmt("num add(a, b) { return a + b; }") {
        Expr::FuncDeclare {
            name,
            ret,
            params,
            body,
        } => {
            assert_eq!(name, "add");
            assert_eq!(ret, Some(TypeTag::Num));
            assert_eq!(params, vec!["a".to_string(), "b".to_string()]);
            assert_eq!(body[0].node.kind(), "Return");
        }
        other => panic!("Expected FuncDeclare, got {other:?}"),
    }
    assert!(matches!(
        parse_stmt("void hello() { print(\"hi\"); }"),
        Expr::FuncDeclare { ret: None, .. }
    ));
}

#[test]
fn test_parse_function_call() {
    match parse_stmt("add(1, x);") {
        Expr::FuncCall { name, args } => {
            assert_eq!(name, "add");
            assert_eq!(args.len(), 2);
        }
        other => panic!("Expected FuncCall, got {other:?}"),
    }
}

// ============================================
// Spans and errors
// ============================================

#[test]
fn test_statement_spans() {
    let prog = parse_ok("x = 1;\nprint(x);");
    assert_eq!(prog.stmts[0].span, Span::new(0, 5));
    assert_eq!(prog.stmts[1].span, Span::new(7, 15));
}

#[test]
fn test_missing_semicolon() {
    let err = parse_program("x = 1").unwrap_err();
    assert!(matches!(err, crate::CompileError::Parser { .. }));
}

#[test]
fn test_unbalanced_block() {
    assert!(parse_fails("while x { x--;"));
}

#[test]
fn test_ast_serializes() {
    let prog = parse_ok("num x = 1;");
    let json = serde_json::to_string(&prog).unwrap();
    assert!(json.contains("VarAssign"));
    let back: Program = serde_json::from_str(&json).unwrap();
    assert_eq!(back, prog);
}
