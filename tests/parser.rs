use pretty_assertions::assert_eq;
use volt::{
    ast::{Expr, LogicalOperator, Stmt, print_program},
    error::ParseError,
    interpreter::{lexer::tokenize, parser::parse_expression},
    parse_program,
};

fn parse(source: &str) -> (Vec<Stmt>, Vec<ParseError>) {
    parse_program(&tokenize(source))
}

fn parse_ok(source: &str) -> Vec<Stmt> {
    let (program, errors) = parse(source);
    assert!(errors.is_empty(), "unexpected errors for {source:?}: {errors:?}");
    program
}

fn messages(source: &str) -> Vec<String> {
    parse(source).1.iter().map(ToString::to_string).collect()
}

#[test]
fn and_binds_tighter_than_or() {
    let (expr, errors) = parse_expression(&tokenize("a || b && c"));
    assert!(errors.is_empty());
    let Some(Expr::Logical { op, right, .. }) = expr else {
        panic!("expected a logical expression");
    };
    assert_eq!(op, LogicalOperator::Or);
    assert!(matches!(*right, Expr::Logical { op: LogicalOperator::And, .. }));
}

#[test]
fn expression_with_trailing_tokens_is_rejected() {
    let (_, errors) = parse_expression(&tokenize("1 + 2 3"));
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("Expect end of expression"));

    let (expr, errors) = parse_expression(&tokenize("x = 4;"));
    assert!(errors.is_empty());
    assert!(matches!(expr, Some(Expr::Assign { .. })));
}

#[test]
fn brace_at_statement_start_is_a_block() {
    let program = parse_ok("{ let a = 1; }");
    assert!(matches!(program[0], Stmt::Block { .. }));

    let program = parse_ok("let m = { \"a\": 1, \"b\": 2, };");
    let Stmt::Let { initializer: Some(Expr::HashMapLiteral { entries, .. }),
                    .. } = &program[0]
    else {
        panic!("expected a hash map initializer");
    };
    assert_eq!(entries.len(), 2);
}

#[test]
fn for_loop_clauses_are_optional() {
    let program = parse_ok("for (;;) { break; }");
    let Stmt::For { initializer,
                    condition,
                    increment,
                    .. } = &program[0]
    else {
        panic!("expected a for loop");
    };
    assert!(initializer.is_none() && condition.is_none() && increment.is_none());
}

#[test]
fn errors_carry_line_and_column() {
    assert_eq!(messages("let x = 1;\nlet = 2;"),
               ["[Line 2, Col 5] Error at '=': Expect variable name"]);
}

#[test]
fn missing_semicolon_at_end_of_input() {
    assert_eq!(messages("print 1"), ["[Line 1, Col 8] Error at end: Expect ';' after value"]);
}

#[test]
fn recovery_reports_independent_errors() {
    let (program, errors) = parse("let = 1;\nprint 2;\nlet y 3;\nprint 4;");
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].location().line, 1);
    assert_eq!(errors[1].location().line, 3);
    assert_eq!(program.len(), 2);
}

#[test]
fn invalid_assignment_target_is_reported() {
    let errors = parse("1 + 2 = 3;").1;
    assert!(matches!(errors.as_slice(), [ParseError::InvalidAssignmentTarget { .. }]));
}

#[test]
fn lexical_errors_surface_as_parse_errors() {
    let errors = parse("print 1 @ 2;").1;
    assert!(matches!(errors[0], ParseError::UnexpectedCharacter { .. }));

    let errors = parse("print \"open;").1;
    assert!(matches!(errors[0], ParseError::UnterminatedString { .. }));
}

#[test]
fn control_flow_outside_its_construct_is_rejected() {
    assert!(matches!(parse("break;").1.as_slice(), [ParseError::OutsideLoop { .. }]));
    assert!(matches!(parse("continue;").1.as_slice(), [ParseError::OutsideLoop { .. }]));
    assert!(matches!(parse("return 1;").1.as_slice(), [ParseError::ReturnOutsideFunction { .. }]));

    parse_ok("while (true) { if (true) break; else continue; }");
    parse_ok("fn f() { return 1; }");
}

#[test]
fn break_inside_a_function_does_not_see_the_outer_loop() {
    let errors = parse("while (true) { fn f() { break; } }").1;
    assert!(matches!(errors.as_slice(), [ParseError::OutsideLoop { .. }]));
}

#[test]
fn too_many_arguments_is_reported() {
    let args = vec!["1"; 256].join(", ");
    let errors = parse(&format!("f({args});")).1;
    assert!(matches!(errors.as_slice(), [ParseError::TooManyItems { what: "arguments", .. }]));
}

#[test]
fn run_until_requires_a_semicolon() {
    parse_ok("run { print 1; } until (true);");
    assert_eq!(parse("run { print 1; } until (true)").1.len(), 1);
}

#[test]
fn printed_programs_parse_back_to_the_same_program() {
    let source = r#"
        let total = 0;
        fn add(a, b) { return a + b; }
        let twice = fn (f, x) { return f(f(x)); };
        for (let i = 0; i < 10; i++) {
            if (i % 2 == 0) continue; else total += i;
        }
        run { total--; } until (total < 20 || !false);
        while (total > 0) total = total - -1 * -3;
        let xs = [1, 2.5, "a\tb", nil, true];
        xs[0] = { "k": xs, "n": (1 + 2) * 3 };
        print xs.length > 2 ? add(1, 2) : -(-total);
        print ++total;
    "#;

    let first = print_program(&parse_ok(source));
    let second = print_program(&parse_ok(&first));
    assert_eq!(first, second);
}

#[test]
fn deeply_nested_input_parses() {
    let depth = 3000;
    let program = parse_ok(&format!("print {}1{};", "(".repeat(depth), ")".repeat(depth)));
    assert_eq!(program.len(), 1);

    let program = parse_ok(&format!("print {}true;", "!".repeat(depth)));
    assert_eq!(program.len(), 1);

    let program = parse_ok(&format!("{}let x = 1;{}", "{ ".repeat(depth), "} ".repeat(depth)));
    assert!(matches!(program[0], Stmt::Block { .. }));

    let (_, errors) = parse(&format!("print {}1;", "(".repeat(depth)));
    assert_eq!(errors.len(), 1);
}
