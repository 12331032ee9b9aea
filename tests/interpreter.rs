use std::{cell::Cell, rc::Rc};

use pretty_assertions::assert_eq;
use volt::{
    Error, Interpreter, Value,
    error::RuntimeError,
    interpreter::{evaluator::core::MAX_CALL_DEPTH, lexer::tokenize, parser::parse_expression},
    run_captured, run_with,
    util::output::SharedOutput,
};

fn output(source: &str) -> String {
    run_captured(source).unwrap_or_else(|e| panic!("script failed: {e}\n{source}"))
}

fn runtime_error(source: &str) -> RuntimeError {
    match run_captured(source) {
        Err(Error::Runtime(e)) => e,
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

fn eval(interpreter: &mut Interpreter, source: &str) -> Value {
    let (expr, errors) = parse_expression(&tokenize(source));
    assert!(errors.is_empty(), "{errors:?}");
    interpreter.evaluate(&expr.expect("expression")).unwrap()
}

#[test]
fn arithmetic_follows_ieee_doubles() {
    assert_eq!(output("print 1 + 2 * 3; print (1 + 2) * 3; print 10 % 3; print 0.1 + 0.2; print 7 / 2;"),
               "7\n9\n1\n0.3\n3.5\n");
}

#[test]
fn string_number_concatenation() {
    assert_eq!(output(r#"print "Count: " + 42; print 42 + " items"; print "pi " + 3.5;"#),
               "Count: 42\n42 items\npi 3.5\n");
}

#[test]
fn short_circuit_skips_the_right_operand() {
    let source = r#"
        let calls = 0;
        fn touch() { calls++; return true; }
        let a = false && touch();
        let b = true || touch();
        print calls;
        print nil || "fallback";
        print 0 && "never";
        print 1 && "second";
    "#;
    assert_eq!(output(source), "0\nfallback\n0\nsecond\n");
}

#[test]
fn inner_scope_shadows_without_leaking() {
    assert_eq!(output("let x = 10; { let x = 20; print x; } print x;"), "20\n10\n");
}

#[test]
fn closures_outlive_their_defining_call() {
    let source = r"
        fn counter() {
            let count = 0;
            fn increment() { count++; return count; }
            return increment;
        }
        let a = counter();
        let b = counter();
        a(); a();
        print a();
        print b();
    ";
    assert_eq!(output(source), "3\n1\n");
}

#[test]
fn closures_capture_by_reference() {
    let source = r"
        let x = 1;
        let get = fn () { return x; };
        x = 2;
        print get();
    ";
    assert_eq!(output(source), "2\n");
}

#[test]
fn arrays_are_shared_by_reference() {
    assert_eq!(output("let a = [1, 2]; let b = a; b.push(3); print a.length; print a;"),
               "3\n[1, 2, 3]\n");
}

#[test]
fn run_until_runs_at_least_once_and_while_may_not_run() {
    let source = r#"
        run { print "run"; } until (true);
        while (false) { print "while"; }
        let n = 0;
        run { n++; } until (n >= 3);
        print n;
    "#;
    assert_eq!(output(source), "run\n3\n");
}

#[test]
fn pure_expressions_evaluate_identically_twice() {
    let mut interpreter = Interpreter::with_output(SharedOutput::new());
    run_with(&mut interpreter, "let xs = [3, 1, 2]; let k = 4;").unwrap();

    let source = "xs[0] * k + len(\"abc\") - (k > 2 ? 1 : 0)";
    let first = eval(&mut interpreter, source);
    let second = eval(&mut interpreter, source);
    assert_eq!(first, Value::Number(14.0));
    assert_eq!(first, second);
}

#[test]
fn indexing_out_of_bounds_is_an_error() {
    assert!(matches!(runtime_error("let a = [1, 2]; print a[2];"),
                     RuntimeError::IndexOutOfBounds { length: 2, .. }));
    assert!(matches!(runtime_error("let a = [1, 2]; print a[-1];"),
                     RuntimeError::IndexOutOfBounds { .. }));
    assert!(matches!(runtime_error("let a = [1, 2]; a[5] = 1;"),
                     RuntimeError::IndexOutOfBounds { .. }));
    assert!(matches!(runtime_error("let a = [1, 2]; print a[0.5];"),
                     RuntimeError::InvalidIndex { .. }));
}

#[test]
fn for_loop_variable_is_scoped_to_the_loop() {
    assert_eq!(output("for (let i = 0; i < 3; i++) print i;"), "0\n1\n2\n");
    assert!(matches!(runtime_error("for (let i = 0; i < 3; i++) {} print i;"),
                     RuntimeError::UnknownVariable { .. }));
}

#[test]
fn break_and_continue_target_the_nearest_loop() {
    let source = r"
        for (let i = 0; i < 3; i++) {
            let j = 0;
            while (true) {
                j++;
                if (j == 2) continue;
                if (j > 3) break;
                print i * 10 + j;
            }
            if (i == 1) break;
        }
    ";
    assert_eq!(output(source), "1\n3\n11\n13\n");
}

#[test]
fn continue_in_a_for_loop_still_runs_the_increment() {
    let source = r"
        let total = 0;
        for (let i = 0; i < 6; i++) {
            if (i % 2 == 0) continue;
            total += i;
        }
        print total;
    ";
    assert_eq!(output(source), "9\n");
}

#[test]
fn return_unwinds_through_loops_and_blocks() {
    let source = r"
        fn find(xs, target) {
            for (let i = 0; i < xs.length; i++) {
                { if (xs[i] == target) return i; }
            }
            return -1;
        }
        print find([5, 6, 7], 7);
        print find([5, 6, 7], 8);
        fn nothing() { }
        print nothing();
    ";
    assert_eq!(output(source), "2\n-1\nnil\n");
}

#[test]
fn recursion() {
    let source = r"
        fn fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }
        print fib(15);
    ";
    assert_eq!(output(source), "610\n");
}

#[test]
fn increments_and_compound_assignment() {
    let source = r#"
        let i = 5;
        print i++;
        print i;
        print --i;
        i *= 3;
        print i;
        let s = "a";
        s += 1;
        print s;
    "#;
    assert_eq!(output(source), "5\n6\n5\n15\na1\n");
}

#[test]
fn assignment_to_an_undeclared_name_defines_it() {
    assert_eq!(output("fresh = 3; print fresh;"), "3\n");
}

#[test]
fn equality_is_by_value_for_scalars_and_identity_for_containers() {
    let source = r#"
        let a = [1];
        print 1 == 1;
        print "a" == "a";
        print nil == false;
        print [1] == [1];
        print a == a;
        print 1 != "1";
    "#;
    assert_eq!(output(source), "true\ntrue\nfalse\nfalse\ntrue\ntrue\n");
}

#[test]
fn hash_maps() {
    let source = r#"
        let m = { "b": 2, "a": 1 };
        m["c"] = [1, "x"];
        print m;
        print m.size;
        print m.keys();
        print m["missing"];
        print m.has("a");
        print m.remove("a");
        print m.size;
        m[1] = "one";
        print m["1"];
    "#;
    assert_eq!(output(source),
               "{\"a\": 1, \"b\": 2, \"c\": [1, \"x\"]}\n3\n[\"a\", \"b\", \"c\"]\nnil\ntrue\n1\n2\none\n");
}

#[test]
fn higher_order_array_methods() {
    let source = r#"
        let xs = [1, 2, 3, 4];
        print xs.map(fn (x) { return x * x; });
        print xs.filter(fn (x) { return x % 2 == 0; });
        print xs.reduce(fn (acc, x) { return acc + x; }, 0);
        print xs.find(fn (x) { return x > 2; });
        print xs.find(fn (x) { return x > 9; });
        print xs.some(fn (x) { return x > 3; });
        print xs.every(fn (x) { return x > 3; });
        print xs.slice(1, -1);
        print xs.concat([5]).join("-");
        print xs.pop();
        print [].pop();
    "#;
    assert_eq!(output(source),
               "[1, 4, 9, 16]\n[2, 4]\n10\n3\nnil\ntrue\nfalse\n[2, 3]\n1-2-3-4-5\n4\nnil\n");
}

#[test]
fn bound_methods_can_be_stored() {
    assert_eq!(output("let xs = []; let push = xs.push; push(1); push(2); print xs;"),
               "[1, 2]\n");
}

#[test]
fn builtins() {
    let source = r#"
        print len("héllo");
        print len([1, 2]);
        print str(1.5) + "!";
        print num("42") + 1;
        print type(nil);
        print type(len);
        print sqrt(16);
        print floor(-1.5);
        print min(3, 4);
        print max(3, 4);
        print keys({ "z": 1, "y": 2 });
        print clock() > 0;
        print len;
    "#;
    assert_eq!(output(source),
               "5\n2\n1.5!\n43\nnil\nfunction\n4\n-2\n3\n4\n[\"y\", \"z\"]\ntrue\n<native fn len>\n");
}

#[test]
fn function_values_display() {
    assert_eq!(output("fn named() {} print named; print fn () {};"), "<fn named>\n<fn>\n");
}

#[test]
fn number_formatting() {
    assert_eq!(output("print 3.0; print 1 / 3; print -0; print 2.50;"),
               "3\n0.333333\n0\n2.5\n");
}

#[test]
fn runtime_errors_are_located() {
    let err = runtime_error("let x = 1;\nprint x + nope;");
    assert_eq!(err.to_string(), "Error on line 2, column 11: Undefined variable 'nope'.");

    assert!(matches!(runtime_error("print 1 / 0;"), RuntimeError::DivisionByZero { .. }));
    assert!(matches!(runtime_error("print -\"a\";"), RuntimeError::TypeError { .. }));
    assert!(matches!(runtime_error("print \"a\" < \"b\";"), RuntimeError::TypeError { .. }));
    assert!(matches!(runtime_error("let f = 1; f();"),
                     RuntimeError::NotCallable { type_name: "number", .. }));
    assert!(matches!(runtime_error("fn f(a) {} f(1, 2);"),
                     RuntimeError::ArgumentCountMismatch { expected: 1, found: 2, .. }));
    assert!(matches!(runtime_error("print [].nope;"), RuntimeError::UnknownMember { .. }));
    assert!(matches!(runtime_error("print (1).length;"), RuntimeError::NoMembers { .. }));
    assert!(matches!(runtime_error("print num(\"abc\");"), RuntimeError::Native { .. }));
}

#[test]
fn output_before_a_runtime_error_is_kept_in_the_sink() {
    let out = SharedOutput::new();
    let mut interpreter = Interpreter::with_output(out.clone());
    let result = run_with(&mut interpreter, "print 1; print nope; print 2;");
    assert!(matches!(result, Err(Error::Runtime(_))));
    assert_eq!(out.contents(), "1\n");
}

#[test]
fn parse_errors_prevent_execution() {
    let out = SharedOutput::new();
    let mut interpreter = Interpreter::with_output(out.clone());
    let result = run_with(&mut interpreter, "print 1; print ;");
    assert!(matches!(result, Err(Error::Parse(ref errors)) if errors.len() == 1));
    assert_eq!(out.contents(), "");
}

#[test]
fn globals_persist_between_runs_until_reset() {
    let out = SharedOutput::new();
    let mut interpreter = Interpreter::with_output(out.clone());
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    interpreter.define("tick", 0, move |_| {
                   counter.set(counter.get() + 1);
                   Ok(Value::Nil)
               });

    run_with(&mut interpreter, "let kept = 7; tick();").unwrap();
    run_with(&mut interpreter, "print kept;").unwrap();
    assert_eq!(out.contents(), "7\n");

    interpreter.reset();
    assert!(interpreter.global("kept").is_none());
    assert!(interpreter.global("len").is_some());
    run_with(&mut interpreter, "tick();").unwrap();
    assert_eq!(calls.get(), 2);
}

#[test]
fn host_natives_report_errors_at_the_call_site() {
    let mut interpreter = Interpreter::with_output(SharedOutput::new());
    interpreter.define("fail", 1, |_| Err("no good".to_string()));

    let err = run_with(&mut interpreter, "\n  fail(1);").unwrap_err();
    assert_eq!(err.to_string(), "Error on line 2, column 7: fail: no good");
}

#[test]
fn callbacks_that_mutate_the_array_see_a_snapshot() {
    let source = r"
        let xs = [1, 2];
        let seen = xs.map(fn (x) { xs.push(x); return x; });
        print seen;
        print xs.length;
    ";
    assert_eq!(output(source), "[1, 2]\n4\n");
}

#[test]
fn self_referential_arrays_print_finitely() {
    assert_eq!(output("let a = [1]; a.push(a); print a;"), "[1, [...]]\n");
}

#[test]
fn unbounded_recursion_is_a_runtime_error() {
    let err = runtime_error("fn f() {\n  return f();\n}\nf();");
    assert!(matches!(err, RuntimeError::StackOverflow { depth: MAX_CALL_DEPTH, .. }), "{err:?}");
    assert_eq!(err.location().line, 2);
    assert!(err.to_string().contains("Maximum recursion depth exceeded"));
}

#[test]
fn deep_recursion_within_the_limit_completes() {
    let source = r"
        fn sum(n) { if (n == 0) return 0; return n + sum(n - 1); }
        print sum(1000);
    ";
    assert_eq!(output(source), "500500\n");
}

#[test]
fn interpreter_keeps_working_after_a_stack_overflow() {
    let out = SharedOutput::new();
    let mut interpreter = Interpreter::with_output(out.clone());

    let err = run_with(&mut interpreter, "fn f(n) { return f(n + 1); } f(0);").unwrap_err();
    assert!(matches!(err, Error::Runtime(RuntimeError::StackOverflow { .. })));

    run_with(&mut interpreter,
             "fn down(n) { if (n == 0) return \"done\"; return down(n - 1); } print down(500);").unwrap();
    assert_eq!(out.contents(), "done\n");
}

#[test]
fn deeply_nested_programs_run() {
    let depth = 3000;
    assert_eq!(output(&format!("print {}1{};", "(".repeat(depth), ")".repeat(depth))), "1\n");
    assert_eq!(output(&format!("{}print 2;{}", "{ ".repeat(depth), "} ".repeat(depth))), "2\n");
    assert_eq!(output(&format!("{}print 3;", "if (true) ".repeat(depth))), "3\n");
}

#[test]
fn scope_is_restored_after_a_runtime_error() {
    let mut interpreter = Interpreter::with_output(SharedOutput::new());
    let err = run_with(&mut interpreter, "fn f() { let inner = 1; { let deeper = 2; nope; } } f();").unwrap_err();
    assert!(matches!(err, Error::Runtime(RuntimeError::UnknownVariable { ref name, .. }) if name == "nope"));

    for name in ["deeper", "inner"] {
        let (expr, errors) = parse_expression(&tokenize(name));
        assert!(errors.is_empty());
        let result = interpreter.evaluate(&expr.expect("expression"));
        assert!(matches!(result, Err(RuntimeError::UnknownVariable { .. })), "{name} leaked: {result:?}");
    }
    assert_eq!(eval(&mut interpreter, "f == nil"), Value::Bool(false));
}

#[test]
fn index_assignment_checks_bounds_after_evaluating_the_value() {
    let err = runtime_error("let a = [1, 2]; a[1] = a.pop();");
    assert!(matches!(err, RuntimeError::IndexOutOfBounds { length: 1, .. }), "{err:?}");
    assert_eq!(output("let a = [1, 2]; a[0] = a.pop(); print a;"), "[2]\n");
}
