mod common;

use common::{messages, run, run_ok};
use rox::{RuntimeErrorKind, Session};

#[test]
fn test_arithmetic_and_number_display() {
    assert_eq!(
        run_ok("print 1 + 2; print 7 / 2; print -0; print 10 * 0.5; print 2 - 5;"),
        vec!["3", "3.5", "-0", "5", "-3"]
    );
}

#[test]
fn test_string_concatenation_coerces() {
    assert_eq!(
        run_ok(r#"print 1 + "a"; print "a" + 1; print "x" + nil; print "a" + "b";"#),
        vec!["1a", "a1", "xnil", "ab"]
    );
}

#[test]
fn test_equality() {
    assert_eq!(
        run_ok(r#"print nil == nil; print nil == false; print 1 == 1; print "a" != "a";"#),
        vec!["true", "false", "true", "false"]
    );
}

#[test]
fn test_truthiness() {
    assert_eq!(
        run_ok(r#"print !nil; print !0; print !""; print !false;"#),
        vec!["true", "false", "false", "true"]
    );
}

#[test]
fn test_logical_operators_return_operands() {
    assert_eq!(
        run_ok(r#"print nil or "x"; print 1 and 2; print false and boom;"#),
        vec!["x", "2", "false"]
    );
}

#[test]
fn test_ternary_and_comma() {
    assert_eq!(
        run_ok("print true ? 1 : 2; print nil ? 1 : 2; var a = (1, 2); print a;"),
        vec!["1", "2", "2"]
    );
}

#[test]
fn test_division_by_zero_aborts() {
    let (output, diagnostics) = run("print 1; print 1 / 0; print 2;");

    assert_eq!(output, "1\n");
    assert!(!diagnostics.had_error());
    assert_eq!(
        diagnostics.runtime_error().map(|e| e.kind.clone()),
        Some(RuntimeErrorKind::DivisionByZero)
    );
    assert_eq!(messages(&diagnostics), vec!["[line 1] Runtime error: Division by zero."]);
}

#[test]
fn test_type_errors() {
    let (_, diagnostics) = run("print -\"a\";");
    assert_eq!(
        messages(&diagnostics),
        vec!["[line 1] Runtime error: Operand must be a number."]
    );

    let (_, diagnostics) = run("print 1 < \"a\";");
    assert_eq!(
        messages(&diagnostics),
        vec!["[line 1] Runtime error: Operands must be numbers."]
    );
}

#[test]
fn test_undefined_variable() {
    let (_, diagnostics) = run("print missing;");

    assert_eq!(
        diagnostics.runtime_error().map(|e| e.kind.clone()),
        Some(RuntimeErrorKind::UndefinedVariable("missing".to_string()))
    );
}

#[test]
fn test_assigning_undeclared_global_fails() {
    let (_, diagnostics) = run("missing = 1;");

    assert!(diagnostics.had_runtime_error());
}

#[test]
fn test_static_errors_prevent_execution() {
    let (output, diagnostics) = run("print 1; print ;");

    assert_eq!(output, "");
    assert!(diagnostics.had_error());
    assert!(!diagnostics.had_runtime_error());
}

#[test]
fn test_resolution_errors_prevent_execution() {
    let (output, diagnostics) = run("print 1; return 2;");

    assert_eq!(output, "");
    assert!(diagnostics.had_error());
}

#[test]
fn test_block_scoping_and_shadowing() {
    assert_eq!(
        run_ok("var a = 1; { var a = 2; print a; } print a;"),
        vec!["2", "1"]
    );
}

#[test]
fn test_native_clock() {
    assert_eq!(
        run_ok("var t = clock(); print t > 0; print clock;"),
        vec!["true", "<native fn>"]
    );
}

#[test]
fn test_calling_non_callable() {
    let (_, diagnostics) = run(r#""str"();"#);

    assert_eq!(
        diagnostics.runtime_error().map(|e| e.kind.clone()),
        Some(RuntimeErrorKind::NotCallable)
    );
}

#[test]
fn test_arity_mismatch() {
    let (_, diagnostics) = run("fun f(a, b) {} f(1);");

    assert_eq!(
        messages(&diagnostics),
        vec!["[line 1] Runtime error: Expected 2 arguments but got 1."]
    );
}

#[test]
fn test_session_keeps_globals_between_runs() {
    let out = common::SharedBuffer::default();
    let mut session = Session::interactive(Box::new(out.clone()));

    assert!(session.run("var a = 1;").is_empty());
    assert!(session.run("fun inc() { a = a + 1; return a; }").is_empty());
    assert!(session.run("inc();").is_empty());
    assert!(session.run("a;").is_empty());

    assert_eq!(out.contents(), "2\n2\n");
}

#[test]
fn test_session_recovers_after_an_error() {
    let out = common::SharedBuffer::default();
    let mut session = Session::new(Box::new(out.clone()));

    assert!(session.run("print 1 / 0;").had_runtime_error());
    assert!(session.run("print ;").had_error());
    assert!(session.run("print 3;").is_empty());

    assert_eq!(out.contents(), "3\n");
}

#[test]
fn test_nested_ternary_evaluates() {
    assert_eq!(run_ok("print true ? false ? 1 : 2 : 3;"), vec!["2"]);
}

struct BrokenPipe;

impl std::io::Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_output_failure_reports_statement_line() {
    let mut session = Session::new(Box::new(BrokenPipe));
    let diagnostics = session.run("var a = 1;\nprint a;");

    assert_eq!(
        messages(&diagnostics),
        vec!["[line 2] Runtime error: Failed to write output: closed"]
    );
}

#[test]
fn test_repl_echo_failure_reports_statement_line() {
    let mut session = Session::interactive(Box::new(BrokenPipe));
    let diagnostics = session.run("\n\n1 +\n2;");

    assert_eq!(
        diagnostics.runtime_error().map(|e| e.line),
        Some(4)
    );
}
