mod common;

use common::{run, run_ok};

#[test]
fn test_if_else() {
    assert_eq!(
        run_ok("if (1 > 2) print \"a\"; else print \"b\"; if (nil) print \"c\";"),
        vec!["b"]
    );
}

#[test]
fn test_dangling_else_binds_to_nearest_if() {
    assert_eq!(
        run_ok("if (true) if (false) print 1; else print 2;"),
        vec!["2"]
    );
}

#[test]
fn test_while_loop() {
    assert_eq!(
        run_ok("var i = 0; while (i < 3) { print i; i = i + 1; }"),
        vec!["0", "1", "2"]
    );
}

#[test]
fn test_for_loop_scopes_its_variable() {
    let source = r#"
        var i = "outer";
        for (var i = 0; i < 2; i = i + 1) print i;
        print i;
    "#;

    assert_eq!(run_ok(source), vec!["0", "1", "outer"]);
}

#[test]
fn test_break_exits_the_loop_immediately() {
    let source = r#"
        var i = 0;
        while (true) {
            i = i + 1;
            if (i == 3) break;
            print i;
        }
        print "done";
    "#;

    assert_eq!(run_ok(source), vec!["1", "2", "done"]);
}

#[test]
fn test_inner_break_lets_outer_loop_continue() {
    let source = r#"
        for (var i = 0; i < 3; i = i + 1) {
            for (var j = 0; j < 3; j = j + 1) {
                if (j == 1) break;
                print i * 10 + j;
            }
        }
    "#;

    assert_eq!(run_ok(source), vec!["0", "10", "20"]);
}

#[test]
fn test_break_out_of_nested_blocks() {
    let source = r#"
        var a = "outer";
        while (true) {
            var a = "loop";
            {
                var a = "block";
                break;
            }
        }
        print a;
    "#;

    assert_eq!(run_ok(source), vec!["outer"]);
}

#[test]
fn test_break_outside_loop_is_static_error() {
    let (output, diagnostics) = run("print 1; break;");

    assert_eq!(output, "");
    assert!(diagnostics.had_error());
}

#[test]
fn test_environment_is_restored_after_runtime_error_in_block() {
    let out = common::SharedBuffer::default();
    let mut session = rox::Session::new(Box::new(out.clone()));

    assert!(session
        .run("var a = \"global\"; { var a = \"block\"; print nil + 1; }")
        .had_runtime_error());
    assert!(session.run("print a;").is_empty());

    assert_eq!(out.contents(), "global\n");
}
