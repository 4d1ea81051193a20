mod common;

use common::run_ok;

#[test]
fn test_counter_keeps_its_own_state() {
    let source = r#"
        fun makeCounter() {
            var i = 0;
            fun count() {
                i = i + 1;
                print i;
            }
            return count;
        }

        var counter = makeCounter();
        counter();
        counter();
    "#;

    assert_eq!(run_ok(source), vec!["1", "2"]);
}

#[test]
fn test_counters_are_independent() {
    let source = r#"
        fun makeCounter() {
            var i = 0;
            fun count() { i = i + 1; return i; }
            return count;
        }

        var a = makeCounter();
        var b = makeCounter();
        a(); a();
        print a();
        print b();
    "#;

    assert_eq!(run_ok(source), vec!["3", "1"]);
}

#[test]
fn test_closure_binds_at_declaration() {
    let source = r#"
        var a = "global";
        {
            fun showA() { print a; }
            showA();
            var a = "block";
            showA();
            print a;
        }
    "#;

    assert_eq!(run_ok(source), vec!["global", "global", "block"]);
}

#[test]
fn test_recursion() {
    let source = r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(15);
    "#;

    assert_eq!(run_ok(source), vec!["610"]);
}

#[test]
fn test_mutual_recursion_between_globals() {
    let source = r#"
        fun isEven(n) { if (n == 0) return true; return isOdd(n - 1); }
        fun isOdd(n) { if (n == 0) return false; return isEven(n - 1); }
        print isEven(10);
        print isOdd(7);
    "#;

    assert_eq!(run_ok(source), vec!["true", "true"]);
}

#[test]
fn test_function_without_return_yields_nil() {
    assert_eq!(run_ok("fun f() {} print f();"), vec!["nil"]);
}

#[test]
fn test_function_display() {
    assert_eq!(run_ok("fun add(a, b) { return a + b; } print add;"), vec!["<fn add>"]);
}

#[test]
fn test_functions_compare_by_identity() {
    let source = r#"
        fun f() {}
        var g = f;
        fun h() {}
        print f == g;
        print f == h;
    "#;

    assert_eq!(run_ok(source), vec!["true", "false"]);
}

#[test]
fn test_return_unwinds_from_loops() {
    let source = r#"
        fun first() {
            for (var i = 0; i < 10; i = i + 1) {
                while (true) {
                    return i;
                }
            }
        }
        print first();
    "#;

    assert_eq!(run_ok(source), vec!["0"]);
}
