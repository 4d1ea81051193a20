#[cfg(test)]
mod parser_tests {
    use rox::ast::{Expr, ExprIds, Stmt};
    use rox::ast_printer::AstPrinter;
    use rox::parser::Parser;
    use rox::scanner::scan;

    fn parse(source: &str) -> (Vec<Stmt>, Vec<String>) {
        let (tokens, lex_errors) = scan(source);
        assert!(lex_errors.is_empty(), "lexical errors in {:?}", source);

        let mut ids = ExprIds::new();
        let (statements, errors) = Parser::new(&tokens, &mut ids).parse();
        (statements, errors.iter().map(|e| e.to_string()).collect())
    }

    fn print(source: &str) -> Vec<String> {
        let (statements, errors) = parse(source);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);

        let printer = AstPrinter;
        statements.iter().map(|s| printer.print_stmt(s)).collect()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(print("1 + 2 * 3 - 4;"), vec!["(; (- (+ 1.0 (* 2.0 3.0)) 4.0))"]);
        assert_eq!(print("!(1 < 2) == false;"), vec!["(; (== (! (group (< 1.0 2.0))) false))"]);
    }

    #[test]
    fn test_comma_has_lowest_precedence() {
        assert_eq!(print("a = 1, b = 2;"), vec!["(; (, (= a 1.0) (= b 2.0)))"]);
    }

    #[test]
    fn test_call_arguments_are_not_comma_expressions() {
        assert_eq!(print("f(1, 2);"), vec!["(; (call f 1.0 2.0))"]);
    }

    #[test]
    fn test_ternary_is_right_associative() {
        assert_eq!(
            print("a ? b : c ? d : e;"),
            vec!["(; (?: a b (?: c d e)))"]
        );
    }

    #[test]
    fn test_ternary_rejects_second_colon() {
        let (_, errors) = parse("a ? b : c : d;");

        assert_eq!(
            errors[0],
            "[line 1] Error at ':': Expected only one ':' in a conditional expression."
        );
    }

    #[test]
    fn test_ternary_nested_in_then_branch() {
        assert_eq!(
            print("a ? b ? c : d : e;"),
            vec!["(; (?: a (?: b c d) e))"]
        );
    }

    #[test]
    fn test_ternary_inside_parens_and_arguments() {
        assert_eq!(
            print("a ? (b ? c : d) : e;"),
            vec!["(; (?: a (group (?: b c d)) e))"]
        );
        assert_eq!(
            print("a ? f(b ? c : d) : e;"),
            vec!["(; (?: a (call f (?: b c d)) e))"]
        );
    }

    #[test]
    fn test_extra_colon_inside_then_branch_is_rejected() {
        let (_, errors) = parse("x ? a ? b : c : d : e;");

        assert_eq!(
            errors,
            vec!["[line 1] Error at ':': Expected only one ':' in a conditional expression."]
        );
    }

    #[test]
    fn test_for_desugars_to_while() {
        assert_eq!(
            print("for (var i = 0; i < 2; i = i + 1) print i;"),
            vec!["(block (var i 0.0) (while (< i 2.0) (block (print i) (; (= i (+ i 1.0))))))"]
        );
    }

    #[test]
    fn test_for_without_condition_loops_forever() {
        let (statements, errors) = parse("for (;;) break;");
        assert!(errors.is_empty());

        let Stmt::While { condition, .. } = &statements[0] else {
            panic!("expected a while loop, got {:?}", statements[0]);
        };
        assert_eq!(AstPrinter.print(condition), "true");
    }

    #[test]
    fn test_class_with_superclass() {
        assert_eq!(
            print("class B < A { init(x) { this.x = x; } }"),
            vec!["(class B < A (method init (x) (; (= (. this x) x))))"]
        );
    }

    #[test]
    fn test_invalid_assignment_target() {
        let (_, errors) = parse("1 = 2;");

        assert_eq!(errors, vec!["[line 1] Error at '=': Invalid assignment target."]);
    }

    #[test]
    fn test_binary_operator_without_left_operand() {
        let (_, errors) = parse("* 3;");

        assert_eq!(
            errors,
            vec!["[line 1] Error at '*': Binary operator expected a left-hand operand."]
        );
    }

    #[test]
    fn test_missing_left_operand_still_checks_right_operand() {
        let (_, errors) = parse("* 1 = 2;");

        assert_eq!(
            errors,
            vec![
                "[line 1] Error at '=': Invalid assignment target.",
                "[line 1] Error at '*': Binary operator expected a left-hand operand.",
            ]
        );
    }

    #[test]
    fn test_error_at_end() {
        let (_, errors) = parse("print 1");

        assert_eq!(errors, vec!["[line 1] Error at end: Expected ';' after value."]);
    }

    #[test]
    fn test_synchronize_reports_every_bad_statement() {
        let (statements, errors) = parse("var = 1;\nprint 2;\nvar ;\nprint 3;");

        assert_eq!(errors.len(), 2);
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_too_many_arguments() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let (_, errors) = parse(&format!("f({});", args.join(", ")));

        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Can't have more than 255 arguments."));
    }

    #[test]
    fn test_variable_references_get_distinct_ids() {
        let (statements, _) = parse("a; a;");

        let ids: Vec<_> = statements
            .iter()
            .map(|s| match s {
                Stmt::Expression {
                    expr: Expr::Variable(v),
                    ..
                } => v.id,
                other => panic!("unexpected statement {:?}", other),
            })
            .collect();

        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_json_dump() {
        let (statements, _) = parse("print 1;");
        let json = serde_json::to_value(&statements).unwrap();

        assert!(json.is_array());
        assert!(json[0].get("Print").is_some());
    }
}
