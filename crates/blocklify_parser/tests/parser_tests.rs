//! Parser integration tests.
//!
//! Verifies the AST shapes the parser builds and the errors it raises,
//! using the span-free dump for structural comparison.

use blocklify_ast::dump::dump_program;
use blocklify_ast::{Expression, ForInit, LiteralValue, Statement};
use blocklify_core::text::{LineAndColumn, TextRange};
use blocklify_diagnostics::{SyntaxError, SyntaxErrorKind};
use blocklify_options::{EcmaVersion, ParserOptions};
use blocklify_parser::{parse, Comment, Parser};
use bumpalo::Bump;

/// Helper: parse source text and return its dump.
fn dump(source: &str) -> String {
    dump_with(source, &ParserOptions::default())
}

fn dump_with(source: &str, options: &ParserOptions) -> String {
    let arena = Bump::new();
    match parse(&arena, source, options) {
        Ok(program) => dump_program(&program),
        Err(err) => panic!("unexpected error for {:?}: {}", source, err),
    }
}

/// Helper: parse source text that must fail and return the error.
fn parse_error(source: &str) -> SyntaxError {
    parse_error_with(source, &ParserOptions::default())
}

fn parse_error_with(source: &str, options: &ParserOptions) -> SyntaxError {
    let arena = Bump::new();
    match parse(&arena, source, options) {
        Ok(program) => panic!("expected an error for {:?}, got {}", source, dump_program(&program)),
        Err(err) => err,
    }
}

fn assert_error(source: &str, expected: &str) {
    assert_eq!(parse_error(source).to_string(), expected, "source: {}", source);
}

// ============================================================================
// Variable Declarations
// ============================================================================

#[test]
fn test_parse_var_with_precedence() {
    assert_eq!(
        dump("var a = 1 + 2 * 3;"),
        "(Program (VariableDeclaration (VariableDeclarator a (BinaryExpression + 1 (BinaryExpression * 2 3)))))"
    );
}

#[test]
fn test_parse_multiple_declarators() {
    assert_eq!(
        dump("var a, b = 'x';"),
        "(Program (VariableDeclaration (VariableDeclarator a _) (VariableDeclarator b \"x\")))"
    );
}

#[test]
fn test_var_spans_include_semicolon() {
    let arena = Bump::new();
    let program = parse(&arena, "var a = 1;  ", &ParserOptions::default()).unwrap();
    assert_eq!(program.body[0].data().range, TextRange::new(0, 10));
    assert_eq!(program.data.range, TextRange::new(0, 12));
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_binary_operators_are_left_associative() {
    assert_eq!(
        dump("a - b - c;"),
        "(Program (ExpressionStatement (BinaryExpression - (BinaryExpression - a b) c)))"
    );
}

#[test]
fn test_precedence_ladder() {
    assert_eq!(
        dump("a || b && c | d ^ e & f == g < h << i + j * k;"),
        "(Program (ExpressionStatement (LogicalExpression || a (LogicalExpression && b \
         (BinaryExpression | c (BinaryExpression ^ d (BinaryExpression & e \
         (BinaryExpression == f (BinaryExpression < g (BinaryExpression << h \
         (BinaryExpression + i (BinaryExpression * j k)))))))))))"
    );
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(
        dump("a = b += c;"),
        "(Program (ExpressionStatement (AssignmentExpression = a (AssignmentExpression += b c))))"
    );
}

#[test]
fn test_conditional_nests_to_the_right() {
    assert_eq!(
        dump("a ? b : c ? d : e;"),
        "(Program (ExpressionStatement (ConditionalExpression a b (ConditionalExpression c d e))))"
    );
}

#[test]
fn test_sequence_expression() {
    assert_eq!(
        dump("a, b, c;"),
        "(Program (ExpressionStatement (SequenceExpression a b c)))"
    );
}

#[test]
fn test_unary_and_update() {
    assert_eq!(
        dump("typeof -x; !++y; z--;"),
        "(Program (ExpressionStatement (UnaryExpression typeof (UnaryExpression - x))) \
         (ExpressionStatement (UnaryExpression ! (UpdateExpression ++ prefix y))) \
         (ExpressionStatement (UpdateExpression -- postfix z)))"
    );
}

#[test]
fn test_postfix_update_not_across_newline() {
    assert_eq!(
        dump("a\n++b"),
        "(Program (ExpressionStatement a) (ExpressionStatement (UpdateExpression ++ prefix b)))"
    );
}

#[test]
fn test_member_and_call_chain() {
    assert_eq!(
        dump("a.b[c](d, e).f;"),
        "(Program (ExpressionStatement (MemberExpression. (CallExpression \
         (MemberExpression[] (MemberExpression. a b) c) d e) f)))"
    );
}

#[test]
fn test_keywords_allowed_as_property_names() {
    assert_eq!(
        dump("a.if.typeof / 2;"),
        "(Program (ExpressionStatement (BinaryExpression / (MemberExpression. (MemberExpression. a if) typeof) 2)))"
    );
}

#[test]
fn test_keyword_property_rejected_when_reserved_forbidden() {
    let options = ParserOptions {
        forbid_reserved: true,
        ..ParserOptions::default()
    };
    assert_eq!(
        parse_error_with("a.if;", &options).to_string(),
        "Unexpected token (1:2)"
    );
}

#[test]
fn test_new_expressions() {
    assert_eq!(dump("new Foo;"), "(Program (ExpressionStatement (NewExpression Foo)))");
    assert_eq!(
        dump("new a.b.C(1);"),
        "(Program (ExpressionStatement (NewExpression (MemberExpression. (MemberExpression. a b) C) 1)))"
    );
    assert_eq!(
        dump("new Foo().bar;"),
        "(Program (ExpressionStatement (MemberExpression. (NewExpression Foo) bar)))"
    );
    assert_eq!(
        dump("new (f())();"),
        "(Program (ExpressionStatement (NewExpression (CallExpression f))))"
    );
}

#[test]
fn test_literals() {
    assert_eq!(
        dump("null; true; false; 0x1F; 'a\\tb'; this;"),
        "(Program (ExpressionStatement null) (ExpressionStatement true) \
         (ExpressionStatement false) (ExpressionStatement 31) \
         (ExpressionStatement \"a\\tb\") (ExpressionStatement this))"
    );
}

#[test]
fn test_literal_raw_text() {
    let arena = Bump::new();
    let program = parse(&arena, "x = 1.50;", &ParserOptions::default()).unwrap();
    let Statement::Expression(stmt) = &program.body[0] else {
        panic!("expected an expression statement");
    };
    let Expression::Assignment(assign) = stmt.expression else {
        panic!("expected an assignment");
    };
    let Expression::Literal(lit) = assign.right else {
        panic!("expected a literal");
    };
    assert_eq!(lit.raw, "1.50");
    assert_eq!(lit.value, LiteralValue::Number(1.5));
}

#[test]
fn test_array_holes_and_trailing_comma() {
    assert_eq!(
        dump("[1, , 2];"),
        "(Program (ExpressionStatement (ArrayExpression 1 _ 2)))"
    );
    assert_eq!(
        dump("[1, 2,];"),
        "(Program (ExpressionStatement (ArrayExpression 1 2)))"
    );
    assert_eq!(dump("[,];"), "(Program (ExpressionStatement (ArrayExpression _)))");
}

#[test]
fn test_trailing_commas_can_be_disabled() {
    let options = ParserOptions {
        allow_trailing_commas: false,
        ..ParserOptions::default()
    };
    assert_eq!(
        parse_error_with("[1,];", &options).to_string(),
        "Unexpected token (1:3)"
    );
    assert_eq!(
        parse_error_with("x = {a: 1,};", &options).to_string(),
        "Unexpected token (1:10)"
    );
}

#[test]
fn test_object_literal() {
    assert_eq!(
        dump("x = {a: 1, 'b': 2, 3: c};"),
        "(Program (ExpressionStatement (AssignmentExpression = x (ObjectExpression \
         (Init \"a\" 1) (Init \"b\" 2) (Init \"3\" c)))))"
    );
    assert_eq!(
        dump("x = {};"),
        "(Program (ExpressionStatement (AssignmentExpression = x (ObjectExpression))))"
    );
}

#[test]
fn test_getters_and_setters() {
    let out = dump("x = {get a() { return 1; }, set a(v) {}, get: 2};");
    assert!(out.contains("(Get \"a\" (FunctionExpression _ () "));
    assert!(out.contains("(Set \"a\" (FunctionExpression _ (v) "));
    assert!(out.contains("(Init \"get\" 2)"));
}

#[test]
fn test_getters_need_ecma5() {
    let options = ParserOptions {
        ecma_version: EcmaVersion::V3,
        ..ParserOptions::default()
    };
    assert_eq!(
        parse_error_with("x = {get a() {}};", &options).to_string(),
        "Unexpected token (1:9)"
    );
}

#[test]
fn test_function_expression_and_declaration() {
    assert_eq!(
        dump("function f(a, b) { return a; } g = function () {};"),
        "(Program (FunctionDeclaration f (a b) (BlockStatement (ReturnStatement a))) \
         (ExpressionStatement (AssignmentExpression = g (FunctionExpression _ () (BlockStatement)))))"
    );
}

#[test]
fn test_parenthesized_span_covers_parens() {
    let arena = Bump::new();
    let program = parse(&arena, "(a + b) * c;", &ParserOptions::default()).unwrap();
    let Statement::Expression(stmt) = &program.body[0] else {
        panic!("expected an expression statement");
    };
    let Expression::Binary(mul) = stmt.expression else {
        panic!("expected a binary expression");
    };
    assert_eq!(mul.left.data().range, TextRange::new(0, 7));
    assert_eq!(mul.data.range, TextRange::new(0, 11));
}

// ============================================================================
// Regular expressions vs division
// ============================================================================

#[test]
fn test_division_after_operand() {
    assert_eq!(
        dump("a = b / c / d;"),
        "(Program (ExpressionStatement (AssignmentExpression = a (BinaryExpression / (BinaryExpression / b c) d))))"
    );
}

#[test]
fn test_regex_after_operator() {
    assert_eq!(
        dump("x = /re/g.test(y);"),
        "(Program (ExpressionStatement (AssignmentExpression = x (CallExpression (MemberExpression. /re/g test) y))))"
    );
}

#[test]
fn test_regex_at_statement_start() {
    assert_eq!(
        dump("{}\n/foo/.test(a);"),
        "(Program (BlockStatement) (ExpressionStatement (CallExpression (MemberExpression. /foo/ test) a)))"
    );
}

#[test]
fn test_regex_after_prefix_update() {
    assert_eq!(
        dump("++/x/.lastIndex;"),
        "(Program (ExpressionStatement (UpdateExpression ++ prefix (MemberExpression. /x/ lastIndex))))"
    );
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_if_else_chain() {
    assert_eq!(
        dump("if (a) { b(); } else if (c) { d(); } else { e(); }"),
        "(Program (IfStatement a (BlockStatement (ExpressionStatement (CallExpression b))) \
         (IfStatement c (BlockStatement (ExpressionStatement (CallExpression d))) \
         (BlockStatement (ExpressionStatement (CallExpression e))))))"
    );
}

#[test]
fn test_for_statement() {
    assert_eq!(
        dump("for (var i = 0, j = 1; i < j; i++) {}"),
        "(Program (ForStatement (VariableDeclaration (VariableDeclarator i 0) (VariableDeclarator j 1)) \
         (BinaryExpression < i j) (UpdateExpression ++ postfix i) (BlockStatement)))"
    );
    assert_eq!(dump("for (;;) break;"), "(Program (ForStatement _ _ _ (BreakStatement)))");
}

#[test]
fn test_for_in_statement() {
    assert_eq!(
        dump("for (var k in o) {}"),
        "(Program (ForInStatement (VariableDeclaration (VariableDeclarator k _)) o (BlockStatement)))"
    );
    assert_eq!(
        dump("for (a.b in o);"),
        "(Program (ForInStatement (MemberExpression. a b) o (EmptyStatement)))"
    );
}

#[test]
fn test_for_init_parses_without_in() {
    let arena = Bump::new();
    // `in` stops the init expression, so this is a for-in over an assignment.
    let err = parse(&arena, "for (x = 'a' in o;;);", &ParserOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Assigning to rvalue (1:5)");

    let out = dump("for (var x = ('a' in o); x;) break;");
    assert!(out.starts_with("(Program (ForStatement (VariableDeclaration (VariableDeclarator x (BinaryExpression in \"a\" o)))"));
}

#[test]
fn test_for_in_left_must_be_assignable() {
    assert_error("for (1 in o);", "Assigning to rvalue (1:5)");
}

#[test]
fn test_while_and_do_while() {
    assert_eq!(
        dump("while (a) b--; do x++; while (x < 5)"),
        "(Program (WhileStatement a (ExpressionStatement (UpdateExpression -- postfix b))) \
         (DoWhileStatement (ExpressionStatement (UpdateExpression ++ postfix x)) (BinaryExpression < x 5)))"
    );
}

#[test]
fn test_switch_statement() {
    assert_eq!(
        dump("switch (a) { case 1: b(); break; default: c(); }"),
        "(Program (SwitchStatement a (SwitchCase 1 (ExpressionStatement (CallExpression b)) (BreakStatement)) \
         (SwitchCase _ (ExpressionStatement (CallExpression c)))))"
    );
}

#[test]
fn test_try_catch_finally() {
    assert_eq!(
        dump("try { a(); } catch (e) { b(e); } finally { c(); }"),
        "(Program (TryStatement (BlockStatement (ExpressionStatement (CallExpression a))) \
         (CatchClause e (BlockStatement (ExpressionStatement (CallExpression b e)))) \
         (BlockStatement (ExpressionStatement (CallExpression c)))))"
    );
    assert_eq!(
        dump("try {} finally {}"),
        "(Program (TryStatement (BlockStatement) (BlockStatement)))"
    );
}

#[test]
fn test_labels_and_jumps() {
    assert_eq!(
        dump("outer: for (;;) { inner: while (1) { continue outer; } }"),
        "(Program (LabeledStatement outer (ForStatement _ _ _ (BlockStatement \
         (LabeledStatement inner (WhileStatement 1 (BlockStatement (ContinueStatement outer))))))))"
    );
    assert_eq!(
        dump("done: { break done; }"),
        "(Program (LabeledStatement done (BlockStatement (BreakStatement done))))"
    );
}

#[test]
fn test_misc_statements() {
    assert_eq!(
        dump(";debugger;with (o) x;throw e"),
        "(Program (EmptyStatement) (DebuggerStatement) (WithStatement o (ExpressionStatement x)) (ThrowStatement e))"
    );
}

#[test]
fn test_return_with_line_break() {
    assert_eq!(
        dump("function f() { return\n1; }"),
        "(Program (FunctionDeclaration f () (BlockStatement (ReturnStatement _) (ExpressionStatement 1))))"
    );
}

#[test]
fn test_for_init_variants() {
    let arena = Bump::new();
    let program = parse(&arena, "for (i = 0; i < 3; i++);", &ParserOptions::default()).unwrap();
    let Statement::For(stmt) = &program.body[0] else {
        panic!("expected a for statement");
    };
    assert!(matches!(stmt.init, Some(ForInit::Expression(Expression::Assignment(_)))));
}

// ============================================================================
// Automatic semicolon insertion
// ============================================================================

#[test]
fn test_asi_on_newline_brace_and_eof() {
    assert_eq!(
        dump("a\nb"),
        "(Program (ExpressionStatement a) (ExpressionStatement b))"
    );
    assert_eq!(
        dump("{ a }"),
        "(Program (BlockStatement (ExpressionStatement a)))"
    );
}

#[test]
fn test_strict_semicolons() {
    let options = ParserOptions {
        strict_semicolons: true,
        ..ParserOptions::default()
    };
    assert_eq!(
        parse_error_with("a\nb", &options).to_string(),
        "Unexpected token (2:0)"
    );
    assert_eq!(
        dump_with("a;\nb;", &options),
        "(Program (ExpressionStatement a) (ExpressionStatement b))"
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unexpected_tokens() {
    assert_error("a b", "Unexpected token (1:2)");
    assert_error("var", "Unexpected token (1:3)");
    assert_error("(1 + 2", "Unexpected token (1:6)");
    assert_error("function () {}", "Unexpected token (1:9)");
    assert_error("switch (a) { b; }", "Unexpected token (1:13)");
}

#[test]
fn test_return_outside_function() {
    assert_error("return 1;", "'return' outside of function (1:0)");
}

#[test]
fn test_unsyntactic_jumps() {
    assert_error("break;", "Unsyntactic break (1:0)");
    assert_error(
        "switch (a) { case 1: continue; }",
        "Unsyntactic continue (1:21)",
    );
    assert_error("lbl: { continue lbl; }", "Unsyntactic continue (1:7)");
    assert_error(
        "outer: while (1) { (function () { break outer; }); }",
        "Unsyntactic break (1:34)",
    );
}

#[test]
fn test_multiple_default_clauses() {
    assert_error(
        "switch (a) { default: default: }",
        "Multiple default clauses (1:22)",
    );
}

#[test]
fn test_illegal_newline_after_throw() {
    assert_error("throw\nx;", "Illegal newline after throw (1:5)");
}

#[test]
fn test_missing_catch_or_finally() {
    assert_error("try {}", "Missing catch or finally clause (1:0)");
}

#[test]
fn test_duplicate_label() {
    assert_error("a: a: b;", "Label 'a' is already declared (1:3)");
}

#[test]
fn test_assignment_targets() {
    assert_error("1 = 2;", "Assigning to rvalue (1:0)");
    assert_error("(a + b) = 1;", "Assigning to rvalue (1:0)");
    assert_error("f()++;", "Assigning to rvalue (1:0)");
    assert_eq!(
        dump("(a) = 1;"),
        "(Program (ExpressionStatement (AssignmentExpression = a 1)))"
    );
}

#[test]
fn test_redefinition_of_property() {
    assert_error("x = {a: 1, get a() {}};", "Redefinition of property (1:15)");
    assert_error("x = {get a() {}, get a() {}};", "Redefinition of property (1:21)");
    assert_eq!(
        dump("x = {a: 1, a: 2};"),
        "(Program (ExpressionStatement (AssignmentExpression = x (ObjectExpression (Init \"a\" 1) (Init \"a\" 2)))))"
    );
    assert!(dump("x = {get a() {}, set a(v) {}};").contains("(Set \"a\""));
}

#[test]
fn test_lex_errors_propagate() {
    let err = parse_error("var x = \"abc");
    assert_eq!(err.to_string(), "Unterminated string constant (1:8)");
    assert_eq!(err.kind, SyntaxErrorKind::Lex);

    let err = parse_error("019");
    assert_eq!(err.to_string(), "Invalid number (1:0)");
    assert!(err.is_lex());
}

fn assert_too_deep(source: &str) {
    let err = parse_error(source);
    assert_eq!(err.kind, SyntaxErrorKind::ResourceExhausted);
    assert_eq!(err.message, "Maximum nesting depth exceeded");
}

#[test]
fn test_nesting_depth_is_bounded() {
    assert_too_deep(&format!("{}a{}", "(".repeat(1000), ")".repeat(1000)));
    assert_too_deep(&format!("x = {}1{};", "[".repeat(1000), "]".repeat(1000)));
    assert_too_deep(&format!("{}{}", "{".repeat(1000), "}".repeat(1000)));
    assert_too_deep(&format!("{}a;", "!".repeat(100_000)));
}

#[test]
fn test_assignment_chain_depth_is_bounded() {
    assert_too_deep(&format!("{}1;", "a=".repeat(200_000)));
    assert_too_deep(&format!("{}1;", "a += ".repeat(1000)));
}

#[test]
fn test_conditional_chain_depth_is_bounded() {
    assert_too_deep(&format!("x = {}1;", "a ? b : ".repeat(200_000)));
    assert_too_deep(&format!("x = {}1;", "a ? ".repeat(1000) + &" : b".repeat(1000)));
}

#[test]
fn test_moderate_nesting_is_accepted() {
    let source = format!("x = {}a{};", "(".repeat(40), ")".repeat(40));
    assert_eq!(
        dump(&source),
        "(Program (ExpressionStatement (AssignmentExpression = x a)))"
    );

    let chain = format!("{}1;", "a = ".repeat(30));
    assert!(dump(&chain).starts_with("(Program (ExpressionStatement (AssignmentExpression = a"));

    let conditional = format!("x = {}1;", "a ? b : ".repeat(30));
    assert!(dump(&conditional).contains("(ConditionalExpression a b 1)"));
}

// ============================================================================
// Strict mode
// ============================================================================

#[test]
fn test_with_in_strict_function() {
    assert_error(
        "function f() { \"use strict\"; with (a) {} }",
        "'with' in strict mode (1:29)",
    );
}

#[test]
fn test_strict_mode_violations() {
    assert_error("\"use strict\"; eval = 1;", "Assigning to eval in strict mode (1:14)");
    assert_error("\"use strict\"; var arguments;", "Binding arguments in strict mode (1:18)");
    assert_error("\"use strict\"; delete x;", "Deleting local variable in strict mode (1:14)");
    assert_error("\"use strict\"; x = {a: 1, a: 2};", "Redefinition of property (1:25)");
    assert_error(
        "\"use strict\"; try {} catch (eval) {}",
        "Binding eval in strict mode (1:28)",
    );
}

#[test]
fn test_strict_function_parameters() {
    assert_error(
        "function f(eval) { \"use strict\"; }",
        "Defining 'eval' in strict mode (1:11)",
    );
    assert_error(
        "function f(a, a) { \"use strict\"; }",
        "Argument name clash in strict mode (1:14)",
    );
    assert_eq!(
        dump("function f(a, a) {}"),
        "(Program (FunctionDeclaration f (a a) (BlockStatement)))"
    );
}

#[test]
fn test_directive_relexes_lookahead() {
    // The token after the directive was scanned before strict mode began.
    let err = parse_error("\"use strict\"; 010");
    assert_eq!(err.to_string(), "Invalid number (1:14)");
    let err = parse_error("\"use strict\"; var let;");
    assert_eq!(err.to_string(), "The keyword 'let' is reserved (1:18)");
}

#[test]
fn test_directive_needs_ecma5() {
    let options = ParserOptions {
        ecma_version: EcmaVersion::V3,
        ..ParserOptions::default()
    };
    assert!(dump_with("\"use strict\"; with (a) {}", &options).contains("WithStatement"));
}

#[test]
fn test_directive_must_come_first() {
    assert!(dump("a; \"use strict\"; with (b) {}").contains("WithStatement"));
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_locations() {
    let options = ParserOptions {
        locations: true,
        ..ParserOptions::default()
    };
    let arena = Bump::new();
    let program = parse(&arena, "a;\n  bb;", &options).unwrap();
    let loc = program.body[1].data().loc.unwrap();
    assert_eq!(loc.start, LineAndColumn::new(2, 2));
    assert_eq!(loc.end, LineAndColumn::new(2, 5));

    let program = parse(&arena, "a;", &ParserOptions::default()).unwrap();
    assert!(program.body[0].data().loc.is_none());
}

#[test]
fn test_comment_handler() {
    let arena = Bump::new();
    let mut comments: Vec<Comment> = Vec::new();
    let count = Parser::new(&arena, "// one\nvar a; /* two */", &ParserOptions::default())
        .with_comment_handler(|c| comments.push(c))
        .parse()
        .unwrap()
        .body
        .len();
    assert_eq!(count, 1);
    assert_eq!(comments.len(), 2);
    assert!(!comments[0].block);
    assert_eq!(comments[0].text, " one");
    assert!(comments[1].block);
    assert_eq!(comments[1].text, " two ");
    assert_eq!((comments[1].start, comments[1].end), (14, 23));
}

#[test]
fn test_comment_reported_once_across_directive() {
    let arena = Bump::new();
    let mut comments: Vec<Comment> = Vec::new();
    Parser::new(&arena, "'use strict'; // note\nx;", &ParserOptions::default())
        .with_comment_handler(|c| comments.push(c))
        .parse()
        .unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, " note");
}
