//! Round-trip conformance suite.
//!
//! Every case is imported with the atomic and the mixed strategy, generated
//! back and re-parsed. A case passes when the regenerated program has the
//! same structure as the input. Results are grouped by category.

use blocklify_options::ImportStrategy;
use blocklify_tests::round_trip;
use std::collections::BTreeMap;

/// Result for a single case under one strategy.
#[derive(Debug, Clone)]
struct TestResult {
    name: String,
    category: String,
    strategy: ImportStrategy,
    passed: bool,
    error: Option<String>,
}

fn run_test(name: &str, category: &str, source: &str, strategy: ImportStrategy) -> TestResult {
    let outcome = std::panic::catch_unwind(|| round_trip(source, strategy));

    let error = match outcome {
        Ok(Ok(trip)) if trip.preserves_structure() => None,
        Ok(Ok(trip)) => Some(match trip.regenerated {
            Ok(dump) => format!("structure changed:\n    {}\n    {}", trip.original, dump),
            Err(e) => format!("regenerated code does not parse: {}\n{}", e, trip.code),
        }),
        Ok(Err(e)) => Some(e.to_string()),
        Err(panic) => Some(if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = panic.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "Unknown panic".to_string()
        }),
    };

    TestResult {
        name: name.to_string(),
        category: category.to_string(),
        strategy,
        passed: error.is_none(),
        error,
    }
}

struct ConformanceTestSuite {
    tests: Vec<TestResult>,
}

impl ConformanceTestSuite {
    fn new() -> Self {
        Self { tests: Vec::new() }
    }

    fn add_test(&mut self, name: &str, category: &str, source: &str) {
        for strategy in [ImportStrategy::Atomic, ImportStrategy::Mixed] {
            self.tests.push(run_test(name, category, source, strategy));
        }
    }

    fn failures(&self) -> Vec<&TestResult> {
        self.tests.iter().filter(|t| !t.passed).collect()
    }

    fn print_summary(&self) {
        let total = self.tests.len();
        let passed = self.tests.iter().filter(|t| t.passed).count();
        let pass_rate = if total > 0 {
            (passed as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        println!("\n=== Round-Trip Conformance Summary ===");
        println!("Total runs: {}", total);
        println!("Passed: {}", passed);
        println!("Failed: {}", total - passed);
        println!("Pass rate: {:.2}%", pass_rate);

        let mut categories: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for test in &self.tests {
            let entry = categories.entry(test.category.as_str()).or_insert((0, 0));
            if test.passed {
                entry.0 += 1;
            }
            entry.1 += 1;
        }

        println!("\n--- Results by Category ---");
        for (category, (passed_count, total_count)) in &categories {
            println!("  {}: {}/{}", category, passed_count, total_count);
        }

        let failures = self.failures();
        if !failures.is_empty() {
            println!("\n--- Failed Runs ---");
            for failure in failures.iter().take(10) {
                println!(
                    "  [{}] {} ({}): {}",
                    failure.category,
                    failure.name,
                    failure.strategy,
                    failure.error.as_deref().unwrap_or("Unknown error")
                );
            }
            if failures.len() > 10 {
                println!("  ... and {} more failures", failures.len() - 10);
            }
        }
    }
}

// ============================================================================
// Test Cases
// ============================================================================

#[test]
fn test_round_trip_conformance() {
    let mut suite = ConformanceTestSuite::new();

    // ========================================================================
    // Category: Declarations
    // ========================================================================
    suite.add_test("var_with_init", "declarations", "var a = 1;");
    suite.add_test("var_without_init", "declarations", "var a;");
    suite.add_test("var_list", "declarations", "var a, b = 2, c;");
    suite.add_test(
        "var_with_expression",
        "declarations",
        "var total = price * (1 + rate) - discount;",
    );

    // ========================================================================
    // Category: Functions
    // ========================================================================
    suite.add_test(
        "function_declaration",
        "functions",
        "function add(a, b) { return a + b; }",
    );
    suite.add_test("function_no_params", "functions", "function noop() { return; }");
    suite.add_test(
        "function_expression_argument",
        "functions",
        "setTimeout(function () { tick(); }, 100);",
    );
    suite.add_test(
        "named_function_expression",
        "functions",
        "var fact = function f(n) { return n < 2 ? 1 : n * f(n - 1); };",
    );
    suite.add_test(
        "nested_functions",
        "functions",
        "function outer() { function inner() { return 1; } return inner(); }",
    );

    // ========================================================================
    // Category: Control Flow
    // ========================================================================
    suite.add_test("if_only", "control_flow", "if (a) { b(); }");
    suite.add_test("if_else", "control_flow", "if (a) { b(); } else { c(); }");
    suite.add_test(
        "if_else_if_chain",
        "control_flow",
        "if (a) { b(); } else if (c) { d(); } else if (e) { f(); } else { g(); }",
    );
    suite.add_test(
        "while_loop",
        "control_flow",
        "while (i < 10) { i++; if (skip) { continue; } }",
    );
    suite.add_test(
        "for_loop",
        "control_flow",
        "for (var i = 0; i < n; i++) { sum += a[i]; }",
    );
    suite.add_test(
        "for_loop_sequences",
        "control_flow",
        "for (i = 0, j = n; i < j; i++, j--) { swap(i, j); }",
    );
    suite.add_test("for_in_var", "control_flow", "for (var k in o) { keys.push(k); }");
    suite.add_test("for_in_bare", "control_flow", "for (k in o) { delete o[k]; }");
    suite.add_test(
        "for_init_with_in",
        "control_flow",
        "for (var i = ('a' in o); i; i++) {} for (x = ('a' in o); x; ) {}",
    );
    suite.add_test(
        "break_in_loop",
        "control_flow",
        "while (true) { if (done()) { break; } }",
    );
    suite.add_test("throw", "control_flow", "throw new Error('bad ' + code);");

    // ========================================================================
    // Category: Expressions
    // ========================================================================
    suite.add_test("chained_assignment", "expressions", "a = b = c;");
    suite.add_test(
        "compound_assignment",
        "expressions",
        "a += 1; b -= 2; c <<= d; e >>>= 1;",
    );
    suite.add_test("logical", "expressions", "x = a || b && c;");
    suite.add_test("logical_grouped", "expressions", "x = (a || b) && c;");
    suite.add_test(
        "arithmetic_grouping",
        "expressions",
        "x = (a + b) * (c - d) / e % f;",
    );
    suite.add_test("unary", "expressions", "x = !a; y = -b; z = ~c; w = typeof d;");
    suite.add_test("updates", "expressions", "i++; --j; k = l--;");
    suite.add_test(
        "conditional",
        "expressions",
        "x = a ? b : c ? d : e; y = (a ? b : c) ? d : e;",
    );
    suite.add_test("member_chain", "expressions", "x = a.b[c].d[0];");
    suite.add_test("call_chain", "expressions", "o.f(1)(2).g();");
    suite.add_test("new_expression", "expressions", "d = new Date(); e = new Date;");
    suite.add_test("this_member", "expressions", "this.count = this.count + 1;");
    suite.add_test("relational", "expressions", "ok = k in o && x instanceof Y;");

    // ========================================================================
    // Category: Literals
    // ========================================================================
    suite.add_test("numbers", "literals", "x = [0, 1.5, 1e21, 0x1F, .5];");
    suite.add_test(
        "strings",
        "literals",
        "s = 'it\\'s'; t = \"say \\\"hi\\\"\"; u = 'line\\nbreak';",
    );
    suite.add_test("booleans_and_null", "literals", "x = [true, false, null];");
    suite.add_test("regexp", "literals", "re = /ab+c/gi;");
    suite.add_test("negative_number", "literals", "x = -1; y = a - -2;");

    // ========================================================================
    // Category: Collections
    // ========================================================================
    suite.add_test("empty_array", "collections", "list = [];");
    suite.add_test("nested_array", "collections", "m = [[1, 2], [3, 4]];");
    suite.add_test("empty_object", "collections", "o = {};");
    suite.add_test(
        "object_keys",
        "collections",
        "o = { a: 1, 'b c': [2], 3: { d: null } };",
    );

    // ========================================================================
    // Category: Block Patterns
    // ========================================================================
    suite.add_test(
        "counted_repeat",
        "block_patterns",
        "for (var count = 0; count < 5; count++) { step(count); }",
    );
    suite.add_test(
        "nested_counted_repeat",
        "block_patterns",
        "for (var count = 0; count < a; count++) { for (var count2 = 0; count2 < b; count2++) { cell(count, count2); } }",
    );
    suite.add_test("until_loop", "block_patterns", "while (!(x > 10)) { x = x * 2; }");
    suite.add_test(
        "for_in_after_declaration",
        "block_patterns",
        "var other; for (var k in o) { other = k; }",
    );
    suite.add_test(
        "arithmetic_with_text",
        "block_patterns",
        "msg = 'total: ' + (a + b);",
    );

    suite.print_summary();

    let failures = suite.failures();
    assert!(
        failures.is_empty(),
        "{} round trips failed, first: {} ({}): {}",
        failures.len(),
        failures[0].name,
        failures[0].strategy,
        failures[0].error.as_deref().unwrap_or("Unknown error")
    );
}
