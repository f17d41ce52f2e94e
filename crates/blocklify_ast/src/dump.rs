//! Span-free S-expression rendering of an AST.
//!
//! Two programs that differ only in layout, parentheses or comments dump to
//! the same string, which makes the dump a cheap structural equality check.

use crate::node::*;
use std::fmt::Write;

/// Render a number the way JavaScript's `String(n)` does for the common
/// cases: integers without a fraction, exponents from 1e21 up.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }
    format!("{}", n)
}

/// Dump a program.
pub fn dump_program(program: &Program<'_>) -> String {
    let mut out = String::new();
    out.push_str("(Program");
    for stmt in program.body {
        out.push(' ');
        dump_statement(&mut out, stmt);
    }
    out.push(')');
    out
}

/// Dump a single expression.
pub fn dump_expression_to_string(expr: &Expression<'_>) -> String {
    let mut out = String::new();
    dump_expression(&mut out, expr);
    out
}

fn dump_statements(out: &mut String, stmts: &[Statement<'_>]) {
    for stmt in stmts {
        out.push(' ');
        dump_statement(out, stmt);
    }
}

fn dump_opt_expression(out: &mut String, expr: Option<&Expression<'_>>) {
    match expr {
        Some(expr) => dump_expression(out, expr),
        None => out.push('_'),
    }
}

fn dump_block(out: &mut String, block: &BlockStatement<'_>) {
    out.push_str("(BlockStatement");
    dump_statements(out, block.body);
    out.push(')');
}

fn dump_for_init(out: &mut String, init: &ForInit<'_>) {
    match init {
        ForInit::VariableDeclaration(decl) => dump_variable_declaration(out, decl),
        ForInit::Expression(expr) => dump_expression(out, expr),
    }
}

fn dump_variable_declaration(out: &mut String, decl: &VariableDeclaration<'_>) {
    out.push_str("(VariableDeclaration");
    for d in decl.declarations {
        let _ = write!(out, " (VariableDeclarator {} ", d.id.name);
        dump_opt_expression(out, d.init);
        out.push(')');
    }
    out.push(')');
}

fn dump_function(out: &mut String, func: &Function<'_>) {
    let _ = write!(out, "({} ", func.data.kind);
    match func.id {
        Some(id) => out.push_str(id.name),
        None => out.push('_'),
    }
    out.push_str(" (");
    let params: Vec<&str> = func.params.iter().map(|p| p.name).collect();
    out.push_str(&params.join(" "));
    out.push_str(") ");
    dump_block(out, &func.body);
    out.push(')');
}

fn dump_statement(out: &mut String, stmt: &Statement<'_>) {
    match stmt {
        Statement::Empty(_) => out.push_str("(EmptyStatement)"),
        Statement::Debugger(_) => out.push_str("(DebuggerStatement)"),
        Statement::Expression(n) => {
            out.push_str("(ExpressionStatement ");
            dump_expression(out, n.expression);
            out.push(')');
        }
        Statement::Block(n) => dump_block(out, n),
        Statement::If(n) => {
            out.push_str("(IfStatement ");
            dump_expression(out, n.test);
            out.push(' ');
            dump_statement(out, n.consequent);
            if let Some(alt) = n.alternate {
                out.push(' ');
                dump_statement(out, alt);
            }
            out.push(')');
        }
        Statement::Labeled(n) => {
            let _ = write!(out, "(LabeledStatement {} ", n.label.name);
            dump_statement(out, n.body);
            out.push(')');
        }
        Statement::Break(n) | Statement::Continue(n) => {
            let _ = write!(out, "({}", n.data.kind);
            if let Some(label) = n.label {
                let _ = write!(out, " {}", label.name);
            }
            out.push(')');
        }
        Statement::With(n) => {
            out.push_str("(WithStatement ");
            dump_expression(out, n.object);
            out.push(' ');
            dump_statement(out, n.body);
            out.push(')');
        }
        Statement::Switch(n) => {
            out.push_str("(SwitchStatement ");
            dump_expression(out, n.discriminant);
            for case in n.cases {
                out.push_str(" (SwitchCase ");
                dump_opt_expression(out, case.test);
                dump_statements(out, case.consequent);
                out.push(')');
            }
            out.push(')');
        }
        Statement::Return(n) => {
            out.push_str("(ReturnStatement ");
            dump_opt_expression(out, n.argument);
            out.push(')');
        }
        Statement::Throw(n) => {
            out.push_str("(ThrowStatement ");
            dump_expression(out, n.argument);
            out.push(')');
        }
        Statement::Try(n) => {
            out.push_str("(TryStatement ");
            dump_block(out, &n.block);
            if let Some(handler) = &n.handler {
                let _ = write!(out, " (CatchClause {} ", handler.param.name);
                dump_block(out, &handler.body);
                out.push(')');
            }
            if let Some(finalizer) = &n.finalizer {
                out.push(' ');
                dump_block(out, finalizer);
            }
            out.push(')');
        }
        Statement::While(n) => {
            out.push_str("(WhileStatement ");
            dump_expression(out, n.test);
            out.push(' ');
            dump_statement(out, n.body);
            out.push(')');
        }
        Statement::DoWhile(n) => {
            out.push_str("(DoWhileStatement ");
            dump_statement(out, n.body);
            out.push(' ');
            dump_expression(out, n.test);
            out.push(')');
        }
        Statement::For(n) => {
            out.push_str("(ForStatement ");
            match &n.init {
                Some(init) => dump_for_init(out, init),
                None => out.push('_'),
            }
            out.push(' ');
            dump_opt_expression(out, n.test);
            out.push(' ');
            dump_opt_expression(out, n.update);
            out.push(' ');
            dump_statement(out, n.body);
            out.push(')');
        }
        Statement::ForIn(n) => {
            out.push_str("(ForInStatement ");
            dump_for_init(out, &n.left);
            out.push(' ');
            dump_expression(out, n.right);
            out.push(' ');
            dump_statement(out, n.body);
            out.push(')');
        }
        Statement::VariableDeclaration(n) => dump_variable_declaration(out, n),
        Statement::FunctionDeclaration(n) => dump_function(out, n),
    }
}

fn operator(kind: crate::SyntaxKind) -> &'static str {
    kind.operator_text().unwrap_or("?")
}

fn dump_expression(out: &mut String, expr: &Expression<'_>) {
    match expr {
        Expression::This(_) => out.push_str("this"),
        Expression::Identifier(id) => out.push_str(id.name),
        Expression::Literal(lit) => match lit.value {
            LiteralValue::Null => out.push_str("null"),
            LiteralValue::Boolean(b) => {
                let _ = write!(out, "{}", b);
            }
            LiteralValue::Number(n) => out.push_str(&number_to_string(n)),
            LiteralValue::String(s) => {
                let _ = write!(out, "{:?}", s);
            }
            LiteralValue::RegExp { pattern, flags } => {
                let _ = write!(out, "/{}/{}", pattern, flags);
            }
        },
        Expression::Array(n) => {
            out.push_str("(ArrayExpression");
            for element in n.elements {
                out.push(' ');
                dump_opt_expression(out, element.as_ref());
            }
            out.push(')');
        }
        Expression::Object(n) => {
            out.push_str("(ObjectExpression");
            for prop in n.properties {
                let _ = write!(out, " ({:?} {:?} ", prop.kind, prop.key.name());
                dump_expression(out, prop.value);
                out.push(')');
            }
            out.push(')');
        }
        Expression::Function(n) => dump_function(out, n),
        Expression::Sequence(n) => {
            out.push_str("(SequenceExpression");
            for e in n.expressions {
                out.push(' ');
                dump_expression(out, e);
            }
            out.push(')');
        }
        Expression::Unary(n) => {
            let _ = write!(out, "(UnaryExpression {} ", operator(n.operator));
            dump_expression(out, n.argument);
            out.push(')');
        }
        Expression::Update(n) => {
            let _ = write!(
                out,
                "(UpdateExpression {} {} ",
                operator(n.operator),
                if n.prefix { "prefix" } else { "postfix" }
            );
            dump_expression(out, n.argument);
            out.push(')');
        }
        Expression::Binary(n) | Expression::Logical(n) => {
            let _ = write!(out, "({} {} ", n.data.kind, operator(n.operator));
            dump_expression(out, n.left);
            out.push(' ');
            dump_expression(out, n.right);
            out.push(')');
        }
        Expression::Assignment(n) => {
            let _ = write!(out, "(AssignmentExpression {} ", operator(n.operator));
            dump_expression(out, n.left);
            out.push(' ');
            dump_expression(out, n.right);
            out.push(')');
        }
        Expression::Conditional(n) => {
            out.push_str("(ConditionalExpression ");
            dump_expression(out, n.test);
            out.push(' ');
            dump_expression(out, n.consequent);
            out.push(' ');
            dump_expression(out, n.alternate);
            out.push(')');
        }
        Expression::New(n) | Expression::Call(n) => {
            let _ = write!(out, "({} ", n.data.kind);
            dump_expression(out, n.callee);
            for arg in n.arguments {
                out.push(' ');
                dump_expression(out, arg);
            }
            out.push(')');
        }
        Expression::Member(n) => {
            out.push_str(if n.computed {
                "(MemberExpression[] "
            } else {
                "(MemberExpression. "
            });
            dump_expression(out, n.object);
            out.push(' ');
            dump_expression(out, n.property);
            out.push(')');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(1.0), "1");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.5), "0.5");
        assert_eq!(number_to_string(15.0), "15");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1e-7), "1e-7");
        assert_eq!(number_to_string(f64::NAN), "NaN");
    }
}
