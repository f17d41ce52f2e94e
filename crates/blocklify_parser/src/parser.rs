//! The JavaScript parser implementation.
//!
//! A recursive descent parser over the scanner's token stream. There is no
//! error recovery: the first malformed construct aborts the parse with a
//! [`SyntaxError`].

use bumpalo::Bump;
use blocklify_ast::node::*;
use blocklify_ast::precedence::binary_binding_power;
use blocklify_ast::syntax_kind::SyntaxKind;
use blocklify_core::text::{SourceLocation, TextRange};
use blocklify_diagnostics::{messages, DiagnosticMessage, SyntaxError, SyntaxErrorKind};
use blocklify_options::{EcmaVersion, ParserOptions};
use blocklify_scanner::{is_strict_bad_id_word, is_strict_reserved_word, Comment, Scanner};
use tracing::debug;

use crate::utilities::{has_jump_target, label_kind_for, Label};

/// Maximum recursion depth to prevent stack overflow on deeply nested input.
///
/// Statements, assignment-level expressions, unary operands and `new`
/// callees each cost one level, so a parenthesized expression costs two.
pub const MAX_RECURSION_DEPTH: u32 = 100;

/// Allocate a Vec into the arena as a slice.
///
/// Uses ManuallyDrop to prevent double-free on panic inside alloc_slice_fill_with.
fn alloc_vec_in<T>(arena: &Bump, vec: Vec<T>) -> &[T] {
    if vec.is_empty() {
        return &[];
    }
    let mut vec = std::mem::ManuallyDrop::new(vec);
    let len = vec.len();
    let ptr = vec.as_ptr();
    let slice = arena.alloc_slice_fill_with(len, |i| {
        // SAFETY: i < len, and each element is read exactly once. ManuallyDrop
        // prevents the Vec destructor from running, so elements won't be
        // double-freed even if this closure panics partway through.
        unsafe { std::ptr::read(ptr.add(i)) }
    });
    // All elements have been moved out; the buffer is leaked with len 0.
    unsafe {
        vec.set_len(0);
    }
    slice
}

/// Parse `source_text` into a program allocated in `arena`.
pub fn parse<'a>(
    arena: &'a Bump,
    source_text: &str,
    options: &ParserOptions,
) -> Result<Program<'a>, SyntaxError> {
    Parser::new(arena, source_text, options).parse()
}

/// The parser produces a Program AST from JavaScript source text.
pub struct Parser<'a> {
    arena: &'a Bump,
    scanner: Scanner,
    options: ParserOptions,
    /// Start of the token before the current one.
    last_start: u32,
    in_function: bool,
    labels: Vec<Label<'a>>,
    /// Tracks recursion depth to prevent stack overflow on deeply nested input.
    recursion_depth: u32,
    comment_handler: Option<Box<dyn FnMut(Comment) + 'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(arena: &'a Bump, source_text: &str, options: &ParserOptions) -> Self {
        Self {
            arena,
            scanner: Scanner::with_options(source_text, options),
            options: options.clone(),
            last_start: 0,
            in_function: false,
            labels: Vec::new(),
            recursion_depth: 0,
            comment_handler: None,
        }
    }

    /// Report every comment the scanner skips, in source order.
    pub fn with_comment_handler<F>(mut self, handler: F) -> Self
    where
        F: FnMut(Comment) + 'a,
    {
        self.scanner.set_record_comments(true);
        self.comment_handler = Some(Box::new(handler));
        self
    }

    pub fn parse(mut self) -> Result<Program<'a>, SyntaxError> {
        self.next_token()?;

        let mut body = Vec::new();
        let mut first = true;
        while self.current_token() != SyntaxKind::EndOfFileToken {
            let stmt = self.parse_statement()?;
            if first && self.is_use_strict(&stmt) {
                self.set_strict(true)?;
            }
            first = false;
            body.push(stmt);
        }

        let end = self.scanner.text_len() as u32;
        Ok(Program {
            data: self.node_data(SyntaxKind::Program, 0, end),
            body: alloc_vec_in(self.arena, body),
            strict: self.is_strict(),
        })
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn current_token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    fn next_token(&mut self) -> Result<SyntaxKind, SyntaxError> {
        self.last_start = self.token_pos();
        let kind = self.scanner.scan()?;
        self.flush_comments();
        Ok(kind)
    }

    fn flush_comments(&mut self) {
        if let Some(handler) = self.comment_handler.as_mut() {
            for comment in self.scanner.take_comments() {
                handler(comment);
            }
        }
    }

    #[inline]
    fn token_pos(&self) -> u32 {
        self.scanner.token_start() as u32
    }

    #[inline]
    fn token_end(&self) -> u32 {
        self.scanner.token_end() as u32
    }

    /// End of the last consumed token.
    #[inline]
    fn last_end(&self) -> u32 {
        self.scanner.last_end() as u32
    }

    #[inline]
    fn is_strict(&self) -> bool {
        self.scanner.is_strict()
    }

    /// Consume the current token if it is `kind`.
    fn eat(&mut self, kind: SyntaxKind) -> Result<bool, SyntaxError> {
        if self.current_token() == kind {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> Result<(), SyntaxError> {
        if self.eat(kind)? {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn can_insert_semicolon(&self) -> bool {
        !self.options.strict_semicolons
            && (matches!(
                self.current_token(),
                SyntaxKind::EndOfFileToken | SyntaxKind::CloseBraceToken
            ) || self.scanner.has_preceding_line_break())
    }

    fn semicolon(&mut self) -> Result<(), SyntaxError> {
        if self.eat(SyntaxKind::SemicolonToken)? || self.can_insert_semicolon() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Switch strictness and re-lex the lookahead token under the new rules.
    fn set_strict(&mut self, strict: bool) -> Result<(), SyntaxError> {
        debug!(strict, offset = self.last_end(), "strict mode changed");
        self.scanner.set_strict(strict);
        self.scanner.rescan_current_token()?;
        self.flush_comments();
        Ok(())
    }

    fn is_use_strict(&self, stmt: &Statement<'_>) -> bool {
        self.options.ecma_version >= EcmaVersion::V5 && stmt.is_use_strict_directive()
    }

    fn error(&self, pos: u32, message: &DiagnosticMessage, args: &[&str]) -> SyntaxError {
        SyntaxError::new(
            SyntaxErrorKind::Parse,
            message,
            args,
            pos,
            self.scanner.line_and_column_of(pos),
        )
    }

    fn unexpected(&self) -> SyntaxError {
        self.error(self.token_pos(), &messages::UNEXPECTED_TOKEN, &[])
    }

    fn enter_recursion(&mut self) -> Result<(), SyntaxError> {
        if self.recursion_depth >= MAX_RECURSION_DEPTH {
            let pos = self.token_pos();
            return Err(SyntaxError::new(
                SyntaxErrorKind::ResourceExhausted,
                &messages::MAXIMUM_NESTING_DEPTH_EXCEEDED,
                &[],
                pos,
                self.scanner.line_and_column_of(pos),
            ));
        }
        self.recursion_depth += 1;
        Ok(())
    }

    // ========================================================================
    // Node construction
    // ========================================================================

    fn node_data(&self, kind: SyntaxKind, pos: u32, end: u32) -> NodeData {
        let mut data = NodeData::new(kind, pos, end);
        if self.options.locations {
            data.loc = Some(SourceLocation {
                start: self.scanner.line_and_column_of(pos),
                end: self.scanner.line_and_column_of(end),
            });
        }
        data
    }

    /// Node data spanning from `start` to the end of the last consumed token.
    #[inline]
    fn finish_node(&self, kind: SyntaxKind, start: u32) -> NodeData {
        self.node_data(kind, start, self.last_end())
    }

    #[inline]
    fn alloc<T>(&self, value: T) -> &'a T {
        self.arena.alloc(value)
    }

    #[inline]
    fn alloc_str(&self, text: &str) -> &'a str {
        self.arena.alloc_str(text)
    }

    fn parse_statement_and_alloc(&mut self) -> Result<&'a Statement<'a>, SyntaxError> {
        let stmt = self.parse_statement()?;
        Ok(self.alloc(stmt))
    }

    fn parse_expression_and_alloc(
        &mut self,
        no_comma: bool,
        no_in: bool,
    ) -> Result<&'a Expression<'a>, SyntaxError> {
        let expr = self.parse_expression(no_comma, no_in)?;
        Ok(self.alloc(expr))
    }

    // ========================================================================
    // Statement parsing
    // ========================================================================

    fn parse_statement(&mut self) -> Result<Statement<'a>, SyntaxError> {
        self.enter_recursion()?;
        let result = self.parse_statement_worker();
        self.recursion_depth -= 1;
        result
    }

    fn parse_statement_worker(&mut self) -> Result<Statement<'a>, SyntaxError> {
        // A statement never starts with division.
        if matches!(
            self.current_token(),
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken
        ) {
            self.scanner.rescan_slash_token()?;
        }

        let start = self.token_pos();
        match self.current_token() {
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword => {
                self.parse_break_or_continue(start)
            }
            SyntaxKind::DebuggerKeyword => {
                self.next_token()?;
                self.semicolon()?;
                Ok(Statement::Debugger(
                    self.finish_node(SyntaxKind::DebuggerStatement, start),
                ))
            }
            SyntaxKind::DoKeyword => self.parse_do_statement(start),
            SyntaxKind::ForKeyword => self.parse_for_statement(start),
            SyntaxKind::FunctionKeyword => {
                self.next_token()?;
                Ok(Statement::FunctionDeclaration(
                    self.parse_function(start, true)?,
                ))
            }
            SyntaxKind::IfKeyword => self.parse_if_statement(start),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(start),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(start),
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(start),
            SyntaxKind::TryKeyword => self.parse_try_statement(start),
            SyntaxKind::VarKeyword => {
                self.next_token()?;
                let declarations = self.parse_var(false)?;
                self.semicolon()?;
                Ok(Statement::VariableDeclaration(VariableDeclaration {
                    data: self.finish_node(SyntaxKind::VariableDeclaration, start),
                    declarations,
                }))
            }
            SyntaxKind::WhileKeyword => self.parse_while_statement(start),
            SyntaxKind::WithKeyword => self.parse_with_statement(start),
            SyntaxKind::OpenBraceToken => Ok(Statement::Block(self.parse_block(false)?)),
            SyntaxKind::SemicolonToken => {
                self.next_token()?;
                Ok(Statement::Empty(
                    self.finish_node(SyntaxKind::EmptyStatement, start),
                ))
            }
            _ => self.parse_expression_or_labeled_statement(start),
        }
    }

    fn parse_break_or_continue(&mut self, start: u32) -> Result<Statement<'a>, SyntaxError> {
        let is_break = self.current_token() == SyntaxKind::BreakKeyword;
        self.next_token()?;

        let label = if self.eat(SyntaxKind::SemicolonToken)? || self.can_insert_semicolon() {
            None
        } else if self.current_token() != SyntaxKind::Identifier {
            return Err(self.unexpected());
        } else {
            let label = self.parse_ident(false)?;
            self.semicolon()?;
            Some(label)
        };

        if !has_jump_target(&self.labels, label.map(|l| l.name), is_break) {
            let keyword = if is_break { "break" } else { "continue" };
            return Err(self.error(start, &messages::UNSYNTACTIC_0, &[keyword]));
        }

        let (kind, wrap): (SyntaxKind, fn(JumpStatement<'a>) -> Statement<'a>) = if is_break {
            (SyntaxKind::BreakStatement, Statement::Break)
        } else {
            (SyntaxKind::ContinueStatement, Statement::Continue)
        };
        Ok(wrap(JumpStatement {
            data: self.finish_node(kind, start),
            label,
        }))
    }

    fn parse_do_statement(&mut self, start: u32) -> Result<Statement<'a>, SyntaxError> {
        self.next_token()?;
        self.labels.push(Label::LOOP);
        let body = self.parse_statement_and_alloc()?;
        self.labels.pop();
        self.expect(SyntaxKind::WhileKeyword)?;
        let test = self.parse_paren_expression()?;
        self.semicolon()?;
        Ok(Statement::DoWhile(DoWhileStatement {
            data: self.finish_node(SyntaxKind::DoWhileStatement, start),
            body,
            test,
        }))
    }

    /// `for (init; test; update)` or `for (left in right)`. The init clause
    /// is parsed with `in` disabled, then the next token decides.
    fn parse_for_statement(&mut self, start: u32) -> Result<Statement<'a>, SyntaxError> {
        self.next_token()?;
        self.labels.push(Label::LOOP);
        self.expect(SyntaxKind::OpenParenToken)?;

        if self.current_token() == SyntaxKind::SemicolonToken {
            return self.parse_for(start, None);
        }

        if self.current_token() == SyntaxKind::VarKeyword {
            let init_start = self.token_pos();
            self.next_token()?;
            let declarations = self.parse_var(true)?;
            let init = self.alloc(VariableDeclaration {
                data: self.finish_node(SyntaxKind::VariableDeclaration, init_start),
                declarations,
            });
            if init.declarations.len() == 1 && self.eat(SyntaxKind::InKeyword)? {
                return self.parse_for_in(start, ForInit::VariableDeclaration(init));
            }
            return self.parse_for(start, Some(ForInit::VariableDeclaration(init)));
        }

        let init = self.parse_expression(false, true)?;
        if self.eat(SyntaxKind::InKeyword)? {
            self.check_lval(&init)?;
            let init = self.alloc(init);
            return self.parse_for_in(start, ForInit::Expression(init));
        }
        let init = self.alloc(init);
        self.parse_for(start, Some(ForInit::Expression(init)))
    }

    fn parse_for(
        &mut self,
        start: u32,
        init: Option<ForInit<'a>>,
    ) -> Result<Statement<'a>, SyntaxError> {
        self.expect(SyntaxKind::SemicolonToken)?;
        let test = if self.current_token() == SyntaxKind::SemicolonToken {
            None
        } else {
            Some(self.parse_expression_and_alloc(false, false)?)
        };
        self.expect(SyntaxKind::SemicolonToken)?;
        let update = if self.current_token() == SyntaxKind::CloseParenToken {
            None
        } else {
            Some(self.parse_expression_and_alloc(false, false)?)
        };
        self.expect(SyntaxKind::CloseParenToken)?;
        let body = self.parse_statement_and_alloc()?;
        self.labels.pop();
        Ok(Statement::For(ForStatement {
            data: self.finish_node(SyntaxKind::ForStatement, start),
            init,
            test,
            update,
            body,
        }))
    }

    fn parse_for_in(&mut self, start: u32, left: ForInit<'a>) -> Result<Statement<'a>, SyntaxError> {
        let right = self.parse_expression_and_alloc(false, false)?;
        self.expect(SyntaxKind::CloseParenToken)?;
        let body = self.parse_statement_and_alloc()?;
        self.labels.pop();
        Ok(Statement::ForIn(ForInStatement {
            data: self.finish_node(SyntaxKind::ForInStatement, start),
            left,
            right,
            body,
        }))
    }

    fn parse_if_statement(&mut self, start: u32) -> Result<Statement<'a>, SyntaxError> {
        self.next_token()?;
        let test = self.parse_paren_expression()?;
        let consequent = self.parse_statement_and_alloc()?;
        let alternate = if self.eat(SyntaxKind::ElseKeyword)? {
            Some(self.parse_statement_and_alloc()?)
        } else {
            None
        };
        Ok(Statement::If(IfStatement {
            data: self.finish_node(SyntaxKind::IfStatement, start),
            test,
            consequent,
            alternate,
        }))
    }

    fn parse_return_statement(&mut self, start: u32) -> Result<Statement<'a>, SyntaxError> {
        if !self.in_function {
            return Err(self.error(start, &messages::RETURN_OUTSIDE_OF_FUNCTION, &[]));
        }
        self.next_token()?;
        let argument = if self.eat(SyntaxKind::SemicolonToken)? || self.can_insert_semicolon() {
            None
        } else {
            let argument = self.parse_expression_and_alloc(false, false)?;
            self.semicolon()?;
            Some(argument)
        };
        Ok(Statement::Return(ReturnStatement {
            data: self.finish_node(SyntaxKind::ReturnStatement, start),
            argument,
        }))
    }

    fn parse_switch_statement(&mut self, start: u32) -> Result<Statement<'a>, SyntaxError> {
        self.next_token()?;
        let discriminant = self.parse_paren_expression()?;
        self.expect(SyntaxKind::OpenBraceToken)?;
        self.labels.push(Label::SWITCH);

        let mut cases = Vec::new();
        let mut current: Option<(u32, OptionalNode<'a, Expression<'a>>, Vec<Statement<'a>>)> = None;
        let mut saw_default = false;
        while self.current_token() != SyntaxKind::CloseBraceToken {
            let token = self.current_token();
            if token == SyntaxKind::CaseKeyword || token == SyntaxKind::DefaultKeyword {
                if let Some(case) = current.take() {
                    cases.push(self.finish_switch_case(case));
                }
                let case_start = self.token_pos();
                self.next_token()?;
                let test = if token == SyntaxKind::CaseKeyword {
                    Some(self.parse_expression_and_alloc(false, false)?)
                } else {
                    if saw_default {
                        return Err(self.error(
                            self.last_start,
                            &messages::MULTIPLE_DEFAULT_CLAUSES,
                            &[],
                        ));
                    }
                    saw_default = true;
                    None
                };
                self.expect(SyntaxKind::ColonToken)?;
                current = Some((case_start, test, Vec::new()));
            } else {
                match current.as_mut() {
                    Some((_, _, consequent)) => consequent.push(self.parse_statement()?),
                    None => return Err(self.unexpected()),
                }
            }
        }
        if let Some(case) = current.take() {
            cases.push(self.finish_switch_case(case));
        }
        self.next_token()?;
        self.labels.pop();

        Ok(Statement::Switch(SwitchStatement {
            data: self.finish_node(SyntaxKind::SwitchStatement, start),
            discriminant,
            cases: alloc_vec_in(self.arena, cases),
        }))
    }

    fn finish_switch_case(
        &self,
        (start, test, consequent): (u32, OptionalNode<'a, Expression<'a>>, Vec<Statement<'a>>),
    ) -> SwitchCase<'a> {
        SwitchCase {
            data: self.finish_node(SyntaxKind::SwitchCase, start),
            test,
            consequent: alloc_vec_in(self.arena, consequent),
        }
    }

    fn parse_throw_statement(&mut self, start: u32) -> Result<Statement<'a>, SyntaxError> {
        self.next_token()?;
        if self.scanner.has_preceding_line_break() {
            return Err(self.error(
                self.last_end(),
                &messages::ILLEGAL_NEWLINE_AFTER_THROW,
                &[],
            ));
        }
        let argument = self.parse_expression_and_alloc(false, false)?;
        self.semicolon()?;
        Ok(Statement::Throw(ThrowStatement {
            data: self.finish_node(SyntaxKind::ThrowStatement, start),
            argument,
        }))
    }

    fn parse_try_statement(&mut self, start: u32) -> Result<Statement<'a>, SyntaxError> {
        self.next_token()?;
        let block = self.parse_block(false)?;

        let handler = if self.current_token() == SyntaxKind::CatchKeyword {
            let clause_start = self.token_pos();
            self.next_token()?;
            self.expect(SyntaxKind::OpenParenToken)?;
            let param = self.parse_ident(false)?;
            if self.is_strict() && is_strict_bad_id_word(param.name) {
                return Err(self.error(
                    param.data.range.pos,
                    &messages::BINDING_0_IN_STRICT_MODE,
                    &[param.name],
                ));
            }
            self.expect(SyntaxKind::CloseParenToken)?;
            let body = self.parse_block(false)?;
            Some(CatchClause {
                data: self.finish_node(SyntaxKind::CatchClause, clause_start),
                param,
                body,
            })
        } else {
            None
        };

        let finalizer = if self.eat(SyntaxKind::FinallyKeyword)? {
            Some(self.parse_block(false)?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.error(start, &messages::MISSING_CATCH_OR_FINALLY_CLAUSE, &[]));
        }

        Ok(Statement::Try(TryStatement {
            data: self.finish_node(SyntaxKind::TryStatement, start),
            block,
            handler,
            finalizer,
        }))
    }

    fn parse_while_statement(&mut self, start: u32) -> Result<Statement<'a>, SyntaxError> {
        self.next_token()?;
        let test = self.parse_paren_expression()?;
        self.labels.push(Label::LOOP);
        let body = self.parse_statement_and_alloc()?;
        self.labels.pop();
        Ok(Statement::While(WhileStatement {
            data: self.finish_node(SyntaxKind::WhileStatement, start),
            test,
            body,
        }))
    }

    fn parse_with_statement(&mut self, start: u32) -> Result<Statement<'a>, SyntaxError> {
        if self.is_strict() {
            return Err(self.error(start, &messages::WITH_IN_STRICT_MODE, &[]));
        }
        self.next_token()?;
        let object = self.parse_paren_expression()?;
        let body = self.parse_statement_and_alloc()?;
        Ok(Statement::With(WithStatement {
            data: self.finish_node(SyntaxKind::WithStatement, start),
            object,
            body,
        }))
    }

    fn parse_expression_or_labeled_statement(
        &mut self,
        start: u32,
    ) -> Result<Statement<'a>, SyntaxError> {
        let starts_with_name = self.current_token() == SyntaxKind::Identifier;
        let expr = self.parse_expression(false, false)?;

        if starts_with_name {
            if let Expression::Identifier(label) = expr {
                if self.eat(SyntaxKind::ColonToken)? {
                    if self.labels.iter().any(|l| l.name == Some(label.name)) {
                        return Err(self.error(
                            label.data.range.pos,
                            &messages::LABEL_0_IS_ALREADY_DECLARED,
                            &[label.name],
                        ));
                    }
                    let kind = label_kind_for(self.current_token());
                    self.labels.push(Label::named(label.name, kind));
                    let body = self.parse_statement_and_alloc()?;
                    self.labels.pop();
                    return Ok(Statement::Labeled(LabeledStatement {
                        data: self.finish_node(SyntaxKind::LabeledStatement, start),
                        label,
                        body,
                    }));
                }
            }
        }

        self.semicolon()?;
        let expression = self.alloc(expr);
        Ok(Statement::Expression(ExpressionStatement {
            data: self.finish_node(SyntaxKind::ExpressionStatement, start),
            expression,
        }))
    }

    /// `( expression )`, as required after `if`, `while`, `switch` and `with`.
    fn parse_paren_expression(&mut self) -> Result<&'a Expression<'a>, SyntaxError> {
        self.expect(SyntaxKind::OpenParenToken)?;
        let expr = self.parse_expression_and_alloc(false, false)?;
        self.expect(SyntaxKind::CloseParenToken)?;
        Ok(expr)
    }

    /// A braced statement list. With `allow_strict` (function bodies), a
    /// leading `"use strict"` directive makes the rest of the body strict.
    fn parse_block(&mut self, allow_strict: bool) -> Result<BlockStatement<'a>, SyntaxError> {
        let start = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken)?;

        let mut body = Vec::new();
        let mut first = true;
        let mut entered_strict = false;
        while !self.eat(SyntaxKind::CloseBraceToken)? {
            let stmt = self.parse_statement()?;
            if first && allow_strict && !self.is_strict() && self.is_use_strict(&stmt) {
                self.set_strict(true)?;
                entered_strict = true;
            }
            first = false;
            body.push(stmt);
        }

        let data = self.finish_node(SyntaxKind::BlockStatement, start);
        if entered_strict {
            self.set_strict(false)?;
        }
        Ok(BlockStatement {
            data,
            body: alloc_vec_in(self.arena, body),
        })
    }

    /// The declarator list after `var`.
    fn parse_var(&mut self, no_in: bool) -> Result<&'a [VariableDeclarator<'a>], SyntaxError> {
        let mut declarations = Vec::new();
        loop {
            let start = self.token_pos();
            let id = self.parse_ident(false)?;
            if self.is_strict() && is_strict_bad_id_word(id.name) {
                return Err(self.error(
                    id.data.range.pos,
                    &messages::BINDING_0_IN_STRICT_MODE,
                    &[id.name],
                ));
            }
            let init = if self.eat(SyntaxKind::EqualsToken)? {
                Some(self.parse_expression_and_alloc(true, no_in)?)
            } else {
                None
            };
            declarations.push(VariableDeclarator {
                data: self.finish_node(SyntaxKind::VariableDeclarator, start),
                id,
                init,
            });
            if !self.eat(SyntaxKind::CommaToken)? {
                break;
            }
        }
        Ok(alloc_vec_in(self.arena, declarations))
    }

    /// A function declaration or expression; the `function` keyword has
    /// already been consumed.
    fn parse_function(&mut self, start: u32, is_statement: bool) -> Result<Function<'a>, SyntaxError> {
        let id = if self.current_token() == SyntaxKind::Identifier {
            Some(self.parse_ident(false)?)
        } else if is_statement {
            return Err(self.unexpected());
        } else {
            None
        };

        let mut params = Vec::new();
        self.expect(SyntaxKind::OpenParenToken)?;
        let mut first = true;
        while !self.eat(SyntaxKind::CloseParenToken)? {
            if first {
                first = false;
            } else {
                self.expect(SyntaxKind::CommaToken)?;
            }
            params.push(self.parse_ident(false)?);
        }

        // Labels do not cross function boundaries.
        let old_in_function = std::mem::replace(&mut self.in_function, true);
        let old_labels = std::mem::take(&mut self.labels);
        let body = self.parse_block(true);
        self.in_function = old_in_function;
        self.labels = old_labels;
        let body = body?;

        let strict_body = body.body.first().map_or(false, |s| self.is_use_strict(s));
        if self.is_strict() || strict_body {
            if let Some(id) = &id {
                self.check_strict_binding(id)?;
            }
            for (i, param) in params.iter().enumerate() {
                self.check_strict_binding(param)?;
                if params[..i].iter().any(|p| p.name == param.name) {
                    return Err(self.error(
                        param.data.range.pos,
                        &messages::ARGUMENT_NAME_CLASH_IN_STRICT_MODE,
                        &[],
                    ));
                }
            }
        }

        let kind = if is_statement {
            SyntaxKind::FunctionDeclaration
        } else {
            SyntaxKind::FunctionExpression
        };
        Ok(Function {
            data: self.finish_node(kind, start),
            id,
            params: alloc_vec_in(self.arena, params),
            body,
        })
    }

    fn check_strict_binding(&self, id: &Identifier<'a>) -> Result<(), SyntaxError> {
        if is_strict_reserved_word(id.name) || is_strict_bad_id_word(id.name) {
            return Err(self.error(
                id.data.range.pos,
                &messages::DEFINING_0_IN_STRICT_MODE,
                &[id.name],
            ));
        }
        Ok(())
    }

    /// Assignment targets are identifiers or member expressions.
    fn check_lval(&self, expr: &Expression<'a>) -> Result<(), SyntaxError> {
        match expr {
            Expression::Identifier(id) => {
                if self.is_strict() && is_strict_bad_id_word(id.name) {
                    return Err(self.error(
                        id.data.range.pos,
                        &messages::ASSIGNING_TO_0_IN_STRICT_MODE,
                        &[id.name],
                    ));
                }
                Ok(())
            }
            Expression::Member(_) => Ok(()),
            _ => Err(self.error(expr.pos(), &messages::ASSIGNING_TO_RVALUE, &[])),
        }
    }

    // ========================================================================
    // Expression parsing
    // ========================================================================

    /// A full expression. `no_comma` forbids sequences (argument lists,
    /// literals); `no_in` forbids the `in` operator (`for` init clauses).
    fn parse_expression(&mut self, no_comma: bool, no_in: bool) -> Result<Expression<'a>, SyntaxError> {
        let expr = self.parse_maybe_assign(no_in)?;
        if no_comma || self.current_token() != SyntaxKind::CommaToken {
            return Ok(expr);
        }

        let start = expr.pos();
        let mut expressions = vec![expr];
        while self.eat(SyntaxKind::CommaToken)? {
            expressions.push(self.parse_maybe_assign(no_in)?);
        }
        Ok(Expression::Sequence(SequenceExpression {
            data: self.finish_node(SyntaxKind::SequenceExpression, start),
            expressions: alloc_vec_in(self.arena, expressions),
        }))
    }

    fn parse_maybe_assign(&mut self, no_in: bool) -> Result<Expression<'a>, SyntaxError> {
        self.enter_recursion()?;
        let result = self.parse_maybe_assign_worker(no_in);
        self.recursion_depth -= 1;
        result
    }

    fn parse_maybe_assign_worker(&mut self, no_in: bool) -> Result<Expression<'a>, SyntaxError> {
        let left = self.parse_maybe_conditional(no_in)?;
        let operator = self.current_token();
        if !operator.is_assignment_operator() {
            return Ok(left);
        }

        self.next_token()?;
        let right = self.parse_maybe_assign(no_in)?;
        self.check_lval(&left)?;
        let start = left.pos();
        Ok(Expression::Assignment(AssignmentExpression {
            data: self.finish_node(SyntaxKind::AssignmentExpression, start),
            operator,
            left: self.alloc(left),
            right: self.alloc(right),
        }))
    }

    fn parse_maybe_conditional(&mut self, no_in: bool) -> Result<Expression<'a>, SyntaxError> {
        let test = self.parse_expr_ops(no_in)?;
        if !self.eat(SyntaxKind::QuestionToken)? {
            return Ok(test);
        }

        let consequent = self.parse_expression_and_alloc(true, false)?;
        self.expect(SyntaxKind::ColonToken)?;
        let alternate = self.parse_expression_and_alloc(true, no_in)?;
        let start = test.pos();
        Ok(Expression::Conditional(ConditionalExpression {
            data: self.finish_node(SyntaxKind::ConditionalExpression, start),
            test: self.alloc(test),
            consequent,
            alternate,
        }))
    }

    fn parse_expr_ops(&mut self, no_in: bool) -> Result<Expression<'a>, SyntaxError> {
        let left = self.parse_maybe_unary()?;
        self.parse_expr_op(left, 0, no_in)
    }

    /// Precedence climbing: consume operators binding tighter than
    /// `min_prec`, parsing each right operand at the operator's own power.
    fn parse_expr_op(
        &mut self,
        mut left: Expression<'a>,
        min_prec: u8,
        no_in: bool,
    ) -> Result<Expression<'a>, SyntaxError> {
        loop {
            let operator = self.current_token();
            let prec = binary_binding_power(operator);
            if prec == 0 || prec <= min_prec || (no_in && operator == SyntaxKind::InKeyword) {
                return Ok(left);
            }

            let start = left.pos();
            self.next_token()?;
            let operand = self.parse_maybe_unary()?;
            let right = self.parse_expr_op(operand, prec, no_in)?;

            let logical = operator.is_logical_operator();
            let kind = if logical {
                SyntaxKind::LogicalExpression
            } else {
                SyntaxKind::BinaryExpression
            };
            let node = BinaryExpression {
                data: self.finish_node(kind, start),
                operator,
                left: self.alloc(left),
                right: self.alloc(right),
            };
            left = if logical {
                Expression::Logical(node)
            } else {
                Expression::Binary(node)
            };
        }
    }

    fn parse_maybe_unary(&mut self) -> Result<Expression<'a>, SyntaxError> {
        self.enter_recursion()?;
        let result = self.parse_maybe_unary_worker();
        self.recursion_depth -= 1;
        result
    }

    fn parse_maybe_unary_worker(&mut self) -> Result<Expression<'a>, SyntaxError> {
        let operator = self.current_token();
        if operator.is_prefix_operator() || operator.is_update_operator() {
            let start = self.token_pos();
            let update = operator.is_update_operator();
            self.scanner.set_regex_allowed(true);
            self.next_token()?;
            let argument = self.parse_maybe_unary()?;
            if update {
                self.check_lval(&argument)?;
                return Ok(Expression::Update(UpdateExpression {
                    data: self.finish_node(SyntaxKind::UpdateExpression, start),
                    operator,
                    prefix: true,
                    argument: self.alloc(argument),
                }));
            }
            if self.is_strict()
                && operator == SyntaxKind::DeleteKeyword
                && matches!(argument, Expression::Identifier(_))
            {
                return Err(self.error(
                    start,
                    &messages::DELETING_LOCAL_VARIABLE_IN_STRICT_MODE,
                    &[],
                ));
            }
            return Ok(Expression::Unary(UnaryExpression {
                data: self.finish_node(SyntaxKind::UnaryExpression, start),
                operator,
                argument: self.alloc(argument),
            }));
        }

        let mut expr = self.parse_expr_subscripts()?;
        while self.current_token().is_update_operator() && !self.can_insert_semicolon() {
            let operator = self.current_token();
            self.check_lval(&expr)?;
            self.next_token()?;
            let start = expr.pos();
            let data = self.finish_node(SyntaxKind::UpdateExpression, start);
            expr = Expression::Update(UpdateExpression {
                data,
                operator,
                prefix: false,
                argument: self.alloc(expr),
            });
        }
        Ok(expr)
    }

    fn parse_expr_subscripts(&mut self) -> Result<Expression<'a>, SyntaxError> {
        let base = self.parse_expr_atom()?;
        self.parse_subscripts(base, false)
    }

    /// Member accesses and calls after `base`. `no_calls` stops at `(`,
    /// which belongs to an enclosing `new`.
    fn parse_subscripts(
        &mut self,
        mut base: Expression<'a>,
        no_calls: bool,
    ) -> Result<Expression<'a>, SyntaxError> {
        loop {
            let start = base.pos();
            if self.eat(SyntaxKind::DotToken)? {
                let property = self.parse_ident(true)?;
                base = Expression::Member(MemberExpression {
                    data: self.finish_node(SyntaxKind::MemberExpression, start),
                    object: self.alloc(base),
                    property: self.alloc(Expression::Identifier(property)),
                    computed: false,
                });
            } else if self.eat(SyntaxKind::OpenBracketToken)? {
                let property = self.parse_expression_and_alloc(false, false)?;
                self.expect(SyntaxKind::CloseBracketToken)?;
                base = Expression::Member(MemberExpression {
                    data: self.finish_node(SyntaxKind::MemberExpression, start),
                    object: self.alloc(base),
                    property,
                    computed: true,
                });
            } else if !no_calls && self.eat(SyntaxKind::OpenParenToken)? {
                let arguments = self.parse_arguments()?;
                base = Expression::Call(CallExpression {
                    data: self.finish_node(SyntaxKind::CallExpression, start),
                    callee: self.alloc(base),
                    arguments,
                });
            } else {
                return Ok(base);
            }
        }
    }

    fn parse_expr_atom(&mut self) -> Result<Expression<'a>, SyntaxError> {
        let start = self.token_pos();
        match self.current_token() {
            SyntaxKind::ThisKeyword => {
                self.next_token()?;
                Ok(Expression::This(
                    self.finish_node(SyntaxKind::ThisExpression, start),
                ))
            }
            SyntaxKind::Identifier => Ok(Expression::Identifier(self.parse_ident(false)?)),
            SyntaxKind::NumericLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::RegularExpressionLiteral
            | SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => Ok(Expression::Literal(self.parse_literal()?)),
            SyntaxKind::OpenParenToken => {
                self.next_token()?;
                let mut expr = self.parse_expression(false, false)?;
                let end = self.token_end();
                self.expect(SyntaxKind::CloseParenToken)?;
                // The parenthesized expression's span covers the parentheses.
                let widened = self.node_data(expr.kind(), start, end);
                let data = expr.data_mut();
                data.range = TextRange::new(start, end);
                data.loc = widened.loc;
                Ok(expr)
            }
            SyntaxKind::OpenBracketToken => {
                self.next_token()?;
                let elements = self.parse_expr_list(SyntaxKind::CloseBracketToken, true, true)?;
                Ok(Expression::Array(ArrayExpression {
                    data: self.finish_node(SyntaxKind::ArrayExpression, start),
                    elements: alloc_vec_in(self.arena, elements),
                }))
            }
            SyntaxKind::OpenBraceToken => self.parse_object(),
            SyntaxKind::FunctionKeyword => {
                self.next_token()?;
                Ok(Expression::Function(self.parse_function(start, false)?))
            }
            SyntaxKind::NewKeyword => self.parse_new(),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_literal(&mut self) -> Result<Literal<'a>, SyntaxError> {
        let start = self.token_pos();
        let (value, raw) = match self.current_token() {
            SyntaxKind::NumericLiteral => (
                LiteralValue::Number(self.scanner.token_number().unwrap_or(f64::NAN)),
                self.alloc_str(&self.scanner.token_text()),
            ),
            SyntaxKind::StringLiteral => (
                LiteralValue::String(self.alloc_str(self.scanner.token_value())),
                self.alloc_str(&self.scanner.token_text()),
            ),
            SyntaxKind::RegularExpressionLiteral => (
                LiteralValue::RegExp {
                    pattern: self.alloc_str(self.scanner.token_value()),
                    flags: self.alloc_str(self.scanner.token_regex_flags()),
                },
                self.alloc_str(&self.scanner.token_text()),
            ),
            SyntaxKind::NullKeyword => (LiteralValue::Null, "null"),
            SyntaxKind::TrueKeyword => (LiteralValue::Boolean(true), "true"),
            SyntaxKind::FalseKeyword => (LiteralValue::Boolean(false), "false"),
            _ => return Err(self.unexpected()),
        };
        self.next_token()?;
        Ok(Literal {
            data: self.finish_node(SyntaxKind::Literal, start),
            value,
            raw,
        })
    }

    /// `new callee` or `new callee(args)`. The callee may contain member
    /// accesses but no calls.
    fn parse_new(&mut self) -> Result<Expression<'a>, SyntaxError> {
        self.enter_recursion()?;
        let result = self.parse_new_worker();
        self.recursion_depth -= 1;
        result
    }

    fn parse_new_worker(&mut self) -> Result<Expression<'a>, SyntaxError> {
        let start = self.token_pos();
        self.next_token()?;
        let base = self.parse_expr_atom()?;
        let callee = self.parse_subscripts(base, true)?;
        let arguments = if self.eat(SyntaxKind::OpenParenToken)? {
            self.parse_arguments()?
        } else {
            &[]
        };
        Ok(Expression::New(CallExpression {
            data: self.finish_node(SyntaxKind::NewExpression, start),
            callee: self.alloc(callee),
            arguments,
        }))
    }

    fn parse_object(&mut self) -> Result<Expression<'a>, SyntaxError> {
        let start = self.token_pos();
        self.next_token()?;

        let mut properties: Vec<ObjectElement<'a>> = Vec::new();
        let mut first = true;
        let mut saw_get_set = false;
        while !self.eat(SyntaxKind::CloseBraceToken)? {
            if first {
                first = false;
            } else {
                self.expect(SyntaxKind::CommaToken)?;
                if self.options.allow_trailing_commas && self.eat(SyntaxKind::CloseBraceToken)? {
                    break;
                }
            }

            let prop_start = self.token_pos();
            let mut key = self.parse_property_name()?;
            let accessor = match &key {
                PropertyKey::Identifier(id) if id.name == "get" => Some(PropertyKind::Get),
                PropertyKey::Identifier(id) if id.name == "set" => Some(PropertyKind::Set),
                _ => None,
            };

            let (kind, value) = if self.eat(SyntaxKind::ColonToken)? {
                (PropertyKind::Init, self.parse_expression(true, false)?)
            } else if let (Some(kind), true) =
                (accessor, self.options.ecma_version >= EcmaVersion::V5)
            {
                saw_get_set = true;
                key = self.parse_property_name()?;
                if self.current_token() != SyntaxKind::OpenParenToken {
                    return Err(self.unexpected());
                }
                let function_start = self.token_pos();
                (kind, Expression::Function(self.parse_function(function_start, false)?))
            } else {
                return Err(self.unexpected());
            };

            // Accessors may not clash with each other or with data
            // properties; in strict mode data properties may not repeat.
            if let PropertyKey::Identifier(id) = &key {
                if self.is_strict() || saw_get_set {
                    self.check_property_clash(&properties, id, kind)?;
                }
            }

            properties.push(ObjectElement {
                data: self.finish_node(SyntaxKind::ObjectElement, prop_start),
                key,
                value: self.alloc(value),
                kind,
            });
        }

        Ok(Expression::Object(ObjectExpression {
            data: self.finish_node(SyntaxKind::ObjectExpression, start),
            properties: alloc_vec_in(self.arena, properties),
        }))
    }

    fn check_property_clash(
        &self,
        properties: &[ObjectElement<'a>],
        id: &Identifier<'a>,
        kind: PropertyKind,
    ) -> Result<(), SyntaxError> {
        for other in properties {
            let PropertyKey::Identifier(other_id) = &other.key else {
                continue;
            };
            if other_id.name != id.name {
                continue;
            }
            let both_init = kind == PropertyKind::Init && other.kind == PropertyKind::Init;
            let conflict = if both_init {
                self.is_strict()
            } else {
                kind == other.kind || kind == PropertyKind::Init || other.kind == PropertyKind::Init
            };
            if conflict {
                return Err(self.error(
                    id.data.range.pos,
                    &messages::REDEFINITION_OF_PROPERTY,
                    &[],
                ));
            }
        }
        Ok(())
    }

    fn parse_property_name(&mut self) -> Result<PropertyKey<'a>, SyntaxError> {
        match self.current_token() {
            SyntaxKind::NumericLiteral | SyntaxKind::StringLiteral => {
                Ok(PropertyKey::Literal(self.parse_literal()?))
            }
            _ => Ok(PropertyKey::Identifier(self.parse_ident(true)?)),
        }
    }

    fn parse_arguments(&mut self) -> Result<&'a [Expression<'a>], SyntaxError> {
        let arguments = self.parse_expr_list(SyntaxKind::CloseParenToken, false, false)?;
        Ok(alloc_vec_in(
            self.arena,
            arguments.into_iter().flatten().collect(),
        ))
    }

    /// A comma-separated list up to `close`. With `allow_empty`, adjacent
    /// commas produce holes (`None`).
    fn parse_expr_list(
        &mut self,
        close: SyntaxKind,
        allow_trailing_comma: bool,
        allow_empty: bool,
    ) -> Result<Vec<Option<Expression<'a>>>, SyntaxError> {
        let mut elements = Vec::new();
        let mut first = true;
        while !self.eat(close)? {
            if first {
                first = false;
            } else {
                self.expect(SyntaxKind::CommaToken)?;
                if allow_trailing_comma && self.options.allow_trailing_commas && self.eat(close)? {
                    break;
                }
            }

            if allow_empty && self.current_token() == SyntaxKind::CommaToken {
                elements.push(None);
            } else {
                elements.push(Some(self.parse_expression(true, false)?));
            }
        }
        Ok(elements)
    }

    /// An identifier. With `liberal` (property names), keywords are
    /// accepted as names unless reserved words are forbidden.
    fn parse_ident(&mut self, liberal: bool) -> Result<Identifier<'a>, SyntaxError> {
        let start = self.token_pos();
        let name = match self.current_token() {
            SyntaxKind::Identifier => self.alloc_str(self.scanner.token_value()),
            kind if liberal && !self.options.forbid_reserved => match kind.keyword_text() {
                Some(text) => text,
                None => return Err(self.unexpected()),
            },
            _ => return Err(self.unexpected()),
        };
        self.scanner.set_regex_allowed(false);
        self.next_token()?;
        Ok(Identifier {
            data: self.finish_node(SyntaxKind::Identifier, start),
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_vec_in() {
        let arena = Bump::new();
        let slice = alloc_vec_in(&arena, vec![1, 2, 3]);
        assert_eq!(slice, &[1, 2, 3]);
        let empty: &[u8] = alloc_vec_in(&arena, Vec::new());
        assert!(empty.is_empty());
    }

    #[test]
    fn test_strictness_restored_after_function_body() {
        let arena = Bump::new();
        let source = "function f() { 'use strict'; } var x = 010;";
        let program = parse(&arena, source, &ParserOptions::default()).unwrap();
        assert_eq!(program.body.len(), 2);
        assert!(!program.strict);
    }

    #[test]
    fn test_program_strict_flag() {
        let arena = Bump::new();
        let program = parse(&arena, "'use strict'; a = 1;", &ParserOptions::default()).unwrap();
        assert!(program.strict);
    }
}
