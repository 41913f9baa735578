// ABOUTME: Pratt (top-down operator precedence) parser turning tokens into an AST

use crate::ast::{BlockStatement, Expression, Identifier, Program, Statement};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord)]
enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // < >
    Sum,         // + -
    Product,     // * /
    Prefix,      // -x !x
    Call,        // fn(...)
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Slash | TokenKind::Asterisk => Precedence::Product,
        TokenKind::Lparen => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

/// Pratt parser over a token stream. Accumulates error strings rather than
/// failing on the first bad token, so a REPL can show everything wrong with
/// a line at once.
pub struct Parser {
    lexer: Lexer,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<String>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let cur_token = lexer.next_token().unwrap_or(Token::new(TokenKind::Eof, ""));
        let peek_token = lexer.next_token().unwrap_or(Token::new(TokenKind::Eof, ""));
        Parser {
            lexer,
            cur_token,
            peek_token,
            errors: Vec::new(),
        }
    }

    fn next_token(&mut self) {
        std::mem::swap(&mut self.cur_token, &mut self.peek_token);
        self.peek_token = match self.lexer.next_token() {
            Ok(tok) => tok,
            Err(e) => {
                self.errors.push(e.to_string());
                Token::new(TokenKind::Eof, "")
            }
        };
    }

    fn peek_error(&mut self, expected: TokenKind) {
        self.errors.push(format!(
            "expected next token to be {}, got {} instead",
            expected, self.peek_token.kind
        ));
    }

    fn expect_peek(&mut self, expected: TokenKind) -> bool {
        if self.peek_token.kind == expected {
            self.next_token();
            true
        } else {
            self.peek_error(expected);
            false
        }
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek_token.kind)
    }

    fn cur_precedence(&self) -> Precedence {
        precedence_of(self.cur_token.kind)
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while self.cur_token.kind != TokenKind::Eof {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }
        Program { statements }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }

        let name = Identifier {
            token: self.cur_token.clone(),
            name: self.cur_token.literal.clone(),
        };

        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token.kind == TokenKind::Semicolon {
            self.next_token();
        }

        Some(Statement::Let { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token.kind == TokenKind::Semicolon {
            self.next_token();
        }

        Some(Statement::Return { token, value })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        let expr = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token.kind == TokenKind::Semicolon {
            self.next_token();
        }

        Some(Statement::Expression { token, expr })
    }

    fn no_prefix_parse_fn_error(&mut self, kind: TokenKind) {
        self.errors
            .push(format!("no prefix parse function for {} found", kind));
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while self.peek_token.kind != TokenKind::Semicolon && precedence < self.peek_precedence() {
            if !self.has_infix(self.peek_token.kind) {
                return Some(left);
            }
            self.next_token();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    fn has_infix(&self, kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Slash
                | TokenKind::Asterisk
                | TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::Lparen
        )
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.cur_token.kind {
            TokenKind::Ident => Some(Expression::Identifier(Identifier {
                token: self.cur_token.clone(),
                name: self.cur_token.literal.clone(),
            })),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::True | TokenKind::False => Some(Expression::BooleanLiteral {
                token: self.cur_token.clone(),
                value: self.cur_token.kind == TokenKind::True,
            }),
            TokenKind::Null => Some(Expression::NullLiteral {
                token: self.cur_token.clone(),
            }),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::Lparen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Function => self.parse_function_literal(),
            other => {
                self.no_prefix_parse_fn_error(other);
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        if self.cur_token.kind == TokenKind::Lparen {
            return self.parse_call_expression(left);
        }
        self.parse_infix_expression(left)
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral { token, value }),
            Err(_) => {
                self.errors
                    .push(format!("could not parse {} as integer", token.literal));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();

        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expression::Prefix {
            token,
            operator,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();
        let precedence = self.cur_precedence();

        self.next_token();
        let right = self.parse_expression(precedence)?;

        Some(Expression::Infix {
            token,
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }

        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenKind::Lparen) {
            return None;
        }

        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }

        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }

        let consequence = self.parse_block_statement();

        let alternative = if self.peek_token.kind == TokenKind::Else {
            self.next_token();
            if !self.expect_peek(TokenKind::Lbrace) {
                return None;
            }
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expression::If {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.cur_token.clone();
        let mut statements = Vec::new();

        self.next_token();
        while self.cur_token.kind != TokenKind::Rbrace && self.cur_token.kind != TokenKind::Eof {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }

        BlockStatement { token, statements }
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenKind::Lparen) {
            return None;
        }

        let params = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }

        let body = self.parse_block_statement();

        Some(Expression::FunctionLiteral {
            token,
            params,
            body,
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut params = Vec::new();

        if self.peek_token.kind == TokenKind::Rparen {
            self.next_token();
            return Some(params);
        }

        self.next_token();
        params.push(Identifier {
            token: self.cur_token.clone(),
            name: self.cur_token.literal.clone(),
        });

        while self.peek_token.kind == TokenKind::Comma {
            self.next_token();
            self.next_token();
            params.push(Identifier {
                token: self.cur_token.clone(),
                name: self.cur_token.literal.clone(),
            });
        }

        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }

        Some(params)
    }

    fn parse_call_expression(&mut self, callee: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        let args = self.parse_call_arguments()?;

        Some(Expression::Call {
            token,
            callee: Box::new(callee),
            args,
        })
    }

    fn parse_call_arguments(&mut self) -> Option<Vec<Expression>> {
        let mut args = Vec::new();

        if self.peek_token.kind == TokenKind::Rparen {
            self.next_token();
            return Some(args);
        }

        self.next_token();
        args.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token.kind == TokenKind::Comma {
            self.next_token();
            self.next_token();
            args.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }

        Some(args)
    }
}

/// Parses a whole source string into a `Program`, returning any parse
/// errors accumulated along the way. A non-empty error list means the
/// program is best-effort: some statements may be missing.
pub fn parse(source: &str) -> (Program, Vec<String>) {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();
    (program, parser.errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Program {
        let (program, errors) = parse(source);
        assert!(errors.is_empty(), "parser errors: {:?}", errors);
        program
    }

    #[test]
    fn test_let_statements() {
        let program = parse_ok("let x = 5; let y = 10; let foobar = 838383;");
        assert_eq!(program.statements.len(), 3);
        for (stmt, expected_name) in program.statements.iter().zip(["x", "y", "foobar"]) {
            match stmt {
                Statement::Let { name, .. } => assert_eq!(name.name, expected_name),
                _ => panic!("expected let statement, got {:?}", stmt),
            }
        }
    }

    #[test]
    fn test_return_statements() {
        let program = parse_ok("return 5; return 10; return 993322;");
        assert_eq!(program.statements.len(), 3);
        for stmt in &program.statements {
            assert!(matches!(stmt, Statement::Return { .. }));
        }
    }

    #[test]
    fn test_identifier_expression() {
        let program = parse_ok("foobar;");
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Statement::Expression {
                expr: Expression::Identifier(ident),
                ..
            } => assert_eq!(ident.name, "foobar"),
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_integer_literal_expression() {
        let program = parse_ok("5;");
        match &program.statements[0] {
            Statement::Expression {
                expr: Expression::IntegerLiteral { value, .. },
                ..
            } => assert_eq!(*value, 5),
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_parsing_prefix_expressions() {
        let cases = [("!5;", "!", "5"), ("-15;", "-", "15")];
        for (input, op, operand) in cases {
            let program = parse_ok(input);
            match &program.statements[0] {
                Statement::Expression {
                    expr: Expression::Prefix { operator, right, .. },
                    ..
                } => {
                    assert_eq!(operator, op);
                    assert_eq!(right.to_string(), operand);
                }
                other => panic!("unexpected statement: {:?}", other),
            }
        }
    }

    #[test]
    fn test_parsing_infix_expressions() {
        let cases = [
            ("5 + 5;", "(5 + 5)"),
            ("5 - 5;", "(5 - 5)"),
            ("5 * 5;", "(5 * 5)"),
            ("5 / 5;", "(5 / 5)"),
            ("5 > 5;", "(5 > 5)"),
            ("5 < 5;", "(5 < 5)"),
            ("5 == 5;", "(5 == 5)"),
            ("5 != 5;", "(5 != 5)"),
        ];
        for (input, expected) in cases {
            let program = parse_ok(input);
            assert_eq!(program.statements[0].to_string(), expected);
        }
    }

    #[test]
    fn test_operator_precedence_parsing() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
        ];
        for (input, expected) in cases {
            let program = parse_ok(input);
            assert_eq!(program.to_string(), expected);
        }
    }

    #[test]
    fn test_if_expression() {
        let program = parse_ok("if (x < y) { x }");
        match &program.statements[0] {
            Statement::Expression {
                expr: Expression::If { alternative, .. },
                ..
            } => assert!(alternative.is_none()),
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_if_else_expression() {
        let program = parse_ok("if (x < y) { x } else { y }");
        match &program.statements[0] {
            Statement::Expression {
                expr: Expression::If { alternative, .. },
                ..
            } => assert!(alternative.is_some()),
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_function_literal_parsing() {
        let program = parse_ok("fn(x, y) { x + y; }");
        match &program.statements[0] {
            Statement::Expression {
                expr: Expression::FunctionLiteral { params, body, .. },
                ..
            } => {
                assert_eq!(params.len(), 2);
                assert_eq!(params[0].name, "x");
                assert_eq!(params[1].name, "y");
                assert_eq!(body.statements.len(), 1);
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_function_parameter_parsing() {
        let cases: [(&str, &[&str]); 3] = [
            ("fn() {};", &[]),
            ("fn(x) {};", &["x"]),
            ("fn(x, y, z) {};", &["x", "y", "z"]),
        ];
        for (input, expected) in cases {
            let program = parse_ok(input);
            match &program.statements[0] {
                Statement::Expression {
                    expr: Expression::FunctionLiteral { params, .. },
                    ..
                } => {
                    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
                    assert_eq!(names, expected);
                }
                other => panic!("unexpected statement: {:?}", other),
            }
        }
    }

    #[test]
    fn test_call_expression_parsing() {
        let program = parse_ok("add(1, 2 * 3, 4 + 5);");
        match &program.statements[0] {
            Statement::Expression {
                expr: Expression::Call { callee, args, .. },
                ..
            } => {
                assert_eq!(callee.to_string(), "add");
                assert_eq!(args.len(), 3);
                assert_eq!(args[0].to_string(), "1");
                assert_eq!(args[1].to_string(), "(2 * 3)");
                assert_eq!(args[2].to_string(), "(4 + 5)");
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_let_statement_missing_assign_is_error() {
        let (_, errors) = parse("let x 5;");
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_float_literal_is_parse_error() {
        let (_, errors) = parse("3.14;");
        assert_eq!(errors, vec!["no prefix parse function for FLOAT found"]);
    }

    #[test]
    fn test_no_prefix_parse_function_error() {
        let (_, errors) = parse(")");
        assert!(!errors.is_empty());
    }
}
