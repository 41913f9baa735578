// ABOUTME: Lexer module turning source text into a stream of tokens

use crate::token::{lookup_ident, Token, TokenKind};
use thiserror::Error;

/// A lexer error is fatal to the current parse: it indicates a source byte
/// the language cannot tokenize at all, so there is nothing sensible to
/// recover to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character: {0}")]
    UnexpectedCharacter(char),

    #[error("unterminated comment")]
    UnterminatedComment,
}

/// Stateful cursor over a source string. No lookahead buffer beyond one
/// character of `peek_char`; restartable only in the sense that calling
/// `next_token` repeatedly drains the stream to `Eof`.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    read_position: usize,
    ch: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let mut lexer = Lexer {
            input: input.chars().collect(),
            position: 0,
            read_position: 0,
            ch: None,
        };
        lexer.read_char();
        lexer
    }

    fn read_char(&mut self) {
        self.ch = self.input.get(self.read_position).copied();
        self.position = self.read_position;
        self.read_position += 1;
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.read_position).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, Some(c) if c.is_whitespace()) {
            self.read_char();
        }
    }

    /// Skips a `//` line comment, consuming through (and including) the
    /// trailing newline. EOF reached while still inside the comment is a
    /// lexer error, per the language's comment rule.
    fn skip_comment(&mut self) -> Result<(), LexError> {
        while self.ch != Some('\n') {
            if self.ch.is_none() {
                return Err(LexError::UnterminatedComment);
            }
            self.read_char();
        }
        self.read_char();
        Ok(())
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while matches!(self.ch, Some(c) if c.is_alphanumeric() || c == '_') {
            self.read_char();
        }
        self.input[start..self.position].iter().collect()
    }

    /// Reads a run of digits, optionally followed by `.digits`, which
    /// promotes the token to `FLOAT`.
    fn read_number(&mut self) -> (String, TokenKind) {
        let start = self.position;
        while matches!(self.ch, Some(c) if c.is_ascii_digit()) {
            self.read_char();
        }

        let mut kind = TokenKind::Int;
        if self.ch == Some('.') && matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
            kind = TokenKind::Float;
            self.read_char();
            while matches!(self.ch, Some(c) if c.is_ascii_digit()) {
                self.read_char();
            }
        }

        (self.input[start..self.position].iter().collect(), kind)
    }

    /// Returns the next token in the stream, advancing the cursor past it.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            self.skip_whitespace();
            if self.ch == Some('/') && self.peek_char() == Some('/') {
                self.skip_comment()?;
                continue;
            }
            break;
        }

        let tok = match self.ch {
            Some('=') => {
                if self.peek_char() == Some('=') {
                    self.read_char();
                    Token::new(TokenKind::Eq, "==")
                } else {
                    Token::new(TokenKind::Assign, "=")
                }
            }
            Some('!') => {
                if self.peek_char() == Some('=') {
                    self.read_char();
                    Token::new(TokenKind::NotEq, "!=")
                } else {
                    Token::new(TokenKind::Bang, "!")
                }
            }
            Some('+') => Token::new(TokenKind::Plus, "+"),
            Some('-') => Token::new(TokenKind::Minus, "-"),
            Some('*') => Token::new(TokenKind::Asterisk, "*"),
            Some('/') => Token::new(TokenKind::Slash, "/"),
            Some('<') => Token::new(TokenKind::Lt, "<"),
            Some('>') => Token::new(TokenKind::Gt, ">"),
            Some(',') => Token::new(TokenKind::Comma, ","),
            Some(';') => Token::new(TokenKind::Semicolon, ";"),
            Some('(') => Token::new(TokenKind::Lparen, "("),
            Some(')') => Token::new(TokenKind::Rparen, ")"),
            Some('{') => Token::new(TokenKind::Lbrace, "{"),
            Some('}') => Token::new(TokenKind::Rbrace, "}"),
            None => Token::new(TokenKind::Eof, ""),
            Some(c) if c.is_alphabetic() || c == '_' => {
                let literal = self.read_identifier();
                let kind = lookup_ident(&literal);
                return Ok(Token::new(kind, literal));
            }
            Some(c) if c.is_ascii_digit() => {
                let (literal, kind) = self.read_number();
                return Ok(Token::new(kind, literal));
            }
            Some(c) => return Err(LexError::UnexpectedCharacter(c)),
        };

        self.read_char();
        Ok(tok)
    }
}

/// Convenience wrapper for collaborators that want the whole token stream
/// up front rather than driving `next_token` themselves.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token()?;
        let done = tok.kind == TokenKind::Eof;
        tokens.push(tok);
        if done {
            break;
        }
    }
    Ok(tokens)
}
