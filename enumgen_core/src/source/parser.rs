//! Go declaration parser - converts tokens to the declaration AST.

use super::GoSourceError;
use super::ast::{ConstDecl, ConstSpec, SourceFile, TypeDecl};
use super::lexer::{SpannedToken, Token, tokenize};
use crate::enumerate::expr::{BinaryOp, ConstValue, Expr, UnaryOp};

/// Parse error with location information.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(line) = self.line {
            write!(f, "Parse error at line {}: {}", line, self.message)
        } else {
            write!(f, "Parse error: {}", self.message)
        }
    }
}

impl std::error::Error for ParseError {}

/// Tokenize and parse Go source.
pub fn parse(source: &str) -> Result<SourceFile, GoSourceError> {
    let tokens = tokenize(source)?;
    Ok(Parser::new(tokens).parse()?)
}

/// Parser state.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse a complete source file.
    pub fn parse(&mut self) -> Result<SourceFile, ParseError> {
        let mut file = SourceFile::new();

        self.skip_semicolons();
        self.expect(Token::Package)?;
        file.package = self.expect_identifier()?;

        while !self.is_at_end() {
            match self.peek() {
                Some(Token::Semicolon) => {
                    self.advance();
                }
                Some(Token::Const) => {
                    file.consts.push(self.parse_const_decl()?);
                }
                Some(Token::Type) => {
                    self.parse_type_decl(&mut file.types)?;
                }
                Some(_) => {
                    // imports, vars and funcs carry nothing enum generation needs
                    self.skip_declaration();
                }
                None => break,
            }
        }

        Ok(file)
    }

    fn parse_const_decl(&mut self) -> Result<ConstDecl, ParseError> {
        let line = self.current_line();
        self.expect(Token::Const)?;

        if !self.check(&Token::LParen) {
            let spec = self.parse_const_spec()?;
            return Ok(ConstDecl {
                specs: vec![spec],
                line,
            });
        }

        self.advance();
        let mut specs = Vec::new();
        loop {
            self.skip_semicolons();
            if self.check(&Token::RParen) {
                self.advance();
                break;
            }
            if self.is_at_end() {
                return Err(self.error("Unterminated const group"));
            }
            specs.push(self.parse_const_spec()?);
            if !self.check(&Token::RParen) {
                self.expect(Token::Semicolon)?;
            }
        }

        Ok(ConstDecl {
            specs,
            line,
        })
    }

    fn parse_const_spec(&mut self) -> Result<ConstSpec, ParseError> {
        let line = self.current_line();
        let mut names = vec![self.expect_identifier()?];
        while self.check(&Token::Comma) {
            self.advance();
            names.push(self.expect_identifier()?);
        }

        let type_name = if matches!(self.peek(), Some(Token::Identifier(_))) {
            Some(self.parse_type_name()?)
        } else {
            None
        };

        let values = if self.check(&Token::Assign) {
            self.advance();
            self.parse_expr_list()?
        } else {
            Vec::new()
        };

        Ok(ConstSpec {
            names,
            type_name,
            values,
            line,
        })
    }

    fn parse_type_decl(&mut self, types: &mut Vec<TypeDecl>) -> Result<(), ParseError> {
        self.expect(Token::Type)?;

        if !self.check(&Token::LParen) {
            types.push(self.parse_type_spec()?);
            return Ok(());
        }

        self.advance();
        loop {
            self.skip_semicolons();
            if self.check(&Token::RParen) {
                self.advance();
                return Ok(());
            }
            if self.is_at_end() {
                return Err(self.error("Unterminated type group"));
            }
            types.push(self.parse_type_spec()?);
        }
    }

    fn parse_type_spec(&mut self) -> Result<TypeDecl, ParseError> {
        let line = self.current_line();
        let name = self.expect_identifier()?;

        let alias = self.check(&Token::Assign);
        if alias {
            self.advance();
        }

        let underlying = if matches!(self.peek(), Some(Token::Identifier(_))) {
            let underlying = self.parse_type_name()?;
            if self.at_spec_end() {
                Some(underlying)
            } else {
                // map[K]V, struct {...}, chan T and friends
                self.skip_spec_rest();
                None
            }
        } else {
            self.skip_spec_rest();
            None
        };

        Ok(TypeDecl {
            name,
            underlying,
            alias,
            line,
        })
    }

    /// `Name` or `pkg.Name`.
    fn parse_type_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.expect_identifier()?;
        if self.check(&Token::Dot) {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_identifier()?);
        }
        Ok(name)
    }

    fn parse_expr_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.parse_expr()?];
        while self.check(&Token::Comma) {
            self.advance();
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary(1)
    }

    /// Precedence climbing; all Go binary operators are left-associative.
    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        while let Some(op) = self.peek_binary_op() {
            if op.precedence() < min_precedence {
                break;
            }
            self.advance();
            let rhs = self.parse_binary(op.precedence() + 1)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Caret) => UnaryOp::Not,
            Some(Token::Bang) => UnaryOp::LogicalNot,
            _ => return self.parse_primary(),
        };
        self.advance();
        Ok(Expr::unary(op, self.parse_unary()?))
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek().cloned() {
            Some(Token::IntLiteral(text)) => {
                self.advance();
                parse_int_literal(&text)
                    .map(Expr::Int)
                    .ok_or_else(|| self.error(&format!("Invalid integer literal {}", text)))
            }
            Some(Token::FloatLiteral(text)) => {
                self.advance();
                Ok(Expr::Float(text))
            }
            Some(Token::RuneLiteral(text)) => {
                self.advance();
                decode_rune(&text)
                    .map(Expr::Int)
                    .ok_or_else(|| self.error(&format!("Invalid rune literal '{}'", text)))
            }
            Some(Token::StringLiteral(text)) => {
                self.advance();
                decode_string(&text)
                    .map(Expr::Str)
                    .ok_or_else(|| self.error(&format!("Invalid string literal \"{}\"", text)))
            }
            Some(Token::RawStringLiteral(text)) => {
                self.advance();
                Ok(Expr::Str(text.replace('\r', "")))
            }
            Some(Token::Identifier(name)) if name == "iota" => {
                self.advance();
                Ok(Expr::Iota)
            }
            Some(Token::Identifier(_)) => {
                let name = self.parse_type_name()?;
                if !self.check(&Token::LParen) {
                    return Ok(Expr::Ident(name));
                }
                self.advance();
                let mut args = Vec::new();
                while !self.check(&Token::RParen) {
                    args.push(self.parse_expr()?);
                    if !self.check(&Token::RParen) {
                        self.expect(Token::Comma)?;
                    }
                }
                self.expect(Token::RParen)?;
                Ok(Expr::Call { callee: name, args })
            }
            Some(Token::LParen) => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            _ => Err(self.error("Expected expression")),
        }
    }

    fn peek_binary_op(&self) -> Option<BinaryOp> {
        let op = match self.peek()? {
            Token::Plus => BinaryOp::Add,
            Token::Minus => BinaryOp::Sub,
            Token::Star => BinaryOp::Mul,
            Token::Slash => BinaryOp::Div,
            Token::Percent => BinaryOp::Rem,
            Token::Shl => BinaryOp::Shl,
            Token::Shr => BinaryOp::Shr,
            Token::Amp => BinaryOp::BitAnd,
            Token::Pipe => BinaryOp::BitOr,
            Token::Caret => BinaryOp::BitXor,
            Token::AmpCaret => BinaryOp::AndNot,
            Token::EqEq => BinaryOp::Eq,
            Token::NotEq => BinaryOp::Ne,
            Token::Lt => BinaryOp::Lt,
            Token::LtEq => BinaryOp::Le,
            Token::Gt => BinaryOp::Gt,
            Token::GtEq => BinaryOp::Ge,
            Token::AndAnd => BinaryOp::LogicalAnd,
            Token::OrOr => BinaryOp::LogicalOr,
            _ => return None,
        };
        Some(op)
    }

    /// Skip a top-level declaration up to and including its terminating semicolon.
    fn skip_declaration(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.advance() {
            match token.token {
                Token::LParen | Token::LBrace | Token::LBracket => depth += 1,
                Token::RParen | Token::RBrace | Token::RBracket => {
                    depth = depth.saturating_sub(1)
                }
                Token::Semicolon if depth == 0 => return,
                _ => {}
            }
        }
    }

    /// Skip the rest of a type spec, stopping before its `;` or the group's `)`.
    fn skip_spec_rest(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token {
                Token::Semicolon if depth == 0 => return,
                Token::RParen if depth == 0 => return,
                Token::LParen | Token::LBrace | Token::LBracket => depth += 1,
                Token::RParen | Token::RBrace | Token::RBracket => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn at_spec_end(&self) -> bool {
        matches!(self.peek(), None | Some(Token::Semicolon) | Some(Token::RParen))
    }

    fn skip_semicolons(&mut self) {
        while self.check(&Token::Semicolon) {
            self.advance();
        }
    }

    // Helper methods

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        if self.pos < self.tokens.len() {
            let token = self.tokens[self.pos].clone();
            self.pos += 1;
            Some(token)
        } else {
            None
        }
    }

    fn check(&self, expected: &Token) -> bool {
        self.peek() == Some(expected)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn current_line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if self.check(&expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!("Expected {:?}, found {:?}", expected, self.peek())))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match self.peek().cloned() {
            Some(Token::Identifier(name)) => {
                self.advance();
                Ok(name)
            }
            other => Err(self.error(&format!("Expected identifier, found {:?}", other))),
        }
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError {
            message: message.to_string(),
            line: self.tokens.get(self.pos).map(|t| t.line),
        }
    }
}

/// Parse a Go integer literal: decimal, `0x`, `0b`, `0o`, legacy octal, `_` separators.
pub fn parse_int_literal(text: &str) -> Option<ConstValue> {
    let digits: String = text.chars().filter(|c| *c != '_').collect();
    let lower = digits.to_ascii_lowercase();
    let (radix, body) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..])
    } else {
        (10, lower.as_str())
    };
    let value = u128::from_str_radix(body, radix).ok()?;
    ConstValue::try_from(value).ok()
}

/// Decode the body of a rune literal (without quotes) to its code point.
pub fn decode_rune(text: &str) -> Option<ConstValue> {
    let mut chars = text.chars();
    let value = match chars.next()? {
        '\\' => decode_escape(&mut chars)?,
        c => c as u32,
    };
    if chars.next().is_some() {
        return None;
    }
    Some(ConstValue::from(value))
}

/// Decode the body of an interpreted string literal.
pub fn decode_string(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(char::from_u32(decode_escape(&mut chars)?)?);
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// Decode one escape sequence; the leading backslash is already consumed.
fn decode_escape(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let c = chars.next()?;
    let (radix, len, first) = match c {
        'a' => return Some(0x07),
        'b' => return Some(0x08),
        'f' => return Some(0x0c),
        'n' => return Some(0x0a),
        'r' => return Some(0x0d),
        't' => return Some(0x09),
        'v' => return Some(0x0b),
        '\\' | '\'' | '"' => return Some(c as u32),
        'x' => (16, 2, None),
        'u' => (16, 4, None),
        'U' => (16, 8, None),
        '0'..='7' => (8, 2, Some(c)),
        _ => return None,
    };
    let mut digits: String = first.into_iter().collect();
    for _ in 0..len {
        digits.push(chars.next()?);
    }
    u32::from_str_radix(&digits, radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> SourceFile {
        parse(source).unwrap()
    }

    #[test]
    fn test_parse_package_and_const_group() {
        let file = parse_ok(
            r#"package test
type Day int
const (
	Monday Day = iota
	Tuesday
	Wednesday
)
"#,
        );

        assert_eq!(file.package, "test");
        assert_eq!(
            file.types,
            vec![TypeDecl {
                name: "Day".into(),
                underlying: Some("int".into()),
                alias: false,
                line: 2,
            }]
        );
        assert_eq!(file.consts.len(), 1);

        let group = &file.consts[0];
        assert_eq!(group.specs.len(), 3);
        assert_eq!(group.specs[0].names, vec!["Monday"]);
        assert_eq!(group.specs[0].type_name.as_deref(), Some("Day"));
        assert_eq!(group.specs[0].values, vec![Expr::Iota]);
        assert_eq!(group.specs[0].line, 4);
        assert!(group.specs[1].values.is_empty());
        assert!(group.specs[1].type_name.is_none());
    }

    #[test]
    fn test_parse_precedence() {
        let file = parse_ok("package p\nconst A = 1 + 2*iota << 1 | 4\n");
        let value = &file.consts[0].specs[0].values[0];
        // (1 + ((2*iota) << 1)) | 4
        assert_eq!(
            *value,
            Expr::binary(
                BinaryOp::BitOr,
                Expr::binary(
                    BinaryOp::Add,
                    Expr::Int(1),
                    Expr::binary(
                        BinaryOp::Shl,
                        Expr::binary(BinaryOp::Mul, Expr::Int(2), Expr::Iota),
                        Expr::Int(1),
                    ),
                ),
                Expr::Int(4),
            )
        );
    }

    #[test]
    fn test_parse_negative_offset_and_alias() {
        let file = parse_ok(
            "package p\nconst (\n\tm_2 Num = -2 + iota\n\tm_1\n\tAnotherOne = One // dup\n)\n",
        );
        let specs = &file.consts[0].specs;
        assert_eq!(
            specs[0].values[0],
            Expr::binary(
                BinaryOp::Add,
                Expr::unary(UnaryOp::Neg, Expr::Int(2)),
                Expr::Iota
            )
        );
        assert_eq!(specs[2].type_name, None);
        assert_eq!(specs[2].values, vec![Expr::Ident("One".into())]);
    }

    #[test]
    fn test_parse_conversion_and_qualified_names() {
        let file = parse_ok("package p\nconst X = Day(3)\nconst Y time.Duration = time.Second * 2\n");
        assert_eq!(
            file.consts[0].specs[0].values[0],
            Expr::Call {
                callee: "Day".into(),
                args: vec![Expr::Int(3)]
            }
        );
        assert_eq!(
            file.consts[1].specs[0].type_name.as_deref(),
            Some("time.Duration")
        );
    }

    #[test]
    fn test_skips_imports_vars_and_funcs() {
        let file = parse_ok(
            r#"package p

import (
	"fmt"
	"strings"
)

var names = map[Day]string{Monday: "Mon"}

func (d Day) String() string {
	if d < 0 {
		return fmt.Sprintf("Day(%d)", int(d))
	}
	return names[d]
}

type (
	Day int
	Point struct {
		X, Y int
	}
	Handler func(int) error
	Alias = Day
)

const Monday Day = 0
"#,
        );

        let names: Vec<_> = file.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Day", "Point", "Handler", "Alias"]);
        assert_eq!(file.types[1].underlying, None);
        assert_eq!(file.types[2].underlying, None);
        assert!(file.types[3].alias);
        assert_eq!(file.types[3].underlying.as_deref(), Some("Day"));
        assert_eq!(file.consts.len(), 1);
        assert_eq!(file.consts[0].specs[0].names, vec!["Monday"]);
    }

    #[test]
    fn test_multi_name_spec() {
        let file = parse_ok("package p\nconst a, b = 1, 2\n");
        let spec = &file.consts[0].specs[0];
        assert_eq!(spec.names, vec!["a", "b"]);
        assert_eq!(spec.values, vec![Expr::Int(1), Expr::Int(2)]);
    }

    #[test]
    fn test_missing_package_clause() {
        let err = parse("const A = 1\n").unwrap_err();
        assert!(matches!(err, GoSourceError::Parse(_)));
    }

    #[test]
    fn test_unterminated_group() {
        let err = parse("package p\nconst (\n\tA = 1\n").unwrap_err();
        assert!(err.to_string().contains("Unterminated const group"));
    }

    #[test]
    fn test_int_literals() {
        assert_eq!(parse_int_literal("42"), Some(42));
        assert_eq!(parse_int_literal("0x_FF"), Some(255));
        assert_eq!(parse_int_literal("0b1010"), Some(10));
        assert_eq!(parse_int_literal("0o17"), Some(15));
        assert_eq!(parse_int_literal("017"), Some(15));
        assert_eq!(parse_int_literal("1_000_000"), Some(1_000_000));
        assert_eq!(parse_int_literal("0"), Some(0));
        assert_eq!(parse_int_literal("18446744073709551615"), Some(u64::MAX as i128));
        assert_eq!(parse_int_literal("09"), None);
    }

    #[test]
    fn test_rune_and_string_escapes() {
        assert_eq!(decode_rune("a"), Some(97));
        assert_eq!(decode_rune("\\n"), Some(10));
        assert_eq!(decode_rune("\\x41"), Some(65));
        assert_eq!(decode_rune("\\u00e9"), Some(0xe9));
        assert_eq!(decode_rune("\\101"), Some(65));
        assert_eq!(decode_rune("\\'"), Some(39));
        assert_eq!(decode_rune("ab"), None);
        assert_eq!(decode_string("a\\tb").as_deref(), Some("a\tb"));
    }
}
