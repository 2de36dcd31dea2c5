//! Go lexer using the logos crate.

use logos::Logos;

/// Tokens for Go source files.
///
/// Only the declaration-level keywords get their own variants; every other
/// keyword lexes as an identifier, which is all the declaration parser needs.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    // Keywords
    #[token("package")]
    Package,

    #[token("import")]
    Import,

    #[token("const")]
    Const,

    #[token("type")]
    Type,

    #[token("var")]
    Var,

    #[token("func")]
    Func,

    // Punctuation
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token("=")]
    Assign,

    #[token(".")]
    Dot,

    // Operators that may appear in constant expressions
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("&")]
    Amp,

    #[token("|")]
    Pipe,

    #[token("^")]
    Caret,

    #[token("&^")]
    AmpCaret,

    #[token("<<")]
    Shl,

    #[token(">>")]
    Shr,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("<")]
    Lt,

    #[token("<=")]
    LtEq,

    #[token(">")]
    Gt,

    #[token(">=")]
    GtEq,

    #[token("&&")]
    AndAnd,

    #[token("||")]
    OrOr,

    #[token("!")]
    Bang,

    #[token("++")]
    Increment,

    #[token("--")]
    Decrement,

    /// Statement-level operators; only ever skipped over.
    #[regex(r"\+=|-=|\*=|/=|%=|&=|\|=|\^=|<<=|>>=|&\^=|<-|:=|\.\.\.|:|~")]
    Operator,

    // Literals
    #[regex(r"0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[oO][0-7_]+|[0-9][0-9_]*", |lex| lex.slice().to_string())]
    IntLiteral(String),

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?|[0-9][0-9_]*[eE][+-]?[0-9]+|\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    FloatLiteral(String),

    #[regex(r"'(\\[^\n][^'\n]*|[^'\\\n])'", |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    RuneLiteral(String),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    StringLiteral(String),

    #[regex(r"`[^`]*`", |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    RawStringLiteral(String),

    // Identifiers (must come after keywords)
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[token("\n")]
    Newline,

    // Comments
    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
    BlockComment,
}

impl Token {
    /// Whether a newline directly after this token terminates the statement.
    fn ends_statement(&self) -> bool {
        match self {
            Token::Identifier(name) => {
                matches!(name.as_str(), "break" | "continue" | "fallthrough" | "return")
                    || !is_keyword(name)
            }
            Token::IntLiteral(_)
            | Token::FloatLiteral(_)
            | Token::RuneLiteral(_)
            | Token::StringLiteral(_)
            | Token::RawStringLiteral(_)
            | Token::Increment
            | Token::Decrement
            | Token::RParen
            | Token::RBracket
            | Token::RBrace => true,
            _ => false,
        }
    }
}

fn is_keyword(name: &str) -> bool {
    matches!(
        name,
        "break"
            | "case"
            | "chan"
            | "continue"
            | "default"
            | "defer"
            | "else"
            | "fallthrough"
            | "for"
            | "go"
            | "goto"
            | "if"
            | "interface"
            | "map"
            | "range"
            | "return"
            | "select"
            | "struct"
            | "switch"
    )
}

/// A token with its span and 1-based line in the source.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: std::ops::Range<usize>,
    pub line: usize,
}

/// Tokenize Go source.
///
/// Comments and newlines are dropped; a `Semicolon` is synthesized wherever
/// Go's automatic semicolon insertion would place one.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    let mut tokens: Vec<SpannedToken> = Vec::new();
    let mut lexer = Token::lexer(source);
    let mut line = 1;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(Token::Newline) => {
                insert_semicolon(&mut tokens, span, line);
                line += 1;
            }
            Ok(Token::LineComment) => {}
            Ok(Token::BlockComment) => {
                let newlines = lexer.slice().matches('\n').count();
                if newlines > 0 {
                    insert_semicolon(&mut tokens, span, line);
                    line += newlines;
                }
            }
            Ok(token) => {
                let newlines = match &token {
                    Token::RawStringLiteral(text) => text.matches('\n').count(),
                    _ => 0,
                };
                tokens.push(SpannedToken { token, span, line });
                line += newlines;
            }
            Err(()) => {
                return Err(LexError {
                    span: span.clone(),
                    line,
                    message: format!(
                        "Unexpected token: '{}'",
                        &source[span.start..span.end.min(source.len())]
                    ),
                });
            }
        }
    }

    insert_semicolon(&mut tokens, source.len()..source.len(), line);
    Ok(tokens)
}

fn insert_semicolon(tokens: &mut Vec<SpannedToken>, span: std::ops::Range<usize>, line: usize) {
    if tokens.last().is_some_and(|last| last.token.ends_statement()) {
        tokens.push(SpannedToken {
            token: Token::Semicolon,
            span,
            line,
        });
    }
}

/// Lexer error.
#[derive(Debug, Clone)]
pub struct LexError {
    pub span: std::ops::Range<usize>,
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lex error at line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for LexError {}
