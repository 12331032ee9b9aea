use std::fmt;

use logos::Logos;
use tracing::trace;

use crate::ast::Location;

/// The kind of a lexical token.
///
/// Produced by the `logos` state machine. Position information and the
/// decoded string literal are attached afterwards by [`tokenize`], which also
/// maps scanning failures to [`TokenKind::Error`] and appends
/// [`TokenKind::Eof`].
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(extras = LexerExtras)]
pub enum TokenKind {
    /// Numeric literals such as `42` or `3.25`.
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,
    /// A terminated string literal.
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,
    /// A string literal missing its closing quote.
    #[regex(r#""([^"\\]|\\.)*"#)]
    UnterminatedString,
    /// Identifier tokens; variable or function names such as `x` or `square`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    /// `let`
    #[token("let")]
    Let,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `run`
    #[token("run")]
    Run,
    /// `until`
    #[token("until")]
    Until,
    /// `fn`
    #[token("fn")]
    Fn,
    /// `return`
    #[token("return")]
    Return,
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// `nil`
    #[token("nil")]
    Nil,
    /// `print`
    #[token("print")]
    Print,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,

    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `?`
    #[token("?")]
    Question,
    /// `:`
    #[token(":")]
    Colon,

    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `!`
    #[token("!")]
    Bang,
    /// `=`
    #[token("=")]
    Equal,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `&&`
    #[token("&&")]
    AndAnd,
    /// `||`
    #[token("||")]
    OrOr,
    /// `++`
    #[token("++")]
    PlusPlus,
    /// `--`
    #[token("--")]
    MinusMinus,
    /// `+=`
    #[token("+=")]
    PlusEqual,
    /// `-=`
    #[token("-=")]
    MinusEqual,
    /// `*=`
    #[token("*=")]
    StarEqual,
    /// `/=`
    #[token("/=")]
    SlashEqual,

    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip)]
    Comment,
    /// Line breaks. Skipped, but they advance the line counter.
    #[token("\n", newline)]
    NewLine,
    /// Spaces, tabs, carriage returns and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,

    /// An unrecognized character or an unterminated string.
    Error,
    /// End of input. Always the last token.
    Eof,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line and the byte offset where it starts, so that
/// columns can be computed from token spans.
#[derive(Debug)]
pub struct LexerExtras {
    /// The current line number, starting at 1.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

impl LexerExtras {
    /// Converts a byte offset on the current line into a [`Location`].
    fn location(&self, offset: usize) -> Location {
        Location::new(self.line, offset - self.line_start + 1)
    }

    /// Accounts for line breaks inside a token that spans several lines.
    fn advance_over(&mut self, text: &str, start: usize) {
        for (i, _) in text.match_indices('\n') {
            self.line += 1;
            self.line_start = start + i + 1;
        }
    }
}

fn newline(lex: &mut logos::Lexer<TokenKind>) -> logos::Skip {
    lex.extras.line += 1;
    lex.extras.line_start = lex.span().end;
    logos::Skip
}

/// A classified fragment of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// What kind of token this is.
    pub kind:    TokenKind,
    /// The raw source text of the token.
    pub lexeme:  &'src str,
    /// Line of the first character, starting at 1.
    pub line:    usize,
    /// Column of the first character, starting at 1.
    pub column:  usize,
    /// For string literals, the contents with escape sequences resolved.
    pub literal: Option<String>,
}

impl Token<'_> {
    /// The position of the token's first character.
    #[must_use]
    pub const fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>4}:{:<4} {:?}", self.line, self.column, self.kind)?;
        if !self.lexeme.is_empty() {
            write!(f, " '{}'", self.lexeme)?;
        }
        Ok(())
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Resolves escape sequences in the body of a string literal.
///
/// Recognized escapes are `\n`, `\t`, `\r`, `\\`, `\"` and `\0`. Any other
/// backslash sequence is kept as written.
///
/// ## Example
/// ```
/// use volt::interpreter::lexer::unescape;
///
/// assert_eq!(unescape(r"a\tb\q"), "a\tb\\q");
/// ```
#[must_use]
pub fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('0') => out.push('\0'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            },
            None => out.push('\\'),
        }
    }
    out
}

/// Converts source text into a sequence of tokens terminated by `Eof`.
///
/// Lexing never fails. Characters the language does not recognize, and
/// string literals missing their closing quote, become [`TokenKind::Error`]
/// tokens that the parser reports.
///
/// # Parameters
/// - `source`: The program text.
///
/// # Returns
/// The tokens in source order. The last one is always `Eof`.
///
/// ## Example
/// ```
/// use volt::interpreter::lexer::{tokenize, TokenKind};
///
/// let tokens = tokenize("let s = \"hi\\n\";");
/// let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
///
/// assert_eq!(kinds,
///            [TokenKind::Let,
///             TokenKind::Identifier,
///             TokenKind::Equal,
///             TokenKind::String,
///             TokenKind::Semicolon,
///             TokenKind::Eof]);
/// assert_eq!(tokens[3].literal.as_deref(), Some("hi\n"));
/// ```
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let lexeme = lexer.slice();
        let loc = lexer.extras.location(span.start);

        let (kind, literal) = match result {
            Ok(TokenKind::String) => {
                let body = &lexeme[1..lexeme.len() - 1];
                (TokenKind::String, Some(unescape(body)))
            },
            Ok(TokenKind::UnterminatedString) => (TokenKind::Error, None),
            Ok(kind) => (kind, None),
            Err(()) => (TokenKind::Error, None),
        };

        if lexeme.contains('\n') {
            lexer.extras.advance_over(lexeme, span.start);
        }

        tokens.push(Token { kind,
                            lexeme,
                            line: loc.line,
                            column: loc.column,
                            literal });
    }

    let eof = lexer.extras.location(source.len());
    tokens.push(Token { kind:    TokenKind::Eof,
                        lexeme:  "",
                        line:    eof.line,
                        column:  eof.column,
                        literal: None, });

    trace!(count = tokens.len(), "tokenized source");
    tokens
}
