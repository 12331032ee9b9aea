use pretty_assertions::assert_eq;
use volt::interpreter::lexer::{TokenKind, tokenize};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).iter().map(|t| t.kind).collect()
}

#[test]
fn empty_source_is_only_eof() {
    let tokens = tokenize("");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
    assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(kinds("let letter run runner until fn fnord"),
               [TokenKind::Let,
                TokenKind::Identifier,
                TokenKind::Run,
                TokenKind::Identifier,
                TokenKind::Until,
                TokenKind::Fn,
                TokenKind::Identifier,
                TokenKind::Eof]);
}

#[test]
fn two_character_operators_win_over_prefixes() {
    assert_eq!(kinds("== != <= >= && || ++ -- += -= *= /="),
               [TokenKind::EqualEqual,
                TokenKind::BangEqual,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::PlusEqual,
                TokenKind::MinusEqual,
                TokenKind::StarEqual,
                TokenKind::SlashEqual,
                TokenKind::Eof]);
}

#[test]
fn number_lexemes_keep_their_fraction() {
    let tokens = tokenize("3.25 7 xs.length");
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].lexeme, "3.25");
    assert_eq!(tokens[1].lexeme, "7");
    assert_eq!(&kinds("xs.length")[..3],
               [TokenKind::Identifier, TokenKind::Dot, TokenKind::Identifier]);
}

#[test]
fn comments_and_whitespace_are_skipped() {
    assert_eq!(kinds("// nothing here\n  print 1; // trailing\n"),
               [TokenKind::Print, TokenKind::Number, TokenKind::Semicolon, TokenKind::Eof]);
}

#[test]
fn lines_and_columns_are_one_based() {
    let tokens = tokenize("let x = 1;\n  print x;");
    let print = &tokens[5];
    assert_eq!(print.kind, TokenKind::Print);
    assert_eq!((print.line, print.column), (2, 3));
}

#[test]
fn multi_line_strings_advance_the_line_counter() {
    let tokens = tokenize("\"a\nb\" x");
    assert_eq!(tokens[0].literal.as_deref(), Some("a\nb"));
    assert_eq!((tokens[1].line, tokens[1].column), (2, 4));
}

#[test]
fn string_escapes_are_decoded_and_unknown_ones_kept() {
    let tokens = tokenize(r#""tab\there \"q\" \x""#);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].literal.as_deref(), Some("tab\there \"q\" \\x"));
}

#[test]
fn unknown_characters_become_error_tokens() {
    let tokens = tokenize("1 @ 2 & 3");
    assert_eq!(tokens[1].kind, TokenKind::Error);
    assert_eq!(tokens[1].lexeme, "@");
    assert_eq!(tokens[3].kind, TokenKind::Error);
    assert_eq!(tokens[3].lexeme, "&");
}

#[test]
fn unterminated_string_is_an_error_token() {
    let tokens = tokenize("print \"oops");
    assert_eq!(tokens[1].kind, TokenKind::Error);
    assert_eq!(tokens[1].lexeme, "\"oops");
    assert_eq!(tokens[2].kind, TokenKind::Eof);
}
