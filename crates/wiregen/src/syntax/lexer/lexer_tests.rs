#![allow(non_snake_case)]

use super::*;

fn kinds(source: &str) -> Vec<Token> {
    tokenize(Path::new("test.go"), source)
        .unwrap()
        .into_iter()
        .map(|s| s.token)
        .collect()
}

#[test]
fn tokenize___field_line___produces_ident_and_raw_tag() {
    let tokens = kinds("memo string `wire:\"getter\"`\n");

    assert_eq!(
        tokens,
        vec![
            Token::Ident("memo".into()),
            Token::Ident("string".into()),
            Token::RawStr("wire:\"getter\"".into()),
            Token::Newline,
        ]
    );
}

#[test]
fn tokenize___line_comment___strips_marker_and_one_space() {
    let tokens = kinds("//  indented\n");

    assert_eq!(
        tokens[0],
        Token::Comment(Comment {
            lines: vec![" indented".into()],
            end_line: 1,
        })
    );
}

#[test]
fn tokenize___block_comment___tracks_end_line() {
    let tokens = tokenize(Path::new("test.go"), "/*\n * first\n * second\n */\ntype").unwrap();

    match &tokens[0].token {
        Token::Comment(comment) => {
            assert_eq!(comment.end_line, 4);
            assert!(comment.lines.contains(&"first".to_string()));
            assert!(comment.lines.contains(&"second".to_string()));
        }
        other => panic!("expected comment, got {other:?}"),
    }
    assert_eq!(tokens[2].line, 5);
}

#[test]
fn tokenize___interpreted_string___unescapes_quotes() {
    let tokens = kinds(r#""wire:\"getter\"""#);

    assert_eq!(tokens, vec![Token::Str("wire:\"getter\"".into())]);
}

#[test]
fn tokenize___raw_string___spans_lines() {
    let tokens = tokenize(Path::new("test.go"), "`a\nb` x").unwrap();

    assert_eq!(tokens[0].token, Token::RawStr("a\nb".into()));
    assert_eq!(tokens[1].line, 2);
}

#[test]
fn tokenize___braces_inside_strings___stay_in_literal() {
    let tokens = kinds(r#"x := "{" + '}'"#);

    assert!(!tokens.contains(&Token::Punct('{')));
    assert!(!tokens.contains(&Token::Punct('}')));
}

#[test]
fn tokenize___unterminated_string___reports_line() {
    let err = tokenize(Path::new("broken.go"), "\n\nx := \"open\n").unwrap_err();

    assert!(matches!(err, CodegenError::Syntax { line: 3, .. }));
}

#[test]
fn tokenize___unterminated_block_comment___fails() {
    assert!(tokenize(Path::new("broken.go"), "/* never closed").is_err());
}

#[test]
fn tokenize___numbers___kept_verbatim() {
    let tokens = kinds("[0x1F]byte");

    assert_eq!(tokens[1], Token::Number("0x1F".into()));
}
