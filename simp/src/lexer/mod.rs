//! Lexer implementation using logos

mod token;

pub use token::Token;

use crate::ast::Span;
use crate::error::{CompileError, Result};
use logos::Logos;

/// Tokenize source code
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                let slice = lexer.slice();
                let message = if slice.bytes().all(|b| b.is_ascii_digit()) {
                    format!("integer literal out of range: {slice}")
                } else {
                    format!("unexpected character: {slice:?}")
                };
                return Err(CompileError::lexer(message, span));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_keywords() {
        assert_eq!(
            kinds("num str chr void if else for while return print fileprint"),
            vec![
                Token::TyNum,
                Token::TyStr,
                Token::TyChr,
                Token::Void,
                Token::If,
                Token::Else,
                Token::For,
                Token::While,
                Token::Return,
                Token::Print,
                Token::FilePrint,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(kinds("number"), vec![Token::Ident("number".to_string())]);
        assert_eq!(kinds("printer"), vec![Token::Ident("printer".to_string())]);
    }

    #[test]
    fn test_tokenize_literals() {
        assert_eq!(
            kinds(r#"42 "hi\n" 'c' '\''"#),
            vec![
                Token::IntLit(42),
                Token::StringLit("hi\n".to_string()),
                Token::CharLit('c'),
                Token::CharLit('\''),
            ]
        );
    }

    #[test]
    fn test_tokenize_compound_operators() {
        assert_eq!(
            kinds("++ -- += -= *= /= && || == != <= >="),
            vec![
                Token::PlusPlus,
                Token::MinusMinus,
                Token::PlusEq,
                Token::MinusEq,
                Token::StarEq,
                Token::SlashEq,
                Token::AmpAmp,
                Token::PipePipe,
                Token::EqEq,
                Token::NotEq,
                Token::LtEq,
                Token::GtEq,
            ]
        );
    }

    #[test]
    fn test_counter_access() {
        assert_eq!(
            kinds("x.c1"),
            vec![
                Token::Ident("x".to_string()),
                Token::Dot,
                Token::Ident("c1".to_string()),
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let source = "# header\nx = 1; // trailing\n";
        assert_eq!(kinds(source).len(), 4);
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("ab = 10;").unwrap();
        assert_eq!(tokens[0].1, Span::new(0, 2));
        assert_eq!(tokens[2].1, Span::new(5, 7));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("x = @;").unwrap_err();
        assert_eq!(err.span(), Some(Span::new(4, 5)));
        assert!(err.message().contains("unexpected character"));
    }

    #[test]
    fn test_integer_overflow() {
        let err = tokenize("99999999999999999999").unwrap_err();
        assert!(err.message().contains("out of range"));
    }
}
