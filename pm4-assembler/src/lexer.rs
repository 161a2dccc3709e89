//! # Lexer for the PM4 packet description language

use logos::Logos;

/// Tokens of one source line
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"[#;][^\n]*")] // Skip comments
pub enum Token {
    /// Directive (`.gen`)
    #[regex(r"\.[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Directive(String),

    /// Explicit layout variant (`@with_addr`)
    #[regex(r"@[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Variant(String),

    /// Header flag (`+predicate`, `+compute`, `+reset_filter_cam`)
    #[regex(r"\+[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Flag(String),

    /// Opcode, field name, number or enumerator name
    ///
    /// Enumerator names may start with a digit (`32bits_1returnval`), so
    /// numbers are told apart by the parser rather than the lexer.
    #[regex(r"[a-zA-Z0-9_]+", |lex| lex.slice().to_string())]
    Word(String),

    #[token("=")]
    Equals,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_lexer_packet_line() {
        let tokens: Vec<_> = Token::lexer("DRAW_INDEX_AUTO +predicate index_count=3")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            tokens,
            vec![
                word("DRAW_INDEX_AUTO"),
                Token::Flag("predicate".to_string()),
                word("index_count"),
                Token::Equals,
                word("3"),
            ]
        );
    }

    #[test]
    fn test_lexer_directive() {
        let mut lex = Token::lexer(".gen gfx10");
        assert_eq!(lex.next(), Some(Ok(Token::Directive("gen".to_string()))));
        assert_eq!(lex.next(), Some(Ok(word("gfx10"))));
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn test_lexer_payload_list() {
        let tokens: Vec<_> = Token::lexer("data=[0x1, 2,0b11]")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            tokens,
            vec![
                word("data"),
                Token::Equals,
                Token::LBracket,
                word("0x1"),
                Token::Comma,
                word("2"),
                Token::Comma,
                word("0b11"),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn test_lexer_variant_and_comments() {
        let mut lex = Token::lexer("@with_addr ; trailing comment");
        assert_eq!(lex.next(), Some(Ok(Token::Variant("with_addr".to_string()))));
        assert_eq!(lex.next(), None);

        let mut lex = Token::lexer("# whole line");
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn test_lexer_rejects_stray_characters() {
        let mut lex = Token::lexer("NOP $");
        assert_eq!(lex.next(), Some(Ok(word("NOP"))));
        assert_eq!(lex.next(), Some(Err(())));
    }
}
