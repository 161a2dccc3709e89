//! Packet description parser
//!
//! One statement per line:
//!
//! ```text
//! .gen gfx10
//! OPCODE [@variant]* [+flag]* [name=value]* [data=[v, ...]]
//! ```
//!
//! `value` is a decimal, `0x` hex or `0b` binary number, or the name of a
//! member of the field's enumeration. `name` is a field or, when no field
//! has that name, an address pair whose value is split into its halves.

use crate::error::{AssemblerError, Result};
use crate::lexer::Token;
use logos::Logos;
use pm4_spec::layout::FieldKind;
use pm4_spec::{Catalog, Generation, Opcode, PacketDescriptor, ShaderType};
use std::ops::Range;

/// Name of the pseudo-field holding trailing payload dwords
pub const PAYLOAD_KEY: &str = "data";

/// One parsed source line
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `.gen` directive switching the target generation
    Generation(Generation),
    Packet(PacketDescriptor),
}

/// Parse a single packet line for `generation`
pub fn parse_packet(text: &str, generation: Generation) -> Result<PacketDescriptor> {
    match parse_line(text, Some(generation))? {
        Some(Statement::Packet(desc)) => Ok(desc),
        Some(Statement::Generation(_)) | None => Err(syntax(0, "expected a packet")),
    }
}

/// Parse one line; blank and comment-only lines yield `None`
///
/// `generation` is the target set by the most recent `.gen` directive;
/// packets before the first one are an error.
pub fn parse_line(text: &str, generation: Option<Generation>) -> Result<Option<Statement>> {
    let tokens = tokenize(text)?;
    let Some((first, span)) = tokens.first() else {
        return Ok(None);
    };

    match first {
        Token::Directive(name) => parse_directive(name, &tokens[1..]).map(Some),
        Token::Word(name) => {
            let generation = generation.ok_or(AssemblerError::MissingGeneration)?;
            let opcode =
                Opcode::from_name(name).ok_or_else(|| AssemblerError::UnknownOpcode(name.clone()))?;
            let mut desc = PacketDescriptor::new(opcode, generation);
            parse_operands(&mut desc, &tokens[1..])?;
            Ok(Some(Statement::Packet(desc)))
        }
        _ => Err(syntax(span.start, "expected an opcode or directive")),
    }
}

/// Parse a decimal, `0x` hexadecimal or `0b` binary number
///
/// Underscores may separate digits.
pub fn parse_number(text: &str) -> Option<u64> {
    let digits = |s: &str| s.replace('_', "");
    let lower = text.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        u64::from_str_radix(&digits(hex), 16).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        u64::from_str_radix(&digits(bin), 2).ok()
    } else if lower.starts_with(|c: char| c.is_ascii_digit()) {
        digits(&lower).parse().ok()
    } else {
        None
    }
}

type Spanned = (Token, Range<usize>);

fn tokenize(text: &str) -> Result<Vec<Spanned>> {
    let mut lex = Token::lexer(text);
    let mut tokens = Vec::new();
    while let Some(token) = lex.next() {
        match token {
            Ok(token) => tokens.push((token, lex.span())),
            Err(()) => {
                return Err(syntax(
                    lex.span().start,
                    format!("unexpected character '{}'", lex.slice()),
                ))
            }
        }
    }
    Ok(tokens)
}

fn syntax(offset: usize, message: impl Into<String>) -> AssemblerError {
    AssemblerError::SyntaxError {
        column: offset + 1,
        message: message.into(),
    }
}

fn parse_directive(name: &str, args: &[Spanned]) -> Result<Statement> {
    match (name, args) {
        ("gen", [(Token::Word(target), _)]) => Ok(Statement::Generation(target.parse()?)),
        ("gen", _) => Err(syntax(0, ".gen takes one generation name")),
        _ => Err(AssemblerError::InvalidDirective(name.to_string())),
    }
}

fn parse_operands(desc: &mut PacketDescriptor, tokens: &[Spanned]) -> Result<()> {
    let mut rest = tokens;
    while let Some(((token, span), tail)) = rest.split_first() {
        rest = tail;
        match token {
            Token::Variant(name) => {
                desc.variants.insert(name.clone());
            }
            Token::Flag(flag) => match flag.as_str() {
                "predicate" => desc.flags.predicate = true,
                "compute" => desc.flags.shader_type = ShaderType::Compute,
                "reset_filter_cam" => desc.flags.reset_filter_cam = true,
                _ => return Err(AssemblerError::UnknownFlag(flag.clone())),
            },
            Token::Word(name) => {
                let Some(((Token::Equals, _), tail)) = rest.split_first() else {
                    return Err(syntax(span.end, format!("expected '=' after {}", name)));
                };
                rest = tail;
                match rest.split_first() {
                    Some(((Token::LBracket, open), tail)) if name == PAYLOAD_KEY => {
                        let (payload, tail) = parse_payload(tail, open.start)?;
                        desc.payload = payload;
                        rest = tail;
                    }
                    Some(((Token::Word(value), _), tail)) => {
                        assign(desc, name, value)?;
                        rest = tail;
                    }
                    Some(((_, at), _)) => {
                        return Err(syntax(at.start, format!("expected a value for {}", name)))
                    }
                    None => return Err(syntax(span.end + 1, format!("missing value for {}", name))),
                }
            }
            _ => return Err(syntax(span.start, "expected a field, variant or flag")),
        }
    }
    Ok(())
}

fn parse_payload(tokens: &[Spanned], open: usize) -> Result<(Vec<u32>, &[Spanned])> {
    let mut payload = Vec::new();
    let mut rest = tokens;
    loop {
        match rest.split_first() {
            Some(((Token::RBracket, _), tail)) => return Ok((payload, tail)),
            Some(((Token::Word(text), _), tail)) => {
                let word = parse_number(text)
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| AssemblerError::InvalidValue {
                        field: PAYLOAD_KEY.to_string(),
                        value: text.clone(),
                    })?;
                payload.push(word);
                rest = match tail.split_first() {
                    Some(((Token::Comma, _), after)) => after,
                    Some(((Token::RBracket, _), _)) => tail,
                    Some(((_, at), _)) => return Err(syntax(at.start, "expected ',' or ']' after a payload dword")),
                    None => return Err(syntax(open, "unterminated payload list")),
                };
            }
            Some(((_, at), _)) => return Err(syntax(at.start, "expected a payload dword")),
            None => return Err(syntax(open, "unterminated payload list")),
        }
    }
}

/// Store `name = text`, resolving enumerator names and address pairs
fn assign(desc: &mut PacketDescriptor, name: &str, text: &str) -> Result<()> {
    let catalog = Catalog::global();
    let spec = catalog.field_spec(desc.opcode, desc.generation, name);

    let value = match parse_number(text) {
        Some(value) => value,
        None => spec
            .and_then(|spec| match spec.kind {
                FieldKind::Enum(def) => def.value_of(text, desc.generation),
                _ => None,
            })
            .map(u64::from)
            .ok_or_else(|| AssemblerError::InvalidValue {
                field: name.to_string(),
                value: text.to_string(),
            })?,
    };

    if spec.is_none() && catalog.address_pair(desc.opcode, name).is_some() {
        desc.set_address(name, value)?;
    } else {
        desc.set_field(name, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42));
        assert_eq!(parse_number("0x1A"), Some(0x1A));
        assert_eq!(parse_number("0XFFFF_FFFF"), Some(0xFFFF_FFFF));
        assert_eq!(parse_number("0b1010"), Some(0b1010));
        assert_eq!(parse_number("1_000"), Some(1000));
        assert_eq!(parse_number("32bits_1returnval"), None);
        assert_eq!(parse_number("lru"), None);
        assert_eq!(parse_number("0x"), None);
    }

    #[test]
    fn test_parse_simple_packet() {
        let desc = parse_packet("DRAW_INDEX_AUTO index_count=3 draw_initiator=2", Generation::Gfx10)
            .unwrap();
        assert_eq!(desc.opcode, Opcode::DrawIndexAuto);
        assert_eq!(desc.get("index_count"), Some(3));
        assert_eq!(desc.get("draw_initiator"), Some(2));
    }

    #[test]
    fn test_parse_lowercase_opcode() {
        let desc = parse_packet("draw_index_auto", Generation::Gfx9).unwrap();
        assert_eq!(desc.opcode, Opcode::DrawIndexAuto);
    }

    #[test]
    fn test_parse_flags_and_variants() {
        let desc = parse_packet(
            "DRAW_INDEX_INDIRECT_MULTI @with_addr +predicate +compute +reset_filter_cam",
            Generation::Gfx10,
        )
        .unwrap();
        assert!(desc.variants.contains("with_addr"));
        assert!(desc.flags.predicate);
        assert_eq!(desc.flags.shader_type, ShaderType::Compute);
        assert!(desc.flags.reset_filter_cam);
    }

    #[test]
    fn test_parse_enum_names() {
        let desc = parse_packet("WAIT_REG_MEM mem_space=memory_space", Generation::Gfx10).unwrap();
        assert_eq!(desc.get("mem_space"), Some(1));

        // names are generation-qualified
        let desc = parse_packet("COPY_DATA src_sel=memory", Generation::Gfx9).unwrap();
        assert_eq!(desc.get("src_sel"), Some(1));
        let err = parse_packet("COPY_DATA src_sel=memory", Generation::Gfx10).unwrap_err();
        assert!(matches!(err, AssemblerError::InvalidValue { .. }));
    }

    #[test]
    fn test_parse_address_pair() {
        let desc = parse_packet("DRAW_INDEX_2 index_base=0x800012340000", Generation::Gfx10).unwrap();
        assert_eq!(desc.get("index_base_lo"), Some(0x1234_0000));
        assert_eq!(desc.get("index_base_hi"), Some(0x8000));
    }

    #[test]
    fn test_field_name_wins_over_pair() {
        // WAIT_REG_MEM64 pairs "reference" with "reference_hi"
        let desc = parse_packet("WAIT_REG_MEM64 reference_hi=2 reference=1", Generation::Gfx10).unwrap();
        assert_eq!(desc.get("reference"), Some(1));
        assert_eq!(desc.get("reference_hi"), Some(2));
    }

    #[test]
    fn test_parse_payload() {
        let desc = parse_packet("SET_SH_REG reg_offset=0x2c data=[0x11, 0x22]", Generation::Gfx10).unwrap();
        assert_eq!(desc.payload, vec![0x11, 0x22]);

        let desc = parse_packet("NOP data=[]", Generation::Gfx10).unwrap();
        assert!(desc.payload.is_empty());
    }

    #[test]
    fn test_parse_directive() {
        assert_eq!(
            parse_line(".gen gfx11", None).unwrap(),
            Some(Statement::Generation(Generation::Gfx11))
        );
        assert!(matches!(
            parse_line(".gen gfx8", None),
            Err(AssemblerError::UnknownGeneration(_))
        ));
        assert!(matches!(
            parse_line(".text", None),
            Err(AssemblerError::InvalidDirective(_))
        ));
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(parse_line("   ; nothing here", None).unwrap(), None);
    }

    // Error cases
    #[test]
    fn test_parse_unknown_opcode() {
        let err = parse_packet("DRAW_EVERYTHING", Generation::Gfx10).unwrap_err();
        assert!(matches!(err, AssemblerError::UnknownOpcode(name) if name == "DRAW_EVERYTHING"));
    }

    #[test]
    fn test_parse_unknown_flag() {
        let err = parse_packet("NOP +loud", Generation::Gfx10).unwrap_err();
        assert!(matches!(err, AssemblerError::UnknownFlag(_)));
    }

    #[test]
    fn test_parse_missing_value() {
        assert!(matches!(
            parse_packet("DRAW_INDEX_AUTO index_count=", Generation::Gfx10),
            Err(AssemblerError::SyntaxError { .. })
        ));
        assert!(matches!(
            parse_packet("DRAW_INDEX_AUTO index_count", Generation::Gfx10),
            Err(AssemblerError::SyntaxError { .. })
        ));
    }

    #[test]
    fn test_parse_bad_payload() {
        assert!(matches!(
            parse_packet("NOP data=[1, 2", Generation::Gfx10),
            Err(AssemblerError::SyntaxError { .. })
        ));
        assert!(matches!(
            parse_packet("NOP data=[0x1_0000_0000]", Generation::Gfx10),
            Err(AssemblerError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_parse_payload_needs_commas() {
        assert!(matches!(
            parse_packet("NOP data=[1 2]", Generation::Gfx10),
            Err(AssemblerError::SyntaxError { .. })
        ));
        assert!(matches!(
            parse_packet("NOP data=[1, 2 3]", Generation::Gfx10),
            Err(AssemblerError::SyntaxError { .. })
        ));
        assert!(matches!(
            parse_packet("NOP data=[1 =]", Generation::Gfx10),
            Err(AssemblerError::SyntaxError { .. })
        ));
        let desc = parse_packet("NOP data=[1, 2]", Generation::Gfx10).unwrap();
        assert_eq!(desc.payload, vec![1, 2]);
    }

    #[test]
    fn test_packet_needs_generation() {
        assert!(matches!(
            parse_line("NOP", None),
            Err(AssemblerError::MissingGeneration)
        ));
    }
}
