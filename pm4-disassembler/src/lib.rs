//! # PM4 Disassembler
//!
//! Walk a PM4 command stream and print it in the assembler's syntax.
//!
//! The stream carries no generation tag, so the caller names the target
//! family. Packets whose layout has alternatives that no mode flag decides
//! (for example the long form of `DRAW_INDEX_INDIRECT_MULTI`) need a
//! preferred variant; see [`Decoder::with_variants`].
//!
//! ## Example
//!
//! ```rust
//! use pm4_disassembler::disassemble;
//! use pm4_spec::Generation;
//!
//! let words = [0xC001_2D00, 3, 2];
//! let asm = disassemble(&words, Generation::Gfx10).unwrap();
//! assert!(asm.contains("DRAW_INDEX_AUTO index_count=0x3 draw_initiator=0x2"));
//! ```

pub mod decoder;
pub mod disassembler;
pub mod error;
pub mod formatter;

pub use decoder::{decode_stream, split_packets, Decoder, RawPacket};
pub use disassembler::{disassemble, Disassembler};
pub use error::{DisassemblerError, Result};
pub use formatter::{format, format_value, format_words};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        let err = DisassemblerError::Truncated {
            offset: 0,
            needed: 3,
            available: 1,
        };
        assert_eq!(err.offset(), Some(0));
        assert!(err.to_string().contains("needs 3 dwords"));
    }

    #[test]
    fn test_result_type() {
        let ok: Result<i32> = Ok(42);
        assert!(ok.is_ok());
    }
}
