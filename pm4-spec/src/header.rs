//! # Type-3 Packet Header
//!
//! ```text
//! [predicate:1][shader_type:1][reset_filter_cam:1][reserved:5][opcode:8][count:14][type:2]
//!  bit 0        bit 1          bit 2               bits 3-7    8-15      16-29     30-31
//! ```
//!
//! `count` is the total packet length in dwords minus two. The `type` field
//! is always 3 for packets handled by this crate.

use crate::error::{Pm4Error, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Bit Position Constants
// ============================================================================

/// Predicate bit: bit 0
pub const PREDICATE_SHIFT: u32 = 0;

/// Shader type bit: bit 1
pub const SHADER_TYPE_SHIFT: u32 = 1;

/// Reset filter CAM bit: bit 2
pub const RESET_FILTER_CAM_SHIFT: u32 = 2;

/// Reserved field: bits 3-7 (5 bits)
pub const RESERVED_SHIFT: u32 = 3;

/// Opcode field: bits 8-15 (8 bits)
pub const OPCODE_SHIFT: u32 = 8;

/// Count field: bits 16-29 (14 bits)
pub const COUNT_SHIFT: u32 = 16;

/// Packet type field: bits 30-31 (2 bits)
pub const TYPE_SHIFT: u32 = 30;

// ============================================================================
// Field Masks
// ============================================================================

/// Reserved mask (5 bits)
pub const RESERVED_MASK: u32 = 0x1F;

/// Opcode mask (8 bits)
pub const OPCODE_MASK: u32 = 0xFF;

/// Count mask (14 bits)
pub const COUNT_MASK: u32 = 0x3FFF;

/// Packet type mask (2 bits)
pub const TYPE_MASK: u32 = 0x3;

/// The only packet type this codec understands
pub const PACKET_TYPE_3: u32 = 3;

/// Largest encodable `count`
pub const MAX_COUNT: u32 = COUNT_MASK;

/// Longest packet in dwords (`MAX_COUNT + 2`)
pub const MAX_PACKET_DWORDS: u32 = MAX_COUNT + 2;

/// Pipe that consumes the packet
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderType {
    #[default]
    Graphics,
    Compute,
}

impl ShaderType {
    #[inline]
    const fn bit(self) -> u32 {
        match self {
            ShaderType::Graphics => 0,
            ShaderType::Compute => 1,
        }
    }
}

/// Per-packet header flags that are independent of the opcode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeaderFlags {
    pub predicate: bool,
    pub shader_type: ShaderType,
    pub reset_filter_cam: bool,
}

/// Decoded type-3 header
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PacketHeader {
    pub flags: HeaderFlags,
    /// Raw reserved bits 3-7; zero in every well-formed header
    pub reserved: u32,
    pub opcode: u8,
    pub count: u16,
}

impl PacketHeader {
    /// Header for `opcode` with the given `count` and default flags
    pub fn new(opcode: u8, count: u32) -> Result<Self> {
        Self::with_flags(opcode, count, HeaderFlags::default())
    }

    /// Header with explicit flags
    pub fn with_flags(opcode: u8, count: u32, flags: HeaderFlags) -> Result<Self> {
        if count > MAX_COUNT {
            return Err(Pm4Error::Range {
                field: "count".to_string(),
                value: u64::from(count),
                width: 14,
            });
        }
        Ok(Self {
            flags,
            reserved: 0,
            opcode,
            count: count as u16,
        })
    }

    /// Total packet length in dwords, header included
    #[inline]
    pub const fn packet_dwords(&self) -> usize {
        self.count as usize + 2
    }

    /// Pack into a header dword
    #[inline]
    pub const fn to_word(&self) -> u32 {
        ((self.flags.predicate as u32) << PREDICATE_SHIFT)
            | (self.flags.shader_type.bit() << SHADER_TYPE_SHIFT)
            | ((self.flags.reset_filter_cam as u32) << RESET_FILTER_CAM_SHIFT)
            | ((self.reserved & RESERVED_MASK) << RESERVED_SHIFT)
            | ((self.opcode as u32 & OPCODE_MASK) << OPCODE_SHIFT)
            | ((self.count as u32 & COUNT_MASK) << COUNT_SHIFT)
            | (PACKET_TYPE_3 << TYPE_SHIFT)
    }

    /// Unpack a header dword, rejecting anything but a type-3 packet
    pub fn from_word(word: u32) -> Result<Self> {
        let packet_type = extract_type(word);
        if packet_type != PACKET_TYPE_3 {
            return Err(Pm4Error::Format { word, packet_type });
        }

        let shader_type = if (word >> SHADER_TYPE_SHIFT) & 1 == 1 {
            ShaderType::Compute
        } else {
            ShaderType::Graphics
        };

        Ok(Self {
            flags: HeaderFlags {
                predicate: (word >> PREDICATE_SHIFT) & 1 == 1,
                shader_type,
                reset_filter_cam: (word >> RESET_FILTER_CAM_SHIFT) & 1 == 1,
            },
            reserved: (word >> RESERVED_SHIFT) & RESERVED_MASK,
            opcode: extract_opcode(word) as u8,
            count: extract_count(word) as u16,
        })
    }
}

// ============================================================================
// Field Extraction Functions
// ============================================================================

/// Extract the opcode (bits 8-15)
#[inline]
pub const fn extract_opcode(word: u32) -> u32 {
    (word >> OPCODE_SHIFT) & OPCODE_MASK
}

/// Extract the count (bits 16-29)
#[inline]
pub const fn extract_count(word: u32) -> u32 {
    (word >> COUNT_SHIFT) & COUNT_MASK
}

/// Extract the packet type (bits 30-31)
#[inline]
pub const fn extract_type(word: u32) -> u32 {
    (word >> TYPE_SHIFT) & TYPE_MASK
}

/// Encode a type-3 header word
pub fn encode_header(opcode: u8, count: u32, flags: HeaderFlags) -> Result<u32> {
    Ok(PacketHeader::with_flags(opcode, count, flags)?.to_word())
}

/// Decode a type-3 header word
pub fn decode_header(word: u32) -> Result<PacketHeader> {
    PacketHeader::from_word(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_header() {
        // RELEASE_MEM (0x49) with count 6
        let word = encode_header(0x49, 6, HeaderFlags::default()).unwrap();
        assert_eq!(word, 0xC006_4900);
    }

    #[test]
    fn test_flag_bits() {
        let flags = HeaderFlags {
            predicate: true,
            shader_type: ShaderType::Compute,
            reset_filter_cam: true,
        };
        let word = encode_header(0x10, 0, flags).unwrap();
        assert_eq!(word & 0x7, 0x7);

        let header = decode_header(word).unwrap();
        assert_eq!(header.flags, flags);
        assert_eq!(header.opcode, 0x10);
        assert_eq!(header.count, 0);
        assert_eq!(header.packet_dwords(), 2);
    }

    #[test]
    fn test_count_limits() {
        assert!(encode_header(0x10, MAX_COUNT, HeaderFlags::default()).is_ok());

        let err = encode_header(0x10, MAX_COUNT + 1, HeaderFlags::default()).unwrap_err();
        assert!(matches!(err, Pm4Error::Range { width: 14, .. }));
    }

    #[test]
    fn test_reject_non_type3() {
        // type 2 filler packet
        let err = decode_header(0x8000_0000).unwrap_err();
        assert_eq!(
            err,
            Pm4Error::Format {
                word: 0x8000_0000,
                packet_type: 2
            }
        );
    }

    #[test]
    fn test_reserved_bits_preserved_on_decode() {
        let word = encode_header(0x58, 6, HeaderFlags::default()).unwrap() | (0x3 << RESERVED_SHIFT);
        let header = decode_header(word).unwrap();
        assert_eq!(header.reserved, 0x3);
        assert_eq!(header.to_word(), word);
    }
}
