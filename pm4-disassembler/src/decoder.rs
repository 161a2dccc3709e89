//! Command-stream walking and packet decoding
//!
//! A stream is a flat run of type-3 packets. Each header's `count` gives
//! the packet length, so the stream is split before any body is decoded.

use crate::error::{DisassemblerError, Result};
use pm4_spec::{
    decode_header, Catalog, Codec, Generation, Opcode, PacketDescriptor, VariantSelector,
};
use tracing::debug;

/// One packet's span within a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPacket<'a> {
    /// Position of the header, in dwords from the start of the stream
    pub offset: usize,
    pub words: &'a [u32],
}

/// Split a stream into packets using the default packet limit
pub fn split_packets(words: &[u32]) -> Result<Vec<RawPacket<'_>>> {
    Decoder::default().split(words)
}

/// Decode every packet of a stream for `generation`
pub fn decode_stream(words: &[u32], generation: Generation) -> Result<Vec<PacketDescriptor>> {
    Decoder::default().decode_stream(words, generation)
}

/// Stream decoder bound to a codec and a set of preferred variants
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    codec: Codec,
    variants: VariantSelector,
}

impl Decoder {
    pub fn new(codec: Codec) -> Self {
        Self {
            codec,
            variants: VariantSelector::new(),
        }
    }

    /// Variants to select wherever a packet defines them
    ///
    /// Names a packet does not define are skipped for that packet, so one
    /// selector can cover a whole stream.
    pub fn with_variants(mut self, variants: VariantSelector) -> Self {
        self.variants = variants;
        self
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Split a stream into packets by header count
    pub fn split<'a>(&self, words: &'a [u32]) -> Result<Vec<RawPacket<'a>>> {
        let limit = self.codec.config().max_packet_dwords as usize;
        let mut packets = Vec::new();
        let mut offset = 0;

        while offset < words.len() {
            let header = decode_header(words[offset])
                .map_err(|source| DisassemblerError::Packet { offset, source })?;
            let dwords = header.packet_dwords();
            if dwords > limit {
                return Err(DisassemblerError::PacketTooLong {
                    offset,
                    dwords,
                    limit,
                });
            }
            let available = words.len() - offset;
            if dwords > available {
                return Err(DisassemblerError::Truncated {
                    offset,
                    needed: dwords,
                    available,
                });
            }
            packets.push(RawPacket {
                offset,
                words: &words[offset..offset + dwords],
            });
            offset += dwords;
        }

        debug!(packets = packets.len(), dwords = words.len(), "split stream");
        Ok(packets)
    }

    /// Decode one packet
    pub fn decode_packet(&self, raw: &RawPacket<'_>, generation: Generation) -> Result<PacketDescriptor> {
        let selector = self.selector_for(raw);
        self.codec
            .decode(raw.words, generation, Some(&selector))
            .map_err(|source| DisassemblerError::Packet {
                offset: raw.offset,
                source,
            })
    }

    pub fn decode_stream(&self, words: &[u32], generation: Generation) -> Result<Vec<PacketDescriptor>> {
        self.split(words)?
            .iter()
            .map(|raw| self.decode_packet(raw, generation))
            .collect()
    }

    /// The preferred variants this packet's opcode actually defines
    fn selector_for(&self, raw: &RawPacket<'_>) -> VariantSelector {
        if self.variants.is_empty() {
            return VariantSelector::new();
        }
        let entry = raw
            .words
            .first()
            .and_then(|&word| decode_header(word).ok())
            .and_then(|header| Opcode::from_u8(header.opcode))
            .and_then(|opcode| Catalog::global().entry(opcode));
        match entry {
            Some(entry) => self.variants.iter().filter(|v| entry.has_variant(v)).collect(),
            None => VariantSelector::new(),
        }
    }
}
