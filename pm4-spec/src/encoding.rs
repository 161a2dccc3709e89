//! # Packet Encode/Decode Engine
//!
//! Turns a [`PacketDescriptor`] into a word sequence and back.
//!
//! ```text
//! encode: descriptor -> layout -> size -> validate -> pack ordinals -> header
//! decode: header -> opcode -> layout -> size -> unpack ordinals -> descriptor
//! ```
//!
//! Both directions are all-or-nothing. The generation is never read from
//! the wire; the caller always names it.

use crate::catalog::{Catalog, PacketLayout};
use crate::config::CodecConfig;
use crate::descriptor::{PacketDescriptor, VariantSelector};
use crate::error::{FieldError, Pm4Error, Result};
use crate::generation::Generation;
use crate::header::{decode_header, encode_header, MAX_PACKET_DWORDS};
use crate::opcode::Opcode;
use crate::validation::{self, ValidationResult};
use tracing::{debug, trace, warn};

/// Encoder/decoder bound to a configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn validate(&self, desc: &PacketDescriptor) -> Result<ValidationResult> {
        validation::validate_with(desc, &self.config)
    }

    /// Encode one packet
    pub fn encode(&self, desc: &PacketDescriptor) -> Result<Vec<u32>> {
        let mut words = Vec::new();
        self.encode_into(desc, &mut words)?;
        Ok(words)
    }

    /// Append one encoded packet to `out`, returning its length in dwords
    ///
    /// `out` is untouched when encoding fails.
    pub fn encode_into(&self, desc: &PacketDescriptor, out: &mut Vec<u32>) -> Result<usize> {
        let plan = validation::plan(Catalog::global(), desc, &self.config)?;
        for warning in &plan.result.warnings {
            warn!(opcode = %desc.opcode, "{}", warning);
        }
        if !plan.result.is_valid() {
            return Err(Pm4Error::Invalid {
                opcode: desc.opcode,
                errors: plan.result.errors,
            });
        }

        let total = plan.size + desc.payload.len();
        let limit = self.config.max_packet_dwords.min(MAX_PACKET_DWORDS) as usize;
        if total > limit || total < 2 {
            return Err(Pm4Error::Range {
                field: "count".to_string(),
                value: total.saturating_sub(2) as u64,
                width: 14,
            });
        }
        let header = encode_header(desc.opcode.to_u8(), (total - 2) as u32, desc.flags)?;

        out.reserve(total);
        out.push(header);
        for (ordinal, variant) in &plan.ordinals {
            let word = variant
                .named_fields()
                .fold(0u32, |word, spec| word | spec.pack(desc.get(&spec.name).unwrap_or(0)));
            trace!(
                ordinal = ordinal.number,
                variant = variant.name,
                word = format_args!("{:#010x}", word),
                "packed ordinal"
            );
            out.push(word);
        }
        out.extend_from_slice(&desc.payload);

        debug!(
            opcode = %desc.opcode,
            generation = %desc.generation,
            dwords = total,
            "encoded packet"
        );
        Ok(total)
    }

    /// Decode one packet occupying exactly `words`
    ///
    /// `selector` chooses between layout variants that neither a mode flag
    /// nor a default resolves; it is carried into the result unchanged.
    /// The result is in canonical form (see [`PacketDescriptor::canonical`]).
    pub fn decode(
        &self,
        words: &[u32],
        generation: Generation,
        selector: Option<&VariantSelector>,
    ) -> Result<PacketDescriptor> {
        let first = *words.first().ok_or(Pm4Error::Truncated {
            needed: 1,
            available: 0,
        })?;
        let header = decode_header(first)?;
        if header.reserved != 0 {
            if self.config.is_strict() {
                return Err(Pm4Error::ReservedHeaderBits(header.reserved));
            }
            warn!(reserved = header.reserved, "ignoring reserved header bits");
        }

        let opcode = Opcode::from_u8(header.opcode).ok_or(Pm4Error::UnknownOpcode(header.opcode))?;
        let entry = Catalog::global()
            .entry(opcode)
            .ok_or(Pm4Error::UnsupportedOpcode { opcode, generation })?;
        let layout = entry
            .layout(generation)
            .ok_or(Pm4Error::UnsupportedOpcode { opcode, generation })?;

        let selector = selector.cloned().unwrap_or_default();
        entry.check_selector(&selector)?;

        let expected = header.packet_dwords();
        if words.len() < expected {
            return Err(Pm4Error::Truncated {
                needed: expected,
                available: words.len(),
            });
        }
        if words.len() > expected {
            return Err(Pm4Error::LengthMismatch {
                opcode,
                generation,
                found: words.len(),
                expected: vec![expected],
            });
        }
        let size = layout
            .size_for_words(words.len())
            .ok_or_else(|| Pm4Error::LengthMismatch {
                opcode,
                generation,
                found: words.len(),
                expected: layout.declared_sizes(),
            })?;

        let mut desc = PacketDescriptor::new(opcode, generation);
        desc.flags = header.flags;
        desc.variants = selector;

        let mut errors = Vec::new();
        let mut body = words.iter().skip(1).copied();
        let emitted = layout
            .ordinals
            .iter()
            .filter(|o| PacketLayout::is_emitted(o, size.groups));
        for ordinal in emitted {
            let word = body.next().ok_or(Pm4Error::Truncated {
                needed: size.dwords,
                available: words.len(),
            })?;
            let variant = layout.select_variant(ordinal, &desc.variants, |name| desc.get(name))?;

            // zeros outside optional groups read back as absent; group
            // fields stay so the long form survives a re-encode
            let keep_zero = ordinal.group.is_some();
            for spec in &variant.fields {
                let value = spec.unpack(word);
                if !spec.is_reserved() {
                    if value != 0 || keep_zero {
                        desc.fields.insert(spec.name.to_string(), value);
                    }
                } else if value != 0 {
                    if self.config.is_strict() {
                        errors.push(FieldError::ReservedBits {
                            field: spec.name.to_string(),
                            value,
                        });
                    } else {
                        warn!(
                            opcode = %opcode,
                            field = %spec.name,
                            value,
                            "dropping non-zero reserved bits"
                        );
                    }
                }
            }
        }
        if !errors.is_empty() {
            return Err(Pm4Error::Invalid { opcode, errors });
        }

        desc.payload = body.collect();
        debug!(
            opcode = %opcode,
            generation = %generation,
            dwords = words.len(),
            "decoded packet"
        );
        Ok(desc)
    }
}

/// Encode with the default configuration
pub fn encode(desc: &PacketDescriptor) -> Result<Vec<u32>> {
    Codec::default().encode(desc)
}

/// Decode with the default configuration and no explicit variants
pub fn decode(words: &[u32], generation: Generation) -> Result<PacketDescriptor> {
    Codec::default().decode(words, generation, None)
}

/// Decode with the default configuration and explicit variants
pub fn decode_with(
    words: &[u32],
    generation: Generation,
    selector: &VariantSelector,
) -> Result<PacketDescriptor> {
    Codec::default().decode(words, generation, Some(selector))
}
