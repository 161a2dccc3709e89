//! Packet formatting in the assembler's syntax
//!
//! Fields are printed in ordinal order. Zero-valued fields are left out
//! except inside an active optional group, where dropping them would shrink
//! the re-assembled packet. Enumerated values print as member names when
//! the generation defines one.

use pm4_spec::layout::FieldKind;
use pm4_spec::{Catalog, FieldSpec, Generation, PacketDescriptor, ShaderType};
use std::collections::BTreeSet;

/// Format a packet as one assembler line
pub fn format(desc: &PacketDescriptor) -> String {
    let mut parts = vec![desc.opcode.name().to_string()];
    parts.extend(desc.variants.iter().map(|v| format!("@{}", v)));

    if desc.flags.predicate {
        parts.push("+predicate".to_string());
    }
    if desc.flags.shader_type == ShaderType::Compute {
        parts.push("+compute".to_string());
    }
    if desc.flags.reset_filter_cam {
        parts.push("+reset_filter_cam".to_string());
    }

    parts.extend(format_fields(desc));

    if !desc.payload.is_empty() {
        let words: Vec<String> = desc.payload.iter().map(|w| format!("{:#x}", w)).collect();
        parts.push(format!("data=[{}]", words.join(", ")));
    }
    parts.join(" ")
}

/// Space-separated hex dump of raw packet words
pub fn format_words(words: &[u32]) -> String {
    words
        .iter()
        .map(|w| format!("{:08x}", w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render one field value, using the member name for enumerations
pub fn format_value(spec: &FieldSpec, value: u64, generation: Generation) -> String {
    match spec.kind {
        FieldKind::Enum(def) => def
            .member(value, generation)
            .map(|m| m.name.to_string())
            .unwrap_or_else(|| format!("{:#x}", value)),
        _ => format!("{:#x}", value),
    }
}

fn format_fields(desc: &PacketDescriptor) -> Vec<String> {
    let layout = match Catalog::global().packet_layout(desc.opcode, desc.generation) {
        Ok(layout) => layout,
        Err(_) => {
            return desc
                .fields
                .iter()
                .filter(|(_, value)| **value != 0)
                .map(|(name, value)| format!("{}={:#x}", name, value))
                .collect()
        }
    };
    let (active, _) = layout.resolve_groups(|name| desc.fields.contains_key(name));

    let mut printed: BTreeSet<&str> = BTreeSet::new();
    let mut parts = Vec::new();
    for ordinal in &layout.ordinals {
        let keep_zero = ordinal.group.map_or(false, |g| active.contains(&g));
        for spec in ordinal.variants.iter().flat_map(|v| v.named_fields()) {
            let Some(value) = desc.get(&spec.name) else {
                continue;
            };
            if !printed.insert(spec.name.as_ref()) || (value == 0 && !keep_zero) {
                continue;
            }
            parts.push(format!(
                "{}={}",
                spec.name,
                format_value(spec, value, desc.generation)
            ));
        }
    }

    // fields the layout does not know; encoding will report them
    for (name, value) in &desc.fields {
        if !printed.contains(name.as_str()) && layout.find_field(name).is_none() {
            parts.push(format!("{}={:#x}", name, value));
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm4_spec::{Generation, Opcode};

    #[test]
    fn test_format_simple() {
        let desc = PacketDescriptor::new(Opcode::DrawIndexAuto, Generation::Gfx10)
            .field("index_count", 3)
            .field("draw_initiator", 0);
        assert_eq!(format(&desc), "DRAW_INDEX_AUTO index_count=0x3");
    }

    #[test]
    fn test_format_flags_and_variants() {
        let desc = PacketDescriptor::new(Opcode::DispatchDirect, Generation::Gfx10)
            .predicate(true)
            .shader_type(ShaderType::Compute)
            .field("dim_x", 8);
        assert_eq!(format(&desc), "DISPATCH_DIRECT +predicate +compute dim_x=0x8");

        let desc = PacketDescriptor::new(Opcode::DrawIndexIndirectMulti, Generation::Gfx10)
            .variant("with_addr");
        assert_eq!(format(&desc), "DRAW_INDEX_INDIRECT_MULTI @with_addr");
    }

    #[test]
    fn test_format_enum_names() {
        let desc = PacketDescriptor::new(Opcode::WaitRegMem, Generation::Gfx10)
            .field("function", 3)
            .field("mem_space", 1);
        assert_eq!(
            format(&desc),
            "WAIT_REG_MEM function=equal_to_the_reference_value mem_space=memory_space"
        );

        // no member name on this generation
        let desc = PacketDescriptor::new(Opcode::ReleaseMem, Generation::Gfx10).field("dst_sel", 2);
        assert_eq!(format(&desc), "RELEASE_MEM dst_sel=0x2");
    }

    #[test]
    fn test_format_keeps_active_group() {
        let desc = PacketDescriptor::new(Opcode::DrawIndex2, Generation::Gfx10)
            .field("max_size", 0)
            .field("index_base_lo", 0)
            .field("index_base_hi", 0)
            .field("index_count", 0);
        assert_eq!(
            format(&desc),
            "DRAW_INDEX_2 max_size=0x0 index_base_lo=0x0 index_base_hi=0x0"
        );
    }

    #[test]
    fn test_format_payload() {
        let desc = PacketDescriptor::new(Opcode::SetShReg, Generation::Gfx10)
            .field("reg_offset", 0x2C)
            .payload(vec![0x11, 0x22]);
        assert_eq!(format(&desc), "SET_SH_REG reg_offset=0x2c data=[0x11, 0x22]");
    }

    #[test]
    fn test_format_words() {
        assert_eq!(format_words(&[0xC001_2D00, 3]), "c0012d00 00000003");
    }
}
