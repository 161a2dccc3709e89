//! # Packet Layout Table
//!
//! Static, per-opcode layout definitions. Fields are declared at their bit
//! offsets; gaps become reserved fields when the catalog is built, so the
//! definitions below only list meaningful bits.
//!
//! Generation qualifiers: an unqualified field or ordinal applies to every
//! generation the packet supports. `.only(..)` and `gfx:` narrow it.

use crate::layout::{EnumDef, PacketDef};

/// Ordinal with a single interpretation
macro_rules! ord {
    (gfx: $gens:ident; $($field:expr),* $(,)?) => {
        ord!(@build $crate::generation::GenerationSet::$gens, None; $($field),*)
    };
    (group: $group:literal; $($field:expr),* $(,)?) => {
        ord!(@build $crate::generation::GenerationSet::ALL, Some($group); $($field),*)
    };
    (@build $gens:expr, $group:expr; $($field:expr),*) => {
        $crate::layout::OrdinalDef {
            generations: $gens,
            group: $group,
            variants: &[$crate::layout::VariantDef {
                name: "",
                when: &[],
                default: false,
                fields: &[$($field),*],
            }],
        }
    };
    ($($field:expr),* $(,)?) => {
        ord!(@build $crate::generation::GenerationSet::ALL, None; $($field),*)
    };
}

/// Ordinal with alternative interpretations
macro_rules! alt {
    (group: $group:literal; $($variant:expr),+ $(,)?) => {
        $crate::layout::OrdinalDef {
            generations: $crate::generation::GenerationSet::ALL,
            group: Some($group),
            variants: &[$($variant),+],
        }
    };
    ($($variant:expr),+ $(,)?) => {
        $crate::layout::OrdinalDef {
            generations: $crate::generation::GenerationSet::ALL,
            group: None,
            variants: &[$($variant),+],
        }
    };
}

/// One interpretation of an ordinal
macro_rules! var {
    (default $name:literal; $($field:expr),* $(,)?) => {
        $crate::layout::VariantDef {
            name: $name,
            when: &[],
            default: true,
            fields: &[$($field),*],
        }
    };
    ($name:literal when [$($cond:literal in [$($value:literal),+]),+]; $($field:expr),* $(,)?) => {
        $crate::layout::VariantDef {
            name: $name,
            when: &[$($crate::layout::Condition {
                field: $cond,
                values: &[$($value),+],
            }),+],
            default: false,
            fields: &[$($field),*],
        }
    };
    ($name:literal; $($field:expr),* $(,)?) => {
        $crate::layout::VariantDef {
            name: $name,
            when: &[],
            default: false,
            fields: &[$($field),*],
        }
    };
}

/// Declared packet length, header included
macro_rules! size {
    ($dwords:literal, gfx: $gens:ident) => {
        $crate::layout::SizeDef {
            dwords: $dwords,
            generations: $crate::generation::GenerationSet::$gens,
            groups: &[],
        }
    };
    ($dwords:literal, groups: [$($group:literal),+]) => {
        $crate::layout::SizeDef {
            dwords: $dwords,
            generations: $crate::generation::GenerationSet::ALL,
            groups: &[$($group),+],
        }
    };
    ($dwords:literal) => {
        $crate::layout::SizeDef {
            dwords: $dwords,
            generations: $crate::generation::GenerationSet::ALL,
            groups: &[],
        }
    };
}

/// Optional ordinal group and the fields that must accompany it
macro_rules! group {
    ($name:literal) => {
        $crate::layout::GroupDef { name: $name, keys: &[] }
    };
    ($name:literal, keys: [$($key:literal),+]) => {
        $crate::layout::GroupDef {
            name: $name,
            keys: &[$($key),+],
        }
    };
}

/// 64-bit address split over two fields
macro_rules! pair {
    ($name:literal, $lo:literal, $hi:literal) => {
        $crate::layout::AddressPair {
            name: $name,
            lo: $lo,
            hi: $hi,
        }
    };
}

/// Complete packet definition
macro_rules! packet {
    (@payload) => { None };
    (@payload $name:literal, $min:literal) => {
        Some($crate::layout::PayloadDef {
            name: $name,
            min_dwords: $min,
        })
    };
    (
        $opcode:ident, $gens:ident,
        sizes: [$($size:expr),+ $(,)?],
        $(groups: [$($group:expr),+ $(,)?],)?
        $(addresses: [$($pair:expr),+ $(,)?],)?
        $(payload: ($($payload:tt)+),)?
        ordinals: [$($ordinal:expr),* $(,)?] $(,)?
    ) => {
        $crate::layout::PacketDef {
            opcode: $crate::opcode::Opcode::$opcode,
            generations: $crate::generation::GenerationSet::$gens,
            ordinals: &[$($ordinal),*],
            groups: &[$($($group),+)?],
            sizes: &[$($size),+],
            addresses: &[$($($pair),+)?],
            payload: packet!(@payload $($($payload)+)?),
        }
    };
}

mod control;
mod dispatch;
mod draw;
mod memory;
mod register;
mod sync;

use crate::generation::GenerationSet;
use crate::layout::{member, member_on};

// ============================================================================
// Shared Enumerations
// ============================================================================

/// Cache policy selector used by most memory-touching packets
pub(crate) static CACHE_POLICY: EnumDef = EnumDef {
    name: "cache_policy",
    members: &[
        member("lru", 0),
        member("stream", 1),
        member_on("noa", 2, GenerationSet::GFX10_PLUS),
        member_on("bypass", 3, GenerationSet::GFX10_PLUS),
    ],
};

pub(crate) static MICRO_ENGINE: EnumDef = EnumDef {
    name: "engine_sel",
    members: &[member("micro_engine", 0)],
};

/// Compare function for polling and conditional packets
pub(crate) static COMPARE_FUNCTION: EnumDef = EnumDef {
    name: "function",
    members: &[
        member("always_pass", 0),
        member("less_than_ref_value", 1),
        member("less_than_equal_to_the_ref_value", 2),
        member("equal_to_the_reference_value", 3),
        member("not_equal_reference_value", 4),
        member("greater_than_or_equal_reference_value", 5),
        member("greater_than_reference_value", 6),
    ],
};

/// Every packet definition in the table
pub fn packets() -> impl Iterator<Item = &'static PacketDef> {
    control::PACKETS
        .iter()
        .chain(dispatch::PACKETS)
        .chain(draw::PACKETS)
        .chain(memory::PACKETS)
        .chain(register::PACKETS)
        .chain(sync::PACKETS)
        .copied()
}
