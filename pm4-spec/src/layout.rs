//! # Field Layout Definitions
//!
//! Declarative description of a packet body. A packet is a list of 32-bit
//! ordinals following the header; each ordinal has one or more *variants*
//! (mutually exclusive interpretations of the same bits), and each variant
//! is a list of fields.
//!
//! Definitions are `'static` data in [`crate::table`]. Gaps between
//! declared fields are filled with reserved fields when the catalog is
//! built, so a resolved variant always covers all 32 bits.

use crate::generation::{Generation, GenerationSet};
use crate::opcode::Opcode;
use std::borrow::Cow;
use std::fmt;

// ============================================================================
// Enumerations
// ============================================================================

/// One named value of an enumerated field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumMember {
    pub name: &'static str,
    pub value: u32,
    pub generations: GenerationSet,
}

/// Closed value set of an enumerated field
#[derive(Debug, PartialEq, Eq)]
pub struct EnumDef {
    pub name: &'static str,
    pub members: &'static [EnumMember],
}

impl EnumDef {
    /// Member with `value` that is defined on `generation`
    pub fn member(&self, value: u64, generation: Generation) -> Option<&EnumMember> {
        self.members
            .iter()
            .find(|m| u64::from(m.value) == value && m.generations.contains(generation))
    }

    /// Any member with `value`, regardless of generation
    pub fn any_member(&self, value: u64) -> Option<&EnumMember> {
        self.members.iter().find(|m| u64::from(m.value) == value)
    }

    /// Value of the member called `name` on `generation`
    pub fn value_of(&self, name: &str, generation: Generation) -> Option<u32> {
        self.members
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name) && m.generations.contains(generation))
            .map(|m| m.value)
    }
}

/// Enumerator available on every generation
pub const fn member(name: &'static str, value: u32) -> EnumMember {
    EnumMember {
        name,
        value,
        generations: GenerationSet::ALL,
    }
}

/// Enumerator restricted to some generations
pub const fn member_on(name: &'static str, value: u32, generations: GenerationSet) -> EnumMember {
    EnumMember {
        name,
        value,
        generations,
    }
}

// ============================================================================
// Fields
// ============================================================================

/// How a field's value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Raw unsigned integer
    Uint,
    /// Selector with a closed value set
    Enum(&'static EnumDef),
    /// Low half of a byte address. The caller supplies the unshifted
    /// address; bits below `offset` must be zero.
    Address,
    /// Must encode as zero
    Reserved,
}

impl FieldKind {
    pub const fn is_reserved(&self) -> bool {
        matches!(self, FieldKind::Reserved)
    }
}

/// Field as declared in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub offset: u8,
    pub width: u8,
    pub kind: FieldKind,
    pub generations: GenerationSet,
}

impl FieldDef {
    /// Restrict the field to `generations`
    pub const fn only(self, generations: GenerationSet) -> Self {
        Self {
            generations,
            ..self
        }
    }
}

/// Unsigned field
pub const fn f(name: &'static str, offset: u8, width: u8) -> FieldDef {
    FieldDef {
        name,
        offset,
        width,
        kind: FieldKind::Uint,
        generations: GenerationSet::ALL,
    }
}

/// Full 32-bit unsigned field
pub const fn dword(name: &'static str) -> FieldDef {
    f(name, 0, 32)
}

/// Enumerated field
pub const fn e(name: &'static str, offset: u8, width: u8, def: &'static EnumDef) -> FieldDef {
    FieldDef {
        name,
        offset,
        width,
        kind: FieldKind::Enum(def),
        generations: GenerationSet::ALL,
    }
}

/// Address low half aligned to `1 << align` bytes
pub const fn addr(name: &'static str, align: u8) -> FieldDef {
    FieldDef {
        name,
        offset: align,
        width: 32 - align,
        kind: FieldKind::Address,
        generations: GenerationSet::ALL,
    }
}

// ============================================================================
// Ordinals and Variants
// ============================================================================

/// Mode-flag condition: `field` (from an earlier ordinal) holds one of `values`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub field: &'static str,
    pub values: &'static [u32],
}

impl Condition {
    /// A missing field counts as zero
    pub fn holds(&self, value: Option<u64>) -> bool {
        let value = value.unwrap_or(0);
        self.values.iter().any(|v| u64::from(*v) == value)
    }
}

/// One interpretation of an ordinal. All conditions must hold.
#[derive(Debug, PartialEq, Eq)]
pub struct VariantDef {
    /// Empty for ordinals with a single interpretation
    pub name: &'static str,
    pub when: &'static [Condition],
    pub default: bool,
    pub fields: &'static [FieldDef],
}

#[derive(Debug, PartialEq, Eq)]
pub struct OrdinalDef {
    pub generations: GenerationSet,
    /// Optional group this ordinal belongs to; `None` means always emitted
    pub group: Option<&'static str>,
    pub variants: &'static [VariantDef],
}

/// Optional group of ordinals, emitted only when the caller supplies one of
/// its fields. Every key field must then be supplied.
#[derive(Debug, PartialEq, Eq)]
pub struct GroupDef {
    pub name: &'static str,
    pub keys: &'static [&'static str],
}

/// Declared packet length (header included) for a set of active groups
#[derive(Debug, PartialEq, Eq)]
pub struct SizeDef {
    pub dwords: usize,
    pub generations: GenerationSet,
    pub groups: &'static [&'static str],
}

/// 64-bit address split across two fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressPair {
    pub name: &'static str,
    pub lo: &'static str,
    pub hi: &'static str,
}

/// Variable-length data following the fixed layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadDef {
    pub name: &'static str,
    pub min_dwords: usize,
}

/// Complete packet definition
#[derive(Debug, PartialEq, Eq)]
pub struct PacketDef {
    pub opcode: Opcode,
    pub generations: GenerationSet,
    pub ordinals: &'static [OrdinalDef],
    pub groups: &'static [GroupDef],
    pub sizes: &'static [SizeDef],
    pub addresses: &'static [AddressPair],
    pub payload: Option<PayloadDef>,
}

// ============================================================================
// Resolved Layouts
// ============================================================================

/// Field placed in a resolved ordinal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: Cow<'static, str>,
    pub offset: u32,
    pub width: u32,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Mask of the field's bits, in place
    #[inline]
    pub fn mask(&self) -> u32 {
        field_mask(self.width) << self.offset
    }

    /// Largest value the field accepts
    #[inline]
    pub fn max_value(&self) -> u64 {
        match self.kind {
            FieldKind::Address => u64::from(self.mask()),
            _ => u64::from(field_mask(self.width)),
        }
    }

    /// Place `value` into its bit range
    #[inline]
    pub fn pack(&self, value: u64) -> u32 {
        match self.kind {
            FieldKind::Address => (value as u32) & self.mask(),
            _ => ((value as u32) & field_mask(self.width)) << self.offset,
        }
    }

    /// Read the field out of `word`
    #[inline]
    pub fn unpack(&self, word: u32) -> u64 {
        match self.kind {
            FieldKind::Address => u64::from(word & self.mask()),
            _ => u64::from((word >> self.offset) & field_mask(self.width)),
        }
    }

    pub fn is_reserved(&self) -> bool {
        self.kind.is_reserved()
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hi = self.offset + self.width - 1;
        if self.width == 1 {
            write!(f, "[{}] {}", self.offset, self.name)?;
        } else {
            write!(f, "[{}:{}] {}", hi, self.offset, self.name)?;
        }
        match self.kind {
            FieldKind::Enum(def) => write!(f, " ({})", def.name),
            FieldKind::Address => write!(f, " (address, {}-byte aligned)", 1u64 << self.offset),
            FieldKind::Uint | FieldKind::Reserved => Ok(()),
        }
    }
}

/// All-ones mask `width` bits wide
#[inline]
pub const fn field_mask(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

/// Resolved interpretation of one ordinal for one generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantLayout {
    pub name: &'static str,
    pub when: &'static [Condition],
    pub default: bool,
    /// Sorted by offset, covering bits 0-31
    pub fields: Vec<FieldSpec>,
}

impl VariantLayout {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Non-reserved fields
    pub fn named_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| !f.is_reserved())
    }
}

/// Resolved ordinal with every variant available on the generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdinalLayout {
    /// Position in the packet; the header is ordinal 1
    pub number: usize,
    pub group: Option<&'static str>,
    pub variants: Vec<VariantLayout>,
}

impl OrdinalLayout {
    pub fn has_alternatives(&self) -> bool {
        self.variants.len() > 1
    }

    pub fn variant(&self, name: &str) -> Option<&VariantLayout> {
        self.variants.iter().find(|v| v.name == name)
    }
}

/// Layout returned by a lookup: one chosen variant per ordinal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub opcode: Opcode,
    pub generation: Generation,
    pub ordinals: Vec<LayoutOrdinal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOrdinal {
    pub number: usize,
    pub group: Option<&'static str>,
    pub variant: &'static VariantLayout,
}

impl Layout {
    /// Find a field by name in any ordinal
    pub fn field(&self, name: &str) -> Option<(usize, &FieldSpec)> {
        self.ordinals
            .iter()
            .find_map(|o| o.variant.field(name).map(|spec| (o.number, spec)))
    }

    /// Number of body ordinals, optional groups included
    pub fn len(&self) -> usize {
        self.ordinals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static CACHE_POLICY: EnumDef = EnumDef {
        name: "cache_policy",
        members: &[
            member("lru", 0),
            member("stream", 1),
            member_on("noa", 2, GenerationSet::GFX10_PLUS),
            member_on("bypass", 3, GenerationSet::GFX10_PLUS),
        ],
    };

    #[test]
    fn test_enum_lookup() {
        assert_eq!(CACHE_POLICY.value_of("stream", Generation::Gfx9), Some(1));
        assert_eq!(CACHE_POLICY.value_of("BYPASS", Generation::Gfx11), Some(3));
        assert_eq!(CACHE_POLICY.value_of("bypass", Generation::Gfx9), None);
        assert!(CACHE_POLICY.member(2, Generation::Gfx9).is_none());
        assert_eq!(CACHE_POLICY.any_member(2).map(|m| m.name), Some("noa"));
    }

    #[test]
    fn test_pack_unpack_uint() {
        let spec = FieldSpec {
            name: Cow::Borrowed("count"),
            offset: 16,
            width: 14,
            kind: FieldKind::Uint,
        };
        assert_eq!(spec.mask(), 0x3FFF_0000);
        assert_eq!(spec.pack(0x3FFF), 0x3FFF_0000);
        assert_eq!(spec.unpack(0xFFFF_FFFF), 0x3FFF);
        assert_eq!(spec.max_value(), 0x3FFF);
    }

    #[test]
    fn test_pack_unpack_address() {
        let def = addr("addr_lo", 3);
        assert_eq!((def.offset, def.width), (3, 29));

        let spec = FieldSpec {
            name: Cow::Borrowed(def.name),
            offset: u32::from(def.offset),
            width: u32::from(def.width),
            kind: def.kind,
        };
        assert_eq!(spec.pack(0xDEAD_BEE8), 0xDEAD_BEE8);
        assert_eq!(spec.unpack(0xDEAD_BEEF), 0xDEAD_BEE8);
        assert_eq!(spec.max_value(), 0xFFFF_FFF8);
    }

    #[test]
    fn test_condition_missing_is_zero() {
        let cond = Condition {
            field: "mem_space",
            values: &[0],
        };
        assert!(cond.holds(None));
        assert!(cond.holds(Some(0)));
        assert!(!cond.holds(Some(1)));
    }

    #[test]
    fn test_field_display() {
        let spec = FieldSpec {
            name: Cow::Borrowed("engine_sel"),
            offset: 31,
            width: 1,
            kind: FieldKind::Uint,
        };
        assert_eq!(spec.to_string(), "[31] engine_sel");
    }
}
