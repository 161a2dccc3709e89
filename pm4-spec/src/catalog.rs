//! # Opcode Catalog
//!
//! Resolves the static packet table into per-generation layouts. The
//! catalog is built once, on first use, and is read-only afterwards; any
//! number of threads may share it.
//!
//! Resolution does three things per (opcode, generation):
//! - drops ordinals, fields and sizes that do not exist on the generation
//! - numbers the remaining ordinals from 2 (the header is ordinal 1)
//! - fills every gap between declared fields with a reserved field

use crate::descriptor::VariantSelector;
use crate::error::{FieldError, Pm4Error, Result};
use crate::generation::{Generation, GenerationSet};
use crate::layout::{
    AddressPair, FieldDef, FieldKind, FieldSpec, GroupDef, Layout, LayoutOrdinal, OrdinalDef,
    OrdinalLayout, PacketDef, PayloadDef, SizeDef, VariantDef, VariantLayout,
};
use crate::opcode::Opcode;
use crate::table;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// Every packet layout, keyed by opcode
#[derive(Debug)]
pub struct Catalog {
    entries: BTreeMap<Opcode, CatalogEntry>,
}

impl Catalog {
    /// Process-wide catalog, built on first access
    pub fn global() -> &'static Catalog {
        CATALOG.get_or_init(Catalog::build)
    }

    /// Resolve the packet table
    pub fn build() -> Self {
        let entries: BTreeMap<Opcode, CatalogEntry> = table::packets()
            .map(|def| (def.opcode, CatalogEntry::build(def)))
            .collect();
        debug!(packets = entries.len(), "packet catalog built");
        Self { entries }
    }

    pub fn entry(&self, opcode: Opcode) -> Option<&CatalogEntry> {
        self.entries.get(&opcode)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolved layout for `opcode` on `generation`
    ///
    /// Fails with a capability error when the opcode does not exist on the
    /// generation.
    pub fn packet_layout(&self, opcode: Opcode, generation: Generation) -> Result<&PacketLayout> {
        self.entry(opcode)
            .and_then(|entry| entry.layout(generation))
            .ok_or(Pm4Error::UnsupportedOpcode { opcode, generation })
    }

    /// First field called `name` in any ordinal or variant
    pub fn field_spec(&self, opcode: Opcode, generation: Generation, name: &str) -> Option<&FieldSpec> {
        self.entry(opcode)?
            .layout(generation)?
            .find_field(name)
            .map(|(_, _, spec)| spec)
    }

    pub fn address_pairs(&self, opcode: Opcode) -> &'static [AddressPair] {
        self.entry(opcode)
            .map(CatalogEntry::address_pairs)
            .unwrap_or(&[])
    }

    pub fn address_pair(&self, opcode: Opcode, name: &str) -> Option<&'static AddressPair> {
        self.address_pairs(opcode).iter().find(|p| p.name == name)
    }

    /// Layout with one variant per ordinal, chosen by name or uniqueness
    ///
    /// No field values are consulted. An ordinal with alternatives needs an
    /// explicit selection.
    pub fn lookup_layout(
        &'static self,
        opcode: Opcode,
        generation: Generation,
        selector: Option<&VariantSelector>,
    ) -> Result<Layout> {
        let entry = self
            .entry(opcode)
            .ok_or(Pm4Error::LayoutNotFound { opcode, generation })?;
        let layout = entry
            .layout(generation)
            .ok_or(Pm4Error::LayoutNotFound { opcode, generation })?;

        let empty = VariantSelector::new();
        let selector = selector.unwrap_or(&empty);
        entry.check_selector(selector)?;

        let ordinals = layout
            .ordinals
            .iter()
            .map(|ordinal| {
                let variant = match ordinal.variants.as_slice() {
                    [only] => only,
                    _ => layout
                        .explicit_variant(ordinal, selector)?
                        .ok_or_else(|| layout.selection_error(ordinal))?,
                };
                Ok(LayoutOrdinal {
                    number: ordinal.number,
                    group: ordinal.group,
                    variant,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Layout {
            opcode,
            generation,
            ordinals,
        })
    }

    /// Structural checks over the whole table
    pub fn verify(&self) -> Vec<TableIssue> {
        let mut issues = Vec::new();

        for opcode in Opcode::ALL {
            if self.entry(*opcode).is_none() {
                issues.push(TableIssue::new(*opcode, None, "no packet definition"));
            }
        }
        let defined = table::packets().count();
        if defined != self.entries.len() {
            issues.push(TableIssue::new(
                Opcode::Nop,
                None,
                format!("{} definitions for {} opcodes", defined, self.entries.len()),
            ));
        }

        for entry in self.entries.values() {
            entry.verify(&mut issues);
        }
        issues
    }
}

/// Problem found by [`Catalog::verify`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIssue {
    pub opcode: Opcode,
    pub generation: Option<Generation>,
    pub message: String,
}

impl TableIssue {
    fn new(opcode: Opcode, generation: Option<Generation>, message: impl Into<String>) -> Self {
        Self {
            opcode,
            generation,
            message: message.into(),
        }
    }
}

impl fmt::Display for TableIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.generation {
            Some(generation) => write!(f, "{} ({}): {}", self.opcode, generation, self.message),
            None => write!(f, "{}: {}", self.opcode, self.message),
        }
    }
}

// ============================================================================
// Catalog Entries
// ============================================================================

/// One opcode: its definition and a resolved layout per generation
#[derive(Debug)]
pub struct CatalogEntry {
    def: &'static PacketDef,
    layouts: Vec<PacketLayout>,
    /// Every declared field and the generations it exists on
    fields: BTreeMap<&'static str, GenerationSet>,
    variant_names: BTreeSet<&'static str>,
}

impl CatalogEntry {
    fn build(def: &'static PacketDef) -> Self {
        let layouts = def
            .generations
            .iter()
            .map(|generation| PacketLayout::build(def, generation))
            .collect();

        let mut fields: BTreeMap<&'static str, GenerationSet> = BTreeMap::new();
        let mut variant_names = BTreeSet::new();
        for ordinal in def.ordinals {
            for variant in ordinal.variants {
                if !variant.name.is_empty() {
                    variant_names.insert(variant.name);
                }
                for field in variant.fields {
                    let gens = Generation::ALL
                        .iter()
                        .copied()
                        .filter(|g| {
                            def.generations.contains(*g)
                                && ordinal.generations.contains(*g)
                                && field.generations.contains(*g)
                        })
                        .fold(GenerationSet::EMPTY, |set, g| set.union(g.into()));
                    let known = fields.entry(field.name).or_insert(GenerationSet::EMPTY);
                    *known = known.union(gens);
                }
            }
        }

        Self {
            def,
            layouts,
            fields,
            variant_names,
        }
    }

    pub fn opcode(&self) -> Opcode {
        self.def.opcode
    }

    pub fn definition(&self) -> &'static PacketDef {
        self.def
    }

    pub fn generations(&self) -> GenerationSet {
        self.def.generations
    }

    pub fn layout(&self, generation: Generation) -> Option<&PacketLayout> {
        self.layouts.iter().find(|l| l.generation == generation)
    }

    pub fn layouts(&self) -> &[PacketLayout] {
        &self.layouts
    }

    /// Generations on which a field called `name` exists
    pub fn field_generations(&self, name: &str) -> GenerationSet {
        self.fields.get(name).copied().unwrap_or(GenerationSet::EMPTY)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    pub fn address_pairs(&self) -> &'static [AddressPair] {
        self.def.addresses
    }

    pub fn payload(&self) -> Option<PayloadDef> {
        self.def.payload
    }

    pub fn has_variant(&self, name: &str) -> bool {
        self.variant_names.contains(name)
    }

    /// Reject selector names that no ordinal of this packet declares
    pub fn check_selector(&self, selector: &VariantSelector) -> Result<()> {
        match selector.iter().find(|name| !self.has_variant(name)) {
            Some(name) => Err(Pm4Error::UnknownVariant {
                opcode: self.opcode(),
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn verify(&self, issues: &mut Vec<TableIssue>) {
        let opcode = self.opcode();

        for pair in self.def.addresses {
            for half in [pair.lo, pair.hi] {
                if !self.fields.contains_key(half) {
                    issues.push(TableIssue::new(
                        opcode,
                        None,
                        format!("address pair {} names unknown field {}", pair.name, half),
                    ));
                }
            }
        }

        for group in self.def.groups {
            let members: Vec<&OrdinalDef> = self
                .def
                .ordinals
                .iter()
                .filter(|o| o.group == Some(group.name))
                .collect();
            if members.is_empty() {
                issues.push(TableIssue::new(
                    opcode,
                    None,
                    format!("group {} has no ordinals", group.name),
                ));
            }
            for key in group.keys {
                let found = members
                    .iter()
                    .flat_map(|o| o.variants)
                    .flat_map(|v| v.fields)
                    .any(|f| f.name == *key);
                if !found {
                    issues.push(TableIssue::new(
                        opcode,
                        None,
                        format!("group {} key {} is not one of its fields", group.name, key),
                    ));
                }
            }
        }

        for ordinal in self.def.ordinals {
            if let Some(group) = ordinal.group {
                if !self.def.groups.iter().any(|g| g.name == group) {
                    issues.push(TableIssue::new(opcode, None, format!("undeclared group {}", group)));
                }
            }
        }

        for layout in &self.layouts {
            layout.verify(issues);
        }
    }
}

// ============================================================================
// Per-Generation Layouts
// ============================================================================

/// All ordinals, sizes and groups of one opcode on one generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketLayout {
    pub opcode: Opcode,
    pub generation: Generation,
    pub ordinals: Vec<OrdinalLayout>,
    sizes: Vec<&'static SizeDef>,
    groups: &'static [GroupDef],
    payload: Option<PayloadDef>,
}

impl PacketLayout {
    fn build(def: &'static PacketDef, generation: Generation) -> Self {
        let ordinals = def
            .ordinals
            .iter()
            .filter(|o| o.generations.contains(generation))
            .enumerate()
            .map(|(index, o)| resolve_ordinal(o, index + 2, generation))
            .collect();

        Self {
            opcode: def.opcode,
            generation,
            ordinals,
            sizes: def
                .sizes
                .iter()
                .filter(|s| s.generations.contains(generation))
                .collect(),
            groups: def.groups,
            payload: def.payload,
        }
    }

    pub fn payload(&self) -> Option<PayloadDef> {
        self.payload
    }

    pub fn groups(&self) -> &'static [GroupDef] {
        self.groups
    }

    pub fn sizes(&self) -> impl Iterator<Item = &'static SizeDef> + '_ {
        self.sizes.iter().copied()
    }

    /// Declared fixed lengths, header included
    pub fn declared_sizes(&self) -> Vec<usize> {
        self.sizes.iter().map(|s| s.dwords).collect()
    }

    /// Ordinal, variant and spec of the first field called `name`
    pub fn find_field(&self, name: &str) -> Option<(&OrdinalLayout, &VariantLayout, &FieldSpec)> {
        self.ordinals.iter().find_map(|ordinal| {
            ordinal.variants.iter().find_map(|variant| {
                variant
                    .field(name)
                    .filter(|spec| !spec.is_reserved())
                    .map(|spec| (ordinal, variant, spec))
            })
        })
    }

    /// Whether an ordinal is part of the packet when `active` groups are on
    pub fn is_emitted(ordinal: &OrdinalLayout, active: &[&'static str]) -> bool {
        match ordinal.group {
            None => true,
            Some(group) => active.contains(&group),
        }
    }

    /// Groups switched on by the present fields, plus missing group keys
    ///
    /// A group is active once any field of any of its ordinals is present.
    pub fn resolve_groups<F>(&self, present: F) -> (Vec<&'static str>, Vec<FieldError>)
    where
        F: Fn(&str) -> bool,
    {
        let mut active = Vec::new();
        let mut missing = Vec::new();

        for group in self.groups {
            let touched = self
                .ordinals
                .iter()
                .filter(|o| o.group == Some(group.name))
                .flat_map(|o| &o.variants)
                .flat_map(|v| v.named_fields())
                .any(|spec| present(spec.name.as_ref()));
            if !touched {
                continue;
            }
            active.push(group.name);
            for key in group.keys.iter().copied() {
                if !present(key) {
                    missing.push(FieldError::IncompleteGroup {
                        group: group.name,
                        field: key,
                    });
                }
            }
        }
        (active, missing)
    }

    /// Fixed length for exactly the `active` groups
    pub fn size_for(&self, active: &[&'static str]) -> Option<usize> {
        self.sizes
            .iter()
            .find(|s| s.groups.len() == active.len() && s.groups.iter().all(|g| active.contains(g)))
            .map(|s| s.dwords)
    }

    /// Declared size matching a packet of `words` dwords
    ///
    /// Packets with a trailing payload match any length that leaves room
    /// for the minimum payload.
    pub fn size_for_words(&self, words: usize) -> Option<&'static SizeDef> {
        match self.payload {
            Some(payload) => self
                .sizes
                .iter()
                .copied()
                .filter(|s| s.dwords + payload.min_dwords <= words)
                .max_by_key(|s| s.dwords),
            None => self.sizes.iter().copied().find(|s| s.dwords == words),
        }
    }

    /// Pick the interpretation of one ordinal
    ///
    /// Order: the only variant, an explicitly selected one, the first whose
    /// conditions all hold, the default. `value` looks up fields of earlier
    /// ordinals; a missing field reads as zero.
    pub fn select_variant<'a, F>(
        &'a self,
        ordinal: &'a OrdinalLayout,
        selector: &VariantSelector,
        value: F,
    ) -> Result<&'a VariantLayout>
    where
        F: Fn(&str) -> Option<u64>,
    {
        if let [only] = ordinal.variants.as_slice() {
            return Ok(only);
        }
        if let Some(explicit) = self.explicit_variant(ordinal, selector)? {
            return Ok(explicit);
        }
        let conditional = ordinal.variants.iter().find(|v| {
            !v.when.is_empty() && v.when.iter().all(|c| c.holds(value(c.field)))
        });
        conditional
            .or_else(|| ordinal.variants.iter().find(|v| v.default))
            .ok_or_else(|| self.selection_error(ordinal))
    }

    fn explicit_variant<'a>(
        &self,
        ordinal: &'a OrdinalLayout,
        selector: &VariantSelector,
    ) -> Result<Option<&'a VariantLayout>> {
        let chosen: Vec<&VariantLayout> = ordinal
            .variants
            .iter()
            .filter(|v| selector.contains(v.name))
            .collect();
        match chosen.as_slice() {
            [] => Ok(None),
            [one] => Ok(Some(*one)),
            many => Err(Pm4Error::Selection {
                opcode: self.opcode,
                ordinal: ordinal.number,
                candidates: many.iter().map(|v| v.name).collect(),
            }),
        }
    }

    fn selection_error(&self, ordinal: &OrdinalLayout) -> Pm4Error {
        Pm4Error::Selection {
            opcode: self.opcode,
            ordinal: ordinal.number,
            candidates: ordinal.variants.iter().map(|v| v.name).collect(),
        }
    }

    fn verify(&self, issues: &mut Vec<TableIssue>) {
        let issue = |message: String| TableIssue::new(self.opcode, Some(self.generation), message);

        if self.sizes.is_empty() {
            issues.push(issue("no declared size".to_string()));
        }
        for size in &self.sizes {
            let emitted = self
                .ordinals
                .iter()
                .filter(|o| o.group.map_or(true, |g| size.groups.contains(&g)))
                .count();
            if emitted + 1 != size.dwords {
                issues.push(issue(format!(
                    "size {} declares {} dwords but emits {}",
                    size.dwords,
                    size.dwords,
                    emitted + 1
                )));
            }
            for group in size.groups {
                if !self.groups.iter().any(|g| g.name == *group) {
                    issues.push(issue(format!("size {} names undeclared group {}", size.dwords, group)));
                }
            }
        }

        let mut owners: BTreeMap<&str, usize> = BTreeMap::new();
        for (index, ordinal) in self.ordinals.iter().enumerate() {
            let mut names = BTreeSet::new();
            let defaults = ordinal.variants.iter().filter(|v| v.default).count();
            if defaults > 1 {
                issues.push(issue(format!("ordinal {} has {} defaults", ordinal.number, defaults)));
            }

            for variant in &ordinal.variants {
                if ordinal.has_alternatives() && variant.name.is_empty() {
                    issues.push(issue(format!("ordinal {} has an unnamed variant", ordinal.number)));
                }
                if !names.insert(variant.name) {
                    issues.push(issue(format!(
                        "ordinal {} repeats variant {}",
                        ordinal.number, variant.name
                    )));
                }

                let mut cursor = 0;
                for spec in &variant.fields {
                    if spec.offset != cursor || spec.width == 0 {
                        issues.push(issue(format!(
                            "ordinal {} field {} overlaps bit {}",
                            ordinal.number, spec.name, cursor
                        )));
                    }
                    cursor = spec.offset + spec.width;
                }
                if cursor != 32 {
                    issues.push(issue(format!(
                        "ordinal {} variant {:?} covers {} bits",
                        ordinal.number, variant.name, cursor
                    )));
                }

                for condition in variant.when {
                    let earlier = self.ordinals[..index]
                        .iter()
                        .flat_map(|o| &o.variants)
                        .any(|v| v.field(condition.field).is_some());
                    if !earlier {
                        issues.push(issue(format!(
                            "ordinal {} condition on {} does not refer to an earlier ordinal",
                            ordinal.number, condition.field
                        )));
                    }
                }

                for spec in variant.named_fields() {
                    let owner = owners.entry(spec.name.as_ref()).or_insert(ordinal.number);
                    if *owner != ordinal.number {
                        issues.push(issue(format!(
                            "field {} appears in ordinals {} and {}",
                            spec.name, owner, ordinal.number
                        )));
                    }
                }
            }
        }
    }
}

fn resolve_ordinal(def: &'static OrdinalDef, number: usize, generation: Generation) -> OrdinalLayout {
    OrdinalLayout {
        number,
        group: def.group,
        variants: def
            .variants
            .iter()
            .map(|v| resolve_variant(v, number, generation))
            .collect(),
    }
}

fn resolve_variant(def: &'static VariantDef, number: usize, generation: Generation) -> VariantLayout {
    let mut declared: Vec<&FieldDef> = def
        .fields
        .iter()
        .filter(|f| f.generations.contains(generation))
        .collect();
    declared.sort_by_key(|f| f.offset);

    let mut fields = Vec::with_capacity(declared.len() * 2 + 1);
    let mut cursor = 0u32;
    for field in declared {
        let offset = u32::from(field.offset);
        let width = u32::from(field.width);
        if offset > cursor {
            fields.push(reserved(number, cursor, offset - cursor));
        }
        fields.push(FieldSpec {
            name: Cow::Borrowed(field.name),
            offset,
            width,
            kind: field.kind,
        });
        cursor = cursor.max(offset + width);
    }
    if cursor < 32 {
        fields.push(reserved(number, cursor, 32 - cursor));
    }

    VariantLayout {
        name: def.name,
        when: def.when,
        default: def.default,
        fields,
    }
}

fn reserved(number: usize, offset: u32, width: u32) -> FieldSpec {
    FieldSpec {
        name: Cow::Owned(format!("reserved{}_{}", number, offset)),
        offset,
        width,
        kind: FieldKind::Reserved,
    }
}

/// [`Catalog::lookup_layout`] on the global catalog
pub fn lookup_layout(
    opcode: Opcode,
    generation: Generation,
    selector: Option<&VariantSelector>,
) -> Result<Layout> {
    Catalog::global().lookup_layout(opcode, generation, selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_table_is_consistent() {
        let issues = Catalog::global().verify();
        assert!(
            issues.is_empty(),
            "table issues:\n{}",
            issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
        );
    }

    #[test]
    fn test_every_opcode_has_an_entry() {
        let catalog = Catalog::global();
        assert_eq!(catalog.len(), Opcode::ALL.len());
        for opcode in Opcode::ALL {
            assert!(catalog.entry(*opcode).is_some(), "{}", opcode);
        }
    }

    #[test]
    fn test_reserved_gap_filling() {
        let layout = Catalog::global()
            .packet_layout(Opcode::WaitRegMem64, Generation::Gfx10)
            .unwrap();
        let poll = layout.ordinals[1].variant("mem").unwrap();
        let names: Vec<&str> = poll.fields.iter().map(|f| f.name.as_ref()).collect();
        assert_eq!(names, vec!["reserved3_0", "mem_poll_addr_lo"]);
        assert_eq!(poll.fields[0].width, 3);
        assert!(poll.fields[0].is_reserved());
    }

    #[test]
    fn test_generation_gated_ordinal() {
        let catalog = Catalog::global();
        let gfx9 = catalog.packet_layout(Opcode::AcquireMem, Generation::Gfx9).unwrap();
        let gfx10 = catalog.packet_layout(Opcode::AcquireMem, Generation::Gfx10).unwrap();
        assert_eq!(gfx9.ordinals.len(), 6);
        assert_eq!(gfx10.ordinals.len(), 7);
        assert_eq!(gfx9.declared_sizes(), vec![7]);
        assert_eq!(gfx10.declared_sizes(), vec![8]);

        let entry = catalog.entry(Opcode::AcquireMem).unwrap();
        assert_eq!(entry.field_generations("gcr_cntl"), GenerationSet::GFX10_PLUS);
        assert_eq!(entry.field_generations("coher_cntl"), GenerationSet::ALL);
    }

    #[test]
    fn test_unsupported_generation() {
        let err = Catalog::global()
            .packet_layout(Opcode::PrimeUtcl2, Generation::Gfx10)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capability);
    }

    #[test]
    fn test_lookup_unique_layout() {
        let layout = lookup_layout(Opcode::DrawIndexAuto, Generation::Gfx11, None).unwrap();
        assert_eq!(layout.len(), 2);
        let (ordinal, spec) = layout.field("draw_initiator").unwrap();
        assert_eq!(ordinal, 3);
        assert_eq!(spec.width, 32);
    }

    #[test]
    fn test_lookup_requires_selection() {
        let err = lookup_layout(Opcode::WaitRegMem, Generation::Gfx9, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Selection);

        let selector: VariantSelector = ["mem"].into_iter().collect();
        let layout = lookup_layout(Opcode::WaitRegMem, Generation::Gfx9, Some(&selector)).unwrap();
        let (ordinal, spec) = layout.field("mem_poll_addr_lo").unwrap();
        assert_eq!(ordinal, 3);
        assert_eq!(spec.offset, 2);
    }

    #[test]
    fn test_lookup_not_found() {
        let err = lookup_layout(Opcode::GfxPipeLock, Generation::Gfx9, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_lookup_unknown_variant() {
        let selector: VariantSelector = ["sideways"].into_iter().collect();
        let err = lookup_layout(Opcode::CopyData, Generation::Gfx9, Some(&selector)).unwrap_err();
        assert!(matches!(err, Pm4Error::UnknownVariant { .. }));
    }

    #[test]
    fn test_select_by_condition() {
        let layout = Catalog::global()
            .packet_layout(Opcode::CopyData, Generation::Gfx10)
            .unwrap();
        let selector = VariantSelector::new();
        let src = &layout.ordinals[1];

        let values = |name: &str| match name {
            "src_sel" => Some(2),
            "count_sel" => Some(1),
            _ => None,
        };
        let variant = layout.select_variant(src, &selector, values).unwrap();
        assert_eq!(variant.name, "src_mem64");

        let variant = layout.select_variant(src, &selector, |_| None).unwrap();
        assert_eq!(variant.name, "src_reg");

        let variant = layout
            .select_variant(src, &selector, |n| (n == "src_sel").then_some(5))
            .unwrap();
        assert_eq!(variant.name, "src_imm");
    }

    #[test]
    fn test_group_resolution() {
        let layout = Catalog::global()
            .packet_layout(Opcode::DrawIndex2, Generation::Gfx9)
            .unwrap();

        let (active, missing) = layout.resolve_groups(|name| name == "index_count");
        assert!(active.is_empty());
        assert!(missing.is_empty());
        assert_eq!(layout.size_for(&active), Some(3));

        let (active, missing) = layout.resolve_groups(|name| name == "index_base_lo");
        assert_eq!(active, vec!["draw_with_addr"]);
        assert_eq!(
            missing,
            vec![FieldError::IncompleteGroup {
                group: "draw_with_addr",
                field: "index_base_hi"
            }]
        );
        assert_eq!(layout.size_for(&active), Some(6));
    }

    #[test]
    fn test_size_for_words() {
        let catalog = Catalog::global();
        let draw = catalog.packet_layout(Opcode::DrawIndex2, Generation::Gfx9).unwrap();
        assert_eq!(draw.size_for_words(6).map(|s| s.dwords), Some(6));
        assert!(draw.size_for_words(4).is_none());

        let set = catalog.packet_layout(Opcode::SetShReg, Generation::Gfx9).unwrap();
        assert_eq!(set.size_for_words(5).map(|s| s.dwords), Some(2));
        assert!(set.size_for_words(2).is_none());
    }
}
