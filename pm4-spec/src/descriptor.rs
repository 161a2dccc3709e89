//! # Packet Descriptors
//!
//! The structured form of one packet: opcode, target generation, header
//! flags, named field values and an optional trailing payload. Encode
//! consumes a descriptor; decode produces one.
//!
//! Fields not supplied encode as zero. Supplying any field of an optional
//! ordinal group selects the longer packet form.

use crate::catalog::Catalog;
use crate::error::{Pm4Error, Result};
use crate::generation::Generation;
use crate::header::{HeaderFlags, ShaderType};
use crate::opcode::Opcode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Explicitly chosen layout variants, by name
///
/// One name may select variants in several ordinals (`with_addr` picks the
/// long-form interpretation of every ordinal that declares it).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantSelector(BTreeSet<String>);

impl VariantSelector {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for VariantSelector {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for VariantSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Structured description of one packet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketDescriptor {
    pub opcode: Opcode,
    pub generation: Generation,
    pub flags: HeaderFlags,
    pub variants: VariantSelector,
    pub fields: BTreeMap<String, u64>,
    /// Trailing data dwords (register values, NOP filler, WRITE_DATA data)
    pub payload: Vec<u32>,
}

impl PacketDescriptor {
    /// Empty descriptor: default flags, no fields, no payload
    pub fn new(opcode: Opcode, generation: Generation) -> Self {
        Self {
            opcode,
            generation,
            flags: HeaderFlags::default(),
            variants: VariantSelector::new(),
            fields: BTreeMap::new(),
            payload: Vec::new(),
        }
    }

    /// Set a field value
    pub fn field(mut self, name: impl Into<String>, value: u64) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: u64) {
        self.fields.insert(name.into(), value);
    }

    /// Select a layout variant by name
    pub fn variant(mut self, name: impl Into<String>) -> Self {
        self.variants.insert(name);
        self
    }

    /// Set a 64-bit address through its pair name, split low/high
    pub fn with_address(mut self, pair: &str, address: u64) -> Result<Self> {
        self.set_address(pair, address)?;
        Ok(self)
    }

    pub fn set_address(&mut self, pair: &str, address: u64) -> Result<()> {
        let pair = Catalog::global()
            .address_pair(self.opcode, pair)
            .ok_or_else(|| Pm4Error::UnknownAddress {
                opcode: self.opcode,
                name: pair.to_string(),
            })?;
        self.set_field(pair.lo, address & 0xFFFF_FFFF);
        self.set_field(pair.hi, address >> 32);
        Ok(())
    }

    /// Recombine a split address; `None` when neither half is set
    pub fn address(&self, pair: &str) -> Option<u64> {
        let pair = Catalog::global().address_pair(self.opcode, pair)?;
        let lo = self.get(pair.lo);
        let hi = self.get(pair.hi);
        if lo.is_none() && hi.is_none() {
            return None;
        }
        Some((hi.unwrap_or(0) << 32) | (lo.unwrap_or(0) & 0xFFFF_FFFF))
    }

    pub fn payload(mut self, words: impl Into<Vec<u32>>) -> Self {
        self.payload = words.into();
        self
    }

    pub fn predicate(mut self, predicate: bool) -> Self {
        self.flags.predicate = predicate;
        self
    }

    pub fn shader_type(mut self, shader_type: ShaderType) -> Self {
        self.flags.shader_type = shader_type;
        self
    }

    pub fn reset_filter_cam(mut self, reset: bool) -> Self {
        self.flags.reset_filter_cam = reset;
        self
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.fields.get(name).copied()
    }

    /// Names of the supplied fields
    pub fn present_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The form decode produces for this descriptor's encoding
    ///
    /// Zero-valued fields are dropped, except in ordinals of an active
    /// optional group, where every field of the selected variant is present.
    /// Mode flags read a missing field as zero, so dropping a zero selector
    /// never changes the layout. Fields the layout does not know are kept.
    pub fn canonical(&self) -> Self {
        let mut out = self.clone();
        let Ok(layout) = Catalog::global().packet_layout(self.opcode, self.generation) else {
            return out;
        };
        let (active, _) = layout.resolve_groups(|name| self.fields.contains_key(name));
        let keeps_zero = |name: &str| {
            layout
                .find_field(name)
                .map_or(true, |(ordinal, _, _)| ordinal.group.map_or(false, |g| active.contains(&g)))
        };
        out.fields.retain(|name, value| *value != 0 || keeps_zero(name));

        for ordinal in layout.ordinals.iter().filter(|o| o.group.map_or(false, |g| active.contains(&g))) {
            if let Ok(variant) = layout.select_variant(ordinal, &self.variants, |name| self.get(name)) {
                for spec in variant.named_fields() {
                    out.fields.entry(spec.name.to_string()).or_insert(0);
                }
            }
        }
        out
    }

    /// Encode with the default codec configuration
    pub fn encode(&self) -> Result<Vec<u32>> {
        crate::encoding::encode(self)
    }
}

impl fmt::Display for PacketDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.opcode, self.generation)?;
        for (name, value) in &self.fields {
            write!(f, " {}={:#x}", name, value)?;
        }
        if !self.payload.is_empty() {
            write!(f, " +{} payload dwords", self.payload.len())?;
        }
        Ok(())
    }
}
