//! # Size Resolver
//!
//! Maps the set of supplied field names onto one declared packet length.
//! Optional ordinal groups are switched on by the caller supplying any of
//! their fields; the active group set must match a declared size exactly.
//!
//! Sizes are fixed lengths, header included. Packets with a trailing
//! payload add one dword per payload word on top.

use crate::catalog::{Catalog, PacketLayout};
use crate::descriptor::PacketDescriptor;
use crate::error::{Pm4Error, Result};
use crate::generation::Generation;
use crate::opcode::Opcode;
use std::collections::BTreeSet;

/// Fixed packet length for `opcode` on `generation` given the present fields
pub fn resolve_size<'a, I>(opcode: Opcode, generation: Generation, present: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let layout = Catalog::global().packet_layout(opcode, generation)?;
    let present: BTreeSet<&str> = present.into_iter().collect();

    let (active, missing) = layout.resolve_groups(|name| present.contains(name));
    if let Some(first) = missing.first() {
        return Err(Pm4Error::AmbiguousLength {
            opcode,
            reason: first.to_string(),
        });
    }
    layout
        .size_for(&active)
        .ok_or_else(|| no_declared_length(layout, &active))
}

/// Total encoded length of a descriptor, payload included
pub fn packet_size(desc: &PacketDescriptor) -> Result<usize> {
    let fixed = resolve_size(desc.opcode, desc.generation, desc.present_fields())?;
    Ok(fixed + desc.payload.len())
}

pub(crate) fn no_declared_length(layout: &PacketLayout, active: &[&'static str]) -> Pm4Error {
    let reason = if active.is_empty() {
        format!("no declared length without optional groups on {}", layout.generation)
    } else {
        format!(
            "no declared length for optional groups [{}] on {}",
            active.join(", "),
            layout.generation
        )
    };
    Pm4Error::AmbiguousLength {
        opcode: layout.opcode,
        reason,
    }
}
