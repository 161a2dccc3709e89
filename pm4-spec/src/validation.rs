//! Descriptor validation
//!
//! Checks a [`PacketDescriptor`] against the layout it resolves to before
//! anything is packed:
//! - values must fit their field's width
//! - enumerated fields must name a member available on the generation
//! - reserved ranges and address alignment bits must be zero
//! - fields from other generations are rejected (or ignored, by policy)
//! - optional groups must be complete, payloads long enough
//!
//! Problems that prevent resolving a layout at all (unsupported opcode,
//! unknown variant name, no matching length, unresolvable variant) are
//! returned as `Err`; everything else is collected as [`FieldError`]s.

use crate::catalog::{Catalog, CatalogEntry, PacketLayout};
use crate::config::CodecConfig;
use crate::descriptor::PacketDescriptor;
use crate::error::{FieldError, Pm4Error, Result};
use crate::generation::Generation;
use crate::layout::{FieldKind, FieldSpec, OrdinalLayout, VariantLayout};
use crate::size;
use std::fmt;

/// Validation warning types (not errors, but worth noting)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Field only exists on other generations and was dropped
    IgnoredField { field: String, generation: Generation },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::IgnoredField { field, generation } => {
                write!(f, "ignoring field {} (not defined on {})", field, generation)
            }
        }
    }
}

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<FieldError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Create an empty validation result
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    fn add_error(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolved encode plan: fixed size, chosen variant per emitted ordinal,
/// and the findings collected along the way
pub(crate) struct Plan<'a> {
    pub size: usize,
    pub ordinals: Vec<(&'a OrdinalLayout, &'a VariantLayout)>,
    pub result: ValidationResult,
}

pub(crate) fn plan<'a>(
    catalog: &'a Catalog,
    desc: &PacketDescriptor,
    config: &CodecConfig,
) -> Result<Plan<'a>> {
    let unsupported = || Pm4Error::UnsupportedOpcode {
        opcode: desc.opcode,
        generation: desc.generation,
    };
    let entry = catalog.entry(desc.opcode).ok_or_else(unsupported)?;
    let layout = entry.layout(desc.generation).ok_or_else(unsupported)?;
    entry.check_selector(&desc.variants)?;

    let mut result = ValidationResult::new();

    let (active, missing) = layout.resolve_groups(|name| desc.fields.contains_key(name));
    for error in missing {
        result.add_error(error);
    }
    let size = layout
        .size_for(&active)
        .ok_or_else(|| size::no_declared_length(layout, &active))?;

    let ordinals = layout
        .ordinals
        .iter()
        .filter(|o| PacketLayout::is_emitted(o, &active))
        .map(|o| {
            layout
                .select_variant(o, &desc.variants, |name| desc.get(name))
                .map(|variant| (o, variant))
        })
        .collect::<Result<Vec<_>>>()?;

    for (name, value) in &desc.fields {
        let spec = ordinals.iter().find_map(|(_, variant)| variant.field(name));
        match spec {
            Some(spec) => {
                if let Some(error) = check_value(spec, *value, desc.generation) {
                    result.add_error(error);
                }
            }
            None => check_absent(entry, name, desc.generation, config, &mut result),
        }
    }

    match (layout.payload(), desc.payload.len()) {
        (None, 0) => {}
        (None, found) => result.add_error(FieldError::UnexpectedPayload { found }),
        (Some(payload), found) if found < payload.min_dwords => {
            result.add_error(FieldError::PayloadTooShort {
                payload: payload.name,
                min: payload.min_dwords,
                found,
            })
        }
        (Some(_), _) => {}
    }

    Ok(Plan {
        size,
        ordinals,
        result,
    })
}

/// Check one supplied value against the field it lands in
fn check_value(spec: &FieldSpec, value: u64, generation: Generation) -> Option<FieldError> {
    let field = || spec.name.to_string();
    match spec.kind {
        FieldKind::Reserved => (value != 0).then(|| FieldError::ReservedBits {
            field: field(),
            value,
        }),
        FieldKind::Uint => (value > spec.max_value()).then(|| FieldError::OutOfRange {
            field: field(),
            value,
            width: spec.width,
        }),
        FieldKind::Address => {
            if value > u64::from(u32::MAX) {
                return Some(FieldError::OutOfRange {
                    field: field(),
                    value,
                    width: 32,
                });
            }
            let misaligned = value & !u64::from(spec.mask());
            (misaligned != 0).then(|| FieldError::ReservedBits {
                field: field(),
                value: misaligned,
            })
        }
        FieldKind::Enum(def) => {
            if value > spec.max_value() {
                return Some(FieldError::OutOfRange {
                    field: field(),
                    value,
                    width: spec.width,
                });
            }
            if def.member(value, generation).is_some() {
                return None;
            }
            Some(match def.any_member(value) {
                Some(member) => FieldError::UnsupportedValue {
                    field: field(),
                    value,
                    member: member.name,
                    generation,
                },
                None => FieldError::UnknownEnumValue {
                    field: field(),
                    value,
                    enumeration: def.name,
                },
            })
        }
    }
}

/// A supplied field that the resolved layout does not contain
fn check_absent(
    entry: &CatalogEntry,
    name: &str,
    generation: Generation,
    config: &CodecConfig,
    result: &mut ValidationResult,
) {
    let generations = entry.field_generations(name);
    if generations.is_empty() || generations.contains(generation) {
        result.add_error(FieldError::NotInLayout {
            field: name.to_string(),
        });
    } else if config.rejects_unsupported() {
        result.add_error(FieldError::Unsupported {
            field: name.to_string(),
            generation,
        });
    } else {
        result.add_warning(ValidationWarning::IgnoredField {
            field: name.to_string(),
            generation,
        });
    }
}

/// Validate with the default configuration
pub fn validate(desc: &PacketDescriptor) -> Result<ValidationResult> {
    validate_with(desc, &CodecConfig::DEFAULT)
}

pub fn validate_with(desc: &PacketDescriptor, config: &CodecConfig) -> Result<ValidationResult> {
    Ok(plan(Catalog::global(), desc, config)?.result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReservedPolicy, UnsupportedFieldPolicy};
    use crate::error::ErrorKind;
    use crate::opcode::Opcode;

    fn kinds(result: &ValidationResult) -> Vec<ErrorKind> {
        result.errors.iter().map(FieldError::kind).collect()
    }

    #[test]
    fn test_valid_descriptor() {
        let desc = PacketDescriptor::new(Opcode::DispatchDirect, Generation::Gfx10)
            .field("dim_x", 8)
            .field("dim_y", 8)
            .field("dim_z", 1)
            .field("dispatch_initiator", 1);
        let result = validate(&desc).unwrap();
        assert!(result.is_valid());
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_value_out_of_range() {
        let desc = PacketDescriptor::new(Opcode::AcquireMem, Generation::Gfx10)
            .field("gcr_cntl", 1 << 19)
            .field("coher_size_hi", 0xFF);
        let result = validate(&desc).unwrap();
        assert_eq!(
            result.errors,
            vec![FieldError::OutOfRange {
                field: "gcr_cntl".to_string(),
                value: 1 << 19,
                width: 19
            }]
        );
    }

    #[test]
    fn test_enum_capability() {
        // bypass is gfx10+
        let desc = PacketDescriptor::new(Opcode::ReleaseMem, Generation::Gfx9).field("cache_policy", 3);
        let result = validate(&desc).unwrap();
        assert_eq!(kinds(&result), vec![ErrorKind::Capability]);

        let desc = PacketDescriptor::new(Opcode::ReleaseMem, Generation::Gfx11).field("cache_policy", 3);
        assert!(validate(&desc).unwrap().is_valid());
    }

    #[test]
    fn test_enum_unknown_member() {
        let desc = PacketDescriptor::new(Opcode::ReleaseMem, Generation::Gfx10).field("event_index", 2);
        let result = validate(&desc).unwrap();
        assert!(matches!(
            result.errors[0],
            FieldError::UnknownEnumValue { enumeration: "event_index", .. }
        ));
        assert_eq!(result.errors[0].kind(), ErrorKind::Range);
    }

    #[test]
    fn test_reserved_field_supplied() {
        let desc = PacketDescriptor::new(Opcode::ClearState, Generation::Gfx9).field("reserved2_4", 1);
        let result = validate(&desc).unwrap();
        assert_eq!(kinds(&result), vec![ErrorKind::ReservedBits]);

        let desc = PacketDescriptor::new(Opcode::ClearState, Generation::Gfx9).field("reserved2_4", 0);
        assert!(validate(&desc).unwrap().is_valid());
    }

    #[test]
    fn test_misaligned_address() {
        let desc = PacketDescriptor::new(Opcode::WaitRegMem64, Generation::Gfx10)
            .field("mem_space", 1)
            .field("mem_poll_addr_lo", 0x1004);
        let result = validate(&desc).unwrap();
        assert_eq!(
            result.errors,
            vec![FieldError::ReservedBits {
                field: "mem_poll_addr_lo".to_string(),
                value: 0x4
            }]
        );
    }

    #[test]
    fn test_field_from_other_generation() {
        let desc = PacketDescriptor::new(Opcode::AcquireMem, Generation::Gfx9).field("gcr_cntl", 1);
        let result = validate(&desc).unwrap();
        assert_eq!(
            result.errors,
            vec![FieldError::Unsupported {
                field: "gcr_cntl".to_string(),
                generation: Generation::Gfx9
            }]
        );

        let config = CodecConfig::new(ReservedPolicy::Strict, UnsupportedFieldPolicy::Ignore, 16385).unwrap();
        let result = validate_with(&desc, &config).unwrap();
        assert!(result.is_valid());
        assert!(result.has_warnings());
    }

    #[test]
    fn test_unknown_field() {
        let desc = PacketDescriptor::new(Opcode::DrawIndexAuto, Generation::Gfx9).field("index_cnt", 3);
        let result = validate(&desc).unwrap();
        assert_eq!(kinds(&result), vec![ErrorKind::Unknown]);
    }

    #[test]
    fn test_field_of_unselected_variant() {
        // mem_space = 1 selects the memory interpretation of ordinal 3
        let desc = PacketDescriptor::new(Opcode::WaitRegMem, Generation::Gfx9)
            .field("mem_space", 1)
            .field("reg_poll_addr", 0x100);
        let result = validate(&desc).unwrap();
        assert_eq!(
            result.errors,
            vec![FieldError::NotInLayout {
                field: "reg_poll_addr".to_string()
            }]
        );
    }

    #[test]
    fn test_incomplete_group() {
        let desc = PacketDescriptor::new(Opcode::DrawIndex2, Generation::Gfx10)
            .field("index_base_lo", 0x1000)
            .field("index_count", 3);
        let result = validate(&desc).unwrap();
        assert_eq!(
            result.errors,
            vec![FieldError::IncompleteGroup {
                group: "draw_with_addr",
                field: "index_base_hi"
            }]
        );
        assert_eq!(result.errors[0].kind(), ErrorKind::AmbiguousLength);
    }

    #[test]
    fn test_payload_checks() {
        let desc = PacketDescriptor::new(Opcode::Nop, Generation::Gfx9);
        let result = validate(&desc).unwrap();
        assert!(matches!(result.errors[0], FieldError::PayloadTooShort { min: 1, found: 0, .. }));

        let desc = PacketDescriptor::new(Opcode::DrawIndexAuto, Generation::Gfx9).payload(vec![1, 2]);
        let result = validate(&desc).unwrap();
        assert_eq!(result.errors, vec![FieldError::UnexpectedPayload { found: 2 }]);
    }

    #[test]
    fn test_packet_level_failures() {
        let desc = PacketDescriptor::new(Opcode::PrimeUtcl2, Generation::Gfx11);
        assert_eq!(validate(&desc).unwrap_err().kind(), ErrorKind::Capability);

        let desc = PacketDescriptor::new(Opcode::CopyData, Generation::Gfx9).variant("sideways");
        assert_eq!(validate(&desc).unwrap_err().kind(), ErrorKind::Unknown);

        // long form with neither a condition nor a default for ordinal 3
        let desc = PacketDescriptor::new(Opcode::DrawIndexIndirectMulti, Generation::Gfx10)
            .field("draw_initiator", 2);
        assert_eq!(validate(&desc).unwrap_err().kind(), ErrorKind::Selection);
    }

    #[test]
    fn test_lenient_policy_does_not_affect_encode_checks() {
        let config = CodecConfig::new(ReservedPolicy::Lenient, UnsupportedFieldPolicy::Reject, 16385).unwrap();
        let desc = PacketDescriptor::new(Opcode::ClearState, Generation::Gfx9).field("reserved2_4", 1);
        assert!(!validate_with(&desc, &config).unwrap().is_valid());
    }
}
