//! # Error Types for the PM4 Codec
//!
//! Every failure is local and synchronous. Encode and decode are
//! all-or-nothing: no partial word sequence or descriptor escapes an error.

use crate::config::ConfigError;
use crate::generation::Generation;
use crate::opcode::Opcode;
use std::fmt;
use thiserror::Error;

/// Result type used throughout the codec
pub type Result<T> = std::result::Result<T, Pm4Error>;

/// Coarse error category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A value exceeds its field's bit width
    Range,
    /// Opcode, field or enumerated value not defined for the generation
    Capability,
    /// Non-zero value in a reserved range
    ReservedBits,
    /// Present fields match no declared length variant
    AmbiguousLength,
    /// Word count matches no declared length variant
    LengthMismatch,
    /// Several layout variants apply and none was chosen
    Selection,
    /// Header type tag is not 3
    Format,
    /// No layout for the requested opcode/generation
    NotFound,
    /// Unknown opcode, field or variant name
    Unknown,
    /// Invalid codec configuration
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Range => "RangeError",
            ErrorKind::Capability => "CapabilityError",
            ErrorKind::ReservedBits => "ReservedBitsViolation",
            ErrorKind::AmbiguousLength => "AmbiguousLengthError",
            ErrorKind::LengthMismatch => "LengthMismatchError",
            ErrorKind::Selection => "SelectionError",
            ErrorKind::Format => "FormatError",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Unknown => "UnknownName",
            ErrorKind::Config => "ConfigError",
        };
        f.write_str(name)
    }
}

/// Per-field validation finding
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Field {field}: value {value:#x} does not fit in {width} bits")]
    OutOfRange { field: String, value: u64, width: u32 },

    #[error("Field {field}: {value} is not a member of {enumeration}")]
    UnknownEnumValue {
        field: String,
        value: u64,
        enumeration: &'static str,
    },

    #[error("Field {field} is not defined on {generation}")]
    Unsupported { field: String, generation: Generation },

    #[error("Field {field}: {member} ({value}) is not available on {generation}")]
    UnsupportedValue {
        field: String,
        value: u64,
        member: &'static str,
        generation: Generation,
    },

    #[error("Field {field}: reserved bits must be zero (found {value:#x})")]
    ReservedBits { field: String, value: u64 },

    #[error("Field {field} is not part of the resolved layout")]
    NotInLayout { field: String },

    #[error("Optional group {group} is incomplete: missing {field}")]
    IncompleteGroup { group: &'static str, field: &'static str },

    #[error("Payload {payload} needs at least {min} dwords, got {found}")]
    PayloadTooShort {
        payload: &'static str,
        min: usize,
        found: usize,
    },

    #[error("Packet carries no trailing payload ({found} dwords supplied)")]
    UnexpectedPayload { found: usize },
}

impl FieldError {
    /// Category of this finding
    pub fn kind(&self) -> ErrorKind {
        match self {
            FieldError::OutOfRange { .. }
            | FieldError::UnknownEnumValue { .. }
            | FieldError::PayloadTooShort { .. } => ErrorKind::Range,
            FieldError::Unsupported { .. } | FieldError::UnsupportedValue { .. } => {
                ErrorKind::Capability
            }
            FieldError::ReservedBits { .. } => ErrorKind::ReservedBits,
            FieldError::NotInLayout { .. } | FieldError::UnexpectedPayload { .. } => {
                ErrorKind::Unknown
            }
            FieldError::IncompleteGroup { .. } => ErrorKind::AmbiguousLength,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Pm4Error {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    // Header errors
    #[error("{field} value {value} does not fit in {width} bits")]
    Range { field: String, value: u64, width: u32 },

    #[error("Not a type-3 packet: header {word:#010x} has type {packet_type}")]
    Format { word: u32, packet_type: u32 },

    #[error("Reserved header bits set: {0:#x}")]
    ReservedHeaderBits(u32),

    // Catalog errors
    #[error("Unknown opcode: {0:#04x}")]
    UnknownOpcode(u8),

    #[error("Unknown opcode name: {0}")]
    UnknownOpcodeName(String),

    #[error("{opcode} is not supported on {generation}")]
    UnsupportedOpcode {
        opcode: Opcode,
        generation: Generation,
    },

    #[error("No layout for {opcode} on {generation}")]
    LayoutNotFound {
        opcode: Opcode,
        generation: Generation,
    },

    #[error("{opcode} has no variant named {name}")]
    UnknownVariant { opcode: Opcode, name: String },

    #[error("{opcode} has no address pair named {name}")]
    UnknownAddress { opcode: Opcode, name: String },

    #[error("{opcode} ordinal {ordinal}: select one of {candidates:?}")]
    Selection {
        opcode: Opcode,
        ordinal: usize,
        candidates: Vec<&'static str>,
    },

    // Length errors
    #[error("{opcode}: {reason}")]
    AmbiguousLength { opcode: Opcode, reason: String },

    #[error("{opcode} on {generation}: {found} dwords matches no declared size {expected:?}")]
    LengthMismatch {
        opcode: Opcode,
        generation: Generation,
        found: usize,
        expected: Vec<usize>,
    },

    #[error("Truncated packet: need {needed} dwords, {available} available")]
    Truncated { needed: usize, available: usize },

    // Field errors
    #[error("{opcode}: {}", join_errors(errors))]
    Invalid {
        opcode: Opcode,
        errors: Vec<FieldError>,
    },
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Pm4Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Pm4Error::Config(_) => ErrorKind::Config,
            Pm4Error::Range { .. } => ErrorKind::Range,
            Pm4Error::Format { .. } => ErrorKind::Format,
            Pm4Error::ReservedHeaderBits(_) => ErrorKind::ReservedBits,
            Pm4Error::UnknownOpcode(_)
            | Pm4Error::UnknownOpcodeName(_)
            | Pm4Error::UnknownVariant { .. }
            | Pm4Error::UnknownAddress { .. } => ErrorKind::Unknown,
            Pm4Error::UnsupportedOpcode { .. } => ErrorKind::Capability,
            Pm4Error::LayoutNotFound { .. } => ErrorKind::NotFound,
            Pm4Error::Selection { .. } => ErrorKind::Selection,
            Pm4Error::AmbiguousLength { .. } => ErrorKind::AmbiguousLength,
            Pm4Error::LengthMismatch { .. } | Pm4Error::Truncated { .. } => {
                ErrorKind::LengthMismatch
            }
            Pm4Error::Invalid { errors, .. } => errors
                .first()
                .map(FieldError::kind)
                .unwrap_or(ErrorKind::Range),
        }
    }

    /// Field findings carried by an `Invalid` error
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Pm4Error::Invalid { errors, .. } => errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Pm4Error::Format {
            word: 0x8000_0000,
            packet_type: 2,
        };
        assert_eq!(
            err.to_string(),
            "Not a type-3 packet: header 0x80000000 has type 2"
        );

        let err = FieldError::ReservedBits {
            field: "mem_poll_addr_lo".to_string(),
            value: 0x4,
        };
        assert_eq!(
            err.to_string(),
            "Field mem_poll_addr_lo: reserved bits must be zero (found 0x4)"
        );
    }

    #[test]
    fn test_invalid_kind_follows_first_finding() {
        let err = Pm4Error::Invalid {
            opcode: Opcode::AcquireMem,
            errors: vec![
                FieldError::Unsupported {
                    field: "gcr_cntl".to_string(),
                    generation: Generation::Gfx9,
                },
                FieldError::OutOfRange {
                    field: "coher_size_hi".to_string(),
                    value: 0x100,
                    width: 8,
                },
            ],
        };
        assert_eq!(err.kind(), ErrorKind::Capability);
        assert_eq!(err.field_errors().len(), 2);
        assert!(err.to_string().starts_with("ACQUIRE_MEM: Field gcr_cntl"));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            Pm4Error::Truncated {
                needed: 4,
                available: 2
            }
            .kind(),
            ErrorKind::LengthMismatch
        );
        assert_eq!(Pm4Error::UnknownOpcode(0xFF).kind(), ErrorKind::Unknown);
        assert_eq!(
            FieldError::IncompleteGroup {
                group: "index_buffer",
                field: "index_base_hi"
            }
            .kind(),
            ErrorKind::AmbiguousLength
        );
        assert_eq!(ErrorKind::ReservedBits.to_string(), "ReservedBitsViolation");
    }
}
