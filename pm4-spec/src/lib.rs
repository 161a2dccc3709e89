//! # PM4 Type-3 Packet Specification
//!
//! Bit-exact codec for the command packets consumed by the graphics
//! command processor's micro-engine and prefetch parser.
//!
//! ## Key Features
//! - Type-3 header codec (predicate, shader type, opcode, count)
//! - Generation-keyed layout table for GFX9, GFX10 and GFX11
//! - Mode-flag driven layout variants and optional ordinal groups
//! - Validation with per-field findings
//! - Stateless encode/decode over a process-wide immutable catalog

mod table;

pub mod catalog;
pub mod config;
pub mod descriptor;
pub mod encoding;
pub mod error;
pub mod generation;
pub mod header;
pub mod layout;
pub mod opcode;
pub mod size;
pub mod validation;

pub use catalog::{lookup_layout, Catalog, CatalogEntry, PacketLayout, TableIssue};
pub use config::{CodecConfig, ConfigError, ReservedPolicy, UnsupportedFieldPolicy};
pub use descriptor::{PacketDescriptor, VariantSelector};
pub use encoding::{decode, decode_with, encode, Codec};
pub use error::{ErrorKind, FieldError, Pm4Error, Result};
pub use generation::{Generation, GenerationSet};
pub use header::{decode_header, encode_header, HeaderFlags, PacketHeader, ShaderType};
pub use layout::{FieldKind, FieldSpec, Layout};
pub use opcode::{opcode_for, Opcode, PacketFamily};
pub use size::{packet_size, resolve_size};
pub use validation::{validate, validate_with, ValidationResult, ValidationWarning};
