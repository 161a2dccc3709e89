//! # Codec Configuration
//!
//! Policy knobs for the encode/decode engine. The layout table itself is
//! not configurable: it is built once per process and never changes.

use crate::header::MAX_PACKET_DWORDS;
use std::fmt;

/// Handling of non-zero reserved bits found while decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReservedPolicy {
    /// Fail with a reserved-bits violation
    #[default]
    Strict,
    /// Log a warning and drop the bits
    Lenient,
}

/// Handling of fields that exist only on another generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnsupportedFieldPolicy {
    /// Report a capability error
    #[default]
    Reject,
    /// Drop the field with a warning
    Ignore,
}

/// Codec configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodecConfig {
    pub reserved_policy: ReservedPolicy,
    pub unsupported_field_policy: UnsupportedFieldPolicy,
    /// Upper bound on a single packet, header included (2-16385)
    pub max_packet_dwords: u32,
}

impl CodecConfig {
    /// Default configuration:
    /// - strict reserved-bit checking on decode
    /// - generation-gated fields rejected on encode
    /// - packets up to the 14-bit count limit (16385 dwords)
    pub const DEFAULT: Self = Self {
        reserved_policy: ReservedPolicy::Strict,
        unsupported_field_policy: UnsupportedFieldPolicy::Reject,
        max_packet_dwords: MAX_PACKET_DWORDS,
    };

    /// Create a new configuration with validation
    pub const fn new(
        reserved_policy: ReservedPolicy,
        unsupported_field_policy: UnsupportedFieldPolicy,
        max_packet_dwords: u32,
    ) -> Result<Self, ConfigError> {
        if max_packet_dwords < 2 || max_packet_dwords > MAX_PACKET_DWORDS {
            return Err(ConfigError::PacketLimit(max_packet_dwords));
        }

        Ok(Self {
            reserved_policy,
            unsupported_field_policy,
            max_packet_dwords,
        })
    }

    /// Default configuration with lenient decoding
    pub const fn lenient() -> Self {
        Self {
            reserved_policy: ReservedPolicy::Lenient,
            ..Self::DEFAULT
        }
    }

    #[inline]
    pub const fn is_strict(&self) -> bool {
        matches!(self.reserved_policy, ReservedPolicy::Strict)
    }

    #[inline]
    pub const fn rejects_unsupported(&self) -> bool {
        matches!(self.unsupported_field_policy, UnsupportedFieldPolicy::Reject)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_packet_dwords < 2 || self.max_packet_dwords > MAX_PACKET_DWORDS {
            return Err(ConfigError::PacketLimit(self.max_packet_dwords));
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for CodecConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CodecConfig {{ reserved: {:?}, unsupported fields: {:?}, max packet: {} dwords }}",
            self.reserved_policy, self.unsupported_field_policy, self.max_packet_dwords,
        )
    }
}

/// Configuration error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Packet limit must be in range [2, 16385]
    PacketLimit(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::PacketLimit(n) => {
                write!(f, "max_packet_dwords must be in range [2, 16385], got {n}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
