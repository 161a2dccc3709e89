//! # Hardware Generations
//!
//! Packet layouts differ between graphics IP families. The wire format
//! carries no generation tag, so every encode/decode call names the target
//! family explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hardware family targeted by a packet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Generation {
    /// GFX9 (Vega)
    Gfx9,
    /// GFX10 (Navi 1x/2x)
    Gfx10,
    /// GFX11 and later
    Gfx11,
}

impl Generation {
    /// All known generations, oldest first
    pub const ALL: [Generation; 3] = [Generation::Gfx9, Generation::Gfx10, Generation::Gfx11];

    /// Short lowercase name used by the assembler (`gfx9`, `gfx10`, `gfx11`)
    pub const fn name(self) -> &'static str {
        match self {
            Generation::Gfx9 => "gfx9",
            Generation::Gfx10 => "gfx10",
            Generation::Gfx11 => "gfx11",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Generation::Gfx9 => 1 << 0,
            Generation::Gfx10 => 1 << 1,
            Generation::Gfx11 => 1 << 2,
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a generation name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown generation: {0}")]
pub struct UnknownGeneration(pub String);

impl FromStr for Generation {
    type Err = UnknownGeneration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gfx9" | "gfx09" => Ok(Generation::Gfx9),
            "gfx10" => Ok(Generation::Gfx10),
            "gfx11" => Ok(Generation::Gfx11),
            _ => Err(UnknownGeneration(s.to_string())),
        }
    }
}

/// Set of generations a table entry applies to
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenerationSet(u8);

impl GenerationSet {
    /// No generation
    pub const EMPTY: Self = Self(0);
    /// Every generation ("core" entries)
    pub const ALL: Self = Self(0b111);
    /// GFX9 only
    pub const GFX9: Self = Self(Generation::Gfx9.bit());
    /// GFX10 only
    pub const GFX10: Self = Self(Generation::Gfx10.bit());
    /// GFX10 and every later generation
    pub const GFX10_PLUS: Self = Self(Generation::Gfx10.bit() | Generation::Gfx11.bit());

    /// Check membership
    #[inline]
    pub const fn contains(self, generation: Generation) -> bool {
        self.0 & generation.bit() != 0
    }

    /// Union of two sets
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True when no generation is a member
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the members, oldest first
    pub fn iter(self) -> impl Iterator<Item = Generation> {
        Generation::ALL.into_iter().filter(move |g| self.contains(*g))
    }
}

impl fmt::Debug for GenerationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GenerationSet({self})")
    }
}

impl fmt::Display for GenerationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ALL => f.write_str("core"),
            Self::GFX10_PLUS => f.write_str("gfx10+"),
            Self::EMPTY => f.write_str("none"),
            set => {
                let names: Vec<&str> = set.iter().map(Generation::name).collect();
                f.write_str(&names.join("|"))
            }
        }
    }
}

impl From<Generation> for GenerationSet {
    fn from(generation: Generation) -> Self {
        Self(generation.bit())
    }
}
