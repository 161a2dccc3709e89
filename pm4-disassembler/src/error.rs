//! Disassembler errors

use pm4_spec::Pm4Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisassemblerError {
    #[error("Truncated stream at dword {offset}: packet needs {needed} dwords, {available} remain")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Packet at dword {offset} spans {dwords} dwords, over the {limit}-dword limit")]
    PacketTooLong {
        offset: usize,
        dwords: usize,
        limit: usize,
    },

    #[error("Packet at dword {offset}: {source}")]
    Packet { offset: usize, source: Pm4Error },

    #[error(transparent)]
    Spec(#[from] Pm4Error),
}

impl DisassemblerError {
    /// Stream offset (in dwords) of the failing packet, if known
    pub fn offset(&self) -> Option<usize> {
        match self {
            DisassemblerError::Truncated { offset, .. }
            | DisassemblerError::PacketTooLong { offset, .. }
            | DisassemblerError::Packet { offset, .. } => Some(*offset),
            DisassemblerError::Spec(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
