//! # PM4 Type-3 Opcodes
//!
//! The closed set of command kinds understood by the codec. Each opcode has
//! one numeric encoding placed in header bits 8-15.
//!
//! ## Families
//! - Draw: indexed/auto/indirect draws
//! - Dispatch: compute and task/mesh dispatches
//! - Memory: writes, copies, DMA, atomics
//! - Register: register loads, sets and read-modify-writes
//! - Sync: acquire/release, events, waits, semaphores
//! - Control: state control, NOP and miscellaneous

use crate::catalog::Catalog;
use crate::error::{Pm4Error, Result};
use crate::generation::GenerationSet;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

macro_rules! opcodes {
    ($($(#[$doc:meta])* $variant:ident = $value:literal, $name:literal, $family:ident;)*) => {
        /// PM4 type-3 opcode
        #[repr(u8)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Opcode {
            $($(#[$doc])* $variant = $value,)*
        }

        impl Opcode {
            /// Every opcode, in numeric order
            pub const ALL: &'static [Opcode] = &[$(Opcode::$variant),*];

            /// Decode a header opcode byte
            pub fn from_u8(value: u8) -> Option<Self> {
                match value {
                    $($value => Some(Opcode::$variant),)*
                    _ => None,
                }
            }

            /// Canonical upper-case name (`ACQUIRE_MEM`)
            pub const fn name(self) -> &'static str {
                match self {
                    $(Opcode::$variant => $name,)*
                }
            }

            pub const fn family(self) -> PacketFamily {
                match self {
                    $(Opcode::$variant => PacketFamily::$family,)*
                }
            }
        }
    };
}

opcodes! {
    Nop = 0x10, "NOP", Control;
    ClearState = 0x12, "CLEAR_STATE", Control;
    DispatchDirect = 0x15, "DISPATCH_DIRECT", Dispatch;
    DispatchIndirect = 0x16, "DISPATCH_INDIRECT", Dispatch;
    AtomicGds = 0x1D, "ATOMIC_GDS", Memory;
    AtomicMem = 0x1E, "ATOMIC_MEM", Memory;
    RegRmw = 0x21, "REG_RMW", Register;
    DrawIndirect = 0x24, "DRAW_INDIRECT", Draw;
    DrawIndexIndirect = 0x25, "DRAW_INDEX_INDIRECT", Draw;
    DrawIndex2 = 0x27, "DRAW_INDEX_2", Draw;
    ContextControl = 0x28, "CONTEXT_CONTROL", Control;
    DrawIndirectMulti = 0x2C, "DRAW_INDIRECT_MULTI", Draw;
    DrawIndexAuto = 0x2D, "DRAW_INDEX_AUTO", Draw;
    DrawIndexMultiAuto = 0x30, "DRAW_INDEX_MULTI_AUTO", Draw;
    StrmoutBufferUpdate = 0x34, "STRMOUT_BUFFER_UPDATE", Memory;
    DrawIndexOffset2 = 0x35, "DRAW_INDEX_OFFSET_2", Draw;
    WriteData = 0x37, "WRITE_DATA", Memory;
    DrawIndexIndirectMulti = 0x38, "DRAW_INDEX_INDIRECT_MULTI", Draw;
    MemSemaphore = 0x39, "MEM_SEMAPHORE", Sync;
    DrawIndexMultiInst = 0x3A, "DRAW_INDEX_MULTI_INST", Draw;
    WaitRegMem = 0x3C, "WAIT_REG_MEM", Sync;
    CopyData = 0x40, "COPY_DATA", Memory;
    PfpSyncMe = 0x42, "PFP_SYNC_ME", Sync;
    CondWrite = 0x45, "COND_WRITE", Memory;
    EventWrite = 0x46, "EVENT_WRITE", Sync;
    ReleaseMem = 0x49, "RELEASE_MEM", Sync;
    PreambleCntl = 0x4A, "PREAMBLE_CNTL", Control;
    DmaData = 0x50, "DMA_DATA", Memory;
    ContextRegRmw = 0x51, "CONTEXT_REG_RMW", Register;
    AcquireMem = 0x58, "ACQUIRE_MEM", Sync;
    PrimeUtcl2 = 0x5D, "PRIME_UTCL2", Memory;
    LoadUconfigReg = 0x5E, "LOAD_UCONFIG_REG", Register;
    LoadShReg = 0x5F, "LOAD_SH_REG", Register;
    LoadConfigReg = 0x60, "LOAD_CONFIG_REG", Register;
    LoadContextReg = 0x61, "LOAD_CONTEXT_REG", Register;
    LoadShRegIndex = 0x63, "LOAD_SH_REG_INDEX", Register;
    LoadUconfigRegIndex = 0x65, "LOAD_UCONFIG_REG_INDEX", Register;
    SetConfigReg = 0x68, "SET_CONFIG_REG", Register;
    SetContextReg = 0x69, "SET_CONTEXT_REG", Register;
    SetContextRegIndex = 0x6A, "SET_CONTEXT_REG_INDEX", Register;
    GfxPipeLock = 0x75, "GFX_PIPE_LOCK", Control;
    SetShReg = 0x76, "SET_SH_REG", Register;
    SetShRegOffset = 0x77, "SET_SH_REG_OFFSET", Register;
    SetUconfigReg = 0x79, "SET_UCONFIG_REG", Register;
    SetUconfigRegIndex = 0x7A, "SET_UCONFIG_REG_INDEX", Register;
    IncrementDeCounter = 0x85, "INCREMENT_DE_COUNTER", Sync;
    WaitOnCeCounter = 0x86, "WAIT_ON_CE_COUNTER", Sync;
    SwitchBuffer = 0x8B, "SWITCH_BUFFER", Control;
    GetLodStats = 0x8E, "GET_LOD_STATS", Control;
    FrameControl = 0x90, "FRAME_CONTROL", Control;
    WaitRegMem64 = 0x93, "WAIT_REG_MEM64", Sync;
    DmaDataFillMulti = 0x9A, "DMA_DATA_FILL_MULTI", Memory;
    SetShRegIndex = 0x9B, "SET_SH_REG_INDEX", Register;
    DispatchMeshIndirectMulti = 0x9D, "DISPATCH_MESH_INDIRECT_MULTI", Dispatch;
    LoadContextRegIndex = 0x9F, "LOAD_CONTEXT_REG_INDEX", Register;
    DispatchTaskmeshGfx = 0xA7, "DISPATCH_TASKMESH_GFX", Dispatch;
    DispatchTaskStateInit = 0xA9, "DISPATCH_TASK_STATE_INIT", Dispatch;
    PerfmonControl = 0xBC, "PERFMON_CONTROL", Control;
}

impl Opcode {
    /// Numeric value placed in the header
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Look up an opcode by its canonical name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.name().eq_ignore_ascii_case(name))
    }

    /// Generations on which this opcode has a layout
    pub fn supported_generations(self) -> GenerationSet {
        Catalog::global()
            .entry(self)
            .map(|entry| entry.generations())
            .unwrap_or(GenerationSet::EMPTY)
    }
}

impl FromStr for Opcode {
    type Err = Pm4Error;

    fn from_str(s: &str) -> Result<Self> {
        Opcode::from_name(s).ok_or_else(|| Pm4Error::UnknownOpcodeName(s.to_string()))
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up an opcode by name, failing with an unknown-name error
pub fn opcode_for(name: &str) -> Result<Opcode> {
    name.parse()
}

/// Packet family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PacketFamily {
    Draw,
    Dispatch,
    Memory,
    Register,
    Sync,
    Control,
}

impl std::fmt::Display for PacketFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PacketFamily::Draw => "draw",
            PacketFamily::Dispatch => "dispatch",
            PacketFamily::Memory => "memory",
            PacketFamily::Register => "register",
            PacketFamily::Sync => "sync",
            PacketFamily::Control => "control",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::Generation;

    #[test]
    fn test_opcode_values() {
        assert_eq!(Opcode::Nop.to_u8(), 0x10);
        assert_eq!(Opcode::AcquireMem.to_u8(), 0x58);
        assert_eq!(Opcode::ReleaseMem.to_u8(), 0x49);
        assert_eq!(Opcode::EventWrite.to_u8(), 0x46);
        assert_eq!(Opcode::DispatchDirect.to_u8(), 0x15);
        assert_eq!(Opcode::DrawIndexAuto.to_u8(), 0x2D);
        assert_eq!(Opcode::SetShReg.to_u8(), 0x76);
        assert_eq!(Opcode::SetContextReg.to_u8(), 0x69);
        assert_eq!(Opcode::DmaData.to_u8(), 0x50);
    }

    #[test]
    fn test_opcode_from_u8() {
        for &op in Opcode::ALL {
            assert_eq!(Opcode::from_u8(op.to_u8()), Some(op));
        }
        assert_eq!(Opcode::from_u8(0x00), None);
        assert_eq!(Opcode::from_u8(0xFF), None);
    }

    #[test]
    fn test_opcode_names_unique() {
        let mut names: Vec<_> = Opcode::ALL.iter().map(|op| op.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Opcode::ALL.len());
        assert_eq!(Opcode::ALL.len(), 58);
    }

    #[test]
    fn test_opcode_from_name() {
        assert_eq!(opcode_for("ACQUIRE_MEM").unwrap(), Opcode::AcquireMem);
        assert_eq!("wait_reg_mem64".parse::<Opcode>().unwrap(), Opcode::WaitRegMem64);
        assert!(matches!(
            opcode_for("WAIT_FOREVER"),
            Err(Pm4Error::UnknownOpcodeName(_))
        ));
    }

    #[test]
    fn test_supported_generations() {
        assert_eq!(Opcode::AcquireMem.supported_generations(), GenerationSet::ALL);
        assert_eq!(Opcode::PrimeUtcl2.supported_generations(), GenerationSet::GFX9);
        assert_eq!(Opcode::PerfmonControl.supported_generations(), GenerationSet::GFX10);
        assert!(!Opcode::GfxPipeLock
            .supported_generations()
            .contains(Generation::Gfx9));
    }

    #[test]
    fn test_family() {
        assert_eq!(Opcode::DrawIndex2.family(), PacketFamily::Draw);
        assert_eq!(Opcode::AcquireMem.family(), PacketFamily::Sync);
        assert_eq!(Opcode::SetShReg.family(), PacketFamily::Register);
    }
}
