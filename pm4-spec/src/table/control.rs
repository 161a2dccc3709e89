//! State control, frame markers and miscellaneous packets.

use super::CACHE_POLICY;
use crate::generation::GenerationSet;
use crate::layout::{addr, dword, e, f, member, member_on, EnumDef, PacketDef};

pub(super) static PACKETS: &[&PacketDef] = &[
    &NOP,
    &CLEAR_STATE,
    &CONTEXT_CONTROL,
    &PREAMBLE_CNTL,
    &FRAME_CONTROL,
    &SWITCH_BUFFER,
    &GET_LOD_STATS,
    &GFX_PIPE_LOCK,
    &PERFMON_CONTROL,
];

/// Filler: header plus at least one ignored dword
static NOP: PacketDef = packet! {
    Nop, ALL,
    sizes: [size!(1)],
    payload: ("data", 1),
    ordinals: [],
};

static CLEAR_STATE_CMD: EnumDef = EnumDef {
    name: "cmd",
    members: &[
        member("clear_state", 0),
        member("push_state", 1),
        member("pop_state", 2),
        member("push_clear_state", 3),
    ],
};

static CLEAR_STATE: PacketDef = packet! {
    ClearState, ALL,
    sizes: [size!(2)],
    ordinals: [
        ord![e("cmd", 0, 4, &CLEAR_STATE_CMD)],
    ],
};

static CONTEXT_CONTROL: PacketDef = packet! {
    ContextControl, ALL,
    sizes: [size!(3)],
    ordinals: [
        ord![
            f("load_global_config", 0, 1),
            f("load_per_context_state", 1, 1),
            f("load_global_uconfig", 15, 1),
            f("load_gfx_sh_regs", 16, 1),
            f("load_cs_sh_regs", 24, 1),
            f("load_ce_ram", 28, 1),
            f("update_load_enables", 31, 1),
        ],
        ord![
            f("shadow_global_config", 0, 1),
            f("shadow_per_context_state", 1, 1),
            f("shadow_global_uconfig", 15, 1),
            f("shadow_gfx_sh_regs", 16, 1),
            f("shadow_cs_sh_regs", 24, 1),
            f("update_shadow_enables", 31, 1),
        ],
    ],
};

static PREAMBLE_COMMAND: EnumDef = EnumDef {
    name: "command",
    members: &[
        member("preamble_begin", 0),
        member("preamble_end", 1),
        member("begin_of_clear_state_initialization", 2),
        member("end_of_clear_state_initialization", 3),
    ],
};

static PREAMBLE_CNTL: PacketDef = packet! {
    PreambleCntl, ALL,
    sizes: [size!(2)],
    ordinals: [
        ord![e("command", 28, 4, &PREAMBLE_COMMAND)],
    ],
};

static FRAME_TMZ: EnumDef = EnumDef {
    name: "tmz",
    members: &[member("tmz_off", 0), member("tmz_on", 1)],
};

static FRAME_COMMAND: EnumDef = EnumDef {
    name: "command",
    members: &[member("kmd_frame_begin", 0), member("kmd_frame_end", 1)],
};

static FRAME_CONTROL: PacketDef = packet! {
    FrameControl, ALL,
    sizes: [size!(2)],
    ordinals: [
        ord![
            e("tmz", 0, 1, &FRAME_TMZ),
            e("command", 28, 4, &FRAME_COMMAND),
        ],
    ],
};

static SWITCH_BUFFER: PacketDef = packet! {
    SwitchBuffer, ALL,
    sizes: [size!(2)],
    ordinals: [
        ord![
            f("tmz", 0, 1).only(GenerationSet::GFX9),
            dword("dummy").only(GenerationSet::GFX10_PLUS),
        ],
    ],
};

static GET_LOD_STATS: PacketDef = packet! {
    GetLodStats, ALL,
    sizes: [size!(5)],
    addresses: [pair!("base", "base_lo", "base_hi")],
    ordinals: [
        ord![dword("bu_size")],
        ord![addr("base_lo", 6)],
        ord![dword("base_hi")],
        ord![
            f("interval", 2, 8),
            f("reset_cnt", 10, 8),
            f("reset_force", 18, 1),
            f("report_and_reset", 19, 1),
            e("cache_policy", 28, 2, &CACHE_POLICY),
        ],
    ],
};

static GFX_PIPE_LOCK: PacketDef = packet! {
    GfxPipeLock, GFX10_PLUS,
    sizes: [size!(2)],
    ordinals: [
        ord![f("sync_ssu_cntx_mgr", 0, 1), f("sync_dma", 1, 1)],
    ],
};

static PERFMON_ENABLE: EnumDef = EnumDef {
    name: "pmc_en",
    members: &[
        member_on("perfmon_disable", 0, GenerationSet::GFX10),
        member_on("perfmon_enable", 1, GenerationSet::GFX10),
    ],
};

static PERFMON_CONTROL: PacketDef = packet! {
    PerfmonControl, GFX10,
    sizes: [size!(3)],
    ordinals: [
        ord![
            f("pmc_id", 0, 3),
            e("pmc_en", 15, 1, &PERFMON_ENABLE),
            f("pmc_unit_mask", 16, 8),
        ],
        ord![f("pmc_event", 0, 14)],
    ],
};
