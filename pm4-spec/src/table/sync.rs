//! Synchronization: cache acquire/release, events, waits and semaphores.

use super::{CACHE_POLICY, COMPARE_FUNCTION, MICRO_ENGINE};
use crate::generation::GenerationSet;
use crate::layout::{addr, dword, e, f, member, member_on, EnumDef, PacketDef};

pub(super) static PACKETS: &[&PacketDef] = &[
    &ACQUIRE_MEM,
    &EVENT_WRITE,
    &INCREMENT_DE_COUNTER,
    &MEM_SEMAPHORE,
    &PFP_SYNC_ME,
    &RELEASE_MEM,
    &WAIT_ON_CE_COUNTER,
    &WAIT_REG_MEM,
    &WAIT_REG_MEM64,
];

// ============================================================================
// ACQUIRE_MEM
// ============================================================================

static ACQUIRE_ENGINE: EnumDef = EnumDef {
    name: "engine_sel",
    members: &[member("micro_engine", 1)],
};

/// The gfx10+ form appends the 19-bit cache-control ordinal
static ACQUIRE_MEM: PacketDef = packet! {
    AcquireMem, ALL,
    sizes: [size!(7, gfx: GFX9), size!(8, gfx: GFX10_PLUS)],
    addresses: [
        pair!("coher_size", "coher_size", "coher_size_hi"),
        pair!("coher_base", "coher_base_lo", "coher_base_hi"),
    ],
    ordinals: [
        ord![f("coher_cntl", 0, 31), e("engine_sel", 31, 1, &ACQUIRE_ENGINE)],
        ord![dword("coher_size")],
        ord![f("coher_size_hi", 0, 8)],
        ord![dword("coher_base_lo")],
        ord![f("coher_base_hi", 0, 24)],
        ord![f("poll_interval", 0, 16)],
        ord!(gfx: GFX10_PLUS; f("gcr_cntl", 0, 19)),
    ],
};

// ============================================================================
// EVENT_WRITE
// ============================================================================

static EVENT_INDEX: EnumDef = EnumDef {
    name: "event_index",
    members: &[
        member("other", 0),
        member("zpass_pixel_pipe_stat_control_or_dump", 1),
        member("sample_pipelinestat", 2),
        member("sample_streamoutstats", 3),
        member("cs_vs_ps_partial_flush", 4),
    ],
};

static COUNTER_ID: EnumDef = EnumDef {
    name: "counter_id",
    members: &[
        member("pixel_pipe_occlusion_count_0", 0),
        member("pixel_pipe_occlusion_count_1", 1),
        member("pixel_pipe_occlusion_count_2", 2),
        member("pixel_pipe_occlusion_count_3", 3),
        member("pixel_pipe_screen_min_extents_0", 4),
        member("pixel_pipe_screen_max_extents_0", 5),
        member("pixel_pipe_screen_min_extents_1", 6),
        member("pixel_pipe_screen_max_extents_1", 7),
    ],
};

/// Flush-style events need no address and use the two-dword form
static EVENT_WRITE: PacketDef = packet! {
    EventWrite, ALL,
    sizes: [size!(2), size!(4, groups: ["event_data"])],
    groups: [group!("event_data")],
    addresses: [pair!("address", "address_lo", "address_hi")],
    ordinals: [
        ord![f("event_type", 0, 6), e("event_index", 8, 4, &EVENT_INDEX)],
        alt!(group: "event_data";
            var!(default "address"; addr("address_lo", 3)),
            var!("counter";
                e("counter_id", 3, 6, &COUNTER_ID),
                f("stride", 9, 2),
                f("instance_enable", 11, 16),
            ),
        ),
        ord!(group: "event_data"; dword("address_hi")),
    ],
};

// ============================================================================
// Counters and pipe sync
// ============================================================================

static INCREMENT_DE_COUNTER: PacketDef = packet! {
    IncrementDeCounter, ALL,
    sizes: [size!(2)],
    ordinals: [ord![dword("dummy_data")]],
};

static PFP_SYNC_ME: PacketDef = packet! {
    PfpSyncMe, ALL,
    sizes: [size!(2)],
    ordinals: [ord![dword("dummy_data")]],
};

static WAIT_ON_CE_COUNTER: PacketDef = packet! {
    WaitOnCeCounter, ALL,
    sizes: [size!(2)],
    ordinals: [ord![f("cond_surface_sync", 0, 1), f("force_sync", 1, 1)]],
};

// ============================================================================
// MEM_SEMAPHORE
// ============================================================================

static USE_MAILBOX: EnumDef = EnumDef {
    name: "use_mailbox",
    members: &[
        member("do_not_wait_for_mailbox", 0),
        member("wait_for_mailbox", 1),
    ],
};

static SIGNAL_TYPE: EnumDef = EnumDef {
    name: "signal_type",
    members: &[
        member("signal_type_increment", 0),
        member("signal_type_write", 1),
    ],
};

static SEM_SEL: EnumDef = EnumDef {
    name: "sem_sel",
    members: &[member("signal_semaphore", 6), member("wait_semaphore", 7)],
};

static MEM_SEMAPHORE: PacketDef = packet! {
    MemSemaphore, ALL,
    sizes: [size!(4)],
    addresses: [pair!("address", "address_lo", "address_hi")],
    ordinals: [
        ord![addr("address_lo", 3)],
        ord![dword("address_hi")],
        ord![
            e("use_mailbox", 16, 1, &USE_MAILBOX),
            e("signal_type", 20, 1, &SIGNAL_TYPE),
            e("sem_sel", 29, 3, &SEM_SEL),
        ],
    ],
};

// ============================================================================
// RELEASE_MEM
// ============================================================================

static RELEASE_EVENT_INDEX: EnumDef = EnumDef {
    name: "event_index",
    members: &[member("end_of_pipe", 5), member("shader_done", 6)],
};

static RELEASE_DST_SEL: EnumDef = EnumDef {
    name: "dst_sel",
    members: &[
        member("memory_controller", 0),
        member("tc_l2", 1),
        member_on("queue_write_pointer_register", 2, GenerationSet::GFX9),
        member_on("queue_write_pointer_poll_mask_bit", 3, GenerationSet::GFX9),
    ],
};

static INT_SEL: EnumDef = EnumDef {
    name: "int_sel",
    members: &[
        member("none", 0),
        member("send_interrupt_only", 1),
        member("send_interrupt_after_write_confirm", 2),
        member("send_data_and_write_confirm", 3),
        member("unconditionally_send_int_ctxid", 4),
        member("conditionally_send_int_ctxid_based_on_32_bit_compare", 5),
        member("conditionally_send_int_ctxid_based_on_64_bit_compare", 6),
    ],
};

static DATA_SEL: EnumDef = EnumDef {
    name: "data_sel",
    members: &[
        member("none", 0),
        member("send_32_bit_low", 1),
        member("send_64_bit_data", 2),
        member("send_gpu_clock_counter", 3),
        member("send_system_clock_counter", 4),
        member("store_gds_data_to_memory", 5),
    ],
};

static MES_ACTION_ID: EnumDef = EnumDef {
    name: "mes_action_id",
    members: &[
        member_on("no_mes_notification", 0, GenerationSet::GFX10_PLUS),
        member_on("interrupt_and_fence", 1, GenerationSet::GFX10_PLUS),
        member_on("interrupt_no_fence_then_address_payload", 2, GenerationSet::GFX10_PLUS),
        member_on("interrupt_and_address_payload", 3, GenerationSet::GFX10_PLUS),
    ],
};

static RELEASE_MEM: PacketDef = packet! {
    ReleaseMem, ALL,
    sizes: [size!(8)],
    addresses: [
        pair!("address32", "address_lo_32b", "address_hi"),
        pair!("address64", "address_lo_64b", "address_hi"),
        pair!("data", "data_lo", "data_hi"),
        pair!("cmp_data", "cmp_data_lo", "cmp_data_hi"),
    ],
    ordinals: [
        ord![
            f("event_type", 0, 6),
            f("wait_dma", 7, 1).only(GenerationSet::GFX10_PLUS),
            e("event_index", 8, 4, &RELEASE_EVENT_INDEX),
            f("tcl1_vol_action_ena", 12, 1).only(GenerationSet::GFX9),
            f("tc_vol_action_ena", 13, 1).only(GenerationSet::GFX9),
            f("tc_wb_action_ena", 15, 1).only(GenerationSet::GFX9),
            f("tcl1_action_ena", 16, 1).only(GenerationSet::GFX9),
            f("tc_action_ena", 17, 1).only(GenerationSet::GFX9),
            f("tc_nc_action_ena", 19, 1).only(GenerationSet::GFX9),
            f("tc_wc_action_ena", 20, 1).only(GenerationSet::GFX9),
            f("tc_md_action_ena", 21, 1).only(GenerationSet::GFX9),
            f("gcr_cntl", 12, 12).only(GenerationSet::GFX10_PLUS),
            e("cache_policy", 25, 2, &CACHE_POLICY),
            f("execute", 28, 1),
        ],
        ord![
            e("dst_sel", 16, 2, &RELEASE_DST_SEL),
            f("mes_intr_pipe", 20, 2).only(GenerationSet::GFX10_PLUS),
            e("mes_action_id", 22, 2, &MES_ACTION_ID).only(GenerationSet::GFX10_PLUS),
            e("int_sel", 24, 3, &INT_SEL),
            e("data_sel", 29, 3, &DATA_SEL),
        ],
        alt![
            var!(default "addr32"; addr("address_lo_32b", 2)),
            var!("addr64" when ["data_sel" in [2, 3, 4]]; addr("address_lo_64b", 3)),
        ],
        ord![dword("address_hi")],
        alt![
            var!("gds" when ["data_sel" in [5]]; f("dw_offset", 0, 16), f("num_dwords", 16, 16)),
            var!("cmp" when ["int_sel" in [5, 6]]; dword("cmp_data_lo")),
            var!(default "data"; dword("data_lo")),
        ],
        alt![
            var!("cmp" when ["int_sel" in [5, 6]]; dword("cmp_data_hi")),
            var!(default "data"; dword("data_hi")),
        ],
        ord![
            dword("int_ctxid").only(GenerationSet::GFX9),
            f("int_ctxid", 0, 28).only(GenerationSet::GFX10_PLUS),
        ],
    ],
};

// ============================================================================
// WAIT_REG_MEM / WAIT_REG_MEM64
// ============================================================================

static MEM_SPACE: EnumDef = EnumDef {
    name: "mem_space",
    members: &[member("register_space", 0), member("memory_space", 1)],
};

static WAIT_OPERATION: EnumDef = EnumDef {
    name: "operation",
    members: &[
        member("wait_reg_mem", 0),
        member("wait_reg_mem_cond", 2),
        member("wait_mem_preemptable", 3),
    ],
};

static WAIT_REG_MEM: PacketDef = packet! {
    WaitRegMem, ALL,
    sizes: [size!(7)],
    addresses: [pair!("mem_poll_addr", "mem_poll_addr_lo", "mem_poll_addr_hi")],
    ordinals: [
        ord![
            e("function", 0, 3, &COMPARE_FUNCTION),
            e("mem_space", 4, 2, &MEM_SPACE),
            e("operation", 6, 2, &WAIT_OPERATION),
            e("engine_sel", 8, 2, &MICRO_ENGINE),
            f("mes_intr_pipe", 22, 2).only(GenerationSet::GFX10_PLUS),
            f("mes_action", 24, 1).only(GenerationSet::GFX10_PLUS),
            e("cache_policy", 25, 2, &CACHE_POLICY).only(GenerationSet::GFX10_PLUS),
        ],
        alt![
            var!("mem" when ["mem_space" in [1]]; addr("mem_poll_addr_lo", 2)),
            var!("reg_poll" when ["mem_space" in [0], "operation" in [0, 3]]; f("reg_poll_addr", 0, 18)),
            var!("reg_write" when ["mem_space" in [0], "operation" in [2]]; f("reg_write_addr1", 0, 18)),
        ],
        alt![
            var!("mem" when ["mem_space" in [1]]; dword("mem_poll_addr_hi")),
            var!("reg" when ["mem_space" in [0]]; f("reg_write_addr2", 0, 18)),
        ],
        ord![dword("reference")],
        ord![dword("mask")],
        ord![f("poll_interval", 0, 16)],
    ],
};

/// 64-bit compare: the poll address must be 8-byte aligned
static WAIT_REG_MEM64: PacketDef = packet! {
    WaitRegMem64, ALL,
    sizes: [size!(9)],
    addresses: [
        pair!("mem_poll_addr", "mem_poll_addr_lo", "mem_poll_addr_hi"),
        pair!("reference", "reference", "reference_hi"),
        pair!("mask", "mask", "mask_hi"),
    ],
    ordinals: [
        ord![
            e("function", 0, 3, &COMPARE_FUNCTION),
            e("mem_space", 4, 2, &MEM_SPACE),
            e("operation", 6, 2, &WAIT_OPERATION),
            e("engine_sel", 8, 2, &MICRO_ENGINE),
            f("mes_intr_pipe", 22, 2).only(GenerationSet::GFX10_PLUS),
            f("mes_action", 24, 1).only(GenerationSet::GFX10_PLUS),
            e("cache_policy", 25, 2, &CACHE_POLICY).only(GenerationSet::GFX10_PLUS),
        ],
        alt![
            var!("mem" when ["mem_space" in [1]]; addr("mem_poll_addr_lo", 3)),
            var!("reg_poll" when ["mem_space" in [0], "operation" in [0, 3]]; f("reg_poll_addr", 0, 18)),
            var!("reg_write" when ["mem_space" in [0], "operation" in [2]]; f("reg_write_addr1", 0, 18)),
        ],
        alt![
            var!("mem" when ["mem_space" in [1]]; dword("mem_poll_addr_hi")),
            var!("reg" when ["mem_space" in [0]]; f("reg_write_addr2", 0, 18)),
        ],
        ord![dword("reference")],
        ord![dword("reference_hi")],
        ord![dword("mask")],
        ord![dword("mask_hi")],
        ord![f("poll_interval", 0, 16)],
    ],
};
