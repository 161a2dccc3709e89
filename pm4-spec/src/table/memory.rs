//! Memory writes, copies, DMA and atomics.

use super::{CACHE_POLICY, COMPARE_FUNCTION, MICRO_ENGINE};
use crate::generation::GenerationSet;
use crate::layout::{addr, dword, e, f, member, member_on, EnumDef, PacketDef};

pub(super) static PACKETS: &[&PacketDef] = &[
    &ATOMIC_GDS,
    &ATOMIC_MEM,
    &COND_WRITE,
    &COPY_DATA,
    &DMA_DATA,
    &DMA_DATA_FILL_MULTI,
    &PRIME_UTCL2,
    &STRMOUT_BUFFER_UPDATE,
    &WRITE_DATA,
];

// ============================================================================
// ATOMIC_GDS / ATOMIC_MEM
// ============================================================================

static ATOM_CMP_SWAP: EnumDef = EnumDef {
    name: "atom_cmp_swap",
    members: &[member("dont_repeat", 0), member("repeat_until_pass", 1)],
};

static ATOM_COMPLETE: EnumDef = EnumDef {
    name: "atom_complete",
    members: &[member("dont_wait", 0), member("wait_for_completion", 1)],
};

static ATOM_READ: EnumDef = EnumDef {
    name: "atom_read",
    members: &[member("dont_read_preop_data", 0), member("read_preop_data", 1)],
};

static ATOM_RD_CNTL: EnumDef = EnumDef {
    name: "atom_rd_cntl",
    members: &[
        member("32bits_1returnval", 0),
        member("32bits_2returnval", 1),
        member("64bits_1returnval", 2),
        member("64bits_2returnval", 3),
    ],
};

static ATOMIC_GDS: PacketDef = packet! {
    AtomicGds, ALL,
    sizes: [size!(11)],
    ordinals: [
        ord![
            f("atom_op", 0, 7).only(GenerationSet::GFX9),
            f("atom_op", 0, 8).only(GenerationSet::GFX10_PLUS),
            e("atom_cmp_swap", 16, 1, &ATOM_CMP_SWAP),
            e("atom_complete", 17, 1, &ATOM_COMPLETE),
            e("atom_read", 18, 1, &ATOM_READ),
            e("atom_rd_cntl", 19, 2, &ATOM_RD_CNTL),
            e("engine_sel", 30, 2, &MICRO_ENGINE),
        ],
        ord![f("auto_inc_bytes", 0, 6), f("dmode", 8, 1)],
        ord![f("atom_base", 0, 16)],
        ord![f("atom_size", 0, 16)],
        ord![f("atom_offset0", 0, 8), f("atom_offset1", 16, 8)],
        ord![dword("atom_dst")],
        ord![dword("atom_src0")],
        ord![dword("atom_src0_u")],
        ord![dword("atom_src1")],
        ord![dword("atom_src1_u")],
    ],
};

static ATOMIC_MEM_COMMAND: EnumDef = EnumDef {
    name: "command",
    members: &[
        member("single_pass_atomic", 0),
        member("loop_until_compare_satisfied", 1),
        member_on("wait_for_write_confirmation", 2, GenerationSet::GFX10_PLUS),
        member_on("send_and_continue", 3, GenerationSet::GFX10_PLUS),
    ],
};

static ATOMIC_MEM: PacketDef = packet! {
    AtomicMem, ALL,
    sizes: [size!(9)],
    addresses: [
        pair!("addr", "addr_lo", "addr_hi"),
        pair!("src_data", "src_data_lo", "src_data_hi"),
        pair!("cmp_data", "cmp_data_lo", "cmp_data_hi"),
    ],
    ordinals: [
        ord![
            f("atomic", 0, 7),
            e("command", 8, 4, &ATOMIC_MEM_COMMAND),
            e("cache_policy", 25, 2, &CACHE_POLICY),
            e("engine_sel", 30, 2, &MICRO_ENGINE),
        ],
        ord![dword("addr_lo")],
        ord![dword("addr_hi")],
        ord![dword("src_data_lo")],
        ord![dword("src_data_hi")],
        ord![dword("cmp_data_lo")],
        ord![dword("cmp_data_hi")],
        ord![f("loop_interval", 0, 13)],
    ],
};

// ============================================================================
// COND_WRITE
// ============================================================================

static POLL_SPACE: EnumDef = EnumDef {
    name: "poll_space",
    members: &[member("register", 0), member("memory", 1)],
};

static WRITE_SPACE: EnumDef = EnumDef {
    name: "write_space",
    members: &[member("register", 0), member("memory", 1), member("scratch", 2)],
};

static COND_WRITE: PacketDef = packet! {
    CondWrite, ALL,
    sizes: [size!(9)],
    addresses: [
        pair!("poll_address", "poll_address_lo", "poll_address_hi"),
        pair!("write_address", "write_address_lo", "write_address_hi"),
    ],
    ordinals: [
        ord![
            e("function", 0, 3, &COMPARE_FUNCTION),
            e("poll_space", 4, 1, &POLL_SPACE),
            e("write_space", 8, 2, &WRITE_SPACE),
        ],
        ord![dword("poll_address_lo")],
        ord![dword("poll_address_hi")],
        ord![dword("reference")],
        ord![dword("mask")],
        ord![dword("write_address_lo")],
        ord![dword("write_address_hi")],
        ord![dword("write_data")],
    ],
};

// ============================================================================
// COPY_DATA
// ============================================================================

static COPY_SRC_SEL: EnumDef = EnumDef {
    name: "src_sel",
    members: &[
        member("mem_mapped_register", 0),
        member_on("memory", 1, GenerationSet::GFX9),
        member_on("tc_l2_obsolete", 1, GenerationSet::GFX10_PLUS),
        member("tc_l2", 2),
        member("gds", 3),
        member("perfcounters", 4),
        member("immediate_data", 5),
        member("atomic_return_data", 6),
        member("gds_atomic_return_data0", 7),
        member("gds_atomic_return_data1", 8),
        member("gpu_clock_count", 9),
        member("system_clock_count", 10),
    ],
};

static COPY_DST_SEL: EnumDef = EnumDef {
    name: "dst_sel",
    members: &[
        member("mem_mapped_register", 0),
        member("memory_sync_across_grbm", 1),
        member("tc_l2", 2),
        member("gds", 3),
        member("perfcounters", 4),
        member_on("memory", 5, GenerationSet::GFX9),
        member_on("tc_l2_obsolete", 5, GenerationSet::GFX10_PLUS),
    ],
};

static COUNT_SEL: EnumDef = EnumDef {
    name: "count_sel",
    members: &[member("32_bits_of_data", 0), member("64_bits_of_data", 1)],
};

static WR_CONFIRM: EnumDef = EnumDef {
    name: "wr_confirm",
    members: &[
        member("do_not_wait_for_confirmation", 0),
        member("wait_for_confirmation", 1),
    ],
};

static COPY_DATA: PacketDef = packet! {
    CopyData, ALL,
    sizes: [size!(6)],
    addresses: [
        pair!("src_addr32", "src_32b_addr_lo", "src_memtc_addr_hi"),
        pair!("src_addr64", "src_64b_addr_lo", "src_memtc_addr_hi"),
        pair!("dst_addr32", "dst_32b_addr_lo", "dst_addr_hi"),
        pair!("dst_addr64", "dst_64b_addr_lo", "dst_addr_hi"),
    ],
    ordinals: [
        ord![
            e("src_sel", 0, 4, &COPY_SRC_SEL),
            e("dst_sel", 8, 4, &COPY_DST_SEL),
            e("src_cache_policy", 13, 2, &CACHE_POLICY),
            e("count_sel", 16, 1, &COUNT_SEL),
            e("wr_confirm", 20, 1, &WR_CONFIRM),
            e("dst_cache_policy", 25, 2, &CACHE_POLICY),
            e("engine_sel", 30, 2, &MICRO_ENGINE),
        ],
        alt![
            var!("src_reg" when ["src_sel" in [0, 4]]; f("src_reg_offset", 0, 18)),
            var!("src_mem32" when ["src_sel" in [1, 2], "count_sel" in [0]]; addr("src_32b_addr_lo", 2)),
            var!("src_mem64" when ["src_sel" in [1, 2], "count_sel" in [1]]; addr("src_64b_addr_lo", 3)),
            var!("src_gds" when ["src_sel" in [3]]; f("src_gds_addr_lo", 0, 16)),
            var!(default "src_imm"; dword("imm_data")),
        ],
        alt![
            var!("src_addr_hi" when ["src_sel" in [1, 2]]; dword("src_memtc_addr_hi")),
            var!(default "src_imm_hi"; dword("src_imm_data")),
        ],
        alt![
            var!("dst_reg" when ["dst_sel" in [0, 4]]; f("dst_reg_offset", 0, 18)),
            var!("dst_mem32" when ["dst_sel" in [1, 2, 5], "count_sel" in [0]]; addr("dst_32b_addr_lo", 2)),
            var!("dst_mem64" when ["dst_sel" in [1, 2, 5], "count_sel" in [1]]; addr("dst_64b_addr_lo", 3)),
            var!("dst_gds" when ["dst_sel" in [3]]; f("dst_gds_addr_lo", 0, 16)),
        ],
        ord![dword("dst_addr_hi")],
    ],
};

// ============================================================================
// DMA_DATA / DMA_DATA_FILL_MULTI
// ============================================================================

static DMA_DST_SEL: EnumDef = EnumDef {
    name: "dst_sel",
    members: &[
        member("dst_addr_using_das", 0),
        member("gds", 1),
        member("dst_nowhere", 2),
        member("dst_addr_using_l2", 3),
    ],
};

static DMA_SRC_SEL: EnumDef = EnumDef {
    name: "src_sel",
    members: &[
        member("src_addr_using_sas", 0),
        member("gds", 1),
        member("data", 2),
        member("src_addr_using_l2", 3),
    ],
};

static ADDRESS_SPACE: EnumDef = EnumDef {
    name: "address_space",
    members: &[member("memory", 0), member("register", 1)],
};

static ADDRESS_INCREMENT: EnumDef = EnumDef {
    name: "address_increment",
    members: &[member("increment", 0), member("no_increment", 1)],
};

static DMA_DATA: PacketDef = packet! {
    DmaData, ALL,
    sizes: [size!(7)],
    addresses: [
        pair!("src_addr", "src_addr_lo_or_data", "src_addr_hi"),
        pair!("dst_addr", "dst_addr_lo", "dst_addr_hi"),
    ],
    ordinals: [
        ord![
            e("engine_sel", 0, 1, &MICRO_ENGINE),
            e("src_cache_policy", 13, 2, &CACHE_POLICY),
            e("dst_sel", 20, 2, &DMA_DST_SEL),
            e("dst_cache_policy", 25, 2, &CACHE_POLICY),
            e("src_sel", 29, 2, &DMA_SRC_SEL),
            f("cp_sync", 31, 1),
        ],
        ord![dword("src_addr_lo_or_data")],
        ord![dword("src_addr_hi")],
        ord![dword("dst_addr_lo")],
        ord![dword("dst_addr_hi")],
        ord![
            f("byte_count", 0, 26),
            e("sas", 26, 1, &ADDRESS_SPACE),
            e("das", 27, 1, &ADDRESS_SPACE),
            e("saic", 28, 1, &ADDRESS_INCREMENT),
            e("daic", 29, 1, &ADDRESS_INCREMENT),
            f("raw_wait", 30, 1),
            f("dis_wc", 31, 1),
        ],
    ],
};

static FILL_ENGINE_SEL: EnumDef = EnumDef {
    name: "engine_sel",
    members: &[member("micro_engine", 0), member("prefetch_parser", 1)],
};

static FILL_DST_SEL: EnumDef = EnumDef {
    name: "dst_sel",
    members: &[member("dst_addr_using_l2", 3)],
};

static FILL_SRC_SEL: EnumDef = EnumDef {
    name: "src_sel",
    members: &[member("data", 2)],
};

static DMA_DATA_FILL_MULTI: PacketDef = packet! {
    DmaDataFillMulti, ALL,
    sizes: [size!(7)],
    addresses: [pair!("dst_addr", "dst_addr_lo", "dst_addr_hi")],
    ordinals: [
        ord![
            e("engine_sel", 0, 1, &FILL_ENGINE_SEL),
            f("memlog_clear", 10, 1),
            e("dst_sel", 20, 2, &FILL_DST_SEL),
            e("dst_cache_policy", 25, 2, &CACHE_POLICY),
            e("src_sel", 29, 2, &FILL_SRC_SEL),
            f("cp_sync", 31, 1),
        ],
        ord![dword("byte_stride")],
        ord![dword("dma_count")],
        ord![dword("dst_addr_lo")],
        ord![dword("dst_addr_hi")],
        ord![f("byte_count", 0, 26)],
    ],
};

// ============================================================================
// PRIME_UTCL2
// ============================================================================

static CACHE_PERM: EnumDef = EnumDef {
    name: "cache_perm",
    members: &[member("read", 0), member("write", 1), member("execute", 2)],
};

static PRIME_MODE: EnumDef = EnumDef {
    name: "prime_mode",
    members: &[member("dont_wait_for_xack", 0), member("wait_for_xack", 1)],
};

static PRIME_UTCL2: PacketDef = packet! {
    PrimeUtcl2, GFX9,
    sizes: [size!(5)],
    addresses: [pair!("addr", "addr_lo", "addr_hi")],
    ordinals: [
        ord![
            e("cache_perm", 0, 3, &CACHE_PERM),
            e("prime_mode", 3, 1, &PRIME_MODE),
            e("engine_sel", 30, 2, &MICRO_ENGINE),
        ],
        ord![dword("addr_lo")],
        ord![dword("addr_hi")],
        ord![f("requested_pages", 0, 14)],
    ],
};

// ============================================================================
// STRMOUT_BUFFER_UPDATE
// ============================================================================

static UPDATE_MEMORY: EnumDef = EnumDef {
    name: "update_memory",
    members: &[
        member("dont_update_memory", 0),
        member("update_memory_at_dst_address", 1),
    ],
};

static SOURCE_SELECT: EnumDef = EnumDef {
    name: "source_select",
    members: &[
        member("use_buffer_offset", 0),
        member("read_vgt_strmout_buffer_filled_size", 1),
        member("from_src_address", 2),
        member("none", 3),
    ],
};

static DATA_TYPE: EnumDef = EnumDef {
    name: "data_type",
    members: &[member("dwords", 0), member("bytes", 1)],
};

static BUFFER_SELECT: EnumDef = EnumDef {
    name: "buffer_select",
    members: &[
        member("stream_out_buffer_0", 0),
        member("stream_out_buffer_1", 1),
        member("stream_out_buffer_2", 2),
        member("stream_out_buffer_3", 3),
    ],
};

static STRMOUT_BUFFER_UPDATE: PacketDef = packet! {
    StrmoutBufferUpdate, ALL,
    sizes: [size!(6)],
    addresses: [
        pair!("dst_address", "dst_address_lo", "dst_address_hi"),
        pair!("src_address", "offset_or_address_lo", "src_address_hi"),
    ],
    ordinals: [
        ord![
            e("update_memory", 0, 1, &UPDATE_MEMORY),
            e("source_select", 1, 2, &SOURCE_SELECT),
            e("data_type", 7, 1, &DATA_TYPE),
            e("buffer_select", 8, 2, &BUFFER_SELECT),
        ],
        ord![addr("dst_address_lo", 2)],
        ord![dword("dst_address_hi")],
        ord![dword("offset_or_address_lo")],
        ord![dword("src_address_hi")],
    ],
};

// ============================================================================
// WRITE_DATA
// ============================================================================

static WRITE_DST_SEL: EnumDef = EnumDef {
    name: "dst_sel",
    members: &[
        member("mem_mapped_register", 0),
        member("memory_sync_across_grbm", 1),
        member("tc_l2", 2),
        member("gds", 3),
        member("memory", 5),
    ],
};

static ADDR_INCR: EnumDef = EnumDef {
    name: "addr_incr",
    members: &[
        member("increment_address", 0),
        member("do_not_increment_address", 1),
    ],
};

static WRITE_CONFIRM: EnumDef = EnumDef {
    name: "wr_confirm",
    members: &[
        member("do_not_wait_for_write_confirmation", 0),
        member("wait_for_write_confirmation", 1),
    ],
};

static WRITE_DATA: PacketDef = packet! {
    WriteData, ALL,
    sizes: [size!(4)],
    addresses: [pair!("dst_mem_addr", "dst_mem_addr_lo", "dst_mem_addr_hi")],
    payload: ("data", 1),
    ordinals: [
        ord![
            e("dst_sel", 8, 4, &WRITE_DST_SEL),
            e("addr_incr", 16, 1, &ADDR_INCR),
            f("resume_vf", 19, 1).only(GenerationSet::GFX9),
            e("wr_confirm", 20, 1, &WRITE_CONFIRM),
            e("cache_policy", 25, 2, &CACHE_POLICY),
            e("engine_sel", 30, 2, &MICRO_ENGINE),
        ],
        alt![
            var!("mmreg" when ["dst_sel" in [0]]; f("dst_mmreg_addr", 0, 18)),
            var!("gds" when ["dst_sel" in [3]]; f("dst_gds_addr", 0, 16)),
            var!("mem" when ["dst_sel" in [1, 2, 5]]; addr("dst_mem_addr_lo", 2)),
        ],
        ord![dword("dst_mem_addr_hi")],
    ],
};
