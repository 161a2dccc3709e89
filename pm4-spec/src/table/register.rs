//! Register loads, sets and read-modify-writes.

use crate::layout::{addr, dword, e, f, member, EnumDef, PacketDef};

pub(super) static PACKETS: &[&PacketDef] = &[
    &CONTEXT_REG_RMW,
    &REG_RMW,
    &LOAD_CONFIG_REG,
    &LOAD_CONTEXT_REG,
    &LOAD_SH_REG,
    &LOAD_UCONFIG_REG,
    &LOAD_CONTEXT_REG_INDEX,
    &LOAD_SH_REG_INDEX,
    &LOAD_UCONFIG_REG_INDEX,
    &SET_CONFIG_REG,
    &SET_CONTEXT_REG,
    &SET_CONTEXT_REG_INDEX,
    &SET_SH_REG,
    &SET_SH_REG_INDEX,
    &SET_SH_REG_OFFSET,
    &SET_UCONFIG_REG,
    &SET_UCONFIG_REG_INDEX,
];

// ============================================================================
// Read-modify-write
// ============================================================================

static CONTEXT_REG_RMW: PacketDef = packet! {
    ContextRegRmw, ALL,
    sizes: [size!(4)],
    ordinals: [
        ord![f("reg_offset", 0, 16)],
        ord![dword("reg_mask")],
        ord![dword("reg_data")],
    ],
};

static SHADOW_BASE_SEL: EnumDef = EnumDef {
    name: "shadow_base_sel",
    members: &[member("no_shadow", 0), member("shadow_global_uconfig", 1)],
};

static OR_MASK_SRC: EnumDef = EnumDef {
    name: "or_mask_src",
    members: &[member("immediate", 0), member("reg_or_addr", 1)],
};

static AND_MASK_SRC: EnumDef = EnumDef {
    name: "and_mask_src",
    members: &[member("immediate", 0), member("reg_and_addr", 1)],
};

static REG_RMW: PacketDef = packet! {
    RegRmw, ALL,
    sizes: [size!(4)],
    ordinals: [
        ord![
            f("mod_addr", 0, 18),
            e("shadow_base_sel", 24, 2, &SHADOW_BASE_SEL),
            e("or_mask_src", 30, 1, &OR_MASK_SRC),
            e("and_mask_src", 31, 1, &AND_MASK_SRC),
        ],
        alt![
            var!("and_mask" when ["and_mask_src" in [0]]; dword("and_mask")),
            var!("and_addr" when ["and_mask_src" in [1]]; f("and_addr", 0, 18)),
        ],
        alt![
            var!("or_mask" when ["or_mask_src" in [0]]; dword("or_mask")),
            var!("or_addr" when ["or_mask_src" in [1]]; f("or_addr", 0, 18)),
        ],
    ],
};

// ============================================================================
// Register loads
// ============================================================================

static LOAD_CONFIG_REG: PacketDef = packet! {
    LoadConfigReg, ALL,
    sizes: [size!(5)],
    addresses: [pair!("base_addr", "base_addr_lo", "base_addr_hi")],
    ordinals: [
        ord![addr("base_addr_lo", 2)],
        ord![dword("base_addr_hi")],
        ord![f("reg_offset", 0, 16)],
        ord![f("num_dwords", 0, 14)],
    ],
};

static LOAD_CONTEXT_REG: PacketDef = packet! {
    LoadContextReg, ALL,
    sizes: [size!(5)],
    addresses: [pair!("base_addr", "base_addr_lo", "base_addr_hi")],
    ordinals: [
        ord![addr("base_addr_lo", 2)],
        ord![dword("base_addr_hi")],
        ord![f("reg_offset", 0, 16)],
        ord![f("num_dwords", 0, 14)],
    ],
};

static LOAD_SH_REG: PacketDef = packet! {
    LoadShReg, ALL,
    sizes: [size!(5)],
    addresses: [pair!("base_address", "base_address_lo", "base_address_hi")],
    ordinals: [
        ord![addr("base_address_lo", 2)],
        ord![dword("base_address_hi")],
        ord![f("reg_offset", 0, 16)],
        ord![f("num_dword", 0, 14)],
    ],
};

static LOAD_UCONFIG_REG: PacketDef = packet! {
    LoadUconfigReg, ALL,
    sizes: [size!(5)],
    addresses: [pair!("base_address", "base_address_lo", "base_address_hi")],
    ordinals: [
        ord![addr("base_address_lo", 2)],
        ord![dword("base_address_hi")],
        ord![f("reg_offset", 0, 16)],
        ord![f("num_dwords", 0, 14)],
    ],
};

static LOAD_INDEX: EnumDef = EnumDef {
    name: "index",
    members: &[member("direct_addr", 0), member("offset", 1)],
};

static LOAD_DATA_FORMAT: EnumDef = EnumDef {
    name: "data_format",
    members: &[member("offset_and_size", 0), member("offset_and_data", 1)],
};

static LOAD_CONTEXT_REG_INDEX: PacketDef = packet! {
    LoadContextRegIndex, ALL,
    sizes: [size!(5)],
    addresses: [pair!("mem_addr", "mem_addr_lo", "mem_addr_hi")],
    ordinals: [
        ord![e("index", 0, 1, &LOAD_INDEX), addr("mem_addr_lo", 2)],
        alt![
            var!("direct_addr" when ["index" in [0]]; dword("mem_addr_hi")),
            var!("offset" when ["index" in [1]]; dword("addr_offset")),
        ],
        ord![f("reg_offset", 0, 16), e("data_format", 31, 1, &LOAD_DATA_FORMAT)],
        ord![f("num_dwords", 0, 14)],
    ],
};

static LOAD_SH_REG_INDEX: PacketDef = packet! {
    LoadShRegIndex, ALL,
    sizes: [size!(5)],
    addresses: [pair!("mem_addr", "mem_addr_lo", "mem_addr_hi")],
    ordinals: [
        ord![e("index", 0, 1, &LOAD_INDEX), addr("mem_addr_lo", 2)],
        alt![
            var!("direct_addr" when ["index" in [0]]; dword("mem_addr_hi")),
            var!("offset" when ["index" in [1]]; dword("addr_offset")),
        ],
        ord![f("reg_offset", 0, 16), e("data_format", 31, 1, &LOAD_DATA_FORMAT)],
        ord![f("num_dwords", 0, 14)],
    ],
};

static LOAD_UCONFIG_REG_INDEX: PacketDef = packet! {
    LoadUconfigRegIndex, GFX10_PLUS,
    sizes: [size!(5)],
    addresses: [pair!("mem_addr", "mem_addr_lo", "mem_addr_hi")],
    ordinals: [
        ord![e("index", 0, 1, &LOAD_INDEX), addr("mem_addr_lo", 2)],
        alt![
            var!("direct_addr" when ["index" in [0]]; dword("mem_addr_hi")),
            var!("offset" when ["index" in [1]]; dword("addr_offset")),
        ],
        ord![f("reg_offset", 0, 16), e("data_format", 31, 1, &LOAD_DATA_FORMAT)],
        ord![f("num_dwords", 0, 14)],
    ],
};

// ============================================================================
// Register sets: fixed offset ordinal followed by register values
// ============================================================================

static SET_CONFIG_REG: PacketDef = packet! {
    SetConfigReg, ALL,
    sizes: [size!(2)],
    payload: ("data", 1),
    ordinals: [ord![f("reg_offset", 0, 16)]],
};

static SET_CONTEXT_REG: PacketDef = packet! {
    SetContextReg, ALL,
    sizes: [size!(2)],
    payload: ("data", 1),
    ordinals: [ord![f("reg_offset", 0, 16)]],
};

static SET_CONTEXT_REG_INDEX: PacketDef = packet! {
    SetContextRegIndex, GFX9,
    sizes: [size!(2)],
    payload: ("data", 1),
    ordinals: [ord![f("reg_offset", 0, 16)]],
};

static SET_SH_REG: PacketDef = packet! {
    SetShReg, ALL,
    sizes: [size!(2)],
    payload: ("data", 1),
    ordinals: [ord![f("reg_offset", 0, 16)]],
};

static SET_SH_INDEX: EnumDef = EnumDef {
    name: "index",
    members: &[member("apply_kmd_cu_and_mask", 3)],
};

static SET_SH_REG_INDEX: PacketDef = packet! {
    SetShRegIndex, ALL,
    sizes: [size!(2)],
    payload: ("data", 1),
    ordinals: [ord![f("reg_offset", 0, 16), e("index", 28, 4, &SET_SH_INDEX)]],
};

static SET_SH_OFFSET_INDEX: EnumDef = EnumDef {
    name: "index",
    members: &[
        member("normal_operation", 0),
        member("data_indirect_2dw_256b", 1),
        member("data_indirect_1dw", 2),
    ],
};

static SET_SH_REG_OFFSET: PacketDef = packet! {
    SetShRegOffset, ALL,
    sizes: [size!(4)],
    ordinals: [
        ord![f("reg_offset", 0, 16), e("index", 30, 2, &SET_SH_OFFSET_INDEX)],
        ord![dword("calculated_lo")],
        ord![f("calculated_hi", 0, 16), f("driver_data", 16, 16)],
    ],
};

static SET_UCONFIG_REG: PacketDef = packet! {
    SetUconfigReg, ALL,
    sizes: [size!(2)],
    payload: ("data", 1),
    ordinals: [ord![f("reg_offset", 0, 16)]],
};

static SET_UCONFIG_REG_INDEX: PacketDef = packet! {
    SetUconfigRegIndex, ALL,
    sizes: [size!(2)],
    payload: ("data", 1),
    ordinals: [ord![f("reg_offset", 0, 16)]],
};
