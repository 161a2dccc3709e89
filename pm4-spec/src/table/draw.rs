//! Draw packets.
//!
//! Several draws have a short form that relies on previously programmed
//! state and a long form carrying explicit values. The long-form ordinals
//! form an optional group; supplying any of their fields selects it.

use crate::layout::{dword, f, PacketDef};

pub(super) static PACKETS: &[&PacketDef] = &[
    &DRAW_INDEX_2,
    &DRAW_INDEX_AUTO,
    &DRAW_INDEX_INDIRECT,
    &DRAW_INDEX_INDIRECT_MULTI,
    &DRAW_INDEX_MULTI_AUTO,
    &DRAW_INDEX_MULTI_INST,
    &DRAW_INDEX_OFFSET_2,
    &DRAW_INDIRECT,
    &DRAW_INDIRECT_MULTI,
];

static DRAW_INDEX_2: PacketDef = packet! {
    DrawIndex2, ALL,
    sizes: [size!(3), size!(6, groups: ["draw_with_addr"])],
    groups: [group!("draw_with_addr", keys: ["index_base_lo", "index_base_hi"])],
    addresses: [pair!("index_base", "index_base_lo", "index_base_hi")],
    ordinals: [
        ord!(group: "draw_with_addr"; dword("max_size")),
        ord!(group: "draw_with_addr"; dword("index_base_lo")),
        ord!(group: "draw_with_addr"; dword("index_base_hi")),
        ord![dword("index_count")],
        ord![dword("draw_initiator")],
    ],
};

static DRAW_INDEX_AUTO: PacketDef = packet! {
    DrawIndexAuto, ALL,
    sizes: [size!(3)],
    ordinals: [
        ord![dword("index_count")],
        ord![dword("draw_initiator")],
    ],
};

static DRAW_INDEX_INDIRECT: PacketDef = packet! {
    DrawIndexIndirect, ALL,
    sizes: [size!(2), size!(5, groups: ["draw_with_addr"])],
    groups: [group!("draw_with_addr")],
    ordinals: [
        ord![dword("data_offset")],
        ord!(group: "draw_with_addr"; f("base_vtx_loc", 0, 16), f("start_indx_loc", 16, 16)),
        ord!(group: "draw_with_addr"; f("start_inst_loc", 0, 16), f("start_indx_enable", 28, 1)),
        ord!(group: "draw_with_addr"; dword("draw_initiator")),
    ],
};

static DRAW_INDEX_INDIRECT_MULTI: PacketDef = packet! {
    DrawIndexIndirectMulti, ALL,
    sizes: [size!(2), size!(5, groups: ["draw_multi_with_addr"])],
    groups: [group!("draw_multi_with_addr")],
    ordinals: [
        ord![dword("data_offset")],
        alt!(group: "draw_multi_with_addr";
            var!("with_addr"; f("base_vtx_loc", 0, 16)),
            var!("user_vgprs"; f("start_indx_loc", 16, 16)),
            var!("vgpr_initiator"; dword("draw_initiator_use_vgprs")),
        ),
        alt!(group: "draw_multi_with_addr";
            var!("with_addr"; f("start_inst_loc", 0, 16)),
            var!("user_vgprs"; f("use_vgprs", 27, 1), f("start_indx_enable", 28, 1)),
        ),
        alt!(group: "draw_multi_with_addr";
            var!(default "initiator"; dword("draw_initiator")),
            var!("sgpr_initiator"; dword("draw_initiator_use_sgprs")),
        ),
    ],
};

static DRAW_INDEX_MULTI_AUTO: PacketDef = packet! {
    DrawIndexMultiAuto, ALL,
    sizes: [size!(4)],
    ordinals: [
        ord![dword("prim_count")],
        ord![dword("draw_initiator")],
        ord![f("index_offset", 0, 16), f("prim_type", 16, 5), f("index_count", 21, 11)],
    ],
};

static DRAW_INDEX_MULTI_INST: PacketDef = packet! {
    DrawIndexMultiInst, ALL,
    sizes: [size!(4)],
    ordinals: [
        ord![dword("instance_count")],
        ord![dword("index_count")],
        ord![dword("draw_initiator")],
    ],
};

static DRAW_INDEX_OFFSET_2: PacketDef = packet! {
    DrawIndexOffset2, ALL,
    sizes: [size!(3), size!(5, groups: ["draw_with_addr"])],
    groups: [group!("draw_with_addr")],
    ordinals: [
        ord!(group: "draw_with_addr"; dword("max_size")),
        ord!(group: "draw_with_addr"; dword("index_offset")),
        ord![dword("index_count")],
        ord![dword("draw_initiator")],
    ],
};

static DRAW_INDIRECT: PacketDef = packet! {
    DrawIndirect, ALL,
    sizes: [size!(2), size!(5, groups: ["draw_with_addr"])],
    groups: [group!("draw_with_addr")],
    ordinals: [
        ord![dword("data_offset")],
        ord!(group: "draw_with_addr"; f("start_vtx_loc", 0, 16)),
        ord!(group: "draw_with_addr"; f("start_inst_loc", 0, 16)),
        ord!(group: "draw_with_addr"; dword("draw_initiator")),
    ],
};

static DRAW_INDIRECT_MULTI: PacketDef = packet! {
    DrawIndirectMulti, ALL,
    sizes: [size!(2), size!(5, groups: ["draw_multi_with_addr"])],
    groups: [group!("draw_multi_with_addr")],
    ordinals: [
        ord![dword("data_offset")],
        alt!(group: "draw_multi_with_addr";
            var!(default "with_addr"; f("start_vtx_loc", 0, 16)),
            var!("vgpr_initiator"; dword("draw_initiator_use_vgprs")),
        ),
        ord!(group: "draw_multi_with_addr"; f("start_inst_loc", 0, 16)),
        alt!(group: "draw_multi_with_addr";
            var!(default "initiator"; dword("draw_initiator")),
            var!("sgpr_initiator"; dword("draw_initiator_use_sgprs")),
        ),
    ],
};
