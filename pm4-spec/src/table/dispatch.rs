//! Compute and task/mesh dispatches.

use crate::layout::{addr, dword, f, PacketDef};

pub(super) static PACKETS: &[&PacketDef] = &[
    &DISPATCH_DIRECT,
    &DISPATCH_INDIRECT,
    &DISPATCH_MESH_INDIRECT_MULTI,
    &DISPATCH_TASKMESH_GFX,
    &DISPATCH_TASK_STATE_INIT,
];

static DISPATCH_DIRECT: PacketDef = packet! {
    DispatchDirect, ALL,
    sizes: [size!(5)],
    ordinals: [
        ord![dword("dim_x")],
        ord![dword("dim_y")],
        ord![dword("dim_z")],
        ord![dword("dispatch_initiator")],
    ],
};

static DISPATCH_INDIRECT: PacketDef = packet! {
    DispatchIndirect, ALL,
    sizes: [size!(3)],
    ordinals: [
        ord![dword("data_offset")],
        ord![dword("dispatch_initiator")],
    ],
};

static DISPATCH_MESH_INDIRECT_MULTI: PacketDef = packet! {
    DispatchMeshIndirectMulti, GFX10_PLUS,
    sizes: [size!(9)],
    addresses: [pair!("count_addr", "count_addr_lo", "count_addr_hi")],
    ordinals: [
        ord![dword("data_offset")],
        ord![f("xyz_dim_loc", 0, 16), f("draw_index_loc", 16, 16)],
        ord![
            f("use_vgprs", 28, 1),
            f("thread_trace_marker_enable", 29, 1),
            f("count_indirect_enable", 30, 1),
            f("draw_index_enable", 31, 1),
        ],
        ord![dword("count")],
        ord![addr("count_addr_lo", 2)],
        ord![dword("count_addr_hi")],
        ord![dword("stride")],
        ord![dword("draw_initiator")],
    ],
};

static DISPATCH_TASKMESH_GFX: PacketDef = packet! {
    DispatchTaskmeshGfx, GFX10_PLUS,
    sizes: [size!(4)],
    ordinals: [
        ord![f("xyz_dim_loc", 0, 16), f("ring_entry_loc", 16, 16)],
        ord![f("thread_trace_marker_enable", 31, 1)],
        ord![dword("draw_initiator")],
    ],
};

static DISPATCH_TASK_STATE_INIT: PacketDef = packet! {
    DispatchTaskStateInit, GFX10_PLUS,
    sizes: [size!(3)],
    addresses: [pair!("control_buf_addr", "control_buf_addr_lo", "control_buf_addr_hi")],
    ordinals: [
        ord![addr("control_buf_addr_lo", 8)],
        ord![dword("control_buf_addr_hi")],
    ],
};
