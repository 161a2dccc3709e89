//! Worked packet scenarios: generation-dependent length, optional address
//! groups, alignment reservations and header type checks.

use pm4_spec::{
    decode, encode, resolve_size, validate, Catalog, ErrorKind, FieldError, Generation, Opcode,
    PacketDescriptor, Pm4Error,
};

// ============================================================================
// ACQUIRE_MEM: cache-control ordinal on gfx10+
// ============================================================================

#[test]
fn test_acquire_mem_gfx10_has_cache_control() {
    let desc = PacketDescriptor::new(Opcode::AcquireMem, Generation::Gfx10)
        .field("coher_cntl", 0)
        .field("engine_sel", 1)
        .field("coher_size", 0xFFFF_FFFF)
        .field("coher_size_hi", 0xFF)
        .field("poll_interval", 10)
        .field("gcr_cntl", 0x0004_2A5);

    let words = encode(&desc).unwrap();
    assert_eq!(words.len(), 8);
    assert_eq!(words[0], 0xC006_5800);
    assert_eq!(words[1], 0x8000_0000);
    assert_eq!(words[7], 0x0004_2A5);

    let decoded = decode(&words, Generation::Gfx10).unwrap();
    assert_eq!(decoded.get("gcr_cntl"), Some(0x0004_2A5));
}

#[test]
fn test_acquire_mem_gfx9_rejects_cache_control() {
    let base = PacketDescriptor::new(Opcode::AcquireMem, Generation::Gfx9)
        .field("engine_sel", 1)
        .field("coher_size", 0x1000);

    let words = encode(&base).unwrap();
    assert_eq!(words.len(), 7);
    assert_eq!(words[0], 0xC005_5800);

    let err = encode(&base.field("gcr_cntl", 0x0004_2A5)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Capability);
    assert_eq!(
        err.field_errors(),
        &[FieldError::Unsupported {
            field: "gcr_cntl".to_string(),
            generation: Generation::Gfx9,
        }]
    );
}

// ============================================================================
// DRAW_INDEX_2: short form versus explicit index buffer
// ============================================================================

#[test]
fn test_draw_index_2_short_form() {
    let desc = PacketDescriptor::new(Opcode::DrawIndex2, Generation::Gfx10)
        .field("index_count", 36)
        .field("draw_initiator", 0);
    let words = encode(&desc).unwrap();
    assert_eq!(words, vec![0xC001_2700, 36, 0]);
}

#[test]
fn test_draw_index_2_with_index_buffer() {
    let desc = PacketDescriptor::new(Opcode::DrawIndex2, Generation::Gfx10)
        .field("max_size", 36)
        .with_address("index_base", 0x0000_8000_1234_0000)
        .unwrap()
        .field("index_count", 36);

    let words = encode(&desc).unwrap();
    assert_eq!(words, vec![0xC004_2700, 36, 0x1234_0000, 0x8000, 36, 0]);
    assert_eq!(
        resolve_size(Opcode::DrawIndex2, Generation::Gfx10, desc.present_fields()).unwrap(),
        6
    );

    let decoded = decode(&words, Generation::Gfx10).unwrap();
    assert_eq!(decoded.address("index_base"), Some(0x0000_8000_1234_0000));
}

#[test]
fn test_draw_index_2_low_half_only() {
    let desc = PacketDescriptor::new(Opcode::DrawIndex2, Generation::Gfx10)
        .field("index_base_lo", 0x1234_0000)
        .field("index_count", 36);

    let result = validate(&desc).unwrap();
    assert!(!result.is_valid());
    assert_eq!(
        result.errors,
        vec![FieldError::IncompleteGroup {
            group: "draw_with_addr",
            field: "index_base_hi",
        }]
    );
    assert_eq!(encode(&desc).unwrap_err().kind(), ErrorKind::AmbiguousLength);
}

// ============================================================================
// WAIT_REG_MEM / WAIT_REG_MEM64: poll address alignment
// ============================================================================

fn wait(opcode: Opcode, poll_address: u64) -> PacketDescriptor {
    PacketDescriptor::new(opcode, Generation::Gfx10)
        .field("function", 3)
        .field("mem_space", 1)
        .with_address("mem_poll_addr", poll_address)
        .unwrap()
}

#[test]
fn test_poll_address_alignment_bits() {
    let catalog = Catalog::global();
    let wide = catalog
        .field_spec(Opcode::WaitRegMem64, Generation::Gfx10, "mem_poll_addr_lo")
        .unwrap();
    let narrow = catalog
        .field_spec(Opcode::WaitRegMem, Generation::Gfx10, "mem_poll_addr_lo")
        .unwrap();
    assert_eq!(wide.offset, 3);
    assert_eq!(narrow.offset, 2);
}

#[test]
fn test_poll_address_misaligned() {
    assert!(encode(&wait(Opcode::WaitRegMem, 0x1004)).is_ok());

    let err = encode(&wait(Opcode::WaitRegMem64, 0x1004)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReservedBits);

    let err = encode(&wait(Opcode::WaitRegMem, 0x1002)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReservedBits);
}

#[test]
fn test_poll_address_misaligned_on_decode() {
    let mut words = encode(&wait(Opcode::WaitRegMem64, 0x1008)).unwrap();
    assert_eq!(words.len(), 9);
    words[2] |= 0x4;
    let err = decode(&words, Generation::Gfx10).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReservedBits);
}

// ============================================================================
// Header type
// ============================================================================

#[test]
fn test_decode_rejects_non_type3() {
    for header in [0x0000_0000u32, 0x4000_1000, 0x8002_1000] {
        let err = decode(&[header, 0xFFFF_FFFF, 0xFFFF_FFFF], Generation::Gfx9).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(matches!(err, Pm4Error::Format { word, .. } if word == header));
    }
}

// ============================================================================
// Mode-flag driven variants
// ============================================================================

#[test]
fn test_release_mem_data_variants() {
    // 64-bit data to an 8-byte aligned address with a compare interrupt
    let desc = PacketDescriptor::new(Opcode::ReleaseMem, Generation::Gfx11)
        .field("event_type", 0x14)
        .field("event_index", 5)
        .field("data_sel", 2)
        .field("int_sel", 6)
        .with_address("address64", 0x0000_00FF_0000_1000)
        .unwrap()
        .with_address("cmp_data", 0xAABB_CCDD_0011_2233)
        .unwrap();

    let words = encode(&desc).unwrap();
    assert_eq!(words.len(), 8);
    assert_eq!(words[1], 0x0000_0514);
    assert_eq!(words[2], 0x4600_0000);
    assert_eq!(words[3], 0x0000_1000);
    assert_eq!(words[4], 0xFF);
    assert_eq!(words[5], 0x0011_2233);
    assert_eq!(words[6], 0xAABB_CCDD);

    let decoded = decode(&words, Generation::Gfx11).unwrap();
    assert_eq!(decoded.address("cmp_data"), Some(0xAABB_CCDD_0011_2233));
    assert_eq!(decoded.get("data_lo"), None);
}

#[test]
fn test_copy_data_register_to_memory() {
    let desc = PacketDescriptor::new(Opcode::CopyData, Generation::Gfx9)
        .field("src_sel", 0)
        .field("dst_sel", 5)
        .field("src_reg_offset", 0x2C40)
        .with_address("dst_addr32", 0x0000_0001_0000_0100)
        .unwrap()
        .field("src_imm_data", 0);

    let words = encode(&desc).unwrap();
    assert_eq!(words, vec![0xC004_4000, 0x0000_0500, 0x2C40, 0, 0x100, 0x1]);
}

#[test]
fn test_enum_member_gated_by_generation() {
    // queue write pointer destinations went away after gfx9
    let desc = |generation| {
        PacketDescriptor::new(Opcode::ReleaseMem, generation)
            .field("event_index", 5)
            .field("dst_sel", 2)
    };
    assert!(encode(&desc(Generation::Gfx9)).is_ok());

    let err = encode(&desc(Generation::Gfx10)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Capability);
    assert!(matches!(
        &err.field_errors()[0],
        FieldError::UnsupportedValue { member: "queue_write_pointer_register", .. }
    ));
}

#[test]
fn test_serde_roundtrip() {
    let desc = PacketDescriptor::new(Opcode::DrawIndexIndirectMulti, Generation::Gfx10)
        .variant("with_addr")
        .field("data_offset", 0x100)
        .field("base_vtx_loc", 4)
        .field("start_inst_loc", 5)
        .predicate(true);

    let bytes = bincode::serialize(&desc).unwrap();
    let restored: PacketDescriptor = bincode::deserialize(&bytes).unwrap();
    assert_eq!(restored, desc);
    assert_eq!(encode(&restored).unwrap(), encode(&desc).unwrap());
}
