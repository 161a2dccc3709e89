use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pm4_spec::{decode, encode, Codec, Generation, Opcode, PacketDescriptor};

fn packets() -> Vec<(&'static str, PacketDescriptor)> {
    vec![
        (
            "draw_index_auto",
            PacketDescriptor::new(Opcode::DrawIndexAuto, Generation::Gfx10)
                .field("index_count", 3)
                .field("draw_initiator", 2),
        ),
        (
            "release_mem",
            PacketDescriptor::new(Opcode::ReleaseMem, Generation::Gfx11)
                .field("event_type", 0x14)
                .field("event_index", 5)
                .field("data_sel", 1)
                .field("int_sel", 2)
                .field("address_lo_32b", 0x1000)
                .field("address_hi", 0xFF)
                .field("data_lo", 0xCAFE),
        ),
        (
            "set_sh_reg_16",
            PacketDescriptor::new(Opcode::SetShReg, Generation::Gfx10)
                .field("reg_offset", 0x2C)
                .payload((0..16).collect()),
        ),
    ]
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for (name, desc) in packets() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &desc, |b, desc| {
            b.iter(|| encode(black_box(desc)))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for (name, desc) in packets() {
        let words = encode(&desc).unwrap();
        group.throughput(Throughput::Elements(words.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &words, |b, words| {
            b.iter(|| decode(black_box(words), desc.generation))
        });
    }
    group.finish();
}

fn bench_stream(c: &mut Criterion) {
    let codec = Codec::default();
    let descs: Vec<_> = packets().into_iter().map(|(_, d)| d).cycle().take(300).collect();
    c.bench_function("encode_into_300", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(2048);
            for desc in &descs {
                codec.encode_into(black_box(desc), &mut out).unwrap();
            }
            out
        })
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_stream);
criterion_main!(benches);
