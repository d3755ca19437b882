use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use dvb_fec_simd::{CodeRate, Constellation, FecFrameEncoder, FrameSize, Standard};

fn encode_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for (label, framesize, rate) in [
        ("normal-1/2", FrameSize::Normal, CodeRate::C1_2),
        ("normal-8/9", FrameSize::Normal, CodeRate::C8_9),
        ("short-3/5", FrameSize::Short, CodeRate::C3_5),
    ] {
        let mut encoder =
            FecFrameEncoder::new(Standard::DvbS2, framesize, rate, Constellation::Qpsk).unwrap();
        let payload = vec![1u8; encoder.payload_bits()];
        let mut frame = vec![0u8; encoder.frame_bits()];

        group.throughput(Throughput::Elements(frame.len() as u64));
        group.bench_function(label, |b| {
            b.iter(|| encoder.encode_frame(&payload, &mut frame).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, encode_frames);
criterion_main!(benches);
