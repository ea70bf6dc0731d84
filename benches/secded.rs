use criterion::{black_box, criterion_group, criterion_main, Criterion};
use secded::ecc::{hamming, Codeword, DataWidth};

fn sample(width: DataWidth) -> Codeword {
    (0..width.data_len()).map(|i| i % 3 == 0).collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for width in DataWidth::ALL {
        let data = sample(width);
        group.bench_function(format!("{}-bit", width.data_len()), |b| {
            b.iter(|| hamming::encode(black_box(&data)))
        });
    }
    group.finish();
}

fn bench_correct(c: &mut Criterion) {
    let mut group = c.benchmark_group("correct");
    for width in DataWidth::ALL {
        let mut codeword = hamming::encode(&sample(width)).unwrap();
        hamming::flip_bit(&mut codeword, 3).unwrap();
        group.bench_function(format!("{}-bit single error", width.data_len()), |b| {
            b.iter(|| hamming::correct(black_box(&codeword)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_correct);
criterion_main!(benches);
