use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use huffcode::compression::{
    compress, decompress, tokenize, CodeTable, FrequencyModel, PrefixTree, SymbolModel,
};

const WORDS: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "huffman", "prefix", "code",
    "tree", "symbol", "stream",
];

fn generate_prose(len: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::with_capacity(len + 16);
    while out.len() < len {
        out.push_str(WORDS[rng.gen_range(0..WORDS.len())]);
        out.push(match rng.gen_range(0..10) {
            0 => ',',
            1 => '.',
            2 => '\n',
            _ => ' ',
        });
    }
    out
}

fn bench_build_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");
    let text = generate_prose(1 << 16, 7);

    for model in [SymbolModel::Char, SymbolModel::Word] {
        group.bench_with_input(BenchmarkId::from_parameter(model), &model, |b, &model| {
            b.iter(|| {
                let tokens = tokenize(black_box(&text), model);
                let freq = FrequencyModel::from_tokens(&tokens);
                let tree = PrefixTree::build(&freq).unwrap();
                CodeTable::from_tree(&tree)
            })
        });
    }
    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("roundtrip");

    for size in [1usize << 12, 1 << 16, 1 << 20] {
        let text = generate_prose(size, 42);
        group.throughput(Throughput::Bytes(text.len() as u64));

        for model in [SymbolModel::Char, SymbolModel::Word] {
            group.bench_with_input(
                BenchmarkId::new(format!("compress/{}", model), size),
                &text,
                |b, text| b.iter(|| compress(black_box(text), model).unwrap()),
            );

            let packed = compress(&text, model).unwrap();
            group.bench_with_input(
                BenchmarkId::new(format!("decompress/{}", model), size),
                &packed,
                |b, packed| b.iter(|| decompress(&packed.tree, black_box(&packed.bits)).unwrap()),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_build_tree, bench_roundtrip);
criterion_main!(benches);
