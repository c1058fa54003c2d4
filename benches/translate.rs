use codeword::{digits, Code128Translation, ErrorPolicy, TranslateChars};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_digits(c: &mut Criterion) {
    let message = "0123456789".repeat(512);
    let mut translation = digits();

    c.bench_function("digits_5120_chars", |b| {
        b.iter(|| {
            let count = translation
                .translate(black_box(&message), ErrorPolicy::Ignore)
                .count();
            black_box(count)
        })
    });
}

fn bench_code128_digit_pairs(c: &mut Criterion) {
    let message = format!("^105{}", "0123456789".repeat(256));
    let mut translation = Code128Translation::new();

    c.bench_function("code128_2560_digit_pairs", |b| {
        b.iter(|| {
            let count = translation
                .translate(black_box(&message), ErrorPolicy::Raise)
                .count();
            black_box(count)
        })
    });
}

fn bench_code128_escape_heavy(c: &mut Criterion) {
    let message = "^104Hello^^World^102".repeat(128);
    let mut translation = Code128Translation::new();

    c.bench_function("code128_escape_heavy", |b| {
        b.iter(|| {
            let count = translation
                .translate(black_box(&message), ErrorPolicy::Ignore)
                .count();
            black_box(count)
        })
    });
}

criterion_group!(
    benches,
    bench_digits,
    bench_code128_digit_pairs,
    bench_code128_escape_heavy
);
criterion_main!(benches);
