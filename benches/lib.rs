use std::{array, fmt::Write};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use numconv::{
    format_float,
    parse_float,
    parse_integer,
    write_float,
    write_integer,
    NumberFormatInfo,
    NumberStyles,
};
use rand::{prelude::*, rngs::SmallRng};

const INFO: &NumberFormatInfo<'static> = &NumberFormatInfo::INVARIANT;

fn finite_f64s(rng: &mut SmallRng) -> [f64; 1 << 12] {
    array::from_fn(|_| loop {
        let v = f64::from_bits(rng.gen());
        if v.is_finite() {
            break v;
        }
    })
}

fn bench_format(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(1);
    let data = finite_f64s(&mut rng);

    let mut group = c.benchmark_group("f64/shortest");
    group.bench_function("digits", |b| {
        let mut i = 0;
        b.iter(|| {
            let v = data[i % data.len()];
            black_box(format_float(black_box(v), None, false));
            i += 1;
        });
    });
    group.bench_function("numconv", |b| {
        let mut s = String::with_capacity(64);
        let mut i = 0;
        b.iter(|| {
            s.clear();
            let v = data[i % data.len()];
            let _ = write_float(&mut s, black_box(v), "R", INFO);
            black_box(&s);
            i += 1;
        });
    });
    group.bench_function("core", |b| {
        let mut s = String::with_capacity(64);
        let mut i = 0;
        b.iter(|| {
            s.clear();
            let v = data[i % data.len()];
            let _ = write!(s, "{:e}", black_box(v));
            black_box(&s);
            i += 1;
        });
    });
    group.finish();

    let mut group = c.benchmark_group("f64/format");
    for format in ["E16", "F2", "N2", "#,##0.00;(#,##0.00)"] {
        group.bench_function(format, |b| {
            let mut s = String::with_capacity(512);
            let mut i = 0;
            b.iter(|| {
                s.clear();
                let v = data[i % data.len()];
                let _ = write_float(&mut s, black_box(v), black_box(format), INFO);
                black_box(&s);
                i += 1;
            });
        });
    }
    group.finish();

    let ints: [u64; 1 << 12] = array::from_fn(|_| rng.gen::<u64>() >> rng.gen_range(0..64));
    let mut group = c.benchmark_group("u64/format");
    group.bench_function("numconv", |b| {
        let mut s = String::with_capacity(32);
        let mut i = 0;
        b.iter(|| {
            s.clear();
            let v = ints[i % ints.len()];
            let _ = write_integer(&mut s, black_box(v), "D", INFO);
            black_box(&s);
            i += 1;
        });
    });
    group.bench_function("itoa", |b| {
        let mut buf = itoa::Buffer::new();
        let mut i = 0;
        b.iter(|| {
            let v = ints[i % ints.len()];
            black_box(buf.format(black_box(v)));
            i += 1;
        });
    });
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(2);
    let data = finite_f64s(&mut rng).map(|v| v.to_string());

    let mut group = c.benchmark_group("f64/parse");
    group.bench_function("numconv", |b| {
        let mut i = 0;
        b.iter(|| {
            let s = &data[i % data.len()];
            let _ = black_box(parse_float::<f64>(black_box(s), NumberStyles::FLOAT, INFO));
            i += 1;
        });
    });
    group.bench_function("core", |b| {
        let mut i = 0;
        b.iter(|| {
            let s = &data[i % data.len()];
            let _ = black_box(black_box(s).parse::<f64>());
            i += 1;
        });
    });
    group.finish();

    let ints: [String; 1 << 12] = array::from_fn(|_| rng.gen::<i64>().to_string());
    let mut group = c.benchmark_group("i64/parse");
    group.bench_function("numconv", |b| {
        let mut i = 0;
        b.iter(|| {
            let s = &ints[i % ints.len()];
            let _ = black_box(parse_integer::<i64>(black_box(s), NumberStyles::INTEGER, INFO));
            i += 1;
        });
    });
    group.bench_function("core", |b| {
        let mut i = 0;
        b.iter(|| {
            let s = &ints[i % ints.len()];
            let _ = black_box(black_box(s).parse::<i64>());
            i += 1;
        });
    });
    group.finish();
}

criterion_group!(benches, bench_format, bench_parse);
criterion_main!(benches);
