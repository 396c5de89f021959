use fpdecimal::{formatted, parse, to_string, FormatMode};

/// Returns a few thousand finite f64 values with random bits, from a
/// xorshift generator with a fixed seed.
fn random_values() -> Vec<f64> {
    let mut state: u64 = 0x1337_1337_dead_beef;
    core::iter::from_fn(|| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        Some(f64::from_bits(state))
    })
    .filter(|v| v.is_finite())
    .take(4096)
    .collect()
}

fn test_to_string(values: &[f64]) {
    for v in values {
        black_box(to_string(*v));
    }
}

fn test_to_string_f32(values: &[f64]) {
    for v in values {
        black_box(to_string(*v as f32));
    }
}

fn test_parse_shortest(texts: &[String]) {
    for s in texts {
        black_box(parse::<f64>(s).unwrap());
    }
}

fn test_parse_short() {
    for s in ["1.5", "0.1", "123456", "1e22", "3.25E-10", "-7.0"] {
        black_box(parse::<f64>(s).unwrap());
    }
}

fn test_parse_long() {
    let s = "3.14159265358979323846264338327950288419716939937510582097494459";
    black_box(parse::<f64>(s).unwrap());
}

fn test_parse_near_tie() {
    // The midpoint between 1 and the next value, which needs the exact
    // comparison.
    let s = "1.00000000000000011102230246251565404236316680908203125";
    black_box(parse::<f64>(s).unwrap());
    // The midpoint below the smallest subnormal.
    let s = "2.4703282292062327208828439643411068618252990130716238221279284125\
033775363510437593264991818081799618989828234772285886546332835517796989\
819938739800539093906315035659515570226392290858392449105184435931802849\
936536152500319370457678249219365623669863658480757001585769269903706311\
928279558551332927834338409351978015531246597263579574622766465272827220\
056374006485499977096599470454020828166226237857393450736339007967761930\
577506740176324673600968951340535537458516661134223766678604162159680461\
914467291840300530057530849048765391711386591646239524912623653881879636\
239373280423891018672348497668235089863388587925628302755995657524455507\
255189313690836254779186948667994968324049705821028513185451396213837722\
826145437693412532098591327667236328125E-324";
    black_box(parse::<f64>(s).unwrap());
}

fn test_formatted(values: &[f64]) {
    for v in values {
        black_box(formatted(*v, 6, FormatMode::General));
        black_box(formatted(*v, 3, FormatMode::Scientific));
    }
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};

pub fn criterion_benchmark(c: &mut Criterion) {
    let values = random_values();
    let texts: Vec<String> = values.iter().map(|v| to_string(*v)).collect();
    c.bench_function("test_to_string", |b| b.iter(|| test_to_string(&values)));
    c.bench_function("test_to_string_f32", |b| {
        b.iter(|| test_to_string_f32(&values))
    });
    c.bench_function("test_parse_shortest", |b| {
        b.iter(|| test_parse_shortest(&texts))
    });
    c.bench_function("test_parse_short", |b| b.iter(test_parse_short));
    c.bench_function("test_parse_long", |b| b.iter(test_parse_long));
    c.bench_function("test_parse_near_tie", |b| b.iter(test_parse_near_tie));
    c.bench_function("test_formatted", |b| b.iter(|| test_formatted(&values)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
