use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use quarry::{Dialect, QueryBuilder, QuerySpec, query};

/// Build a SELECT over `n` fields with `n` WHERE conditions:
/// SELECT col0,col1,... FROM t WHERE col0 = 0 AND col1 = 1 ...
fn build_select(n: usize) -> QueryBuilder {
    let mut builder = query(Dialect::Mysql)
        .select_fields((0..n).map(|i| format!("col{i}")))
        .from("t");
    for i in 0..n {
        builder = builder.where_(format!("col{i}"), "=", i as i64);
    }
    builder
}

fn bench_compile_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/select");

    for n in [1, 5, 10, 50, 100] {
        let spec: QuerySpec = build_select(n).into_spec();
        group.bench_with_input(BenchmarkId::from_parameter(n), &spec, |b, spec| {
            b.iter(|| black_box(Dialect::Mysql.grammar().compile_select(spec).unwrap()));
        });
    }

    group.finish();
}

fn bench_build_and_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/build_and_compile");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let builder = build_select(n);
                black_box(builder.to_select_sql().unwrap());
            });
        });
    }

    group.finish();
}

fn bench_nested_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/nested_aggregate");

    for depth in [1, 3, 5, 8] {
        // ROUND(ROUND(...ROUND(price,2)...,2),2)
        let mut field = "price".to_string();
        for _ in 0..depth {
            field = format!("ROUND({field},2)");
        }
        let spec = query(Dialect::Mysql)
            .select_fields([field])
            .from("orders")
            .into_spec();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &spec, |b, spec| {
            b.iter(|| black_box(Dialect::Mysql.grammar().compile_select(spec).unwrap()));
        });
    }

    group.finish();
}

fn bench_condition_groups(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/condition_groups");

    for n in [1, 5, 10, 50] {
        let mut builder = query(Dialect::Mysql).from("t");
        for i in 0..n {
            builder = builder
                .where_group(move |q| q.where_("a", "=", i as i64).or_where("b", "=", i as i64));
        }
        let spec = builder.into_spec();
        group.bench_with_input(BenchmarkId::from_parameter(n), &spec, |b, spec| {
            b.iter(|| black_box(Dialect::Mysql.grammar().compile_select(spec).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compile_select,
    bench_build_and_compile,
    bench_nested_aggregate,
    bench_condition_groups
);
criterion_main!(benches);
