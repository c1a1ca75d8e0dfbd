use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlfluent::{AnsiGrammar, Builder, Grammar, MockConnection, MySqlGrammar, Record};
use std::sync::Arc;

fn builder(grammar: Box<dyn Grammar>) -> Builder {
    Builder::new(Arc::new(MockConnection::new()), grammar)
}

/// `select col0, col1, ... from t where col0 = ? and col1 = ? ...`
fn build_select(n: usize) -> Builder {
    let mut q = builder(Box::new(AnsiGrammar::new()));
    q.select((0..n).map(|i| format!("col{i}"))).from("t");
    for i in 0..n {
        q.where_eq(format!("col{i}"), i as i64);
    }
    q
}

fn bench_compile_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/select");

    for n in [1, 5, 10, 50, 100] {
        let q = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &q, |b, q| {
            b.iter(|| black_box(q.compile_select()));
        });
    }

    group.finish();
}

fn bench_build_and_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/build_and_compile");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let q = build_select(n);
                black_box(q.compile_select())
            });
        });
    }

    group.finish();
}

fn bench_where_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/where_in");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let mut q = builder(Box::new(AnsiGrammar::new()));
                q.from("t").where_in("id", values.iter().copied());
                black_box(q.compile_select())
            });
        });
    }

    group.finish();
}

fn bench_nested_and_joins(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/nested_and_joins");

    for depth in [1, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut q = builder(Box::new(MySqlGrammar::new()));
                q.from("users")
                    .join("orders", "orders.user_id", "=", "users.id");
                for i in 0..depth {
                    q.or_where_nested(|w| {
                        w.where_eq("users.kind", i as i64)
                            .where_between("orders.total", 10, 100);
                    });
                }
                black_box(q.compile_select())
            });
        });
    }

    group.finish();
}

fn bench_batch_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/batch_insert");

    for n in [1, 10, 100] {
        let records: Vec<Record> = (0..n)
            .map(|i| {
                Record::new()
                    .set("email", format!("user{i}@example.com"))
                    .set("score", i as i64)
            })
            .collect();
        let mut q = builder(Box::new(AnsiGrammar::new()));
        q.from("users");
        group.bench_with_input(BenchmarkId::from_parameter(n), &records, |b, records| {
            b.iter(|| black_box(q.compile_insert(records)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compile_select,
    bench_build_and_compile,
    bench_where_in,
    bench_nested_and_joins,
    bench_batch_insert
);
criterion_main!(benches);
