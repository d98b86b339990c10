use criterion::{criterion_group, criterion_main, Criterion};

use common::utils::sorting::{stable_sort, SortOrder, SortValue, Sortable};

#[derive(Clone)]
struct Row {
    name: String,
    rank: i64,
}

impl Sortable for Row {
    const SORT_FIELDS: &'static [&'static str] = &["name", "rank"];

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "name" => SortValue::text(&self.name),
            "rank" => SortValue::Int(self.rank),
            _ => SortValue::Null,
        }
    }
}

fn bench_sort(c: &mut Criterion) {
    // a typical admin table: a few thousand rows, many ties on rank
    let rows: Vec<Row> = (0..5_000)
        .map(|i| Row { name: format!("Artist {}", (i * 7919) % 5_000), rank: (i % 17) as i64 })
        .collect();

    c.bench_function("stable_sort_text_asc", |b| {
        b.iter(|| stable_sort(rows.clone(), "name", SortOrder::Asc).unwrap());
    });
    c.bench_function("stable_sort_int_desc_with_ties", |b| {
        b.iter(|| stable_sort(rows.clone(), "rank", SortOrder::Desc).unwrap());
    });
}

criterion_group!(benches, bench_sort);
criterion_main!(benches);
