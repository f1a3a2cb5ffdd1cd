use criterion::{black_box, criterion_group, criterion_main, Criterion};
use yaml_surgeon::{Document, Selector, YamlOperation};

/// A block document with `count` services, each carrying flow collections
fn services(count: usize) -> String {
    let mut yaml = String::from("services:\n");
    for i in 0..count {
        yaml.push_str(&format!(
            "  - srv-{i}:\n      ports: [80, 443]\n      labels: {{tier: web, zone: a}}\n      # health check\n      check: /healthz\n"
        ));
    }
    yaml
}

fn bench_parse(c: &mut Criterion) {
    let yaml = services(500);

    c.bench_function("parse_500_services", |b| {
        b.iter(|| {
            let doc: Document = black_box(yaml.as_str()).parse().unwrap();
            black_box(doc.nodes().len())
        })
    });
}

fn bench_select(c: &mut Criterion) {
    let yaml = services(500);
    let doc: Document = yaml.parse().unwrap();
    let selector = Selector::new().with_parents("labels").named("zone");

    c.bench_function("select_flow_keys", |b| {
        b.iter(|| black_box(selector.select(black_box(doc.nodes())).len()))
    });
}

fn bench_mutations(c: &mut Criterion) {
    let yaml = services(500);

    c.bench_function("delete_flow_entries", |b| {
        b.iter(|| {
            YamlOperation::new(black_box(&yaml))
                .unwrap()
                .named("443")
                .delete()
                .unwrap()
                .render()
        })
    });

    c.bench_function("duplicate_blocks", |b| {
        b.iter(|| {
            YamlOperation::new(black_box(&yaml))
                .unwrap()
                .name_contains("srv-")
                .duplicate_as("copy")
                .unwrap()
                .render()
        })
    });

    c.bench_function("chained_stages", |b| {
        b.iter(|| {
            YamlOperation::new(black_box(&yaml))
                .unwrap()
                .named("check")
                .rename("probe")
                .unwrap()
                .then()
                .unwrap()
                .named("tier")
                .insert_sibling("owner")
                .unwrap()
                .render()
        })
    });
}

criterion_group!(benches, bench_parse, bench_select, bench_mutations);
criterion_main!(benches);
