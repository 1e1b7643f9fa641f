use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cppflow_core::{FlowConfig, NamingConvention, TestCatalog};

fn bench_config_parse(c: &mut Criterion) {
    let toml_text = r#"
[project]
test_dir = "test"
build_dir = "build"

[naming]
extension = ".cpp"
suffix = "_unit"

[toolchain]
configure = "cmake"
build = "cmake"
test = "ctest"
build_config = "Debug"
"#;

    c.bench_function("parse_config", |b| {
        b.iter(|| {
            let _cfg = FlowConfig::from_toml(Path::new("cppflow.toml"), black_box(toml_text)).unwrap();
        })
    });
}

fn bench_discover(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..200 {
        std::fs::write(dir.path().join(format!("case_{i}_test.cpp")), "").unwrap();
        std::fs::write(dir.path().join(format!("case_{i}.hpp")), "").unwrap();
    }
    let convention = NamingConvention::default();

    c.bench_function("discover_catalog", |b| {
        b.iter(|| {
            let catalog = TestCatalog::discover(black_box(dir.path()), &convention).unwrap();
            black_box(catalog.len())
        })
    });
}

criterion_group!(benches, bench_config_parse, bench_discover);
criterion_main!(benches);
