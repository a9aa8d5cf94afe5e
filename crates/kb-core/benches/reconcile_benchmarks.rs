use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kb_core::Reconciler;
use kb_fs::RobustnessConfig;
use kb_test_utils::TestKnowledgeBase;

fn seeded(docs: usize, cards: usize) -> TestKnowledgeBase {
    let kb = TestKnowledgeBase::new();
    for i in 0..docs {
        kb.write_doc(&format!("doc_{i:03}.md"), &"lorem ipsum ".repeat(200));
    }
    for i in 0..cards {
        kb.write_card(
            &format!("category_{}", i % 8),
            &format!("card_{i:03}"),
            &format!("title: Card {i}\ntags: [a, b, c]\nbody: |\n  {}\n", "text ".repeat(50)),
        );
    }
    kb
}

fn fresh_check_benchmark(c: &mut Criterion) {
    let kb = seeded(50, 200);
    let reconciler = Reconciler::open(kb.root()).unwrap();
    reconciler.load().unwrap();

    c.bench_function("reconciler::check (fresh, 250 files)", |b| {
        b.iter(|| black_box(reconciler.check_and_reload_if_stale().unwrap()))
    });
}

fn fingerprint_benchmark(c: &mut Criterion) {
    let kb = seeded(50, 200);
    let reconciler = Reconciler::open(kb.root()).unwrap();

    c.bench_function("reconciler::compute_current_fingerprints (250 files)", |b| {
        b.iter(|| black_box(reconciler.compute_current_fingerprints().unwrap()))
    });
}

fn load_benchmark(c: &mut Criterion) {
    let kb = seeded(50, 200);
    let reconciler = Reconciler::open(kb.root()).unwrap().with_robustness(RobustnessConfig {
        enable_fsync: false,
        ..RobustnessConfig::default()
    });

    c.bench_function("reconciler::load (250 files)", |b| {
        b.iter(|| black_box(reconciler.load().unwrap()))
    });
}

criterion_group!(benches, fresh_check_benchmark, fingerprint_benchmark, load_benchmark);
criterion_main!(benches);
