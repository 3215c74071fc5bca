use apidoc_core::ast::{
    AccessLevel, Ast, Declaration, FunctionDecl, FunctionOrigin, Parameter, PropertyDecl,
    SourceId, SynthKind, TranslationUnit,
};
use apidoc_core::index::MemoryIndex;
use apidoc_core::{DocSession, DocumentationPass};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// ============================================================================
// Test Data: generated class hierarchies of varying size
// ============================================================================

/// `classes` classes with a documented setter, a default-value overload, a
/// getter-backed property and an interface mirror each.
fn generate_module(classes: usize) -> (Ast, MemoryIndex) {
    let mut ast = Ast::new();
    let mut index = MemoryIndex::new();
    let mirrors = ast.add_unit(TranslationUnit::new("interfaces.h"));
    let unit = ast.add_unit(TranslationUnit::new("module.h"));

    for i in 0..classes {
        let name = format!("QClass{i}");
        index.add_type(name.clone(), format!("The {name} class."));
        index.add_function(format!("{name}::setValue"), &["int"], AccessLevel::Public, "Sets the value.");
        index.add_property(format!("{name}::value"), "This property holds the value.");

        let class = ast.add(unit, None, Declaration::class(name.clone()));
        let source = SourceId(i as u64);
        let set_value = ast.add(
            unit,
            Some(class),
            Declaration::function("setValue", FunctionDecl::new(vec![Parameter::new("value", "int")]))
                .with_source(source),
        );
        ast.add(
            unit,
            Some(class),
            Declaration::function(
                "setValue",
                FunctionDecl::default().with_origin(FunctionOrigin::Synthesized {
                    kind: SynthKind::DefaultValueOverload,
                    origin: set_value,
                }),
            ),
        );
        let getter = ast.add(unit, Some(class), Declaration::function("value", FunctionDecl::default()));
        ast.add(
            unit,
            Some(class),
            Declaration::property(
                "value",
                PropertyDecl {
                    getter: Some(getter),
                    ..PropertyDecl::default()
                },
            ),
        );

        let mirror = ast.add(mirrors, None, Declaration::interface_mirror(format!("I{name}"), class));
        ast.add(
            mirrors,
            Some(mirror),
            Declaration::function("setValue", FunctionDecl::new(vec![Parameter::new("value", "int")]))
                .with_source(source),
        );
    }
    (ast, index)
}

// ============================================================================
// Association Benchmarks
// ============================================================================

fn bench_association_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("association_by_class_count");

    for size in [10, 100, 1000] {
        let (ast, index) = generate_module(size);
        group.throughput(Throughput::Elements(ast.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ast, |b, ast| {
            b.iter(|| {
                let mut ast = ast.clone();
                let mut session = DocSession::new();
                DocumentationPass::new(&index).run(black_box(&mut ast), &mut session);
                session
            })
        });
    }

    group.finish();
}

fn bench_second_run(c: &mut Criterion) {
    let (mut ast, index) = generate_module(500);
    let mut session = DocSession::new();
    DocumentationPass::new(&index).run(&mut ast, &mut session);

    c.bench_function("association_second_run", |b| {
        b.iter(|| DocumentationPass::new(&index).run(black_box(&mut ast), &mut session))
    });
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(association_benches, bench_association_scaling, bench_second_run);

criterion_main!(association_benches);
