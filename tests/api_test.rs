use apidoc_core::ast::{AccessLevel, Ast, DeclId, Declaration, FunctionDecl, Parameter, TranslationUnit};
use apidoc_core::config::DocsConfig;
use apidoc_core::error::DocError;
use apidoc_core::{document, DocState, PassOutcome};
use std::fs;
use std::path::Path;

fn point_ast() -> (Ast, DeclId, DeclId) {
    let mut ast = Ast::new();
    let unit = ast.add_unit(TranslationUnit::new("qpoint.h"));
    let class = ast.add(
        unit,
        None,
        Declaration::class("QPoint").with_comment("\\class QPoint from the header"),
    );
    let set_x = ast.add(
        unit,
        Some(class),
        Declaration::function(
            "setX",
            FunctionDecl::new(vec![Parameter::new("x", "int")]).with_access(AccessLevel::Public),
        ),
    );
    (ast, class, set_x)
}

fn write_docs(root: &Path) {
    fs::write(
        root.join("qtcore.json"),
        serde_json::json!({
            "functions": [
                { "name": "QPoint::setX", "parameter_types": ["int"], "text": "Sets the X coordinate." }
            ]
        })
        .to_string(),
    )
    .unwrap();
}

#[test]
fn test_document_clears_header_comments_and_associates() {
    let root = tempfile::tempdir().unwrap();
    write_docs(root.path());
    let (mut ast, class, set_x) = point_ast();

    let config = DocsConfig::new(root.path(), vec!["QtCore".to_string()]);
    let report = document(&mut ast, &config).unwrap();

    assert_eq!(report.outcome, PassOutcome::Applied);
    assert_eq!(report.cleared_comments, 1);
    assert_eq!(ast.comment(class), None);
    assert_eq!(ast.comment(set_x), Some("Sets the X coordinate."));
    assert_eq!(report.session.state(set_x), DocState::Resolved);
    // The cache outlives the pass for later passes.
    assert_eq!(
        report.session.cache().get("QPoint::setX(int)"),
        Some("Sets the X coordinate.")
    );

    let summary: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(summary["loaded_modules"], serde_json::json!(["QtCore"]));
    assert_eq!(summary["stats"]["index_queries"], 2);
    assert_eq!(summary["cache_entries"], 1);
}

#[test]
fn test_document_can_keep_header_comments() {
    let root = tempfile::tempdir().unwrap();
    write_docs(root.path());
    let (mut ast, class, _) = point_ast();

    let mut config = DocsConfig::new(root.path(), vec!["QtCore".to_string()]);
    config.clear_existing_comments = false;
    let report = document(&mut ast, &config).unwrap();

    assert_eq!(report.cleared_comments, 0);
    assert_eq!(ast.comment(class), Some("\\class QPoint from the header"));
}

#[test]
fn test_document_without_corpus_is_inapplicable() {
    let root = tempfile::tempdir().unwrap();
    let (mut ast, _, set_x) = point_ast();

    let config = DocsConfig::new(root.path().join("missing"), vec!["QtCore".to_string()]);
    let report = document(&mut ast, &config).unwrap();

    assert_eq!(report.outcome, PassOutcome::Inapplicable);
    assert_eq!(ast.comment(set_x), None);
    assert_eq!(report.stats().index_queries, 0);
}

#[test]
fn test_document_reports_malformed_index() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join("qtcore.json"), "{ not json").unwrap();
    let (mut ast, _, _) = point_ast();

    let config = DocsConfig::new(root.path(), vec!["QtCore".to_string()]);
    let result = document(&mut ast, &config);
    assert!(matches!(result, Err(DocError::Index(_))));
}

#[test]
fn test_config_file_with_lib_derived_modules() {
    let root = tempfile::tempdir().unwrap();
    write_docs(root.path());
    let config_path = root.path().join("docs.yaml");
    fs::write(
        &config_path,
        format!("docs_path: {}\nmodules: [QtCore]\n", root.path().display()),
    )
    .unwrap();

    let loaded = DocsConfig::load(&config_path).unwrap();
    let derived = DocsConfig::from_lib_files(root.path(), ["/usr/lib/libQt5Core.so.5"]);
    assert_eq!(loaded, derived);

    let (mut ast, _, set_x) = point_ast();
    document(&mut ast, &loaded).unwrap();
    assert_eq!(ast.comment(set_x), Some("Sets the X coordinate."));
}
