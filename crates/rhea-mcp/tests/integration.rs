//! Integration tests for the rhea-mcp server.
//!
//! These tests exercise the MCP tools against real projects on disk to
//! verify end-to-end behavior including:
//! - Background build and waiting on readiness
//! - Queries by name, position and module
//! - Per-file invalidation after edits
//! - Error responses for bad arguments

use std::fs;
use std::sync::Arc;

use rhea_mcp::context::Context;
use rhea_mcp::error::Error;
use rhea_mcp::models::FindDefinitionParams;
use rhea_mcp::tools::Tools;
use rstest::rstest;
use tempfile::TempDir;

mod helpers {
    use super::*;

    /// Create a temporary project with the given files.
    pub fn create_project(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().expect("Failed to create temp dir");
        for (path, content) in files {
            let full_path = temp.path().join(path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).expect("Failed to create parent dirs");
            }
            fs::write(&full_path, content).expect("Failed to write file");
        }
        temp
    }

    /// Start a context (background build included) and wrap it in tools.
    pub fn start_tools(temp: &TempDir) -> (Arc<Context>, Tools) {
        let context = Arc::new(Context::start(temp.path()).expect("Failed to start context"));
        let tools = Tools::new(Arc::clone(&context));
        (context, tools)
    }

    /// A package with a model class and a consumer module.
    pub fn sample_project() -> TempDir {
        create_project(&[
            (
                "shop/models.py",
                "class Order:\n    def total(self):\n        return 0\n",
            ),
            (
                "shop/service.py",
                "from shop.models import Order\n\ndef checkout():\n    order = Order()\n    return order.total()\n",
            ),
            ("broken.py", "def nope(:\n"),
        ])
    }
}

use helpers::{create_project, sample_project, start_tools};

// =========================================================================
// Index management
// =========================================================================

#[tokio::test]
async fn status_reports_ready_after_first_query() {
    let temp = sample_project();
    let (_context, tools) = start_tools(&temp);

    tools
        .document_symbols("shop/models.py")
        .await
        .expect("document_symbols should succeed");
    let status = tools.index_status();

    assert!(status.ready);
    assert_eq!(status.phase, "ready");
    assert_eq!(status.files_indexed, 2);
    assert_eq!(status.parse_errors, 1);
    assert_eq!(status.uri_count, 2);
}

#[tokio::test]
async fn index_build_returns_stats() {
    let temp = sample_project();
    let (_context, tools) = start_tools(&temp);

    let stats = tools.index_build().await.expect("index_build should succeed");

    assert_eq!(stats.files_indexed, 2);
    assert_eq!(stats.parse_errors, 1);
    assert!(stats.errors[0].path.ends_with("broken.py"));
}

#[tokio::test]
async fn invalidate_picks_up_edits() {
    let temp = sample_project();
    let (_context, tools) = start_tools(&temp);
    tools.index_build().await.expect("index_build should succeed");

    fs::write(
        temp.path().join("shop/models.py"),
        "class Invoice:\n    pass\n",
    )
    .expect("Failed to rewrite file");
    let response = tools
        .index_invalidate("shop/models.py")
        .await
        .expect("index_invalidate should succeed");

    assert!(response.indexed);
    assert!(tools
        .find_definition(FindDefinitionParams {
            symbol: Some("Order".to_string()),
            ..FindDefinitionParams::default()
        })
        .await
        .expect("find_definition should succeed")
        .is_empty());
    let invoice = tools
        .find_definition(FindDefinitionParams {
            symbol: Some("Invoice".to_string()),
            ..FindDefinitionParams::default()
        })
        .await
        .expect("find_definition should succeed");
    assert_eq!(invoice.len(), 1);
}

#[tokio::test]
async fn invalidate_deleted_file_drops_it() {
    let temp = sample_project();
    let (context, tools) = start_tools(&temp);
    tools.index_build().await.expect("index_build should succeed");

    fs::remove_file(temp.path().join("shop/service.py")).expect("Failed to delete file");
    let response = tools
        .index_invalidate("shop/service.py")
        .await
        .expect("index_invalidate should succeed");

    assert!(!response.indexed);
    assert_eq!(context.index().get_all_uris().len(), 1);
}

// =========================================================================
// Queries
// =========================================================================

#[tokio::test]
async fn document_symbols_by_uri_and_path_agree() {
    let temp = sample_project();
    let (context, tools) = start_tools(&temp);
    let uri = rhea::path_to_uri(&context.root().join("shop/models.py"));

    let by_uri = tools
        .document_symbols(&uri)
        .await
        .expect("document_symbols should succeed");
    let by_path = tools
        .document_symbols("shop/models.py")
        .await
        .expect("document_symbols should succeed");

    assert_eq!(by_uri, by_path);
    let names: Vec<_> = by_uri.iter().map(rhea::Symbol::qualified_name).collect();
    assert_eq!(names, vec!["Order", "Order.total"]);
}

#[tokio::test]
async fn find_definition_by_position() {
    let temp = sample_project();
    let (_context, tools) = start_tools(&temp);

    // `total` in `order.total()` falls back to the bare name
    let found = tools
        .find_definition(FindDefinitionParams {
            symbol: None,
            uri: Some("shop/service.py".to_string()),
            line: Some(4),
            column: Some(18),
        })
        .await
        .expect("find_definition should succeed");

    assert_eq!(found.len(), 1);
    assert!(found[0].uri.ends_with("/shop/models.py"));
    assert_eq!(found[0].range.start.line, 1);
}

#[tokio::test]
async fn find_references_spans_modules() {
    let temp = sample_project();
    let (_context, tools) = start_tools(&temp);

    let refs = tools
        .find_references("Order".to_string())
        .await
        .expect("find_references should succeed");

    // class name, import name, constructor call
    assert_eq!(refs.len(), 3);
}

#[tokio::test]
async fn import_graph_of_models() {
    let temp = sample_project();
    let (context, tools) = start_tools(&temp);

    let graph = tools
        .import_graph("shop/models.py")
        .await
        .expect("import_graph should succeed");

    assert!(graph.imports.is_empty());
    assert_eq!(
        graph.dependents,
        vec![rhea::path_to_uri(&context.root().join("shop/service.py"))]
    );
}

#[tokio::test]
async fn queries_on_empty_project_are_empty() {
    let temp = create_project(&[]);
    let (_context, tools) = start_tools(&temp);

    assert!(tools
        .document_symbols("missing.py")
        .await
        .expect("document_symbols should succeed")
        .is_empty());
    assert!(tools
        .find_references("anything".to_string())
        .await
        .expect("find_references should succeed")
        .is_empty());
}

// =========================================================================
// Errors
// =========================================================================

#[rstest]
#[case::nothing(None, None, None, None)]
#[case::both(Some("Order"), Some("shop/models.py"), Some(0), Some(6))]
#[case::missing_column(None, Some("shop/models.py"), Some(0), None)]
#[tokio::test]
async fn find_definition_rejects_bad_argument_sets(
    #[case] symbol: Option<&str>,
    #[case] uri: Option<&str>,
    #[case] line: Option<u32>,
    #[case] column: Option<u32>,
) {
    let temp = sample_project();
    let (_context, tools) = start_tools(&temp);

    let result = tools
        .find_definition(FindDefinitionParams {
            symbol: symbol.map(String::from),
            uri: uri.map(String::from),
            line,
            column,
        })
        .await;

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[tokio::test]
async fn non_file_uri_is_rejected() {
    let temp = sample_project();
    let (_context, tools) = start_tools(&temp);

    let result = tools.import_graph("https://example.com/shop/models.py").await;

    assert!(matches!(result, Err(Error::UnknownUri(_))));
}
