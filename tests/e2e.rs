//! End-to-end integration tests for lorem-press.
//!
//! These tests make live requests to lorem-markdownum. They are gated behind
//! the `E2E_ENABLED` environment variable so they do not run in CI unless
//! explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture

use lorem_press::{
    generate, generate_sync, BatchResult, GenerationConfig, HttpSource, MarkdownSource,
};
use std::path::Path;

macro_rules! e2e_skip_unless_enabled {
    () => {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    };
}

/// Assert a generated post has front matter followed by a non-empty body.
fn assert_post_shape(path: &Path) {
    let text = std::fs::read_to_string(path).expect("post should be readable");
    let context = path.display();

    assert!(text.starts_with("---\n"), "[{context}] missing front matter");
    let mut parts = text.splitn(3, "---\n");
    let _ = parts.next();
    let yaml = parts.next().unwrap_or("");
    let body = parts.next().unwrap_or("");

    for key in ["title:", "tags:", "categories:", "cover_image:", "date:"] {
        assert!(yaml.contains(key), "[{context}] front matter lacks {key}");
    }
    assert!(!body.trim().is_empty(), "[{context}] body is empty");
    assert!(
        !body.lines().any(|l| l.starts_with("# ")),
        "[{context}] top-level heading left in body"
    );

    println!("[{context}] ✓  {} bytes", text.len());
}

#[tokio::test]
async fn test_live_source_returns_markdown() {
    e2e_skip_unless_enabled!();

    let source = HttpSource::new(30).expect("client should build");
    let config = GenerationConfig::default();
    let bytes = source
        .fetch(&config.source_url)
        .await
        .expect("fetch should succeed");
    let text = String::from_utf8(bytes).expect("body should be UTF-8");

    assert!(
        text.lines().any(|l| l.starts_with("# ")),
        "expected a top-level heading"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_generate_small_batch() {
    e2e_skip_unless_enabled!();

    let tmp = tempfile::tempdir().unwrap();
    let config = GenerationConfig::builder()
        .fetch_timeout_secs(30)
        .build()
        .unwrap();

    let result = generate(5, tmp.path(), &config)
        .await
        .expect("batch should start");

    match result {
        BatchResult::Success(paths) => {
            assert_eq!(paths.len(), 5);
            for path in &paths {
                assert!(path.starts_with(tmp.path()));
                assert_eq!(path.extension().and_then(|e| e.to_str()), Some("md"));
                assert_post_shape(path);
            }
        }
        BatchResult::Failure(errors) => panic!("live batch failed: {errors:?}"),
    }
}

#[test]
fn test_generate_sync_single_post() {
    e2e_skip_unless_enabled!();

    let tmp = tempfile::tempdir().unwrap();
    let result = generate_sync(1, tmp.path(), &GenerationConfig::default())
        .expect("batch should start");
    let paths = result.into_result().expect("single post should succeed");
    assert_eq!(paths.len(), 1);
    assert_post_shape(&paths[0]);
}
