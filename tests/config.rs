//! Loading route tables from disk.

use std::io::Write;

use axum::http::StatusCode;
use treemux::config::{build_router, load_config, watcher::ConfigWatcher, ConfigError};
use treemux::HandlerRegistry;

mod common;
use common::{body_string, request};

#[tokio::test]
async fn test_load_and_build_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [[routes]]
        name = "files"
        path = '/files/{{file:\d{{3}}\.html}}'
        handler = "echo_vars"
        "#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    let router = build_router(&config, &HandlerRegistry::with_builtins()).unwrap();

    let res = router.serve(request("GET", "/files/404.html")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_string(res).await, r#"{"file":"404.html"}"#);

    let res = router.serve(request("GET", "/files/4040.html")).await;
    assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);
}

#[test]
fn test_invalid_template_fails_at_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [[routes]]
        name = "broken"
        path = "/x/{{id:int"
        "#
    )
    .unwrap();

    match load_config(file.path()) {
        Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 1),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_watcher_requires_existing_file() {
    let (watcher, _rx) = ConfigWatcher::new(std::path::Path::new("/definitely/not/here.toml"));
    assert!(watcher.run().is_err());
}
