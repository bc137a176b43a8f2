use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::Path;

use tempfile::tempdir;

use cdn_deploy::config::{default_critical_names, DeployConfig, DEFAULT_BATCH_SIZE};
use cdn_deploy::enumerate::{classify, enumerate, CACHE_IMMUTABLE, CACHE_NO_CACHE};
use cdn_deploy::error::DeployError;
use cdn_deploy::mime::resolve_content_type;

fn test_config(prefix: &str) -> DeployConfig {
    DeployConfig {
        secret_id: None,
        secret_key: None,
        bucket: "test-bucket-1250000000".to_string(),
        region: "ap-guangzhou".to_string(),
        prefix: DeployConfig::normalize_prefix(prefix),
        domain: None,
        cdn_domain: None,
        anonymous: true,
        batch_size: DEFAULT_BATCH_SIZE,
        critical_names: default_critical_names(),
        entry_document: "index.html".to_string(),
    }
}

fn write_file(path: &Path, content: &str) {
    create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    write!(f, "{content}").unwrap();
}

#[test]
fn enumerate_lists_every_regular_file_once_with_forward_slashes() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();

    write_file(&root.join("index.html"), "<html></html>");
    write_file(&root.join("css/style.css"), "body {}");
    write_file(&root.join("js/app.12345.js"), "console.log(1)");
    write_file(&root.join("img/icons/logo.png"), "png");

    let targets = enumerate(root, &test_config("www/app")).expect("enumerate should succeed");

    let mut relative: Vec<&str> = targets.iter().map(|t| t.relative_path.as_str()).collect();
    relative.sort();
    assert_eq!(
        relative,
        vec![
            "css/style.css",
            "img/icons/logo.png",
            "index.html",
            "js/app.12345.js"
        ]
    );

    // Keys are prefix + relative path, unique, and never escape the root.
    let mut keys: Vec<&str> = targets.iter().map(|t| t.key.as_str()).collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 4);
    for target in &targets {
        assert_eq!(target.key, format!("www/app/{}", target.relative_path));
        assert!(!target.key.contains(".."));
    }
}

#[test]
fn enumerate_is_deterministic_for_a_given_tree() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write_file(&root.join("b.txt"), "b");
    write_file(&root.join("a.txt"), "a");
    write_file(&root.join("sub/c.txt"), "c");

    let config = test_config("");
    let first: Vec<String> = enumerate(root, &config)
        .unwrap()
        .into_iter()
        .map(|t| t.relative_path)
        .collect();
    let second: Vec<String> = enumerate(root, &config)
        .unwrap()
        .into_iter()
        .map(|t| t.relative_path)
        .collect();
    assert_eq!(first, second);
}

#[test]
fn enumerate_fails_on_missing_root() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("no-such-dist");

    let result = enumerate(&missing, &test_config(""));
    assert!(matches!(result, Err(DeployError::Io(_))));
}

#[test]
fn classify_picks_exactly_the_critical_names_in_enumeration_order() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write_file(&root.join("app.12345.js"), "js");
    write_file(&root.join("index.html"), "html");
    write_file(&root.join("manifest.json"), "{}");
    write_file(&root.join("service-worker.js"), "sw");
    write_file(&root.join("style.css"), "css");

    let config = test_config("");
    let targets = enumerate(root, &config).unwrap();
    let (critical, other) = classify(targets, &config.critical_names);

    let critical_paths: Vec<&str> = critical.iter().map(|t| t.relative_path.as_str()).collect();
    assert_eq!(
        critical_paths,
        vec!["index.html", "manifest.json", "service-worker.js"]
    );

    let other_paths: Vec<&str> = other.iter().map(|t| t.relative_path.as_str()).collect();
    assert_eq!(other_paths, vec!["app.12345.js", "style.css"]);
}

#[test]
fn entry_document_is_no_cache_and_the_rest_is_immutable() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write_file(&root.join("index.html"), "html");
    write_file(&root.join("css/style.css"), "css");

    let targets = enumerate(root, &test_config("")).unwrap();
    for target in &targets {
        if target.relative_path == "index.html" {
            assert_eq!(target.cache_control, CACHE_NO_CACHE);
        } else {
            assert_eq!(target.cache_control, CACHE_IMMUTABLE);
        }
    }
}

#[test]
fn content_type_resolution_is_total_and_idempotent() {
    let cases = [
        ("index.html", "text/html"),
        ("style.css", "text/css"),
        ("logo.png", "image/png"),
        ("app.js.map", "application/json"),
        ("blob.xyzzy", "application/octet-stream"),
        ("no_extension", "application/octet-stream"),
    ];
    for (name, expected) in cases {
        let path = Path::new(name);
        let first = resolve_content_type(path);
        assert_eq!(first, expected, "unexpected type for {name}");
        assert!(!first.is_empty());
        assert_eq!(first, resolve_content_type(path), "not idempotent for {name}");
    }
}

#[test]
fn prefix_normalization_appends_exactly_one_slash() {
    assert_eq!(DeployConfig::normalize_prefix(""), "");
    assert_eq!(DeployConfig::normalize_prefix("www/app"), "www/app/");
    assert_eq!(DeployConfig::normalize_prefix("www/app/"), "www/app/");
}
