//! Integration tests for the eavclean CLI

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn eavclean(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_eavclean"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("EAVCLEAN_DATABASE_URL")
        .env_remove("EAVCLEAN_TABLE_PREFIX")
        .env_remove("EAVCLEAN_MEDIA_ROOT")
        .env_remove("EAVCLEAN_DECLARED_PATHS")
        .env_remove("EAVCLEAN_COLOR")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute eavclean")
}

#[test]
fn test_cli_version() {
    let output = eavclean(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("eavclean"));
}

#[test]
fn test_cli_help() {
    let output = eavclean(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("config-path"));
    assert!(stdout.contains("config-scope"));
    assert!(stdout.contains("media"));
    assert!(stdout.contains("all"));
}

#[test]
fn test_cli_invalid_command() {
    let output = eavclean(&["invalid-command"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn test_missing_database_url() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        format!("[paths]\nlogs_dir = {:?}\n", dir.path().join("logs")),
    )
    .unwrap();

    let output = eavclean(&["--config", config.to_str().unwrap(), "config-scope", "--dry-run"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("database.url"));
}

#[test]
fn test_destructive_run_needs_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        format!(
            "[database]\nurl = \"sqlite://{}\"\n",
            dir.path().join("missing.sqlite").display()
        ),
    )
    .unwrap();

    let output = eavclean(&["--config", config.to_str().unwrap(), "config-scope"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--yes"));
}

struct Shop {
    _dir: tempfile::TempDir,
    config: PathBuf,
    image_root: PathBuf,
    db_path: PathBuf,
}

async fn shop() -> Shop {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("shop.sqlite");
    let pool = eavclean_store::create_pool(&db_path).await.unwrap();
    eavclean_store::run_migrations(&pool).await.unwrap();

    for (scope, scope_id, path, value) in [
        ("default", 0, "web/secure/base_url", "https://shop.test/"),
        ("stores", 1, "web/secure/base_url", "https://shop.test/"),
        ("default", 0, "old/module/enabled", "1"),
        ("default", 0, "design/theme/theme_id", "3"),
    ] {
        sqlx::query("INSERT INTO core_config_data (scope, scope_id, path, value) VALUES (?, ?, ?, ?)")
            .bind(scope)
            .bind(scope_id)
            .bind(path)
            .bind(value)
            .execute(&pool)
            .await
            .unwrap();
    }
    for (id, value) in [(1, "/a/b/kept.jpg"), (2, "/g/o/gone.jpg")] {
        sqlx::query("INSERT INTO catalog_product_entity_media_gallery (value_id, value) VALUES (?, ?)")
            .bind(id)
            .bind(value)
            .execute(&pool)
            .await
            .unwrap();
    }
    pool.close().await;

    let media_root = dir.path().join("media");
    let image_root = media_root.join("catalog/product");
    for (file, contents) in [("a/b/kept.jpg", "k"), ("u/n/unused.jpg", "unused")] {
        let path = image_root.join(file);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    let declared = dir.path().join("declared.txt");
    std::fs::write(&declared, "web/secure/base_url\n").unwrap();

    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        format!(
            "[database]\nurl = \"sqlite://{}\"\n\n[media]\nroot = {:?}\n\n[config_paths]\ndeclared_paths = {:?}\n\n[paths]\nlogs_dir = {:?}\n",
            db_path.display(),
            media_root,
            declared,
            dir.path().join("logs"),
        ),
    )
    .unwrap();

    Shop {
        _dir: dir,
        config,
        image_root,
        db_path,
    }
}

/// Rows left in the configuration table
fn config_rows(db_path: &Path) -> usize {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        let pool = eavclean_store::create_pool(db_path).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM core_config_data")
            .fetch_one(&pool)
            .await
            .unwrap();
        usize::try_from(count).unwrap()
    })
}

#[test]
fn test_all_dry_run_reports_without_changes() {
    let shop = tokio::runtime::Runtime::new().unwrap().block_on(shop());

    let output = eavclean(&[
        "--config",
        shop.config.to_str().unwrap(),
        "--json",
        "all",
        "--dry-run",
    ]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["dry_run"], true);
    assert_eq!(report["orphaned_paths"], serde_json::json!(["old/module/enabled"]));
    assert_eq!(report["scope_duplicates_removed"], 1);
    assert_eq!(report["files_deleted"], serde_json::json!(["/u/n/unused.jpg"]));
    assert_eq!(report["db_rows_removed"], serde_json::json!(["/g/o/gone.jpg"]));

    assert!(shop.image_root.join("u/n/unused.jpg").exists());
    assert_eq!(config_rows(&shop.db_path), 4);
}

#[test]
fn test_config_path_apply_with_yes() {
    let shop = tokio::runtime::Runtime::new().unwrap().block_on(shop());

    let output = eavclean(&[
        "--config",
        shop.config.to_str().unwrap(),
        "--color",
        "never",
        "config-path",
        "--yes",
    ]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("old/module/enabled is orphaned."));
    assert!(stdout.contains("Removed 1 orphaned paths in configuration table."));
    assert_eq!(config_rows(&shop.db_path), 3);
}
