//! 端到端 CLI 测试
mod common;

use common::create_db;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cortxfs-hist"))
}

// 转换路径为 TOML 兼容格式（Windows 反斜杠转义）
fn toml_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}

/// 写入一个把日志都放在临时目录里的配置
fn write_config(dir: &Path) -> PathBuf {
    let config_path = dir.join("cortxfs_hist.toml");
    let cfg = format!(
        r#"
[error]
file = "{}"

[logging]
file = "{}"
level = "info"
"#,
        toml_path(&dir.join("logs/discarded.log")),
        toml_path(&dir.join("logs/app.log")),
    );
    fs::write(&config_path, cfg).unwrap();
    config_path
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(binary_path())
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run cortxfs-hist")
}

#[test]
fn test_render_single_operation() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let db = create_db(
        dir,
        &[("fsal_read", 1, "init", 100), ("fsal_read", 1, "finish", 250)],
    );
    let config = write_config(dir);
    let graph = dir.join("graphs/fsal_read.svg");

    let output = run(
        dir,
        &[
            "-c",
            config.to_str().unwrap(),
            "fsal_read",
            "-d",
            db.to_str().unwrap(),
            "-o",
            graph.to_str().unwrap(),
        ],
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Histogram graph render completed for operation fsal_read"));

    let svg = fs::read_to_string(&graph).unwrap();
    assert!(svg.contains("150</text>"));
    assert!(svg.contains("fsal_read opid(s)"));
}

#[test]
fn test_unknown_tag_fails_without_image() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let db = create_db(dir, &[("fsal_read", 1, "init", 100)]);
    let config = write_config(dir);
    let graph = dir.join("out.svg");

    let output = run(
        dir,
        &[
            "-c",
            config.to_str().unwrap(),
            "fsal_mkdir",
            "--db",
            db.to_str().unwrap(),
            "--op_graph",
            graph.to_str().unwrap(),
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not find enough details in db for fsal_mkdir"));
    assert!(!graph.exists());
}

#[test]
fn test_all_samples_incomplete_fails_and_logs_discards() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let db = create_db(
        dir,
        &[("fsal_read", 1, "init", 100), ("fsal_read", 2, "init", 120)],
    );
    let config = write_config(dir);
    let graph = dir.join("out.svg");

    let output = run(
        dir,
        &[
            "-c",
            config.to_str().unwrap(),
            "fsal_read",
            "-d",
            db.to_str().unwrap(),
            "-o",
            graph.to_str().unwrap(),
        ],
    );

    assert!(!output.status.success());
    assert!(!graph.exists());
    assert!(String::from_utf8_lossy(&output.stderr).contains("(2 discarded)"));
    let discarded = fs::read_to_string(dir.join("logs/discarded.log")).unwrap();
    assert_eq!(discarded.lines().count(), 2);
    assert!(discarded.contains("missing finish"));
}

#[test]
fn test_missing_database_fails() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let config = write_config(dir);
    let output = run(
        dir,
        &[
            "-c",
            config.to_str().unwrap(),
            "fsal_read",
            "-d",
            dir.join("absent.db").to_str().unwrap(),
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to open database"));
}

#[test]
fn test_sorted_run_with_csv_export() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let db = create_db(
        dir,
        &[
            ("fsal_read", 1, "init", 0),
            ("fsal_read", 1, "finish", 300),
            ("fsal_read", 2, "init", 0),
            ("fsal_read", 2, "finish", 100),
            ("fsal_read", 3, "init", 0),
            ("fsal_read", 3, "finish", 200),
        ],
    );
    let config = write_config(dir);
    let csv = dir.join("samples.csv");

    let output = run(
        dir,
        &[
            "-c",
            config.to_str().unwrap(),
            "fsal_read",
            "-d",
            db.to_str().unwrap(),
            "-l",
            "NA",
            "--sort-by-time",
            "YES",
            "--csv",
            csv.to_str().unwrap(),
        ],
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(dir.join("cortxfs_hist_graph.svg").exists());
    let content = fs::read_to_string(&csv).unwrap();
    let ids: Vec<&str> = content
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(ids, vec!["2", "3", "1"]);
}

#[test]
fn test_init_then_validate() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    create_db(dir, &[("fsal_read", 1, "init", 1)]);

    let init = run(dir, &["init", "-o", "cortxfs_hist.toml"]);
    assert!(init.status.success());
    assert!(dir.join("cortxfs_hist.toml").exists());

    let again = run(dir, &["init", "-o", "cortxfs_hist.toml"]);
    assert!(!again.status.success());

    let validate = run(dir, &["validate", "-c", "cortxfs_hist.toml"]);
    assert!(
        validate.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&validate.stderr)
    );
    assert!(String::from_utf8_lossy(&validate.stderr).contains("Configuration validation passed"));
}

#[test]
fn test_missing_fn_tag_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &[]);
    assert!(!output.status.success());
}
