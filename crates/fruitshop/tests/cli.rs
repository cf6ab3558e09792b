use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn fruitshop() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_fruitshop"));
    command.env("RUST_LOG", "warn");
    command
}

#[test]
fn effects_json_lists_every_effect() {
    let output = fruitshop()
        .args(["effects", "--json"])
        .output()
        .expect("failed to run fruitshop effects");
    assert!(output.status.success());

    let entries: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("effects output is JSON");
    let entries = entries.as_array().expect("array of effects");
    assert_eq!(entries.len(), 9);
    assert!(entries
        .iter()
        .any(|entry| entry["id"] == "circular-gradient" && entry["name"] == "Circular Gradient"));
}

#[test]
fn check_config_accepts_valid_and_rejects_invalid_files() {
    let root = TempDir::new().unwrap();
    let valid = root.path().join("valid.toml");
    fs::write(
        &valid,
        r#"
version = 1

[display]
width = 640
height = 400

[background]
effect = "ocean"
"#,
    )
    .unwrap();
    let output = fruitshop()
        .args(["check-config"])
        .arg(&valid)
        .output()
        .expect("failed to run fruitshop check-config");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("effect ocean"), "{stdout}");

    let invalid = root.path().join("invalid.toml");
    fs::write(&invalid, "version = 1\n[background]\nmode = \"sometimes\"\n").unwrap();
    let status = fruitshop()
        .args(["check-config"])
        .arg(&invalid)
        .status()
        .expect("failed to run fruitshop check-config");
    assert!(!status.success());
}

#[test]
fn render_without_gpu_completes() {
    let root = TempDir::new().unwrap();
    let out = root.path().join("frame.png");
    let status = fruitshop()
        .args([
            "render", "--no-gpu", "--effect", "warp", "--size", "200x150", "--frames", "10",
            "--seed", "3",
        ])
        .arg("--out")
        .arg(&out)
        .status()
        .expect("failed to run fruitshop render");
    assert!(status.success());
    assert!(!out.exists());
}

#[test]
fn render_rejects_unknown_effect() {
    let status = fruitshop()
        .args(["render", "--no-gpu", "--effect", "lava-lamp"])
        .status()
        .expect("failed to run fruitshop render");
    assert!(!status.success());
}
