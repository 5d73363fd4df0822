use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn texpreview() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_texpreview"));
    command.env_remove("TEXPREVIEW_CONFIG");
    command
}

#[test]
fn exports_png_with_requested_size() {
    let root = TempDir::new().unwrap();
    let output = root.path().join("out/checker.png");

    let status = texpreview()
        .args(["--size", "16x8", "--pattern", "checker", "--updates", "3"])
        .arg("--output")
        .arg(&output)
        .status()
        .expect("failed to run texpreview");
    assert!(status.success());

    let image = image::open(&output).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (16, 8));
}

#[test]
fn default_pattern_white_fills_surface() {
    let root = TempDir::new().unwrap();
    let config = root.path().join("canvas.toml");
    let output = root.path().join("white.png");
    fs::write(&config, "width = 4\nheight = 4\n").unwrap();

    let status = texpreview()
        .arg("--config")
        .arg(&config)
        .args(["--pattern", "white"])
        .arg("--output")
        .arg(&output)
        .status()
        .expect("failed to run texpreview");
    assert!(status.success());

    let image = image::open(&output).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (4, 4));
    assert!(image.pixels().all(|pixel| pixel.0 == [255, 255, 255, 255]));
}

#[test]
fn visible_snapshots_are_removed_on_exit() {
    let root = TempDir::new().unwrap();
    let snapshots = root.path().join("snapshots");
    let output = root.path().join("stripes.png");

    let status = texpreview()
        .args(["--size", "8x8", "--pattern", "stripes", "--visible"])
        .arg("--snapshot-dir")
        .arg(&snapshots)
        .arg("--output")
        .arg(&output)
        .status()
        .expect("failed to run texpreview");
    assert!(status.success());
    assert!(output.exists());
    assert!(snapshots.is_dir());
    assert_eq!(fs::read_dir(&snapshots).unwrap().count(), 0);
}

#[test]
fn invalid_config_fails() {
    let root = TempDir::new().unwrap();
    let config = root.path().join("canvas.toml");
    fs::write(&config, "width = 0\n").unwrap();

    let output = texpreview()
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(root.path().join("never.png"))
        .output()
        .expect("failed to run texpreview");
    assert!(!output.status.success());
    assert!(!root.path().join("never.png").exists());
}
