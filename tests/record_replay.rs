//! Cassette replay integration tests — zero network I/O.
//!
//! Each test writes a cassette to a temp directory and sets
//! `IMAGEN_STUDIO_REPLAY` so the binary never contacts the live API.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use base64::Engine;
use predicates::prelude::*;

fn cmd(cassette: &Path) -> Command {
    let mut cmd = Command::cargo_bin("imagen-studio").unwrap();
    cmd.env("IMAGEN_STUDIO_REPLAY", cassette.to_str().unwrap())
        .env("IMAGEN_STUDIO_CONFIG", "/nonexistent/imagen-studio/config.toml")
        .env_remove("GEMINI_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .env_remove("IMAGEN_STUDIO_REC")
        .env_remove("RUST_LOG");
    cmd
}

/// A real 2x2 PNG, base64 encoded.
fn png_b64() -> String {
    let img = image::DynamicImage::new_rgb8(2, 2);
    let mut buf = std::io::Cursor::new(Vec::<u8>::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    base64::engine::general_purpose::STANDARD.encode(buf.into_inner())
}

/// Build one interaction entry from its `output:` YAML block.
fn interaction(seq: usize, output: &str) -> String {
    format!(
        "  - seq: {seq}\n    port: image_generator\n    method: generate\n    input: {{}}\n    output:\n{output}"
    )
}

fn ok_with_image() -> String {
    format!("      Ok:\n        images:\n          - data: {}\n            mime_type: image/png\n", png_b64())
}

fn ok_empty() -> String {
    "      Ok:\n        images: []\n".to_string()
}

fn err(message: &str) -> String {
    format!("      Err: \"{message}\"\n")
}

fn write_cassette(name: &str, interactions: &[String]) -> PathBuf {
    let mut content =
        format!("name: {name}\nrecorded_at: \"2026-10-01T00:00:00Z\"\ncommit: test\n");
    if interactions.is_empty() {
        content.push_str("interactions: []\n");
    } else {
        content.push_str("interactions:\n");
        for entry in interactions {
            content.push_str(entry);
        }
    }
    let path = std::env::temp_dir().join(format!("imagen_studio_{name}.cassette.yaml"));
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn happy_path_creates_png() {
    let cassette = write_cassette("happy", &[interaction(0, &ok_with_image())]);
    let out = std::env::temp_dir().join("imagen_studio_test_happy.png");
    let _ = std::fs::remove_file(&out);

    cmd(&cassette)
        .args(["--style", "anime", "--seed", "1234", "--output", out.to_str().unwrap(), "a fox"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Seed: 1234"))
        .stderr(predicate::str::contains("Saved:"));

    let data = std::fs::read(&out).unwrap();
    assert_eq!(&data[..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);

    let _ = std::fs::remove_file(&out);
    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn format_jpeg_converts_png() {
    let cassette = write_cassette("convert", &[interaction(0, &ok_with_image())]);
    let out = std::env::temp_dir().join("imagen_studio_test_convert.jpg");
    let _ = std::fs::remove_file(&out);

    cmd(&cassette)
        .args(["--format", "jpeg", "--output", out.to_str().unwrap(), "a harbor"])
        .assert()
        .success();

    let data = std::fs::read(&out).unwrap();
    assert_eq!(&data[..3], &[0xFF, 0xD8, 0xFF], "output should be a JPEG");

    let _ = std::fs::remove_file(&out);
    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn auto_filename_includes_seed() {
    let cassette = write_cassette("autofile", &[interaction(0, &ok_with_image())]);
    let work_dir = std::env::temp_dir().join("imagen_studio_test_autofile");
    let _ = std::fs::remove_dir_all(&work_dir);
    std::fs::create_dir_all(&work_dir).unwrap();

    cmd(&cassette)
        .args(["--seed", "77", "a rainy city"])
        .current_dir(&work_dir)
        .assert()
        .success();

    let files: Vec<_> = std::fs::read_dir(&work_dir).unwrap().flatten().collect();
    assert_eq!(files.len(), 1, "exactly one file should be created");
    let name = files[0].file_name().to_string_lossy().into_owned();
    assert!(name.starts_with("a-rainy-city-77-"), "got: {name}");
    assert!(name.ends_with(".png"), "got: {name}");

    let _ = std::fs::remove_dir_all(&work_dir);
    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn forbidden_shows_billing_hint() {
    let cassette = write_cassette(
        "quota",
        &[interaction(0, &err("API error (403): Imagen API is only accessible to billed users"))],
    );

    cmd(&cassette)
        .arg("a cat")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Generation failed"))
        .stderr(predicate::str::contains("Hint: Billing is not set up"));

    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn other_service_error_has_no_hint() {
    let cassette = write_cassette("unknown", &[interaction(0, &err("API error (400): bad prompt"))]);

    cmd(&cassette)
        .arg("a cat")
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad prompt"))
        .stderr(predicate::str::contains("Hint:").not());

    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn zero_images_is_reported() {
    let cassette = write_cassette("empty", &[interaction(0, &ok_empty())]);

    cmd(&cassette)
        .arg("a cat")
        .assert()
        .failure()
        .stderr(predicate::str::contains("returned no images"));

    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn interactive_session_survives_failures() {
    let cassette = write_cassette(
        "interactive",
        &[
            interaction(0, &err("API error (403): quota exceeded")),
            interaction(1, &ok_with_image()),
        ],
    );
    let work_dir = std::env::temp_dir().join("imagen_studio_test_interactive");
    let _ = std::fs::remove_dir_all(&work_dir);
    std::fs::create_dir_all(&work_dir).unwrap();

    cmd(&cassette)
        .args(["--interactive", "--seed", "5"])
        .current_dir(&work_dir)
        .write_stdin(":seed\n:style watercolor\na lake\n:reseed\n:go a lake at dusk\n:quit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Seed: 5"))
        .stderr(predicate::str::contains("Style: watercolor"))
        .stderr(predicate::str::contains("Hint: Billing is not set up"))
        .stderr(predicate::str::contains("Saved: a-lake-at-dusk-"));

    let files = std::fs::read_dir(&work_dir).unwrap().flatten().count();
    assert_eq!(files, 1);

    let _ = std::fs::remove_dir_all(&work_dir);
    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn empty_cassette_is_an_error() {
    let cassette = write_cassette("no_interactions", &[]);

    cmd(&cassette)
        .arg("a cat")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no interactions for image_generator::generate"));

    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn exhausted_cassette_is_reported_per_request() {
    let cassette = write_cassette("exhausted", &[interaction(0, &ok_with_image())]);
    let work_dir = std::env::temp_dir().join("imagen_studio_test_exhausted");
    let _ = std::fs::remove_dir_all(&work_dir);
    std::fs::create_dir_all(&work_dir).unwrap();

    cmd(&cassette)
        .args(["--interactive", "--seed", "9"])
        .current_dir(&work_dir)
        .write_stdin("a fox\na second fox\n:quit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved: a-fox-9-"))
        .stderr(predicate::str::contains("Cassette exhausted"));

    let _ = std::fs::remove_dir_all(&work_dir);
    let _ = std::fs::remove_file(&cassette);
}
