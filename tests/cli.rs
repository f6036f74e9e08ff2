use std::io::Write;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::NamedTempFile;

fn write_showcase(xml: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("temp showcase");
    tmp.write_all(xml.as_bytes()).expect("write showcase");
    tmp
}

#[test]
fn cli_summarizes_the_builtin_showcase() {
    let mut cmd = Command::cargo_bin("scrollstage").expect("binary exists");
    cmd.arg("--summary-only").arg("--frames").arg("240");
    cmd.assert()
        .success()
        .stdout(contains("Loaded showcase with 3 sections (200 particles)"))
        .stdout(contains(" - Intro (torus)"))
        .stdout(contains(" - Work (cone)"))
        .stdout(contains(" - Contact (torus-knot)"))
        .stdout(contains("Final frame state after 240 frames:"))
        .stdout(contains(" - Contact rot=(0.40, 0.48) pos=(0.00, -8.00, 0.00)"))
        .stdout(contains("Camera y=-8.00 rig=(0.25, 0.25)"));
}

#[test]
fn cli_runs_a_showcase_from_a_file() {
    let showcase = write_showcase(
        r#"<showcase>
  <settings>
    <object-distance>5</object-distance>
    <particle-count>50</particle-count>
  </settings>
  <section>
    <name>Opening</name>
    <shape>torus</shape>
  </section>
  <section>
    <name>Closing</name>
    <shape>cone</shape>
  </section>
</showcase>
"#,
    );

    let mut cmd = Command::cargo_bin("scrollstage").expect("binary exists");
    cmd.arg(showcase.path())
        .arg("--summary-only")
        .arg("--frames")
        .arg("120");
    cmd.assert()
        .success()
        .stdout(contains("Loaded showcase with 2 sections (50 particles)"))
        .stdout(contains(" - Opening (torus)"))
        .stdout(contains(" - Closing rot=(0.20, 0.24) pos=(0.00, -5.00, 0.00)"))
        .stdout(contains("Camera y=-5.00 rig=(0.25, 0.25)"));
}

#[test]
fn cli_rejects_an_unknown_shape() {
    let showcase = write_showcase(
        r#"<showcase>
  <section>
    <name>Broken</name>
    <shape>sphere</shape>
  </section>
</showcase>
"#,
    );

    let mut cmd = Command::cargo_bin("scrollstage").expect("binary exists");
    cmd.arg(showcase.path()).arg("--summary-only");
    cmd.assert()
        .failure()
        .stderr(contains("unknown shape kind `sphere`"));
}

#[test]
fn cli_rejects_unknown_flags() {
    let mut cmd = Command::cargo_bin("scrollstage").expect("binary exists");
    cmd.arg("--bogus");
    cmd.assert()
        .failure()
        .stderr(contains("Unknown argument: --bogus"));
}
