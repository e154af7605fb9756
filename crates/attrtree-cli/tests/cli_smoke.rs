use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn input_file(contents: &str) -> Result<NamedTempFile, Box<dyn std::error::Error>> {
    let mut tmp = NamedTempFile::new()?;
    write!(tmp, "{}", contents)?;
    Ok(tmp)
}

#[test]
fn help_works() -> Result<(), Box<dyn std::error::Error>> {
    Command::new(assert_cmd::cargo::cargo_bin!("attrtree-cli"))
        .arg("--help")
        .assert()
        .success();
    Ok(())
}

#[test]
fn text_output_flattens_groups() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = input_file(r#"{"a": 1, "b": ["x"], "c": [], "d": null, "e": {"f": true}}"#)?;

    Command::new(assert_cmd::cargo::cargo_bin!("attrtree-cli"))
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "value.a=1 value.b=x value.c=\"\" value.d=<nil> value.e.f=true",
        ));
    Ok(())
}

#[test]
fn json_output_nests_groups() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = input_file(r#"{"list": [1, 2], "empty": {}}"#)?;

    let output = Command::new(assert_cmd::cargo::cargo_bin!("attrtree-cli"))
        .args(["--format", "json", "--key", "doc"])
        .arg(tmp.path())
        .output()?;
    assert!(output.status.success());
    let out: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        out,
        serde_json::json!({"doc": {"list": {"0": 1, "1": 2}, "empty": "{}"}})
    );
    Ok(())
}

#[test]
fn keep_singletons_applies_to_root_array() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = input_file(r#"["only"]"#)?;

    Command::new(assert_cmd::cargo::cargo_bin!("attrtree-cli"))
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("value=only"));

    Command::new(assert_cmd::cargo::cargo_bin!("attrtree-cli"))
        .arg("--keep-singletons")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("value.0=only"));
    Ok(())
}

#[test]
fn sort_keys_orders_members() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = input_file(r#"{"b": 2, "a": 1}"#)?;

    Command::new(assert_cmd::cargo::cargo_bin!("attrtree-cli"))
        .arg("--sort-keys")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("value.a=1 value.b=2"));
    Ok(())
}

#[test]
fn invalid_json_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = input_file("{not json")?;

    Command::new(assert_cmd::cargo::cargo_bin!("attrtree-cli"))
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("parsing JSON input"));
    Ok(())
}
