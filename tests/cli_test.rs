//! Integration tests for the `strata` binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const MANIFEST: &str = r#"
[package]
name = demo

[require]
php = 5.3
pear.php.net/Console_Getopt = 1.0
"#;

fn setup_project(manifest: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("package.ini"), manifest).unwrap();
    temp
}

fn strata() -> Command {
    Command::new(cargo_bin("strata"))
}

#[test]
fn cli_no_args_shows_commands() -> Result<(), Box<dyn std::error::Error>> {
    strata()
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("bundle"))
        .stdout(predicate::str::contains("compile"));
    Ok(())
}

#[test]
fn cli_list_shows_briefs() -> Result<(), Box<dyn std::error::Error>> {
    strata()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Compile the current sources"))
        .stdout(predicate::str::contains("List available commands"));
    Ok(())
}

#[test]
fn cli_list_json() -> Result<(), Box<dyn std::error::Error>> {
    let output = strata().args(["list", "--json"]).output()?;
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let names: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["list", "help", "bundle", "compile"]);
    Ok(())
}

#[test]
fn cli_help_for_command() -> Result<(), Box<dyn std::error::Error>> {
    strata()
        .args(["help", "compile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--output <VALUE>"))
        .stdout(predicate::str::contains("--lib <VALUE>..."));
    Ok(())
}

#[test]
fn cli_help_for_nested_command() -> Result<(), Box<dyn std::error::Error>> {
    strata()
        .args(["help", "bundle", "install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-f, --force"));
    Ok(())
}

#[test]
fn cli_compile_reports_plan() -> Result<(), Box<dyn std::error::Error>> {
    strata()
        .args(["compile", "--lib", "lib", "-c", "--output=app.phar", "vendor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sources: lib, vendor"))
        .stdout(predicate::str::contains("compression: gz"))
        .stdout(predicate::str::contains("Planned app.phar"));
    Ok(())
}

#[test]
fn cli_compile_rejects_conflicting_compression() -> Result<(), Box<dyn std::error::Error>> {
    strata()
        .args(["compile", "--compress", "--no-compress"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot be combined"));
    Ok(())
}

#[test]
fn cli_missing_option_value_exits_2() -> Result<(), Box<dyn std::error::Error>> {
    strata()
        .args(["compile", "--output"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid option '--output'"));
    Ok(())
}

#[test]
fn cli_unknown_option_exits_2() -> Result<(), Box<dyn std::error::Error>> {
    strata()
        .arg("--bogus")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown option"));
    Ok(())
}

#[test]
fn cli_app_option_is_not_a_command_option() -> Result<(), Box<dyn std::error::Error>> {
    strata()
        .args(["compile", "--verbose"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid option '--verbose'"));
    Ok(())
}

#[test]
fn cli_unknown_command_fails() -> Result<(), Box<dyn std::error::Error>> {
    strata()
        .arg("bundel")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Command 'bundel' not found"));
    Ok(())
}

#[test]
fn cli_bundle_install_reads_manifest() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MANIFEST);
    strata()
        .current_dir(temp.path())
        .args(["bundle", "--path", "deps", "install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installing 2 package(s) into deps"))
        .stdout(predicate::str::contains("pear.php.net/Console_Getopt"));
    Ok(())
}

#[test]
fn cli_bundle_install_reads_commented_manifest() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("[require] ; runtime\nphp = 5.3 ; minimum\ntwig\n");
    strata()
        .current_dir(temp.path())
        .args(["bundle", "install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installing 2 package(s) into .local"))
        .stdout(predicate::str::contains("  - twig"));
    Ok(())
}

#[test]
fn cli_bundle_install_named_package_with_force() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MANIFEST);
    strata()
        .current_dir(temp.path())
        .args(["bundle", "install", "--force", "php"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reinstalling 1 package(s) into .local"));
    Ok(())
}

#[test]
fn cli_bundle_install_without_manifest_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    strata()
        .current_dir(temp.path())
        .args(["bundle", "install"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("package.ini not found, please define one"));
    Ok(())
}

#[test]
fn cli_bundle_status_uses_custom_manifest() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(MANIFEST);
    fs::rename(temp.path().join("package.ini"), temp.path().join("app.ini"))?;
    strata()
        .current_dir(temp.path())
        .args(["bundle", "-m", "app.ini", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("manifest: app.ini (found)"));
    Ok(())
}

#[test]
fn cli_bundle_without_subcommand_exits_2() -> Result<(), Box<dyn std::error::Error>> {
    strata()
        .arg("bundle")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("bundle needs a subcommand"));
    Ok(())
}

#[test]
fn cli_quiet_hides_hints() -> Result<(), Box<dyn std::error::Error>> {
    strata()
        .args(["-q", "help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("help <command>").not());
    Ok(())
}
