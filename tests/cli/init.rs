use anyhow::{Context, Result};
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["unmergedDictionariesDir"], ".intlayer/unmerged_dictionary");
    assert_eq!(parsed["defaultLocale"], "en");
    assert!(parsed["ignores"].is_array(), "Config should have 'ignores' array");
    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Created .dictscoperc.json"));

    let content = test.read_file(".dictscoperc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".dictscoperc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
    assert_eq!(test.read_file(".dictscoperc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    test.command().arg("init").output()?;

    let (output, json) = test.json(&["usages", "app"])?;
    assert!(
        output.status.success(),
        "usages should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(json["usages"].as_array().map(Vec::len), Some(1));

    Ok(())
}
