use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::CliTest;

#[test]
fn test_usages_lists_reading_files() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    let (output, json) = test.json(&["usages", "app"])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(json["key"], "app");
    let usages = json["usages"].as_array().unwrap();
    assert_eq!(usages.len(), 1);
    assert_eq!(usages[0]["filePath"], test.path("src/App.tsx"));
    let keys: Vec<&str> = usages[0]["keysUsed"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|k| k.as_str())
        .collect();
    assert!(keys.contains(&"hero.title"), "keys: {:?}", keys);
    Ok(())
}

#[test]
fn test_usages_of_unknown_key_is_empty_success() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    let (output, json) = test.json(&["usages", "missing"])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(json["usages"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[test]
fn test_usages_text_summary() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    let output = test.command().args(["usages", "app"]).output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--> src/App.tsx:4:"), "stdout: {}", stdout);
    assert!(stdout.contains("Found \"app\" in 1"), "stdout: {}", stdout);
    Ok(())
}

#[test]
fn test_references_from_content_field() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    // `title:` in the content declaration, line 7
    let (output, json) = test.json(&["references", "src/app.content.ts", "7", "7"])?;

    assert_eq!(output.status.code(), Some(0));
    let locations = json.as_array().unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0]["filePath"], test.path("src/App.tsx"));
    assert_eq!(locations[0]["range"]["start"]["line"], 6);
    Ok(())
}
