use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::CliTest;

#[test]
fn test_resolve_json() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    // `title` in `content.hero.title`, line 7
    let (output, json) = test.json(&["resolve", "src/App.tsx", "7", "26"])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        json,
        json!({
            "dictionaryKey": "app",
            "fieldPath": ["hero", "title"],
            "moduleSource": "react-intlayer"
        })
    );
    Ok(())
}

#[test]
fn test_resolve_text() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    let output = test.command().args(["resolve", "src/App.tsx", "7", "26"]).output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("key:    app"), "stdout: {}", stdout);
    assert!(stdout.contains("path:   hero.title"), "stdout: {}", stdout);
    Ok(())
}

#[test]
fn test_resolve_outside_content_fails() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    let (output, json) = test.json(&["resolve", "src/App.tsx", "1", "1"])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(json.is_null());
    Ok(())
}

#[test]
fn test_hover_json() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    let (output, json) = test.json(&["hover", "src/App.tsx", "7", "26"])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(json["displayType"], "IntlayerNode");
    assert_eq!(json["path"], json!(["hero", "title"]));
    assert_eq!(json["entries"][0]["kind"], "local");
    assert_eq!(
        json["entries"][0]["body"],
        json!({ "format": "translations", "value": [["en", "Welcome  home"], ["fr", "Bienvenue"]] })
    );
    Ok(())
}

#[test]
fn test_definition_points_into_content_file() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    let (output, json) = test.json(&["definition", "src/App.tsx", "7", "26"])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        json,
        json!([{
            "filePath": test.path("src/app.content.ts"),
            "position": { "line": 6, "character": 6 },
            "exact": true
        }])
    );
    Ok(())
}

#[test]
fn test_definition_text_uses_one_based_location() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    let output = test.command().args(["definition", "src/App.tsx", "7", "26"]).output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--> src/app.content.ts:7:7"), "stdout: {}", stdout);
    Ok(())
}

#[test]
fn test_locate_field_in_content_file() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    let (output, json) = test.json(&["locate", "src/app.content.ts", "content.hero.title"])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(json, json!({ "line": 6, "character": 6 }));
    Ok(())
}

#[test]
fn test_locate_missing_field_fails() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    let (output, json) = test.json(&["locate", "src/app.content.ts", "content.nope"])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(json.is_null());
    Ok(())
}

#[test]
fn test_previews_json() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    let (output, json) = test.json(&["previews", "src/App.tsx"])?;

    assert_eq!(output.status.code(), Some(0));
    let previews: Vec<(u64, String)> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| (p["line"].as_u64().unwrap(), p["text"].as_str().unwrap().to_string()))
        .collect();
    assert_eq!(
        previews,
        vec![(6, "Welcome home".to_string()), (7, "Sub".to_string())]
    );
    Ok(())
}

#[test]
fn test_missing_workspace_is_an_error() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .command()
        .args(["resolve", "src/App.tsx", "1", "1", "--workspace", "does-not-exist"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
    Ok(())
}
