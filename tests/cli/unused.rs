use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CONTENT, CliTest};

#[test]
fn test_unused_fields_json() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    let (output, json) = test.json(&["unused", "src/app.content.ts"])?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json["status"], "fields");
    assert_eq!(json["key"], "app");
    let paths: Vec<_> = json["unused"]
        .as_array()
        .unwrap()
        .iter()
        .map(|field| field["path"].clone())
        .collect();
    assert_eq!(paths, vec![json!(["count"]), json!(["unusedLeaf"])]);
    Ok(())
}

#[test]
fn test_unused_text_output() -> Result<()> {
    let test = CliTest::intlayer_project()?;

    let output = test.command().args(["unused", "src/app.content.ts"]).output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("property \"count\" is unused"), "stdout: {}", stdout);
    assert!(stdout.contains("2 unused fields in \"app\""), "stdout: {}", stdout);
    Ok(())
}

#[test]
fn test_dictionary_without_readers() -> Result<()> {
    let test = CliTest::intlayer_project()?;
    test.write_file("src/App.tsx", "export const App = () => null;\n")?;

    let (output, json) = test.json(&["unused", "src/app.content.ts"])?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json["status"], "dictionaryUnused");
    assert_eq!(json["key"], "app");
    Ok(())
}

#[test]
fn test_all_fields_used_succeeds() -> Result<()> {
    let test = CliTest::intlayer_project()?;
    test.write_file(
        "src/Stats.tsx",
        r#"import { useIntlayer } from "react-intlayer";

export const Stats = () => {
  const { count, unusedLeaf } = useIntlayer("app");
  return <span>{count}{unusedLeaf}</span>;
};
"#,
    )?;

    let (output, json) = test.json(&["unused", "src/app.content.ts"])?;

    assert_eq!(output.status.code(), Some(0), "json: {}", json);
    assert_eq!(json["unused"], json!([]));
    Ok(())
}

#[test]
fn test_file_without_declaration() -> Result<()> {
    let test = CliTest::intlayer_project()?;
    test.write_file("src/other.content.ts", &CONTENT.replace("key: \"app\",", ""))?;

    let (output, json) = test.json(&["unused", "src/other.content.ts"])?;

    assert_eq!(output.status.code(), Some(0));
    assert!(json.is_null());
    Ok(())
}
