use dictscope::mcp::{DictscopeMcpServer, types::FindUnusedParams};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;

use crate::{McpTestFixture, extract_tool_result_json};

fn find_unused_params(fixture: &McpTestFixture) -> Parameters<FindUnusedParams> {
    Parameters(FindUnusedParams {
        workspace_root_path: fixture.root(),
        file_path: fixture
            .root_path()
            .join("src/app.content.ts")
            .to_string_lossy()
            .to_string(),
    })
}

// ============================================================================
// find_unused tests
// ============================================================================

#[tokio::test]
async fn test_find_unused_fields() {
    let fixture = McpTestFixture::with_app_dictionary().unwrap();
    fixture
        .write_file(
            "src/Hero.tsx",
            r#"import { useIntlayer } from "react-intlayer";

export const Hero = () => {
  const { hero } = useIntlayer("app");
  return <h1>{hero.title}</h1>;
};
"#,
        )
        .unwrap();
    let server = DictscopeMcpServer::new();

    let result = server.find_unused(find_unused_params(&fixture)).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["key"], "app");
    assert_eq!(json_result["dictionaryUsed"], true);
    let paths: Vec<&str> = json_result["unusedFields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|field| field["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["hero.subtitle", "count"]);
}

#[tokio::test]
async fn test_find_unused_dictionary_without_readers() {
    let fixture = McpTestFixture::with_app_dictionary().unwrap();
    let server = DictscopeMcpServer::new();

    let result = server.find_unused(find_unused_params(&fixture)).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(
        json_result,
        json!({ "key": "app", "dictionaryUsed": false, "unusedFields": [] })
    );
}

#[tokio::test]
async fn test_find_unused_reuses_engine_across_calls() {
    let fixture = McpTestFixture::with_app_dictionary().unwrap();
    let server = DictscopeMcpServer::new();

    let first = server.find_unused(find_unused_params(&fixture)).await.unwrap();
    let second = server.find_unused(find_unused_params(&fixture)).await.unwrap();

    assert_eq!(
        extract_tool_result_json(&first),
        extract_tool_result_json(&second)
    );
}
