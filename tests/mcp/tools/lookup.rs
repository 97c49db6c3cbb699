use dictscope::mcp::{
    DictscopeMcpServer,
    types::{LocateFieldParams, ResolveOriginParams},
};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;

use crate::{McpTestFixture, extract_tool_result_json};

const PAGE: &str = r#"import { getIntlayer } from "intlayer";

export const title = getIntlayer("app").hero.title;
"#;

// ============================================================================
// resolve_origin tests
// ============================================================================

#[tokio::test]
async fn test_resolve_origin_found() {
    let fixture = McpTestFixture::with_app_dictionary().unwrap();
    fixture.write_file("src/page.ts", PAGE).unwrap();
    let server = DictscopeMcpServer::new();

    // Inside `title` at the end of line 2
    let params = Parameters(ResolveOriginParams {
        workspace_root_path: fixture.root(),
        file_path: "src/page.ts".to_string(),
        line: 2,
        character: 46,
    });

    let result = server.resolve_origin(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["found"], true);
    assert_eq!(json_result["origin"]["dictionaryKey"], "app");
    assert_eq!(json_result["origin"]["fieldPath"], json!(["hero", "title"]));
    assert_eq!(json_result["origin"]["contentPath"], json!(["hero", "title"]));
    assert_eq!(json_result["origin"]["moduleSource"], "intlayer");
}

#[tokio::test]
async fn test_resolve_origin_not_found() {
    let fixture = McpTestFixture::with_app_dictionary().unwrap();
    fixture.write_file("src/page.ts", PAGE).unwrap();
    let server = DictscopeMcpServer::new();

    let params = Parameters(ResolveOriginParams {
        workspace_root_path: fixture.root(),
        file_path: "src/page.ts".to_string(),
        line: 0,
        character: 0,
    });

    let result = server.resolve_origin(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["found"], false);
    assert!(json_result["origin"].is_null());
}

#[tokio::test]
async fn test_resolve_origin_missing_file_is_an_error() {
    let fixture = McpTestFixture::new().unwrap();
    let server = DictscopeMcpServer::new();

    let params = Parameters(ResolveOriginParams {
        workspace_root_path: fixture.root(),
        file_path: "src/nope.ts".to_string(),
        line: 0,
        character: 0,
    });

    assert!(server.resolve_origin(params).await.is_err());
}

// ============================================================================
// locate_field tests
// ============================================================================

#[tokio::test]
async fn test_locate_field_in_dictionary_json() {
    let fixture = McpTestFixture::with_app_dictionary().unwrap();
    let server = DictscopeMcpServer::new();

    let params = Parameters(LocateFieldParams {
        workspace_root_path: fixture.root(),
        file_path: ".intlayer/unmerged_dictionary/app.json".to_string(),
        field_path: "content.count".to_string(),
    });

    let result = server.locate_field(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(
        json_result,
        json!({ "found": true, "position": { "line": 5, "character": 6 } })
    );
}

#[tokio::test]
async fn test_locate_field_in_content_file() {
    let fixture = McpTestFixture::with_app_dictionary().unwrap();
    let server = DictscopeMcpServer::new();

    let params = Parameters(LocateFieldParams {
        workspace_root_path: fixture.root(),
        file_path: "src/app.content.ts".to_string(),
        field_path: "content.hero.subtitle".to_string(),
    });

    let result = server.locate_field(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(
        json_result,
        json!({ "found": true, "position": { "line": 7, "character": 6 } })
    );
}

#[tokio::test]
async fn test_locate_field_missing() {
    let fixture = McpTestFixture::with_app_dictionary().unwrap();
    let server = DictscopeMcpServer::new();

    let params = Parameters(LocateFieldParams {
        workspace_root_path: fixture.root(),
        file_path: "src/app.content.ts".to_string(),
        field_path: "content.nothing".to_string(),
    });

    let result = server.locate_field(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result, json!({ "found": false, "position": null }));
}
