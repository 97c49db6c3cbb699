use dictscope::mcp::{DictscopeMcpServer, types::GetConfigParams};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;

use crate::{McpTestFixture, extract_tool_result_json};

// ============================================================================
// get_config tests
// ============================================================================

#[tokio::test]
async fn test_get_config_defaults() {
    let fixture = McpTestFixture::new().unwrap();
    let server = DictscopeMcpServer::new();

    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(
        json_result["config"]["unmergedDictionariesDir"],
        ".intlayer/unmerged_dictionary"
    );
    assert_eq!(json_result["config"]["defaultLocale"], "en");
    assert_eq!(json_result["config"]["cmsUrl"], "https://intlayer.org");
    assert!(json_result["config"]["ignores"].is_array());
    assert_eq!(json_result["fromFile"], false);
}

#[tokio::test]
async fn test_get_config_from_dictscoperc() {
    let fixture = McpTestFixture::new().unwrap();

    fixture
        .write_config(&json!({
            "unmergedDictionariesDir": "dicts",
            "defaultLocale": "fr"
        }))
        .unwrap();

    let server = DictscopeMcpServer::new();

    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["fromFile"], true);
    assert_eq!(json_result["config"]["unmergedDictionariesDir"], "dicts");
    assert_eq!(json_result["config"]["defaultLocale"], "fr");
    // Unset fields keep their defaults
    assert_eq!(json_result["config"]["cmsUrl"], "https://intlayer.org");
}

#[tokio::test]
async fn test_get_config_invalid_file_is_an_error() {
    let fixture = McpTestFixture::new().unwrap();
    fixture
        .write_config(&json!({ "defaultLocale": "" }))
        .unwrap();

    let server = DictscopeMcpServer::new();
    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    assert!(server.get_config(params).await.is_err());
}
