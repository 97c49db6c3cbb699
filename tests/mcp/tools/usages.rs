use dictscope::mcp::{DictscopeMcpServer, types::FindUsagesParams};
use rmcp::handler::server::wrapper::Parameters;

use crate::{McpTestFixture, assert_pagination, extract_tool_result_json};

fn component(name: &str) -> String {
    format!(
        r#"import {{ useIntlayer }} from "react-intlayer";

export const {name} = () => {{
  const {{ hero }} = useIntlayer("app");
  return <h1>{{hero.title}}</h1>;
}};
"#
    )
}

fn fixture_with_components(count: usize) -> McpTestFixture {
    let fixture = McpTestFixture::with_app_dictionary().unwrap();
    for i in 0..count {
        fixture
            .write_file(&format!("src/components/C{i}.tsx"), &component(&format!("C{i}")))
            .unwrap();
    }
    fixture
}

// ============================================================================
// find_usages tests
// ============================================================================

#[tokio::test]
async fn test_find_usages_lists_files() {
    let fixture = fixture_with_components(2);
    let server = DictscopeMcpServer::new();

    let params = Parameters(FindUsagesParams {
        project_root_path: fixture.root(),
        key: "app".to_string(),
        limit: None,
        offset: None,
    });

    let result = server.find_usages(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["key"], "app");
    assert_eq!(json_result["totalFileCount"], 2);
    let items = json_result["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    for item in items {
        assert!(item["filePath"].as_str().unwrap().ends_with(".tsx"));
        assert!(item["keysUsed"].as_array().unwrap().contains(&"hero.title".into()));
        assert!(item["keyLocations"]["hero.title"].is_array());
    }
    assert_pagination(&json_result, 0, 20, false);
}

#[tokio::test]
async fn test_find_usages_pagination() {
    let fixture = fixture_with_components(5);
    let server = DictscopeMcpServer::new();

    let params = Parameters(FindUsagesParams {
        project_root_path: fixture.root(),
        key: "app".to_string(),
        limit: Some(2),
        offset: Some(2),
    });

    let result = server.find_usages(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["totalFileCount"], 5);
    assert_eq!(json_result["items"].as_array().unwrap().len(), 2);
    assert_pagination(&json_result, 2, 2, true);
}

#[tokio::test]
async fn test_find_usages_limit_is_capped() {
    let fixture = fixture_with_components(1);
    let server = DictscopeMcpServer::new();

    let params = Parameters(FindUsagesParams {
        project_root_path: fixture.root(),
        key: "app".to_string(),
        limit: Some(1000),
        offset: None,
    });

    let result = server.find_usages(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_pagination(&json_result, 0, 100, false);
}

#[tokio::test]
async fn test_find_usages_unknown_key() {
    let fixture = fixture_with_components(1);
    let server = DictscopeMcpServer::new();

    let params = Parameters(FindUsagesParams {
        project_root_path: fixture.root(),
        key: "other".to_string(),
        limit: None,
        offset: None,
    });

    let result = server.find_usages(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["totalFileCount"], 0);
    assert_pagination(&json_result, 0, 20, false);
}
