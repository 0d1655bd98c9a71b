use utoipa::OpenApi;

use user_api::app::ApiDoc;

#[test]
fn test_openapi_spec_has_all_endpoints() {
    let spec = ApiDoc::openapi();
    let paths = &spec.paths.paths;

    assert!(paths.contains_key("/api/users"), "Missing /api/users path");
    assert!(paths.contains_key("/api/users/{id}"), "Missing /api/users/{{id}} path");
    assert!(paths.contains_key("/api/users/hello"), "Missing /api/users/hello path");
    assert!(paths.contains_key("/health"), "Missing /health path");

    let users_path = paths.get("/api/users").unwrap();
    assert!(users_path.post.is_some(), "Missing POST /api/users");
    assert!(users_path.get.is_none(), "Unexpected GET /api/users");

    let user_by_id_path = paths.get("/api/users/{id}").unwrap();
    assert!(user_by_id_path.get.is_some(), "Missing GET /api/users/{{id}}");
    assert!(user_by_id_path.delete.is_none(), "Unexpected DELETE /api/users/{{id}}");

    let schemas = &spec.components.as_ref().unwrap().schemas;
    assert!(schemas.contains_key("UserRequest"), "Missing UserRequest schema");
    assert!(schemas.contains_key("UserResponse"), "Missing UserResponse schema");
}

#[test]
fn test_openapi_declares_bearer_security() {
    let spec = ApiDoc::openapi();
    let components = spec.components.as_ref().unwrap();

    assert!(components.security_schemes.contains_key("bearer"));
}

#[test]
fn test_openapi_json_uses_camel_case_fields() {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .expect("Failed to generate OpenAPI JSON");

    assert!(json.contains("\"firstName\""));
    assert!(json.contains("\"lastName\""));
    assert!(json.contains("\"users\""), "Missing 'users' tag in JSON");
}
