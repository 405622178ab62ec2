use swagir_core::error::ParseError;
use swagir_core::ir::HttpMethod;
use swagir_core::parse;

const DEV_KEYS: &str = include_str!("fixtures/dev-keys.json");
const PETSTORE: &str = include_str!("fixtures/petstore.yaml");
const ECHO: &str = include_str!("fixtures/echo.json");

#[test]
fn parse_dev_keys_json() {
    let doc = parse::from_json(DEV_KEYS).expect("should parse dev-keys.json");
    assert_eq!(doc.swagger.as_deref(), Some("2.0"));
    let info = doc.info.as_ref().expect("should have info");
    assert_eq!(info.title, "Recolude Service");
    assert_eq!(info.version, "1.0");
    assert_eq!(doc.definitions.len(), 6);
    assert_eq!(doc.security_definitions.len(), 3);

    // Document order is preserved
    let names: Vec<_> = doc.definitions.keys().map(String::as_str).collect();
    assert_eq!(names[0], "v1ApiKey");
    assert_eq!(names[5], "v1Permission");

    let item = doc
        .paths
        .get("/api/v1/dev-keys")
        .expect("should have /api/v1/dev-keys");
    let methods: Vec<_> = item.operations().into_iter().map(|(m, _)| m).collect();
    assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Post]);
}

#[test]
fn parse_petstore_yaml() {
    let doc = parse::from_yaml(PETSTORE).expect("should parse petstore");
    assert_eq!(doc.info.as_ref().unwrap().title, "Petstore");
    assert_eq!(doc.paths.len(), 2);

    let pet = doc.definitions.get("Pet").expect("should have Pet");
    assert_eq!(pet.all_of.len(), 2);
    assert_eq!(pet.all_of[0].ref_path.as_deref(), Some("#/definitions/NewPet"));
}

#[test]
fn parse_parameters() {
    let doc = parse::from_json(ECHO).unwrap();
    let get = doc.paths["/api/v1/echo"].get.as_ref().unwrap();
    assert_eq!(get.parameters.len(), 4);
    assert_eq!(get.parameters[1].name.as_deref(), Some("grantId"));
    assert_eq!(get.parameters[1].location.as_deref(), Some("path"));
    assert!(get.parameters[1].required);
    assert!(!get.parameters[0].required);
}

#[test]
fn parse_missing_swagger_field_is_accepted() {
    let doc = parse::from_json(r#"{ "info": { "title": "T", "version": "1" } }"#).unwrap();
    assert!(doc.swagger.is_none());
    assert!(doc.definitions.is_empty());
}

#[test]
fn parse_invalid_version() {
    let yaml = r#"
swagger: "3.0"
info:
  title: Test
  version: "1.0"
paths: {}
"#;
    let result = parse::from_yaml(yaml);
    assert!(matches!(result, Err(ParseError::UnsupportedVersion(v)) if v == "3.0"));
}

#[test]
fn parse_invalid_json() {
    let result = parse::from_json("{ not json");
    assert!(matches!(result, Err(ParseError::Json(_))));
}
