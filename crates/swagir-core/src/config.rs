use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level project configuration loaded from `.swagir.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SwagirConfig {
    pub input: String,
    /// Only keep services whose name matches one of these tags. Empty keeps all.
    pub tags: Vec<String>,
    /// Skip reachability pruning and keep every definition.
    pub include_unused: bool,
    pub enum_members: EnumMemberStyle,
}

impl Default for SwagirConfig {
    fn default() -> Self {
        Self {
            input: "swagger.json".to_string(),
            tags: Vec::new(),
            include_unused: false,
            enum_members: EnumMemberStyle::default(),
        }
    }
}

/// How string enum literals become member identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumMemberStyle {
    /// Strip punctuation, keep the literal's casing.
    #[default]
    Verbatim,
    /// Run the literal through the class-name transform.
    ClassName,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".swagir.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SwagirConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: SwagirConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# swagir configuration
input: swagger.json

# Keep only services generated from these operation tags (empty = all)
tags: []

# Keep definitions that no operation references
include_unused: false

enum_members: verbatim   # verbatim | class_name
"#
}
