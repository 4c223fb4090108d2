//! Explicit access configuration
//!
//! Replaces process-wide switches: every operation whose behavior depends on
//! code parsing strictness or auto-creation takes a [`ModelConfig`].

use serde::{Deserialize, Serialize};

/// How unrecognized enumeration codes are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumParsing {
    /// Unknown codes fail with [`crate::Error::UnknownCode`]
    #[default]
    Strict,
    /// Unknown codes become the NULL sentinel
    Lenient,
}

/// What an accessor-style read does when a singular value is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoCreate {
    /// Materialize an empty value and return it
    #[default]
    Enabled,
    /// Report absence
    Disabled,
    /// Fail with [`crate::Error::ConfigurationViolation`]
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub enums: EnumParsing,
    #[serde(default)]
    pub auto_create: AutoCreate,
}

impl ModelConfig {
    /// Strict code parsing, auto-create enabled
    pub fn strict() -> Self {
        Self::default()
    }

    /// Lenient code parsing, auto-create enabled
    pub fn lenient() -> Self {
        Self {
            enums: EnumParsing::Lenient,
            ..Self::default()
        }
    }

    pub fn is_lenient(&self) -> bool {
        self.enums == EnumParsing::Lenient
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn builder() -> ModelConfigBuilder {
        ModelConfigBuilder::default()
    }
}

#[derive(Debug, Default, Clone)]
pub struct ModelConfigBuilder {
    cfg: ModelConfig,
}

impl ModelConfigBuilder {
    pub fn enums(mut self, mode: EnumParsing) -> Self {
        self.cfg.enums = mode;
        self
    }

    pub fn lenient(self) -> Self {
        self.enums(EnumParsing::Lenient)
    }

    pub fn auto_create(mut self, mode: AutoCreate) -> Self {
        self.cfg.auto_create = mode;
        self
    }

    pub fn build(self) -> ModelConfig {
        self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ModelConfig::default();
        assert_eq!(cfg.enums, EnumParsing::Strict);
        assert_eq!(cfg.auto_create, AutoCreate::Enabled);
        assert_eq!(cfg, ModelConfig::strict());
    }

    #[test]
    fn test_builder() {
        let cfg = ModelConfig::builder()
            .lenient()
            .auto_create(AutoCreate::Forbidden)
            .build();

        assert!(cfg.is_lenient());
        assert_eq!(cfg.auto_create, AutoCreate::Forbidden);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let cfg = ModelConfig::builder()
            .auto_create(AutoCreate::Disabled)
            .build();
        let yaml = cfg.to_yaml().unwrap();
        let parsed = ModelConfig::from_yaml(&yaml).unwrap();
        assert_eq!(cfg, parsed);
    }

    #[test]
    fn test_partial_documents_use_defaults() {
        let cfg = ModelConfig::from_yaml("enums: lenient\n").unwrap();
        assert_eq!(cfg.enums, EnumParsing::Lenient);
        assert_eq!(cfg.auto_create, AutoCreate::Enabled);

        let cfg = ModelConfig::from_json(r#"{"auto_create": "forbidden"}"#).unwrap();
        assert_eq!(cfg.enums, EnumParsing::Strict);
        assert_eq!(cfg.auto_create, AutoCreate::Forbidden);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(ModelConfig::from_yaml("enums: sloppy\n").is_err());
    }
}
