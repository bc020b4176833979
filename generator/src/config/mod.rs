//! Generator configuration
//!
//! Values come from built-in defaults, then `IPCGEN_*` environment variables,
//! then explicit builder overrides (the CLI maps its flags onto the builder).
//!
//! # Example
//!
//! ```rust
//! use ipcgen::GeneratorConfig;
//!
//! let config = GeneratorConfig::builder()
//!     .root_namespace("crate::horizon::services")
//!     .context_type("crate::horizon::ServiceCtx")
//!     .build();
//! assert_eq!(config.context_type.terminal(), "ServiceCtx");
//! ```

pub mod env;

pub use env::{env, env_list, env_optional, load_dotenv};

use crate::model::TypePath;

pub const DEFAULT_ROOT_NAMESPACE: &str = "crate::hos::services";
pub const DEFAULT_CONTEXT_TYPE: &str = "crate::hos::ServiceCtx";
pub const DEFAULT_SERVICE_TRAIT: &str = "crate::hos::IpcService";
pub const DEFAULT_ENCLOSING_TYPE: &str = "crate::hos::services::sm::UserInterface";
pub const DEFAULT_FUNCTION_NAME: &str = "get_service_instance";
pub const DEFAULT_MARKER_PREFIX: &str = "service";

/// What the generator looks for and what it emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Only types under this module are dispatch candidates
    pub root_namespace: TypePath,
    /// Required first constructor parameter
    pub context_type: TypePath,
    /// Trait object type returned by the generated function
    pub service_trait: TypePath,
    /// Type whose inherent impl receives the generated function
    pub enclosing_type: TypePath,
    pub function_name: String,
    /// Attribute name prefix recognized as a service marker
    pub marker_prefix: String,
    /// External crates payload types may name without a `use`
    pub extern_crates: Vec<String>,
}

impl GeneratorConfig {
    /// Build config from `IPCGEN_*` environment variables
    pub fn from_env() -> Self {
        Self {
            root_namespace: env("IPCGEN_ROOT_NAMESPACE", DEFAULT_ROOT_NAMESPACE.into()),
            context_type: env("IPCGEN_CONTEXT_TYPE", DEFAULT_CONTEXT_TYPE.into()),
            service_trait: env("IPCGEN_SERVICE_TRAIT", DEFAULT_SERVICE_TRAIT.into()),
            enclosing_type: env("IPCGEN_ENCLOSING_TYPE", DEFAULT_ENCLOSING_TYPE.into()),
            function_name: env("IPCGEN_FUNCTION_NAME", DEFAULT_FUNCTION_NAME.to_string()),
            marker_prefix: env("IPCGEN_MARKER_PREFIX", DEFAULT_MARKER_PREFIX.to_string()),
            extern_crates: env_list("IPCGEN_EXTERN_CRATES"),
        }
    }

    /// Create a builder for customizing config
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }
}

impl Default for GeneratorConfig {
    /// Built-in defaults, ignoring the environment
    fn default() -> Self {
        Self {
            root_namespace: DEFAULT_ROOT_NAMESPACE.into(),
            context_type: DEFAULT_CONTEXT_TYPE.into(),
            service_trait: DEFAULT_SERVICE_TRAIT.into(),
            enclosing_type: DEFAULT_ENCLOSING_TYPE.into(),
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            marker_prefix: DEFAULT_MARKER_PREFIX.to_string(),
            extern_crates: Vec::new(),
        }
    }
}

/// Builder for GeneratorConfig
///
/// Unset fields fall back to [`GeneratorConfig::from_env`].
#[derive(Debug, Default)]
pub struct GeneratorConfigBuilder {
    root_namespace: Option<TypePath>,
    context_type: Option<TypePath>,
    service_trait: Option<TypePath>,
    enclosing_type: Option<TypePath>,
    function_name: Option<String>,
    marker_prefix: Option<String>,
    extern_crates: Option<Vec<String>>,
}

impl GeneratorConfigBuilder {
    pub fn root_namespace(mut self, path: impl Into<String>) -> Self {
        self.root_namespace = Some(TypePath::new(path));
        self
    }

    pub fn context_type(mut self, path: impl Into<String>) -> Self {
        self.context_type = Some(TypePath::new(path));
        self
    }

    pub fn service_trait(mut self, path: impl Into<String>) -> Self {
        self.service_trait = Some(TypePath::new(path));
        self
    }

    pub fn enclosing_type(mut self, path: impl Into<String>) -> Self {
        self.enclosing_type = Some(TypePath::new(path));
        self
    }

    pub fn function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    pub fn marker_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.marker_prefix = Some(prefix.into());
        self
    }

    pub fn extern_crates<I, S>(mut self, crates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extern_crates = Some(crates.into_iter().map(Into::into).collect());
        self
    }

    /// Build the GeneratorConfig
    pub fn build(self) -> GeneratorConfig {
        let default = GeneratorConfig::from_env();
        GeneratorConfig {
            root_namespace: self.root_namespace.unwrap_or(default.root_namespace),
            context_type: self.context_type.unwrap_or(default.context_type),
            service_trait: self.service_trait.unwrap_or(default.service_trait),
            enclosing_type: self.enclosing_type.unwrap_or(default.enclosing_type),
            function_name: self.function_name.unwrap_or(default.function_name),
            marker_prefix: self.marker_prefix.unwrap_or(default.marker_prefix),
            extern_crates: self.extern_crates.unwrap_or(default.extern_crates),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = GeneratorConfig::builder()
            .function_name("lookup")
            .marker_prefix("ipc_service")
            .extern_crates(["bytes"])
            .build();

        assert_eq!(config.function_name, "lookup");
        assert_eq!(config.marker_prefix, "ipc_service");
        assert_eq!(config.extern_crates, vec!["bytes".to_string()]);
    }

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.root_namespace.as_str(), "crate::hos::services");
        assert_eq!(config.context_type.terminal(), "ServiceCtx");
        assert_eq!(config.function_name, "get_service_instance");
    }
}
