pub mod generate;
pub mod list;

use clap::Args;
use console::style;
use ipcgen::GeneratorConfig;
use std::fmt::Display;

/// Overrides for `IPCGEN_*` settings
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Module whose descendants may be services (e.g., crate::hos::services)
    #[arg(long)]
    pub root_namespace: Option<String>,

    /// Context type every constructor takes first
    #[arg(long)]
    pub context_type: Option<String>,

    /// Trait object type the generated function returns
    #[arg(long)]
    pub service_trait: Option<String>,

    /// Type whose impl block receives the generated function
    #[arg(long)]
    pub enclosing_type: Option<String>,

    /// Name of the generated function
    #[arg(long)]
    pub function_name: Option<String>,

    /// Attribute name prefix that marks a service
    #[arg(long)]
    pub marker_prefix: Option<String>,
}

impl ConfigArgs {
    pub fn into_config(self) -> GeneratorConfig {
        let mut builder = GeneratorConfig::builder();
        if let Some(path) = self.root_namespace {
            builder = builder.root_namespace(path);
        }
        if let Some(path) = self.context_type {
            builder = builder.context_type(path);
        }
        if let Some(path) = self.service_trait {
            builder = builder.service_trait(path);
        }
        if let Some(path) = self.enclosing_type {
            builder = builder.enclosing_type(path);
        }
        if let Some(name) = self.function_name {
            builder = builder.function_name(name);
        }
        if let Some(prefix) = self.marker_prefix {
            builder = builder.marker_prefix(prefix);
        }
        builder.build()
    }
}

/// Print a styled error and exit with status 1
pub fn fail(error: impl Display) -> ! {
    eprintln!("{} {}", style("Error:").red().bold(), error);
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let config = ConfigArgs {
            root_namespace: Some("crate::horizon::services".to_string()),
            marker_prefix: Some("ipc_service".to_string()),
            ..Default::default()
        }
        .into_config();

        assert_eq!(config.root_namespace.as_str(), "crate::horizon::services");
        assert_eq!(config.marker_prefix, "ipc_service");
    }
}
