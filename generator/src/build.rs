//! Build script integration
//!
//! ```rust,no_run
//! // build.rs
//! fn main() -> Result<(), ipcgen::GenerateError> {
//!     ipcgen::build::Builder::new().output("user_interface.rs").run()?;
//!     Ok(())
//! }
//! ```
//!
//! and in the crate:
//!
//! ```rust,ignore
//! include!(concat!(env!("OUT_DIR"), "/user_interface.rs"));
//! ```

use crate::config::{load_dotenv, GeneratorConfig};
use crate::error::{GenerateError, Result};
use crate::pipeline::{Artifact, Generator};
use std::path::PathBuf;

pub struct Builder {
    config: Option<GeneratorConfig>,
    src_dir: Option<PathBuf>,
    output: String,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            config: None,
            src_dir: None,
            output: "ipc_dispatch.rs".to_string(),
        }
    }

    /// Use `config` instead of [`GeneratorConfig::from_env`]
    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Source tree to scan (default: `$CARGO_MANIFEST_DIR/src`)
    pub fn src_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.src_dir = Some(dir.into());
        self
    }

    /// File name inside `$OUT_DIR`
    pub fn output(mut self, file_name: impl Into<String>) -> Self {
        self.output = file_name.into();
        self
    }

    /// Generate into `$OUT_DIR` and register rerun triggers with cargo.
    ///
    /// `.env` files next to the manifest are loaded before the config is read.
    pub fn run(self) -> Result<Artifact> {
        let manifest_dir = std::env::var_os("CARGO_MANIFEST_DIR").map(PathBuf::from);
        let src_dir = match (self.src_dir, &manifest_dir) {
            (Some(dir), _) => dir,
            (None, Some(manifest_dir)) => manifest_dir.join("src"),
            (None, None) => return Err(GenerateError::MissingEnv("CARGO_MANIFEST_DIR")),
        };
        let out_dir = PathBuf::from(
            std::env::var_os("OUT_DIR").ok_or(GenerateError::MissingEnv("OUT_DIR"))?,
        );

        if let Some(manifest_dir) = &manifest_dir {
            for path in load_dotenv(manifest_dir) {
                println!("cargo:rerun-if-changed={}", path.display());
            }
        }
        println!("cargo:rerun-if-changed={}", src_dir.display());
        for key in [
            "IPCGEN_ROOT_NAMESPACE",
            "IPCGEN_CONTEXT_TYPE",
            "IPCGEN_SERVICE_TRAIT",
            "IPCGEN_ENCLOSING_TYPE",
            "IPCGEN_FUNCTION_NAME",
            "IPCGEN_MARKER_PREFIX",
            "IPCGEN_EXTERN_CRATES",
        ] {
            println!("cargo:rerun-if-env-changed={}", key);
        }

        let config = self.config.unwrap_or_else(GeneratorConfig::from_env);
        Generator::new(config).generate_to_file(&src_dir, &out_dir.join(&self.output))
    }
}
