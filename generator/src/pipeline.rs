//! One generation pass: feed -> filter -> analyze -> table -> emit

use crate::config::GeneratorConfig;
use crate::emit::emit;
use crate::error::{GenerateError, Result};
use crate::model::{CandidateType, DispatchTable};
use crate::resolve::TypeResolver;
use crate::scan::scan_crate;
use crate::table::{build_table, Excluded};
use std::fs;
use std::path::Path;

/// The emitted source and the table it was rendered from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub source: String,
    pub table: DispatchTable,
    pub excluded: Vec<Excluded>,
}

impl Artifact {
    /// Write the source to `path`, creating parent directories.
    ///
    /// Returns `false` without touching the file when its content is already
    /// identical, so build tools do not see a spurious change.
    pub fn write_to(&self, path: &Path) -> Result<bool> {
        if self.is_current(path) {
            return Ok(false);
        }
        let write_error = |source| GenerateError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, &self.source).map_err(write_error)?;
        Ok(true)
    }

    /// True if `path` already holds exactly this source
    pub fn is_current(&self, path: &Path) -> bool {
        fs::read_to_string(path)
            .map(|existing| existing == self.source)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run the pipeline over an already materialized feed.
    pub fn generate<R: TypeResolver + ?Sized>(
        &self,
        candidates: &[CandidateType],
        resolver: &R,
    ) -> Result<Artifact> {
        let outcome = build_table(candidates, resolver, &self.config)?;
        let source = emit(&outcome.table, &self.config);

        tracing::info!(
            candidates = candidates.len(),
            rules = outcome.table.len(),
            excluded = outcome.excluded.len(),
            "generated dispatch table"
        );

        Ok(Artifact {
            source,
            table: outcome.table,
            excluded: outcome.excluded,
        })
    }

    /// Scan `src_dir` and run the pipeline over it.
    pub fn generate_crate(&self, src_dir: &Path) -> Result<Artifact> {
        let feed = scan_crate(src_dir, &self.config)?;
        self.generate(&feed.candidates, &feed.symbols)
    }

    /// Scan, generate and write. Nothing is written if any step fails.
    pub fn generate_to_file(&self, src_dir: &Path, output: &Path) -> Result<Artifact> {
        let artifact = self.generate_crate(src_dir)?;
        artifact.write_to(output)?;
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{candidate, MapResolver};

    #[test]
    fn test_generate_is_deterministic() {
        let candidates = vec![
            candidate("crate::hos::services::a::A")
                .marked()
                .constructor("new", &["&mut ServiceCtx"])
                .build(),
            candidate("crate::hos::services::b::B")
                .marked()
                .constructor("with", &["&mut ServiceCtx", "u8"])
                .build(),
        ];
        let resolver = MapResolver::new()
            .with("ServiceCtx", "crate::hos::ServiceCtx")
            .with("u8", "u8");
        let generator = Generator::default();

        let first = generator.generate(&candidates, &resolver).unwrap();
        let second = generator.generate(&candidates, &resolver).unwrap();
        assert_eq!(first.source, second.source);
        assert_eq!(first.table.len(), 2);
    }

    #[test]
    fn test_write_to_skips_identical_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.rs");
        let artifact = Generator::default()
            .generate(&[], &MapResolver::new())
            .unwrap();

        assert!(artifact.write_to(&path).unwrap());
        assert!(artifact.is_current(&path));
        assert!(!artifact.write_to(&path).unwrap());
    }
}
