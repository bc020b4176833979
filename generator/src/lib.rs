//! # ipcgen
//!
//! Build-time generator for IPC service dispatch.
//!
//! The generator scans a crate for types carrying a `#[service]` marker,
//! inspects their constructors and emits one function mapping a `TypeId`
//! (plus a context and an optional payload) to a new service instance. The
//! mapping is resolved once at build time; nothing is looked up by reflection
//! at runtime.
//!
//! Pipeline:
//! - [`scan`]: declaration feed over `src/` plus the [`SymbolTable`] used for
//!   type resolution
//! - [`filter`]: eligibility rules
//! - [`analyze`]: constructor shapes
//! - [`table`]: ordered dispatch table
//! - [`emit`]: source rendering through a [`CodeBuffer`]
//!
//! # Example
//!
//! ```rust,no_run
//! use ipcgen::{Generator, GeneratorConfig};
//! use std::path::Path;
//!
//! let generator = Generator::new(GeneratorConfig::from_env());
//! let artifact = generator.generate_crate(Path::new("src"))?;
//! println!("{} service(s)", artifact.table.len());
//! # Ok::<(), ipcgen::GenerateError>(())
//! ```

pub mod analyze;
pub mod buffer;
pub mod build;
pub mod config;
pub mod emit;
pub mod error;
pub mod filter;
pub mod marker;
pub mod model;
pub mod pipeline;
pub mod resolve;
pub mod scan;
pub mod table;
pub mod testing;

pub use buffer::CodeBuffer;
pub use config::{GeneratorConfig, GeneratorConfigBuilder};
pub use error::{GenerateError, ResolveError, Result};
pub use filter::{Eligibility, Exclusion};
pub use marker::ServiceMarker;
pub use model::{
    CandidateType, Constructor, ContextConstruction, DispatchRule, DispatchTable, ParamType,
    Passing, PayloadConstruction, TypePath,
};
pub use pipeline::{Artifact, Generator};
pub use resolve::{SymbolTable, TypeResolver};
pub use scan::{scan_crate, DeclarationFeed, FeedBuilder};
pub use table::{build_table, Excluded, ExclusionReason, TableOutcome};
