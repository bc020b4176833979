//! Generator error types
//!
//! Exclusion of a candidate is never an error. Everything here aborts the
//! whole generation pass and no artifact is written.

use crate::model::TypePath;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal generation failure
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("source directory {0} does not exist")]
    MissingSource(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("cannot resolve payload type `{written}` of `{service}::{constructor}`: {reason}")]
    UnresolvedPayload {
        service: TypePath,
        constructor: String,
        written: String,
        #[source]
        reason: ResolveError,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

/// Why a type could not be turned into a fully qualified path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("`{0}` is not declared, imported or in the prelude")]
    UnknownName(String),

    #[error("`{segment}` is not a member of `{module}`")]
    UnknownMember { module: TypePath, segment: String },

    #[error("`super` escapes the crate root")]
    SuperOutOfRoot,

    #[error("lifetime arguments are not supported in `{0}`")]
    Lifetime(String),

    #[error("`{0}` is unsized and cannot be carried in a boxed parameter")]
    Unsized(String),

    #[error("unsupported type form `{0}`")]
    Unsupported(String),

    #[error("`{0}` is not valid type syntax")]
    Syntax(String),
}

pub type Result<T> = std::result::Result<T, GenerateError>;
