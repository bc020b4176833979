//! Fixtures for tests that build declaration records by hand
//!
//! ```rust
//! use ipcgen::testing::candidate;
//!
//! let service = candidate("crate::hos::services::acc::AccountService")
//!     .marked()
//!     .constructor("new", &["&mut ServiceCtx"])
//!     .build();
//! assert_eq!(service.constructors[0].arity(), 1);
//! ```

use crate::error::ResolveError;
use crate::marker::ServiceMarker;
use crate::model::{CandidateType, Constructor, ParamType, TypePath};
use crate::resolve::TypeResolver;
use crate::scan::param_type;
use std::collections::HashMap;

/// Parse `ty` as a parameter type declared inside `scope`.
///
/// # Panics
/// Panics if `ty` is not valid type syntax.
pub fn param(scope: &str, ty: &str) -> ParamType {
    let parsed: syn::Type =
        syn::parse_str(ty).unwrap_or_else(|e| panic!("invalid type `{}`: {}", ty, e));
    param_type(&parsed, &TypePath::new(scope))
}

pub fn candidate(path: &str) -> CandidateBuilder {
    CandidateBuilder {
        candidate: CandidateType {
            name: TypePath::new(path),
            is_abstract: false,
            is_private: false,
            markers: Vec::new(),
            constructors: Vec::new(),
        },
    }
}

pub struct CandidateBuilder {
    candidate: CandidateType,
}

impl CandidateBuilder {
    /// Add a bare `#[service]` marker
    pub fn marked(mut self) -> Self {
        self.candidate.markers.push(ServiceMarker::Bare);
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.candidate.is_abstract = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.candidate.is_private = true;
        self
    }

    /// Append a constructor whose parameters are declared in the type's module
    pub fn constructor(mut self, name: &str, params: &[&str]) -> Self {
        let scope = self.candidate.name.parent().unwrap_or_else(TypePath::root);
        self.candidate.constructors.push(Constructor {
            name: name.to_string(),
            params: params.iter().map(|ty| param(scope.as_str(), ty)).collect(),
        });
        self
    }

    pub fn build(self) -> CandidateType {
        self.candidate
    }
}

/// Resolver backed by a fixed map from written type to resolved type
#[derive(Debug, Default, Clone)]
pub struct MapResolver {
    types: HashMap<String, String>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, written: &str, resolved: &str) -> Self {
        self.types.insert(written.to_string(), resolved.to_string());
        self
    }
}

impl TypeResolver for MapResolver {
    fn resolve(&self, param: &ParamType) -> Result<String, ResolveError> {
        self.types
            .get(&param.target)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownName(param.target.clone()))
    }
}
