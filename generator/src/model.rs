//! Declaration records consumed by the generator and the dispatch rules derived from them.

use crate::marker::ServiceMarker;
use std::fmt;

/// A module or item path such as `crate::hos::services::acc::AccountService`.
///
/// Paths are either `crate`-rooted (declared in the scanned crate) or
/// `::`-rooted (external crates). They never carry generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypePath(String);

impl TypePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The crate root, `crate`.
    pub fn root() -> Self {
        Self("crate".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split("::").filter(|s| !s.is_empty())
    }

    /// Last segment, e.g. `AccountService`.
    pub fn terminal(&self) -> &str {
        self.segments().last().unwrap_or("")
    }

    pub fn join(&self, segment: &str) -> Self {
        Self(format!("{}::{}", self.0, segment))
    }

    /// Parent path, or `None` for `crate` and single-segment external roots.
    pub fn parent(&self) -> Option<Self> {
        let (head, _) = self.0.rsplit_once("::")?;
        if head.is_empty() {
            return None;
        }
        Some(Self(head.to_string()))
    }

    /// Number of segments below `crate` (`crate::a::b` has depth 2).
    pub fn depth(&self) -> usize {
        self.segments().count().saturating_sub(1)
    }

    /// Segment-aware prefix check: `crate::a::b` is under `crate::a` but
    /// `crate::ab` is not.
    pub fn is_under(&self, namespace: &TypePath) -> bool {
        let mut own = self.segments();
        namespace
            .segments()
            .all(|segment| own.next() == Some(segment))
    }

    pub fn is_crate_local(&self) -> bool {
        self.0 == "crate" || self.0.starts_with("crate::")
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl std::str::FromStr for TypePath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.trim()))
    }
}

/// How a constructor receives an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passing {
    Value,
    Shared,
    Mutable,
}

/// One constructor parameter as declared in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamType {
    /// The full type as written, e.g. `&mut ServiceCtx`.
    pub written: String,
    /// The referent type with references and lifetimes stripped.
    pub target: String,
    pub passing: Passing,
    /// Module the declaration lives in.
    pub scope: TypePath,
}

/// A constructor shape: an associated function returning `Self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
    pub name: String,
    pub params: Vec<ParamType>,
}

impl Constructor {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A declared type considered for inclusion in the dispatch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateType {
    pub name: TypePath,
    pub is_abstract: bool,
    pub is_private: bool,
    pub markers: Vec<ServiceMarker>,
    /// Declaration order across every inherent impl block of the type.
    pub constructors: Vec<Constructor>,
}

impl CandidateType {
    pub fn has_service_marker(&self) -> bool {
        !self.markers.is_empty()
    }
}

/// Context-only construction: `Target::constructor(context)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConstruction {
    pub constructor: String,
    pub context: Passing,
}

/// Payload construction: `Target::constructor(context, payload)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadConstruction {
    pub constructor: String,
    pub context: Passing,
    pub payload: Passing,
    /// Fully qualified payload type, e.g. `crate::hos::services::acc::UserId`.
    pub payload_type: String,
}

/// The construction policy derived for one eligible candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRule {
    pub target: TypePath,
    pub context_only: Option<ContextConstruction>,
    pub parameterized: Option<PayloadConstruction>,
}

/// Ordered rules in declaration feed order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchTable {
    rules: Vec<DispatchRule>,
}

impl DispatchTable {
    pub fn new(rules: Vec<DispatchRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[DispatchRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_path_segments() {
        let path = TypePath::new("crate::hos::services::acc::AccountService");
        assert_eq!(path.terminal(), "AccountService");
        assert_eq!(path.depth(), 4);
        assert_eq!(
            path.parent(),
            Some(TypePath::new("crate::hos::services::acc"))
        );
        assert_eq!(TypePath::root().parent(), None);
        assert_eq!(TypePath::new("::std").parent(), None);
    }

    #[test]
    fn test_namespace_is_segment_aware() {
        let ns = TypePath::new("crate::hos::services");
        assert!(TypePath::new("crate::hos::services::sm::Foo").is_under(&ns));
        assert!(TypePath::new("crate::hos::services").is_under(&ns));
        assert!(!TypePath::new("crate::hos::services_ext::Foo").is_under(&ns));
        assert!(!TypePath::new("crate::hos").is_under(&ns));
    }
}
