//! Eligibility filter
//!
//! Decides whether a declared type may become a dispatch target. Rules run in
//! a fixed order and the first failing rule names the exclusion.

use crate::config::GeneratorConfig;
use crate::model::{CandidateType, Constructor};
use crate::resolve::TypeResolver;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    Abstract,
    Private,
    Unmarked,
    OutsideNamespace,
    /// No constructor takes at least one parameter
    NoConstructor,
    /// The first parameter of the first such constructor is not the context
    ContextMismatch { found: String },
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::Abstract => write!(f, "generic type"),
            Exclusion::Private => write!(f, "not visible to the dispatcher"),
            Exclusion::Unmarked => write!(f, "no service marker"),
            Exclusion::OutsideNamespace => write!(f, "outside the service namespace"),
            Exclusion::NoConstructor => write!(f, "no constructor with parameters"),
            Exclusion::ContextMismatch { found } => {
                write!(f, "first constructor parameter is `{}`", found)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Excluded(Exclusion),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }
}

pub fn check<R: TypeResolver + ?Sized>(
    candidate: &CandidateType,
    resolver: &R,
    config: &GeneratorConfig,
) -> Eligibility {
    match first_exclusion(candidate, resolver, config) {
        Some(exclusion) => Eligibility::Excluded(exclusion),
        None => Eligibility::Eligible,
    }
}

/// Whether the first parameter of `constructor` resolves to the context type.
///
/// Matching is by fully qualified path, so a same-named type from another
/// module is not the context. Unresolvable parameters never match.
pub fn takes_context<R: TypeResolver + ?Sized>(
    constructor: &Constructor,
    resolver: &R,
    config: &GeneratorConfig,
) -> bool {
    constructor
        .params
        .first()
        .and_then(|param| resolver.resolve(param).ok())
        .is_some_and(|resolved| resolved == config.context_type.as_str())
}

fn first_exclusion<R: TypeResolver + ?Sized>(
    candidate: &CandidateType,
    resolver: &R,
    config: &GeneratorConfig,
) -> Option<Exclusion> {
    if candidate.is_abstract {
        return Some(Exclusion::Abstract);
    }
    if candidate.is_private {
        return Some(Exclusion::Private);
    }
    if !candidate.has_service_marker() {
        return Some(Exclusion::Unmarked);
    }
    if !candidate.name.is_under(&config.root_namespace) {
        return Some(Exclusion::OutsideNamespace);
    }

    let Some(first) = candidate.constructors.iter().find(|c| c.arity() >= 1) else {
        return Some(Exclusion::NoConstructor);
    };
    if !takes_context(first, resolver, config) {
        return Some(Exclusion::ContextMismatch {
            found: first.params[0].written.clone(),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{candidate, MapResolver};

    fn resolver() -> MapResolver {
        MapResolver::new()
            .with("ServiceCtx", "crate::hos::ServiceCtx")
            .with("crate :: hos :: ServiceCtx", "crate::hos::ServiceCtx")
            .with("other :: ServiceCtx", "crate::other::ServiceCtx")
            .with("u32", "u32")
    }

    fn excluded(c: CandidateType) -> Option<Exclusion> {
        match check(&c, &resolver(), &GeneratorConfig::default()) {
            Eligibility::Eligible => None,
            Eligibility::Excluded(e) => Some(e),
        }
    }

    const SVC: &str = "crate::hos::services::acc::AccountService";

    #[test]
    fn test_eligible_service() {
        let c = candidate(SVC)
            .marked()
            .constructor("new", &["&mut ServiceCtx"])
            .build();
        assert_eq!(excluded(c), None);
    }

    #[test]
    fn test_rules_apply_in_order() {
        // abstract wins over every later rule
        let c = candidate("crate::elsewhere::Thing").abstract_type().private().build();
        assert_eq!(excluded(c), Some(Exclusion::Abstract));

        let c = candidate(SVC).private().marked().build();
        assert_eq!(excluded(c), Some(Exclusion::Private));

        let c = candidate(SVC).constructor("new", &["&ServiceCtx"]).build();
        assert_eq!(excluded(c), Some(Exclusion::Unmarked));

        let c = candidate("crate::hos::kernel::KernelService")
            .marked()
            .constructor("new", &["&ServiceCtx"])
            .build();
        assert_eq!(excluded(c), Some(Exclusion::OutsideNamespace));
    }

    #[test]
    fn test_namespace_prefix_is_segment_aware() {
        let c = candidate("crate::hos::services_legacy::Old")
            .marked()
            .constructor("new", &["&ServiceCtx"])
            .build();
        assert_eq!(excluded(c), Some(Exclusion::OutsideNamespace));
    }

    #[test]
    fn test_constructor_rules() {
        let c = candidate(SVC).marked().constructor("new", &[]).build();
        assert_eq!(excluded(c), Some(Exclusion::NoConstructor));

        // Only the first constructor with parameters is inspected
        let c = candidate(SVC)
            .marked()
            .constructor("empty", &[])
            .constructor("from_raw", &["u32"])
            .constructor("new", &["&ServiceCtx"])
            .build();
        assert_eq!(
            excluded(c),
            Some(Exclusion::ContextMismatch {
                found: "u32".to_string()
            })
        );

        let c = candidate(SVC)
            .marked()
            .constructor("empty", &[])
            .constructor("new", &["crate::hos::ServiceCtx", "u32"])
            .build();
        assert_eq!(excluded(c), None);
    }

    #[test]
    fn test_context_is_matched_by_resolved_path() {
        let c = candidate(SVC)
            .marked()
            .constructor("new", &["&other::ServiceCtx"])
            .build();
        assert_eq!(
            excluded(c),
            Some(Exclusion::ContextMismatch {
                found: "& other :: ServiceCtx".to_string()
            })
        );

        // unresolvable first parameters never match
        let c = candidate(SVC)
            .marked()
            .constructor("new", &["&Unknown"])
            .build();
        assert!(matches!(excluded(c), Some(Exclusion::ContextMismatch { .. })));
    }

    #[test]
    fn test_takes_context() {
        let c = candidate(SVC)
            .constructor("new", &["&mut ServiceCtx"])
            .constructor("raw", &["u32", "&ServiceCtx"])
            .constructor("empty", &[])
            .build();
        let config = GeneratorConfig::default();
        let flags: Vec<bool> = c
            .constructors
            .iter()
            .map(|ctor| takes_context(ctor, &resolver(), &config))
            .collect();
        assert_eq!(flags, vec![true, false, false]);
    }
}
