//! Dispatch table builder
//!
//! Folds filter and analyzer results over the feed in order. Nothing is
//! sorted or deduplicated: a type declared twice yields two rules and the
//! first one wins at dispatch time.

use crate::analyze::analyze;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::filter::{check, Eligibility, Exclusion};
use crate::model::{CandidateType, DispatchTable, TypePath};
use crate::resolve::TypeResolver;

/// A candidate left out of the table, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excluded {
    pub name: TypePath,
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    Filtered(Exclusion),
    /// Eligible, but no constructor has a dispatchable shape
    NoDispatchableShape,
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::Filtered(exclusion) => write!(f, "{}", exclusion),
            ExclusionReason::NoDispatchableShape => {
                write!(f, "no context-only or context+payload constructor")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOutcome {
    pub table: DispatchTable,
    pub excluded: Vec<Excluded>,
}

/// Build the dispatch table. The first fatal error aborts with no table.
pub fn build_table<R: TypeResolver + ?Sized>(
    candidates: &[CandidateType],
    resolver: &R,
    config: &GeneratorConfig,
) -> Result<TableOutcome> {
    let mut rules = Vec::new();
    let mut excluded = Vec::new();

    for candidate in candidates {
        if let Eligibility::Excluded(exclusion) = check(candidate, resolver, config) {
            tracing::debug!(service = %candidate.name, reason = %exclusion, "excluded");
            excluded.push(Excluded {
                name: candidate.name.clone(),
                reason: ExclusionReason::Filtered(exclusion),
            });
            continue;
        }

        match analyze(candidate, resolver, config)? {
            Some(rule) => {
                tracing::debug!(
                    service = %rule.target,
                    context_only = rule.context_only.is_some(),
                    parameterized = rule.parameterized.is_some(),
                    "dispatch rule"
                );
                rules.push(rule);
            }
            None => {
                tracing::debug!(service = %candidate.name, "no dispatchable constructor");
                excluded.push(Excluded {
                    name: candidate.name.clone(),
                    reason: ExclusionReason::NoDispatchableShape,
                });
            }
        }
    }

    Ok(TableOutcome {
        table: DispatchTable::new(rules),
        excluded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerateError;
    use crate::testing::{candidate, MapResolver};

    fn build(candidates: &[CandidateType]) -> Result<TableOutcome> {
        let resolver = MapResolver::new()
            .with("ServiceCtx", "crate::hos::ServiceCtx")
            .with("u32", "u32");
        build_table(candidates, &resolver, &GeneratorConfig::default())
    }

    #[test]
    fn test_preserves_feed_order_and_duplicates() {
        let candidates = vec![
            candidate("crate::hos::services::b::Beta")
                .marked()
                .constructor("new", &["&ServiceCtx"])
                .build(),
            candidate("crate::hos::services::a::Alpha")
                .marked()
                .constructor("new", &["&ServiceCtx"])
                .build(),
            candidate("crate::hos::services::b::Beta")
                .marked()
                .constructor("other", &["&ServiceCtx"])
                .build(),
        ];

        let outcome = build(&candidates).unwrap();
        let targets: Vec<&str> = outcome
            .table
            .rules()
            .iter()
            .map(|r| r.target.terminal())
            .collect();
        assert_eq!(targets, vec!["Beta", "Alpha", "Beta"]);
        assert!(outcome.excluded.is_empty());
    }

    #[test]
    fn test_exclusions_are_recorded() {
        let candidates = vec![
            candidate("crate::hos::services::Abstract")
                .abstract_type()
                .marked()
                .constructor("new", &["&ServiceCtx"])
                .build(),
            candidate("crate::hos::services::Hidden")
                .private()
                .marked()
                .constructor("new", &["&ServiceCtx"])
                .build(),
            candidate("crate::hos::services::Plain")
                .constructor("new", &["&ServiceCtx"])
                .build(),
            candidate("crate::other::Outside")
                .marked()
                .constructor("new", &["&ServiceCtx"])
                .build(),
            candidate("crate::hos::services::Wide")
                .marked()
                .constructor("new", &["&ServiceCtx", "u32", "u32"])
                .build(),
        ];

        let outcome = build(&candidates).unwrap();
        assert!(outcome.table.is_empty());

        let reasons: Vec<ExclusionReason> =
            outcome.excluded.into_iter().map(|e| e.reason).collect();
        assert_eq!(
            reasons,
            vec![
                ExclusionReason::Filtered(Exclusion::Abstract),
                ExclusionReason::Filtered(Exclusion::Private),
                ExclusionReason::Filtered(Exclusion::Unmarked),
                ExclusionReason::Filtered(Exclusion::OutsideNamespace),
                ExclusionReason::NoDispatchableShape,
            ]
        );
    }

    #[test]
    fn test_fatal_error_aborts_whole_table() {
        let candidates = vec![
            candidate("crate::hos::services::Good")
                .marked()
                .constructor("new", &["&ServiceCtx"])
                .build(),
            candidate("crate::hos::services::Bad")
                .marked()
                .constructor("with", &["&ServiceCtx", "Unknown"])
                .build(),
        ];

        assert!(matches!(
            build(&candidates),
            Err(GenerateError::UnresolvedPayload { .. })
        ));
    }
}
