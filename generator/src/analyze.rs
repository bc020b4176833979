//! Constructor shape analysis
//!
//! Two shapes are dispatchable: context only (arity 1) and context plus
//! payload (arity 2). Only constructors whose first parameter is the context
//! count. When several share a shape the first in declaration order is used.

use crate::config::GeneratorConfig;
use crate::error::{GenerateError, ResolveError, Result};
use crate::filter::takes_context;
use crate::model::{
    CandidateType, Constructor, ContextConstruction, DispatchRule, PayloadConstruction,
};
use crate::resolve::TypeResolver;
use syn::Type;

/// Derive the dispatch rule of an eligible candidate.
///
/// Returns `Ok(None)` when no constructor has a dispatchable shape. A payload
/// type that cannot be resolved, or is unsized, is fatal for the whole pass.
pub fn analyze<R: TypeResolver + ?Sized>(
    candidate: &CandidateType,
    resolver: &R,
    config: &GeneratorConfig,
) -> Result<Option<DispatchRule>> {
    let shaped = |arity: usize| {
        candidate
            .constructors
            .iter()
            .find(|c| c.arity() == arity && takes_context(c, resolver, config))
    };

    let parameterized = match shaped(2) {
        Some(constructor) => Some(payload_construction(candidate, constructor, resolver)?),
        None => None,
    };

    let context_only = shaped(1).map(|constructor| ContextConstruction {
        constructor: constructor.name.clone(),
        context: constructor.params[0].passing,
    });

    if context_only.is_none() && parameterized.is_none() {
        return Ok(None);
    }

    Ok(Some(DispatchRule {
        target: candidate.name.clone(),
        context_only,
        parameterized,
    }))
}

/// `str`, slices and trait objects cannot be the `T` of `Box<dyn Any>::downcast::<T>`
fn is_unsized(resolved: &str) -> bool {
    match syn::parse_str::<Type>(resolved) {
        Ok(Type::Slice(_)) | Ok(Type::TraitObject(_)) => true,
        Ok(Type::Path(path)) => path.qself.is_none() && path.path.is_ident("str"),
        _ => false,
    }
}

fn payload_construction<R: TypeResolver + ?Sized>(
    candidate: &CandidateType,
    constructor: &Constructor,
    resolver: &R,
) -> Result<PayloadConstruction> {
    let payload = &constructor.params[1];
    let unresolved = |reason| GenerateError::UnresolvedPayload {
        service: candidate.name.clone(),
        constructor: constructor.name.clone(),
        written: payload.written.clone(),
        reason,
    };

    let payload_type = resolver.resolve(payload).map_err(unresolved)?;
    if is_unsized(&payload_type) {
        return Err(unresolved(ResolveError::Unsized(payload_type)));
    }

    Ok(PayloadConstruction {
        constructor: constructor.name.clone(),
        context: constructor.params[0].passing,
        payload: payload.passing,
        payload_type,
    })
}
