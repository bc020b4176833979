//! Service marker recognition
//!
//! Any attribute whose final path segment starts with the configured prefix
//! (`service` by default) marks a service. `#[service]`, `#[service("acc:u0")]`,
//! `#[service("acc:u0", 4)]` and `#[ipcgen::service_named(...)]` all qualify.
//! The raw attribute is turned into a [`ServiceMarker`] as soon as it is read.

use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ExprLit, Lit, Meta, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceMarker {
    /// `#[service]`
    Bare,
    /// `#[service("name")]` or `#[service("name", argument)]`
    Named {
        name: String,
        argument: Option<String>,
    },
    /// Any other argument shape, kept verbatim.
    Other(String),
}

impl ServiceMarker {
    /// Recognize a marker attribute, or `None` if the attribute is unrelated.
    pub fn from_attribute(attr: &Attribute, prefix: &str) -> Option<Self> {
        let ident = attr.path().segments.last()?.ident.to_string();
        if !ident.starts_with(prefix) {
            return None;
        }

        let marker = match &attr.meta {
            Meta::Path(_) => ServiceMarker::Bare,
            Meta::List(list) => {
                match list.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated) {
                    Ok(args) => Self::from_args(args.into_iter().collect()),
                    Err(_) => ServiceMarker::Other(list.tokens.to_string()),
                }
            }
            Meta::NameValue(nv) => ServiceMarker::Other(nv.value.to_token_stream().to_string()),
        };
        Some(marker)
    }

    fn from_args(args: Vec<Expr>) -> Self {
        let mut args = args.into_iter();
        match args.next() {
            None => ServiceMarker::Bare,
            Some(Expr::Lit(ExprLit {
                lit: Lit::Str(name),
                ..
            })) => {
                let argument = args.next().map(|expr| match expr {
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }) => s.value(),
                    other => other.to_token_stream().to_string(),
                });
                ServiceMarker::Named {
                    name: name.value(),
                    argument,
                }
            }
            Some(first) => {
                let rest: Vec<String> = std::iter::once(first)
                    .chain(args)
                    .map(|e| e.to_token_stream().to_string())
                    .collect();
                ServiceMarker::Other(rest.join(", "))
            }
        }
    }
}

/// Collect every service marker among `attrs`, in attribute order.
pub fn collect_markers(attrs: &[Attribute], prefix: &str) -> Vec<ServiceMarker> {
    attrs
        .iter()
        .filter_map(|attr| ServiceMarker::from_attribute(attr, prefix))
        .collect()
}
