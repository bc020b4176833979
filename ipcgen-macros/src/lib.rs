//! Procedural macros for ipcgen
//!
//! The only macro is the `#[service]` marker. It does not generate code: it
//! checks its arguments and hands the item back. The build-time generator
//! finds marked types by reading the source.

use proc_macro::TokenStream;

mod service;

/// Mark a struct or enum as an IPC service
///
/// ```rust,ignore
/// use ipcgen_macros::service;
///
/// #[service]
/// pub struct TimeService;
///
/// #[service("acc:u0")]
/// pub struct AccountService;
///
/// #[service("fsp-srv", 8)]
/// pub struct FileSystemProxy;
/// ```
///
/// The first argument, when present, must be a string literal naming the
/// service. An optional second argument is kept as written.
#[proc_macro_attribute]
pub fn service(attr: TokenStream, input: TokenStream) -> TokenStream {
    service::service_impl(attr.into(), input.into()).into()
}
