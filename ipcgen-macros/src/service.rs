use proc_macro2::TokenStream as TokenStream2;
use quote::ToTokens;
use syn::parse::{Parse, ParseStream};
use syn::{Expr, Item, LitStr, Token};

/// Accepted argument shapes: `()`, `("name")` or `("name", argument)`
struct ServiceArgs;

impl Parse for ServiceArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            return Ok(ServiceArgs);
        }

        input.parse::<LitStr>().map_err(|e| {
            syn::Error::new(
                e.span(),
                "expected a service name string, e.g. #[service(\"acc:u0\")]",
            )
        })?;

        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            if !input.is_empty() {
                input.parse::<Expr>()?;
                if input.peek(Token![,]) {
                    input.parse::<Token![,]>()?;
                }
            }
        }

        if !input.is_empty() {
            return Err(input.error("#[service] takes at most two arguments"));
        }
        Ok(ServiceArgs)
    }
}

pub fn service_impl(attr: TokenStream2, input: TokenStream2) -> TokenStream2 {
    if let Err(e) = syn::parse2::<ServiceArgs>(attr) {
        return e.to_compile_error();
    }
    let item = match syn::parse2::<Item>(input) {
        Ok(item) => item,
        Err(e) => return e.to_compile_error(),
    };

    match &item {
        Item::Struct(_) | Item::Enum(_) => item.into_token_stream(),
        other => syn::Error::new_spanned(
            other,
            "#[service] can only be applied to a struct or enum",
        )
        .to_compile_error(),
    }
}
