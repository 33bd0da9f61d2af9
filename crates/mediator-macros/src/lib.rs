//! Derives for the `mediator` marker traits.
//!
//! ```ignore
//! #[derive(mediator::Command)]
//! struct DoSomething;
//!
//! #[derive(mediator::Command)]
//! #[response(u64)]
//! struct CreateUser { name: String }
//!
//! #[derive(mediator::Query)]
//! #[response(i32)]
//! struct GetInt;
//!
//! #[derive(mediator::Notification)]
//! struct UserGreeted { name: String }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, Type, parse_macro_input};

#[derive(Clone, Copy)]
enum Kind {
    Command,
    Query,
}

/// Implements `Request` and `Command`. The response defaults to `()`.
#[proc_macro_derive(Command, attributes(response))]
pub fn derive_command(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_request(&input, Kind::Command)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Implements `Request` and `Query`. `#[response(T)]` is required.
#[proc_macro_derive(Query, attributes(response))]
pub fn derive_query(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_request(&input, Kind::Query)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[proc_macro_derive(Notification)]
pub fn derive_notification(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::mediator::Notification for #name #ty_generics #where_clause {}
    };

    TokenStream::from(expanded)
}

fn expand_request(input: &DeriveInput, kind: Kind) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let response = match (response_type(input)?, kind) {
        (Some(ty), _) => quote! { #ty },
        (None, Kind::Command) => quote! { () },
        (None, Kind::Query) => {
            return Err(syn::Error::new_spanned(
                name,
                "queries need a response type: #[response(T)]",
            ));
        }
    };

    let (kind_variant, marker) = match kind {
        Kind::Command => (quote! { Command }, quote! { ::mediator::Command }),
        Kind::Query => (quote! { Query }, quote! { ::mediator::Query }),
    };

    Ok(quote! {
        impl #impl_generics ::mediator::Request for #name #ty_generics #where_clause {
            type Response = #response;

            type Kind = ::mediator::kind::#kind_variant;
        }

        impl #impl_generics #marker for #name #ty_generics #where_clause {}
    })
}

/// Reads `#[response(T)]`, rejecting duplicates.
fn response_type(input: &DeriveInput) -> syn::Result<Option<Type>> {
    let mut found: Option<Type> = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("response") {
            continue;
        }
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate #[response] attribute"));
        }
        found = Some(attr.parse_args::<Type>()?);
    }

    Ok(found)
}
