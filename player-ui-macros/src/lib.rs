//! Procedural macros for player-ui

use darling::{FromDeriveInput, FromField};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Container-level options for #[derive(Merge)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(merge), supports(struct_named))]
struct MergeOpts {
    ident: syn::Ident,
    generics: syn::Generics,
    data: darling::ast::Data<(), MergeField>,
}

/// Field-level attributes
#[derive(Debug, FromField)]
#[darling(attributes(merge))]
struct MergeField {
    ident: Option<syn::Ident>,

    /// Keep the value of the first layer, never merge
    #[darling(default)]
    skip: bool,
}

/// Derive macro for the `Merge` trait of configuration records
///
/// Each field is merged with its own `Merge` implementation: `Option` fields
/// keep the first value that is present, `Vec` fields are concatenated and
/// nested records recurse. Fields marked `#[merge(skip)]` keep the value of
/// the layer being merged into.
///
/// # Example
/// ```ignore
/// #[derive(Default, Merge)]
/// struct ButtonConfig {
///     component: ComponentConfig,
///     text: Option<String>,
///     #[merge(skip)]
///     generation: u32,
/// }
/// ```
#[proc_macro_derive(Merge, attributes(merge))]
pub fn derive_merge(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match MergeOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;
    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();

    let fields = match &opts.data {
        darling::ast::Data::Struct(fields) => fields,
        _ => {
            return syn::Error::new_spanned(&input, "Merge can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    let merge_stmts = fields
        .iter()
        .filter(|f| !f.skip)
        .filter_map(|f| f.ident.as_ref())
        .map(|ident| {
            quote! {
                ::player_ui_core::config::Merge::merge(&mut self.#ident, other.#ident);
            }
        });

    let expanded = quote! {
        impl #impl_generics ::player_ui_core::config::Merge for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn merge(&mut self, other: Self) {
                #(#merge_stmts)*
            }
        }
    };

    TokenStream::from(expanded)
}
