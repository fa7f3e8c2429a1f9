//! Procedural macros for the travelblog project.
//!
//! This crate provides the `#[derive(Document)]` macro, which wires a serde record type
//! into a document collection without writing the `Document` impl by hand.
//!
//! ```ignore
//! use travelblog_core::prelude::*;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Document)]
//! #[document(collection = "posts", validate = Post::check)]
//! pub struct Post {
//!     pub id: RecordId,
//!     pub title: String,
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as travelblog_macros;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr, Path};

/// Derives `travelblog_core::document::Document` for a struct with an `id: RecordId` field.
///
/// Supported attribute keys:
///
/// - `collection = "name"` (required) - the collection the record is stored in
/// - `unique = "field"` (repeatable) - a top-level field whose value must be unique
/// - `validate = path::to::fn` (optional) - a `fn(&Self) -> DocumentStoreResult<()>` run before writes
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_document(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_document(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    ensure_id_field(input)?;

    let mut collection: Option<LitStr> = None;
    let mut validate: Option<Path> = None;
    let mut unique: Vec<LitStr> = Vec::new();

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("document")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                collection = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("unique") {
                unique.push(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("validate") {
                validate = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `collection`, `unique` or `validate`"))
            }
        })?;
    }

    let collection = collection.ok_or_else(|| {
        syn::Error::new_spanned(name, "missing #[document(collection = \"...\")]")
    })?;

    let unique_fn = (!unique.is_empty()).then(|| {
        quote! {
            fn unique_fields() -> &'static [&'static str] {
                &[#(#unique),*]
            }
        }
    });

    let validate_fn = validate.map(|path| {
        quote! {
            fn validate(&self) -> ::travelblog_core::error::DocumentStoreResult<()> {
                #path(self)
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::travelblog_core::document::Document for #name #ty_generics #where_clause {
            fn id(&self) -> &::travelblog_core::record::RecordId {
                &self.id
            }

            fn collection_name() -> &'static str {
                #collection
            }

            #unique_fn

            #validate_fn
        }
    })
}

fn ensure_id_field(input: &DeriveInput) -> syn::Result<()> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Document can only be derived for structs",
        ));
    };

    let has_id = match &data.fields {
        Fields::Named(fields) => fields
            .named
            .iter()
            .any(|f| f.ident.as_ref().is_some_and(|i| i == "id")),
        _ => false,
    };

    if has_id {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            &input.ident,
            "Document requires a named `id: RecordId` field",
        ))
    }
}
