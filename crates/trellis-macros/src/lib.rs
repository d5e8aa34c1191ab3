//! Proc-macros for trellis.
//!
//! Currently provided:
//! - `#[derive(WithBuilders)]`: generates `with_<field>(...)` builder-style methods
//!   for each named field in a struct.
//! - `#[derive(LoadProperties)]`: generates the per-kind declarative `load` hook,
//!   pulling each `#[property("key")]` field out of a `PropertySet`.
//!
//! ## Field control
//! `#[with_builders(skip)]` excludes a field from builder generation. Only fields
//! carrying `#[property("key")]` take part in `LoadProperties`.
//!
//! ### Example
//! ```ignore
//! use trellis_macros::{LoadProperties, WithBuilders};
//!
//! #[derive(Clone, Debug, Default, WithBuilders, LoadProperties)]
//! pub struct Button {
//!     #[property("caption")]
//!     pub caption: String,
//!     #[with_builders(skip)]
//!     pub press_count: u32,
//! }
//!
//! let b = Button::default().with_caption("OK".to_string());
//! ```

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Fields, FieldsNamed, LitStr};

/// Derive that generates `with_<field>` builder methods for structs with named fields.
///
/// Generated methods take `self` by value (builder style) and return `Self`.
///
/// Field attributes:
/// - `#[with_builders(skip)]`: do not generate a builder method for this field.
#[proc_macro_derive(WithBuilders, attributes(with_builders))]
pub fn derive_with_builders(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let fields = match named_fields(&input, "WithBuilders") {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error().into(),
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let methods = fields
        .named
        .iter()
        .filter(|field| !has_with_builders_skip(field))
        .filter_map(|field| {
            let field_ident = field.ident.as_ref()?;
            let field_ty = &field.ty;
            let method_ident = format_ident!("with_{}", field_ident);
            Some(quote! {
                #[inline]
                pub fn #method_ident(mut self, value: #field_ty) -> Self {
                    self.#field_ident = value;
                    self
                }
            })
        });

    quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            #(#methods)*
        }
    }
    .into()
}

/// Derive that implements `trellis::LoadProperties`.
///
/// Every field tagged `#[property("key")]` is assigned from the property stored
/// under `key`, converted with `trellis::FromProperty`. Absent keys leave the
/// field untouched, so `Default` values survive a sparse definition.
#[proc_macro_derive(LoadProperties, attributes(property))]
pub fn derive_load_properties(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let fields = match named_fields(&input, "LoadProperties") {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error().into(),
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut loads = Vec::new();
    for field in fields.named.iter() {
        let key = match property_key(field) {
            Ok(Some(key)) => key,
            Ok(None) => continue,
            Err(err) => return err.to_compile_error().into(),
        };
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let field_ty = &field.ty;

        loads.push(quote! {
            if let Some(value) = properties.get(#key) {
                self.#field_ident = <#field_ty as ::trellis::FromProperty>::from_property(value);
            }
        });
    }

    quote! {
        impl #impl_generics ::trellis::LoadProperties for #ident #ty_generics #where_clause {
            fn load_properties(&mut self, properties: &::trellis::PropertySet) {
                #(#loads)*
            }
        }
    }
    .into()
}

fn named_fields<'a>(input: &'a DeriveInput, derive: &str) -> syn::Result<&'a FieldsNamed> {
    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            format!("#[derive({derive})] only supports structs"),
        ));
    };

    match &data_struct.fields {
        Fields::Named(fields) => Ok(fields),
        other => Err(syn::Error::new(
            other.span(),
            format!("#[derive({derive})] only supports structs with named fields"),
        )),
    }
}

fn has_with_builders_skip(field: &syn::Field) -> bool {
    field
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("with_builders"))
        .any(|attr| {
            // Only `skip` is recognised; other nested items are ignored.
            let mut skip = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                }
                Ok(())
            });
            skip
        })
}

fn property_key(field: &syn::Field) -> syn::Result<Option<LitStr>> {
    let mut key = None;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("property")) {
        if key.is_some() {
            return Err(syn::Error::new(
                attr.span(),
                "a field can only be bound to one property key",
            ));
        }
        key = Some(attr.parse_args::<LitStr>()?);
    }
    Ok(key)
}
