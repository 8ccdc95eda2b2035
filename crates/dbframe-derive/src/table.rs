//! Table derive macro implementation

use crate::attrs::{field_attrs, named_fields, struct_attrs};
use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let table = struct_attrs(&input)?
        .table
        .unwrap_or_else(|| name.to_string().to_snake_case());

    let mut keys = Vec::new();
    let mut commons = Vec::new();
    let mut values = Vec::new();

    for field in named_fields(&input, "Table")? {
        let attrs = field_attrs(field)?;
        if attrs.skip {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let column = attrs.column.unwrap_or_else(|| ident.to_string());

        values.push(quote! {
            (#column, ::dbframe::Value::from(::core::clone::Clone::clone(&self.#ident)))
        });
        if attrs.id {
            keys.push(column);
        } else {
            commons.push(column);
        }
    }

    Ok(quote! {
        impl #impl_generics ::dbframe::BindFields for #name #ty_generics #where_clause {
            fn field_values(&self) -> ::std::vec::Vec<(&'static str, ::dbframe::Value)> {
                ::std::vec![#(#values),*]
            }
        }

        impl #impl_generics ::dbframe::TableModel for #name #ty_generics #where_clause {
            const TABLE: &'static str = #table;
            const KEY_FIELDS: &'static [&'static str] = &[#(#keys),*];
            const COMMON_FIELDS: &'static [&'static str] = &[#(#commons),*];
        }
    })
}
