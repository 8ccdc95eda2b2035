//! ReadFields derive macro implementation

use crate::attrs::{field_attrs, named_fields, struct_attrs};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result, parse_quote};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let prefix = struct_attrs(&input)?.prefix.unwrap_or_default();

    let mut reads = Vec::new();
    let mut field_types = Vec::new();
    let mut ids = Vec::new();

    for field in named_fields(&input, "ReadFields")? {
        let attrs = field_attrs(field)?;
        if attrs.skip {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;
        let column = attrs
            .column
            .unwrap_or_else(|| format!("{prefix}{ident}"));

        reads.push(quote! {
            self.#ident = <__R as ::dbframe::FieldAccess<#ty>>::field_value(row, #column)?;
        });
        field_types.push(ty);
        if attrs.id {
            ids.push((ident, ty));
        }
    }

    let mut generics = input.generics.clone();
    generics.params.push(parse_quote!(__R: ?Sized));
    let where_clause = generics.make_where_clause();
    for ty in &field_types {
        where_clause
            .predicates
            .push(parse_quote!(__R: ::dbframe::FieldAccess<#ty>));
    }
    let (impl_generics, _, where_clause) = generics.split_for_impl();
    let (pk_impl_generics, ty_generics, pk_where_clause) = input.generics.split_for_impl();

    // Composite keys have no single `pk()`; only a lone id field gets `ModelPk`.
    let model_pk = match ids.as_slice() {
        [(ident, ty)] => quote! {
            impl #pk_impl_generics ::dbframe::ModelPk for #name #ty_generics #pk_where_clause {
                type Id = #ty;

                fn pk(&self) -> &Self::Id {
                    &self.#ident
                }
            }
        },
        _ => quote! {},
    };

    Ok(quote! {
        impl #impl_generics ::dbframe::ReadFields<__R> for #name #ty_generics #where_clause {
            fn read_fields(&mut self, row: &__R) -> ::dbframe::OrmResult<()> {
                #(#reads)*
                ::core::result::Result::Ok(())
            }
        }

        #model_pk
    })
}
