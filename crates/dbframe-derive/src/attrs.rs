//! `#[orm(...)]` attribute parsing shared by the derives.

use syn::{Data, DeriveInput, Field, Fields, LitStr, Result};

/// Struct-level `#[orm(table = "...", prefix = "...")]`.
#[derive(Default)]
pub struct StructAttrs {
    pub table: Option<String>,
    pub prefix: Option<String>,
}

/// Field-level `#[orm(column = "...", id, skip)]`.
#[derive(Default)]
pub struct FieldAttrs {
    pub column: Option<String>,
    pub id: bool,
    pub skip: bool,
}

pub fn struct_attrs(input: &DeriveInput) -> Result<StructAttrs> {
    let mut attrs = StructAttrs::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("orm")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                attrs.table = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else if meta.path.is_ident("prefix") {
                attrs.prefix = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                Err(meta.error("unknown orm attribute; expected `table` or `prefix`"))
            }
        })?;
    }
    Ok(attrs)
}

pub fn field_attrs(field: &Field) -> Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("orm")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                attrs.column = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("id") {
                attrs.id = true;
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
            } else {
                return Err(meta.error("unknown orm attribute; expected `column`, `id` or `skip`"));
            }
            Ok(())
        })?;
    }
    if attrs.id && attrs.skip {
        return Err(syn::Error::new_spanned(field, "a field cannot be both `id` and `skip`"));
    }
    Ok(attrs)
}

/// Named fields of a struct, or an error naming the derive.
pub fn named_fields<'a>(input: &'a DeriveInput, derive: &str) -> Result<Vec<&'a Field>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(fields.named.iter().collect()),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{derive} can only be derived for structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{derive} can only be derived for structs"),
        )),
    }
}
