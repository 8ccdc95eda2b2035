//! Derive macros for dbframe
//!
//! Provides `#[derive(ReadFields)]` and `#[derive(Table)]` macros.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod read_fields;
mod table;

/// Derive `ReadFields` for a struct, reading each field from the column of the same name.
///
/// # Example
///
/// ```ignore
/// use dbframe::ReadFields;
///
/// #[derive(Default, ReadFields)]
/// #[orm(prefix = "customer_")]
/// struct Customer {
///     #[orm(id)]
///     id: i64,
///     name: String,
///     #[orm(column = "email_address")]
///     email: Option<String>,
///     #[orm(skip)]
///     accounts: Vec<Account>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(prefix = "p_")]` - Prepend `p_` to every derived column name
/// - `#[orm(column = "name")]` - Read the field from this exact column
/// - `#[orm(skip)]` - Leave the field alone (child collections, computed values)
/// - `#[orm(id)]` - Mark the key field; a single id field also implements `ModelPk`
///
/// The impl is generic over the row type: any `R: FieldAccess<T>` for every
/// field type `T` works, so the same entity reads from in-memory rows and
/// from `tokio_postgres::Row`.
#[proc_macro_derive(ReadFields, attributes(orm))]
pub fn derive_read_fields(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    read_fields::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `TableModel` and `BindFields` for a struct.
///
/// # Example
///
/// ```ignore
/// use dbframe::{Table, TableModel};
///
/// #[derive(Table)]
/// #[orm(table = "account")]
/// struct Account {
///     #[orm(id)]
///     id: i64,
///     owner: String,
///     balance: i64,
/// }
///
/// assert_eq!(Account::delete_sql(), "delete from account where id = :account_id");
/// ```
///
/// # Generated
///
/// - `TABLE`, `KEY_FIELDS`, `COMMON_FIELDS` constants, hence `descriptor()`,
///   `insert_sql()`, `update_sql()` and `delete_sql()`
/// - `field_values()` for binding through `BindObject`; every field type must
///   be `Clone + Into<Value>`
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (defaults to the snake_case struct name)
/// - `#[orm(id)]` - Key field
/// - `#[orm(column = "name")]` - Column name
/// - `#[orm(skip)]` - Not a column
#[proc_macro_derive(Table, attributes(orm))]
pub fn derive_table(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    table::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
