//! Row access traits and the in-memory row.

use crate::error::{OrmError, OrmResult};
use crate::value::{FromValue, Value};
use std::sync::Arc;

/// Typed access to one column of the current row.
///
/// Implemented for [`MemoryRow`] for every [`FromValue`] type and, with the
/// `postgres` feature, for `tokio_postgres::Row` for every `FromSqlOwned` type.
pub trait FieldAccess<T> {
    /// Read `column`, returning [`OrmError::MissingField`] when the column is
    /// absent or NULL (and `T` has no NULL representation), and
    /// [`OrmError::Conversion`] when the value has the wrong shape.
    fn field_value(&self, column: &str) -> OrmResult<T>;
}

/// Trait for entities that know how to populate themselves from a row.
///
/// This trait should typically be derived using `#[derive(ReadFields)]`
/// from the `dbframe-derive` crate.
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
///     #[orm(skip)]
///     accounts: Vec<Account>,
/// }
/// ```
pub trait ReadFields<R: ?Sized> {
    /// Write every mapped field of `self` from `row`, stopping at the first failure.
    fn read_fields(&mut self, row: &R) -> OrmResult<()>;
}

/// Access to an entity's identifying key.
pub trait ModelPk {
    type Id;

    fn pk(&self) -> &Self::Id;
}

/// A row of [`Value`]s sharing its column list with the rest of the result set.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRow {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl MemoryRow {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Column names, in result order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw value of `column`, if the row has it.
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Typed column access, see [`FieldAccess`].
    pub fn get<T: FromValue>(&self, column: &str) -> OrmResult<T> {
        self.field_value(column)
    }
}

impl<T: FromValue> FieldAccess<T> for MemoryRow {
    fn field_value(&self, column: &str) -> OrmResult<T> {
        match self.value(column) {
            None => Err(OrmError::missing(column)),
            Some(Value::Null) => T::from_null().ok_or_else(|| OrmError::null(column)),
            Some(v) => T::from_value(v).map_err(|message| OrmError::conversion(column, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> MemoryRow {
        let columns: Arc<[String]> = vec!["id".to_string(), "name".to_string(), "note".to_string()].into();
        MemoryRow::new(
            columns,
            vec![Value::Int(1), Value::Text("alice".into()), Value::Null],
        )
    }

    #[test]
    fn typed_access() {
        let r = row();
        assert_eq!(r.get::<i64>("id").unwrap(), 1);
        assert_eq!(r.get::<String>("name").unwrap(), "alice");
        assert_eq!(r.get::<Option<String>>("note").unwrap(), None);
    }

    #[test]
    fn absent_column_is_missing() {
        let err = row().get::<i64>("age").unwrap_err();
        assert!(matches!(err, OrmError::MissingField { ref column, null: false } if column == "age"));
    }

    #[test]
    fn null_for_required_type_is_missing() {
        let err = row().get::<String>("note").unwrap_err();
        assert!(matches!(err, OrmError::MissingField { null: true, .. }));
    }

    #[test]
    fn wrong_shape_is_conversion() {
        let err = row().get::<i64>("name").unwrap_err();
        assert!(err.is_conversion());
    }
}
