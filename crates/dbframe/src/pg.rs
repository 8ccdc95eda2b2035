//! tokio-postgres adapter.
//!
//! Statements are written with the same `:name` placeholders the DML
//! generator and the binders use. [`PgQuery`] collects bound values, rewrites
//! the placeholders to `$n` and fetches the result into [`PgRows`], a
//! buffered [`Dataset`] the executor can walk.
//!
//! ```ignore
//! use dbframe::pg::PgQuery;
//!
//! let mut query = PgQuery::new("select * from customer where region = :region");
//! BindValue::new(":region", "emea").bind(&mut query)?;
//! let mut rows = query.fetch(&client).await?;
//! Executor::default().read_all(&mut rows, &mut reader, &mut customers)?;
//! ```

use crate::dataset::{Dataset, ParamSink};
use crate::error::{OrmError, OrmResult};
use crate::row::FieldAccess;
use crate::value::Value;
use bytes::BytesMut;
use std::error::Error;
use tokio_postgres::types::{FromSqlOwned, IsNull, ToSql, Type, WasNull};
use tokio_postgres::{GenericClient, Row};

/// SQL text with named placeholders plus the values bound to them.
#[derive(Debug, Clone, Default)]
pub struct PgQuery {
    sql: String,
    params: Vec<(String, Value)>,
}

impl PgQuery {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Bind `value` to `name` (including the leading colon).
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        self.set(&name, value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[(String, Value)] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    fn set(&mut self, name: &str, value: Value) {
        match self.params.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.params.push((name.to_string(), value)),
        }
    }

    /// Rewrite `:name` placeholders to `$n`, numbered by first appearance.
    ///
    /// `::type` casts are left alone, as is text inside single or double
    /// quotes, dollar-quoted bodies, and `--` or `/* */` comments.
    /// Returns the rewritten SQL and the values in positional order.
    pub fn positional(&self) -> OrmResult<(String, Vec<&Value>)> {
        let sql = self.sql.as_str();
        let bytes = sql.as_bytes();
        let mut out = String::with_capacity(sql.len());
        let mut names: Vec<&str> = Vec::new();
        let mut values: Vec<&Value> = Vec::new();
        let mut copied = 0;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                quote @ (b'\'' | b'"') => i = skip_quoted(bytes, i, quote),
                b'-' if bytes.get(i + 1) == Some(&b'-') => i = skip_line_comment(bytes, i),
                b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i),
                b'$' => i = skip_dollar_quoted(bytes, i).unwrap_or(i + 1),
                b':' if bytes.get(i + 1) == Some(&b':') => i += 2,
                b':' if bytes.get(i + 1).is_some_and(|b| is_name_start(*b)) => {
                    let mut end = i + 2;
                    while end < bytes.len() && is_name_char(bytes[end]) {
                        end += 1;
                    }
                    let name = &sql[i..end];
                    let position = match names.iter().position(|n| *n == name) {
                        Some(p) => p + 1,
                        None => {
                            let value = self.param(name).ok_or_else(|| {
                                OrmError::misconfigured(format!("parameter '{name}' is not bound"))
                            })?;
                            names.push(name);
                            values.push(value);
                            names.len()
                        }
                    };
                    out.push_str(&sql[copied..i]);
                    out.push('$');
                    out.push_str(&position.to_string());
                    copied = end;
                    i = end;
                }
                _ => i += 1,
            }
        }
        out.push_str(&sql[copied..]);
        Ok((out, values))
    }

    /// Run the query and buffer its rows.
    pub async fn fetch(&self, client: &impl GenericClient) -> OrmResult<PgRows> {
        let (sql, values) = self.positional()?;
        let params: Vec<&(dyn ToSql + Sync)> = values.iter().map(|v| *v as &(dyn ToSql + Sync)).collect();
        tracing::debug!(target: "dbframe.exec", sql = %sql, params = params.len(), "fetch");
        let rows = client.query(sql.as_str(), &params).await?;
        Ok(PgRows::new(rows))
    }

    /// Run a statement and return the number of affected rows.
    pub async fn execute(&self, client: &impl GenericClient) -> OrmResult<u64> {
        let (sql, values) = self.positional()?;
        let params: Vec<&(dyn ToSql + Sync)> = values.iter().map(|v| *v as &(dyn ToSql + Sync)).collect();
        tracing::debug!(target: "dbframe.exec", sql = %sql, params = params.len(), "execute");
        Ok(client.execute(sql.as_str(), &params).await?)
    }
}

impl ParamSink for PgQuery {
    fn bind_value(&mut self, name: &str, value: Value) -> OrmResult<()> {
        self.set(name, value);
        Ok(())
    }
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Index of the newline ending a `--` comment, or the end of input.
fn skip_line_comment(bytes: &[u8], open: usize) -> usize {
    bytes[open..]
        .iter()
        .position(|b| *b == b'\n')
        .map_or(bytes.len(), |p| open + p)
}

/// Index just past a `/* */` comment. Postgres allows these to nest.
fn skip_block_comment(bytes: &[u8], open: usize) -> usize {
    let mut depth = 0usize;
    let mut i = open;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'/', b'*') => {
                depth += 1;
                i += 2;
            }
            (b'*', b'/') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return i;
                }
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Index just past a `$tag$ ... $tag$` body, or `None` when the `$` at
/// `open` does not start a dollar quote (for example `$1`).
fn skip_dollar_quoted(bytes: &[u8], open: usize) -> Option<usize> {
    let mut end = open + 1;
    if end < bytes.len() && is_name_start(bytes[end]) {
        end += 1;
        while end < bytes.len() && is_name_char(bytes[end]) {
            end += 1;
        }
    }
    if bytes.get(end) != Some(&b'$') {
        return None;
    }
    let delimiter = &bytes[open..=end];
    let body = end + 1;
    let close = bytes[body..]
        .windows(delimiter.len())
        .position(|w| w == delimiter)
        .map_or(bytes.len(), |p| body + p + delimiter.len());
    Some(close)
}

/// Index just past the closing quote; doubled quotes are escapes.
fn skip_quoted(bytes: &[u8], open: usize, quote: u8) -> usize {
    let mut i = open + 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

/// Buffered rows of a fetched query.
pub struct PgRows {
    rows: Vec<Row>,
    position: Option<usize>,
}

impl PgRows {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            position: None,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl Dataset for PgRows {
    type Row = Row;

    fn execute(&mut self) -> OrmResult<()> {
        self.position = None;
        Ok(())
    }

    fn advance(&mut self) -> bool {
        let next = self.position.map_or(0, |p| p + 1);
        self.position = Some(next.min(self.rows.len()));
        next < self.rows.len()
    }

    fn current(&self) -> Option<&Row> {
        self.position.and_then(|p| self.rows.get(p))
    }
}

impl<T: FromSqlOwned> FieldAccess<T> for Row {
    fn field_value(&self, column: &str) -> OrmResult<T> {
        let index = self
            .columns()
            .iter()
            .position(|c| c.name() == column)
            .ok_or_else(|| OrmError::missing(column))?;

        self.try_get(index).map_err(|e| {
            if e.source().is_some_and(|s| s.is::<WasNull>()) {
                OrmError::null(column)
            } else {
                OrmError::conversion(column, e.to_string())
            }
        })
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql(ty, out),
            Value::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
            Value::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
            Value::Text(v) => v.to_sql(ty, out),
            Value::Bytes(v) => v.to_sql(ty, out),
            Value::Uuid(v) => v.to_sql(ty, out),
            Value::Date(v) => v.to_sql(ty, out),
            Value::Timestamp(v) => v.to_sql(ty, out),
            Value::Json(v) => v.to_sql(ty, out),
        }
    }

    // The server decides; a mismatch surfaces as a query error.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_postgres::types::FromSql;

    #[test]
    fn placeholders_are_numbered_by_first_appearance() {
        let query = PgQuery::new("update t set a = :t_a where id = :t_id or parent = :t_id")
            .bind(":t_id", 7)
            .bind(":t_a", "x");
        let (sql, values) = query.positional().unwrap();
        assert_eq!(sql, "update t set a = $1 where id = $2 or parent = $2");
        assert_eq!(values, [&Value::from("x"), &Value::Int(7)]);
    }

    #[test]
    fn casts_and_quoted_text_are_untouched() {
        let query = PgQuery::new(r#"select :v::int, 'it''s :not', "odd:col" from t"#).bind(":v", 1);
        let (sql, values) = query.positional().unwrap();
        assert_eq!(sql, r#"select $1::int, 'it''s :not', "odd:col" from t"#);
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn comments_and_dollar_quotes_are_untouched() {
        let query = PgQuery::new(
            "select $fn$ :body $fn$, $$ :plain $$ -- :line\n\
             /* :outer /* :inner */ :still */ from t where id = :id",
        )
        .bind(":id", 3);
        let (sql, values) = query.positional().unwrap();
        assert_eq!(
            sql,
            "select $fn$ :body $fn$, $$ :plain $$ -- :line\n\
             /* :outer /* :inner */ :still */ from t where id = $1"
        );
        assert_eq!(values, [&Value::Int(3)]);
    }

    #[test]
    fn unbound_placeholder_is_misconfigured() {
        let err = PgQuery::new("delete from t where id = :t_id").positional().unwrap_err();
        assert!(err.is_misconfigured());
    }

    #[test]
    fn dml_text_binds_through_param_sink() {
        use crate::bind::{BindValue, Binder};
        use crate::dml::{self, TableDescriptor};

        let d = TableDescriptor::new("t").key("id").field("name");
        let mut query = PgQuery::new(dml::update(&d));
        BindValue::new(":t_id", 1).bind(&mut query).unwrap();
        BindValue::new(":t_name", "n").bind(&mut query).unwrap();
        let (sql, _) = query.positional().unwrap();
        assert_eq!(sql, "update t set name = $1 where id = $2");
    }

    #[test]
    fn int_values_narrow_to_column_width() {
        let mut buf = BytesMut::new();
        Value::Int(42).to_sql(&Type::INT4, &mut buf).unwrap();
        assert_eq!(i32::from_sql(&Type::INT4, &buf).unwrap(), 42);

        let mut buf = BytesMut::new();
        assert!(Value::Int(i64::MAX).to_sql(&Type::INT2, &mut buf).is_err());
        assert!(matches!(Value::Null.to_sql(&Type::TEXT, &mut buf), Ok(IsNull::Yes)));
    }
}
