//! Forward-only cursors and the in-memory dataset.

use crate::error::{OrmError, OrmResult};
use crate::row::MemoryRow;
use crate::value::Value;
use std::sync::Arc;

/// A forward-only result cursor.
///
/// Positioned before the first row until the first [`advance`](Self::advance).
/// The row returned by [`current`](Self::current) is only borrowed for the
/// duration of one reader call.
pub trait Dataset {
    type Row: ?Sized;

    /// Run the statement. Called once per pass, after parameters are bound.
    fn execute(&mut self) -> OrmResult<()> {
        Ok(())
    }

    /// Move to the next row; `false` once exhausted.
    fn advance(&mut self) -> bool;

    fn current(&self) -> Option<&Self::Row>;
}

/// Something named parameters can be bound into.
pub trait ParamSink {
    fn bind_value(&mut self, name: &str, value: Value) -> OrmResult<()> {
        let _ = value;
        Err(OrmError::misconfigured(format!(
            "parameter '{name}' bound to a target that takes no parameters"
        )))
    }
}

/// Rows of [`Value`]s held in memory.
///
/// Bound parameters are recorded, not interpreted. `execute` rewinds the
/// cursor, so the same dataset can be read by several passes.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataset {
    columns: Arc<[String]>,
    rows: Vec<MemoryRow>,
    position: Option<usize>,
    params: Vec<(String, Value)>,
}

impl MemoryDataset {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Append a row; the number of values must match the column count.
    pub fn push_row(&mut self, values: Vec<Value>) -> OrmResult<()> {
        if values.len() != self.columns.len() {
            return Err(OrmError::validation(format!(
                "row has {} values, dataset has {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        self.rows.push(MemoryRow::new(Arc::clone(&self.columns), values));
        Ok(())
    }

    pub fn with_rows<I>(mut self, rows: I) -> OrmResult<Self>
    where
        I: IntoIterator<Item = Vec<Value>>,
    {
        for row in rows {
            self.push_row(row)?;
        }
        Ok(self)
    }

    /// Build a dataset from a JSON array of objects.
    ///
    /// Columns are the union of the object keys. Within one object they follow
    /// `serde_json::Map` iteration order, which is sorted by key; keys first
    /// seen in a later object come after the earlier ones. Keys missing from
    /// an object read as NULL.
    pub fn from_json(json: serde_json::Value) -> OrmResult<Self> {
        let serde_json::Value::Array(items) = json else {
            return Err(OrmError::validation("expected a JSON array of objects"));
        };

        let mut objects = Vec::with_capacity(items.len());
        for item in items {
            match item {
                serde_json::Value::Object(map) => objects.push(map),
                other => {
                    return Err(OrmError::validation(format!(
                        "expected a JSON object per row, got {other}"
                    )));
                }
            }
        }

        let mut columns: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut dataset = Self::new(columns);
        for mut object in objects {
            let values = dataset
                .columns
                .iter()
                .map(|c| object.remove(c).map_or(Value::Null, Value::from_json))
                .collect();
            dataset.push_row(values)?;
        }
        Ok(dataset)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[MemoryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parameters bound so far, in binding order.
    pub fn params(&self) -> &[(String, Value)] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn clear_params(&mut self) {
        self.params.clear();
    }
}

impl Dataset for MemoryDataset {
    type Row = MemoryRow;

    fn execute(&mut self) -> OrmResult<()> {
        self.position = None;
        Ok(())
    }

    fn advance(&mut self) -> bool {
        let next = self.position.map_or(0, |p| p + 1);
        self.position = Some(next.min(self.rows.len()));
        next < self.rows.len()
    }

    fn current(&self) -> Option<&MemoryRow> {
        self.position.and_then(|p| self.rows.get(p))
    }
}

impl ParamSink for MemoryDataset {
    fn bind_value(&mut self, name: &str, value: Value) -> OrmResult<()> {
        match self.params.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.params.push((name.to_string(), value)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cursor_walks_rows_once() {
        let mut ds = MemoryDataset::new(["id"])
            .with_rows([vec![Value::Int(1)], vec![Value::Int(2)]])
            .unwrap();
        assert!(ds.current().is_none());
        assert!(ds.advance());
        assert_eq!(ds.current().unwrap().get::<i64>("id").unwrap(), 1);
        assert!(ds.advance());
        assert!(!ds.advance());
        assert!(!ds.advance());
        assert!(ds.current().is_none());

        ds.execute().unwrap();
        assert!(ds.advance());
        assert_eq!(ds.current().unwrap().get::<i64>("id").unwrap(), 1);
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let mut ds = MemoryDataset::new(["a", "b"]);
        let err = ds.push_row(vec![Value::Int(1)]).unwrap_err();
        assert!(matches!(err, OrmError::Validation(_)));
        assert!(ds.is_empty());
    }

    #[test]
    fn from_json_unions_columns() {
        let ds = MemoryDataset::from_json(json!([
            {"id": 1, "name": "a"},
            {"id": 2, "note": "late column"}
        ]))
        .unwrap();
        assert_eq!(ds.columns(), ["id", "name", "note"]);
        assert_eq!(ds.rows()[0].value("note"), Some(&Value::Null));
        assert_eq!(ds.rows()[1].get::<Option<String>>("name").unwrap(), None);
    }

    #[test]
    fn from_json_orders_keys_within_an_object() {
        let ds = MemoryDataset::from_json(json!([
            {"zeta": 1, "alpha": 2},
            {"beta": 3}
        ]))
        .unwrap();
        assert_eq!(ds.columns(), ["alpha", "zeta", "beta"]);
        assert_eq!(ds.rows()[0].value("alpha"), Some(&Value::Int(2)));
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(MemoryDataset::from_json(json!({"id": 1})).is_err());
        assert!(MemoryDataset::from_json(json!([1, 2])).is_err());
    }

    #[test]
    fn rebinding_replaces_value() {
        let mut ds = MemoryDataset::new(["id"]);
        ds.bind_value(":id", Value::Int(1)).unwrap();
        ds.bind_value(":name", Value::from("x")).unwrap();
        ds.bind_value(":id", Value::Int(2)).unwrap();
        assert_eq!(ds.params().len(), 2);
        assert_eq!(ds.param(":id"), Some(&Value::Int(2)));
    }
}
