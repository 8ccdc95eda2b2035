use super::*;
use crate::bind::{BindValue, Binders};
use crate::dataset::{MemoryDataset, ParamSink};
use crate::reader::{Bound, ObjectReader};
use crate::row::{FieldAccess, MemoryRow};
use crate::value::Value;
use serde_json::json;

#[derive(Debug, Default, PartialEq)]
struct Item {
    id: i64,
    label: String,
}

fn read_item(row: &MemoryRow, item: &mut Item) -> OrmResult<()> {
    item.id = row.field_value("id")?;
    item.label = row.field_value("label")?;
    Ok(())
}

fn items() -> MemoryDataset {
    MemoryDataset::from_json(json!([
        {"id": 1, "label": "one"},
        {"id": 2, "label": 5},
        {"id": 3, "label": "three"},
    ]))
    .unwrap()
}

#[test]
fn skip_policy_drops_bad_rows_and_keeps_order() {
    let mut ds = items();
    let mut out: Vec<Item> = Vec::new();
    let stats = Executor::default()
        .read_all(&mut ds, &mut ObjectReader::new(read_item), &mut out)
        .unwrap();

    assert_eq!(out.iter().map(|i| i.id).collect::<Vec<_>>(), [1, 3]);
    assert_eq!(
        stats,
        PassStats {
            rows: 3,
            read: 2,
            skipped: 1,
            row_limit_reached: false
        }
    );
}

#[test]
fn strict_policy_stops_at_first_bad_row() {
    let mut ds = items();
    let mut out: Vec<Item> = Vec::new();
    let err = Executor::new(ExecConfig::new().strict())
        .read_all(&mut ds, &mut ObjectReader::new(read_item), &mut out)
        .unwrap_err();

    assert!(matches!(err, OrmError::Conversion { ref column, .. } if column == "label"));
    assert_eq!(out.len(), 1);
}

#[test]
fn misconfigured_detail_reader_aborts_strict_pass() {
    use crate::reader::{MasterDetailReader, Project, column};
    use std::collections::HashMap;

    #[derive(Default)]
    struct Group {
        items: Vec<i64>,
    }

    let mut ds = MemoryDataset::from_json(json!([
        {"group": 1, "id": 10},
        {"group": 1, "id": 11},
    ]))
    .unwrap();
    let mut reader = MasterDetailReader::new(
        column::<i64>("group"),
        |_: &MemoryRow, _: &mut Group| -> OrmResult<()> { Ok(()) },
        |_: &Group| {
            Some(Project::new(
                |g: &mut Group| &mut g.items,
                |_: &MemoryRow, _: &mut Vec<i64>| -> OrmResult<()> {
                    Err(OrmError::misconfigured("detail target not wired"))
                },
            ))
        },
    );
    let mut groups: HashMap<i64, Group> = HashMap::new();
    let err = Executor::new(ExecConfig::new().strict())
        .read_all(&mut ds, &mut reader, &mut groups)
        .unwrap_err();

    assert!(err.is_misconfigured());
    assert_eq!(reader.detail_failures(), 0);
    assert_eq!(groups.len(), 1);
}

#[test]
fn misconfiguration_aborts_under_skip_policy() {
    let mut ds = items();
    let mut seen = 0;
    let mut reader = |_: &MemoryRow| -> OrmResult<()> {
        seen += 1;
        Err(OrmError::misconfigured("no target"))
    };
    let err = Executor::default()
        .execute(&mut ds, None, Some(&mut reader))
        .unwrap_err();
    assert!(err.is_misconfigured());
    assert_eq!(seen, 1);
}

#[test]
fn row_limit_stops_early() {
    let mut ds = items();
    let mut out: Vec<i64> = Vec::new();
    let mut reader = ObjectReader::new(|row: &MemoryRow, id: &mut i64| {
        *id = row.field_value("id")?;
        Ok(())
    });
    let stats = Executor::new(ExecConfig::new().with_row_limit(2))
        .read_all(&mut ds, &mut reader, &mut out)
        .unwrap();
    assert_eq!(out, [1, 2]);
    assert!(stats.row_limit_reached);
    assert_eq!(stats.rows, 2);
}

#[test]
fn binders_run_before_rows() {
    let mut ds = items();
    let binders = Binders::new()
        .with(BindValue::new(":min_id", 1))
        .with(|ds: &mut MemoryDataset| ds.bind_value(":label", Value::from("x")));
    let mut out: Vec<Item> = Vec::new();
    let mut bound = Bound::new(ObjectReader::new(read_item), &mut out);

    Executor::default()
        .execute(&mut ds, Some(&binders), Some(&mut bound))
        .unwrap();

    assert_eq!(ds.params().len(), 2);
    assert_eq!(ds.param(":min_id"), Some(&Value::Int(1)));
    assert_eq!(out.len(), 2);
}

#[test]
fn without_reader_no_row_is_consumed() {
    let mut ds = items();
    let stats = Executor::default()
        .execute(&mut ds, Some(&BindValue::new(":id", 2)), None)
        .unwrap();
    assert_eq!(stats, PassStats::default());
    assert!(ds.current().is_none());
    assert_eq!(ds.param(":id"), Some(&Value::Int(2)));
}

#[test]
fn binder_failure_prevents_execution() {
    struct NoParams;
    impl ParamSink for NoParams {}
    impl Dataset for NoParams {
        type Row = MemoryRow;
        fn execute(&mut self) -> OrmResult<()> {
            panic!("executed after failed bind");
        }
        fn advance(&mut self) -> bool {
            false
        }
        fn current(&self) -> Option<&MemoryRow> {
            None
        }
    }

    let err = Executor::default()
        .execute(&mut NoParams, Some(&BindValue::new(":id", 1)), None)
        .unwrap_err();
    assert!(err.is_misconfigured());
}

#[test]
fn cursor_without_current_row_is_misconfigured() {
    struct Broken;
    impl Dataset for Broken {
        type Row = MemoryRow;
        fn advance(&mut self) -> bool {
            true
        }
        fn current(&self) -> Option<&MemoryRow> {
            None
        }
    }

    let mut reader = |_: &MemoryRow| -> OrmResult<()> { Ok(()) };
    let err = Executor::default()
        .execute(&mut Broken, None, Some(&mut reader))
        .unwrap_err();
    assert!(err.is_misconfigured());
}

#[test]
fn begin_pass_follows_config() {
    struct Counting {
        passes: usize,
    }
    impl DatasetReader<MemoryRow> for Counting {
        fn read(&mut self, _: &MemoryRow) -> OrmResult<()> {
            Ok(())
        }
        fn begin_pass(&mut self) {
            self.passes += 1;
        }
    }

    let mut reader = Counting { passes: 0 };
    let mut ds = items();
    Executor::default()
        .execute(&mut ds, None, Some(&mut reader))
        .unwrap();
    Executor::new(ExecConfig::new().keep_reader_state())
        .execute(&mut ds, None, Some(&mut reader))
        .unwrap();
    assert_eq!(reader.passes, 1);
}
