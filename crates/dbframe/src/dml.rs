//! Elementary DML text from a table descriptor.
//!
//! The generator only assembles text: column lists, `set` clauses and a
//! conjunctive key predicate, with named placeholders in the form the
//! descriptor chooses. Nothing is quoted or validated.
//!
//! ```
//! use dbframe::dml::{self, TableDescriptor};
//!
//! let account = TableDescriptor::new("account").key("id").fields(["owner", "balance"]);
//! assert_eq!(
//!     dml::update(&account),
//!     "update account set owner = :account_owner, balance = :account_balance where id = :account_id"
//! );
//! ```

use crate::bind::BindFields;

/// How a descriptor names the placeholder for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamNaming {
    /// `:table_field`
    #[default]
    TableField,
    /// `:field`
    Field,
}

/// Table name, ordered key fields and ordered common fields of an entity.
pub trait ObjectDescriptor {
    fn table_name(&self) -> &str;

    fn key_fields(&self) -> &[String];

    fn common_fields(&self) -> &[String];

    /// Placeholder used for `field`, including the leading colon.
    fn parameter_name(&self, field: &str) -> String {
        format!(":{}_{}", self.table_name(), field)
    }
}

/// The stock [`ObjectDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    table: String,
    keys: Vec<String>,
    fields: Vec<String>,
    naming: ParamNaming,
}

impl TableDescriptor {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            keys: Vec::new(),
            fields: Vec::new(),
            naming: ParamNaming::default(),
        }
    }

    pub fn key(mut self, name: impl Into<String>) -> Self {
        self.keys.push(name.into());
        self
    }

    pub fn keys<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn naming(mut self, naming: ParamNaming) -> Self {
        self.naming = naming;
        self
    }
}

impl ObjectDescriptor for TableDescriptor {
    fn table_name(&self) -> &str {
        &self.table
    }

    fn key_fields(&self) -> &[String] {
        &self.keys
    }

    fn common_fields(&self) -> &[String] {
        &self.fields
    }

    fn parameter_name(&self, field: &str) -> String {
        match self.naming {
            ParamNaming::TableField => format!(":{}_{}", self.table, field),
            ParamNaming::Field => format!(":{field}"),
        }
    }
}

/// Entities with a static table layout. Derived with `#[derive(Table)]`.
pub trait TableModel: BindFields {
    const TABLE: &'static str;
    const KEY_FIELDS: &'static [&'static str];
    const COMMON_FIELDS: &'static [&'static str];

    fn descriptor() -> TableDescriptor {
        TableDescriptor::new(Self::TABLE)
            .keys(Self::KEY_FIELDS.iter().copied())
            .fields(Self::COMMON_FIELDS.iter().copied())
    }

    fn insert_sql(with_keys: bool) -> String {
        insert(&Self::descriptor(), with_keys)
    }

    fn update_sql() -> String {
        update(&Self::descriptor())
    }

    fn delete_sql() -> String {
        delete(&Self::descriptor())
    }
}

/// `insert into T(k..,f..) values (:T_k..,:T_f..)`; keys only when `with_keys`.
///
/// Empty when no column is selected.
pub fn insert(d: &dyn ObjectDescriptor, with_keys: bool) -> String {
    let keys: &[String] = if with_keys { d.key_fields() } else { &[] };
    let columns: Vec<&str> = keys
        .iter()
        .chain(d.common_fields())
        .map(String::as_str)
        .collect();
    if columns.is_empty() {
        return String::new();
    }

    let params: Vec<String> = columns.iter().map(|c| d.parameter_name(c)).collect();
    format!(
        "insert into {}({}) values ({})",
        d.table_name(),
        columns.join(","),
        params.join(",")
    )
}

/// `update T set f = :T_f, ... where k = :T_k and ...`.
///
/// Empty without common fields; without key fields the update is unconditional.
pub fn update(d: &dyn ObjectDescriptor) -> String {
    if d.common_fields().is_empty() {
        return String::new();
    }

    let sets: Vec<String> = d
        .common_fields()
        .iter()
        .map(|f| format!("{f} = {}", d.parameter_name(f)))
        .collect();
    let mut sql = format!("update {} set {}", d.table_name(), sets.join(", "));
    push_key_predicate(&mut sql, d);
    sql
}

/// `delete from T where k = :T_k and ...`; no keys deletes every row.
pub fn delete(d: &dyn ObjectDescriptor) -> String {
    let mut sql = format!("delete from {}", d.table_name());
    push_key_predicate(&mut sql, d);
    sql
}

fn push_key_predicate(sql: &mut String, d: &dyn ObjectDescriptor) {
    if d.key_fields().is_empty() {
        return;
    }
    let predicate: Vec<String> = d
        .key_fields()
        .iter()
        .map(|k| format!("{k} = {}", d.parameter_name(k)))
        .collect();
    sql.push_str(" where ");
    sql.push_str(&predicate.join(" and "));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> TableDescriptor {
        TableDescriptor::new("customer").key("id").fields(["name", "email"])
    }

    #[test]
    fn insert_text() {
        assert_eq!(
            insert(&customer(), true),
            "insert into customer(id,name,email) values (:customer_id,:customer_name,:customer_email)"
        );
        assert_eq!(
            insert(&customer(), false),
            "insert into customer(name,email) values (:customer_name,:customer_email)"
        );
    }

    #[test]
    fn update_and_delete_text() {
        let d = TableDescriptor::new("line").keys(["order_id", "line_no"]).field("qty");
        assert_eq!(
            update(&d),
            "update line set qty = :line_qty where order_id = :line_order_id and line_no = :line_line_no"
        );
        assert_eq!(
            delete(&d),
            "delete from line where order_id = :line_order_id and line_no = :line_line_no"
        );
    }

    #[test]
    fn empty_selections_yield_empty_text() {
        let keys_only = TableDescriptor::new("t").key("id");
        assert_eq!(insert(&keys_only, false), "");
        assert_eq!(update(&keys_only), "");
        assert_eq!(insert(&TableDescriptor::new("t"), true), "");
        assert_eq!(insert(&keys_only, true), "insert into t(id) values (:t_id)");
    }

    #[test]
    fn keyless_tables() {
        let d = TableDescriptor::new("log").field("msg");
        assert_eq!(update(&d), "update log set msg = :log_msg");
        assert_eq!(delete(&d), "delete from log");
    }

    #[test]
    fn field_naming() {
        let d = customer().naming(ParamNaming::Field);
        assert_eq!(d.parameter_name("name"), ":name");
        assert_eq!(delete(&d), "delete from customer where id = :id");
    }
}
