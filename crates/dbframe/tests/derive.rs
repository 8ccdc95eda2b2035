#![allow(dead_code)]

use dbframe::{
    BindObject, Binder, FieldReader, MemoryDataset, ModelPk, ObjectDescriptor, ReadFields, Table,
    TableModel, Value, fields,
};
use serde_json::json;

#[derive(Debug, Default, Clone, ReadFields, Table)]
#[orm(table = "customers", prefix = "customer_")]
struct Customer {
    #[orm(id)]
    id: i64,
    name: String,
    #[orm(column = "email_address")]
    email: Option<String>,
    #[orm(skip)]
    accounts: Vec<Account>,
}

#[derive(Debug, Default, Clone, ReadFields, Table)]
struct Account {
    #[orm(id)]
    id: i64,
    balance: f64,
}

#[derive(Debug, Default, ReadFields, Table)]
struct OrderLine {
    #[orm(id)]
    order_id: i64,
    #[orm(id)]
    line_no: i32,
    qty: i32,
}

#[test]
fn read_fields_applies_prefix_and_column_overrides() {
    let ds = MemoryDataset::from_json(json!([
        {"customer_id": 3, "customer_name": "ada", "email_address": "ada@example.com"}
    ]))
    .unwrap();
    let mut customer = Customer::default();
    customer.read_fields(&ds.rows()[0]).unwrap();

    assert_eq!(customer.id, 3);
    assert_eq!(customer.name, "ada");
    assert_eq!(customer.email.as_deref(), Some("ada@example.com"));
    assert_eq!(customer.pk(), &3);
}

#[test]
fn read_fields_reports_first_missing_column() {
    let ds = MemoryDataset::from_json(json!([{"customer_id": 1, "email_address": null}])).unwrap();
    let mut customer = Customer::default();
    let err = fields::<Customer>()
        .read(&ds.rows()[0], &mut customer)
        .unwrap_err();

    assert!(err.is_missing_field());
    assert!(err.to_string().contains("customer_name"));
    assert_eq!(customer.id, 1);
}

#[test]
fn table_constants_and_sql() {
    assert_eq!(Customer::TABLE, "customers");
    assert_eq!(Customer::KEY_FIELDS, ["id"]);
    assert_eq!(Customer::COMMON_FIELDS, ["name", "email_address"]);
    assert_eq!(OrderLine::TABLE, "order_line");
    assert_eq!(
        Customer::insert_sql(true),
        "insert into customers(id,name,email_address) values (:customers_id,:customers_name,:customers_email_address)"
    );
    assert_eq!(
        OrderLine::update_sql(),
        "update order_line set qty = :order_line_qty where order_id = :order_line_order_id and line_no = :order_line_line_no"
    );
    assert_eq!(Account::delete_sql(), "delete from account where id = :account_id");
}

#[test]
fn bind_object_matches_generated_placeholders() {
    let customer = Customer {
        id: 9,
        name: "bob".into(),
        email: None,
        accounts: Vec::new(),
    };
    let descriptor = Customer::descriptor();
    let mut ds = MemoryDataset::new(["unused"]);
    BindObject::new(&customer, &descriptor).bind(&mut ds).unwrap();

    assert_eq!(ds.params().len(), 3);
    assert_eq!(ds.param(&descriptor.parameter_name("id")), Some(&Value::Int(9)));
    assert_eq!(ds.param(":customers_email_address"), Some(&Value::Null));
}
