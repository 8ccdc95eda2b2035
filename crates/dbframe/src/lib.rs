//! # dbframe
//!
//! Composable readers that turn rows of a forward-only cursor into object
//! graphs, plus the small pieces around them: parameter binders, an
//! elementary DML text generator and an execution driver.
//!
//! ## Features
//!
//! - **Reader trees**: flat lists, keyed maps, sorted and indexed grouping,
//!   one-to-one members and one-to-many master/detail nesting, all through
//!   one [`FieldReader`] trait
//! - **Caller-owned destinations**: readers only insert into containers they
//!   are handed, through [`Sequence`] and [`Associative`]
//! - **Named parameters**: [`BindValue`], [`BindObject`] and [`Binders`]
//!   bind `:name` placeholders; [`dml`] produces matching statements
//! - **Row-level error policy**: the [`Executor`] skips or aborts on bad rows,
//!   misconfiguration always aborts
//! - **No database required**: [`MemoryDataset`] feeds readers from values or
//!   JSON; the `postgres` feature adds a tokio-postgres adapter
//!
//! ## Master/detail
//!
//! ```ignore
//! use dbframe::prelude::*;
//!
//! #[derive(Default, ReadFields)]
//! #[orm(prefix = "customer_")]
//! struct Customer {
//!     #[orm(id)]
//!     id: i64,
//!     name: String,
//!     #[orm(skip)]
//!     accounts: Vec<Account>,
//! }
//!
//! let mut reader = MasterDetailReader::new(
//!     column::<i64>("customer_id"),
//!     fields::<Customer>(),
//!     |_: &Customer| Some(Project::new(
//!         |c: &mut Customer| &mut c.accounts,
//!         ObjectReader::new(fields::<Account>()),
//!     )),
//! );
//! let mut customers = HashMap::new();
//! let stats = Executor::default().read_all(&mut dataset, &mut reader, &mut customers)?;
//! ```
//!
//! ## DML
//!
//! ```ignore
//! #[derive(Table)]
//! #[orm(table = "account")]
//! struct Account {
//!     #[orm(id)]
//!     id: i64,
//!     balance: i64,
//! }
//!
//! assert_eq!(Account::delete_sql(), "delete from account where id = :account_id");
//! ```

pub mod bind;
pub mod config;
pub mod container;
pub mod dataset;
pub mod dml;
pub mod error;
pub mod exec;
pub mod prelude;
pub mod reader;
pub mod row;
pub mod value;

#[cfg(feature = "postgres")]
pub mod pg;

pub use bind::{BindFields, BindObject, BindValue, Binder, Binders};
pub use config::{ErrorPolicy, ExecConfig};
pub use container::{Associative, Sequence};
pub use dataset::{Dataset, MemoryDataset, ParamSink};
pub use dml::{ObjectDescriptor, ParamNaming, TableDescriptor, TableModel};
pub use error::{OrmError, OrmResult};
pub use exec::{Executor, PassStats};
pub use reader::{
    AssociativeReader, Bound, Boxed, Column, DatasetReader, FieldReader, Fields,
    IndexedGroupReader, MasterDetailReader, ObjectReader, Pair, Project, ReaderPair,
    SortedGroupReader, column, fields,
};
pub use row::{FieldAccess, MemoryRow, ModelPk, ReadFields};
pub use value::{FromValue, Value};

#[cfg(feature = "postgres")]
pub use pg::{PgQuery, PgRows};

#[cfg(feature = "derive")]
pub use dbframe_derive::{ReadFields, Table};
