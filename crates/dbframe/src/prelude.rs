//! Convenient imports for typical `dbframe` usage.
//!
//! ```ignore
//! use dbframe::prelude::*;
//! ```

pub use crate::{
    Associative, BindFields, BindObject, BindValue, Binder, Binders, Dataset, DatasetReader,
    ErrorPolicy, ExecConfig, Executor, FieldAccess, FieldReader, MemoryDataset, MemoryRow, ModelPk,
    ObjectDescriptor, OrmError, OrmResult, ParamSink, PassStats, Sequence, TableDescriptor,
    TableModel, Value,
};

pub use crate::reader::{
    AssociativeReader, Bound, Boxed, IndexedGroupReader, MasterDetailReader, ObjectReader, Pair,
    Project, ReaderPair, SortedGroupReader, column, fields,
};

pub use crate::ReadFields;

#[cfg(feature = "derive")]
pub use crate::Table;
