//! Intermediate representation for the schema-driven code and migration
//! generator: the type catalogue, and the `Model`/`Table`/`Column` tree
//! emitters and the reference resolver build on.

pub mod column;
pub mod database;
pub mod datatype;
pub mod generator;
pub mod model;
pub mod naming;
pub mod table;

pub use column::{Column, ColumnRef};
pub use database::Database;
pub use datatype::{DataType, NativeTarget, UnknownDataType};
pub use generator::Generator;
pub use model::{Model, ModelError};
pub use table::Table;
