//! Presentational components shared by the resource views.

pub mod data_table;

pub use data_table::{DataTable, TableColumn};
