//! Persistence layer for the role allow-list.
//!
//! Repositories here hide the backing storage behind the `RoleStore` trait so the import
//! service and the command handlers never see whether roles live in a JSON document or
//! in a database table.

pub mod role;
