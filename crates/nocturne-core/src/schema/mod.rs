//! SQLite download ledger.
//!
//! Records which content identities have been materialized locally and
//! where, so a later `remove` can find the file again.

pub mod db;
pub mod migrations;

pub use db::Database;
