//! Core business logic - framework-agnostic ledger, CRM and reporting operations.
//!
//! `ledger`, `feed`, `filter`, `csv_import` and `csv_export` are pure. The remaining
//! modules persist through `SeaORM` and are the only place database access happens.

pub mod category;
pub mod commitment;
pub mod csv_export;
pub mod csv_import;
pub mod customer;
pub mod feed;
pub mod filter;
pub mod ledger;
pub mod payment;
pub mod payment_method;
pub mod sales;
