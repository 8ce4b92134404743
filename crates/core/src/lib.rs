//! Domain types and pure decision logic for the QuoteDesk assignment service.
//!
//! Nothing in this crate performs I/O. Callers load rules, engineer
//! workloads and inquiries from the store and pass snapshots in.

pub mod assignment;
pub mod error;
pub mod types;
