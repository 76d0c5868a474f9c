//! Query modules for the toy catalog.
//!
//! Each module provides a query struct that borrows a [`ToyStore`](crate::store::ToyStore)
//! and exposes async methods returning `Result<T>` with JSON document payloads.

pub mod toys;

pub use toys::ToyQuery;
