//! Core types and trait definitions for the uadir expert directory.
//!
//! No HTTP or database dependencies live here; every other crate builds on
//! these types.

// Backends implement the `impl Future + Send` trait methods with `async fn`.
#![allow(async_fn_in_trait)]

pub mod city;
pub mod error;
pub mod expert;
pub mod input;
pub mod stats;
pub mod store;

pub use error::{Classify, Error, ErrorKind, Result};
