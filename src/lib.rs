//! Core library for the pricelist-tools command line application.
//!
//! The library exposes high-level orchestration helpers that power the
//! command-line interface as well as the unit tests. The modules are structured
//! to keep responsibilities narrow and composable: IO adapters live under
//! [`pricelist::tools::io`], the cell representation inside
//! [`pricelist::tools::model`], the column-union logic in
//! [`pricelist::tools::combine`], and the two user-facing operations under
//! [`pricelist::tools::aggregate`] and [`pricelist::tools::search`].

pub mod pricelist;

pub use pricelist::tools::{Result, ToolError, aggregate, combine, error, io, model, search};
