// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod apply;
mod command;
mod error;
mod query;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{apply, apply_all};
pub use command::Command;
pub use error::CoreError;
pub use query::{DEFAULT_PAGE_LIMIT, PaginationInfo, RecordPage, RecordQuery, list_records};
pub use state::{State, TransitionResult};
