#![deny(clippy::all, clippy::pedantic)]
#![deny(missing_docs)]
#![allow(clippy::must_use_candidate)]
//! # chanfetch
//!
//! chanfetch pulls discussion threads and attached image metadata from an
//! imageboard's read-only API and persists normalized records as
//! line-delimited JSON files.
//!
//! A fetch session is scoped to a single validated [`Board`]. The [`Fetcher`]
//! drives the whole pipeline: it retrieves the board catalog, selects a
//! window of threads, downloads up to five of them in parallel, and writes
//! two record sets per thread:
//!
//! - thread starter summaries, appended to `<board>/thread_list.json`
//! - image post metadata, overwriting `<board>/images/<board>-<no>_ImageURLs.json`
//!
//! A thread that fails to download or decode never aborts the rest of the
//! run; the failure is logged and counted in the returned [`FetchSummary`].
//!
//! ## Example: fetching the top five threads of a board.
//!
//! ```no_run
//! use chanfetch::{Board, Fetcher};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), chanfetch::Error> {
//!     let board = Board::new("g")?;
//!     let fetcher = Fetcher::new(board, Path::new("."))?;
//!
//!     let summary = fetcher.fetch_top_threads(5, 0).await?;
//!     println!("fetched {} of {} threads", summary.fetched, summary.selected);
//!     Ok(())
//! }
//! ```

/// Board identifiers and the allow-list they are validated against.
pub mod board;

/// Client module contains [`Client`] for requesting catalog and thread data.
pub mod client;

/// Contains [`Error`]s that can be thrown by the library.
///
/// [`Error`]: crate::error::Error
pub mod error;

/// Fetch orchestration: thread selection and the bounded worker pool.
pub mod fetcher;

pub(crate) mod models;

/// Normalized record shapes extracted from fetched threads.
pub mod records;

pub(crate) mod result;

/// Output directory layout and line-delimited JSON record writing.
pub mod storage;

pub use board::Board;
pub use client::Client;
pub use error::Error;
pub use fetcher::{FetchSummary, Fetcher};
pub use models::*;
