use serde::{Deserialize, Serialize};

/// A board catalog: every currently active thread, organized by index page.
///
/// Fetched once per run and never persisted. The catalog's per-thread OP
/// previews are not consumed here, only the thread numbers; the full post
/// data comes from the per-thread fetch.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog(Vec<Page>);

impl Catalog {
    /// Thread numbers of every cataloged thread, flattened in page order
    /// with the within-page order preserved.
    pub fn thread_numbers(&self) -> impl Iterator<Item = u64> + '_ {
        self.0
            .iter()
            .flat_map(|page| page.threads.iter())
            .map(|thread| thread.no)
    }

    /// Selects the `[offset, offset + count)` window of the flattened
    /// thread-number sequence.
    ///
    /// An `offset` past the end yields an empty selection; a window reaching
    /// past the end is truncated to whatever threads remain.
    pub fn select_threads(&self, count: usize, offset: usize) -> Vec<u64> {
        self.thread_numbers().skip(offset).take(count).collect()
    }
}

/// One index page of the catalog.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Current page number.
    pub page: u32,

    /// Threads on this page, in bump order.
    pub threads: Vec<CatalogThread>,
}

/// Partial schema for a cataloged thread.
///
/// The API attaches the whole OP preview here; only the thread number is
/// declared and the rest is ignored.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogThread {
    /// The numeric thread ID.
    pub no: u64,
}
