//! Context resolution: from an active name to a layered view of stores.

pub mod pointer;
pub mod view;

pub use pointer::{ActivePointer, NameSource, Selection};
pub use view::LayeredView;

use crate::error::StorageError;
use crate::store::StoreDir;
use tracing::debug;

/// Separator between store names in a chain, e.g. `work+main`.
pub const CHAIN_SEPARATOR: char = '+';

/// Split a chain name into store names, head first.
///
/// Empty segments are kept as literal (empty) store names.
pub fn split_chain(name: &str) -> Vec<&str> {
    name.split(CHAIN_SEPARATOR).collect()
}

/// Load every store named by `name` and layer them.
pub fn resolve(dir: &StoreDir, name: &str) -> Result<LayeredView, StorageError> {
    let mut names = split_chain(name).into_iter();
    let head_name = names.next().unwrap_or_default();
    let head = dir.load_store(head_name)?;
    let rest = names
        .map(|n| dir.load_store(n))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(context = name, layers = rest.len() + 1, "Resolved context chain");
    Ok(LayeredView::new(name, head, rest))
}
