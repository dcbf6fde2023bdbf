//! Merge rules for the layered configuration.

mod merge_policy;

pub use merge_policy::{apply_env_overrides, builder_with_defaults};
