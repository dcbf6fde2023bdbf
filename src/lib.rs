//! shellctx: persistent named key-value contexts for the shell.
//!
//! Values live in named context stores under a storage directory. A context
//! name may chain several stores (`work+main`); reads fall through the chain
//! and writes land in the first. Every mutation is appended to the head
//! store's audit log.

pub mod audit;
pub mod cli;
pub mod clock;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod logging;
pub mod store;
pub mod style;
