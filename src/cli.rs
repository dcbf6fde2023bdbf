//! CLI domain: parse, route, and output only.
//! Command semantics live in the dispatcher; this layer builds its environment.

mod output;
mod parse;
mod route;

pub use output::{exit_code, map_error, EXIT_FAILURE};
pub use parse::Cli;
pub use route::RunContext;
