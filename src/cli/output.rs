//! CLI output: error mapping from dispatch errors to stable CLI surface.

use crate::error::CtxError;

/// Exit status for a command that failed.
pub const EXIT_FAILURE: i32 = 1;

/// Map dispatch errors to a string for CLI output.
pub fn map_error(e: &CtxError) -> String {
    match e {
        CtxError::UnknownCommand(token) => format!("command not recognized: {}", token),
        other => other.to_string(),
    }
}

/// Exit status for an error. Unknown commands are reported but not failures.
pub fn exit_code(e: &CtxError) -> i32 {
    match e {
        CtxError::UnknownCommand(_) => 0,
        _ => EXIT_FAILURE,
    }
}
