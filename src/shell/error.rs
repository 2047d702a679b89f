//! The shell's top-level error type. Every fallible seam in the engine
//! (parsing, VFS access, command dispatch, the `test` builtin, Schist)
//! funnels into this enum so `Shell::run_line` has exactly one place that
//! maps an error to an exit code and a rendered message.

use thiserror::Error;

use crate::fs::FsError;
use crate::parser::SyntaxError;

#[derive(Error, Debug, Clone)]
pub enum ShellError {
    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    #[error("{0}")]
    Fs(#[from] FsError),

    #[error("koma: command not found: {0}")]
    CommandNotFound(String),

    #[error("{0}")]
    Usage(String),

    #[error("Error: {0}")]
    Runtime(String),

    #[error("test: {0}")]
    TestSyntax(String),

    /// User pressed Ctrl+C, or a pending `readline` was cancelled.
    #[error("interrupted")]
    Interrupt,

    /// Raised by the `exit` builtin. Not a failure: `Shell::run_line`
    /// never swallows this one, it propagates to the REPL driver so the
    /// driver (not library code) decides what "exiting" means.
    #[error("exit({0})")]
    Exit(i32),
}

impl ShellError {
    /// Exit code this error maps to when it reaches the top of
    /// `Shell::run_line` without being the `Exit` variant.
    pub fn exit_code(&self) -> i32 {
        match self {
            ShellError::Syntax(_) => 1,
            ShellError::Fs(_) => 1,
            ShellError::CommandNotFound(_) => 127,
            ShellError::Usage(_) => 1,
            ShellError::Runtime(_) => 1,
            ShellError::TestSyntax(_) => 2,
            ShellError::Interrupt => 130,
            ShellError::Exit(code) => *code,
        }
    }
}
