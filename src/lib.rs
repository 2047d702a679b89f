//! koma-shell - a POSIX-inspired shell engine, the Schist Lisp dialect,
//! and an in-memory virtual filesystem.
//!
//! The three subsystems are independent: [`fs`] is a standalone VFS,
//! [`schist`] is a standalone interpreter, and [`shell`] wires a lexer,
//! parser and executor together, reaching into `fs` for redirections and
//! into `commands::build_registry` for `schist`'s own builtin entry point.

pub mod commands;
pub mod fs;
pub mod parser;
pub mod schist;
pub mod shell;

pub use commands::build_registry;
pub use fs::{FileSystem, InMemoryFs};
pub use parser::parse;
pub use shell::Shell;
