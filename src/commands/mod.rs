//! Builtin commands: one module per command, registered once into a
//! [`CommandRegistry`] by [`build_registry`] (spec.md §4.6-4.7).

mod flags;
mod registry;
mod schema;

mod cat;
mod cd;
mod clear;
mod cp_mv;
mod echo;
mod exit;
mod export;
mod find;
mod grep;
mod head_tail;
mod help;
mod history;
mod ls;
mod mkdir;
mod pwd;
mod rm;
mod schist_cmd;
mod sort;
mod tee;
mod test_cmd;
mod touch;
mod uniq;
mod wc;

pub use flags::{parse_args, wants_help, ParsedArgs};
pub use registry::{BuiltinCommand, Category, CommandRegistry};
pub use schema::CommandSchema;

use std::sync::Arc;

/// Constructs and registers every builtin exactly once. Called from
/// `Shell::new`'s caller (the CLI binary, or a test harness), not hidden
/// behind a `lazy_static`/`ctor` global.
pub fn build_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(Arc::new(cd::CdCommand));
    registry.register(Arc::new(pwd::PwdCommand));
    registry.register(Arc::new(ls::LsCommand));
    registry.register(Arc::new(cat::CatCommand));
    registry.register(Arc::new(mkdir::MkdirCommand));
    registry.register(Arc::new(touch::TouchCommand));
    registry.register(Arc::new(rm::RmCommand));
    registry.register(Arc::new(cp_mv::CpCommand));
    registry.register(Arc::new(cp_mv::MvCommand));
    registry.register(Arc::new(echo::EchoCommand));
    registry.register(Arc::new(grep::GrepCommand));
    registry.register(Arc::new(find::FindCommand));
    registry.register(Arc::new(sort::SortCommand));
    registry.register(Arc::new(uniq::UniqCommand));
    registry.register(Arc::new(wc::WcCommand));
    registry.register(Arc::new(tee::TeeCommand));
    registry.register(Arc::new(head_tail::HeadCommand));
    registry.register(Arc::new(head_tail::TailCommand));
    registry.register(Arc::new(test_cmd::TestCommand));
    registry.register(Arc::new(test_cmd::BracketCommand));
    registry.register(Arc::new(clear::ClearCommand));
    registry.register(Arc::new(history::HistoryCommand));
    registry.register(Arc::new(export::ExportCommand));
    registry.register(Arc::new(exit::ExitCommand));
    registry.register(Arc::new(schist_cmd::SchistCommand));
    registry.register(Arc::new(help::HelpCommand::default()));
    registry
}
