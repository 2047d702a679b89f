//! Name -> handler map, built once at `Shell` construction (spec.md §4.6).
//! Process-wide shape, but not a hidden global: it's an explicit container
//! the caller builds and threads through, same as the teacher's
//! `CommandRegistry`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;

use super::flags::wants_help;
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Shell,
    Filesystem,
    Process,
    Editor,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Shell => "shell",
            Category::Filesystem => "filesystem",
            Category::Process => "process",
            Category::Editor => "editor",
        }
    }
}

/// A builtin command handler. `name`/`category`/`schema` are metadata the
/// registry uses for enumeration and help; `run` does the work.
#[async_trait]
pub trait BuiltinCommand: Send + Sync {
    fn name(&self) -> &'static str;
    fn category(&self) -> Category;
    fn schema(&self) -> CommandSchema;
    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError>;
}

pub struct CommandRegistry {
    commands: IndexMap<&'static str, Arc<dyn BuiltinCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        CommandRegistry {
            commands: IndexMap::new(),
        }
    }

    pub fn register(&mut self, command: Arc<dyn BuiltinCommand>) {
        self.commands.insert(command.name(), command);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn BuiltinCommand>> {
        self.commands.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.commands.keys().copied().collect()
    }

    /// Commands grouped by category, in registration order within each
    /// group, for `help`'s category-grouped enumeration.
    pub fn by_category(&self) -> HashMap<Category, Vec<&'static str>> {
        let mut grouped: HashMap<Category, Vec<&'static str>> = HashMap::new();
        for command in self.commands.values() {
            grouped.entry(command.category()).or_default().push(command.name());
        }
        grouped
    }

    /// Look up `name` and run it, intercepting `-h`/`--help` before the
    /// builtin ever sees its argv: help is always schema-derived, never
    /// hand-rolled (spec.md §6).
    pub async fn invoke(
        &self,
        name: &str,
        argv: &[String],
        shell: &mut Shell,
        ctx: &mut CommandContext,
    ) -> Result<i32, ShellError> {
        let command = self
            .get(name)
            .ok_or_else(|| ShellError::CommandNotFound(name.to_string()))?;
        if wants_help(argv) {
            ctx.write(&command.schema().render_help(name));
            return Ok(0);
        }
        command.run(argv, shell, ctx).await
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        CommandRegistry::new()
    }
}
