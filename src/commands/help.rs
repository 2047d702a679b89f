use async_trait::async_trait;

use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

const CATEGORY_ORDER: &[Category] = &[Category::Shell, Category::Filesystem, Category::Process, Category::Editor];

#[derive(Default)]
pub struct HelpCommand;

#[async_trait]
impl BuiltinCommand for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn category(&self) -> Category {
        Category::Shell
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("list available commands, or show help for one")
            .positional("command name")
            .example("help grep")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        if let Some(name) = argv.first() {
            return match shell.registry.get(name) {
                Some(command) => {
                    ctx.write(&command.schema().render_help(name));
                    Ok(0)
                }
                None => {
                    ctx.error(&format!("help: no help topics match '{}'", name));
                    Ok(1)
                }
            };
        }

        let grouped = shell.registry.by_category();
        ctx.writeln("Available commands:\n");
        for category in CATEGORY_ORDER {
            let Some(names) = grouped.get(category) else { continue };
            if names.is_empty() {
                continue;
            }
            ctx.writeln(&format!("  {}:", category.label()));
            ctx.writeln(&format!("    {}\n", names.join(", ")));
        }
        ctx.write("Use '<command> --help' for details on a specific command.");
        Ok(0)
    }
}
