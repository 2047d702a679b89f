use async_trait::async_trait;

use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct ExportCommand;

#[async_trait]
impl BuiltinCommand for ExportCommand {
    fn name(&self) -> &'static str {
        "export"
    }

    fn category(&self) -> Category {
        Category::Shell
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("set an environment variable")
            .positional("NAME=VALUE, or NAME to export without a value")
            .example("export NAME=world")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        if argv.is_empty() {
            let mut names: Vec<&String> = shell.env.keys().collect();
            names.sort();
            for name in names {
                ctx.writeln(&format!("export {}={}", name, shell.env[name]));
            }
            return Ok(0);
        }

        for arg in argv {
            match arg.split_once('=') {
                Some((name, value)) => {
                    shell.env.insert(name.to_string(), value.to_string());
                }
                None => {
                    shell.env.entry(arg.clone()).or_insert_with(String::new);
                }
            }
        }
        Ok(0)
    }
}
