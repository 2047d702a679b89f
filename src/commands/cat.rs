use async_trait::async_trait;

use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct CatCommand;

#[async_trait]
impl BuiltinCommand for CatCommand {
    fn name(&self) -> &'static str {
        "cat"
    }

    fn category(&self) -> Category {
        Category::Filesystem
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("concatenate files and print on the standard output")
            .positional("files to concatenate (default: stdin)")
            .example("cat a.txt b.txt")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        if argv.is_empty() {
            let stdin = ctx.stdin_text().to_string();
            ctx.write(&stdin);
            return Ok(0);
        }

        let mut exit_code = 0;
        for file in argv {
            let path = shell.resolve(file);
            match shell.fs.read_file(&path).await {
                Ok(content) => ctx.write(&content),
                Err(err) => {
                    ctx.error(&format!("cat: {}: {}", file, err));
                    exit_code = 1;
                }
            }
        }
        Ok(exit_code)
    }
}
