use async_trait::async_trait;

use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct TouchCommand;

#[async_trait]
impl BuiltinCommand for TouchCommand {
    fn name(&self) -> &'static str {
        "touch"
    }

    fn category(&self) -> Category {
        Category::Filesystem
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("create an empty file, or update an existing one's modification time")
            .positional("file to create/touch")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        if argv.is_empty() {
            return Err(ShellError::Usage("touch: missing operand".to_string()));
        }
        let mut exit_code = 0;
        for file in argv {
            let path = shell.resolve(file);
            let existing = shell.fs.read_file(&path).await;
            let content = existing.unwrap_or_default();
            if let Err(err) = shell.fs.write_file(&path, &content).await {
                ctx.error(&format!("touch: cannot touch '{}': {}", file, err));
                exit_code = 1;
            }
        }
        Ok(exit_code)
    }
}
