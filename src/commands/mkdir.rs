use async_trait::async_trait;

use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct MkdirCommand;

#[async_trait]
impl BuiltinCommand for MkdirCommand {
    fn name(&self) -> &'static str {
        "mkdir"
    }

    fn category(&self) -> Category {
        Category::Filesystem
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("create a directory")
            .positional("directory to create")
            .note("non-recursive: intermediate directories are not created")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        if argv.is_empty() {
            return Err(ShellError::Usage("mkdir: missing operand".to_string()));
        }
        let mut exit_code = 0;
        for dir in argv {
            let path = shell.resolve(dir);
            if let Err(err) = shell.fs.mkdir(&path, false).await {
                ctx.error(&format!("mkdir: cannot create directory '{}': {}", dir, err));
                exit_code = 1;
            }
        }
        Ok(exit_code)
    }
}
