use async_trait::async_trait;

use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct ClearCommand;

#[async_trait]
impl BuiltinCommand for ClearCommand {
    fn name(&self) -> &'static str {
        "clear"
    }

    fn category(&self) -> Category {
        Category::Shell
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("clear the terminal screen")
    }

    async fn run(&self, _argv: &[String], _shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        ctx.write("\x1B[2J\x1B[H");
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_shell, redirected_ctx};

    #[tokio::test]
    async fn clear_emits_ansi_reset_sequence() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(None);
        shell.registry.clone().invoke("clear", &[], &mut shell, &mut ctx).await.unwrap();
        assert_eq!(ctx.get_stdout(), "\x1B[2J\x1B[H");
    }
}
