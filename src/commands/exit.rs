use async_trait::async_trait;

use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct ExitCommand;

#[async_trait]
impl BuiltinCommand for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn category(&self) -> Category {
        Category::Shell
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("terminate the shell session")
            .positional("exit code (default: the last command's exit code)")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let code = match argv.first() {
            Some(raw) => match raw.parse::<i32>() {
                Ok(code) => code,
                Err(_) => {
                    ctx.error(&format!("exit: {}: numeric argument required", raw));
                    return Err(ShellError::Exit(2));
                }
            },
            None => shell.last_exit_code,
        };
        Err(ShellError::Exit(code))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_shell, redirected_ctx};
    use crate::shell::ShellError;

    #[tokio::test]
    async fn exit_with_no_args_propagates_last_exit_code() {
        let mut shell = new_shell();
        shell.last_exit_code = 3;
        let mut ctx = redirected_ctx(None);
        let err = shell
            .registry
            .clone()
            .invoke("exit", &[], &mut shell, &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ShellError::Exit(3)));
    }

    #[tokio::test]
    async fn exit_with_explicit_code() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(None);
        let err = shell
            .registry
            .clone()
            .invoke("exit", &["7".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ShellError::Exit(7)));
    }
}
