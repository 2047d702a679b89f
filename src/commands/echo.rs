use async_trait::async_trait;

use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct EchoCommand;

#[async_trait]
impl BuiltinCommand for EchoCommand {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn category(&self) -> Category {
        Category::Shell
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("write arguments to the standard output")
            .positional("words to print, joined by single spaces")
            .example("echo hello $NAME")
    }

    async fn run(&self, argv: &[String], _shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        ctx.writeln(&argv.join(" "));
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_shell, redirected_ctx};

    #[tokio::test]
    async fn echo_joins_with_single_spaces() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(None);
        shell
            .registry
            .clone()
            .invoke(
                "echo",
                &["hello".to_string(), "world".to_string()],
                &mut shell,
                &mut ctx,
            )
            .await
            .unwrap();
        assert_eq!(ctx.get_stdout(), "hello world");
    }

    #[tokio::test]
    async fn echo_with_no_args_prints_empty_line() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(None);
        shell.registry.clone().invoke("echo", &[], &mut shell, &mut ctx).await.unwrap();
        assert_eq!(ctx.get_stdout(), "");
    }
}
