use async_trait::async_trait;

use super::flags::parse_args;
use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct TeeCommand;

#[async_trait]
impl BuiltinCommand for TeeCommand {
    fn name(&self) -> &'static str {
        "tee"
    }

    fn category(&self) -> Category {
        Category::Filesystem
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("duplicate standard input to files and standard output")
            .flag("append", Some('a'), "append to the given files rather than overwriting")
            .positional("files to write")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let parsed = parse_args(argv, &self.schema()).map_err(ShellError::Usage)?;
        let input = ctx.stdin_text().to_string();

        let mut exit_code = 0;
        for file in &parsed.positional {
            let path = shell.resolve(file);
            let result = if parsed.has("append") {
                shell.fs.append_file(&path, &input).await
            } else {
                shell.fs.write_file(&path, &input).await
            };
            if let Err(err) = result {
                ctx.error(&format!("tee: {}: {}", file, err));
                exit_code = 1;
            }
        }
        ctx.write(&input);
        Ok(exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_shell, redirected_ctx};

    #[tokio::test]
    async fn tee_writes_file_and_echoes_stdout() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(Some("hello\n"));
        shell
            .registry
            .clone()
            .invoke("tee", &["/tmp/out".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(shell.fs.read_file("/tmp/out").await.unwrap(), "hello\n");
        assert_eq!(ctx.get_stdout(), "hello");
    }

    #[tokio::test]
    async fn tee_append_mode_concatenates() {
        let mut shell = new_shell();
        shell.fs.write_file("/tmp/out", "first\n").await.unwrap();
        let mut ctx = redirected_ctx(Some("second\n"));
        shell
            .registry
            .clone()
            .invoke(
                "tee",
                &["-a".to_string(), "/tmp/out".to_string()],
                &mut shell,
                &mut ctx,
            )
            .await
            .unwrap();
        assert_eq!(shell.fs.read_file("/tmp/out").await.unwrap(), "first\nsecond\n");
    }
}
