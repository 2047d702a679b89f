use async_trait::async_trait;

use super::flags::parse_args;
use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::fs::RmOptions;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct RmCommand;

#[async_trait]
impl BuiltinCommand for RmCommand {
    fn name(&self) -> &'static str {
        "rm"
    }

    fn category(&self) -> Category {
        Category::Filesystem
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("remove files or directories")
            .flag("recursive", Some('r'), "remove directories and their contents recursively")
            .positional("paths to remove")
            .example("rm -r /tmp/olddir")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let parsed = parse_args(argv, &self.schema()).map_err(ShellError::Usage)?;
        if parsed.positional.is_empty() {
            return Err(ShellError::Usage("rm: missing operand".to_string()));
        }
        let recursive = parsed.has("recursive");
        let mut exit_code = 0;
        for target in &parsed.positional {
            let path = shell.resolve(target);
            if let Err(err) = shell.fs.remove(&path, RmOptions { recursive }).await {
                ctx.error(&format!("rm: cannot remove '{}': {}", target, err));
                exit_code = 1;
            }
        }
        Ok(exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_shell, redirected_ctx};

    #[tokio::test]
    async fn rm_removes_file() {
        let mut shell = new_shell();
        shell.fs.write_file("/tmp/f", "x").await.unwrap();
        let mut ctx = redirected_ctx(None);
        let code = shell
            .registry
            .clone()
            .invoke("rm", &["/tmp/f".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(code, 0);
        assert!(!shell.fs.exists("/tmp/f").await);
    }

    #[tokio::test]
    async fn rm_nonempty_dir_without_recursive_fails() {
        let mut shell = new_shell();
        shell.fs.mkdir("/tmp/d", false).await.unwrap();
        shell.fs.write_file("/tmp/d/f", "x").await.unwrap();
        let mut ctx = redirected_ctx(None);
        let code = shell
            .registry
            .clone()
            .invoke("rm", &["/tmp/d".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn rm_recursive_removes_subtree() {
        let mut shell = new_shell();
        shell.fs.mkdir("/tmp/d", false).await.unwrap();
        shell.fs.write_file("/tmp/d/f", "x").await.unwrap();
        let mut ctx = redirected_ctx(None);
        let code = shell
            .registry
            .clone()
            .invoke("rm", &["-r".to_string(), "/tmp/d".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(code, 0);
        assert!(!shell.fs.exists("/tmp/d").await);
    }
}
