use async_trait::async_trait;

use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::fs::EntryKind;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct CdCommand;

#[async_trait]
impl BuiltinCommand for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn category(&self) -> Category {
        Category::Shell
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("change the current working directory")
            .positional("directory to change into (default: $HOME)")
            .example("cd /tmp")
            .example("cd ~")
            .see_also("pwd")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let target = match argv.first() {
            None => shell.env.get("HOME").cloned().unwrap_or_else(|| "/".to_string()),
            Some(arg) if arg == "~" => shell.env.get("HOME").cloned().unwrap_or_else(|| "/".to_string()),
            Some(arg) if arg.starts_with("~/") => {
                let home = shell.env.get("HOME").cloned().unwrap_or_else(|| "/".to_string());
                format!("{}/{}", home, &arg[2..])
            }
            Some(arg) => arg.clone(),
        };

        let path = shell.resolve(&target);
        match shell.fs.stat(&path).await {
            Ok(stat) if stat.kind == EntryKind::Directory => {
                shell.cwd = path;
                Ok(0)
            }
            Ok(_) => {
                ctx.error(&format!("cd: {}: Not a directory", target));
                Ok(1)
            }
            Err(_) => {
                ctx.error(&format!("cd: {}: No such file or directory", target));
                Ok(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_shell, redirected_ctx};

    #[tokio::test]
    async fn cd_changes_cwd() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(None);
        let code = shell
            .registry
            .clone()
            .invoke("cd", &["/tmp".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(code, 0);
        assert_eq!(shell.cwd, "/tmp");
    }

    #[tokio::test]
    async fn cd_missing_dir_fails() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(None);
        let code = shell
            .registry
            .clone()
            .invoke("cd", &["/nope".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn cd_with_no_args_goes_home() {
        let mut shell = new_shell();
        let home = shell.env.get("HOME").unwrap().clone();
        let mut ctx = redirected_ctx(None);
        shell.registry.clone().invoke("cd", &[], &mut shell, &mut ctx).await.unwrap();
        assert_eq!(shell.cwd, home);
    }
}
