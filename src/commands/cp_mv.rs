use async_trait::async_trait;

use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::fs::{basename, EntryKind};
use crate::shell::{CommandContext, Shell, ShellError};

/// If `dst` names an existing directory, compose `dst/basename(src)`
/// (spec.md §4.7); otherwise `dst` is used verbatim.
async fn resolve_destination(shell: &Shell, src: &str, dst: &str) -> String {
    let dst_path = shell.resolve(dst);
    match shell.fs.stat(&dst_path).await {
        Ok(stat) if stat.kind == EntryKind::Directory => {
            let name = basename(&shell.resolve(src));
            if dst_path == "/" {
                format!("/{}", name)
            } else {
                format!("{}/{}", dst_path, name)
            }
        }
        _ => dst_path,
    }
}

pub struct CpCommand;

#[async_trait]
impl BuiltinCommand for CpCommand {
    fn name(&self) -> &'static str {
        "cp"
    }

    fn category(&self) -> Category {
        Category::Filesystem
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("copy a file")
            .positional("source and destination")
            .example("cp a.txt b.txt")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let [src, dst] = match argv {
            [src, dst] => [src.clone(), dst.clone()],
            _ => return Err(ShellError::Usage("cp: usage: cp <src> <dst>".to_string())),
        };
        let src_path = shell.resolve(&src);
        let dst_path = resolve_destination(shell, &src, &dst).await;
        match shell.fs.copy_file(&src_path, &dst_path).await {
            Ok(()) => Ok(0),
            Err(err) => {
                ctx.error(&format!("cp: cannot copy '{}': {}", src, err));
                Ok(1)
            }
        }
    }
}

pub struct MvCommand;

#[async_trait]
impl BuiltinCommand for MvCommand {
    fn name(&self) -> &'static str {
        "mv"
    }

    fn category(&self) -> Category {
        Category::Filesystem
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("move or rename a file or directory")
            .positional("source and destination")
            .example("mv a.txt /tmp/")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let [src, dst] = match argv {
            [src, dst] => [src.clone(), dst.clone()],
            _ => return Err(ShellError::Usage("mv: usage: mv <src> <dst>".to_string())),
        };
        let src_path = shell.resolve(&src);
        let dst_path = resolve_destination(shell, &src, &dst).await;
        match shell.fs.rename(&src_path, &dst_path).await {
            Ok(()) => Ok(0),
            Err(err) => {
                ctx.error(&format!("mv: cannot move '{}': {}", src, err));
                Ok(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_shell, redirected_ctx};

    #[tokio::test]
    async fn cp_copies_into_existing_directory() {
        let mut shell = new_shell();
        shell.fs.write_file("/tmp/a.txt", "hi").await.unwrap();
        shell.fs.mkdir("/tmp/dir", false).await.unwrap();
        let mut ctx = redirected_ctx(None);
        shell
            .registry
            .clone()
            .invoke(
                "cp",
                &["/tmp/a.txt".to_string(), "/tmp/dir".to_string()],
                &mut shell,
                &mut ctx,
            )
            .await
            .unwrap();
        assert_eq!(shell.fs.read_file("/tmp/dir/a.txt").await.unwrap(), "hi");
        assert_eq!(shell.fs.read_file("/tmp/a.txt").await.unwrap(), "hi");
    }

    #[tokio::test]
    async fn mv_renames_into_new_name() {
        let mut shell = new_shell();
        shell.fs.write_file("/tmp/a.txt", "hi").await.unwrap();
        let mut ctx = redirected_ctx(None);
        shell
            .registry
            .clone()
            .invoke(
                "mv",
                &["/tmp/a.txt".to_string(), "/tmp/b.txt".to_string()],
                &mut shell,
                &mut ctx,
            )
            .await
            .unwrap();
        assert!(!shell.fs.exists("/tmp/a.txt").await);
        assert_eq!(shell.fs.read_file("/tmp/b.txt").await.unwrap(), "hi");
    }
}
