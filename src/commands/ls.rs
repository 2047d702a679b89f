use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use super::flags::parse_args;
use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::fs::EntryKind;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct LsCommand;

#[async_trait]
impl BuiltinCommand for LsCommand {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn category(&self) -> Category {
        Category::Filesystem
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("list directory contents")
            .flag("long", Some('l'), "use a long listing format")
            .flag("all", Some('a'), "do not hide entries starting with '.'")
            .positional("directory to list (default: cwd)")
            .example("ls -la /home")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let parsed = parse_args(argv, &self.schema()).map_err(ShellError::Usage)?;
        let target = parsed.positional.first().cloned().unwrap_or_else(|| shell.cwd.clone());
        let path = shell.resolve(&target);

        let mut entries = match shell.fs.readdir(&path).await {
            Ok(entries) => entries,
            Err(err) => {
                ctx.error(&format!("ls: cannot access '{}': {}", target, err));
                return Ok(1);
            }
        };

        if !parsed.has("all") {
            entries.retain(|e| !e.name.starts_with('.'));
        }

        if parsed.has("long") {
            for entry in &entries {
                let child_path = if path == "/" {
                    format!("/{}", entry.name)
                } else {
                    format!("{}/{}", path, entry.name)
                };
                let stat = shell.fs.stat(&child_path).await.map_err(ShellError::Fs)?;
                let marker = if stat.kind == EntryKind::Directory { 'd' } else { '-' };
                let date = Utc
                    .timestamp_opt(stat.mtime, 0)
                    .single()
                    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "????-??-?? ??:??".to_string());
                ctx.writeln(&format!("{}  {:>8}  {}  {}", marker, stat.size, date, entry.name));
            }
        } else if ctx.is_piped() || ctx.is_redirected() {
            for entry in &entries {
                ctx.writeln(&entry.name);
            }
        } else {
            let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
            ctx.writeln(&names.join("  "));
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_shell, redirected_ctx};

    #[tokio::test]
    async fn ls_hides_dotfiles_by_default() {
        let mut shell = new_shell();
        shell.fs.write_file("/tmp/.hidden", "x").await.unwrap();
        shell.fs.write_file("/tmp/visible", "x").await.unwrap();
        let mut ctx = redirected_ctx(None);
        shell
            .registry
            .clone()
            .invoke("ls", &["/tmp".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(ctx.get_stdout(), "visible");
    }

    #[tokio::test]
    async fn ls_all_shows_dotfiles() {
        let mut shell = new_shell();
        shell.fs.write_file("/tmp/.hidden", "x").await.unwrap();
        let mut ctx = redirected_ctx(None);
        shell
            .registry
            .clone()
            .invoke("ls", &["-a".to_string(), "/tmp".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert!(ctx.get_stdout().contains(".hidden"));
    }

    #[tokio::test]
    async fn ls_missing_path_is_error() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(None);
        let code = shell
            .registry
            .clone()
            .invoke("ls", &["/nope".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn ls_piped_mode_is_one_name_per_line() {
        let mut shell = new_shell();
        shell.fs.write_file("/tmp/a", "x").await.unwrap();
        shell.fs.write_file("/tmp/b", "x").await.unwrap();
        let mut ctx = redirected_ctx(None);
        shell
            .registry
            .clone()
            .invoke("ls", &["/tmp".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(ctx.get_stdout(), "a\nb");
    }
}
