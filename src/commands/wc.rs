use async_trait::async_trait;

use super::flags::parse_args;
use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct WcCommand;

#[async_trait]
impl BuiltinCommand for WcCommand {
    fn name(&self) -> &'static str {
        "wc"
    }

    fn category(&self) -> Category {
        Category::Filesystem
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("print newline, word, and byte counts")
            .flag("lines", Some('l'), "print only the line count")
            .flag("words", Some('w'), "print only the word count")
            .flag("chars", Some('c'), "print only the byte count")
            .positional("file to measure (default: stdin)")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let parsed = parse_args(argv, &self.schema()).map_err(ShellError::Usage)?;
        let content = match parsed.positional.first() {
            Some(file) => {
                let path = shell.resolve(file);
                match shell.fs.read_file(&path).await {
                    Ok(content) => content,
                    Err(err) => {
                        ctx.error(&format!("wc: {}: {}", file, err));
                        return Ok(1);
                    }
                }
            }
            None => ctx.get_stdin_lines().join("\n"),
        };

        let lines = content.matches('\n').count() + usize::from(!content.is_empty() && !content.ends_with('\n'));
        let words = content.split_whitespace().count();
        let bytes = content.len();

        let show_all = !(parsed.has("lines") || parsed.has("words") || parsed.has("chars"));
        let mut parts = Vec::new();
        if show_all || parsed.has("lines") {
            parts.push(lines.to_string());
        }
        if show_all || parsed.has("words") {
            parts.push(words.to_string());
        }
        if show_all || parsed.has("chars") {
            parts.push(bytes.to_string());
        }
        ctx.writeln(&parts.join(" "));
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_shell, redirected_ctx};

    #[tokio::test]
    async fn wc_default_prints_all_three() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(Some("hello world\nfoo\n"));
        shell.registry.clone().invoke("wc", &[], &mut shell, &mut ctx).await.unwrap();
        assert_eq!(ctx.get_stdout(), "2 3 15");
    }

    #[tokio::test]
    async fn wc_lines_only() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(Some("a\nb\nc\n"));
        shell
            .registry
            .clone()
            .invoke("wc", &["-l".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(ctx.get_stdout(), "3");
    }
}
