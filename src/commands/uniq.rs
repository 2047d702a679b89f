use async_trait::async_trait;

use super::flags::parse_args;
use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct UniqCommand;

#[async_trait]
impl BuiltinCommand for UniqCommand {
    fn name(&self) -> &'static str {
        "uniq"
    }

    fn category(&self) -> Category {
        Category::Filesystem
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("collapse consecutive duplicate lines")
            .flag("count", Some('c'), "prefix each line with its occurrence count")
            .positional("file to read (default: stdin)")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let parsed = parse_args(argv, &self.schema()).map_err(ShellError::Usage)?;
        let mut lines = match parsed.positional.first() {
            Some(file) => {
                let path = shell.resolve(file);
                match shell.fs.read_file(&path).await {
                    Ok(content) => content.split('\n').map(str::to_string).collect::<Vec<_>>(),
                    Err(err) => {
                        ctx.error(&format!("uniq: {}: {}", file, err));
                        return Ok(1);
                    }
                }
            }
            None => ctx.get_stdin_lines(),
        };
        if lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            lines.pop();
        }

        let mut groups: Vec<(String, usize)> = Vec::new();
        for line in lines.drain(..) {
            match groups.last_mut() {
                Some((last, count)) if *last == line => *count += 1,
                _ => groups.push((line, 1)),
            }
        }

        for (line, count) in &groups {
            if parsed.has("count") {
                ctx.writeln(&format!("{:>7}  {}", count, line));
            } else {
                ctx.writeln(line);
            }
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_shell, redirected_ctx};

    #[tokio::test]
    async fn uniq_collapses_consecutive_duplicates() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(Some("a\na\nb\na\n"));
        shell.registry.clone().invoke("uniq", &[], &mut shell, &mut ctx).await.unwrap();
        assert_eq!(ctx.get_stdout(), "a\nb\na");
    }

    #[tokio::test]
    async fn uniq_count_prefixes_with_padded_count() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(Some("a\na\nb\n"));
        shell
            .registry
            .clone()
            .invoke("uniq", &["-c".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(ctx.get_stdout(), "      2  a\n      1  b");
    }
}
