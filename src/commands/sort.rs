use async_trait::async_trait;
use std::cmp::Ordering;

use super::flags::parse_args;
use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct SortCommand;

#[async_trait]
impl BuiltinCommand for SortCommand {
    fn name(&self) -> &'static str {
        "sort"
    }

    fn category(&self) -> Category {
        Category::Filesystem
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("sort lines of text")
            .flag("reverse", Some('r'), "reverse the sort order")
            .flag("numeric-sort", Some('n'), "compare lines as numbers")
            .positional("file to sort (default: stdin)")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let parsed = parse_args(argv, &self.schema()).map_err(ShellError::Usage)?;
        let mut lines = match parsed.positional.first() {
            Some(file) => {
                let path = shell.resolve(file);
                match shell.fs.read_file(&path).await {
                    Ok(content) => content.split('\n').map(str::to_string).collect::<Vec<_>>(),
                    Err(err) => {
                        ctx.error(&format!("sort: {}: {}", file, err));
                        return Ok(1);
                    }
                }
            }
            None => ctx.get_stdin_lines(),
        };
        if lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            lines.pop();
        }

        let numeric = parsed.has("numeric-sort");
        lines.sort_by(|a, b| {
            if numeric {
                compare_numeric(a, b)
            } else {
                a.cmp(b)
            }
        });
        if parsed.has("reverse") {
            lines.reverse();
        }

        for line in &lines {
            ctx.writeln(line);
        }
        Ok(0)
    }
}

/// Parses both sides as numbers; a non-numeric side falls back to
/// lexical-equal (spec.md §4.7: "NaN falls back to lexical equal").
fn compare_numeric(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_shell, redirected_ctx};

    #[tokio::test]
    async fn sort_lexical_default() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(Some("banana\napple\napricot\n"));
        shell.registry.clone().invoke("sort", &[], &mut shell, &mut ctx).await.unwrap();
        assert_eq!(ctx.get_stdout(), "apple\napricot\nbanana");
    }

    #[tokio::test]
    async fn sort_numeric() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(Some("10\n2\n1\n"));
        shell
            .registry
            .clone()
            .invoke("sort", &["-n".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(ctx.get_stdout(), "1\n2\n10");
    }

    #[tokio::test]
    async fn sort_reverse() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(Some("a\nc\nb\n"));
        shell
            .registry
            .clone()
            .invoke("sort", &["-r".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(ctx.get_stdout(), "c\nb\na");
    }
}
