use async_trait::async_trait;

use super::flags::parse_args;
use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct HistoryCommand;

#[async_trait]
impl BuiltinCommand for HistoryCommand {
    fn name(&self) -> &'static str {
        "history"
    }

    fn category(&self) -> Category {
        Category::Shell
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("display or clear the command history")
            .flag("clear", Some('c'), "clear the history list")
            .positional("show only the last N entries")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let parsed = parse_args(argv, &self.schema()).map_err(ShellError::Usage)?;

        if parsed.has("clear") {
            shell.history.clear();
            return Ok(0);
        }

        let total = shell.history.len();
        let count = match parsed.positional.first() {
            Some(raw) => raw.parse::<usize>().unwrap_or(total).min(total),
            None => total,
        };

        let start = total.saturating_sub(count);
        for (i, line) in shell.history.iter().enumerate().skip(start) {
            ctx.writeln(&format!("{:5}  {}", i + 1, line));
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_shell, redirected_ctx};

    #[tokio::test]
    async fn history_lists_entries_in_order_with_index() {
        let mut shell = new_shell();
        shell.push_history("echo a");
        shell.push_history("echo b");
        let mut ctx = redirected_ctx(None);
        shell.registry.clone().invoke("history", &[], &mut shell, &mut ctx).await.unwrap();
        assert_eq!(ctx.get_stdout(), "    1  echo a\n    2  echo b");
    }

    #[tokio::test]
    async fn history_clear_empties_the_list() {
        let mut shell = new_shell();
        shell.push_history("echo a");
        let mut ctx = redirected_ctx(None);
        shell
            .registry
            .clone()
            .invoke("history", &["-c".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert!(shell.history.is_empty());
    }

    #[tokio::test]
    async fn history_n_limits_to_last_n_entries() {
        let mut shell = new_shell();
        shell.push_history("a");
        shell.push_history("b");
        shell.push_history("c");
        let mut ctx = redirected_ctx(None);
        shell
            .registry
            .clone()
            .invoke("history", &["2".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(ctx.get_stdout(), "    2  b\n    3  c");
    }
}
