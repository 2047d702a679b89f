use async_trait::async_trait;

use super::flags::parse_args;
use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

const DEFAULT_COUNT: usize = 10;

pub struct HeadCommand;

#[async_trait]
impl BuiltinCommand for HeadCommand {
    fn name(&self) -> &'static str {
        "head"
    }

    fn category(&self) -> Category {
        Category::Filesystem
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("print the first lines of a file")
            .option("lines", Some('n'), "number of lines to print (default: 10)")
            .positional("file to read")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let parsed = parse_args(argv, &self.schema()).map_err(ShellError::Usage)?;
        let count = parse_count(&parsed, ctx, "head")?;
        let Some(count) = count else { return Ok(1) };

        let Some(file) = parsed.positional.first() else {
            ctx.error("head: missing file operand");
            return Ok(1);
        };
        let path = shell.resolve(file);
        let content = match shell.fs.read_file(&path).await {
            Ok(content) => content,
            Err(err) => {
                ctx.error(&format!("head: {}: {}", file, err));
                return Ok(1);
            }
        };

        let mut lines: Vec<&str> = content.split('\n').collect();
        if lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            lines.pop();
        }
        for line in lines.into_iter().take(count) {
            ctx.writeln(line);
        }
        Ok(0)
    }
}

pub struct TailCommand;

#[async_trait]
impl BuiltinCommand for TailCommand {
    fn name(&self) -> &'static str {
        "tail"
    }

    fn category(&self) -> Category {
        Category::Filesystem
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("print the last lines of a file")
            .option("lines", Some('n'), "number of lines to print (default: 10)")
            .positional("file to read")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let parsed = parse_args(argv, &self.schema()).map_err(ShellError::Usage)?;
        let count = parse_count(&parsed, ctx, "tail")?;
        let Some(count) = count else { return Ok(1) };

        let Some(file) = parsed.positional.first() else {
            ctx.error("tail: missing file operand");
            return Ok(1);
        };
        let path = shell.resolve(file);
        let content = match shell.fs.read_file(&path).await {
            Ok(content) => content,
            Err(err) => {
                ctx.error(&format!("tail: {}: {}", file, err));
                return Ok(1);
            }
        };

        let mut lines: Vec<&str> = content.split('\n').collect();
        if lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            lines.pop();
        }
        let start = lines.len().saturating_sub(count);
        for line in &lines[start..] {
            ctx.writeln(line);
        }
        Ok(0)
    }
}

fn parse_count(
    parsed: &super::flags::ParsedArgs,
    ctx: &mut CommandContext,
    cmd: &str,
) -> Result<Option<usize>, ShellError> {
    match parsed.option("lines") {
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) => Ok(Some(n)),
            Err(_) => {
                ctx.error(&format!("{}: invalid number of lines: '{}'", cmd, raw));
                Ok(None)
            }
        },
        None => Ok(Some(DEFAULT_COUNT)),
    }
}
