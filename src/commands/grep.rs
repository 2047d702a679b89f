use async_trait::async_trait;
use regex_lite::RegexBuilder;

use super::flags::parse_args;
use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct GrepCommand;

#[async_trait]
impl BuiltinCommand for GrepCommand {
    fn name(&self) -> &'static str {
        "grep"
    }

    fn category(&self) -> Category {
        Category::Filesystem
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("print lines matching a pattern")
            .flag("line-number", Some('n'), "prefix each matching line with its line number")
            .flag("ignore-case", Some('i'), "ignore case distinctions")
            .flag("invert-match", Some('v'), "select non-matching lines")
            .flag("count", Some('c'), "print only a count of matching lines")
            .positional("PATTERN [FILE]")
            .example("grep -i error /var/log/app.log")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let parsed = parse_args(argv, &self.schema()).map_err(ShellError::Usage)?;
        let Some(pattern) = parsed.positional.first() else {
            return Err(ShellError::Usage("grep: missing pattern".to_string()));
        };

        let regex = RegexBuilder::new(pattern)
            .case_insensitive(parsed.has("ignore-case"))
            .build()
            .map_err(|e| ShellError::Usage(format!("grep: invalid pattern: {}", e)))?;

        let lines: Vec<String> = if let Some(file) = parsed.positional.get(1) {
            let path = shell.resolve(file);
            match shell.fs.read_file(&path).await {
                Ok(content) => content.split('\n').map(str::to_string).collect(),
                Err(err) => {
                    ctx.error(&format!("grep: {}: {}", file, err));
                    return Ok(2);
                }
            }
        } else {
            ctx.get_stdin_lines()
        };

        let invert = parsed.has("invert-match");
        let mut matches: Vec<(usize, &str)> = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            let is_match = regex.is_match(line) != invert;
            if is_match {
                matches.push((i + 1, line.as_str()));
            }
        }

        if parsed.has("count") {
            ctx.writeln(&matches.len().to_string());
        } else {
            for (num, line) in &matches {
                if parsed.has("line-number") {
                    ctx.writeln(&format!("{}:{}", num, line));
                } else {
                    ctx.writeln(line);
                }
            }
        }

        Ok(if matches.is_empty() { 1 } else { 0 })
    }
}
