use async_trait::async_trait;

use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::fs::EntryKind;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct TestCommand;

#[async_trait]
impl BuiltinCommand for TestCommand {
    fn name(&self) -> &'static str {
        "test"
    }

    fn category(&self) -> Category {
        Category::Shell
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("evaluate a conditional expression")
            .positional("expression (string, numeric, or file test)")
            .example("test -n \"$name\"")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, _ctx: &mut CommandContext) -> Result<i32, ShellError> {
        Ok(run_test(argv, shell).await)
    }
}

pub struct BracketCommand;

#[async_trait]
impl BuiltinCommand for BracketCommand {
    fn name(&self) -> &'static str {
        "["
    }

    fn category(&self) -> Category {
        Category::Shell
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("evaluate a conditional expression, closed with ']'")
            .positional("expression ... ]")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        if argv.last().map(String::as_str) != Some("]") {
            ctx.error("[: missing ']'");
            return Ok(2);
        }
        Ok(run_test(&argv[..argv.len() - 1], shell).await)
    }
}

async fn run_test(argv: &[String], shell: &Shell) -> i32 {
    if argv.is_empty() {
        return 1;
    }
    let args: Vec<&str> = if argv[0] == "[" {
        if argv.last().map(String::as_str) != Some("]") {
            return 2;
        }
        argv[1..argv.len() - 1].iter().map(String::as_str).collect()
    } else {
        argv.iter().map(String::as_str).collect()
    };
    if args.is_empty() {
        return 1;
    }
    // spec §4.8: "Parenthesised sub-expressions are permitted only at the
    // outermost positions as `( … )`" — a single wrap around the whole
    // expression, stripped once here rather than recursed into by `-a`/`-o`.
    let args: &[&str] = if args.len() >= 2 && args[0] == "(" && args[args.len() - 1] == ")" {
        &args[1..args.len() - 1]
    } else {
        &args
    };
    if args.is_empty() {
        return 2;
    }
    if evaluate(args, shell).await {
        0
    } else {
        1
    }
}

fn evaluate<'a>(args: &'a [&'a str], shell: &'a Shell) -> std::pin::Pin<Box<dyn std::future::Future<Output = bool> + Send + 'a>> {
    Box::pin(async move {
        if args.len() == 1 {
            return !args[0].is_empty();
        }
        if args[0] == "!" {
            return !evaluate(&args[1..], shell).await;
        }
        if args.len() >= 3 {
            for i in 1..args.len() {
                match args[i] {
                    "-a" => return evaluate(&args[..i], shell).await && evaluate(&args[i + 1..], shell).await,
                    "-o" => return evaluate(&args[..i], shell).await || evaluate(&args[i + 1..], shell).await,
                    _ => {}
                }
            }
        }
        if args.len() == 3 {
            let (left, op, right) = (args[0], args[1], args[2]);
            match op {
                "=" | "==" => return left == right,
                "!=" => return left != right,
                "-eq" => return parse_i64(left) == parse_i64(right),
                "-ne" => return parse_i64(left) != parse_i64(right),
                "-lt" => return parse_i64(left) < parse_i64(right),
                "-le" => return parse_i64(left) <= parse_i64(right),
                "-gt" => return parse_i64(left) > parse_i64(right),
                "-ge" => return parse_i64(left) >= parse_i64(right),
                _ => {}
            }
        }
        if args.len() == 2 {
            let (op, operand) = (args[0], args[1]);
            match op {
                "-z" => return operand.is_empty(),
                "-n" => return !operand.is_empty(),
                "-e" => return shell.fs.exists(&shell.resolve(operand)).await,
                "-f" => {
                    return shell
                        .fs
                        .stat(&shell.resolve(operand))
                        .await
                        .map(|s| s.kind == EntryKind::File)
                        .unwrap_or(false)
                }
                "-d" => {
                    return shell
                        .fs
                        .stat(&shell.resolve(operand))
                        .await
                        .map(|s| s.kind == EntryKind::Directory)
                        .unwrap_or(false)
                }
                "-s" => {
                    return shell
                        .fs
                        .stat(&shell.resolve(operand))
                        .await
                        .map(|s| s.size > 0)
                        .unwrap_or(false)
                }
                "-r" | "-w" | "-x" => return shell.fs.exists(&shell.resolve(operand)).await,
                _ => {}
            }
        }
        false
    })
}

fn parse_i64(s: &str) -> i64 {
    s.trim().parse().unwrap_or(0)
}
