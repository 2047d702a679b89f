//! Drives execution of an AST node, producing an exit code (spec.md §4.4).
//!
//! The five node kinds get correspondingly small handling here: `Empty`
//! and `Assignment` are one-liners, `Command`/`Pipeline`/`Compound` share
//! a common "run N stages, wire stdin/stdout between them" core, and
//! `Sequence` recurses while swallowing (but not silencing) failures.

use std::sync::Arc;

use crate::parser::{Arg, CommandNode, CompoundInner, Node, RedirectMode};

use super::context::{CommandContext, LineReader, TerminalIo};
use super::error::ShellError;
use super::state::Shell;

pub struct Executor;

/// What happens to the last stage's buffered output once it finishes.
#[derive(Clone, Copy, PartialEq, Eq)]
enum FinalMode {
    /// Flush to the terminal (a bare, unredirected command/pipeline).
    ToTerminal,
    /// Return the buffer to the caller, who writes it to a redirect file.
    Capture,
}

impl Executor {
    pub async fn execute(
        shell: &mut Shell,
        node: &Node,
        term: Arc<dyn TerminalIo>,
        line_reader: Option<Arc<dyn LineReader>>,
    ) -> Result<i32, ShellError> {
        match node {
            Node::Empty => Ok(0),

            Node::Assignment { name, value } => {
                shell.env.insert(name.clone(), value.clone());
                Ok(0)
            }

            Node::Command(cmd) => Self::exec_bare_command(shell, cmd, term, line_reader).await,

            Node::Pipeline(stages) => {
                let (code, _) =
                    Self::run_stages(shell, stages, None, FinalMode::ToTerminal, term, line_reader).await?;
                Ok(code)
            }

            Node::Compound(compound) => {
                let stdin_content = match &compound.stdin_file {
                    Some(file) => {
                        let path = shell.resolve(file);
                        Some(shell.fs.read_file(&path).await?)
                    }
                    None => None,
                };

                let final_mode = if compound.stdout_redirect.is_some() {
                    FinalMode::Capture
                } else {
                    FinalMode::ToTerminal
                };

                let (code, capture) = Self::run_stages(
                    shell,
                    compound.inner.stages(),
                    stdin_content,
                    final_mode,
                    term,
                    line_reader,
                )
                .await?;

                if let Some((file, mode)) = &compound.stdout_redirect {
                    let content = capture.unwrap_or_default();
                    let path = shell.resolve(file);
                    match mode {
                        RedirectMode::Write => shell.fs.write_file(&path, &content).await?,
                        RedirectMode::Append => {
                            if shell.fs.exists(&path).await {
                                let existing = shell.fs.read_file(&path).await?;
                                shell
                                    .fs
                                    .write_file(&path, &format!("{}\n{}", existing, content))
                                    .await?;
                            } else {
                                shell.fs.write_file(&path, &content).await?;
                            }
                        }
                    }
                }

                Ok(code)
            }

            Node::Sequence(items) => {
                let mut last = 0;
                for item in items {
                    let result =
                        Box::pin(Self::execute(shell, item, term.clone(), line_reader.clone())).await;
                    last = match result {
                        Ok(code) => code,
                        Err(ShellError::Exit(code)) => return Err(ShellError::Exit(code)),
                        Err(err) => {
                            term.eprint(&format!("{}\n", err));
                            err.exit_code()
                        }
                    };
                    shell.last_exit_code = last;
                }
                Ok(last)
            }
        }
    }

    /// A lone `Command` node (never part of a `Pipeline`/`Compound`): runs
    /// with a `Terminal`-mode context, so `readline` is available and
    /// output goes straight through rather than being buffered.
    async fn exec_bare_command(
        shell: &mut Shell,
        cmd: &CommandNode,
        term: Arc<dyn TerminalIo>,
        line_reader: Option<Arc<dyn LineReader>>,
    ) -> Result<i32, ShellError> {
        let argv = expand_args(shell, cmd);
        let mut ctx = CommandContext::terminal(term.clone(), line_reader);
        let registry = shell.registry.clone();
        match registry.invoke(&cmd.name, &argv, shell, &mut ctx).await {
            Ok(code) => Ok(code),
            Err(ShellError::Exit(code)) => Err(ShellError::Exit(code)),
            Err(err) => {
                ctx.error(&err.to_string());
                Ok(err.exit_code())
            }
        }
    }

    /// Runs `stages` strictly sequentially, piping each stage's buffered
    /// stdout into the next stage's stdin. Returns the final stage's exit
    /// code and, for `FinalMode::Capture`, its flushed stdout.
    async fn run_stages(
        shell: &mut Shell,
        stages: &[CommandNode],
        initial_stdin: Option<String>,
        final_mode: FinalMode,
        term: Arc<dyn TerminalIo>,
        line_reader: Option<Arc<dyn LineReader>>,
    ) -> Result<(i32, Option<String>), ShellError> {
        let mut current_stdin = initial_stdin;
        let mut last_code = 0;
        let mut capture = None;

        for (i, stage) in stages.iter().enumerate() {
            let is_last = i + 1 == stages.len();
            let argv = expand_args(shell, stage);
            let stdin = current_stdin.take();
            let mut ctx = if is_last && final_mode == FinalMode::Capture {
                CommandContext::redirected(stdin, term.clone())
            } else {
                CommandContext::piped(stdin, term.clone())
            };

            let registry = shell.registry.clone();
            let result = registry.invoke(&stage.name, &argv, shell, &mut ctx).await;
            last_code = match result {
                Ok(code) => code,
                Err(ShellError::Exit(code)) => return Err(ShellError::Exit(code)),
                Err(err) => {
                    ctx.error(&err.to_string());
                    err.exit_code()
                }
            };

            if is_last {
                match final_mode {
                    FinalMode::ToTerminal => {
                        let out = ctx.get_stdout();
                        if !out.is_empty() {
                            term.print(&out);
                            term.print("\n");
                        }
                    }
                    FinalMode::Capture => capture = Some(ctx.get_stdout()),
                }
            } else {
                current_stdin = Some(ctx.raw_buffer().to_string());
            }
            let _ = &line_reader; // only the terminal-mode bare command uses it
        }

        Ok((last_code, capture))
    }
}

/// Expand each `Arg` into its runtime string. Literal/quoted tokens never
/// expand; only `VariableRef`s resolve, at evaluation time (spec.md §4.4).
fn expand_args(shell: &Shell, cmd: &CommandNode) -> Vec<String> {
    cmd.args
        .iter()
        .map(|arg| match arg {
            Arg::Literal(s) => s.clone(),
            Arg::VariableRef(name) => match name.as_str() {
                "?" => shell.last_exit_code.to_string(),
                // `$#`/`$@` are stubs per spec.md §9: a full implementation
                // would plumb positional parameters through Command
                // evaluation, which this engine doesn't model.
                "#" => "0".to_string(),
                "@" => String::new(),
                other => shell.env.get(other).cloned().unwrap_or_default(),
            },
        })
        .collect()
}
