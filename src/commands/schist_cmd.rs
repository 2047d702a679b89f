use async_trait::async_trait;

use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::schist::{self, Environment, IoMarker, Value};
use crate::shell::{CommandContext, Shell, ShellError};

pub struct SchistCommand;

#[async_trait]
impl BuiltinCommand for SchistCommand {
    fn name(&self) -> &'static str {
        "schist"
    }

    fn category(&self) -> Category {
        Category::Process
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("evaluate Schist, a minimal Lisp dialect")
            .positional("expression(s) to evaluate; stdin lines if none given")
            .example("schist '(+ 1 2)'")
            .note("with no arguments and no stdin, drops into an interactive REPL")
    }

    async fn run(&self, argv: &[String], _shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let env = schist::global_environment();

        if !argv.is_empty() {
            let forms: Vec<String> = argv.to_vec();
            return Ok(run_forms(forms, &env, ctx).await);
        }

        if ctx.has_stdin() {
            let lines = ctx.get_stdin_lines();
            return Ok(run_forms(lines, &env, ctx).await);
        }

        run_repl(&env, ctx).await
    }
}

async fn run_forms(forms: Vec<String>, env: &Environment, ctx: &mut CommandContext) -> i32 {
    let mut exit_code = 0;
    for form in forms {
        if form.trim().is_empty() {
            continue;
        }
        match eval_one(&form, env, ctx).await {
            Ok(Some(text)) => ctx.writeln(&text),
            Ok(None) => {}
            Err(message) => {
                ctx.error(&format!("Error: {}", message));
                exit_code = 1;
            }
        }
    }
    exit_code
}

async fn run_repl(env: &Environment, ctx: &mut CommandContext) -> Result<i32, ShellError> {
    loop {
        let line = match ctx.readline("schist> ").await {
            Ok(line) => line,
            Err(ShellError::Interrupt) => return Ok(0),
            Err(err) => return Err(err),
        };
        if line.trim().is_empty() {
            continue;
        }
        match eval_one(&line, env, ctx).await {
            Ok(Some(text)) => ctx.writeln(&text),
            Ok(None) => {}
            Err(message) => ctx.error(&format!("Error: {}", message)),
        }
    }
}

/// Reads and evaluates one form, rendering its result per spec.md §4.9's
/// I/O-marker contract: `display`/`write`/`print`/`newline` are emitted
/// directly rather than shown as the expression's return value, and a
/// plain value prints via `Display`. Returns `Ok(None)` for forms whose
/// only effect was an I/O marker with nothing left to print.
///
/// A top-level `(read)` is the one marker resolved here rather than in
/// `render`: `eval` is kept pure (§4.9), so a `(read)` nested inside a
/// larger expression simply evaluates to the `Read` marker value with no
/// way to splice a suspended answer back in. Only when `(read)` is the
/// *entire* form can this driver notice the marker and fetch the next
/// line itself before rendering.
async fn eval_one(source: &str, env: &Environment, ctx: &mut CommandContext) -> Result<Option<String>, String> {
    let expr = schist::read_one(source).map_err(|e| e.to_string())?;
    let value = schist::eval(&expr, env).map_err(|e| e.to_string())?;
    if matches!(value, Value::IoMarker(IoMarker::Read)) {
        let line = ctx.readline("read> ").await.map_err(|e| e.to_string())?;
        let read_value = schist::read_one(&line).map_err(|e| e.to_string())?;
        return Ok(render(read_value));
    }
    Ok(render(value))
}

/// `eval_one` always intercepts a top-level `Read` marker before calling
/// this, so the only way one reaches here is nested inside a compound
/// value (e.g. a list containing an unresolved marker) — rendered via
/// `Value`'s own `Display` like any other non-primitive value.
fn render(value: Value) -> Option<String> {
    match value {
        Value::IoMarker(IoMarker::Display(v)) => Some(format!("{}", v)),
        Value::IoMarker(IoMarker::Write(v)) => Some(format!("{}", v)),
        Value::IoMarker(IoMarker::Print(v)) => Some(format!("{}\n", v)),
        Value::IoMarker(IoMarker::Newline) => Some(String::new()),
        other => Some(format!("{}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_shell, redirected_ctx};

    #[tokio::test]
    async fn schist_evaluates_an_argument_expression() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(None);
        shell
            .registry
            .clone()
            .invoke("schist", &["(+ 1 2)".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(ctx.get_stdout(), "3");
    }

    #[tokio::test]
    async fn schist_reports_errors_without_aborting_remaining_forms() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(None);
        let code = shell
            .registry
            .clone()
            .invoke(
                "schist",
                &["(/ 1 0)".to_string(), "(+ 1 1)".to_string()],
                &mut shell,
                &mut ctx,
            )
            .await
            .unwrap();
        assert_eq!(code, 1);
        assert_eq!(ctx.get_stdout(), "2");
    }

    #[tokio::test]
    async fn schist_reads_forms_from_stdin_when_no_args_given() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(Some("(+ 2 2)\n(* 3 3)\n"));
        shell.registry.clone().invoke("schist", &[], &mut shell, &mut ctx).await.unwrap();
        assert_eq!(ctx.get_stdout(), "4\n9");
    }

    #[tokio::test]
    async fn schist_read_outside_a_terminal_context_is_an_error() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(None);
        let code = shell
            .registry
            .clone()
            .invoke("schist", &["(read)".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn schist_display_builtin_prints_without_quoting() {
        let mut shell = new_shell();
        let mut ctx = redirected_ctx(None);
        shell
            .registry
            .clone()
            .invoke("schist", &["(display 42)".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(ctx.get_stdout(), "42");
    }
}
