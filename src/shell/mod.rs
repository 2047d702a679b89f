//! Shell state, the per-command I/O context, and the AST executor.

mod completion;
mod context;
mod error;
mod executor;
mod state;

pub use completion::{complete, Completions};
pub use context::{CommandContext, ContextMode, LineReader, NullTerminal, TerminalIo};
pub use error::ShellError;
pub use executor::Executor;
pub use state::{InputMode, Shell, HISTORY_CAP};

use std::sync::Arc;

use crate::parser::parse;

impl Shell {
    /// Parse and execute a single input line. This is the one seam that
    /// maps a `Result<i32, ShellError>` to a rendered message + exit code
    /// (spec.md §7); `ShellError::Exit` is the one variant that isn't
    /// mapped here — it propagates so the REPL driver can break its loop.
    pub async fn run_line(
        &mut self,
        line: &str,
        term: Arc<dyn TerminalIo>,
        line_reader: Option<Arc<dyn LineReader>>,
    ) -> Result<i32, ShellError> {
        self.push_history(line);

        let node = match parse(line) {
            Ok(node) => node,
            Err(err) => {
                term.eprint(&format!("{}\n", ShellError::from(err)));
                self.last_exit_code = 1;
                return Ok(1);
            }
        };

        match Executor::execute(self, &node, term.clone(), line_reader).await {
            Ok(code) => {
                self.last_exit_code = code;
                Ok(code)
            }
            Err(ShellError::Exit(code)) => Err(ShellError::Exit(code)),
            Err(err) => {
                term.eprint(&format!("{}\n", err));
                let code = err.exit_code();
                self.last_exit_code = code;
                Ok(code)
            }
        }
    }

    /// Prompt text for the interactive loop: `<cwd> $ ` (spec.md §6).
    pub fn prompt(&self) -> String {
        format!("{} $ ", self.cwd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_registry;
    use crate::fs::InMemoryFs;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingTerminal {
        out: Mutex<String>,
        err: Mutex<String>,
    }

    impl TerminalIo for CapturingTerminal {
        fn print(&self, text: &str) {
            self.out.lock().unwrap().push_str(text);
        }
        fn eprint(&self, text: &str) {
            self.err.lock().unwrap().push_str(text);
        }
    }

    fn new_shell() -> Shell {
        Shell::new(Arc::new(InMemoryFs::new()), Arc::new(build_registry()))
    }

    #[tokio::test]
    async fn pipeline_with_redirect_scenario() {
        let mut shell = new_shell();
        shell
            .fs
            .write_file("/home/a.txt", "apple\nbanana\napricot\n")
            .await
            .unwrap();
        let term = Arc::new(CapturingTerminal::default());
        let code = shell
            .run_line(
                "cat /home/a.txt | grep ap | sort > /home/out.txt",
                term.clone(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(code, 0);
        let content = shell.fs.read_file("/home/out.txt").await.unwrap();
        assert_eq!(content, "apple\napricot");
    }

    #[tokio::test]
    async fn sequence_with_assignment_and_expansion() {
        let mut shell = new_shell();
        let term = Arc::new(CapturingTerminal::default());
        let code = shell
            .run_line("NAME=world ; echo hello $NAME", term.clone(), None)
            .await
            .unwrap();
        assert_eq!(code, 0);
        assert_eq!(*term.out.lock().unwrap(), "hello world\n");
        assert_eq!(shell.last_exit_code, 0);
    }

    #[tokio::test]
    async fn command_not_found_sets_exit_127() {
        let mut shell = new_shell();
        let term = Arc::new(CapturingTerminal::default());
        let code = shell.run_line("noSuchCmd", term.clone(), None).await.unwrap();
        assert_eq!(code, 127);
        assert!(term.err.lock().unwrap().contains("koma: command not found: noSuchCmd"));

        let term2 = Arc::new(CapturingTerminal::default());
        let code = shell.run_line("echo $?", term2.clone(), None).await.unwrap();
        assert_eq!(code, 0);
        assert_eq!(*term2.out.lock().unwrap(), "127\n");
    }
}
