//! The per-command I/O handle: buffered stdin/stdout plus the cooperative
//! `readline` suspension point, in the three factory modes spec'd for the
//! executor (terminal, piped, redirected).

use std::sync::Arc;

use async_trait::async_trait;

use super::error::ShellError;

/// Direct passthrough to whatever is hosting the shell (a real terminal in
/// the CLI binary, a capturing buffer in tests). `Context::error` always
/// goes through here regardless of mode; `Context::write`/`writeln` only
/// do in `Terminal` mode.
pub trait TerminalIo: Send + Sync {
    fn print(&self, text: &str);
    fn eprint(&self, text: &str);
}

/// A terminal sink that throws everything away. Used for pipeline stages
/// that aren't the terminal endpoint, where the real `TerminalIo` is still
/// needed for `error()` (errors always surface, even mid-pipeline).
pub struct NullTerminal;

impl TerminalIo for NullTerminal {
    fn print(&self, _text: &str) {}
    fn eprint(&self, _text: &str) {}
}

/// Cooperative interactive input. `readline` suspends the calling command
/// until the host resolves it with a line (or `None` on cancellation/EOF).
/// Implemented as an explicit async handoff rather than a hidden global so
/// no particular async runtime or terminal-UI collaborator is assumed.
#[async_trait]
pub trait LineReader: Send + Sync {
    async fn readline(&self, prompt: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMode {
    /// Direct to the terminal; stdin absent; `readline` available.
    Terminal,
    /// Stdin present from the previous pipeline stage; stdout buffered
    /// for the next stage.
    Piped,
    /// Stdin optionally prefilled from a redirect-in file; stdout
    /// buffered for a redirect-out file.
    Redirected,
}

/// Per-command I/O context. One is constructed per command invocation by
/// the Executor and handed to the builtin's `run`.
pub struct CommandContext {
    mode: ContextMode,
    stdin: Option<String>,
    buffer: String,
    terminal: Arc<dyn TerminalIo>,
    line_reader: Option<Arc<dyn LineReader>>,
}

impl CommandContext {
    pub fn terminal(terminal: Arc<dyn TerminalIo>, line_reader: Option<Arc<dyn LineReader>>) -> Self {
        CommandContext {
            mode: ContextMode::Terminal,
            stdin: None,
            buffer: String::new(),
            terminal,
            line_reader,
        }
    }

    pub fn piped(stdin: Option<String>, terminal: Arc<dyn TerminalIo>) -> Self {
        CommandContext {
            mode: ContextMode::Piped,
            stdin,
            buffer: String::new(),
            terminal,
            line_reader: None,
        }
    }

    pub fn redirected(stdin: Option<String>, terminal: Arc<dyn TerminalIo>) -> Self {
        CommandContext {
            mode: ContextMode::Redirected,
            stdin,
            buffer: String::new(),
            terminal,
            line_reader: None,
        }
    }

    pub fn is_piped(&self) -> bool {
        self.mode == ContextMode::Piped
    }

    pub fn is_redirected(&self) -> bool {
        self.mode == ContextMode::Redirected
    }

    pub fn mode(&self) -> ContextMode {
        self.mode
    }

    /// Append `text` verbatim. Direct to the terminal in `Terminal` mode;
    /// otherwise accumulated in the stdout buffer.
    pub fn write(&mut self, text: &str) {
        match self.mode {
            ContextMode::Terminal => self.terminal.print(text),
            ContextMode::Piped | ContextMode::Redirected => self.buffer.push_str(text),
        }
    }

    /// `write` plus a trailing newline.
    pub fn writeln(&mut self, text: &str) {
        self.write(text);
        self.write("\n");
    }

    /// Errors always reach the terminal, piped or not: a failing stage
    /// mid-pipeline still needs its complaint seen.
    pub fn error(&self, text: &str) {
        if text.ends_with('\n') {
            self.terminal.eprint(text);
        } else {
            self.terminal.eprint(&format!("{}\n", text));
        }
    }

    pub fn has_stdin(&self) -> bool {
        self.stdin.is_some()
    }

    /// Raw stdin text, unsplit (used by `cat`, which echoes it verbatim).
    pub fn stdin_text(&self) -> &str {
        self.stdin.as_deref().unwrap_or("")
    }

    /// Stdin split on `\n`. A single trailing empty segment (the common
    /// case for content that ends in a newline) is dropped so commands
    /// don't see a phantom empty final line.
    pub fn get_stdin_lines(&self) -> Vec<String> {
        let Some(stdin) = &self.stdin else { return Vec::new() };
        let mut lines: Vec<String> = stdin.split('\n').map(str::to_string).collect();
        if lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            lines.pop();
        }
        lines
    }

    /// The raw accumulated buffer, used to prefill the next pipeline
    /// stage's stdin (preserves an embedded/trailing newline structure).
    pub fn raw_buffer(&self) -> &str {
        &self.buffer
    }

    /// Flush the buffer as a single string with one trailing newline
    /// stripped, the shape used both for the final terminal flush and for
    /// writing a redirect-out file.
    pub fn get_stdout(&self) -> String {
        let mut out = self.buffer.clone();
        if out.ends_with('\n') {
            out.pop();
        }
        out
    }

    /// Suspend for interactive input. Only available outside piped/
    /// redirected contexts, per the spec's `readline` contract.
    pub async fn readline(&self, prompt: &str) -> Result<String, ShellError> {
        if self.mode != ContextMode::Terminal {
            return Err(ShellError::Usage(
                "readline is not available in piped or redirected mode".to_string(),
            ));
        }
        match &self.line_reader {
            Some(reader) => reader.readline(prompt).await.ok_or(ShellError::Interrupt),
            None => Err(ShellError::Usage("no interactive input source attached".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn terminal_mode_writes_straight_through() {
        let term = Arc::new(CapturingTerminal::default());
        let mut ctx = CommandContext::terminal(term.clone(), None);
        ctx.write("hello");
        assert_eq!(*term.out.lock().unwrap(), "hello");
        assert_eq!(ctx.get_stdout(), "");
    }

    #[test]
    fn piped_mode_buffers_and_strips_one_trailing_newline() {
        let term = Arc::new(CapturingTerminal::default());
        let mut ctx = CommandContext::piped(None, term);
        ctx.writeln("apple");
        ctx.writeln("apricot");
        assert_eq!(ctx.raw_buffer(), "apple\napricot\n");
        assert_eq!(ctx.get_stdout(), "apple\napricot");
    }

    #[test]
    fn stdin_lines_drops_trailing_empty_segment() {
        let term = Arc::new(CapturingTerminal::default());
        let ctx = CommandContext::piped(Some("a\nb\nc\n".to_string()), term);
        assert_eq!(ctx.get_stdin_lines(), vec!["a", "b", "c"]);
    }

    #[test]
    fn stdin_lines_keeps_content_with_no_trailing_newline() {
        let term = Arc::new(CapturingTerminal::default());
        let ctx = CommandContext::piped(Some("a\nb".to_string()), term);
        assert_eq!(ctx.get_stdin_lines(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn readline_fails_outside_terminal_mode() {
        let term = Arc::new(CapturingTerminal::default());
        let ctx = CommandContext::piped(None, term);
        assert!(ctx.readline("> ").await.is_err());
    }
}
