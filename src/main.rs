use std::io::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use koma_shell::commands::build_registry;
use koma_shell::fs::InMemoryFs;
use koma_shell::shell::{LineReader, Shell, ShellError, TerminalIo};

#[derive(Parser)]
#[command(name = "koma")]
#[command(about = "A POSIX-inspired shell with a built-in Schist Lisp dialect")]
#[command(version)]
struct Cli {
    /// Execute a single line and exit, instead of starting the REPL.
    #[arg(short = 'c')]
    command: Option<String>,
}

/// Direct stdout/stderr passthrough; the REPL binary has nothing to
/// buffer for, unlike the capturing terminals used in tests.
struct StdioTerminal;

impl TerminalIo for StdioTerminal {
    fn print(&self, text: &str) {
        print!("{}", text);
        let _ = std::io::stdout().flush();
    }

    fn eprint(&self, text: &str) {
        eprint!("{}", text);
    }
}

/// Line-buffered stdin reader used for the interactive `readline`
/// suspension point (spec.md §4.9, §9). Raw key-by-key editing (history
/// recall, cursor movement, tab completion) is the terminal collaborator's
/// job per §1/§6; this binary only needs whole completed lines.
struct StdinLineReader {
    lines: Mutex<BufReader<tokio::io::Stdin>>,
}

impl StdinLineReader {
    fn new() -> Self {
        StdinLineReader {
            lines: Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }
}

#[async_trait]
impl LineReader for StdinLineReader {
    async fn readline(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = std::io::stdout().flush();
        let mut buf = String::new();
        let mut reader = self.lines.lock().await;
        match reader.read_line(&mut buf).await {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches('\n').trim_end_matches('\r').to_string()),
            Err(_) => None,
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let shell = Shell::new(Arc::new(InMemoryFs::new()), Arc::new(build_registry()));
    let term: Arc<dyn TerminalIo> = Arc::new(StdioTerminal);
    let line_reader: Arc<dyn LineReader> = Arc::new(StdinLineReader::new());

    if let Some(command) = cli.command {
        let mut shell = shell;
        let code = run_line(&mut shell, &command, term.clone(), Some(line_reader)).await;
        std::process::exit(code);
    }

    run_repl(shell, term, line_reader).await;
}

async fn run_line(
    shell: &mut Shell,
    line: &str,
    term: Arc<dyn TerminalIo>,
    line_reader: Option<Arc<dyn LineReader>>,
) -> i32 {
    match shell.run_line(line, term, line_reader).await {
        Ok(code) => code,
        Err(ShellError::Exit(code)) => code,
        Err(_) => 1,
    }
}

async fn run_repl(mut shell: Shell, term: Arc<dyn TerminalIo>, line_reader: Arc<dyn LineReader>) {
    loop {
        let prompt = shell.prompt();
        let Some(line) = line_reader.readline(&prompt).await else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match shell.run_line(&line, term.clone(), Some(line_reader.clone())).await {
            Ok(_) => {}
            Err(ShellError::Exit(code)) => std::process::exit(code),
            Err(err) => term.eprint(&format!("{}\n", err)),
        }
    }
    std::process::exit(shell.last_exit_code);
}
