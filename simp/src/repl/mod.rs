//! REPL (Read-Eval-Print Loop) for SIMP
//!
//! [`Session`] holds the interpreter state and turns one input line into the
//! text to show; [`Repl`] wraps it in a line editor with history.

use crate::config::Config;
use crate::interp::{Binding, Interpreter, Output, Value};
use crate::parse_source;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

const PROMPT: &str = "simp> ";
const HISTORY_FILE: &str = ".simp_history";

/// Outcome of a `:command`
#[derive(Debug, PartialEq)]
pub enum Reply {
    /// Text to show, possibly empty
    Text(String),
    /// Leave the REPL
    Quit,
}

/// Interpreter state shared by every line of a REPL session
pub struct Session {
    interpreter: Interpreter,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Session {
            interpreter: Interpreter::from_config(config).with_output(Output::buffer()),
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Evaluate one line; returns program output, diagnostics and the echoed
    /// value of a trailing bare expression
    pub fn eval_line(&mut self, line: &str) -> String {
        let program = match parse_source("<repl>", line) {
            Ok(program) => program,
            Err(err) => return format!("{} error: {}\n", err_label(&err), err.message()),
        };

        let echo = program
            .stmts
            .last()
            .is_some_and(|stmt| stmt.node.yields_value());
        let result = self.interpreter.run(&program);
        self.interpreter.take_diagnostics();

        let mut text = self.interpreter.output_mut().take_output();
        match result {
            Ok(Value::Undefined) => {}
            Ok(value) if echo => text.push_str(&format!("{value}\n")),
            Ok(_) => {}
            Err(err) => text.push_str(&format!("Runtime error: {}\n", err.message)),
        }
        text
    }

    /// Handle a line starting with `:`
    pub fn command(&mut self, cmd: &str) -> Reply {
        match cmd {
            ":quit" | ":q" | ":exit" => Reply::Quit,
            ":help" | ":h" | ":?" => Reply::Text(help_text()),
            ":clear" => Reply::Text("\x1B[2J\x1B[1;1H".to_string()),
            ":reset" => {
                self.interpreter.reset();
                Reply::Text("State cleared.\n".to_string())
            }
            ":env" => Reply::Text(self.describe_env()),
            ":funcs" => Reply::Text(self.describe_functions()),
            _ => Reply::Text(format!("Unknown command: {cmd}\nType :help for help.\n")),
        }
    }

    fn describe_env(&self) -> String {
        let mut text = String::new();
        for (name, binding) in self.interpreter.env().bindings() {
            let line = match binding {
                Binding::Scalar(t) => format!("{name} = {} (c1={}, c2={})\n", t.value, t.reads, t.writes),
                Binding::Array(items) => {
                    let reads: Vec<String> = items.iter().map(|t| t.reads.to_string()).collect();
                    let writes: Vec<String> = items.iter().map(|t| t.writes.to_string()).collect();
                    format!(
                        "{name} = {} (c1=[{}], c2=[{}])\n",
                        binding.value(),
                        reads.join(", "),
                        writes.join(", ")
                    )
                }
            };
            text.push_str(&line);
        }
        if text.is_empty() {
            text.push_str("(no variables)\n");
        }
        text
    }

    fn describe_functions(&self) -> String {
        let mut text = String::new();
        for function in self.interpreter.functions().functions() {
            let ret = function
                .ret
                .map_or_else(|| "void".to_string(), |tag| tag.to_string());
            text.push_str(&format!("{ret} {}({})\n", function.name, function.params.join(", ")));
        }
        if text.is_empty() {
            text.push_str("(no functions)\n");
        }
        text
    }
}

fn err_label(err: &crate::CompileError) -> &'static str {
    match err {
        crate::CompileError::Lexer { .. } => "Lexer",
        _ => "Parse",
    }
}

fn help_text() -> String {
    [
        "SIMP REPL Commands:",
        "  :help, :h, :?   Show this help",
        "  :quit, :q       Exit the REPL",
        "  :clear          Clear the screen",
        "  :reset          Forget all variables and functions",
        "  :env            List variables with their c1/c2 counters",
        "  :funcs          List declared functions",
        "",
        "You can enter:",
        "  - Assignments: num x = 5;  a = [1, 2, 3];",
        "  - Expressions: x * 2;  a[1];  x.c1;",
        "  - Functions: num sq(n) { return n * n; }  then  sq(4);",
        "",
    ]
    .join("\n")
}

/// Interactive REPL
pub struct Repl {
    editor: DefaultEditor,
    session: Session,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL
    pub fn new(config: &Config) -> RlResult<Self> {
        let editor = DefaultEditor::new()?;
        let history_path = dirs_home().map(|h| h.join(HISTORY_FILE));

        let mut repl = Repl {
            editor,
            session: Session::new(config),
            history_path,
        };

        if let Some(ref path) = repl.history_path {
            let _ = repl.editor.load_history(path);
        }

        Ok(repl)
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("SIMP REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.\n");

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(line);

                    if line.starts_with(':') {
                        match self.session.command(line) {
                            Reply::Quit => {
                                println!("Goodbye!");
                                break;
                            }
                            Reply::Text(text) => print!("{text}"),
                        }
                        continue;
                    }

                    print!("{}", self.session.eval_line(line));
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
