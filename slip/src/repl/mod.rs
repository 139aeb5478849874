//! REPL (Read-Eval-Print Loop) for Slip

use crate::error::report_error;
use crate::interp::{Interpreter, Value};
use crate::lexer::balance;
use crate::parser::read;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

const HISTORY_FILE: &str = ".slip_history";
const SOURCE_NAME: &str = "<repl>";

/// Prompt and history settings
#[derive(Debug, Clone)]
pub struct ReplConfig {
    pub prompt: String,
    /// Shown while a form is still missing closing parentheses
    pub continuation_prompt: String,
    /// `None` disables history persistence
    pub history_path: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "slip> ".to_string(),
            continuation_prompt: "  ... ".to_string(),
            history_path: dirs_home().map(|h| h.join(HISTORY_FILE)),
        }
    }
}

impl ReplConfig {
    pub fn without_history(mut self) -> Self {
        self.history_path = None;
        self
    }
}

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    interpreter: Interpreter,
    config: ReplConfig,
    /// Lines read so far for an unbalanced form
    pending: String,
}

impl Repl {
    /// Create a new REPL
    pub fn new(config: ReplConfig) -> RlResult<Self> {
        let mut editor = DefaultEditor::new()?;
        if let Some(ref path) = config.history_path {
            // Missing history on first run is expected
            let _ = editor.load_history(path);
        }

        Ok(Repl {
            editor,
            interpreter: Interpreter::new(),
            config,
            pending: String::new(),
        })
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("Slip REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.\n");

        loop {
            let prompt = if self.pending.is_empty() {
                self.config.prompt.clone()
            } else {
                self.config.continuation_prompt.clone()
            };

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if self.pending.is_empty() {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        if trimmed.starts_with(':') {
                            let _ = self.editor.add_history_entry(trimmed);
                            if self.handle_command(trimmed) {
                                break;
                            }
                            continue;
                        }
                    }

                    if let Some(input) = self.feed_line(&line) {
                        let _ = self.editor.add_history_entry(input.trim());
                        self.eval_input(&input);
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    self.pending.clear();
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

        if let Some(ref path) = self.config.history_path {
            if let Err(err) = self.editor.save_history(path) {
                tracing::warn!(path = %path.display(), %err, "could not save history");
            }
        }

        Ok(())
    }

    /// Append a line to the pending input; returns the whole input once
    /// its parentheses balance and no reader macro is left dangling
    fn feed_line(&mut self, line: &str) -> Option<String> {
        self.pending.push_str(line);
        self.pending.push('\n');
        let depth = balance(&self.pending);
        if depth > 0 {
            tracing::trace!(depth, "awaiting more input");
            return None;
        }
        if depth == 0 && read(&self.pending).is_err_and(|err| err.is_incomplete()) {
            tracing::trace!("awaiting quoted form");
            return None;
        }
        Some(std::mem::take(&mut self.pending))
    }

    /// Handle REPL commands (starting with :). Returns true to quit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" | ":exit" => {
                println!("Goodbye!");
                true
            }
            ":help" | ":h" | ":?" => {
                self.print_help();
                false
            }
            ":clear" => {
                print!("\x1B[2J\x1B[1;1H");
                false
            }
            ":env" => {
                for (name, value) in self.interpreter.user_bindings() {
                    println!("  {name} = {value}");
                }
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
                false
            }
        }
    }

    /// Print help message
    fn print_help(&self) {
        println!("Slip REPL Commands:");
        println!("  :help, :h, :?   Show this help");
        println!("  :quit, :q       Exit the REPL");
        println!("  :clear          Clear the screen");
        println!("  :env            List your top-level definitions");
        println!();
        println!("You can enter:");
        println!("  - Expressions:  (+ 1 2), (if (< 1 2) \"yes\" \"no\")");
        println!("  - Definitions:  (def x 10), (def (square n) (* n n))");
        println!("  - Closures:     (def (adder n) (fn (x) (+ x n)))");
        println!();
        println!("Forms may span several lines; input is evaluated once");
        println!("every opening parenthesis is closed.");
    }

    /// Evaluate every form in `input`, echoing non-nil results.
    ///
    /// Stops at the first error; definitions made before it are kept.
    fn eval_input(&self, input: &str) -> bool {
        let forms = match read(input) {
            Ok(forms) => forms,
            Err(err) => {
                report_error(SOURCE_NAME, input, &err);
                return false;
            }
        };

        tracing::debug!(forms = forms.len(), "evaluating repl input");
        for form in &forms {
            match self.interpreter.eval(form) {
                Ok(Value::Nil) => {}
                Ok(value) => println!("{value}"),
                Err(err) => {
                    report_error(SOURCE_NAME, input, &err.into());
                    return false;
                }
            }
        }
        true
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

#[cfg(test)]
mod tests {
    use super::*;

    fn repl() -> Repl {
        Repl::new(ReplConfig::default().without_history()).expect("editor")
    }

    #[test]
    fn test_config_defaults() {
        let config = ReplConfig::default();
        assert_eq!(config.prompt, "slip> ");
        assert_eq!(config.continuation_prompt, "  ... ");
        if let Some(path) = config.history_path {
            assert!(path.ends_with(HISTORY_FILE));
        }
        assert!(ReplConfig::default().without_history().history_path.is_none());
    }

    #[test]
    fn test_handle_command_quit_variants() {
        let mut repl = repl();
        assert!(repl.handle_command(":quit"));
        assert!(repl.handle_command(":q"));
        assert!(repl.handle_command(":exit"));
    }

    #[test]
    fn test_handle_command_non_quitting() {
        let mut repl = repl();
        assert!(!repl.handle_command(":help"));
        assert!(!repl.handle_command(":env"));
        assert!(!repl.handle_command(":bogus"));
    }

    #[test]
    fn test_feed_line_waits_for_balance() {
        let mut repl = repl();
        assert_eq!(repl.feed_line("(def (sq n)"), None);
        assert_eq!(repl.feed_line("  (* n n))"), Some("(def (sq n)\n  (* n n))\n".to_string()));
        assert!(repl.pending.is_empty());
    }

    #[test]
    fn test_feed_line_waits_for_quoted_form() {
        let mut repl = repl();
        assert_eq!(repl.feed_line("(def xs '"), None);
        assert_eq!(repl.feed_line("'"), None);
        assert_eq!(repl.feed_line("(1 2))"), Some("(def xs '\n'\n(1 2))\n".to_string()));
        assert_eq!(repl.feed_line("'"), None);
        assert_eq!(repl.feed_line("x"), Some("'\nx\n".to_string()));
    }

    #[test]
    fn test_feed_line_passes_reader_errors_through() {
        let mut repl = repl();
        assert_eq!(repl.feed_line(")"), Some(")\n".to_string()));
        assert_eq!(repl.feed_line("\"open"), Some("\"open\n".to_string()));
    }

    #[test]
    fn test_feed_line_ignores_parens_in_strings() {
        let mut repl = repl();
        assert!(repl.feed_line(r#"(print "(")"#).is_some());
    }

    #[test]
    fn test_eval_input_keeps_state() {
        let repl = repl();
        assert!(repl.eval_input("(def x 41)"));
        assert!(repl.eval_input("(int+ x 1)"));
        assert_eq!(repl.interpreter.eval_source("x").unwrap(), Value::Int(41));
    }

    #[test]
    fn test_eval_input_error_keeps_earlier_definitions() {
        let repl = repl();
        assert!(!repl.eval_input("(def a 1) (undefined-fn) (def b 2)"));
        assert!(repl.interpreter.global_env().borrow().contains("a"));
        assert!(!repl.interpreter.global_env().borrow().contains("b"));
        assert!(repl.eval_input("a"));
    }

    #[test]
    fn test_eval_input_reader_error() {
        let repl = repl();
        assert!(!repl.eval_input("(1 2"));
        assert!(!repl.eval_input(")"));
    }
}
