// ABOUTME: Configuration and constants for the interpreter CLI/REPL

pub const VERSION: &str = "0.1.0";
pub const WELCOME_MESSAGE: &str = "scriptlang v0.1.0";
pub const WELCOME_SUBTITLE: &str = "A small C-like expression-oriented scripting language";

pub const HELP_TEXT: &str = r#"
Available commands:
  quit or exit   - Exit the REPL
  clear          - Clear the screen

Type any expression to evaluate it. Use Ctrl-D, quit, or exit to leave.
"#;
