mod ast;
mod config;
mod env;
mod error;
mod eval;
mod highlighter;
mod lexer;
mod parser;
mod token;
mod value;

use clap::Parser;
use config::{HELP_TEXT, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use env::Environment;
use eval::eval;
use highlighter::LanguageHelper;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use std::path::PathBuf;

/// A tree-walking interpreter for a small, C-like scripting language
#[derive(Parser, Debug)]
#[command(name = "scriptlang")]
#[command(version = config::VERSION)]
#[command(about = "A tree-walking interpreter for a small, C-like scripting language")]
struct CliArgs {
    /// Script file to execute (optional — if absent, starts the REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let env = Environment::new();

    if let Some(script_path) = args.script {
        return run_script(&script_path, env);
    }

    run_repl(env)
}

fn run_repl(env: std::rc::Rc<Environment>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl =
        Editor::with_config(config).map_err(|e| format!("failed to initialize REPL: {}", e))?;

    rl.set_helper(Some(LanguageHelper::new()));

    let history_file = ".scriptlang_history";
    let _ = rl.load_history(history_file);

    println!("{}", WELCOME_MESSAGE);
    println!("{}", WELCOME_SUBTITLE);

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                match line.trim() {
                    "quit" | "exit" => {
                        println!("Goodbye!");
                        break;
                    }
                    "clear" => {
                        print!("\x1B[2J\x1B[H");
                        continue;
                    }
                    "help" => {
                        println!("{}", HELP_TEXT);
                        continue;
                    }
                    _ => {}
                }

                let (program, errors) = parser::parse(&line);
                if !errors.is_empty() {
                    for err in &errors {
                        eprintln!("parse error: {}", err);
                    }
                    continue;
                }

                match eval(&program, env.clone()) {
                    Ok(value) => {
                        if !matches!(value, value::Value::Null) {
                            println!("{}", value);
                        }
                    }
                    Err(e) => eprintln!("error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);
    Ok(())
}

/// Executes a whole file as a single program. Scripts don't echo a trailing
/// value the way the REPL does; a runtime error is reported to stderr.
fn run_script(
    path: &PathBuf,
    env: std::rc::Rc<Environment>,
) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read script file {}: {}", path.display(), e))?;

    let (program, errors) = parser::parse(&contents);
    if !errors.is_empty() {
        for err in &errors {
            eprintln!("parse error: {}", err);
        }
        return Err("parsing failed".into());
    }

    match eval(&program, env)? {
        value::Value::Error(msg) => Err(format!("runtime error: {}", msg).into()),
        _ => Ok(()),
    }
}
