//! Line-oriented front end: a rustyline editor for people and a stdin
//! reader for scripts, both feeding the same command dispatch.

use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    history::DefaultHistory,
    Cmd, Context as ReadlineContext, Editor, Helper, Highlighter, Hinter, KeyEvent, Validator,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;

pub const SCRIPT_ENV: &str = "CONVERTER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor: Editor<ShellCompleter, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(ShellCompleter::from_context(context)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::info("Type `help` to list commands, `?` or Tab to complete.");

    while context.running {
        let line = match editor.readline(&context.prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) if context.confirm_exit() => break,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        };
        if !line.trim().is_empty() {
            editor.add_history_entry(line.trim())?;
        }

        let outcome = execute(context, &line);
        // Catalog edits (seed, import, delete) change what completes next.
        if let Some(helper) = editor.helper_mut() {
            helper.formulas = context.formula_names();
        }
        match outcome {
            Ok(LoopControl::Exit) => break,
            Ok(LoopControl::Continue) => {}
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

/// Runs stdin line by line; a failing command is reported and the next one runs.
fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for (index, line) in io::stdin().lock().lines().enumerate() {
        let line = line?;
        match execute(context, &line) {
            Ok(LoopControl::Exit) => break,
            Ok(LoopControl::Continue) => {}
            Err(err) => {
                tracing::debug!(line = index + 1, error = %err, "script command failed");
                context.report_error(err)?;
            }
        }
    }
    Ok(())
}

/// Tokenises one input line and dispatches it. Blank lines and `#` comments
/// are skipped.
fn execute(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(format!("Could not parse `{line}`: {err}"));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.to_string());

    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Whether the arguments after `command action` are formula names.
fn takes_formula(command: &str, action: &str) -> bool {
    matches!(
        (command, action),
        ("fav", "add" | "remove" | "reorder") | ("formula", "show" | "delete")
    )
}

/// Completes command names, their sub-actions and formula names.
#[derive(Helper, Highlighter, Hinter, Validator)]
struct ShellCompleter {
    commands: Vec<(&'static str, &'static [&'static str])>,
    formulas: Vec<String>,
}

impl ShellCompleter {
    fn from_context(context: &ShellContext) -> Self {
        Self {
            commands: context
                .registry
                .list()
                .into_iter()
                .map(|entry| (entry.name, entry.actions))
                .collect(),
            formulas: context.formula_names(),
        }
    }

    /// Candidates for `partial`, given the complete words typed before it.
    fn candidates(&self, words: &[&str], partial: &str) -> Vec<String> {
        let partial_lower = partial.to_lowercase();
        match words {
            [] => self
                .commands
                .iter()
                .map(|(name, _)| *name)
                .filter(|name| name.starts_with(&partial_lower))
                .map(str::to_string)
                .collect(),
            [command] => {
                let command = command.to_lowercase();
                self.commands
                    .iter()
                    .filter(|(name, _)| *name == command)
                    .flat_map(|(_, actions)| actions.iter())
                    .filter(|action| action.starts_with(&partial_lower))
                    .map(|action| action.to_string())
                    .collect()
            }
            [command, action, ..]
                if takes_formula(&command.to_lowercase(), &action.to_lowercase()) =>
            {
                self.formulas
                    .iter()
                    .filter(|name| name.starts_with(partial))
                    .cloned()
                    .collect()
            }
            _ => Vec::new(),
        }
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let mut words: Vec<&str> = before.split_whitespace().collect();
        let partial = if before.ends_with(char::is_whitespace) {
            ""
        } else {
            words.pop().unwrap_or("")
        };
        let candidates = self
            .candidates(&words, partial)
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((pos - partial.len(), candidates))
    }
}
