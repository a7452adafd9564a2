use serde_json::Value;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::domain::{CalculationAttributes, Displayable, ResultHistory};

use super::{required, split_action};

const ACTIONS: &[&str] = &["list", "add", "show", "update", "remove", "clear"];
const USAGE: &str = "history <list|add|show|update|remove|clear>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "history",
        "Record and browse saved calculation results",
        USAGE,
        cmd_history,
    )
    .with_actions(ACTIONS)]
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    match action.as_str() {
        "list" => handle_list(context, rest),
        "add" => handle_add(context, rest),
        "show" => {
            let id = required(rest, 0, "history show <id>")?;
            let entry = context.history.find_by_id(id)?;
            print_entry(&entry);
            Ok(())
        }
        "update" => handle_update(context, rest),
        "remove" => {
            let id = required(rest, 0, "history remove <id>")?;
            context.history.delete(id)?;
            output::success(format!("Result `{id}` removed."));
            Ok(())
        }
        "clear" => {
            let username = context.require_user()?;
            if !context.confirm(&format!("Remove every saved result for `{username}`?"))? {
                output::info("History kept.");
                return Ok(());
            }
            let removed = context.history.delete_all_for_user(&username)?;
            output::success(format!("Removed {removed} saved results."));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown history subcommand `{}`",
            other
        ))),
    }
}

fn handle_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let entries = if args.first() == Some(&"--all") {
        context.history.find_all()?
    } else {
        let username = context.require_user()?;
        context.history.find_all_by_username(&username)?
    };
    if entries.is_empty() {
        output::info("No saved results.");
        return Ok(());
    }
    output::section("Saved results");
    for entry in &entries {
        output::line(entry.display_label());
    }
    Ok(())
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "history add <title> <key=value>...";
    let username = context.require_user()?;
    let title = required(args, 0, usage)?;
    let attributes = parse_attributes(&args[1..])?;
    let entry = context.history.record(&username, Some(title), attributes)?;
    output::success(format!("Result saved with id {}", entry.id));
    Ok(())
}

fn handle_update(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "history update <id> <key=value>...";
    let username = context.require_user()?;
    let id = required(args, 0, usage)?;
    let attributes = parse_attributes(&args[1..])?;
    let mut replacement = ResultHistory::new(username, attributes);
    replacement.id = id.to_string();
    let saved = context.history.update(id, replacement)?;
    output::success(format!("Result `{}` updated.", saved.id));
    Ok(())
}

fn print_entry(entry: &ResultHistory) {
    output::section(entry.display_label());
    output::line(format!("id: {}", entry.id));
    output::line(format!("user: {}", entry.username));
    output::line(format!("saved: {}", entry.entry_date.format("%Y-%m-%d %H:%M:%S UTC")));
    for (key, value) in &entry.calculation_attributes {
        output::line(format!("{key} = {value}"));
    }
}

/// Parses `key=value` pairs; values that read as JSON keep their type.
pub(crate) fn parse_attributes(pairs: &[&str]) -> Result<CalculationAttributes, CommandError> {
    let mut attributes = CalculationAttributes::new();
    for pair in pairs {
        let (key, raw) = pair.split_once('=').ok_or_else(|| {
            CommandError::InvalidArguments(format!("expected key=value, got `{pair}`"))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(CommandError::InvalidArguments(format!(
                "missing attribute name in `{pair}`"
            )));
        }
        let value = serde_json::from_str::<Value>(raw)
            .unwrap_or_else(|_| Value::String(raw.to_string()));
        attributes.insert(key.to_string(), value);
    }
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_keep_numbers_and_fall_back_to_strings() {
        let attrs = parse_attributes(&["radius=2.5", "unit=cm", "exact=true"]).unwrap();
        assert_eq!(attrs["radius"], Value::from(2.5));
        assert_eq!(attrs["unit"], Value::from("cm"));
        assert_eq!(attrs["exact"], Value::from(true));
    }

    #[test]
    fn attributes_without_separator_are_rejected() {
        let err = parse_attributes(&["radius"]).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
        assert!(parse_attributes(&["=3"]).is_err());
    }
}
