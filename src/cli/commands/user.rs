use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::domain::Displayable;

use super::{required, split_action};

const ACTIONS: &[&str] = &["register", "select", "show", "list", "delete", "check", "logout"];
const USAGE: &str = "user <register|select|show|list|delete|check|logout>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "user",
        "Register, select and inspect user accounts",
        USAGE,
        cmd_user,
    )
    .with_actions(ACTIONS)]
}

fn cmd_user(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    match action.as_str() {
        "register" => handle_register(context, rest),
        "select" => handle_select(context, rest),
        "show" => handle_show(context, rest),
        "list" => handle_list(context),
        "delete" => handle_delete(context, rest),
        "check" => handle_check(context, rest),
        "logout" => {
            context.set_active_user(None)?;
            output::info("No user selected.");
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown user subcommand `{}`",
            other
        ))),
    }
}

fn handle_register(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "user register <username> <email>";
    let username = required(args, 0, usage)?;
    let email = required(args, 1, usage)?;
    let user = context.users.register(username, email)?;
    output::success(format!("User `{}` registered.", user.username()));
    context.set_active_user(Some(user.username().to_string()))
}

fn handle_select(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let username = required(args, 0, "user select <username>")?;
    let user = context.users.find(username)?;
    context.set_active_user(Some(user.username().to_string()))?;
    output::success(format!("Active user: {}", user.display_label()));
    Ok(())
}

fn handle_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let username = match args.first() {
        Some(name) => name.to_string(),
        None => context.require_user()?,
    };
    let user = context.users.find(&username)?;
    output::section(user.display_label());
    let roles: Vec<String> = user.roles().iter().map(ToString::to_string).collect();
    output::line(format!("roles: {}", roles.join(", ")));
    output::line(format!("favorites: {}", user.favorites().len()));
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let users = context.users.list()?;
    if users.is_empty() {
        output::info("No users registered.");
        return Ok(());
    }
    output::section("Users");
    for summary in users {
        output::line(format!("{} <{}>", summary.username, summary.email));
    }
    Ok(())
}

fn handle_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let username = match args.first() {
        Some(name) => name.to_string(),
        None => context.require_user()?,
    };
    if !context.confirm(&format!("Delete user `{}` and their favorites?", username))? {
        output::info("Deletion cancelled.");
        return Ok(());
    }
    if context.users.delete(&username)? {
        output::success(format!("User `{}` deleted.", username));
    } else {
        output::info(format!("User `{}` did not exist.", username));
    }
    if context.active_user.as_deref() == Some(username.as_str()) {
        context.set_active_user(None)?;
    }
    Ok(())
}

fn handle_check(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let value = required(args, 0, "user check <username|email>")?;
    let (kind, available) = if value.contains('@') {
        ("Email", context.users.email_available(value)?)
    } else {
        ("Username", context.users.username_available(value)?)
    };
    if available {
        output::success(format!("{kind} `{value}` is available."));
    } else {
        output::warning(format!("{kind} `{value}` is taken."));
    }
    Ok(())
}
