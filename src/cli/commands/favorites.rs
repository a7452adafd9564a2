use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::domain::SiteUser;

use super::{formula::describe, required, split_action};

const ACTIONS: &[&str] = &["list", "add", "remove", "reorder", "clear"];
const USAGE: &str = "fav <list|add|remove|reorder|clear>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "fav",
        "Manage the active user's ordered favorites",
        USAGE,
        cmd_favorites,
    )
    .with_actions(ACTIONS)]
}

fn cmd_favorites(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    let username = context.require_user()?;
    match action.as_str() {
        "list" => {
            let favorites = context.favorites.favorites(&username)?;
            if favorites.is_empty() {
                output::info("No favorites yet. Add one with `fav add <formula>`.");
                return Ok(());
            }
            output::section(format!("Favorites for {username}"));
            for (index, formula) in favorites.iter().enumerate() {
                output::line(format!("{:>2}. {}", index + 1, describe(formula)));
            }
            Ok(())
        }
        "add" => {
            let formula = required(rest, 0, "fav add <formula>")?;
            let user = context.favorites.add_favorite(&username, formula)?;
            report(&user, format!("`{formula}` is in favorites."));
            Ok(())
        }
        "remove" => {
            let formula = required(rest, 0, "fav remove <formula>")?;
            let user = context.favorites.remove_favorite(&username, formula)?;
            report(&user, format!("`{formula}` is not in favorites."));
            Ok(())
        }
        "reorder" => {
            if rest.is_empty() {
                return Err(CommandError::InvalidArguments(
                    "usage: fav reorder <formula> [formula...]".into(),
                ));
            }
            let user = context.favorites.reorder_favorites(&username, rest)?;
            report(&user, "Favorites reordered.".to_string());
            Ok(())
        }
        "clear" => {
            if !context.confirm(&format!("Remove all favorites for `{username}`?"))? {
                output::info("Favorites kept.");
                return Ok(());
            }
            let user = context.favorites.clear_favorites(&username)?;
            report(&user, "Favorites cleared.".to_string());
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown fav subcommand `{}`",
            other
        ))),
    }
}

fn report(user: &SiteUser, message: String) {
    output::success(message);
    let ids = user.favorites().ids();
    if ids.is_empty() {
        output::line("favorites: (none)");
    } else {
        output::line(format!("favorites: {}", ids.join(", ")));
    }
}
