pub mod favorites;
pub mod formula;
pub mod history;
pub mod system;
pub mod user;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut entries = Vec::new();
    entries.extend(user::definitions());
    entries.extend(formula::definitions());
    entries.extend(favorites::definitions());
    entries.extend(history::definitions());
    entries.extend(system::definitions());
    entries
}

/// Splits `args` into a lowercase action and its remaining arguments.
pub(crate) fn split_action<'a, 'b>(
    args: &'b [&'a str],
    usage: &str,
) -> Result<(String, &'b [&'a str]), CommandError> {
    match args.split_first() {
        Some((action, rest)) => Ok((action.to_lowercase(), rest)),
        None => Err(CommandError::InvalidArguments(format!("usage: {usage}"))),
    }
}

/// Returns the argument at `index` or a usage error.
pub(crate) fn required<'a>(
    args: &[&'a str],
    index: usize,
    usage: &str,
) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {usage}")))
}
