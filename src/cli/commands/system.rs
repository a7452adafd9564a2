use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::Config;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("version", "Show build information", "version", cmd_version),
        CommandEntry::new(
            "config",
            "Show or change preferences",
            "config [show|set <key> <value>]",
            cmd_config,
        )
        .with_actions(&["show", "set"]),
        CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let Some(entry) = context.registry.get(name) else {
            context.suggest_command(name);
            return Ok(());
        };
        output::section(entry.name);
        output::line(entry.description);
        output::line(format!("usage: {}", entry.usage));
        return Ok(());
    }

    output::section("Commands");
    for entry in context.registry.list() {
        output::line(format!("{:<10} {}", entry.name, entry.description));
    }
    output::hint("`help <command>` shows usage for one command.");
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info(build_info::current().describe());
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|action| action.to_lowercase()).as_deref() {
        None | Some("show") => {
            let config = &context.config;
            output::section("Configuration");
            output::line(format!("config file: {}", context.config_manager.path().display()));
            output::line(format!(
                "data_root: {}",
                config
                    .resolve_data_root(context.config_manager.base_dir())
                    .display()
            ));
            output::line(format!("log_filter: {}", config.log_filter));
            output::line(format!("seed_default_catalog: {}", config.seed_default_catalog));
            output::line(format!("ui_color_enabled: {}", config.ui_color_enabled));
            Ok(())
        }
        Some("set") => {
            let (Some(key), Some(value)) = (args.get(1), args.get(2)) else {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <key> <value> (keys: {})",
                    Config::KEYS.join(", ")
                )));
            };
            context.config.set_value(key, value)?;
            context.persist_config()?;
            output::success(format!("{key} updated."));
            if *key == "data_root" {
                output::hint("The new data directory is used from the next session.");
            }
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{}`",
            other
        ))),
    }
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
