//! Shell runtime state, command errors and dispatch.

use std::{io, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use thiserror::Error;

use crate::{
    cli::{commands, io as cli_io, output, registry::CommandRegistry},
    config::{Config, ConfigManager},
    core::{
        errors::ConverterError,
        services::{FavoritesService, FormulaService, ResultHistoryService, UserService},
    },
    domain::default_catalog,
    storage::{FormulaCatalog, JsonStorage},
};

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ConverterError),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("No user selected. Use `user select <username>` first.")]
    NoActiveUser,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] ConverterError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub storage: Arc<JsonStorage>,
    pub users: UserService,
    pub formulas: FormulaService,
    pub favorites: FavoritesService,
    pub history: ResultHistoryService,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub theme: ColorfulTheme,
    pub active_user: Option<String>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        crate::init_with_filter(&config.log_filter);
        output::set_color_enabled(config.ui_color_enabled && mode == CliMode::Interactive);

        let data_root = config.resolve_data_root(config_manager.base_dir());
        let storage = Arc::new(JsonStorage::new(data_root)?);
        if config.seed_default_catalog && storage.all_formulas()?.is_empty() {
            storage.seed_formulas(default_catalog())?;
        }

        let mut registry = CommandRegistry::new();
        for entry in commands::all_definitions() {
            registry.register(entry);
        }

        let users = UserService::new(storage.clone());
        let active_user = config
            .last_active_user
            .clone()
            .filter(|name| users.find(name).is_ok());

        Ok(Self {
            mode,
            registry,
            users,
            formulas: FormulaService::new(storage.clone()),
            favorites: FavoritesService::new(storage.clone(), storage.clone()),
            history: ResultHistoryService::new(storage.clone()),
            storage,
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            active_user,
            last_command: None,
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        match &self.active_user {
            Some(user) => format!("converter[{user}]> "),
            None => "converter> ".to_string(),
        }
    }

    /// Catalog ids for completion; a catalog that cannot be read offers none.
    pub(crate) fn formula_names(&self) -> Vec<String> {
        match self.formulas.all() {
            Ok(formulas) => formulas
                .iter()
                .map(|formula| formula.formula_name().to_string())
                .collect(),
            Err(err) => {
                tracing::warn!(error = %err, "formula names unavailable for completion");
                Vec::new()
            }
        }
    }

    pub(crate) fn require_user(&self) -> Result<String, CommandError> {
        self.active_user.clone().ok_or(CommandError::NoActiveUser)
    }

    /// Makes `username` the active user and remembers it across sessions.
    pub(crate) fn set_active_user(&mut self, username: Option<String>) -> CommandResult {
        self.active_user = username.clone();
        self.config.last_active_user = username;
        self.persist_config()
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager
            .save(&self.config)
            .map_err(CommandError::from)
    }

    /// Asks before destructive actions; script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.closest(input) {
            output::hint(format!("Did you mean `{}`?", best));
        }
    }

    /// A prompt that cannot be shown counts as consent to leave.
    pub(crate) fn confirm_exit(&self) -> bool {
        self.confirm("Exit shell?").unwrap_or(true)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(&message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::NoActiveUser => {
                output::error("No user selected.");
                output::hint("Try `user register <username> <email>` or `user select <username>`.");
                Ok(())
            }
            CommandError::Core(ConverterError::UserNotFound(name)) => {
                output::error(format!("User not found: {name}"));
                output::hint("`user list` shows registered users.");
                Ok(())
            }
            CommandError::Core(ConverterError::FormulaNotFound(name)) => {
                output::error(format!("Formula not found: {name}"));
                output::hint("`formula list` shows the catalog.");
                Ok(())
            }
            other => {
                output::error(other.to_string());
                Ok(())
            }
        }
    }
}
