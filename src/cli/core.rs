//! Core CLI loop, dispatch, and shell context helpers.

use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;
use tracing::{debug, warn};

use crate::config::{ConfigError, ConfigManager};
use crate::core::clock::{Clock, SystemClock};
use crate::core::services::{EntryFilter, FilterService};
use crate::core::EntryStore;
use crate::currency::MoneyFormat;
use crate::domain::Entry;
use crate::errors::StoreError;
use crate::report::ReportError;
use crate::storage::JsonStorage;

pub use crate::errors::CliError;

use super::commands;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    /// Opens the session against the default data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        Self::open(mode, config_manager, Box::new(SystemClock))
    }

    /// Loads preferences from `config_manager` and the entry slot they name.
    pub fn open(
        mode: CliMode,
        config_manager: ConfigManager,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = match config_manager.load() {
            Ok(config) => config,
            Err(ConfigError::Serde(message)) => {
                output::warning(format!(
                    "Ignoring unreadable preferences at {}: {}",
                    config_manager.path().display(),
                    message
                ));
                Default::default()
            }
            Err(err) => return Err(err.into()),
        };
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled,
        });

        let storage = JsonStorage::new(
            Some(config_manager.base_dir().to_path_buf()),
            &config.storage_key,
        )
        .map_err(StoreError::from)?;
        debug!(slot = %storage.slot_path().display(), "opening entry slot");
        let store = EntryStore::open(Box::new(storage), clock);
        if let Some(reason) = store.load_error() {
            output::warning(format!(
                "Stored entries could not be read ({reason}). Changes in this session will not be saved."
            ));
        }

        Ok(ShellContext {
            mode,
            registry,
            store,
            filter: EntryFilter::default(),
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            running: true,
        })
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        if self.filter.is_identity() {
            return "home_book> ".into();
        }
        let mut parts = Vec::new();
        if !self.filter.month.is_all() {
            parts.push(self.filter.month.to_string());
        }
        if !self.filter.search.is_empty() {
            parts.push(format!("\"{}\"", self.filter.search));
        }
        format!("home_book [{}]> ", parts.join(" "))
    }

    pub(crate) fn money(&self) -> MoneyFormat {
        self.config.money_format()
    }

    /// Entries passing the session's month and search filter.
    pub(crate) fn visible_entries(&self) -> Vec<&Entry> {
        FilterService::filter(self.store.list(), &self.filter)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        output::set_preferences(OutputPreferences {
            color_enabled: self.config.ui_color_enabled,
        });
        Ok(())
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

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        self.confirm("Exit shell?", false)
            .map_err(|err| CliError::Input(err.to_string()))
    }

    /// Yes/no question in interactive mode. Script mode never blocks and answers yes.
    pub(crate) fn confirm(&self, prompt: &str, default: bool) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Store(err) if err.is_persistence() => {
                warn!(%err, "change kept in memory only");
                self.print_warning(&format!("Change applied but not saved: {}", err));
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        output::error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        output::warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        output::hint(message);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Export failed: {0}")]
    Report(#[from] ReportError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<crate::errors::ValidationError> for CommandError {
    fn from(err: crate::errors::ValidationError) -> Self {
        CommandError::InvalidArguments(err.to_string())
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Io(err) => CliError::Io(err),
            CommandError::Store(err) => CliError::Store(err),
            CommandError::Config(err) => CliError::Config(err),
            other => CliError::Input(other.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    context: &mut ShellContext,
    lines: &[&str],
) -> Result<LoopControl, CliError> {
    for line in lines {
        if let LoopControl::Exit = context.process_line(line)? {
            return Ok(LoopControl::Exit);
        }
    }
    Ok(LoopControl::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::domain::EntryKind;
    use chrono::NaiveDate;
    use tempfile::{tempdir, TempDir};

    fn script_context() -> (TempDir, ShellContext) {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
        let context = ShellContext::open(CliMode::Script, manager, Box::new(clock)).unwrap();
        (dir, context)
    }

    #[test]
    fn parse_line_handles_quotes() {
        let tokens =
            crate::cli::shell::parse_command_line("add expense 12.5 \"Eating out\"").unwrap();
        assert_eq!(tokens, vec!["add", "expense", "12.5", "Eating out"]);
    }

    #[test]
    fn add_defaults_to_today_and_persists() {
        let (dir, mut context) = script_context();
        process_script(&mut context, &["add income 1000 Salary --desc \"January pay\""]).unwrap();

        let entries = context.store.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, EntryKind::Income);
        assert_eq!(entries[0].date, NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
        assert_eq!(entries[0].description, "January pay");
        assert!(dir.path().join("home_book_entries_v1.json").exists());
    }

    #[test]
    fn rejected_add_is_reported_not_fatal() {
        let (_dir, mut context) = script_context();
        let err = context.process_line("add expense -5 Food").unwrap_err();
        assert!(matches!(err, CommandError::Store(StoreError::Validation(_))));
        assert!(context.report_error(err).is_ok());
        assert!(context.store.is_empty());
    }

    #[test]
    fn edit_by_id_prefix_keeps_position() {
        let (_dir, mut context) = script_context();
        process_script(
            &mut context,
            &[
                "add income 1000 Salary --date 2024-01-05",
                "add expense 300 Food --date 2024-01-10",
            ],
        )
        .unwrap();
        let id = context.store.list()[0].id.clone();
        let line = format!("edit {} --amount 1200 --category Payroll", id.short());
        context.process_line(&line).unwrap();

        let first = &context.store.list()[0];
        assert_eq!(first.id, id);
        assert_eq!(first.amount, 1200.0);
        assert_eq!(first.category, "Payroll");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn delete_and_clear_remove_entries() {
        let (_dir, mut context) = script_context();
        process_script(
            &mut context,
            &["add income 10 A", "add expense 5 B", "add expense 1 C"],
        )
        .unwrap();
        let id = context.store.list()[1].id.to_string();
        context.process_line(&format!("delete {id}")).unwrap();
        assert_eq!(context.store.len(), 2);

        context.process_line("clear --yes").unwrap();
        assert!(context.store.is_empty());
    }

    #[test]
    fn month_and_search_narrow_the_view() {
        let (_dir, mut context) = script_context();
        process_script(
            &mut context,
            &[
                "add income 1000 Salary --date 2024-01-05",
                "add expense 300 Food --date 2024-01-10 --desc market",
                "add expense 200 Food --date 2024-02-01",
                "month 2024-01",
            ],
        )
        .unwrap();
        assert_eq!(context.visible_entries().len(), 2);
        assert_eq!(context.prompt(), "home_book [2024-01]> ");

        context.process_line("search MARKET").unwrap();
        assert_eq!(context.visible_entries().len(), 1);

        process_script(&mut context, &["month all", "search"]).unwrap();
        assert!(context.filter.is_identity());
        assert_eq!(context.visible_entries().len(), 3);
    }

    #[test]
    fn invalid_month_is_rejected() {
        let (_dir, mut context) = script_context();
        let err = context.process_line("month 2024-13").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
        assert!(context.filter.month.is_all());
    }

    #[test]
    fn config_set_is_saved() {
        let (dir, mut context) = script_context();
        context.process_line("config currency usd").unwrap();
        assert_eq!(context.config.currency, "USD");

        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap().currency, "USD");
    }

    #[test]
    fn exit_stops_the_script() {
        let (_dir, mut context) = script_context();
        let control = process_script(&mut context, &["exit", "add income 1 Late"]).unwrap();
        assert_eq!(control, LoopControl::Exit);
        assert!(context.store.is_empty());
    }

    #[test]
    fn unknown_commands_continue() {
        let (_dir, mut context) = script_context();
        let control = context.process_line("lsit").unwrap();
        assert_eq!(control, LoopControl::Continue);
    }
}
