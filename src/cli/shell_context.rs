use dialoguer::theme::ColorfulTheme;

use crate::config::{Config, ConfigManager};
use crate::core::services::EntryFilter;
use crate::core::EntryStore;

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Everything one shell session owns: the store, the view filter and preferences.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub store: EntryStore,
    pub filter: EntryFilter,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub running: bool,
}

impl ShellContext {
    pub fn status(&self) -> String {
        format!(
            "ShellContext {{ running: {}, entries: {}, month: {}, search: {:?} }}",
            self.running,
            self.store.len(),
            self.filter.month,
            self.filter.search
        )
    }
}
