use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::CONFIG_KEYS;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences",
        "config [key [value]]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => show_config(context),
        [key] => {
            let value = context.config.get(key)?;
            output::block(format!("{key} = {value}"));
            Ok(())
        }
        [key, value @ ..] => set_config_value(context, key, &value.join(" ")),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output::section("Preferences");
    for key in CONFIG_KEYS {
        let value = context.config.get(key)?;
        output::block(format!("  {:<18} {}", key, value));
    }
    output::info(format!(
        "Stored at {}",
        context.config_manager.path().display()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let previous = context.config.clone();
    context.config.set(key, value)?;
    if let Err(err) = context.persist_config() {
        context.config = previous;
        return Err(err);
    }
    if key == "storage_key" {
        output::warning("The new storage key takes effect the next time the shell starts.");
    }
    let shown = context.config.get(key)?;
    output::success(format!("{key} set to {shown}"));
    Ok(())
}
