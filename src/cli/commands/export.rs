use std::path::PathBuf;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::utils::reports_dir_in;
use crate::report::{Report, ReportFormat};

use super::args::ParsedArgs;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "export",
        "Write a report of all entries",
        "export <path> [--csv]",
        cmd_export,
    )]
}

/// Bare file names land in the data directory's `reports/` folder.
fn resolve_target(context: &ShellContext, raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() || path.parent().is_some_and(|p| !p.as_os_str().is_empty()) {
        path
    } else {
        reports_dir_in(context.config_manager.base_dir()).join(path)
    }
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["csv"])?;
    let [raw] = parsed.positional.as_slice() else {
        return Err(CommandError::InvalidArguments(
            "usage: export <path> [--csv]".into(),
        ));
    };
    let path = resolve_target(context, raw);
    let format = if parsed.has("csv") {
        ReportFormat::Csv
    } else {
        ReportFormat::from_path(&path)
    };

    let report = Report::build(
        context.config.report_title.clone(),
        context.store.list(),
        context.money(),
        context.store.today(),
    );
    report.write(&path, format)?;
    output::success(format!(
        "Exported {} entries to {}",
        context.store.len(),
        path.display()
    ));
    Ok(())
}
