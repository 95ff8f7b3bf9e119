use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::domain::entry::{parse_amount, parse_date, DATE_FORMAT};
use crate::domain::{Displayable, EntryDraft, EntryKind};

use super::args::ParsedArgs;
use super::views::render_entries;

const EDIT_FLAGS: &[&str] = &["type", "amount", "category", "date", "desc"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record an income or expense",
            "add <income|expense> <amount> <category> [--date YYYY-MM-DD] [--desc text]",
            cmd_add,
        ),
        CommandEntry::new(
            "edit",
            "Change fields of an existing entry",
            "edit <id> [--type t] [--amount n] [--category c] [--date d] [--desc text]",
            cmd_edit,
        ),
        CommandEntry::new("delete", "Remove one entry", "delete <id>", cmd_delete),
        CommandEntry::new(
            "clear",
            "Remove every entry",
            "clear [--yes]",
            cmd_clear,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["date", "desc"], &[])?;
    if parsed.positional.len() < 3 {
        return Err(CommandError::InvalidArguments(
            "usage: add <income|expense> <amount> <category> [--date YYYY-MM-DD] [--desc text]"
                .into(),
        ));
    }
    let kind: EntryKind = parsed.positional[0].parse()?;
    let amount = parse_amount(&parsed.positional[1])?;
    let date = match parsed.option("date") {
        Some(raw) => parse_date(raw)?,
        None => context.store.today(),
    };
    let mut draft = EntryDraft::new(kind, amount, parsed.rest(2), date);
    if let Some(description) = parsed.option("desc") {
        draft = draft.with_description(description);
    }

    let entry = context.store.add(draft)?;
    output::success(format!(
        "Added {} {} ({}) on {} [{}]",
        entry.kind,
        context.money().format(entry.amount),
        entry.category,
        entry.date.format(DATE_FORMAT),
        entry.id.short()
    ));
    render_entries(context);
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, EDIT_FLAGS, &[])?;
    let [reference] = parsed.positional.as_slice() else {
        return Err(CommandError::InvalidArguments(
            "usage: edit <id> [--type t] [--amount n] [--category c] [--date d] [--desc text]"
                .into(),
        ));
    };
    if EDIT_FLAGS.iter().all(|flag| parsed.option(flag).is_none()) {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass at least one of --type, --amount, --category, --date, --desc"
                .into(),
        ));
    }

    let current = context.store.resolve(reference)?;
    let id = current.id.clone();
    let mut draft = EntryDraft::from_entry(current);
    if let Some(raw) = parsed.option("type") {
        draft.kind = raw.parse()?;
    }
    if let Some(raw) = parsed.option("amount") {
        draft.amount = parse_amount(raw)?;
    }
    if let Some(raw) = parsed.option("category") {
        draft.category = raw.to_string();
    }
    if let Some(raw) = parsed.option("date") {
        draft.date = parse_date(raw)?;
    }
    if let Some(raw) = parsed.option("desc") {
        draft.description = raw.to_string();
    }

    let entry = context.store.update(&id, draft)?;
    output::success(format!("Updated entry [{}]", entry.id.short()));
    render_entries(context);
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [reference] = args else {
        return Err(CommandError::InvalidArguments("usage: delete <id>".into()));
    };
    let id = context.store.resolve(reference)?.id.clone();
    match context.store.remove(&id)? {
        Some(entry) => output::success(format!("Deleted {}", entry.display_label())),
        None => output::warning(format!("No entry with id `{}`", id)),
    }
    render_entries(context);
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["yes"])?;
    if context.store.is_empty() {
        output::info("There are no entries to clear.");
        return Ok(());
    }
    if !parsed.has("yes") {
        let prompt = format!("Delete all {} entries?", context.store.len());
        if !context.confirm(&prompt, false)? {
            output::info("Nothing was deleted.");
            return Ok(());
        }
    }
    let removed = context.store.clear()?;
    output::success(format!("Removed {} entries", removed));
    Ok(())
}
