use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::{MonthFilter, SummaryService};
use crate::domain::entry::DATE_FORMAT;
use crate::report::table::{Table, TableColumn};
use crate::report::EMPTY_CELL;

const SHARE_BAR_WIDTH: usize = 20;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("list", "Show entries matching the filter", "list", cmd_list),
        CommandEntry::new(
            "month",
            "Filter the listing by month",
            "month <all|YYYY-MM>",
            cmd_month,
        ),
        CommandEntry::new(
            "search",
            "Filter by category or description text",
            "search [text]",
            cmd_search,
        ),
        CommandEntry::new(
            "months",
            "List the months that have entries",
            "months",
            cmd_months,
        ),
        CommandEntry::new(
            "summary",
            "Totals and expenses by category",
            "summary",
            cmd_summary,
        ),
    ]
}

/// Prints the filtered entry table, or a notice when nothing matches.
pub(crate) fn render_entries(context: &ShellContext) {
    let visible = context.visible_entries();
    if visible.is_empty() {
        if context.store.is_empty() {
            output::info("No entries yet. Use `add` to record one.");
        } else {
            output::info("No entries match the current filter.");
        }
        return;
    }

    let money = context.money();
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Date"),
        TableColumn::left("Type"),
        TableColumn::left("Category").max_width(24),
        TableColumn::right("Amount"),
        TableColumn::left("Description").max_width(40),
    ]);
    for entry in &visible {
        table.push_row(vec![
            entry.id.short().to_string(),
            entry.date.format(DATE_FORMAT).to_string(),
            entry.kind.label().to_string(),
            entry.category.clone(),
            output::tint_amount(&money.format(entry.amount), entry.is_income()),
            entry.description().unwrap_or(EMPTY_CELL).to_string(),
        ]);
    }
    output::block(table.render());
    if !context.filter.is_identity() {
        output::info(format!(
            "Showing {} of {} entries",
            visible.len(),
            context.store.len()
        ));
    }
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(CommandError::InvalidArguments("usage: list".into()));
    }
    render_entries(context);
    Ok(())
}

fn cmd_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: month <all|YYYY-MM>".into(),
        ));
    };
    context.filter.month = MonthFilter::parse(raw)?;
    output::info(format!("Month filter: {}", context.filter.month));
    render_entries(context);
    Ok(())
}

fn cmd_search(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.filter.search = args.join(" ").trim().to_string();
    if context.filter.search.is_empty() {
        output::info("Search cleared.");
    } else {
        output::info(format!("Searching for \"{}\"", context.filter.search));
    }
    render_entries(context);
    Ok(())
}

fn cmd_months(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let months = SummaryService::distinct_months(context.store.list());
    if months.is_empty() {
        output::info("No months recorded yet.");
        return Ok(());
    }
    output::section("Months");
    for month in months {
        let marker = if context.filter.month == MonthFilter::Month(month.clone()) {
            "*"
        } else {
            " "
        };
        output::block(format!(" {marker} {month}"));
    }
    Ok(())
}

/// Totals always cover every entry; the month and search filter only affect `list`.
fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let entries = context.store.list();
    let money = context.money();
    let totals = SummaryService::totals(entries);

    output::section("Summary");
    output::block(format!(
        "  Income : {}\n  Expense: {}\n  Balance: {}",
        output::tint_amount(&money.format(totals.income), true),
        output::tint_amount(&money.format(totals.expense), false),
        output::tint_amount(&money.format(totals.balance), totals.balance >= 0.0)
    ));

    let shares = SummaryService::category_shares(entries);
    if shares.is_empty() {
        output::info("No expenses recorded.");
        return Ok(());
    }
    output::section("Expenses by category");
    let mut table = Table::new(vec![
        TableColumn::left("Category").max_width(24),
        TableColumn::right("Amount"),
        TableColumn::right("Share"),
        TableColumn::left(""),
    ]);
    for share in &shares {
        let filled = ((share.percent / 100.0) * SHARE_BAR_WIDTH as f64).round() as usize;
        table.push_row(vec![
            share.category.clone(),
            money.format(share.amount),
            format!("{:.1}%", share.percent),
            "#".repeat(filled.min(SHARE_BAR_WIDTH)),
        ]);
    }
    output::block(table.render());
    Ok(())
}
