use crate::github::{Action, Feature, Repository};
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Prints `data` as pretty JSON, or hands it to `render_table`.
pub fn output<T: Serialize>(json_mode: bool, data: &T, render_table: impl FnOnce(&T)) {
    if !json_mode {
        render_table(data);
        return;
    }
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{json}"),
        Err(e) => error(&format!("Failed to serialize JSON: {e}")),
    }
}

pub fn summary_table(headers: &[&str], row: Vec<String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table.add_row(row);
    table
}

pub fn section_header(title: &str) {
    println!("\n{}", title.cyan().bold());
    println!("{}", "─".repeat(title.len()).cyan());
}

// Progress goes to stderr so stdout only ever carries the summary (table or JSON).

pub fn skipped_archived(repo: &Repository) {
    eprintln!(
        "{} skipping archived repository {}",
        "-".dimmed(),
        repo.name
    );
}

pub fn would_update(action: Action, feature: Feature, repo: &Repository) {
    eprintln!(
        "{} will {action} {feature} for repository {}",
        "dry run:".magenta().bold(),
        repo.name
    );
}

pub fn updated(feature: Feature, repo: &Repository) {
    eprintln!("{} updated {feature} for repository {}", "✓".green().bold(), repo.name);
}

pub fn total(what: &str, count: usize) {
    eprintln!("updated {what} for {} repositories", count.bold());
}

pub fn warn(msg: &str) {
    eprintln!("{} {msg}", "warning:".yellow().bold());
}

pub fn error(msg: &str) {
    eprintln!("{} {msg}", "error:".red().bold());
}
