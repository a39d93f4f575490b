use crate::types::Task;
use chrono::{DateTime, NaiveDateTime, Utc};
use colored::*;
use terminal_size::{Width, terminal_size};
use textwrap::wrap;

const WRAP_COLUMN: usize = 80;
const MIN_DESCRIPTION_INDENT: usize = 3;
const MIN_NAME_WIDTH: usize = 10;

pub fn print_list_names(names: &[String]) {
    if names.is_empty() {
        println!("{}", "No todo list found".bright_yellow());
        return;
    }

    println!("{}", "Available todo lists:".cyan());
    for name in names {
        println!("  - {name}");
    }
}

pub fn print_tasks(list: &str, tasks: &[Task]) {
    if tasks.is_empty() {
        println!("{}", format!("no tasks in {list}").dimmed());
        return;
    }

    println!("{}", list.bold());

    let id_width = tasks
        .iter()
        .map(|t| t.id.to_string().len())
        .max()
        .unwrap_or(1);
    let created: Vec<String> = tasks.iter().map(created_label).collect();
    let time_width = created.iter().map(String::len).max().unwrap_or(0);

    let base_cols = id_width + 2;
    let cap = term_width()
        .saturating_sub(base_cols + 1 + time_width)
        .max(MIN_NAME_WIDTH);
    let name_width = tasks
        .iter()
        .map(|t| truncate_with_dots(&t.name, cap).chars().count())
        .max()
        .unwrap_or(MIN_NAME_WIDTH)
        .max(MIN_NAME_WIDTH);

    for (task, created) in tasks.iter().zip(&created) {
        println!(
            "{:>id_width$}. {:<name_width$} {}",
            task.id.to_string().bright_black(),
            truncate_with_dots(&task.name, name_width).bright_white(),
            format!("{created:>time_width$}").dimmed(),
        );

        if let Some(description) = task.description.as_deref() {
            print_description(description, base_cols);
        }
    }
}

pub fn print_task_added(list: &str, id: i64, name: &str) {
    println!(
        "{} {}",
        format!("task {id} added to {list}:").bright_green(),
        name.bright_white()
    );
}

fn print_description(description: &str, indent_len: usize) {
    let indent_len = indent_len.max(MIN_DESCRIPTION_INDENT);
    let indent = " ".repeat(indent_len);

    let term_w = term_width();
    let wrap_limit = if term_w >= WRAP_COLUMN {
        WRAP_COLUMN
    } else {
        term_w.saturating_sub(1)
    };
    let wrap_width = wrap_limit.saturating_sub(indent_len).max(MIN_NAME_WIDTH);

    for line in wrap(description, wrap_width) {
        println!("{}{}", indent, line.dimmed());
    }
}

fn created_label(task: &Task) -> String {
    NaiveDateTime::parse_from_str(&task.created_at, "%Y-%m-%d %H:%M:%S")
        .map(|naive| pretty_time(naive.and_utc(), Utc::now()))
        .unwrap_or_else(|_| task.created_at.clone())
}

pub fn pretty_time(dt: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (dt - now).num_seconds();
    let future = secs > 0;
    let abs_secs = secs.abs();

    if abs_secs < 86_400 {
        let mins = (abs_secs + 59) / 60;
        let hours = mins / 60;
        let minutes = mins % 60;

        let mut parts = Vec::new();
        if hours > 0 {
            parts.push(format!("{}h", hours));
        }
        if minutes > 0 {
            parts.push(format!("{}m", minutes));
        }
        if parts.is_empty() {
            parts.push("0m".into());
        }

        let phrase = parts.join(" ");
        return if future {
            format!("in {}", phrase)
        } else {
            format!("{} ago", phrase)
        };
    }

    let diff_days = (dt.date_naive() - now.date_naive()).num_days();

    match diff_days {
        -1 => format!("yesterday at {}", dt.format("%H:%M")),
        1 => format!("tomorrow at {}", dt.format("%H:%M")),
        -6..=6 => dt.format("%A at %H:%M").to_string(),
        _ => dt.format("%Y-%m-%d %H:%M").to_string(),
    }
}

fn truncate_with_dots(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        return s.to_string();
    }

    let truncated: String = s.chars().take(limit.saturating_sub(3)).collect();
    format!("{}...", truncated)
}

fn term_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(WRAP_COLUMN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn pretty_time_rounds_recent_past_up_to_minutes() {
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 17, 0, 0).unwrap();
        assert_eq!(pretty_time(now, now), "0m ago");
        assert_eq!(pretty_time(now + Duration::minutes(5), now), "in 5m");
        assert_eq!(pretty_time(now - Duration::seconds(30), now), "1m ago");
        assert_eq!(pretty_time(now - Duration::minutes(90), now), "1h 30m ago");
    }

    #[test]
    fn pretty_time_uses_day_names_within_a_week() {
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 17, 0, 0).unwrap();
        assert_eq!(
            pretty_time(now - Duration::hours(30), now),
            "yesterday at 11:00"
        );
        assert_eq!(
            pretty_time(now - Duration::days(3), now),
            "Tuesday at 17:00"
        );
        assert_eq!(
            pretty_time(now - Duration::days(30), now),
            "2025-07-02 17:00"
        );
    }

    #[test]
    fn truncation_keeps_short_names() {
        assert_eq!(truncate_with_dots("milk", 10), "milk");
        assert_eq!(truncate_with_dots("a very long task name", 10), "a very ...");
    }
}
