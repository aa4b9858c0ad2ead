//! Terminal output helpers

use audit::NotificationLevel;
use console::style;
use dashboard::Dashboard;
use serde::Serialize;

/// Print and clear pending notifications
pub fn notifications(dashboard: &mut Dashboard) {
    for note in dashboard.take_notifications() {
        match note.level {
            NotificationLevel::Success => println!("{} {}", style("✓").green(), note.message),
            NotificationLevel::Info => println!("{} {}", style("ℹ").cyan(), note.message),
            NotificationLevel::Error => eprintln!("{} {}", style("✗").red(), note.message),
        }
    }
}

/// Flush notifications, then hand back the operation's result
pub fn outcome<T>(dashboard: &mut Dashboard, result: shared::Result<T>) -> anyhow::Result<T> {
    notifications(dashboard);
    Ok(result?)
}

pub fn json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Left-aligned table with a bold header row
pub fn table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("{}", style("(no records)").dim());
        return;
    }

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<w$}", h, w = *w))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", style(header.trim_end()).bold());

    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line.trim_end());
    }
}

pub fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

pub fn optional<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_and_optional() {
        assert_eq!(money(1200.5), "1200.50");
        assert_eq!(optional::<String>(&None), "-");
        assert_eq!(optional(&Some(3)), "3");
    }
}
