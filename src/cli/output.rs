//! Output formatting for CLI commands

use serde::Serialize;

use crate::domain::{display_date, Task};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        let rendered = match self.format {
            OutputFormat::Text => serde_json::to_string_pretty(data),
            OutputFormat::Json => serde_json::to_string(data),
        };
        if let Ok(json) = rendered {
            println!("{}", json);
        }
    }

    /// Prints the task table (text) or the raw task array (json)
    pub fn task_table(&self, tasks: &[Task]) {
        if self.format == OutputFormat::Json {
            self.data(&tasks);
            return;
        }
        if tasks.is_empty() {
            println!("No tasks.");
            return;
        }
        println!("{:>3}  {:<32}  {:>10}  {:>10}", "#", "NAME", "COST", "DUE");
        for task in tasks {
            println!(
                "{:>3}  {:<32}  {:>10.2}  {:>10}",
                task.order,
                truncate_str(&task.name, 32),
                task.cost,
                display_date(task.due_date)
            );
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub(crate) fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_str("rent", 10), "rent");
        assert_eq!(truncate_str("exact", 5), "exact");
    }

    #[test]
    fn truncate_marks_long_strings() {
        assert_eq!(truncate_str("pay the landlord", 10), "pay the...");
    }
}
