//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output in
//! various formats (JSON, YAML, human-readable), with dedicated rendering of
//! operation completions and spinners for network calls.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use hubclient_core::{Application, Completion, Infrastructure, Login, OperationResult};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tracing::{debug, trace};

/// Human-readable rendering of an operation payload
pub trait HumanSummary {
    /// One entry per output line, without trailing newlines
    fn human_lines(&self) -> Vec<String>;
}

impl HumanSummary for Infrastructure {
    fn human_lines(&self) -> Vec<String> {
        vec![
            format!("Name: {}", self.name.as_deref().unwrap_or("-")),
            format!("Version: {}", self.version.as_deref().unwrap_or("-")),
        ]
    }
}

impl HumanSummary for Vec<Application> {
    fn human_lines(&self) -> Vec<String> {
        if self.is_empty() {
            return vec!["No applications".to_string()];
        }
        self.iter()
            .enumerate()
            .map(|(i, app)| {
                let mut line = format!("{}. {} ({})", i + 1, app.name, app.path);
                if let Some(description) = app.description.as_deref().filter(|d| !d.is_empty()) {
                    line.push_str(&format!(" - {}", description));
                }
                line
            })
            .collect()
    }
}

impl HumanSummary for Login {
    fn human_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Logged in: {}",
            if self.success { "yes" } else { "no" }
        )];
        if let Some(message) = &self.error_message {
            lines.push(format!("Message: {}", message));
        }
        if !self.applications.is_empty() {
            lines.push("Applications:".to_string());
            lines.extend(
                self.applications
                    .human_lines()
                    .into_iter()
                    .map(|l| format!("  {}", l)),
            );
        }
        lines
    }
}

impl HumanSummary for () {
    fn human_lines(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Trait for formatting output
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format the completion of `operation`
    ///
    /// Machine formats tag the payload with its operation kind.
    fn format_completion<T>(&self, operation: &str, completion: &Completion<T>) -> Result<String>
    where
        T: Clone + Into<OperationResult> + HumanSummary;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // For human format, use pretty JSON as fallback
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_completion<T>(&self, operation: &str, completion: &Completion<T>) -> Result<String>
    where
        T: Clone + Into<OperationResult> + HumanSummary,
    {
        match self {
            OutputFormat::Human => Ok(format_completion_human(operation, completion)),
            _ => self.format(&completion.clone().into_operation_result()),
        }
    }
}

fn format_completion_human<T: HumanSummary>(operation: &str, completion: &Completion<T>) -> String {
    let mut output = match completion.classification() {
        Some(classification) => format!(
            "✗ {} failed: {} (status {})",
            operation, classification, completion.status_code
        ),
        None => format!(
            "✓ {} succeeded (status {})",
            operation, completion.status_code
        ),
    };

    match &completion.result {
        Some(result) => {
            for line in result.human_lines() {
                output.push_str("\n  ");
                output.push_str(&line);
            }
        }
        None if completion.is_success() => {
            output.push_str("\n  (no payload)");
        }
        None => {}
    }

    output
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, progress: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: progress && !quiet && io::stderr().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut value_json = serde_json::to_value(value)?;
        redaction::redact_json_value(&mut value_json);
        trace!(data = %value_json, "Outputting data");

        let formatted = self.format.format(value)?;
        self.writeln(formatted.trim_end())
    }

    /// Write the completion of an operation
    pub fn completion<T>(&mut self, operation: &str, completion: &Completion<T>) -> Result<()>
    where
        T: Clone + Into<OperationResult> + HumanSummary,
    {
        let formatted = self.format.format_completion(operation, completion)?;

        if self.format == OutputFormat::Human && self.use_color {
            let (head, rest) = formatted
                .split_once('\n')
                .map_or((formatted.as_str(), None), |(h, r)| (h, Some(r)));
            let head = if completion.is_failure {
                head.red().bold().to_string()
            } else {
                head.green().to_string()
            };
            self.writeln(&head)?;
            if let Some(rest) = rest {
                self.writeln(rest)?;
            }
            Ok(())
        } else {
            self.writeln(formatted.trim_end())
        }
    }

    /// Create a spinner for a network call
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        // Calculate column widths
        let mut widths = headers.iter().map(|h| h.len()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.len());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i) {
                    Some(width) => format!("{:width$}", cell, width = width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }
}

/// Helper function to create a spinner style
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
