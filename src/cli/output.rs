use std::fmt;

use colored::Colorize;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Style {
    Header,
    Success,
    Warning,
    Error,
}

pub fn print_header(title: impl fmt::Display) {
    println!("\n{}", apply_style(Style::Header, title));
}

pub fn print_info(message: impl fmt::Display) {
    println!("{}", message);
}

pub fn print_success(message: impl fmt::Display) {
    println!("{}", apply_style(Style::Success, message));
}

pub fn print_warning(message: impl fmt::Display) {
    println!("{}", apply_style(Style::Warning, message));
}

/// Errors go to stderr so scripted callers can still parse stdout.
pub fn print_error(message: impl fmt::Display) {
    eprintln!("{}", apply_style(Style::Error, message));
}

fn apply_style(style: Style, message: impl fmt::Display) -> String {
    match style {
        Style::Header => format!("=== {} ===", message).bold().to_string(),
        Style::Success => format!("OK: {}", message).bright_green().to_string(),
        Style::Warning => format!("WARNING: {}", message).bright_yellow().to_string(),
        Style::Error => format!("Error: {}", message).bright_red().to_string(),
    }
}

pub fn money(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Plain-text table with per-column alignment.
pub struct Table {
    columns: Vec<(String, Alignment)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[(&str, Alignment)]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(header, align)| (header.to_string(), *align))
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, (header, _))| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .fold(header.chars().count(), usize::max)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let headers: Vec<String> = self.columns.iter().map(|(h, _)| h.clone()).collect();
        let mut lines = vec![self.render_row(&headers, &widths)];
        lines.push(
            widths
                .iter()
                .map(|width| "-".repeat(*width))
                .collect::<Vec<_>>()
                .join("  "),
        );
        for row in &self.rows {
            lines.push(self.render_row(row, &widths));
        }
        lines.join("\n")
    }

    fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, ((_, align), width))| {
                let cell = row.get(idx).map(String::as_str).unwrap_or("");
                match align {
                    Alignment::Left => format!("{:<width$}", cell, width = width),
                    Alignment::Right => format!("{:>width$}", cell, width = width),
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }
}
