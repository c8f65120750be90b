use std::io::Write;

use tally_shared::{TaskDto, TaskPriority, TaskStatus};
use unicode_width::UnicodeWidthStr;

const TASK_HEADERS: [&str; 4] = ["ID", "Status", "Priority", "Text"];

/// A table cell. Color is applied after padding, so widths only ever count
/// the plain text.
struct Cell<'a> {
    text: &'a str,
    color: Option<&'static str>,
}

impl<'a> Cell<'a> {
    fn plain(text: &'a str) -> Self {
        Self { text, color: None }
    }
}

fn status_color(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "33",
        TaskStatus::Completed => "32",
    }
}

fn priority_color(priority: TaskPriority) -> Option<&'static str> {
    match priority {
        TaskPriority::High => Some("31"),
        TaskPriority::Medium | TaskPriority::Low => None,
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    #[tracing::instrument(skip(self, out, tasks))]
    pub fn print_task_table<W: Write>(&self, out: &mut W, tasks: &[&TaskDto]) -> anyhow::Result<()> {
        if tasks.is_empty() {
            writeln!(out, "No tasks.")?;
            return Ok(());
        }

        let rows: Vec<[Cell<'_>; 4]> = tasks
            .iter()
            .map(|task| {
                [
                    Cell::plain(&task.id),
                    Cell {
                        text: task.status.as_key(),
                        color: Some(status_color(task.status)),
                    },
                    Cell {
                        text: task.priority.as_key(),
                        color: priority_color(task.priority),
                    },
                    Cell::plain(&task.text),
                ]
            })
            .collect();

        let mut widths = TASK_HEADERS.map(|header| header.width());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.text.width());
            }
        }
        let rules = widths.map(|width| "-".repeat(width));

        self.write_row(out, &widths, TASK_HEADERS.map(Cell::plain))?;
        self.write_row(out, &widths, rules.iter().map(|rule| Cell::plain(rule)))?;
        for row in rows {
            self.write_row(out, &widths, row)?;
        }
        Ok(())
    }

    pub fn print_task<W: Write>(&self, out: &mut W, verb: &str, task: &TaskDto) -> anyhow::Result<()> {
        writeln!(
            out,
            "{verb} {} [{}, {}] {}",
            task.id, task.status, task.priority, task.text
        )?;
        Ok(())
    }

    /// Writes one line, padding every column but the last to `widths`.
    fn write_row<'a, W: Write>(
        &self,
        out: &mut W,
        widths: &[usize],
        cells: impl IntoIterator<Item = Cell<'a>>,
    ) -> anyhow::Result<()> {
        let mut line = String::new();
        for (idx, (cell, width)) in cells.into_iter().zip(widths).enumerate() {
            if idx > 0 {
                line.push(' ');
            }
            match cell.color.filter(|_| self.color) {
                Some(code) => line.push_str(&format!("\x1b[{code}m{}\x1b[0m", cell.text)),
                None => line.push_str(cell.text),
            }
            if idx + 1 < widths.len() {
                let padding = width.saturating_sub(cell.text.width());
                line.push_str(&" ".repeat(padding));
            }
        }
        writeln!(out, "{line}")?;
        Ok(())
    }
}
