// Text rendering of the task list

use crate::filter::Filter;
use crate::models::{Priority, Task};
use crate::store::{Counts, TaskStore};
use chrono::NaiveDate;
use colored::{ColoredString, Colorize};

pub const EMPTY_MESSAGE: &str = "No tasks found. Add some tasks to get started!";

/// Format a due date the way it is shown next to a task (M/D/YYYY)
pub fn format_due_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Renders store contents as terminal text
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, style: impl FnOnce(ColoredString) -> ColoredString) -> String {
        if self.color {
            style(text.normal()).to_string()
        } else {
            text.to_string()
        }
    }

    fn priority_badge(&self, priority: Priority) -> String {
        let badge = format!("({})", priority);
        match priority {
            Priority::Low => self.paint(&badge, |s| s.blue()),
            Priority::Medium => self.paint(&badge, |s| s.yellow()),
            Priority::High => self.paint(&badge, |s| s.red()),
        }
    }

    /// One line per task: checkbox, id, text, priority, category and due date
    pub fn task_line(&self, task: &Task) -> String {
        let checkbox = if task.completed {
            self.paint("[x]", |s| s.green())
        } else {
            self.paint("[ ]", |s| s.purple())
        };

        let text = if task.completed {
            self.paint(&task.text, |s| s.dimmed().strikethrough())
        } else {
            task.text.clone()
        };

        let mut line = format!(
            "{} #{} {} {} {}",
            checkbox,
            task.id,
            text,
            self.priority_badge(task.priority),
            self.paint(&format!("[{}]", task.category), |s| s.cyan()),
        );

        if let Some(due) = task.due_date {
            line.push_str(&format!(" due {}", format_due_date(due)));
        }

        line
    }

    /// All filter choices with the current one highlighted
    pub fn filter_bar(&self, current: Filter) -> String {
        Filter::choices()
            .map(|filter| {
                if filter == current {
                    self.paint(&format!("[{}]", filter.label()), |s| s.bold())
                } else {
                    filter.label().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Footer line, omitted while the store is empty
    pub fn summary(&self, counts: Counts) -> Option<String> {
        if counts.total == 0 {
            return None;
        }

        Some(format!(
            "{} tasks remaining    {} of {} completed",
            counts.remaining,
            self.paint(&counts.completed.to_string(), |s| s.green()),
            counts.total
        ))
    }

    /// Filter bar, visible tasks (or the empty message) and footer
    pub fn board(&self, store: &TaskStore) -> String {
        let mut lines = vec![self.filter_bar(store.filter()), String::new()];

        let before = lines.len();
        lines.extend(store.visible().map(|task| self.task_line(task)));
        if lines.len() == before {
            lines.push(self.paint(EMPTY_MESSAGE, |s| s.dimmed()));
        }

        if let Some(summary) = self.summary(store.counts()) {
            lines.push(String::new());
            lines.push(summary);
        }

        lines.join("\n")
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(true)
    }
}
