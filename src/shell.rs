// Line-oriented session driving a TaskStore

use crate::config::Config;
use crate::event::StoreEvent;
use crate::filter::Filter;
use crate::models::{Category, Priority, TaskId, parse_due_date};
use crate::render::Renderer;
use crate::store::TaskStore;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use eyre::{Context, Result};
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;
use tracing::{info, warn};

// One line of input
#[derive(Parser, Debug)]
#[command(name = "taskboard", no_binary_name = true, disable_version_flag = true)]
#[command(about = "Manage the task list: add, toggle, rm, filter, list, stats, quit")]
struct Line {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// Add a task (options go before the text)
    Add {
        /// personal, work, shopping or health
        #[arg(short, long)]
        category: Option<String>,

        /// low, medium or high
        #[arg(short, long)]
        priority: Option<String>,

        /// Due date as YYYY-MM-DD
        #[arg(short, long)]
        due: Option<String>,

        #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
        text: Vec<String>,
    },

    /// Mark a task done, or not done again
    Toggle { id: TaskId },

    /// Delete a task
    #[command(alias = "delete")]
    Rm { id: TaskId },

    /// Show all, active, completed, or one category
    Filter { filter: String },

    /// Show the tasks selected by the current filter
    List {
        /// Print as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Show task counts
    Stats,

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

/// Whether the session should keep reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive session over a store
pub struct Shell {
    store: TaskStore,
    renderer: Renderer,
    default_category: Category,
    default_priority: Priority,
    prompt: bool,
    events: Rc<RefCell<Vec<StoreEvent>>>,
}

impl Shell {
    pub fn new(config: &Config) -> Self {
        let mut store = TaskStore::with_filter(config.filter);

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        Self {
            store,
            renderer: Renderer::new(config.color),
            default_category: config.default_category,
            default_priority: config.default_priority,
            prompt: false,
            events,
        }
    }

    /// Print a prompt before reading each line
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Read and execute lines until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        info!("Session started");

        let mut lines = input.lines();
        loop {
            if self.prompt {
                write!(output, "> ")?;
                output.flush()?;
            }

            let Some(line) = lines.next() else {
                // End of input; don't leave the prompt dangling
                if self.prompt {
                    writeln!(output)?;
                }
                break;
            };
            let line = line.context("Failed to read input")?;

            if self.execute(&line, &mut output)? == Flow::Quit {
                break;
            }
        }

        info!(tasks = self.store.len(), "Session ended");
        Ok(())
    }

    /// Execute one line of input
    ///
    /// Bad input is reported to `output`; only write failures are errors.
    pub fn execute<W: Write>(&mut self, line: &str, output: &mut W) -> Result<Flow> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(Flow::Continue);
        }

        let command = match Line::try_parse_from(tokens.iter().copied()) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                if e.use_stderr() {
                    warn!(line, "Could not parse command");
                }
                write!(output, "{}", e.render())?;
                return Ok(Flow::Continue);
            }
        };

        let flow = self.dispatch(command, line, &tokens, output)?;
        self.report_events(output)?;
        Ok(flow)
    }

    fn dispatch<W: Write>(&mut self, command: ShellCommand, line: &str, tokens: &[&str], output: &mut W) -> Result<Flow> {
        match command {
            ShellCommand::Add {
                category,
                priority,
                due,
                text,
            } => match self.add_fields(category, priority, due) {
                Ok((category, priority, due_date)) => {
                    self.store.add(raw_text(line, tokens, text.len()), category, priority, due_date);
                }
                Err(e) => reject(output, e)?,
            },
            ShellCommand::Toggle { id } => {
                self.store.toggle(id);
            }
            ShellCommand::Rm { id } => {
                self.store.remove(id);
            }
            ShellCommand::Filter { filter } => match filter.parse::<Filter>() {
                Ok(filter) => self.store.set_filter(filter),
                Err(e) => reject(output, e)?,
            },
            ShellCommand::List { json } => {
                if json {
                    let tasks: Vec<_> = self.store.visible().collect();
                    writeln!(output, "{}", serde_json::to_string_pretty(&tasks)?)?;
                } else {
                    writeln!(output, "{}", self.renderer.board(&self.store))?;
                }
            }
            ShellCommand::Stats => {
                let counts = self.store.counts();
                writeln!(
                    output,
                    "total: {}, remaining: {}, completed: {}",
                    counts.total, counts.remaining, counts.completed
                )?;
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn add_fields(
        &self,
        category: Option<String>,
        priority: Option<String>,
        due: Option<String>,
    ) -> Result<(Category, Priority, Option<NaiveDate>)> {
        let category = match category {
            Some(category) => category.parse::<Category>()?,
            None => self.default_category,
        };
        let priority = match priority {
            Some(priority) => priority.parse::<Priority>()?,
            None => self.default_priority,
        };
        let due_date = match due {
            Some(due) => parse_due_date(&due)?,
            None => None,
        };
        Ok((category, priority, due_date))
    }

    fn report_events<W: Write>(&mut self, output: &mut W) -> Result<()> {
        let events: Vec<StoreEvent> = self.events.borrow_mut().drain(..).collect();

        for event in events {
            match event {
                StoreEvent::Added(task) => writeln!(output, "Added {}", self.renderer.task_line(&task))?,
                StoreEvent::Toggled { id, completed: true } => writeln!(output, "Completed #{}", id)?,
                StoreEvent::Toggled { id, completed: false } => writeln!(output, "Reopened #{}", id)?,
                StoreEvent::Removed(id) => writeln!(output, "Deleted #{}", id)?,
                StoreEvent::FilterChanged(filter) => writeln!(output, "Showing: {}", filter.label())?,
            }
        }

        Ok(())
    }
}

/// The task text as typed: everything from the first of the trailing
/// `count` tokens to the end of the line
fn raw_text<'a>(line: &'a str, tokens: &[&'a str], count: usize) -> &'a str {
    if count == 0 {
        return "";
    }

    // Tokens are subslices of `line`
    let first = tokens[tokens.len() - count];
    let start = first.as_ptr() as usize - line.as_ptr() as usize;
    &line[start..]
}

fn reject<W: Write>(output: &mut W, error: eyre::Report) -> Result<()> {
    warn!(error = %error, "Command rejected");
    writeln!(output, "error: {}", error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::EMPTY_MESSAGE;
    use crate::store::Counts;

    fn plain_config() -> Config {
        Config {
            color: false,
            ..Config::default()
        }
    }

    fn run_script(script: &str) -> (Shell, String) {
        let mut shell = Shell::new(&plain_config());
        let mut output = Vec::new();
        shell.run(script.as_bytes(), &mut output).unwrap();
        (shell, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_add_uses_defaults() {
        let (shell, output) = run_script("add Buy milk\n");

        let task = &shell.store().tasks()[0];
        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.category, Category::Personal);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, None);
        assert!(output.contains("Added [ ] #1 Buy milk (medium) [personal]"));
    }

    #[test]
    fn test_add_with_options() {
        let (shell, _) = run_script("add -c shopping -p low -d 2024-06-01 Buy   oat milk\n");

        let task = &shell.store().tasks()[0];
        assert_eq!(task.text, "Buy   oat milk");
        assert_eq!(task.category, Category::Shopping);
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn test_add_keeps_inner_whitespace() {
        let mut shell = Shell::new(&plain_config());
        let mut output = Vec::new();
        shell.execute("add Call  mom\tat 5", &mut output).unwrap();
        shell.execute("add -p high \t Pay rent\t ", &mut output).unwrap();
        shell.execute("add -- -v is not a flag", &mut output).unwrap();

        let texts: Vec<&str> = shell.store().tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Call  mom\tat 5", "Pay rent", "-v is not a flag"]);
        assert_eq!(shell.store().tasks()[1].priority, Priority::High);
    }

    #[test]
    fn test_raw_text() {
        let line = "add -c work  Review   the PR ";
        let tokens: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(raw_text(line, &tokens, 3), "Review   the PR ");
        assert_eq!(raw_text(line, &tokens, 0), "");
    }

    #[test]
    fn test_add_without_text_is_silent() {
        let (shell, output) = run_script("add\nadd -c work\n");
        assert!(shell.store().is_empty());
        assert!(output.is_empty());
    }

    #[test]
    fn test_add_with_bad_values_reports_error() {
        let (shell, output) = run_script("add -c errands Thing\nadd -d tomorrow Thing\n");
        assert!(shell.store().is_empty());
        assert!(output.contains("Unknown category 'errands'"));
        assert!(output.contains("Invalid due date 'tomorrow'"));
    }

    #[test]
    fn test_toggle_and_remove_flow() {
        let (shell, output) = run_script("add Buy milk\ntoggle 1\nstats\ntoggle 1\nrm 1\nstats\n");

        assert!(output.contains("Completed #1"));
        assert!(output.contains("total: 1, remaining: 0, completed: 1"));
        assert!(output.contains("Reopened #1"));
        assert!(output.contains("Deleted #1"));
        assert!(output.contains("total: 0, remaining: 0, completed: 0"));
        assert_eq!(shell.store().counts(), Counts::default());
    }

    #[test]
    fn test_unknown_ids_are_silent() {
        let (shell, output) = run_script("add a\ntoggle 9\ndelete 9\n");
        assert_eq!(shell.store().len(), 1);
        assert!(!output.contains("#9"));
    }

    #[test]
    fn test_filter_and_list() {
        let (shell, output) = run_script(
            "add -c work Standup\nadd -c personal Call mom\nadd -c work Review\nfilter work\nlist\n",
        );

        assert_eq!(shell.store().filter(), Filter::Category(Category::Work));
        let (_, board) = output.split_once("Showing: Work\n").unwrap();
        assert!(board.starts_with("All Active Completed Personal [Work] Shopping Health"));
        assert!(board.contains("[ ] #1 Standup"));
        assert!(board.contains("[ ] #3 Review"));
        assert!(!board.contains("Call mom"));
        assert!(board.contains("3 tasks remaining    0 of 3 completed"));
    }

    #[test]
    fn test_bad_filter_keeps_selection() {
        let (shell, output) = run_script("filter someday\n");
        assert_eq!(shell.store().filter(), Filter::All);
        assert!(output.contains("Unknown filter 'someday'"));
    }

    #[test]
    fn test_list_empty() {
        let (_, output) = run_script("list\n");
        assert!(output.contains(EMPTY_MESSAGE));
    }

    #[test]
    fn test_list_json() {
        let (_, output) = run_script("add -c health Stretch\nlist --json\n");
        let json = output.split_once('\n').unwrap().1;
        let value: serde_json::Value = serde_json::from_str(json).unwrap();

        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["text"], "Stretch");
        assert_eq!(value[0]["category"], "health");
        assert_eq!(value[0]["completed"], false);
    }

    #[test]
    fn test_quit_stops_reading() {
        let (shell, _) = run_script("add one\nquit\nadd two\n");
        assert_eq!(shell.store().len(), 1);

        let (shell, _) = run_script("add one\nexit\nadd two\n");
        assert_eq!(shell.store().len(), 1);
    }

    #[test]
    fn test_unknown_command_continues() {
        let (shell, output) = run_script("frobnicate\n\n   \nadd still works\n");
        assert!(output.contains("frobnicate"));
        assert_eq!(shell.store().len(), 1);
    }

    #[test]
    fn test_config_defaults_apply() {
        let config = Config {
            default_category: Category::Work,
            default_priority: Priority::High,
            filter: Filter::Active,
            color: false,
        };
        let mut shell = Shell::new(&config);
        let mut output = Vec::new();
        shell.execute("add Ship it", &mut output).unwrap();

        let task = &shell.store().tasks()[0];
        assert_eq!(task.category, Category::Work);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(shell.store().filter(), Filter::Active);
    }

    #[test]
    fn test_prompt_is_written() {
        let mut shell = Shell::new(&plain_config()).with_prompt(true);
        let mut output = Vec::new();
        shell.run("stats\n".as_bytes(), &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("> total: 0"));
        assert!(output.ends_with("> \n"));
    }

    #[test]
    fn test_help_has_about() {
        let (_, output) = run_script("help\n");
        assert!(output.starts_with("Manage the task list"));
        assert!(!output.contains("One line of input"));
    }
}
