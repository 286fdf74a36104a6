//! Interactive command loop driving the table controller.

use std::sync::Arc;

use client_core::{Applied, TableController, TableError, Workflow};
use shared::domain::PostId;
use thiserror::Error;
use tracing::{debug, info};

use crate::{console::Console, notifier::{badge, TerminalNotifier}, render::render_table};

pub const HELP: &str = "\
commands:
  list | reload      fetch posts from the server
  show               redraw the current page
  add                create a post
  edit <id>          edit a post
  delete <id>        delete a post
  next | prev        move one page
  first | last       jump to the first or last page
  page <n>           jump to page n (1-based)
  size <n>           rows per page
  help               this text
  quit               leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Reload,
    Show,
    Add,
    Edit(PostId),
    Delete(PostId),
    Next,
    Previous,
    First,
    Last,
    Page(usize),
    Size(usize),
    Help,
    Quit,
}

impl ShellCommand {
    pub fn name(self) -> &'static str {
        match self {
            ShellCommand::Reload => "reload",
            ShellCommand::Show => "show",
            ShellCommand::Add => "add",
            ShellCommand::Edit(_) => "edit",
            ShellCommand::Delete(_) => "delete",
            ShellCommand::Next => "next",
            ShellCommand::Previous => "prev",
            ShellCommand::First => "first",
            ShellCommand::Last => "last",
            ShellCommand::Page(_) => "page",
            ShellCommand::Size(_) => "size",
            ShellCommand::Help => "help",
            ShellCommand::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{command}' needs a number, got '{got}'")]
    BadArgument { command: &'static str, got: String },
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
}

fn number_arg(command: &'static str, arg: Option<&str>) -> Result<i64, ParseError> {
    let raw = arg.ok_or(ParseError::MissingArgument(command))?;
    raw.parse::<i64>().map_err(|_| ParseError::BadArgument {
        command,
        got: raw.to_string(),
    })
}

fn count_arg(command: &'static str, arg: Option<&str>) -> Result<usize, ParseError> {
    let raw = arg.ok_or(ParseError::MissingArgument(command))?;
    raw.parse::<usize>().map_err(|_| ParseError::BadArgument {
        command,
        got: raw.to_string(),
    })
}

pub fn parse_command(line: &str) -> Result<ShellCommand, ParseError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(ParseError::Empty);
    };
    let arg = words.next();
    let command = match head.to_ascii_lowercase().as_str() {
        "list" | "ls" | "reload" | "r" => ShellCommand::Reload,
        "show" => ShellCommand::Show,
        "add" | "new" => ShellCommand::Add,
        "edit" | "e" => ShellCommand::Edit(PostId(number_arg("edit", arg)?)),
        "delete" | "del" | "rm" => ShellCommand::Delete(PostId(number_arg("delete", arg)?)),
        "next" | "n" => ShellCommand::Next,
        "prev" | "p" => ShellCommand::Previous,
        "first" => ShellCommand::First,
        "last" => ShellCommand::Last,
        "page" => {
            let page = count_arg("page", arg)?;
            ShellCommand::Page(page.saturating_sub(1))
        }
        "size" => ShellCommand::Size(count_arg("size", arg)?),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(command)
}

// True when the completion changed the table.
fn log_outcome(outcome: &Result<Applied, TableError>) -> bool {
    match outcome {
        Ok(applied) => {
            debug!(?applied, "completion applied");
            true
        }
        // The controller already raised the error notification.
        Err(err) => {
            debug!(error = %err, "completion failed");
            false
        }
    }
}

pub struct Shell {
    controller: TableController,
    console: Arc<Console>,
    notifier: Arc<TerminalNotifier>,
}

impl Shell {
    pub fn new(
        controller: TableController,
        console: Arc<Console>,
        notifier: Arc<TerminalNotifier>,
    ) -> Self {
        Self {
            controller,
            console,
            notifier,
        }
    }

    pub fn controller(&self) -> &TableController {
        &self.controller
    }

    fn draw(&self) {
        self.console.write(&render_table(&self.controller.view()));
    }

    fn prompt_text(&self) -> String {
        let pending = self.controller.in_flight();
        let status = self
            .notifier
            .status()
            .map(|note| format!("{} {} ", badge(note.kind), note.message))
            .unwrap_or_default();
        if pending > 0 {
            format!("{status}({pending} pending) posts> ")
        } else {
            format!("{status}posts> ")
        }
    }

    fn report(&self, outcome: Result<Applied, TableError>) {
        if log_outcome(&outcome) {
            self.draw();
        }
    }

    /// Waits for an open form or confirmation while still applying
    /// completions that land meanwhile; the table is redrawn once it closes.
    async fn await_workflow(&mut self, mut workflow: Workflow) {
        let mut changed = false;
        let request = loop {
            let in_flight = self.controller.in_flight() > 0;
            tokio::select! {
                request = &mut workflow => break request,
                Some(outcome) = self.controller.next_completion(), if in_flight => {
                    changed |= log_outcome(&outcome);
                }
            }
        };
        if let Some(request) = request {
            self.controller.submit(request);
        }
        if changed {
            self.draw();
        }
    }

    /// Runs one command. Returns `false` when the shell should stop.
    pub async fn execute(&mut self, command: ShellCommand) -> bool {
        debug!(command = command.name(), "shell command");
        match command {
            ShellCommand::Reload => self.controller.reload(),
            ShellCommand::Show => self.draw(),
            ShellCommand::Add => {
                let workflow = self.controller.open_create();
                self.await_workflow(workflow).await;
            }
            ShellCommand::Edit(id) => match self.controller.open_edit(id) {
                Some(workflow) => self.await_workflow(workflow).await,
                None => self.console.write_line(&format!("no post with id {id}")),
            },
            ShellCommand::Delete(id) => match self.controller.open_delete(id) {
                Some(workflow) => self.await_workflow(workflow).await,
                None => self.console.write_line(&format!("no post with id {id}")),
            },
            ShellCommand::Next => {
                self.controller.next_page();
                self.draw();
            }
            ShellCommand::Previous => {
                self.controller.previous_page();
                self.draw();
            }
            ShellCommand::First => {
                self.controller.first_page();
                self.draw();
            }
            ShellCommand::Last => {
                self.controller.last_page();
                self.draw();
            }
            ShellCommand::Page(index) => {
                self.controller.set_page(index);
                self.draw();
            }
            ShellCommand::Size(size) => match self.controller.set_page_size(size) {
                Ok(()) => self.draw(),
                Err(err) => self.console.write_line(&err.to_string()),
            },
            ShellCommand::Help => self.console.write_line(HELP),
            ShellCommand::Quit => return false,
        }
        true
    }

    /// Loads the table once and prints it.
    pub async fn print_once(&mut self) -> Result<(), TableError> {
        self.controller.reload();
        for outcome in self.controller.settle().await {
            outcome?;
        }
        self.draw();
        Ok(())
    }

    /// Reads commands until `quit` or end of input, applying repository
    /// completions as they arrive in between.
    pub async fn run(&mut self) {
        self.controller.reload();
        self.console.write_line("type 'help' for commands");
        loop {
            self.console.write(&self.prompt_text());
            let console = Arc::clone(&self.console);
            let in_flight = self.controller.in_flight() > 0;
            tokio::select! {
                line = console.read_line() => {
                    let Some(line) = line else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match parse_command(&line) {
                        Ok(command) => {
                            if !self.execute(command).await {
                                break;
                            }
                        }
                        Err(err) => self.console.write_line(&err.to_string()),
                    }
                }
                Some(outcome) = self.controller.next_completion(), if in_flight => {
                    self.console.write("\n");
                    self.report(outcome);
                }
            }
        }
        let pending = self.controller.in_flight();
        if pending > 0 {
            info!(pending, "waiting for in-flight requests before exit");
            for outcome in self.controller.settle().await {
                self.report(outcome);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
