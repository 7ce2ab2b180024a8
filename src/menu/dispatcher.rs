use crate::activity::LogSink;
use crate::error::Result;
use crate::{SmartTasks, Task};
use std::io::{BufRead, Write};
use std::path::PathBuf;

const BANNER_WIDTH: usize = 55;
const BANNER_TITLE: &str = " SMART TASK AUTOMATION SYSTEM ";

/// The three task entries of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskChoice {
    MoveFiles,
    ExtractEmails,
    ScrapeTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Run(TaskChoice),
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Run(TaskChoice::MoveFiles)),
            "2" => Some(MenuChoice::Run(TaskChoice::ExtractEmails)),
            "3" => Some(MenuChoice::Run(TaskChoice::ScrapeTitle)),
            "4" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    AwaitingChoice,
    Running(TaskChoice),
    Exited,
}

/// Interactive menu loop. Everything the user sees is rendered into the
/// output writer; exactly one activity line is recorded per task run.
pub struct Dispatcher<'a, R, W> {
    app: &'a SmartTasks,
    sink: &'a dyn LogSink,
    input: R,
    output: W,
    state: MenuState,
}

impl<'a, R: BufRead, W: Write> Dispatcher<'a, R, W> {
    pub fn new(app: &'a SmartTasks, sink: &'a dyn LogSink, input: R, output: W) -> Self {
        Self {
            app,
            sink,
            input,
            output,
            state: MenuState::AwaitingChoice,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Runs until the user exits or input ends. Only activity-log and
    /// console I/O failures are returned.
    pub fn run(&mut self) -> Result<()> {
        while self.state != MenuState::Exited {
            self.step()?;
        }
        Ok(())
    }

    /// One menu iteration: show the menu, read a choice, act on it.
    pub fn step(&mut self) -> Result<MenuState> {
        let app = self.app;
        let formatter = app.output_formatter();
        self.print_menu()?;

        let Some(line) = self.prompt("\nEnter your choice (1-4): ")? else {
            return self.end_of_input();
        };

        match MenuChoice::parse(&line) {
            Some(MenuChoice::Exit) => {
                formatter.print_farewell(&mut self.output)?;
                self.sink.record("Program exited by user")?;
                self.state = MenuState::Exited;
            }
            Some(MenuChoice::Run(choice)) => {
                self.state = MenuState::Running(choice);
                let Some(task) = self.build_task(choice)? else {
                    return self.end_of_input();
                };
                self.execute(&task)?;
                self.state = MenuState::AwaitingChoice;
            }
            None => {
                tracing::debug!(input = %line, "invalid menu choice");
                formatter.error(&mut self.output, "Invalid choice. Please select 1-4")?;
            }
        }

        Ok(self.state)
    }

    fn print_menu(&mut self) -> Result<()> {
        let extension = self
            .app
            .config()
            .mover
            .extension
            .trim()
            .trim_start_matches('.')
            .to_uppercase();
        let options = [
            format!("Move all {} files", extension),
            "Extract Email Addresses".to_string(),
            "Scrape Website Title".to_string(),
            "Exit".to_string(),
        ];

        let app = self.app;
        app.output_formatter()
            .print_menu(&mut self.output, BANNER_TITLE, &options, BANNER_WIDTH)?;
        Ok(())
    }

    /// `None` when input is exhausted.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        let app = self.app;
        app.output_formatter().prompt(&mut self.output, text)?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    fn build_task(&mut self, choice: TaskChoice) -> Result<Option<Task>> {
        let task = match choice {
            TaskChoice::MoveFiles => {
                let Some(source) = self.prompt("Enter source folder path: ")? else {
                    return Ok(None);
                };
                let Some(destination) = self.prompt("Enter destination folder path: ")? else {
                    return Ok(None);
                };
                Task::MoveFiles {
                    source: PathBuf::from(source),
                    destination: PathBuf::from(destination),
                }
            }
            TaskChoice::ExtractEmails => {
                let emails = &self.app.config().emails;
                Task::ExtractEmails {
                    input: emails.input_file.clone(),
                    output: emails.output_file.clone(),
                }
            }
            TaskChoice::ScrapeTitle => {
                let Some(url) = self.prompt("Enter website URL (https://...): ")? else {
                    return Ok(None);
                };
                Task::ScrapeTitle { url }
            }
        };

        Ok(Some(task))
    }

    fn execute(&mut self, task: &Task) -> Result<()> {
        let app = self.app;
        let formatter = app.output_formatter();

        let message = match app.run_task(task) {
            Ok(outcome) => {
                formatter.print_task_outcome(&mut self.output, &outcome)?;
                outcome.log_message()
            }
            Err(e) => {
                tracing::warn!(error = %e, "task failed");
                formatter.print_user_friendly_error(&mut self.output, &e)?;
                app.failure_message(task, &e)
            }
        };

        self.sink.record(&message)?;
        Ok(())
    }

    fn end_of_input(&mut self) -> Result<MenuState> {
        self.sink.record("Program exited (end of input)")?;
        self.state = MenuState::Exited;
        Ok(self.state)
    }
}
