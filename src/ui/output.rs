use crate::error::{TaskError, UserFriendlyError};
use crate::TaskOutcome;
use console::{style, Emoji, Term};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static PIN: Emoji = Emoji("📌 ", "> ");
static WAVE: Emoji = Emoji("👋 ", "");

/// Renders menu screens, task results and errors into a caller-supplied writer.
pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn success(&self, out: &mut dyn Write, message: &str) -> io::Result<()> {
        match self.mode {
            OutputMode::Human => self.write_human_message(out, MessageType::Success, message),
            OutputMode::Json => self.write_json_message(out, "success", message),
            OutputMode::Plain => writeln!(out, "SUCCESS: {}", message),
        }
    }

    pub fn error(&self, out: &mut dyn Write, message: &str) -> io::Result<()> {
        match self.mode {
            OutputMode::Human => self.write_human_message(out, MessageType::Error, message),
            OutputMode::Json => self.write_json_message(out, "error", message),
            OutputMode::Plain => writeln!(out, "ERROR: {}", message),
        }
    }

    pub fn warning(&self, out: &mut dyn Write, message: &str) -> io::Result<()> {
        if !self.should_show_message(0) {
            return Ok(());
        }

        match self.mode {
            OutputMode::Human => self.write_human_message(out, MessageType::Warning, message),
            OutputMode::Json => self.write_json_message(out, "warning", message),
            OutputMode::Plain => writeln!(out, "WARNING: {}", message),
        }
    }

    pub fn info(&self, out: &mut dyn Write, message: &str) -> io::Result<()> {
        if !self.should_show_message(1) {
            return Ok(());
        }

        match self.mode {
            OutputMode::Human => self.write_human_message(out, MessageType::Info, message),
            OutputMode::Json => self.write_json_message(out, "info", message),
            OutputMode::Plain => writeln!(out, "INFO: {}", message),
        }
    }

    /// Banner followed by the numbered options. JSON mode emits one object.
    pub fn print_menu(
        &self,
        out: &mut dyn Write,
        title: &str,
        options: &[String],
        width: usize,
    ) -> io::Result<()> {
        if self.mode == OutputMode::Json {
            return self.write_json_object(
                out,
                &serde_json::json!({
                    "type": "menu",
                    "title": title.trim(),
                    "options": options
                }),
            );
        }

        let rule = "=".repeat(width);
        writeln!(out, "\n{}", rule)?;
        writeln!(out, "{}", title)?;
        writeln!(out, "{}", rule)?;
        for (number, option) in options.iter().enumerate() {
            writeln!(out, "{}. {}", number + 1, option)?;
        }
        Ok(())
    }

    /// Question text left on the same line as the answer, except in JSON mode.
    pub fn prompt(&self, out: &mut dyn Write, text: &str) -> io::Result<()> {
        match self.mode {
            OutputMode::Json => self.write_json_object(
                out,
                &serde_json::json!({
                    "type": "prompt",
                    "message": text.trim()
                }),
            )?,
            _ => write!(out, "{}", text)?,
        }
        out.flush()
    }

    pub fn print_user_friendly_error(
        &self,
        out: &mut dyn Write,
        error: &TaskError,
    ) -> io::Result<()> {
        self.error(out, &error.user_message())?;

        let Some(suggestion) = error.suggestion() else {
            return Ok(());
        };

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    writeln!(
                        out,
                        "{}{}",
                        INFO,
                        style(&format!("Suggestion: {}", suggestion)).cyan()
                    )
                } else {
                    writeln!(out, "Suggestion: {}", suggestion)
                }
            }
            OutputMode::Json => self.write_json_object(
                out,
                &serde_json::json!({
                    "type": "suggestion",
                    "message": suggestion
                }),
            ),
            OutputMode::Plain => writeln!(out, "SUGGESTION: {}", suggestion),
        }
    }

    pub fn print_task_outcome(
        &self,
        out: &mut dyn Write,
        outcome: &TaskOutcome,
    ) -> io::Result<()> {
        if self.mode == OutputMode::Json {
            return self.write_json_object(
                out,
                &serde_json::json!({
                    "type": "outcome",
                    "outcome": outcome,
                    "timestamp": chrono::Utc::now().to_rfc3339()
                }),
            );
        }

        match outcome {
            TaskOutcome::Moved(report) => {
                self.success(
                    out,
                    &format!(
                        "{} {} file(s) moved successfully",
                        report.moved,
                        report.extension_label()
                    ),
                )?;
                for name in &report.skipped {
                    self.warning(out, &format!("Skipped {}, already in destination", name))?;
                }
            }
            TaskOutcome::Extracted(report) => {
                self.success(out, &format!("{} unique email(s) extracted", report.count))?;
                self.info(out, &format!("Saved to {}", report.output_file.display()))?;
            }
            TaskOutcome::Scraped(scraped) => {
                self.success(out, "Website title scraped successfully")?;
                match self.mode {
                    OutputMode::Human => writeln!(out, "{}Title: {}", PIN, scraped.title)?,
                    _ => writeln!(out, "TITLE: {}", scraped.title)?,
                }
            }
        }
        Ok(())
    }

    pub fn print_farewell(&self, out: &mut dyn Write) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        match self.mode {
            OutputMode::Human => writeln!(out, "\n{}Exiting program. Thank you!", WAVE),
            OutputMode::Json => self.write_json_message(out, "exit", "Exiting program"),
            OutputMode::Plain => writeln!(out, "EXIT"),
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn write_human_message(
        &self,
        out: &mut dyn Write,
        msg_type: MessageType,
        message: &str,
    ) -> io::Result<()> {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            writeln!(out, "{}{}", emoji, color_fn(message))
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };
            writeln!(out, "{} {}", prefix, message)
        }
    }

    fn write_json_message(
        &self,
        out: &mut dyn Write,
        level: &str,
        message: &str,
    ) -> io::Result<()> {
        self.write_json_object(
            out,
            &serde_json::json!({
                "type": "message",
                "level": level,
                "message": message,
                "timestamp": chrono::Utc::now().to_rfc3339()
            }),
        )
    }

    fn write_json_object(&self, out: &mut dyn Write, obj: &serde_json::Value) -> io::Result<()> {
        writeln!(
            out,
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}
