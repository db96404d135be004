//! Output formatting module for bucketkey
//!
//! Colored status lines while provisioning, and the final credentials report.

use bucketkey::provision::{ProvisionResult, ProvisionStep, StepObserver};
use bucketkey::remote::RemoteError;
use bucketkey::report;
use colored::Colorize;
use std::time::{Duration, Instant};

/// Status of a provisioning step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step completed and created its resource
    Created,
    /// Step failed
    Failed,
}

impl StepStatus {
    /// Get the colored string representation
    pub fn colored_string(&self) -> String {
        match self {
            StepStatus::Created => "created".yellow().to_string(),
            StepStatus::Failed => "failed".red().bold().to_string(),
        }
    }

    /// Get the plain string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Created => "created",
            StepStatus::Failed => "failed",
        }
    }
}

/// Output formatter for different output modes
pub struct OutputFormatter {
    /// Use colored output
    use_color: bool,
    /// JSON output mode
    json_mode: bool,
    /// Verbosity level
    verbosity: u8,
    /// Start time for duration calculations
    start_time: Instant,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(use_color: bool, json_mode: bool, verbosity: u8) -> Self {
        // Respect NO_COLOR environment variable
        let use_color = use_color && std::env::var("NO_COLOR").is_err();
        colored::control::set_override(use_color);

        Self {
            use_color,
            json_mode,
            verbosity,
            start_time: Instant::now(),
        }
    }

    /// Print a banner/header
    pub fn banner(&self, title: &str) {
        if self.json_mode {
            return;
        }

        let line = "=".repeat(title.len() + 4);
        if self.use_color {
            println!("\n{}", line.bright_blue());
            println!("{}", format!("  {}  ", title).bright_blue().bold());
            println!("{}\n", line.bright_blue());
        } else {
            println!("\n{}", line);
            println!("  {}  ", title);
            println!("{}\n", line);
        }
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        if self.json_mode {
            return;
        }

        if self.use_color {
            println!("\n{}", title.cyan().bold());
            println!("{}", "-".repeat(title.len()).cyan());
        } else {
            println!("\n{}", title);
            println!("{}", "-".repeat(title.len()));
        }
    }

    /// Print a step header
    pub fn step_header(&self, step: ProvisionStep) {
        if self.json_mode {
            return;
        }

        let header = format!("STEP [{}]", step);
        let stars = "*".repeat(60_usize.saturating_sub(header.len()));

        if self.use_color {
            println!("\n{} {}", header.bright_white().bold(), stars.bright_black());
        } else {
            println!("\n{} {}", header, stars);
        }
    }

    /// Print step result
    pub fn step_result(&self, status: StepStatus, detail: &str) {
        if self.json_mode {
            return;
        }

        let status_str = if self.use_color {
            status.colored_string()
        } else {
            status.as_str().to_string()
        };

        println!("{}: [{}]", status_str, detail);
    }

    /// Print the credentials report
    pub fn report(&self, result: &ProvisionResult) -> serde_json::Result<()> {
        if self.json_mode {
            println!("{}", report::render_json(result)?);
            return Ok(());
        }

        self.section("Add these lines to your .env file");
        print!("{}", report::render_env(result));

        let duration = format_duration(self.start_time.elapsed());
        if self.use_color {
            println!(
                "\n{} {}",
                "Provisioning took".bright_black(),
                duration.bright_white()
            );
            println!("{}", "Provisioning completed successfully.".green().bold());
        } else {
            println!("\nProvisioning took {}", duration);
            println!("Provisioning completed successfully.");
        }

        Ok(())
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.json_mode {
            let err = serde_json::json!({
                "type": "error",
                "message": message
            });
            eprintln!("{}", err);
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "ERROR:".red().bold(), message);
        } else {
            eprintln!("ERROR: {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.json_mode {
            let warn = serde_json::json!({
                "type": "warning",
                "message": message
            });
            eprintln!("{}", warn);
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "WARNING:".yellow().bold(), message);
        } else {
            eprintln!("WARNING: {}", message);
        }
    }

    /// Print a hint message
    pub fn hint(&self, message: &str) {
        if self.json_mode {
            let hint = serde_json::json!({
                "type": "hint",
                "message": message
            });
            eprintln!("{}", hint);
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "HINT:".cyan().bold(), message);
        } else {
            eprintln!("HINT: {}", message);
        }
    }

    /// Print an info message (respects verbosity)
    pub fn info(&self, message: &str) {
        if self.json_mode {
            return;
        }

        if self.use_color {
            println!("{}", message.bright_white());
        } else {
            println!("{}", message);
        }
    }

    /// Print a debug message (only at -vv and above)
    pub fn debug(&self, message: &str) {
        if self.json_mode || self.verbosity < 2 {
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "DEBUG:".bright_black(), message.bright_black());
        } else {
            eprintln!("DEBUG: {}", message);
        }
    }
}

impl StepObserver for OutputFormatter {
    fn step_started(&self, step: ProvisionStep) {
        self.step_header(step);
    }

    fn step_succeeded(&self, _step: ProvisionStep, detail: &str) {
        self.step_result(StepStatus::Created, detail);
    }

    fn step_failed(&self, _step: ProvisionStep, error: &RemoteError) {
        self.step_result(StepStatus::Failed, &error.to_string());
    }
}

/// Format a duration for display
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}.{:03}s", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_status_strings() {
        assert_eq!(StepStatus::Created.as_str(), "created");
        assert_eq!(StepStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.500s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }
}
