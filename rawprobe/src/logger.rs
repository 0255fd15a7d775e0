#[cfg(feature = "tui")]
use core::time::Duration;
use std::{
    borrow::Cow,
    fmt::Display,
};

use colored::Colorize;
use indicatif::{
    ProgressBar,
    ProgressStyle,
};

/// Diagnostics of the probe. Messages are drawn above a spinner on stderr
/// or written to stderr directly if there is no terminal to draw on.
pub struct Logger {
    bar: ProgressBar,
    running: bool,
    prefix: Option<String>,
}

#[cfg(feature = "tui")]
const ANIMATION: &[&str; 9] = &[".  ", ".. ", "...", " ..", "  .", " ..", "...", "..", ""];

#[cfg(not(feature = "tui"))]
const ANIMATION: &[&str; 2] = &["...", ""];

impl Logger {
    pub fn spinner() -> Self {
        let bar = ProgressBar::new_spinner();
        let style = match ProgressStyle::with_template("{prefix:.magenta/red} {msg} {spinner}") {
            Ok(style) => style.tick_strings(ANIMATION),
            Err(_) => ProgressStyle::default_spinner(),
        };
        bar.set_style(style);
        bar.set_prefix("[probe]");

        Self {
            bar,
            running: false,
            prefix: None,
        }
    }

    pub(crate) fn set_prefix<S: Into<String>>(&mut self, prefix: S) {
        self.prefix = Some(prefix.into());
    }

    pub(crate) fn clear_prefix(&mut self) {
        self.prefix = None;
    }

    pub fn set_title(&mut self, title: impl Into<Cow<'static, str>>) {
        #[cfg(feature = "tui")]
        if !self.running {
            self.bar.enable_steady_tick(Duration::from_millis(100));
            self.running = true;
        }
        self.bar.set_message(title.into());
    }

    /// Hide the spinner while `f` writes to the terminal
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.bar.finish_and_clear();
        }
    }

    fn emit<L: Display, S: AsRef<str>>(&self, level: L, msg: S) {
        let line = if let Some(prefix) = &self.prefix {
            format!("{} {}{}{} {}", level, "(".bold(), prefix.bold(), ")".bold(), msg.as_ref())
        } else {
            format!("{} {}", level, msg.as_ref())
        };

        if self.bar.is_hidden() {
            eprintln!("{}", line);
        } else {
            self.bar.println(line);
        }
    }

    pub fn info<S: AsRef<str>>(&self, msg: S) {
        self.emit("[probe::INFO]".blue().bold(), msg);
    }

    pub fn warning<S: AsRef<str>>(&self, msg: S) {
        self.emit("[probe::WARN]".yellow().bold(), msg);
    }

    pub fn debug<S: AsRef<str>>(&self, _msg: S) {
        #[cfg(debug_assertions)]
        {
            self.emit("[probe::DEBUG]".black().on_white(), _msg);
        }
    }

    pub fn error<S: AsRef<str>>(&self, msg: S) {
        self.emit("[probe::ERROR]".red().bold(), msg);
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore]
    fn test_style() {
        let mut logger = Logger::spinner();
        logger.set_title("TITLE HERE");
        logger.info("info");
        logger.warning("warning");
        logger.debug("debug");
        logger.error("error");
        logger.set_prefix("open");
        logger.error("with prefix");
        logger.clear_prefix();

        std::thread::sleep(std::time::Duration::from_secs(5));
    }
}
