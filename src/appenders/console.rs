//! Console sink implementation

use crate::core::{CallKind, Result, Sink};
use std::io::Write;

pub struct ConsoleSink {
    #[cfg_attr(not(feature = "console"), allow(dead_code))]
    use_colors: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { use_colors: false }
    }

    /// Color each line by its kind; needs the `console` feature
    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn paint(&self, line: &str) -> String {
        #[cfg(feature = "console")]
        if self.use_colors {
            use colored::Colorize;
            if let Some(kind) = kind_of(line) {
                return line.color(kind.color_code()).to_string();
            }
        }
        line.to_string()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let output = self.paint(line);
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", output)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Kind field of a rendered line (second `|` separated field)
pub fn kind_of(line: &str) -> Option<CallKind> {
    line.split('|').nth(1)?.parse().ok()
}
