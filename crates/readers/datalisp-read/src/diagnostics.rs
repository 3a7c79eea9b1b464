//! Positioned messages collected while reading.

use std::fmt;

/// Line and column in the source, both starting at 1.
///
/// A line of 0 marks a message with no source position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line: u32,
    pub column: u32,
    pub level: Level,
    pub message: String,
}

impl Diagnostic {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}: {}", self.level, self.message)
        } else {
            write!(f, "{}:{}: {}: {}", self.line, self.column, self.level, self.message)
        }
    }
}

/// Ordered diagnostics. Problems are counted, never raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, position: Position, level: Level, message: impl Into<String>) {
        self.items.push(Diagnostic {
            line: position.line,
            column: position.column,
            level,
            message: message.into(),
        });
    }

    pub fn error(&mut self, position: Position, message: impl Into<String>) {
        self.push(position, Level::Error, message);
    }

    pub fn warning(&mut self, position: Position, message: impl Into<String>) {
        self.push(position, Level::Warning, message);
    }

    pub fn info(&mut self, position: Position, message: impl Into<String>) {
        self.push(position, Level::Info, message);
    }

    pub fn error_count(&self) -> usize {
        self.count(Level::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Level::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.items.iter().find(|d| d.level == Level::Error)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    /// Forward every diagnostic to `tracing` at its level.
    pub fn emit(&self) {
        for d in &self.items {
            match d.level {
                Level::Debug => tracing::debug!(line = d.line, column = d.column, "{}", d.message),
                Level::Info => tracing::info!(line = d.line, column = d.column, "{}", d.message),
                Level::Warning => tracing::warn!(line = d.line, column = d.column, "{}", d.message),
                Level::Error => tracing::error!(line = d.line, column = d.column, "{}", d.message),
            }
        }
    }

    fn count(&self, level: Level) -> usize {
        self.items.iter().filter(|d| d.level == level).count()
    }
}

/// Summary line: error count and the first error.
impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_error() {
            Some(first) => write!(f, "{} error(s), first at {first}", self.error_count()),
            None => write!(f, "{} diagnostic(s), no errors", self.len()),
        }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_level() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warning(Position::new(1, 1), "w");
        diagnostics.error(Position::new(2, 3), "first");
        diagnostics.error(Position::new(4, 1), "second");
        diagnostics.info(Position::default(), "i");

        assert_eq!(diagnostics.len(), 4);
        assert_eq!(diagnostics.error_count(), 2);
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(diagnostics.first_error().map(|d| d.message.as_str()), Some("first"));
    }

    #[test]
    fn test_display() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error(Position::new(2, 3), "invalid character '#'");
        assert_eq!(
            diagnostics.to_string(),
            "1 error(s), first at 2:3: error: invalid character '#'"
        );

        let mut unpositioned = Diagnostics::new();
        unpositioned.info(Position::default(), "hello");
        assert_eq!(unpositioned.iter().next().map(ToString::to_string).as_deref(), Some("info: hello"));
    }
}
