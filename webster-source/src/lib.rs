//! Source code representation and syntax error management.

use console::style;
use std::{cell::RefCell, error, fmt, ops::Range};

/// Represents source code.
pub struct Source<'a> {
    /// Original source code.
    pub content: &'a str,
    /// Accumulated syntax errors.
    pub errors: ErrorReporter,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            errors: ErrorReporter::new(),
        }
    }

    /// Returns `true` if `Source` has no accumulated errors. Returns `false` otherwise.
    pub fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the text covered by `span`, clamped to the bounds of the source.
    pub fn slice(&self, span: Range<usize>) -> &'a str {
        let end = span.end.min(self.content.len());
        let start = span.start.min(end);
        self.content.get(start..end).unwrap_or("")
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// Represents a syntax error (parse time error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    message: String,
    span: Range<usize>,
}

impl SyntaxError {
    /// Create a new syntax error with the specified `message` and `span`.
    pub fn new(message: impl ToString, span: Range<usize>) -> Self {
        Self {
            message: message.to_string(),
            span,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte range of the offending token.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{message} at position {position}",
            message = self.message,
            position = self.span.start
        )
    }
}

impl error::Error for SyntaxError {}

/// Manages all the errors.
pub struct ErrorReporter {
    errors: RefCell<Vec<SyntaxError>>,
}

impl ErrorReporter {
    /// Create an empty `ErrorReporter`.
    pub fn new() -> Self {
        Self {
            errors: RefCell::new(Vec::new()),
        }
    }

    /// Adds an error to the `ErrorReporter`.
    /// This method uses the interior mutability pattern. This does not require mutability for ergonomics.
    pub fn add_error(&self, error: SyntaxError) {
        // This should be the only place where self.errors is borrowed mutably.
        self.errors.borrow_mut().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    /// Returns a copy of the accumulated errors, in the order they were reported.
    pub fn errors(&self) -> Vec<SyntaxError> {
        self.errors.borrow().clone()
    }

    /// Returns the human readable messages of the accumulated errors.
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .borrow()
            .iter()
            .map(|error| error.message.clone())
            .collect()
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<SyntaxError>> for ErrorReporter {
    fn from(errors: Vec<SyntaxError>) -> Self {
        Self {
            errors: RefCell::new(errors),
        }
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors.borrow();
        for error in errors.iter() {
            writeln!(f, "{}: {}", style("ERROR").red().bold(), error)?;
        }

        Ok(())
    }
}
