//! Error types and reporting

use crate::interp::RuntimeError;
use crate::span::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure between reading source text and producing a value
#[derive(Debug, Error)]
pub enum Error {
    #[error("Lexer error at {span}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span}: {message}")]
    Parser { message: String, span: Span },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer { span, .. } | Self::Parser { span, .. } => Some(*span),
            Self::Io { .. } | Self::Runtime(_) => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Lexer { message, .. } | Self::Parser { message, .. } | Self::Io { message } => {
                message
            }
            Self::Runtime(err) => &err.message,
        }
    }

    /// True when the reader ran out of input in the middle of a form
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Parser { message, .. } if message.starts_with("unexpected end of input"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

/// Report error with ariadne
///
/// Reader errors get a labelled source excerpt; runtime and IO errors are a
/// single line since they carry no location.
pub fn report_error(filename: &str, source: &str, error: &Error) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let kind = match error {
        Error::Lexer { .. } => "Lexer",
        Error::Parser { .. } => "Parser",
        Error::Io { .. } => "IO",
        Error::Runtime(_) => {
            eprintln!("{error}");
            return;
        }
    };

    let report = if let Some(span) = error.span() {
        let range: std::ops::Range<usize> = span.into();
        Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(format!("{kind} error"))
            .with_label(
                Label::new((filename, range))
                    .with_message(error.message())
                    .with_color(Color::Red),
            )
            .finish()
    } else {
        Report::build(ReportKind::Error, (filename, 0..0))
            .with_message(format!("{kind} error: {filename}: {}", error.message()))
            .finish()
    };

    if report.eprint((filename, Source::from(source))).is_err() {
        eprintln!("{error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_error_display() {
        let err = Error::lexer("unexpected character: \"\\\"\"", Span::new(3, 4));
        assert!(format!("{err}").starts_with("Lexer error at 3..4"));
        assert_eq!(err.span(), Some(Span::new(3, 4)));
    }

    #[test]
    fn test_runtime_error_is_transparent() {
        let err: Error = RuntimeError::unbound_symbol("foo").into();
        assert_eq!(format!("{err}"), "Runtime error: unbound symbol: foo");
        assert_eq!(err.message(), "unbound symbol: foo");
        assert!(err.span().is_none());
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.slip");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.message().contains("missing.slip"));
    }

    #[test]
    fn test_report_io_error_without_source() {
        let err: Error = std::fs::read_to_string("no/such/file.slip").unwrap_err().into();
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.span(), None);
        report_error("no/such/file.slip", "", &err);
    }

    #[test]
    fn test_is_incomplete() {
        let err = Error::parser("unexpected end of input", Span::point(4));
        assert!(err.is_incomplete());
        assert!(!Error::parser("unexpected token `)`", Span::new(0, 1)).is_incomplete());
    }
}
