//! Assembler errors

use pm4_spec::generation::UnknownGeneration;
use pm4_spec::Pm4Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("Syntax error at column {column}: {message}")]
    SyntaxError { column: usize, message: String },

    #[error("Unknown opcode: {0}")]
    UnknownOpcode(String),

    #[error("Unknown header flag: +{0}")]
    UnknownFlag(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Invalid directive: .{0}")]
    InvalidDirective(String),

    #[error(transparent)]
    UnknownGeneration(#[from] UnknownGeneration),

    #[error("No target generation; add a .gen directive before the first packet")]
    MissingGeneration,

    #[error(transparent)]
    Packet(#[from] Pm4Error),

    #[error("Line {line}: {source}")]
    Line {
        line: usize,
        source: Box<AssemblerError>,
    },
}

impl AssemblerError {
    pub(crate) fn at_line(self, line: usize) -> Self {
        AssemblerError::Line {
            line,
            source: Box::new(self),
        }
    }

    /// Source line (1-based) the error was reported on, if known
    pub fn line(&self) -> Option<usize> {
        match self {
            AssemblerError::Line { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The underlying error with any line context stripped
    pub fn root(&self) -> &AssemblerError {
        match self {
            AssemblerError::Line { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
