use thiserror::Error;

/// Errors raised by [`Stopwatch`](crate::Stopwatch) queries and formatting.
#[derive(Error, Debug)]
pub enum StopwatchError {
    /// The region has not been exited yet, so there is no duration.
    #[error("stopwatch has not been measured yet")]
    NotMeasured,

    /// Each stopwatch measures exactly one region.
    #[error("stopwatch has already been started")]
    AlreadyStarted,

    #[error("invalid message template {template:?}: {source}")]
    Template {
        template: String,
        #[source]
        source: TemplateError,
    },

    #[error("failed to write stopwatch output: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a message template cannot be rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unmatched '{{' at byte {position}")]
    UnmatchedOpen { position: usize },

    #[error("single '}}' encountered at byte {position}")]
    UnmatchedClose { position: usize },

    #[error("unknown field {0:?}")]
    UnknownField(String),

    #[error("positional field {0} is out of range")]
    PositionalOutOfRange(usize),

    #[error("cannot switch between automatic and manual field numbering")]
    MixedNumbering,

    #[error("unsupported conversion {0:?}")]
    UnsupportedConversion(String),

    #[error("invalid format spec {0:?}")]
    InvalidSpec(String),
}

pub type Result<T> = std::result::Result<T, StopwatchError>;
