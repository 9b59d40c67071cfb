//! Structured error taxonomy for the interpreter and C front-end.

use std::fmt;

/// Where in the source an error occurred.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Site {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Every way the interpreter or C front-end can fail.
#[derive(Debug, thiserror::Error)]
pub enum InterpError {
    #[error("{site}: unterminated string starting near {word:?}")]
    UnterminatedString { word: String, site: Site },

    #[error("{site}: unknown word {word:?}")]
    UnknownWord { word: String, site: Site },

    #[error("{site}: malformed definition: {reason}")]
    MalformedDefinition { reason: String, site: Site },

    #[error("{site}: stack underflow in {word:?}: needed {needed}, had {had}")]
    Underflow {
        word: String,
        needed: usize,
        had: usize,
        site: Site,
    },

    #[error("{site}: type error in {word:?}: {reason}")]
    TypeError {
        word: String,
        reason: String,
        site: Site,
    },

    #[error("{site}: cannot rebind constant {name:?}")]
    ConstRebind { name: String, site: Site },

    #[error("{site}: PARAM called with no enclosing caller value")]
    NoCallerValue { site: Site },

    #[error("I/O error: {reason}")]
    Io { reason: String },

    #[error("{site}: operation {word:?} requires unsafe operations to be enabled")]
    PermissionDenied { word: String, site: Site },

    #[error("{site}: {reason}")]
    Runtime { reason: String, site: Site },

    #[error("{site}: {name}: {message}")]
    Raised {
        name: String,
        message: String,
        site: Site,
    },

    #[error("compilation failed with {} error(s):\n{}", .0.len(), join_lines(.0))]
    Compilation(Vec<String>),

    #[error("nested in {site}: {source}")]
    Nested {
        site: Site,
        #[source]
        source: Box<InterpError>,
    },
}

fn join_lines(lines: &[String]) -> String {
    lines.join("\n")
}

impl InterpError {
    /// Wrap this error with an additional call-site annotation, as happens when
    /// a nested `run` unwinds through an outer one.
    pub fn annotate(self, site: Site) -> InterpError {
        InterpError::Nested {
            site,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, InterpError>;
