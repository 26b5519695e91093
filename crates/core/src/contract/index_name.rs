//! Index name type
//!
//! Index names (and storage keys) are embedded verbatim into generated
//! predicate text, so they carry the strictest grammar in the system.
//!
//! ## Validation
//!
//! Index names must:
//! - Be 1-128 bytes
//! - Start with a letter or underscore
//! - Contain only ASCII alphanumerics and underscores

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of an index name in bytes
pub const MAX_INDEX_NAME_LENGTH: usize = 128;

/// Validated index name
///
/// An `IndexName` is the only string type that the compiler will splice
/// into predicate text. Everything else is bound as a parameter.
///
/// ## Validation Rules
///
/// - Length: 1-128 bytes
/// - First character: `[a-zA-Z_]`
/// - Remaining characters: `[a-zA-Z0-9_]`
///
/// ## Examples
///
/// Valid names:
/// - "status"
/// - "effective_date"
/// - "_internal"
///
/// Invalid names:
/// - "" (empty)
/// - "1st" (starts with a digit)
/// - "has space"
/// - "name; drop"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexName(String);

/// Error when validating an index name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexNameError {
    /// Name is empty
    Empty,
    /// Name exceeds maximum length
    TooLong {
        /// Actual length of the name
        length: usize,
        /// Maximum allowed length
        max: usize,
    },
    /// Name contains invalid character
    InvalidChar {
        /// The invalid character
        char: char,
        /// Position of the invalid character
        position: usize,
    },
    /// Name starts with invalid character
    InvalidStart {
        /// The invalid starting character
        char: char,
    },
}

impl fmt::Display for IndexNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexNameError::Empty => write!(f, "index name cannot be empty"),
            IndexNameError::TooLong { length, max } => {
                write!(f, "index name too long: {} bytes (max {})", length, max)
            }
            IndexNameError::InvalidChar { char, position } => {
                write!(
                    f,
                    "invalid character '{}' at position {} (only alphanumeric and underscore allowed)",
                    char, position
                )
            }
            IndexNameError::InvalidStart { char } => {
                write!(
                    f,
                    "index name cannot start with '{}' (must start with a letter or underscore)",
                    char
                )
            }
        }
    }
}

impl std::error::Error for IndexNameError {}

impl IndexName {
    /// Create a new IndexName, validating the input
    ///
    /// # Errors
    ///
    /// Returns `IndexNameError` if the name is invalid.
    pub fn new(name: impl Into<String>) -> Result<Self, IndexNameError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(IndexName(name))
    }

    /// Create an IndexName without validation
    ///
    /// The caller must ensure the name is valid. Use `new()` for untrusted
    /// input.
    pub fn new_unchecked(name: impl Into<String>) -> Self {
        IndexName(name.into())
    }

    /// Validate an index name
    pub fn validate(name: &str) -> Result<(), IndexNameError> {
        if name.is_empty() {
            return Err(IndexNameError::Empty);
        }

        if name.len() > MAX_INDEX_NAME_LENGTH {
            return Err(IndexNameError::TooLong {
                length: name.len(),
                max: MAX_INDEX_NAME_LENGTH,
            });
        }

        let first = name.chars().next().unwrap();
        if !first.is_ascii_alphabetic() && first != '_' {
            return Err(IndexNameError::InvalidStart { char: first });
        }

        for (pos, ch) in name.chars().enumerate() {
            if !ch.is_ascii_alphanumeric() && ch != '_' {
                return Err(IndexNameError::InvalidChar {
                    char: ch,
                    position: pos,
                });
            }
        }

        Ok(())
    }

    /// Get the name as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for IndexName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for IndexName {
    type Error = IndexNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        IndexName::new(value)
    }
}

impl TryFrom<&str> for IndexName {
    type Error = IndexNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        IndexName::new(value)
    }
}

// ============================================================================
// Tests
// ============================================================================
