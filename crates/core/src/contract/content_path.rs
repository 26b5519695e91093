//! Content path type
//!
//! Documents live in a hierarchy addressed by absolute, slash-separated
//! paths. Path queries (subtree, children, breadcrumbs, navigation) all
//! derive their predicates from values of this type, so the grammar is
//! enforced before any path reaches a compiled plan.
//!
//! ## Validation
//!
//! Paths must:
//! - Start with `/`; the bare root `/` is valid
//! - Be at most 1024 bytes
//! - Have no trailing slash (except the root) and no empty segments
//! - Have no `.` or `..` segments
//! - Use only ASCII alphanumerics and `- _ . ~ @ +` within segments

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a content path in bytes
pub const MAX_PATH_LENGTH: usize = 1024;

/// Validated absolute document path
///
/// ## Examples
///
/// Valid paths:
/// - "/"
/// - "/site/news"
/// - "/site/news/2024-01-15_launch"
///
/// Invalid paths:
/// - "" (empty)
/// - "news" (relative)
/// - "/site//news" (empty segment)
/// - "/site/../etc" (relative segment)
/// - "/site/a%b" (invalid character)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentPath(String);

/// Error when validating a content path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPathError {
    /// Path is empty
    Empty,
    /// Path does not start with `/`
    NotAbsolute,
    /// Path exceeds maximum length
    TooLong {
        /// Actual length of the path
        length: usize,
        /// Maximum allowed length
        max: usize,
    },
    /// Path has a trailing slash or an empty segment
    EmptySegment,
    /// Path contains a `.` or `..` segment
    RelativeSegment(String),
    /// Path contains an invalid character
    InvalidChar {
        /// The invalid character
        char: char,
        /// Byte position of the invalid character
        position: usize,
    },
}

impl fmt::Display for ContentPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentPathError::Empty => write!(f, "path cannot be empty"),
            ContentPathError::NotAbsolute => write!(f, "path must start with '/'"),
            ContentPathError::TooLong { length, max } => {
                write!(f, "path too long: {} bytes (max {})", length, max)
            }
            ContentPathError::EmptySegment => {
                write!(f, "path cannot contain empty segments or a trailing slash")
            }
            ContentPathError::RelativeSegment(seg) => {
                write!(f, "path cannot contain relative segment '{}'", seg)
            }
            ContentPathError::InvalidChar { char, position } => {
                write!(f, "invalid character '{}' at byte {}", char, position)
            }
        }
    }
}

impl std::error::Error for ContentPathError {}

impl ContentPath {
    /// Create a new ContentPath, validating the input
    ///
    /// # Errors
    ///
    /// Returns `ContentPathError` if the path is invalid.
    pub fn new(path: impl Into<String>) -> Result<Self, ContentPathError> {
        let path = path.into();
        Self::validate(&path)?;
        Ok(ContentPath(path))
    }

    /// Create a ContentPath without validation
    ///
    /// The caller must ensure the path is valid. Use `new()` for untrusted
    /// input.
    pub fn new_unchecked(path: impl Into<String>) -> Self {
        ContentPath(path.into())
    }

    /// The root path `/`
    pub fn root() -> Self {
        ContentPath("/".to_string())
    }

    /// Validate a content path
    pub fn validate(path: &str) -> Result<(), ContentPathError> {
        if path.is_empty() {
            return Err(ContentPathError::Empty);
        }

        if !path.starts_with('/') {
            return Err(ContentPathError::NotAbsolute);
        }

        if path.len() > MAX_PATH_LENGTH {
            return Err(ContentPathError::TooLong {
                length: path.len(),
                max: MAX_PATH_LENGTH,
            });
        }

        // Bare root is valid and has no segments to check
        if path == "/" {
            return Ok(());
        }

        if path.ends_with('/') {
            return Err(ContentPathError::EmptySegment);
        }

        let mut position = 1;
        for segment in path[1..].split('/') {
            if segment.is_empty() {
                return Err(ContentPathError::EmptySegment);
            }
            if segment == "." || segment == ".." {
                return Err(ContentPathError::RelativeSegment(segment.to_string()));
            }
            for (offset, ch) in segment.char_indices() {
                if !Self::is_valid_char(ch) {
                    return Err(ContentPathError::InvalidChar {
                        char: ch,
                        position: position + offset,
                    });
                }
            }
            position += segment.len() + 1;
        }

        Ok(())
    }

    /// Check if a character is valid inside a path segment
    #[inline]
    fn is_valid_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~' | '@' | '+')
    }

    /// Get the path as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether this is the root path
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Number of segments; the root has depth 0
    pub fn depth(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.0.matches('/').count()
        }
    }

    /// Iterate over the path's segments, outermost first
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Parent path; `None` for the root
    pub fn parent(&self) -> Option<ContentPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(ContentPath::root()),
            Some(idx) => Some(ContentPath(self.0[..idx].to_string())),
            None => None,
        }
    }

    /// All non-root prefixes of this path, outermost first, including self
    ///
    /// `/a/b/c` yields `/a`, `/a/b`, `/a/b/c`. The root yields nothing.
    pub fn ancestry(&self) -> Vec<ContentPath> {
        let mut out = Vec::new();
        let mut end = 0;
        while let Some(next) = self.0[end + 1..].find('/') {
            end = end + 1 + next;
            out.push(ContentPath(self.0[..end].to_string()));
        }
        if !self.is_root() {
            out.push(self.clone());
        }
        out
    }

    /// Append one segment, validating the result
    ///
    /// # Errors
    ///
    /// Returns `ContentPathError` if the joined path is invalid.
    pub fn join(&self, segment: &str) -> Result<ContentPath, ContentPathError> {
        let joined = if self.is_root() {
            format!("/{}", segment)
        } else {
            format!("{}/{}", self.0, segment)
        };
        ContentPath::new(joined)
    }

    /// Whether `self` is an ancestor of `other` (strict; a path is not its
    /// own ancestor)
    pub fn is_ancestor_of(&self, other: &ContentPath) -> bool {
        if self == other {
            return false;
        }
        if self.is_root() {
            return true;
        }
        other.0.starts_with(&self.0) && other.0.as_bytes().get(self.0.len()) == Some(&b'/')
    }
}

impl AsRef<str> for ContentPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ContentPath {
    type Error = ContentPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ContentPath::new(value)
    }
}

impl TryFrom<&str> for ContentPath {
    type Error = ContentPathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ContentPath::new(value)
    }
}

// ============================================================================
// Tests
// ============================================================================
