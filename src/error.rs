// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Decode(String),
    Config(String),
    Navigation(NavigationError),
}

/// Specific error types for lightbox navigation misuse.
///
/// These are defensive guards: callers that only pass indices sourced from
/// existing items never hit either variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationError {
    /// The gallery resolved to zero items, so there is nothing to open and
    /// wraparound arithmetic is undefined.
    EmptyGallery,

    /// The requested logical index does not exist in the gallery.
    OutOfRange {
        /// The index that was requested.
        index: usize,
        /// The number of items in the gallery.
        count: usize,
    },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::EmptyGallery => write!(f, "Cannot open an empty gallery"),
            NavigationError::OutOfRange { index, count } => {
                write!(
                    f,
                    "Logical index {} out of range (gallery has {} items)",
                    index, count
                )
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Decode(e) => write!(f, "Decode Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Navigation(e) => write!(f, "Navigation Error: {}", e),
        }
    }
}

impl From<NavigationError> for Error {
    fn from(err: NavigationError) -> Self {
        Error::Navigation(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
