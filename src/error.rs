//! Error types for rs-readability.
//!
//! Parsing itself never fails; recoverable markup problems are reported as
//! [`ParseDiagnostic`](crate::parser::ParseDiagnostic)s next to a usable
//! tree. The errors below are the only ways an operation gives up.

/// Error type for parsing and extraction operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The parser hit its element ceiling. `count` is the number of
    /// elements seen when it stopped.
    #[error("Document too large; parsing stopped after {count} elements")]
    DocumentTooLarge { count: usize },

    /// The tree handed to extraction has more elements than
    /// `max_elems_to_parse` allows.
    #[error("Aborting parsing document; {count} elements found")]
    TooManyElements { count: usize },

    /// Every extraction attempt produced less text than `char_threshold`.
    #[error("No readable content found")]
    NotReadable,
}

/// Result type alias for parsing and extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::TooManyElements { count: 2 }.to_string(),
            "Aborting parsing document; 2 elements found"
        );
        assert_eq!(Error::NotReadable.to_string(), "No readable content found");
    }
}
