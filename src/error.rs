use thiserror::Error;

/// Errors raised while reading a color from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The text is not `#` followed by six hex digits.
    #[error("invalid color format: {0:?} (expected #rrggbb)")]
    InvalidColorFormat(String),
}

/// Errors raised while turning a palette into a link or an export document.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Please generate a palette first.")]
    EmptyPalette,
    #[error("invalid origin: {0}")]
    InvalidOrigin(#[from] url::ParseError),
}
