/// Result alias that carries the custom [`SortVizError`] type.
pub type Result<T> = std::result::Result<T, SortVizError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum SortVizError {
    /// User supplied input (array size, speed) was rejected before anything
    /// touched the array.
    #[error("invalid input: {0}")]
    Validation(String),
    /// An algorithm addressed a slot outside of the array. This is a defect in
    /// the algorithm and ends the run that hit it.
    #[error("index {index} out of bounds for array of length {len}")]
    Index { index: usize, len: usize },
    /// The note player could not open an output device.
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),
    /// Configuration or recording could not be (de)serialised.
    #[error("{0}")]
    Config(#[from] serde_json::Error),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Internal failure with no more specific variant, such as a poisoned
    /// lock or a panicked run thread.
    #[error("{0}")]
    Message(String),
}

impl SortVizError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    /// Creates a [`Validation`](Self::Validation) error.
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    /// Returns `true` for errors caused by rejected user input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<&str> for SortVizError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for SortVizError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
