//! Error types for meshpick.

use thiserror::Error;

/// Reasons a pick can fail.
///
/// "Nothing under the cursor" is not an error; pickers report it as
/// `Ok(None)`. These variants cover invalid input and missing capabilities.
#[derive(Error, Debug)]
pub enum PickError {
    /// The face handed to a refinement call is not the session's last pick.
    #[error("face {given:?} does not match the last picked face {last:?}")]
    FaceMismatch {
        /// The face supplied by the caller.
        given: Option<u32>,
        /// The face recorded by the last successful face pick.
        last: Option<u32>,
    },

    /// The flat-color pick program could not be acquired.
    #[error("pick program unavailable: {0}")]
    ProgramUnavailable(String),

    /// A mesh property required for decoding is not defined.
    #[error("face property '{0}' not defined")]
    MissingProperty(String),

    /// The GPU backend failed while rendering or reading back.
    #[error("pick render error: {0}")]
    Render(String),

    /// Invalid configuration.
    #[error("invalid pick options: {0}")]
    InvalidOptions(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for pick operations.
pub type Result<T> = std::result::Result<T, PickError>;
