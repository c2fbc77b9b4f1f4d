//! Error kinds surfaced by Prompt Cooker.
//!
//! The `Display` text of each variant is the message shown to the user,
//! so every kind reads differently (credential vs. service vs. empty result).

/// Everything that can go wrong between the input box and the recipe book.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CookerError {
    /// Generation attempted with blank input. Raised before any network call.
    #[error("Please add an idea to the grill first.")]
    EmptyInput,

    /// No API key in the environment or the OS keychain, or the service rejected it.
    #[error("Invalid or missing API Key. Please check your kitchen's gas line (API key setup).")]
    MissingCredential,

    /// The service answered with blank or whitespace-only text.
    #[error("The AI failed to create a recipe. Try different ingredients.")]
    EmptyGeneration,

    /// Network failure, quota, non-success status or malformed response body.
    #[error("The AI service had a kitchen fire. Please check your ingredients and try again. ({0})")]
    ServiceUnavailable(String),

    /// A second generation was requested while one is still cooking.
    #[error("A prompt is already cooking. Wait for it to finish.")]
    GenerationInFlight,

    /// A share token could not be turned back into a recipe.
    #[error("Malformed recipe link: {0}")]
    MalformedRecipe(String),

    /// The persisted history could not be read. Recovered with an empty log.
    #[error("Failed to load history: {0}")]
    HistoryLoadFailure(String),

    /// No history entry carries the requested id.
    #[error("No recipe with id {0} in the recipe book")]
    UnknownHistoryItem(i64),

    /// The platform clipboard refused the write.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Reading or writing local storage failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CookerError {
    /// True for the kinds that are logged and recovered from rather than shown.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CookerError::MalformedRecipe(_) | CookerError::HistoryLoadFailure(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CookerError>;
