/// Represents the different types of errors that can occur in the referral classifier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    /// The pipeline could not be built: empty corpus, a category without
    /// examples, an empty vocabulary or an invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// Error occurred due to invalid input parameters
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Error occurred while making predictions
    #[error("Prediction error: {0}")]
    PredictionError(String),
}

impl ClassifierError {
    /// True for errors that can only happen while building the pipeline.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigurationError(_))
    }
}
