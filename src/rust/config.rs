use crate::classifier::ClassifierError;

/// Tunables for fitting the TF-IDF vectorizer and the logistic regression.
///
/// The defaults reproduce the reference pipeline: up to 5000 unigram and
/// bigram features, at most 1000 optimizer iterations and unit inverse
/// regularization strength.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Upper bound on the vocabulary size.
    pub max_features: usize,
    /// Inclusive `(min_n, max_n)` range of word n-grams.
    pub ngram_range: (usize, usize),
    /// Iteration cap for gradient descent.
    pub max_iter: usize,
    /// Stop once every gradient component is below this value.
    pub tolerance: f64,
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Inverse L2 regularization strength (`C`). Larger means weaker.
    pub regularization: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            ngram_range: (1, 2),
            max_iter: 1000,
            tolerance: 1e-4,
            learning_rate: 1.0,
            regularization: 1.0,
        }
    }
}

impl PipelineConfig {
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.ngram_range = (min_n, max_n);
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_regularization(mut self, c: f64) -> Self {
        self.regularization = c;
        self
    }

    /// Checks that the configuration can be used to fit a pipeline.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        let invalid = |msg: String| Err(ClassifierError::ConfigurationError(msg));

        if self.max_features == 0 {
            return invalid("max_features must be at least 1".into());
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return invalid(format!("Invalid n-gram range ({}, {})", min_n, max_n));
        }
        if self.max_iter == 0 {
            return invalid("max_iter must be at least 1".into());
        }
        for (name, value) in [
            ("tolerance", self.tolerance),
            ("learning_rate", self.learning_rate),
            ("regularization", self.regularization),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return invalid(format!("{} must be a positive number, got {}", name, value));
            }
        }
        Ok(())
    }
}
