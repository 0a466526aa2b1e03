mod category;
#[allow(clippy::module_inception)]
mod classifier;
mod error;
mod model;
mod utils;
mod vectorizer;
mod builder;

pub use builder::ClassifierBuilder;
pub use category::Category;
pub use classifier::{Classifier, Prediction};
pub use error::ClassifierError;
pub use model::{FitOptions, LogisticRegression};
pub use vectorizer::{is_stop_word, TfidfVectorizer};

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ClassifierInfo {
    /// Number of classes the classifier is trained on
    pub num_classes: usize,
    /// Labels of the classes, in enumeration order
    pub class_labels: Vec<String>,
    /// Number of distinct terms in the fitted vocabulary
    pub vocabulary_size: usize,
    /// Number of labeled examples the classifier was fitted on
    pub num_examples: usize,
    /// Gradient descent iterations used during fitting
    pub iterations: usize,
    /// Whether fitting stopped before the iteration cap
    pub converged: bool,
}
