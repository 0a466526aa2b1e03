use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::error::ClassifierError;
use super::model::LogisticRegression;
use super::utils::argmax;
use super::vectorizer::TfidfVectorizer;
use crate::corpus::Corpus;

/// Outcome of classifying one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// The most likely category.
    pub category: Category,
    /// One probability per category, in enumeration order.
    pub probabilities: BTreeMap<Category, f64>,
}

impl Prediction {
    /// Probability assigned to `category`.
    pub fn probability(&self, category: Category) -> f64 {
        self.probabilities.get(&category).copied().unwrap_or(0.0)
    }
}

/// A fitted, thread-safe text classifier: TF-IDF features feeding a
/// multinomial logistic regression.
///
/// # Thread Safety
///
/// The classifier is immutable once built and is `Send + Sync`, so a single
/// instance can be shared across threads or request handlers through `Arc`.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use referral::{Category, Classifier};
/// use std::sync::Arc;
/// use std::thread;
///
/// let classifier = Arc::new(Classifier::with_builtin_corpus()?);
///
/// let classifier_clone = Arc::clone(&classifier);
/// let handle = thread::spawn(move || classifier_clone.predict("Where can I find free food"));
/// let prediction = handle.join().unwrap()?;
/// assert_eq!(prediction.category, Category::FoodBank);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    vectorizer: TfidfVectorizer,
    model: LogisticRegression,
    num_examples: usize,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    pub(super) fn new(
        vectorizer: TfidfVectorizer,
        model: LogisticRegression,
        num_examples: usize,
    ) -> Self {
        Self {
            vectorizer,
            model,
            num_examples,
        }
    }

    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Fits a classifier on `corpus` with the default configuration.
    pub fn from_corpus(corpus: &Corpus) -> Result<Self, ClassifierError> {
        Self::builder().with_corpus(corpus)?.build()
    }

    /// Fits a classifier on the compiled-in corpus.
    pub fn with_builtin_corpus() -> Result<Self, ClassifierError> {
        Self::from_corpus(&Corpus::builtin())
    }

    /// Returns information about the fitted classifier
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            num_classes: self.model.n_classes(),
            class_labels: self.categories().iter().map(|c| c.as_str().to_string()).collect(),
            vocabulary_size: self.vectorizer.vocabulary_size(),
            num_examples: self.num_examples,
            iterations: self.model.iterations(),
            converged: self.model.converged(),
        }
    }

    /// Categories this classifier reports on, in enumeration order.
    pub fn categories(&self) -> &'static [Category] {
        &Category::ALL
    }

    /// Classifies `text` and returns the probability of every category.
    ///
    /// Any text is accepted, including the empty string. Text without known
    /// terms yields a valid but uninformative distribution.
    ///
    /// # Example
    /// ```rust
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use referral::{Category, Classifier};
    ///
    /// let classifier = Classifier::with_builtin_corpus()?;
    /// let prediction = classifier.predict("Night shelter for families")?;
    /// assert_eq!(prediction.category, Category::Shelter);
    /// for (category, probability) in &prediction.probabilities {
    ///     println!("{}: {:.3}", category, probability);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn predict(&self, text: &str) -> Result<Prediction, ClassifierError> {
        let features = self.vectorizer.transform(text);
        let probabilities = self.model.predict_probabilities(features.view())?;

        let best = argmax(probabilities.view());
        let category = Category::from_index(best).ok_or_else(|| {
            ClassifierError::PredictionError(format!("Class index {} has no category", best))
        })?;
        debug!("Predicted {} ({:.3}) for {:?}", category, probabilities[best], text);

        Ok(Prediction {
            category,
            probabilities: Category::ALL
                .iter()
                .map(|c| (*c, probabilities[c.index()]))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;

    #[test]
    fn test_class_info() {
        let classifier = Classifier::with_builtin_corpus().unwrap();
        let info = classifier.info();
        assert_eq!(info.num_classes, Category::COUNT);
        assert_eq!(info.class_labels[0], "FOOD_BANK");
        assert_eq!(info.num_examples, Corpus::builtin().len());
        assert!(info.vocabulary_size > 0);
    }

    #[test]
    fn test_prediction_serializes_with_wire_labels() {
        let classifier = Classifier::with_builtin_corpus().unwrap();
        let prediction = classifier.predict("dental clinics").unwrap();
        let json = serde_json::to_value(&prediction).unwrap();
        assert_eq!(json["category"], "MEDICAL");
        let probabilities = json["probabilities"].as_object().unwrap();
        assert_eq!(probabilities.len(), Category::COUNT);
        assert!(probabilities.contains_key("COMMUNITY_CENTER"));
    }
}
