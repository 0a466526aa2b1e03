use std::time::Instant;

use log::info;

use super::category::Category;
use super::classifier::Classifier;
use super::error::ClassifierError;
use super::model::{FitOptions, LogisticRegression};
use super::vectorizer::TfidfVectorizer;
use crate::config::PipelineConfig;
use crate::corpus::Corpus;

/// A builder for fitting a [`Classifier`] with a fluent interface.
///
/// The builder is the only way to obtain a `Classifier`, so a value of that
/// type is always fitted and ready to predict.
#[derive(Debug, Default)]
pub struct ClassifierBuilder {
    texts: Vec<String>,
    categories: Vec<Category>,
    config: PipelineConfig,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    ///
    /// # Example
    /// ```
    /// use referral::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the fitting configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds one labeled example.
    ///
    /// # Returns
    /// * `Err(ClassifierError::ValidationError)` if the text is empty or only whitespace
    ///
    /// # Example
    /// ```
    /// use referral::{Category, ClassifierBuilder};
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .add_example("Cold weather shelters", Category::Shelter);
    /// assert!(builder.is_ok());
    /// ```
    pub fn add_example(
        mut self,
        text: impl Into<String>,
        category: Category,
    ) -> Result<Self, ClassifierError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ClassifierError::ValidationError(format!(
                "Example {} for category {} cannot be empty",
                self.texts.len() + 1,
                category
            )));
        }
        self.texts.push(text);
        self.categories.push(category);
        Ok(self)
    }

    /// Adds every example of `corpus`, keeping its order.
    pub fn with_corpus(self, corpus: &Corpus) -> Result<Self, ClassifierError> {
        corpus
            .examples()
            .iter()
            .try_fold(self, |builder, example| builder.add_example(example.text, example.category))
    }

    /// Fits the vectorizer and the regression together and returns the
    /// ready-to-use classifier.
    ///
    /// # Returns
    /// * `Err(ClassifierError::ConfigurationError)` if:
    ///   - The configuration is invalid
    ///   - No examples have been added
    ///   - Some category has no example
    ///   - The examples consist only of stop words
    ///
    /// # Example
    /// ```
    /// # fn main() -> Result<(), referral::ClassifierError> {
    /// use referral::{Category, Classifier};
    ///
    /// let mut builder = Classifier::builder();
    /// for category in Category::ALL {
    ///     builder = builder.add_example(format!("{} request", category), category)?;
    /// }
    /// let classifier = builder.build()?;
    /// assert_eq!(classifier.info().num_classes, Category::COUNT);
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        self.config.validate()?;

        if self.texts.is_empty() {
            return Err(ClassifierError::ConfigurationError(
                "At least one example must be added".into(),
            ));
        }
        let missing: Vec<&str> = Category::ALL
            .iter()
            .filter(|category| !self.categories.contains(*category))
            .map(|category| category.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(ClassifierError::ConfigurationError(format!(
                "No examples for categories: {}",
                missing.join(", ")
            )));
        }

        let start = Instant::now();
        info!(
            "Fitting pipeline on {} examples across {} categories",
            self.texts.len(),
            Category::COUNT
        );

        let mut vectorizer =
            TfidfVectorizer::new(self.config.max_features, self.config.ngram_range);
        vectorizer.fit(&self.texts)?;
        info!("Vocabulary size: {}", vectorizer.vocabulary_size());

        let features = vectorizer.transform_many(&self.texts);
        let labels: Vec<usize> = self.categories.iter().map(Category::index).collect();
        let model = LogisticRegression::fit(
            &features,
            &labels,
            Category::COUNT,
            FitOptions {
                max_iter: self.config.max_iter,
                tolerance: self.config.tolerance,
                learning_rate: self.config.learning_rate,
                regularization: self.config.regularization,
            },
        )?;

        info!(
            "Pipeline fitted in {:.2?} ({} iterations, converged: {})",
            start.elapsed(),
            model.iterations(),
            model.converged()
        );

        Ok(Classifier::new(vectorizer, model, self.texts.len()))
    }
}
