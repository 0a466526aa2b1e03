//! A small text classifier that routes social-service queries to a category.
//!
//! Queries are turned into TF-IDF vectors over unigrams and bigrams and scored
//! by a multinomial logistic regression fitted once on a compiled-in corpus.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use referral::{Category, Classifier};
//!
//! let classifier = Classifier::with_builtin_corpus()?;
//!
//! let prediction = classifier.predict("Where can I find free food")?;
//! assert_eq!(prediction.category, Category::FoodBank);
//! println!("Probabilities: {:?}", prediction.probabilities);
//! # Ok(())
//! # }
//! ```
//!
//! # Custom examples
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use referral::{Category, Classifier, PipelineConfig};
//!
//! let mut builder = Classifier::builder()
//!     .with_config(PipelineConfig::default().with_max_iter(200));
//! for category in Category::ALL {
//!     builder = builder.add_example(format!("{} help", category), category)?;
//! }
//! let classifier = builder.build()?;
//! assert_eq!(classifier.predict("")?.probabilities.len(), Category::COUNT);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod corpus;
pub mod server;

pub use classifier::{
    Category, Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, Prediction,
};
pub use config::PipelineConfig;
pub use corpus::{Corpus, Example};
pub use server::{build_router, serve, AppState};

/// Initializes `env_logger` from `RUST_LOG`; later calls are no-ops.
pub fn init_logger() {
    let _ = env_logger::try_init();
}
