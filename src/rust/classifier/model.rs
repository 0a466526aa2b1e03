use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayView1, Axis};

use super::error::ClassifierError;
use super::utils::{argmax, softmax};

/// Multinomial logistic regression fitted by full-batch gradient descent.
///
/// Minimizes the mean cross-entropy plus `||W||^2 / (2 C n)`; the intercepts
/// are not penalized. Classes are identified by row index.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    weights: Array2<f64>,
    intercepts: Array1<f64>,
    iterations: usize,
    converged: bool,
}

/// Optimizer settings for [`LogisticRegression::fit`].
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    pub max_iter: usize,
    pub tolerance: f64,
    pub learning_rate: f64,
    pub regularization: f64,
}

impl LogisticRegression {
    /// Fits `n_classes` linear scores to the rows of `x` labeled by `y`.
    ///
    /// Stops early when every gradient component is below the tolerance. If
    /// the iteration cap is reached first, the lowest-loss coefficients seen
    /// are kept and the model is still usable.
    pub fn fit(
        x: &Array2<f64>,
        y: &[usize],
        n_classes: usize,
        options: FitOptions,
    ) -> Result<Self, ClassifierError> {
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 {
            return Err(ClassifierError::ConfigurationError(
                "Cannot fit a classifier with zero samples".into(),
            ));
        }
        if n_samples != y.len() {
            return Err(ClassifierError::ConfigurationError(format!(
                "Got {} feature rows but {} labels",
                n_samples,
                y.len()
            )));
        }
        if let Some(&bad) = y.iter().find(|&&label| label >= n_classes) {
            return Err(ClassifierError::ConfigurationError(format!(
                "Label {} is out of range for {} classes",
                bad, n_classes
            )));
        }

        let mut targets = Array2::<f64>::zeros((n_samples, n_classes));
        for (i, &label) in y.iter().enumerate() {
            targets[[i, label]] = 1.0;
        }

        let n = n_samples as f64;
        let penalty = 1.0 / (options.regularization * n);

        let mut weights = Array2::<f64>::zeros((n_classes, n_features));
        let mut intercepts = Array1::<f64>::zeros(n_classes);
        let mut best = (f64::INFINITY, weights.clone(), intercepts.clone());
        let mut iterations = 0;
        let mut converged = false;

        while iterations < options.max_iter {
            let probabilities = Self::softmax_rows(x, &weights, &intercepts);

            let loss = Self::loss(&probabilities, y) + Self::l2_term(&weights, penalty);
            if loss < best.0 {
                best = (loss, weights.clone(), intercepts.clone());
            }

            let residual = probabilities - &targets;
            let grad_w = residual.t().dot(x) / n + &weights * penalty;
            let grad_b = residual.sum_axis(Axis(0)) / n;

            let largest = grad_w
                .iter()
                .chain(grad_b.iter())
                .fold(0.0f64, |acc, g| acc.max(g.abs()));
            if largest < options.tolerance {
                converged = true;
                best = (loss, weights.clone(), intercepts.clone());
                break;
            }

            weights.scaled_add(-options.learning_rate, &grad_w);
            intercepts.scaled_add(-options.learning_rate, &grad_b);
            iterations += 1;
        }

        if !converged {
            // The final step has not been scored yet.
            let probabilities = Self::softmax_rows(x, &weights, &intercepts);
            let loss = Self::loss(&probabilities, y) + Self::l2_term(&weights, penalty);
            if loss < best.0 {
                best = (loss, weights, intercepts);
            }
            warn!(
                "Logistic regression did not converge within {} iterations (loss {:.6})",
                options.max_iter, best.0
            );
        } else {
            debug!(
                "Logistic regression converged after {} iterations (loss {:.6})",
                iterations, best.0
            );
        }

        let (_, weights, intercepts) = best;
        Ok(Self {
            weights,
            intercepts,
            iterations,
            converged,
        })
    }

    fn softmax_rows(
        x: &Array2<f64>,
        weights: &Array2<f64>,
        intercepts: &Array1<f64>,
    ) -> Array2<f64> {
        let mut scores = x.dot(&weights.t()) + intercepts;
        for mut row in scores.rows_mut() {
            let p = softmax(row.view());
            row.assign(&p);
        }
        scores
    }

    fn l2_term(weights: &Array2<f64>, penalty: f64) -> f64 {
        0.5 * penalty * weights.mapv(|w| w * w).sum()
    }

    fn loss(probabilities: &Array2<f64>, y: &[usize]) -> f64 {
        let total: f64 = y
            .iter()
            .enumerate()
            .map(|(i, &label)| -probabilities[[i, label]].max(f64::MIN_POSITIVE).ln())
            .sum();
        total / y.len() as f64
    }

    /// Probability of each class for the feature vector `x`.
    pub fn predict_probabilities(
        &self,
        x: ArrayView1<f64>,
    ) -> Result<Array1<f64>, ClassifierError> {
        if x.len() != self.n_features() {
            return Err(ClassifierError::PredictionError(format!(
                "Expected {} features, got {}",
                self.n_features(),
                x.len()
            )));
        }
        let scores = self.weights.dot(&x) + &self.intercepts;
        let probabilities = softmax(scores.view());
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(ClassifierError::PredictionError(
                "Classifier produced non-finite probabilities".into(),
            ));
        }
        Ok(probabilities)
    }

    /// Index of the most likely class; the lowest index wins on ties.
    pub fn predict_class(&self, x: ArrayView1<f64>) -> Result<usize, ClassifierError> {
        let probabilities = self.predict_probabilities(x)?;
        Ok(argmax(probabilities.view()))
    }

    pub fn n_classes(&self) -> usize {
        self.intercepts.len()
    }

    pub fn n_features(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of gradient steps taken during fitting.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn options() -> FitOptions {
        FitOptions {
            max_iter: 1000,
            tolerance: 1e-4,
            learning_rate: 1.0,
            regularization: 1.0,
        }
    }

    fn toy_data() -> (Array2<f64>, Vec<usize>) {
        let x = array![
            [1.0, 0.0, 0.0],
            [0.8, 0.6, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.6, 0.8],
            [0.0, 0.0, 1.0],
            [0.6, 0.0, 0.8],
        ];
        (x, vec![0, 0, 1, 1, 2, 2])
    }

    #[test]
    fn test_fit_separates_toy_classes() {
        let (x, y) = toy_data();
        let model = LogisticRegression::fit(&x, &y, 3, options()).unwrap();
        assert_eq!(model.n_classes(), 3);
        assert_eq!(model.n_features(), 3);
        assert_eq!(model.predict_class(array![1.0, 0.0, 0.0].view()).unwrap(), 0);
        assert_eq!(model.predict_class(array![0.0, 1.0, 0.0].view()).unwrap(), 1);
        assert_eq!(model.predict_class(array![0.0, 0.0, 1.0].view()).unwrap(), 2);
    }

    #[test]
    fn test_objective_terms() {
        let weights = array![[1.0, -2.0], [0.0, 2.0]];
        assert!((LogisticRegression::l2_term(&weights, 0.5) - 2.25).abs() < 1e-12);

        let probabilities = array![[0.5, 0.5], [0.25, 0.75]];
        let expected = (-(0.5f64.ln()) - 0.75f64.ln()) / 2.0;
        assert!((LogisticRegression::loss(&probabilities, &[0, 1]) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_probabilities_are_a_distribution() {
        let (x, y) = toy_data();
        let model = LogisticRegression::fit(&x, &y, 3, options()).unwrap();
        for input in [array![0.0, 0.0, 0.0], array![0.3, 0.3, 0.3], array![1.0, 0.0, 0.0]] {
            let p = model.predict_probabilities(input.view()).unwrap();
            assert_eq!(p.len(), 3);
            assert!((p.sum() - 1.0).abs() < 1e-9);
            assert!(p.iter().all(|&v| v > 0.0 && v < 1.0));
        }
    }

    #[test]
    fn test_iteration_cap_is_not_an_error() {
        let (x, y) = toy_data();
        let model = LogisticRegression::fit(
            &x,
            &y,
            3,
            FitOptions {
                max_iter: 3,
                ..options()
            },
        )
        .unwrap();
        assert!(!model.converged());
        assert_eq!(model.iterations(), 3);
        let p = model.predict_probabilities(array![1.0, 0.0, 0.0].view()).unwrap();
        assert!((p.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_class_without_samples_gets_mass() {
        let (x, y) = toy_data();
        let model = LogisticRegression::fit(&x, &y, 4, options()).unwrap();
        let p = model.predict_probabilities(array![0.0, 0.0, 0.0].view()).unwrap();
        assert!(p[3] > 0.0);
        assert!(p[3] < p[0]);
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let (x, _) = toy_data();
        assert!(LogisticRegression::fit(&x, &[0, 1], 3, options()).is_err());
        assert!(LogisticRegression::fit(&x, &[0, 1, 2, 3, 0, 1], 3, options()).is_err());
        let empty = Array2::<f64>::zeros((0, 3));
        assert!(LogisticRegression::fit(&empty, &[], 3, options()).is_err());
    }

    #[test]
    fn test_feature_dimension_mismatch() {
        let (x, y) = toy_data();
        let model = LogisticRegression::fit(&x, &y, 3, options()).unwrap();
        let err = model.predict_probabilities(array![1.0].view()).unwrap_err();
        assert!(matches!(err, ClassifierError::PredictionError(_)));
    }
}
