//! Non-seasonal ARIMA model fitted by conditional least squares.

use crate::error::{ForecastError, Result};
use crate::models::diff::{difference, integrate};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::mean;

/// A fitted ARIMA(p, d, q) model.
///
/// Parameters are estimated by minimizing the conditional sum of squares of
/// the differenced series with Nelder-Mead. Construction via [`Arima::fit`]
/// either yields a usable model or fails; there is no unfitted state.
#[derive(Debug, Clone)]
pub struct Arima {
    p: usize,
    d: usize,
    q: usize,
    ar: Vec<f64>,
    ma: Vec<f64>,
    intercept: f64,
    original: Vec<f64>,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
}

impl Arima {
    /// Fit an ARIMA model with the given `(p, d, q)` order.
    ///
    /// Series too short to estimate the AR/MA terms fall back to an
    /// intercept-only fit on the differenced scale, which keeps the simple
    /// fallback model usable down to two observations. Fitting fails with
    /// [`ForecastError::ModelFit`] when even that is impossible or the
    /// estimate is not finite.
    pub fn fit(values: &[f64], order: (usize, usize, usize)) -> Result<Self> {
        let (p, d, q) = order;
        // Two observations are enough for the intercept-only degenerate fit,
        // as long as differencing leaves at least one value.
        if values.len() < (d + 1).max(2) {
            return Err(ForecastError::ModelFit(format!(
                "series of length {} too short for ARIMA({p},{d},{q})",
                values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFit(
                "series contains non-finite values".to_string(),
            ));
        }

        let differenced = difference(values, d);

        let mut model = Self {
            p,
            d,
            q,
            ar: vec![0.0; p],
            ma: vec![0.0; q],
            intercept: mean(&differenced),
            original: values.to_vec(),
            differenced,
            residuals: Vec::new(),
        };

        let start = p.max(q);
        if model.differenced.len() > start + 1 && (p > 0 || q > 0) {
            model.estimate_parameters();
        }

        if !model.intercept.is_finite()
            || model.ar.iter().any(|c| !c.is_finite())
            || model.ma.iter().any(|c| !c.is_finite())
        {
            return Err(ForecastError::ModelFit(
                "parameter estimation did not converge to finite values".to_string(),
            ));
        }

        model.residuals = model.compute_residuals();
        Ok(model)
    }

    /// Length of the fitted series.
    pub fn len(&self) -> usize {
        self.original.len()
    }

    /// AR coefficients.
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    /// MA coefficients.
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    /// Intercept on the differenced scale.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Forecast `steps` values past the end of the fitted series.
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        if steps == 0 {
            return Vec::new();
        }

        let mut extended = self.differenced.clone();
        let mut residuals = self.residuals.clone();

        for _ in 0..steps {
            let t = extended.len();
            let mut pred = self.intercept;
            for i in 0..self.p {
                if t > i {
                    pred += self.ar[i] * (extended[t - 1 - i] - self.intercept);
                }
            }
            // Future shocks are zero, so MA terms fade out over the horizon.
            for i in 0..self.q {
                if t > i {
                    pred += self.ma[i] * residuals[t - 1 - i];
                }
            }
            extended.push(pred);
            residuals.push(0.0);
        }

        let forecast_diff = extended[self.differenced.len()..].to_vec();
        integrate(&forecast_diff, &self.original, self.d)
    }

    fn estimate_parameters(&mut self) {
        let p = self.p;
        let q = self.q;
        let diff_mean = mean(&self.differenced);

        let mut initial = vec![0.0; 1 + p + q];
        initial[0] = diff_mean;
        for i in 0..p {
            initial[1 + i] = 0.1 / (i + 1) as f64;
        }
        for i in 0..q {
            initial[1 + p + i] = 0.1 / (i + 1) as f64;
        }

        // Coefficient bounds keep the process stationary and invertible.
        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        bounds.extend(std::iter::repeat((-0.99, 0.99)).take(p + q));

        let differenced = self.differenced.clone();
        let result = nelder_mead(
            |params| css(&differenced, p, q, &params[1..1 + p], &params[1 + p..], params[0]),
            &initial,
            Some(&bounds),
            NelderMeadConfig {
                max_iter: 1000,
                tolerance: 1e-8,
                ..Default::default()
            },
        );

        self.intercept = result.optimal_point[0];
        self.ar = result.optimal_point[1..1 + p].to_vec();
        self.ma = result.optimal_point[1 + p..].to_vec();
    }

    fn compute_residuals(&self) -> Vec<f64> {
        let n = self.differenced.len();
        let start = self.p.max(self.q);
        let mut residuals = vec![0.0; n];

        for t in start..n {
            let mut pred = self.intercept;
            for i in 0..self.p {
                pred += self.ar[i] * (self.differenced[t - 1 - i] - self.intercept);
            }
            for i in 0..self.q {
                pred += self.ma[i] * residuals[t - 1 - i];
            }
            residuals[t] = self.differenced[t] - pred;
        }
        residuals
    }
}

/// Conditional sum of squares of an ARMA recursion over `diff_series`.
fn css(diff_series: &[f64], p: usize, q: usize, ar: &[f64], ma: &[f64], intercept: f64) -> f64 {
    let n = diff_series.len();
    let start = p.max(q);
    if n <= start {
        return f64::MAX;
    }

    let mut residuals = vec![0.0; n];
    let mut total = 0.0;
    for t in start..n {
        let mut pred = intercept;
        for i in 0..p {
            pred += ar[i] * (diff_series[t - 1 - i] - intercept);
        }
        for i in 0..q {
            pred += ma[i] * residuals[t - 1 - i];
        }
        let error = diff_series[t] - pred;
        residuals[t] = error;
        total += error * error;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_trending_series() {
        let values: Vec<f64> = (0..30).map(|i| 100.0 + 2.0 * i as f64).collect();
        let model = Arima::fit(&values, (1, 1, 0)).unwrap();

        assert_eq!(model.ar_coefficients().len(), 1);
        let forecast = model.forecast(3);
        assert_eq!(forecast.len(), 3);
        // The forecast should continue above the last observation.
        assert!(forecast[0] > 150.0);
    }

    #[test]
    fn fits_two_point_series_with_intercept_only() {
        let model = Arima::fit(&[100.0, 104.0], (1, 1, 0)).unwrap();
        assert_eq!(model.ar_coefficients(), &[0.0]);

        let forecast = model.forecast(2);
        // Intercept-only fit on the differenced scale continues the drift.
        assert!((forecast[0] - 108.0).abs() < 1e-9);
        assert!((forecast[1] - 112.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_too_short_series() {
        assert!(matches!(
            Arima::fit(&[100.0], (1, 1, 0)),
            Err(ForecastError::ModelFit(_))
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(matches!(
            Arima::fit(&[100.0, f64::NAN, 102.0], (1, 1, 0)),
            Err(ForecastError::ModelFit(_))
        ));
    }

    #[test]
    fn ar1_recovers_positive_autocorrelation() {
        let mut values = vec![10.0];
        for i in 1..100 {
            values.push(0.7 * values[i - 1] + (i as f64 * 0.1).sin());
        }
        let model = Arima::fit(&values, (1, 0, 0)).unwrap();
        assert!(model.ar_coefficients()[0] > 0.3);
    }

    #[test]
    fn zero_step_forecast_is_empty() {
        let values: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let model = Arima::fit(&values, (1, 1, 0)).unwrap();
        assert!(model.forecast(0).is_empty());
    }

    #[test]
    fn constant_series_forecasts_constant() {
        let values = vec![50.0; 20];
        let model = Arima::fit(&values, (1, 1, 0)).unwrap();
        let forecast = model.forecast(3);
        for value in forecast {
            assert!((value - 50.0).abs() < 1.0);
        }
    }
}
