//! Seasonal ARIMA model fitted by conditional least squares.

use crate::error::{ForecastError, Result};
use crate::models::diff::{difference, integrate, seasonal_difference, seasonal_integrate};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::mean;

/// A fitted SARIMA(p, d, 0)(P, D, 0)[s] model.
///
/// The series is seasonally differenced `D` times at period `s`, then
/// regularly differenced `d` times. On that scale the multiplicative AR
/// polynomial `(1 - Σφ_i B^i)(1 - ΣΦ_j B^{js})` is estimated by minimizing
/// the conditional sum of squares. Moving-average orders are not supported;
/// the engine only ever requests AR-type specifications.
#[derive(Debug, Clone)]
pub struct Sarima {
    p: usize,
    d: usize,
    sp: usize,
    sd: usize,
    period: usize,
    phi: Vec<f64>,
    seasonal_phi: Vec<f64>,
    intercept: f64,
    original: Vec<f64>,
    seasonal_diffed: Vec<f64>,
    differenced: Vec<f64>,
}

impl Sarima {
    /// Fit a SARIMA model with orders `(p, d, q)` and `(P, D, Q)` at `period`.
    ///
    /// # Errors
    /// - [`ForecastError::InvalidParameter`] if `q` or `Q` is non-zero or the
    ///   period is zero.
    /// - [`ForecastError::ModelFit`] if the series is too short for the
    ///   requested orders or estimation does not produce finite parameters.
    pub fn fit(
        values: &[f64],
        order: (usize, usize, usize),
        seasonal_order: (usize, usize, usize),
        period: usize,
    ) -> Result<Self> {
        let (p, d, q) = order;
        let (sp, sd, sq) = seasonal_order;
        if q != 0 || sq != 0 {
            return Err(ForecastError::InvalidParameter(
                "moving-average orders are not supported for seasonal models".to_string(),
            ));
        }
        if period == 0 {
            return Err(ForecastError::InvalidParameter(
                "seasonal period must be positive".to_string(),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFit(
                "series contains non-finite values".to_string(),
            ));
        }

        let max_lag = p + sp * period;
        let needed = sd * period + d + max_lag + 2;
        if values.len() < needed {
            return Err(ForecastError::ModelFit(format!(
                "series of length {} too short for SARIMA({p},{d},0)({sp},{sd},0)[{period}], need {needed}",
                values.len()
            )));
        }

        let seasonal_diffed = seasonal_difference(values, sd, period);
        let differenced = difference(&seasonal_diffed, d);

        let mut initial = vec![0.0; 1 + p + sp];
        initial[0] = mean(&differenced);
        for i in 0..p + sp {
            initial[1 + i] = 0.1 / (i + 1) as f64;
        }
        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        bounds.extend(std::iter::repeat((-0.99, 0.99)).take(p + sp));

        let w = differenced.clone();
        let result = nelder_mead(
            |params| {
                css_seasonal(&w, &params[1..1 + p], &params[1 + p..], period, params[0])
            },
            &initial,
            Some(&bounds),
            NelderMeadConfig {
                max_iter: 1000,
                tolerance: 1e-8,
                ..Default::default()
            },
        );

        if result.optimal_point.iter().any(|c| !c.is_finite())
            || !result.optimal_value.is_finite()
        {
            return Err(ForecastError::ModelFit(
                "seasonal parameter estimation did not converge to finite values".to_string(),
            ));
        }

        Ok(Self {
            p,
            d,
            sp,
            sd,
            period,
            phi: result.optimal_point[1..1 + p].to_vec(),
            seasonal_phi: result.optimal_point[1 + p..].to_vec(),
            intercept: result.optimal_point[0],
            original: values.to_vec(),
            seasonal_diffed,
            differenced,
        })
    }

    /// Length of the fitted series.
    pub fn len(&self) -> usize {
        self.original.len()
    }

    /// Non-seasonal AR coefficients.
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.phi
    }

    /// Seasonal AR coefficients.
    pub fn seasonal_ar_coefficients(&self) -> &[f64] {
        &self.seasonal_phi
    }

    /// Forecast `steps` values past the end of the fitted series.
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        if steps == 0 {
            return Vec::new();
        }

        let lags = lag_coefficients(&self.phi, &self.seasonal_phi, self.period);
        let mut extended = self.differenced.clone();
        for _ in 0..steps {
            let t = extended.len();
            let mut pred = self.intercept;
            for &(lag, coeff) in &lags {
                if t >= lag {
                    pred += coeff * (extended[t - lag] - self.intercept);
                }
            }
            extended.push(pred);
        }

        let forecast_diff = extended[self.differenced.len()..].to_vec();
        let on_seasonal_scale = integrate(&forecast_diff, &self.seasonal_diffed, self.d);
        seasonal_integrate(&on_seasonal_scale, &self.original, self.sd, self.period)
    }
}

/// Expand the multiplicative AR polynomial into `(lag, coefficient)` pairs.
///
/// `(1 - Σφ_i B^i)(1 - ΣΦ_j B^{js})` applied to the centered series gives
/// lags `i`, `j·s` and cross terms `i + j·s` with coefficient `-φ_i·Φ_j`.
fn lag_coefficients(phi: &[f64], seasonal_phi: &[f64], period: usize) -> Vec<(usize, f64)> {
    let mut lags = Vec::new();
    for (i, &c) in phi.iter().enumerate() {
        lags.push((i + 1, c));
    }
    for (j, &sc) in seasonal_phi.iter().enumerate() {
        lags.push(((j + 1) * period, sc));
        for (i, &c) in phi.iter().enumerate() {
            lags.push((i + 1 + (j + 1) * period, -c * sc));
        }
    }
    lags
}

/// Conditional sum of squares for the multiplicative seasonal AR recursion.
fn css_seasonal(w: &[f64], phi: &[f64], seasonal_phi: &[f64], period: usize, intercept: f64) -> f64 {
    let lags = lag_coefficients(phi, seasonal_phi, period);
    let start = lags.iter().map(|&(lag, _)| lag).max().unwrap_or(0);
    let n = w.len();
    if n <= start {
        return f64::MAX;
    }

    let mut total = 0.0;
    for t in start..n {
        let mut pred = intercept;
        for &(lag, coeff) in &lags {
            pred += coeff * (w[t - lag] - intercept);
        }
        let error = w[t] - pred;
        total += error * error;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seasonal_series(n: usize, period: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * i as f64 / period as f64;
                100.0 + 0.8 * i as f64 + 6.0 * phase.sin()
            })
            .collect()
    }

    #[test]
    fn fits_seasonal_series_and_forecasts() {
        let values = seasonal_series(36, 6);
        let model = Sarima::fit(&values, (1, 1, 0), (1, 1, 0), 6).unwrap();

        assert_eq!(model.ar_coefficients().len(), 1);
        assert_eq!(model.seasonal_ar_coefficients().len(), 1);

        let forecast = model.forecast(3);
        assert_eq!(forecast.len(), 3);
        for value in &forecast {
            assert!(value.is_finite());
        }
        // The trend should keep the forecast near the end of the series.
        let last = *values.last().unwrap();
        assert!((forecast[0] - last).abs() < 20.0);
    }

    #[test]
    fn rejects_short_series() {
        let values = seasonal_series(12, 6);
        assert!(matches!(
            Sarima::fit(&values, (1, 1, 0), (1, 1, 0), 6),
            Err(ForecastError::ModelFit(_))
        ));
    }

    #[test]
    fn rejects_moving_average_orders() {
        let values = seasonal_series(36, 6);
        assert!(matches!(
            Sarima::fit(&values, (1, 1, 1), (1, 1, 0), 6),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            Sarima::fit(&values, (1, 1, 0), (1, 1, 1), 6),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_zero_period() {
        let values = seasonal_series(36, 6);
        assert!(matches!(
            Sarima::fit(&values, (1, 1, 0), (1, 1, 0), 0),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn lag_expansion_includes_cross_terms() {
        let lags = lag_coefficients(&[0.5], &[0.4], 6);
        assert!(lags.contains(&(1, 0.5)));
        assert!(lags.contains(&(6, 0.4)));
        assert!(lags.contains(&(7, -0.2)));
    }

    #[test]
    fn purely_seasonal_pattern_is_continued() {
        // Strict period-6 repetition plus a linear trend.
        let values: Vec<f64> = (0..30)
            .map(|i| 100.0 + i as f64 + [0.0, 4.0, 8.0, 4.0, 0.0, -4.0][i % 6])
            .collect();
        let model = Sarima::fit(&values, (1, 1, 0), (1, 1, 0), 6).unwrap();
        let forecast = model.forecast(6);
        assert_eq!(forecast.len(), 6);
        for value in forecast {
            assert!(value.is_finite());
            assert!(value > 100.0 && value < 200.0);
        }
    }
}
