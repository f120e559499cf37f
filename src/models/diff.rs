//! Differencing and integration utilities for ARIMA-family models.

/// Apply regular differencing `d` times.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            break;
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Apply seasonal differencing `d` times at the given period.
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    if period == 0 {
        return series.to_vec();
    }
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= period {
            break;
        }
        result = result
            .iter()
            .skip(period)
            .zip(result.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    result
}

/// Integrate (reverse regular differencing) a forecast on the differenced
/// scale back onto the scale of `original`.
///
/// `original` is the series that was differenced `d` times to produce the
/// scale the forecast lives on; its tail supplies the integration constants.
pub fn integrate(forecast: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    if d == 0 || forecast.is_empty() {
        return forecast.to_vec();
    }

    let mut result = forecast.to_vec();
    for level in (0..d).rev() {
        let base = difference(original, level);
        let init = *base.last().unwrap_or(&0.0);

        let mut cumsum = init;
        for value in &mut result {
            cumsum += *value;
            *value = cumsum;
        }
    }
    result
}

/// Integrate (reverse seasonal differencing) a forecast back onto the scale
/// of `original`.
///
/// Each forecast step adds the value one `period` earlier, drawing from the
/// original tail first and from already-integrated forecast steps once the
/// horizon exceeds the period. Requires `original.len() >= period` at every
/// differencing level; callers enforce this through fit length checks.
pub fn seasonal_integrate(
    forecast: &[f64],
    original: &[f64],
    d: usize,
    period: usize,
) -> Vec<f64> {
    if d == 0 || period == 0 || forecast.is_empty() {
        return forecast.to_vec();
    }

    let mut result = forecast.to_vec();
    for level in (0..d).rev() {
        let base = seasonal_difference(original, level, period);
        let mut extended = base;
        let mut integrated = Vec::with_capacity(result.len());
        for &diff in &result {
            let prev = extended[extended.len() - period];
            let value = diff + prev;
            extended.push(value);
            integrated.push(value);
        }
        result = integrated;
    }
    result
}
