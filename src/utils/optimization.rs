//! Nelder-Mead simplex optimization for model parameter estimation.

/// Result of a Nelder-Mead minimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The best point found.
    pub optimal_point: Vec<f64>,
    /// The objective value at the best point.
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the simplex converged within tolerance.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence tolerance on the objective spread.
    pub tolerance: f64,
    /// Reflection coefficient.
    pub alpha: f64,
    /// Expansion coefficient.
    pub gamma: f64,
    /// Contraction coefficient.
    pub rho: f64,
    /// Shrinkage coefficient.
    pub sigma: f64,
    /// Initial simplex step size.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Minimize an objective function with the Nelder-Mead simplex method.
///
/// # Arguments
/// * `objective` - Function to minimize
/// * `initial` - Starting point
/// * `bounds` - Optional `(min, max)` box constraints per dimension
/// * `config` - Algorithm parameters
///
/// # Example
/// ```
/// use concrete_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// // Minimize (x-2)^2 + (y+1)^2
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     NelderMeadConfig::default(),
/// );
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    // Initial simplex: starting point plus one perturbed vertex per dimension.
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(clamp_to_bounds(initial.to_vec(), bounds));
    for i in 0..n {
        let mut vertex = initial.to_vec();
        let step = if initial[i].abs() > 1e-10 {
            config.initial_step * initial[i].abs()
        } else {
            config.initial_step
        };
        vertex[i] += step;
        simplex.push(clamp_to_bounds(vertex, bounds));
    }

    let mut values: Vec<f64> = simplex.iter().map(|v| objective(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| {
            values[a]
                .partial_cmp(&values[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let best = order[0];
        let second_worst = order[n - 1];
        let worst = order[n];

        if values[worst] - values[best] < config.tolerance {
            converged = true;
            break;
        }

        // Centroid of all vertices except the worst.
        let mut centroid = vec![0.0; n];
        for (i, vertex) in simplex.iter().enumerate() {
            if i != worst {
                for j in 0..n {
                    centroid[j] += vertex[j];
                }
            }
        }
        for c in &mut centroid {
            *c /= n as f64;
        }

        let reflected = clamp_to_bounds(
            centroid
                .iter()
                .zip(simplex[worst].iter())
                .map(|(c, w)| c + config.alpha * (c - w))
                .collect(),
            bounds,
        );
        let reflected_value = objective(&reflected);

        if reflected_value < values[second_worst] && reflected_value >= values[best] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        if reflected_value < values[best] {
            let expanded = clamp_to_bounds(
                centroid
                    .iter()
                    .zip(reflected.iter())
                    .map(|(c, r)| c + config.gamma * (r - c))
                    .collect(),
                bounds,
            );
            let expanded_value = objective(&expanded);
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        // Contraction: outside if the reflection improved on the worst vertex,
        // inside otherwise.
        let toward = if reflected_value < values[worst] {
            &reflected
        } else {
            &simplex[worst]
        };
        let contracted = clamp_to_bounds(
            centroid
                .iter()
                .zip(toward.iter())
                .map(|(c, t)| c + config.rho * (t - c))
                .collect(),
            bounds,
        );
        let contracted_value = objective(&contracted);
        if contracted_value < values[worst].min(reflected_value) {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        // Shrink toward the best vertex.
        let anchor = simplex[best].clone();
        for i in 0..=n {
            if i != best {
                for j in 0..n {
                    simplex[i][j] = anchor[j] + config.sigma * (simplex[i][j] - anchor[j]);
                }
                simplex[i] = clamp_to_bounds(simplex[i].clone(), bounds);
                values[i] = objective(&simplex[i]);
            }
        }
    }

    let best = values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0);

    NelderMeadResult {
        optimal_point: simplex[best].clone(),
        optimal_value: values[best],
        iterations,
        converged,
    }
}

fn clamp_to_bounds(mut point: Vec<f64>, bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    if let Some(bounds) = bounds {
        for (x, &(lo, hi)) in point.iter_mut().zip(bounds.iter()) {
            *x = x.clamp(lo, hi);
        }
    }
    point
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimizes_quadratic() {
        let result = nelder_mead(
            |x| (x[0] - 3.0).powi(2),
            &[0.0],
            None,
            NelderMeadConfig::default(),
        );
        assert!(result.converged);
        assert!((result.optimal_point[0] - 3.0).abs() < 1e-3);
    }

    #[test]
    fn respects_bounds() {
        let result = nelder_mead(
            |x| (x[0] - 5.0).powi(2),
            &[0.0],
            Some(&[(-1.0, 1.0)]),
            NelderMeadConfig::default(),
        );
        assert!(result.optimal_point[0] <= 1.0 + 1e-12);
        assert!((result.optimal_point[0] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn two_dimensional_rosenbrock_like() {
        let result = nelder_mead(
            |x| (x[0] - 1.0).powi(2) + 10.0 * (x[1] - x[0]).powi(2),
            &[-1.0, 2.0],
            None,
            NelderMeadConfig {
                max_iter: 5000,
                ..Default::default()
            },
        );
        assert!((result.optimal_point[0] - 1.0).abs() < 0.01);
        assert!((result.optimal_point[1] - 1.0).abs() < 0.01);
    }

    #[test]
    fn empty_initial_point() {
        let result = nelder_mead(|_| 0.0, &[], None, NelderMeadConfig::default());
        assert!(!result.converged);
        assert!(result.optimal_point.is_empty());
    }
}
