use log::debug;
use statrs::statistics::Statistics;

use crate::data_structs::typedef::SignalType;

/// Replaces every non-finite value with `0.0`.
pub fn sanitize(values: &mut [SignalType]) {
    values
        .iter_mut()
        .filter(|v| !v.is_finite())
        .for_each(|v| *v = 0.0);
}

/// Population mean and standard deviation. Both are `NaN` for an empty
/// slice.
pub fn mean_std(values: &[SignalType]) -> (f64, f64) {
    if values.is_empty() {
        debug!("Mean and std requested for an empty signal");
        return (f64::NAN, f64::NAN);
    }
    let mean = values.iter().mean();
    let std = values.iter().population_std_dev();
    (mean, std)
}

/// Smallest and largest value, `None` for an empty slice.
pub fn min_max(values: &[SignalType]) -> Option<(SignalType, SignalType)> {
    if values.is_empty() {
        return None;
    }
    Some(
        values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            }),
    )
}

/// `n` evenly spaced points from `start` to `end`, both inclusive.
pub fn linspace(
    start: f64,
    end: f64,
    n: usize,
) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        end
                    }
                    else {
                        start + i as f64 * step
                    }
                })
                .collect()
        },
    }
}
