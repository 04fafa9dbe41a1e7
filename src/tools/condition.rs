//! Whole-signal conditioning: normalization and moving-average smoothing.
//!
//! Every function here is pure and returns a new vector. The in-place
//! variants used by the pipeline live on
//! [`FlatSignal`](crate::data_structs::FlatSignal).

use log::debug;

use crate::data_structs::typedef::SignalType;
use crate::error::{
    ProfileError,
    Result,
};
use crate::utils::{
    mean_std,
    min_max,
};

/// `(x - mean) / std` with the population standard deviation.
///
/// Fails with [`ProfileError::DegenerateSignal`] when the signal is empty or
/// constant, where the division would only produce NaN or infinities.
pub fn center_normalize(signal: &[SignalType]) -> Result<Vec<SignalType>> {
    let (mean, std) = mean_std(signal);
    if signal.is_empty() || std == 0.0 || !std.is_finite() {
        return Err(ProfileError::DegenerateSignal(format!(
            "cannot center a signal with standard deviation {std}"
        )));
    }
    debug!("Center normalization: mean={mean:.4}, std={std:.4}");
    Ok(signal
        .iter()
        .map(|v| (v - mean) / std)
        .collect())
}

/// Min-max remap onto `[0, 1]`.
///
/// Fails with [`ProfileError::DegenerateSignal`] when the signal is empty or
/// every value is equal.
pub fn remap_normalize(signal: &[SignalType]) -> Result<Vec<SignalType>> {
    let (min, max) = min_max(signal).ok_or_else(|| {
        ProfileError::DegenerateSignal("cannot remap an empty signal".into())
    })?;
    let range = max - min;
    if range == 0.0 || !range.is_finite() {
        return Err(ProfileError::DegenerateSignal(format!(
            "cannot remap a signal with range {range}"
        )));
    }
    debug!("Remap normalization: min={min:.4}, max={max:.4}");
    Ok(signal
        .iter()
        .map(|v| (v - min) / range)
        .collect())
}

/// Centered moving average with a uniform kernel of `window` weights, each
/// `1 / window`.
///
/// The output has the input's length. Positions beyond either edge count as
/// zero (zero padding, no wrap-around), so values near the edges are pulled
/// towards zero. Output `i` averages inputs
/// `i - (window - 1 - h) ..= i + h` with `h = (window - 1) / 2`; for even
/// windows the kernel therefore reaches one position further to the left
/// than to the right.
pub fn smooth(
    signal: &[SignalType],
    window: usize,
) -> Result<Vec<SignalType>> {
    check_window(window)?;
    let n = signal.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let right = (window - 1) / 2;
    let left = window - 1 - right;
    let weight = 1.0 / window as f64;

    // Each window is summed on its own, so rounding depends only on the
    // values inside it and not on its position in the genome.
    Ok((0..n)
        .map(|i| {
            let lo = i.saturating_sub(left);
            let hi = (i + right).min(n - 1);
            signal[lo..=hi].iter().sum::<SignalType>() * weight
        })
        .collect())
}

/// Mean of a forward [`smooth`] pass and a pass over the reversed signal
/// (reversed back afterwards).
///
/// With even windows the single pass is lopsided by one position; averaging
/// both directions removes that shift around sharp transitions. For odd
/// windows the kernel and the zero padding are symmetric, so the result
/// equals [`smooth`] at every position, edges included.
pub fn smooth_symmetric(
    signal: &[SignalType],
    window: usize,
) -> Result<Vec<SignalType>> {
    let forward = smooth(signal, window)?;
    let reversed = signal
        .iter()
        .rev()
        .copied()
        .collect::<Vec<_>>();
    let backward = smooth(&reversed, window)?;

    Ok(forward
        .iter()
        .zip(backward.iter().rev())
        .map(|(f, b)| (f + b) / 2.0)
        .collect())
}

/// Applies [`center_normalize`] to every signal.
pub fn center_normalize_all(signals: &[Vec<SignalType>]) -> Result<Vec<Vec<SignalType>>> {
    signals
        .iter()
        .map(|s| center_normalize(s))
        .collect()
}

/// Applies [`remap_normalize`] to every signal.
pub fn remap_normalize_all(signals: &[Vec<SignalType>]) -> Result<Vec<Vec<SignalType>>> {
    signals
        .iter()
        .map(|s| remap_normalize(s))
        .collect()
}

/// Smooths every signal with its own window. `windows` must hold one entry
/// per signal; `None` leaves that signal untouched.
pub fn smooth_all(
    signals: &[Vec<SignalType>],
    windows: &[Option<usize>],
) -> Result<Vec<Vec<SignalType>>> {
    if signals.len() != windows.len() {
        return Err(ProfileError::invalid_parameter(format!(
            "{} smoothing windows given for {} signals",
            windows.len(),
            signals.len()
        )));
    }
    signals
        .iter()
        .zip(windows)
        .map(|(signal, window)| {
            match window {
                Some(w) => smooth(signal, *w),
                None => Ok(signal.clone()),
            }
        })
        .collect()
}

fn check_window(window: usize) -> Result<()> {
    if window == 0 {
        return Err(ProfileError::invalid_parameter(
            "smoothing window must be a positive integer",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn arange(
        start: i32,
        end: i32,
    ) -> Vec<f64> {
        (start..end).map(f64::from).collect()
    }

    fn assert_all_close(
        left: &[f64],
        right: &[f64],
        tol: f64,
    ) {
        assert_eq!(left.len(), right.len());
        for (l, r) in left.iter().zip(right) {
            assert_approx_eq!(l, r, tol);
        }
    }

    #[test]
    fn center_normalize_known_values() {
        let data = arange(0, 9);
        let normed = center_normalize(&data).unwrap();
        let expected = data
            .iter()
            .map(|v| (v - 4.0) / 2.58)
            .collect::<Vec<_>>();
        assert_all_close(&normed, &expected, 1e-2);

        let (mean, std) = mean_std(&normed);
        assert_approx_eq!(mean, 0.0, 1e-9);
        assert_approx_eq!(std, 1.0, 1e-9);
    }

    #[test]
    fn center_normalize_constant_signal_fails() {
        assert!(matches!(
            center_normalize(&[2.0, 2.0, 2.0]),
            Err(ProfileError::DegenerateSignal(_))
        ));
        assert!(matches!(
            center_normalize(&[]),
            Err(ProfileError::DegenerateSignal(_))
        ));
    }

    #[test]
    fn remap_normalize_known_values() {
        let data = arange(2, 20);
        let remapped = remap_normalize(&data).unwrap();
        let expected = data
            .iter()
            .map(|v| (v - 2.0) / 17.0)
            .collect::<Vec<_>>();
        assert_all_close(&remapped, &expected, 1e-9);
        assert_eq!(min_max(&remapped), Some((0.0, 1.0)));
        assert!(remap_normalize(&[1.0, 1.0]).is_err());
    }

    #[test]
    fn smooth_odd_window() {
        let smoothed = smooth(&arange(0, 9), 3).unwrap();
        assert_all_close(
            &smoothed,
            &[0.33, 1., 2., 3., 4., 5., 6., 7., 5.],
            1e-2,
        );
    }

    #[test]
    fn smooth_even_window() {
        let smoothed = smooth(&arange(2, 20), 4).unwrap();
        assert_all_close(
            &smoothed,
            &[
                1.25, 2.25, 3.5, 4.5, 5.5, 6.5, 7.5, 8.5, 9.5, 10.5, 11.5, 12.5,
                13.5, 14.5, 15.5, 16.5, 17.5, 13.5,
            ],
            1e-9,
        );
    }

    #[test]
    fn smooth_is_independent_of_position() {
        let mut data = vec![987.654321; 2_000_000];
        data.extend([0.3; 20]);
        let smoothed = smooth(&data, 5).unwrap();
        let local = smooth(&[0.3; 20], 5).unwrap();
        // Windows fully inside the plateau.
        for (far, near) in smoothed[data.len() - 18..data.len() - 2]
            .iter()
            .zip(&local[2..18])
        {
            assert_eq!(far, near);
            assert_approx_eq!(far, 0.3, 1e-15);
        }
    }

    #[test]
    fn smooth_rejects_zero_window() {
        assert!(matches!(
            smooth(&[1.0], 0),
            Err(ProfileError::InvalidParameter(_))
        ));
        assert!(smooth_symmetric(&[1.0], 0).is_err());
    }

    #[test]
    fn smooth_window_of_one_is_identity() {
        let data = vec![1.0, -2.0, 3.5];
        assert_eq!(smooth(&data, 1).unwrap(), data);
    }

    #[test]
    fn smooth_window_wider_than_signal() {
        let smoothed = smooth(&[3.0, 3.0], 5).unwrap();
        assert_all_close(&smoothed, &[6.0 / 5.0, 6.0 / 5.0], 1e-12);
    }

    #[test]
    fn symmetric_smoothing_balances_even_windows() {
        let data = arange(2, 20);
        let symmetric = smooth_symmetric(&data, 4).unwrap();
        // Interior of a linear ramp: the lopsided kernels average out to the
        // value itself.
        for i in 2..16 {
            assert_approx_eq!(symmetric[i], data[i], 1e-9);
        }
        // Forward pass reaches left, backward pass reaches right.
        assert_approx_eq!(symmetric[0], (1.25 + (2.0 + 3.0 + 4.0) / 4.0) / 2.0);
    }

    #[test]
    fn symmetric_matches_single_pass_for_odd_windows() {
        let data = vec![0., 1., 0., 2., 3., 3., 3., 3., 4., 3., 2., 1., 0.];
        let single = smooth(&data, 5).unwrap();
        let symmetric = smooth_symmetric(&data, 5).unwrap();
        assert_all_close(&single, &symmetric, 1e-12);
    }

    #[test]
    fn smooth_all_requires_one_window_per_signal() {
        let signals = vec![arange(0, 9), arange(2, 20)];
        let smoothed = smooth_all(&signals, &[Some(3), None]).unwrap();
        assert_approx_eq!(smoothed[0][8], 5.0);
        assert_eq!(smoothed[1], signals[1]);
        assert!(smooth_all(&signals, &[Some(3)]).is_err());
    }

    #[test]
    fn normalize_all_maps_every_signal() {
        let signals = vec![arange(0, 9), arange(2, 20)];
        let remapped = remap_normalize_all(&signals).unwrap();
        assert!(remapped
            .iter()
            .all(|s| min_max(s) == Some((0.0, 1.0))));
        let centered = center_normalize_all(&signals).unwrap();
        assert_eq!(centered.len(), 2);
    }
}
