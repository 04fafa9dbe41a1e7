//! Length normalization of fragments by piecewise-linear interpolation.

use std::fmt::Display;
use std::str::FromStr;

use log::debug;
use ndarray::Array2;
use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::{
    Fragment,
    SignalType,
};
use crate::data_structs::{
    FragmentSet,
    ResampledMatrix,
};
use crate::error::{
    ProfileError,
    Result,
};
use crate::utils::{
    linspace,
    THREAD_POOL,
};

/// Column count of a resampled matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLength {
    Fixed(usize),
    /// Length of the longest fragment in the batch.
    LongestFragment,
}

impl TargetLength {
    fn resolve(
        &self,
        fragments: &[Fragment],
    ) -> Result<usize> {
        match self {
            TargetLength::Fixed(0) => {
                Err(ProfileError::invalid_parameter(
                    "target vector length must be positive",
                ))
            },
            TargetLength::Fixed(n) => Ok(*n),
            TargetLength::LongestFragment => {
                Ok(fragments
                    .iter()
                    .map(Vec::len)
                    .max()
                    .unwrap_or(0))
            },
        }
    }
}

impl FromStr for TargetLength {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "longest-fragment" | "longest" => Ok(TargetLength::LongestFragment),
            other => {
                other
                    .parse::<usize>()
                    .map(TargetLength::Fixed)
                    .map_err(|_| {
                        ProfileError::invalid_parameter(format!(
                            "target length must be a positive integer or \
                             'longest-fragment', got '{other}'"
                        ))
                    })
            },
        }
    }
}

impl Display for TargetLength {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            TargetLength::Fixed(n) => write!(f, "{n}"),
            TargetLength::LongestFragment => write!(f, "longest-fragment"),
        }
    }
}

impl Serialize for TargetLength {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        match self {
            TargetLength::Fixed(n) => serializer.serialize_u64(*n as u64),
            TargetLength::LongestFragment => serializer.serialize_str("longest-fragment"),
        }
    }
}

impl<'de> Deserialize<'de> for TargetLength {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(usize),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(TargetLength::Fixed(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Evaluates the linear interpolant through `(i, fragment[i])` at
/// `target_len` evenly spaced points covering `[0, len - 1]`, both ends
/// included.
///
/// Fails with [`ProfileError::DegenerateFragment`] below two samples.
pub fn resample(
    fragment: &[SignalType],
    target_len: usize,
) -> Result<Vec<SignalType>> {
    let n = fragment.len();
    if n < 2 {
        return Err(ProfileError::DegenerateFragment { len: n });
    }
    if target_len == 0 {
        return Err(ProfileError::invalid_parameter(
            "target vector length must be positive",
        ));
    }

    Ok(linspace(0.0, (n - 1) as f64, target_len)
        .into_iter()
        .map(|x| interpolate(fragment, x))
        .collect())
}

fn interpolate(
    values: &[SignalType],
    x: f64,
) -> SignalType {
    let last = values.len() - 1;
    let idx = x.floor() as usize;
    if idx >= last {
        return values[last];
    }
    let frac = x - idx as f64;
    values[idx] + frac * (values[idx + 1] - values[idx])
}

/// Resamples every fragment to a common length, one matrix row each.
///
/// Rows are computed in parallel; an empty batch yields a `0 x 0` matrix
/// for [`TargetLength::LongestFragment`].
pub fn resample_all(
    fragments: &[Fragment],
    target: TargetLength,
) -> Result<Array2<SignalType>> {
    let target_len = target.resolve(fragments)?;
    let rows = THREAD_POOL.install(|| {
        fragments
            .par_iter()
            .map(|f| resample(f, target_len))
            .collect::<Result<Vec<_>>>()
    })?;
    debug!(
        "Resampled {} fragments to length {}",
        rows.len(),
        target_len
    );
    Array2::from_shape_vec((rows.len(), target_len), rows.concat())
        .map_err(|e| ProfileError::invalid_parameter(e.to_string()))
}

/// [`resample_all`] over an extracted set, carrying its name lookup over to
/// the matrix rows.
pub fn resample_set(
    set: FragmentSet,
    target: TargetLength,
) -> Result<ResampledMatrix> {
    let (fragments, names) = set.into_parts();
    let data = resample_all(&fragments, target)?;
    Ok(ResampledMatrix::new(data, names))
}
