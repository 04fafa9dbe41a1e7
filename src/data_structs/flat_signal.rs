use std::ops::Range;

use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::enums::{
    NormalizeMode,
    SmoothingKind,
};
use crate::data_structs::typedef::SignalType;
use crate::error::{
    ProfileError,
    Result,
};
use crate::tools::condition;
use crate::utils::{
    mean_std,
    sanitize,
};

/// Genome-wide signal: every chromosome's values concatenated in the order
/// recorded by the matching
/// [`ChromOffsetTable`](crate::data_structs::ChromOffsetTable).
///
/// Never holds NaN: non-finite values are replaced by `0.0` on construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatSignal {
    values: Vec<SignalType>,
}

impl FlatSignal {
    pub fn new(mut values: Vec<SignalType>) -> Self {
        sanitize(&mut values);
        Self { values }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Appends one chromosome worth of values, sanitizing them first.
    pub(crate) fn extend_sanitized(
        &mut self,
        mut values: Vec<SignalType>,
    ) {
        sanitize(&mut values);
        self.values.extend(values);
    }

    pub fn as_slice(&self) -> &[SignalType] {
        &self.values
    }

    pub fn into_inner(self) -> Vec<SignalType> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in `range`. Fails with [`ProfileError::InvalidParameter`] when
    /// the range runs past the signal, e.g. for an offset table built from
    /// a different assembly.
    pub fn slice(
        &self,
        range: Range<usize>,
    ) -> Result<&[SignalType]> {
        let len = self.values.len();
        self.values
            .get(range.clone())
            .ok_or_else(|| {
                ProfileError::invalid_parameter(format!(
                    "range {}..{} is outside of a flat signal of length {len}",
                    range.start, range.end
                ))
            })
    }

    /// Population mean and standard deviation of the whole signal.
    pub fn mean_std(&self) -> (f64, f64) {
        mean_std(&self.values)
    }

    /// Replaces the signal with its moving average.
    pub fn smooth(
        &mut self,
        window: usize,
        kind: SmoothingKind,
    ) -> Result<()> {
        self.values = match kind {
            SmoothingKind::Single => condition::smooth(&self.values, window)?,
            SmoothingKind::Symmetric => {
                condition::smooth_symmetric(&self.values, window)?
            },
        };
        Ok(())
    }

    /// Normalizes the signal in place. [`NormalizeMode::None`] is a no-op.
    pub fn normalize(
        &mut self,
        mode: NormalizeMode,
    ) -> Result<()> {
        match mode {
            NormalizeMode::None => {},
            NormalizeMode::Center => {
                self.values = condition::center_normalize(&self.values)?
            },
            NormalizeMode::Remap => {
                self.values = condition::remap_normalize(&self.values)?
            },
        }
        Ok(())
    }

    /// Mutable access for filters that zero out positions in place.
    pub(crate) fn values_mut(&mut self) -> &mut [SignalType] {
        &mut self.values
    }
}

impl From<Vec<SignalType>> for FlatSignal {
    fn from(value: Vec<SignalType>) -> Self {
        Self::new(value)
    }
}

impl AsRef<[SignalType]> for FlatSignal {
    fn as_ref(&self) -> &[SignalType] {
        &self.values
    }
}
