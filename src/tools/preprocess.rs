//! Signal filters applied before or alongside profiling.

use std::fmt::Display;
use std::str::FromStr;

use indexmap::IndexMap;
use log::{
    debug,
    warn,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::SignalType;
use crate::data_structs::{
    ChromOffsetTable,
    FlatSignal,
};
use crate::error::{
    ProfileError,
    Result,
};

/// Dinucleotides at which photoproduct signal can occur. The purine pairs
/// are the pyrimidine dimers of the opposite strand.
pub const DIMERS: [&[u8; 2]; 8] = [
    b"TT", b"CT", b"TC", b"CC", b"AA", b"GA", b"AG", b"GG",
];

/// How neighbours beyond the signal ends are looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// Treat the signal as circular.
    #[default]
    Wrap,
    /// Repeat the edge value.
    Clip,
}

impl FromStr for EdgeMode {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "wrap" => Ok(EdgeMode::Wrap),
            "clip" => Ok(EdgeMode::Clip),
            other => {
                Err(ProfileError::invalid_parameter(format!(
                    "unknown edge mode '{other}', expected 'wrap' or 'clip'"
                )))
            },
        }
    }
}

impl Display for EdgeMode {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            EdgeMode::Wrap => write!(f, "wrap"),
            EdgeMode::Clip => write!(f, "clip"),
        }
    }
}

/// Indices of strict relative maxima: `signal[i]` must be greater than
/// every value up to `order` positions away on both sides.
///
/// Plateaus are never reported. With [`EdgeMode::Clip`] the first and last
/// positions cannot be maxima.
pub fn peak_detect(
    signal: &[SignalType],
    order: usize,
    mode: EdgeMode,
) -> Result<Vec<usize>> {
    if order == 0 {
        return Err(ProfileError::invalid_parameter(
            "peak detection order must be a positive integer",
        ));
    }
    let n = signal.len();
    let neighbour = |i: usize, k: usize, forward: bool| -> usize {
        match (mode, forward) {
            (EdgeMode::Wrap, true) => (i + k) % n,
            (EdgeMode::Wrap, false) => (i + n - k % n) % n,
            (EdgeMode::Clip, true) => (i + k).min(n - 1),
            (EdgeMode::Clip, false) => i.saturating_sub(k),
        }
    };

    let peaks = (0..n)
        .filter(|&i| {
            (1..=order).all(|k| {
                signal[i] > signal[neighbour(i, k, true)]
                    && signal[i] > signal[neighbour(i, k, false)]
            })
        })
        .collect::<Vec<_>>();
    debug!("Found {} peaks (order {order}, {mode})", peaks.len());
    Ok(peaks)
}

/// Marks every position that is part of a [`DIMERS`] match.
///
/// Matches may overlap and the comparison ignores case. A non-overlapping
/// scan would keep only the first two bases of `TTT` although the second
/// and third form a pyrimidine dimer as well, and soft-masked (lowercase)
/// reference bases would silently lose all signal.
pub fn dimer_mask(sequence: &[u8]) -> Vec<bool> {
    let mut mask = vec![false; sequence.len()];
    for (i, pair) in sequence.windows(2).enumerate() {
        let pair = [pair[0].to_ascii_uppercase(), pair[1].to_ascii_uppercase()];
        if DIMERS.iter().any(|d| **d == pair) {
            mask[i] = true;
            mask[i + 1] = true;
        }
    }
    mask
}

/// Zeroes flat-signal positions that are not covered by a dimer in the
/// chromosome's sequence.
///
/// Sequences are matched to chromosomes by name. A sequence for a chromosome
/// outside the table fails with [`ProfileError::UnknownChromosome`], one of
/// the wrong length with [`ProfileError::ChromosomeLengthMismatch`].
/// Chromosomes without a sequence are left untouched.
pub fn cancel_dimer_noise(
    flat: &mut FlatSignal,
    offsets: &ChromOffsetTable,
    sequences: &IndexMap<String, Vec<u8>>,
) -> Result<()> {
    for (chrom, sequence) in sequences {
        let span = offsets
            .span(chrom)
            .ok_or_else(|| ProfileError::UnknownChromosome(chrom.clone()))?;
        if span.length != sequence.len() {
            return Err(ProfileError::ChromosomeLengthMismatch {
                chrom:    chrom.clone(),
                expected: span.length,
                found:    sequence.len(),
            });
        }

        let values = &mut flat.values_mut()[span.offset..span.end()];
        let mut zeroed = 0;
        for (value, keep) in values.iter_mut().zip(dimer_mask(sequence)) {
            if !keep {
                *value = 0.0;
                zeroed += 1;
            }
        }
        debug!("{chrom}: {zeroed} positions outside of dimers set to zero");
    }

    let missing = offsets
        .chroms()
        .filter(|c| !sequences.contains_key(*c))
        .count();
    if missing > 0 {
        warn!("{missing} chromosomes have no sequence and were not filtered");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNAL: [f64; 17] = [
        0., 1., 0., 2., 3., 3., 3., 3., 4., 3., 2., 1., 0., 1., 1., 2., 0.,
    ];

    #[test]
    fn peaks_wrap() {
        assert_eq!(peak_detect(&SIGNAL, 3, EdgeMode::Wrap).unwrap(), vec![8, 15]);
        assert_eq!(
            peak_detect(&SIGNAL, 1, EdgeMode::Wrap).unwrap(),
            vec![1, 8, 15]
        );
    }

    #[test]
    fn peaks_clip_excludes_edges() {
        let signal = [5.0, 1.0, 0.0, 2.0, 1.0, 0.0, 4.0];
        assert_eq!(peak_detect(&signal, 1, EdgeMode::Clip).unwrap(), vec![3]);
        assert_eq!(
            peak_detect(&signal, 1, EdgeMode::Wrap).unwrap(),
            vec![0, 3]
        );
    }

    #[test]
    fn peaks_edge_cases() {
        assert!(peak_detect(&SIGNAL, 0, EdgeMode::Wrap).is_err());
        assert!(peak_detect(&[], 2, EdgeMode::Clip)
            .unwrap()
            .is_empty());
        assert!(peak_detect(&[1.0, 1.0, 1.0], 1, EdgeMode::Wrap)
            .unwrap()
            .is_empty());
        // Order wider than the signal compares against the peak itself.
        assert!(peak_detect(&[0.0, 3.0, 1.0], 5, EdgeMode::Wrap)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn edge_mode_parsing() {
        assert_eq!("Clip".parse::<EdgeMode>().unwrap(), EdgeMode::Clip);
        assert_eq!("wrap".parse::<EdgeMode>().unwrap(), EdgeMode::Wrap);
        assert!("mirror".parse::<EdgeMode>().is_err());
    }

    #[test]
    fn mask_overlapping_dimers() {
        assert_eq!(
            dimer_mask(b"ACGACGTTA"),
            vec![false, false, true, true, false, false, true, true, false]
        );
        assert_eq!(dimer_mask(b"tttA"), vec![true, true, true, false]);
        assert!(dimer_mask(b"").is_empty());
        assert_eq!(dimer_mask(b"T"), vec![false]);
    }

    #[test]
    fn dimer_noise_cancelled() {
        let mut flat = FlatSignal::new((1..=9).map(f64::from).collect());
        let table = ChromOffsetTable::from_lengths([("chrI", 9)]).unwrap();
        let sequences = IndexMap::from([("chrI".to_string(), b"ACGACGTTA".to_vec())]);
        cancel_dimer_noise(&mut flat, &table, &sequences).unwrap();
        assert_eq!(
            flat.as_slice(),
            &[0., 0., 3., 4., 0., 0., 7., 8., 0.]
        );
    }

    #[test]
    fn dimer_noise_uses_offsets() {
        let mut flat = FlatSignal::new(vec![1.0; 7]);
        let table = ChromOffsetTable::from_lengths([("c1", 3), ("c2", 4)]).unwrap();
        let sequences = IndexMap::from([("c2".to_string(), b"ACTG".to_vec())]);
        cancel_dimer_noise(&mut flat, &table, &sequences).unwrap();
        assert_eq!(flat.as_slice(), &[1., 1., 1., 0., 1., 1., 0.]);
    }

    #[test]
    fn dimer_noise_rejects_mismatches() {
        let mut flat = FlatSignal::new(vec![1.0; 4]);
        let table = ChromOffsetTable::from_lengths([("c1", 4)]).unwrap();
        let unknown = IndexMap::from([("c9".to_string(), b"ACTG".to_vec())]);
        assert!(matches!(
            cancel_dimer_noise(&mut flat, &table, &unknown),
            Err(ProfileError::UnknownChromosome(_))
        ));
        let short = IndexMap::from([("c1".to_string(), b"ACT".to_vec())]);
        assert!(matches!(
            cancel_dimer_noise(&mut flat, &table, &short),
            Err(ProfileError::ChromosomeLengthMismatch { .. })
        ));
    }
}
