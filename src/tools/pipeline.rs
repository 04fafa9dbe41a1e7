//! Staged profiling pipeline.
//!
//! The stages run in a fixed order, each consuming the previous one:
//! [`Assembled`] → [`Conditioned`] → [`Extracted`] → [`Resampled`].
//! Conditioning finishes for every track before any fragment is extracted,
//! so fragments always see the final signal. [`ProfilePipeline`] chains all
//! stages according to a [`ProfileConfig`].

use std::io::Read;

use indexmap::IndexMap;
use log::{
    debug,
    info,
};
use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::SignalType;
use crate::data_structs::{
    ChromOffsetTable,
    FlatSignal,
    FragmentSet,
    IntervalRecord,
    NormalizeMode,
    ResampledMatrix,
    SmoothingKind,
};
use crate::error::{
    ProfileError,
    Result,
};
use crate::io::SignalSource;
use crate::tools::assemble::assemble_all;
use crate::tools::extract::extract_all;
use crate::tools::preprocess::cancel_dimer_noise;
use crate::tools::resample::{
    resample_set,
    TargetLength,
};
use crate::utils::THREAD_POOL;
use crate::with_field_fn;

/// Moving-average windows for the tracks of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Smoothing {
    #[default]
    None,
    /// Same window for every track.
    Uniform(usize),
    /// One entry per track, `None` leaves that track unsmoothed.
    PerTrack(Vec<Option<usize>>),
}

impl Smoothing {
    /// Expands to exactly one window per track.
    pub fn windows(
        &self,
        n_tracks: usize,
    ) -> Result<Vec<Option<usize>>> {
        match self {
            Smoothing::None => Ok(vec![None; n_tracks]),
            Smoothing::Uniform(window) => Ok(vec![Some(*window); n_tracks]),
            Smoothing::PerTrack(windows) if windows.len() == n_tracks => {
                Ok(windows.clone())
            },
            Smoothing::PerTrack(windows) => {
                Err(ProfileError::invalid_parameter(format!(
                    "{} smoothing windows given for {} tracks",
                    windows.len(),
                    n_tracks
                )))
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub smoothing:      Smoothing,
    pub smoothing_kind: SmoothingKind,
    pub normalize:      NormalizeMode,
    /// Resample fragments to this length; `None` keeps raw fragments.
    pub target_length:  Option<TargetLength>,
    pub build_name_map: bool,
}

impl ProfileConfig {
    with_field_fn!(smoothing, Smoothing);

    with_field_fn!(smoothing_kind, SmoothingKind);

    with_field_fn!(normalize, NormalizeMode);

    with_field_fn!(target_length, Option<TargetLength>);

    with_field_fn!(build_name_map, bool);

    /// Reads a JSON config. Missing fields take their default value.
    pub fn from_json<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| ProfileError::parse(e.to_string()))
    }
}

/// Population mean and standard deviation of a conditioned track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackStats {
    pub mean: f64,
    pub std:  f64,
}

impl From<&FlatSignal> for TrackStats {
    fn from(flat: &FlatSignal) -> Self {
        let (mean, std) = flat.mean_std();
        Self { mean, std }
    }
}

/// Flat signals of every track over one shared offset table.
#[derive(Debug, Clone)]
pub struct Assembled {
    flats:   Vec<FlatSignal>,
    offsets: ChromOffsetTable,
}

impl Assembled {
    pub fn new<S, C>(
        sources: &[S],
        chrom_order: &[C],
    ) -> Result<Self>
    where
        S: SignalSource,
        C: AsRef<str>, {
        let (flats, offsets) = assemble_all(sources, chrom_order)?;
        Ok(Self { flats, offsets })
    }

    /// Wraps already assembled tracks. Every track must span the table.
    pub fn from_parts(
        flats: Vec<FlatSignal>,
        offsets: ChromOffsetTable,
    ) -> Result<Self> {
        if flats.is_empty() {
            return Err(ProfileError::EmptySource("no tracks supplied".into()));
        }
        if let Some(flat) = flats
            .iter()
            .find(|f| f.len() != offsets.total_length())
        {
            return Err(ProfileError::invalid_parameter(format!(
                "track of length {} does not match the offset table length {}",
                flat.len(),
                offsets.total_length()
            )));
        }
        Ok(Self { flats, offsets })
    }

    pub fn flats(&self) -> &[FlatSignal] {
        &self.flats
    }

    pub fn offsets(&self) -> &ChromOffsetTable {
        &self.offsets
    }

    /// Applies [`cancel_dimer_noise`] to every track.
    pub fn cancel_dimer_noise(
        mut self,
        sequences: &IndexMap<String, Vec<u8>>,
    ) -> Result<Self> {
        for flat in self.flats.iter_mut() {
            cancel_dimer_noise(flat, &self.offsets, sequences)?;
        }
        Ok(self)
    }

    /// Smooths, then normalizes every track, and records the statistics of
    /// the result.
    pub fn condition(
        mut self,
        smoothing: &Smoothing,
        kind: SmoothingKind,
        normalize: NormalizeMode,
    ) -> Result<Conditioned> {
        let windows = smoothing.windows(self.flats.len())?;
        THREAD_POOL.install(|| {
            self.flats
                .par_iter_mut()
                .zip(windows.par_iter())
                .try_for_each(|(flat, window)| {
                    if let Some(window) = window {
                        flat.smooth(*window, kind)?;
                    }
                    flat.normalize(normalize)
                })
        })?;

        let stats = self
            .flats
            .iter()
            .map(TrackStats::from)
            .collect::<Vec<_>>();
        for (idx, s) in stats.iter().enumerate() {
            debug!("Track {idx}: mean={:.4}, std={:.4}", s.mean, s.std);
        }
        info!(
            "Conditioned {} tracks (smoothing: {:?}, normalization: {})",
            self.flats.len(),
            smoothing,
            normalize
        );
        Ok(Conditioned {
            flats: self.flats,
            offsets: self.offsets,
            stats,
        })
    }
}

/// Tracks after smoothing and normalization.
#[derive(Debug, Clone)]
pub struct Conditioned {
    flats:   Vec<FlatSignal>,
    offsets: ChromOffsetTable,
    stats:   Vec<TrackStats>,
}

impl Conditioned {
    pub fn flats(&self) -> &[FlatSignal] {
        &self.flats
    }

    pub fn offsets(&self) -> &ChromOffsetTable {
        &self.offsets
    }

    pub fn stats(&self) -> &[TrackStats] {
        &self.stats
    }

    /// Cuts one fragment per interval out of every track. The flat signals
    /// are released afterwards.
    pub fn extract(
        self,
        intervals: &[IntervalRecord],
        build_name_map: bool,
    ) -> Result<Extracted> {
        let sets = extract_all(&self.flats, &self.offsets, intervals, build_name_map)?;
        info!(
            "Extracted {} intervals from {} tracks",
            intervals.len(),
            sets.len()
        );
        Ok(Extracted {
            offsets: self.offsets,
            stats: self.stats,
            sets,
        })
    }
}

/// Per-track fragment sets of raw (variable) length.
#[derive(Debug, Clone)]
pub struct Extracted {
    offsets: ChromOffsetTable,
    stats:   Vec<TrackStats>,
    sets:    Vec<FragmentSet>,
}

impl Extracted {
    pub fn offsets(&self) -> &ChromOffsetTable {
        &self.offsets
    }

    pub fn stats(&self) -> &[TrackStats] {
        &self.stats
    }

    pub fn sets(&self) -> &[FragmentSet] {
        &self.sets
    }

    /// The fragment of interval `name` in every track, in track order.
    pub fn fragments_by_name(
        &self,
        name: &str,
    ) -> Option<Vec<&[SignalType]>> {
        self.sets
            .iter()
            .map(|set| set.get_by_name(name))
            .collect()
    }

    pub fn resample(
        self,
        target: TargetLength,
    ) -> Result<Resampled> {
        let matrices = self
            .sets
            .into_iter()
            .map(|set| resample_set(set, target))
            .collect::<Result<Vec<_>>>()?;
        info!("Resampled {} tracks to {target} columns", matrices.len());
        Ok(Resampled {
            offsets: self.offsets,
            stats: self.stats,
            matrices,
        })
    }

    pub fn into_output(self) -> ProfileOutput {
        ProfileOutput {
            offsets: self.offsets,
            stats:   self.stats,
            tracks:  self
                .sets
                .into_iter()
                .map(TrackProfile::Fragments)
                .collect(),
        }
    }
}

/// Per-track matrices of fixed width.
#[derive(Debug, Clone)]
pub struct Resampled {
    offsets:  ChromOffsetTable,
    stats:    Vec<TrackStats>,
    matrices: Vec<ResampledMatrix>,
}

impl Resampled {
    pub fn offsets(&self) -> &ChromOffsetTable {
        &self.offsets
    }

    pub fn stats(&self) -> &[TrackStats] {
        &self.stats
    }

    pub fn matrices(&self) -> &[ResampledMatrix] {
        &self.matrices
    }

    pub fn into_output(self) -> ProfileOutput {
        ProfileOutput {
            offsets: self.offsets,
            stats:   self.stats,
            tracks:  self
                .matrices
                .into_iter()
                .map(TrackProfile::Matrix)
                .collect(),
        }
    }
}

/// Extraction result of one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrackProfile {
    Fragments(FragmentSet),
    Matrix(ResampledMatrix),
}

impl TrackProfile {
    pub fn as_fragments(&self) -> Option<&FragmentSet> {
        match self {
            TrackProfile::Fragments(set) => Some(set),
            TrackProfile::Matrix(_) => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&ResampledMatrix> {
        match self {
            TrackProfile::Matrix(matrix) => Some(matrix),
            TrackProfile::Fragments(_) => None,
        }
    }

    /// Number of profiled intervals.
    pub fn len(&self) -> usize {
        match self {
            TrackProfile::Fragments(set) => set.len(),
            TrackProfile::Matrix(matrix) => matrix.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileOutput {
    pub offsets: ChromOffsetTable,
    /// One entry per track, taken after conditioning.
    pub stats:   Vec<TrackStats>,
    /// One entry per track, in source order.
    pub tracks:  Vec<TrackProfile>,
}

/// Runs every stage according to a [`ProfileConfig`].
#[derive(Debug, Clone, Default)]
pub struct ProfilePipeline {
    config:    ProfileConfig,
    sequences: Option<IndexMap<String, Vec<u8>>>,
}

impl ProfilePipeline {
    pub fn new(config: ProfileConfig) -> Self {
        Self {
            config,
            sequences: None,
        }
    }

    /// Zero positions outside of dimers, see [`cancel_dimer_noise`], before
    /// conditioning.
    pub fn with_dimer_filter(
        mut self,
        sequences: IndexMap<String, Vec<u8>>,
    ) -> Self {
        self.sequences = Some(sequences);
        self
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    pub fn run<S, C>(
        &self,
        sources: &[S],
        chrom_order: &[C],
        intervals: &[IntervalRecord],
    ) -> Result<ProfileOutput>
    where
        S: SignalSource,
        C: AsRef<str>, {
        let mut assembled = Assembled::new(sources, chrom_order)?;
        if let Some(sequences) = &self.sequences {
            assembled = assembled.cancel_dimer_noise(sequences)?;
        }
        self.run_assembled(assembled, intervals)
    }

    /// Runs the remaining stages over already assembled tracks.
    pub fn run_assembled(
        &self,
        assembled: Assembled,
        intervals: &[IntervalRecord],
    ) -> Result<ProfileOutput> {
        let extracted = assembled
            .condition(
                &self.config.smoothing,
                self.config.smoothing_kind,
                self.config.normalize,
            )?
            .extract(intervals, self.config.build_name_map)?;

        match self.config.target_length {
            Some(target) => Ok(extracted.resample(target)?.into_output()),
            None => Ok(extracted.into_output()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;
    use crate::data_structs::Strand;
    use crate::io::InMemorySource;

    fn sources() -> Vec<InMemorySource> {
        vec![
            InMemorySource::new()
                .with_chrom("c1", (0..5).map(f64::from).collect())
                .with_chrom("c2", vec![5.0, 6.0, f64::NAN, 8.0]),
            InMemorySource::new()
                .with_chrom("c1", vec![1.0; 5])
                .with_chrom("c2", vec![2.0, 4.0, 6.0, 8.0]),
        ]
    }

    fn intervals() -> Vec<IntervalRecord> {
        vec![
            IntervalRecord::new("c1", 1, 4).with_name(Some("g1".into())),
            IntervalRecord::new("c2", 0, 4)
                .with_name(Some("g2".into()))
                .with_strand(Strand::Reverse),
        ]
    }

    #[test]
    fn raw_fragments_without_conditioning() {
        let output = ProfilePipeline::new(ProfileConfig::default().with_build_name_map(true))
            .run(&sources(), &["c1", "c2"], &intervals())
            .unwrap();

        assert_eq!(output.offsets.offset("c2"), Some(5));
        assert_eq!(output.tracks.len(), 2);
        let first = output.tracks[0].as_fragments().unwrap();
        assert_eq!(first.get(0).unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(first.get_by_name("g2").unwrap(), &[8.0, 0.0, 6.0, 5.0]);

        let (mean, std) = crate::utils::mean_std(&[0., 1., 2., 3., 4., 5., 6., 0., 8.]);
        assert_approx_eq!(output.stats[0].mean, mean);
        assert_approx_eq!(output.stats[0].std, std);
    }

    #[test]
    fn resampled_matrices() {
        let config = ProfileConfig::default().with_target_length(Some(TargetLength::Fixed(5)));
        let output = ProfilePipeline::new(config)
            .run(&sources(), &["c1", "c2"], &intervals())
            .unwrap();
        let matrix = output.tracks[1].as_matrix().unwrap();
        assert_eq!(matrix.data().dim(), (2, 5));
        assert!(matrix.names().is_none());
        let expected = [8.0, 6.5, 5.0, 3.5, 2.0];
        for (v, e) in matrix.row(1).unwrap().iter().zip(expected) {
            assert_approx_eq!(v, e);
        }
    }

    #[test]
    fn stats_follow_conditioning() {
        let config = ProfileConfig::default()
            .with_smoothing(Smoothing::PerTrack(vec![Some(3), None]))
            .with_normalize(NormalizeMode::Center);
        let output = ProfilePipeline::new(config)
            .run(&sources(), &["c1", "c2"], &intervals())
            .unwrap();
        for stats in &output.stats {
            assert_approx_eq!(stats.mean, 0.0, 1e-9);
            assert_approx_eq!(stats.std, 1.0, 1e-9);
        }
    }

    #[test]
    fn conditioning_precedes_extraction() {
        let assembled = Assembled::new(&sources(), &["c1", "c2"]).unwrap();
        let conditioned = assembled
            .condition(&Smoothing::None, SmoothingKind::Single, NormalizeMode::Remap)
            .unwrap();
        let extracted = conditioned.extract(&intervals(), true).unwrap();
        let by_name = extracted.fragments_by_name("g1").unwrap();
        assert_eq!(by_name.len(), 2);
        assert_approx_eq!(by_name[0][0], 1.0 / 8.0);
        assert!(extracted.fragments_by_name("missing").is_none());
    }

    #[test]
    fn constant_track_cannot_be_normalized() {
        let config = ProfileConfig::default().with_normalize(NormalizeMode::Remap);
        let flat = InMemorySource::new().with_chrom("c1", vec![3.0; 5]);
        assert!(matches!(
            ProfilePipeline::new(config).run(&[flat], &["c1"], &intervals()[..1]),
            Err(ProfileError::DegenerateSignal(_))
        ));
    }

    #[test]
    fn per_track_windows_must_match() {
        let config = ProfileConfig::default().with_smoothing(Smoothing::PerTrack(vec![Some(3)]));
        assert!(matches!(
            ProfilePipeline::new(config).run(&sources(), &["c1", "c2"], &intervals()),
            Err(ProfileError::InvalidParameter(_))
        ));
        assert_eq!(Smoothing::Uniform(4).windows(2).unwrap(), vec![Some(4); 2]);
    }

    #[test]
    fn dimer_filter_runs_before_conditioning() {
        let sequences = IndexMap::from([("c1".to_string(), b"ACTAC".to_vec())]);
        let output = ProfilePipeline::new(ProfileConfig::default())
            .with_dimer_filter(sequences)
            .run(&sources(), &["c1", "c2"], &intervals()[..1])
            .unwrap();
        assert_eq!(
            output.tracks[0].as_fragments().unwrap().get(0).unwrap(),
            &[1.0, 2.0, 0.0]
        );
    }

    #[test]
    fn from_parts_checks_lengths() {
        let table = ChromOffsetTable::from_lengths([("c1", 3)]).unwrap();
        assert!(Assembled::from_parts(vec![FlatSignal::new(vec![1.0; 2])], table.clone()).is_err());
        assert!(Assembled::from_parts(vec![], table.clone()).is_err());
        assert!(Assembled::from_parts(vec![FlatSignal::new(vec![1.0; 3])], table).is_ok());
    }

    #[test]
    fn config_from_json() {
        let json = r#"{
            "smoothing": {"uniform": 20},
            "smoothing_kind": "symmetric",
            "normalize": "center",
            "target_length": 1000
        }"#;
        let config = ProfileConfig::from_json(json.as_bytes()).unwrap();
        assert_eq!(config.smoothing, Smoothing::Uniform(20));
        assert_eq!(config.smoothing_kind, SmoothingKind::Symmetric);
        assert_eq!(config.normalize, NormalizeMode::Center);
        assert_eq!(config.target_length, Some(TargetLength::Fixed(1000)));
        assert!(!config.build_name_map);
        assert!(ProfileConfig::from_json("{\"normalize\": \"zscore\"}".as_bytes()).is_err());
    }
}
