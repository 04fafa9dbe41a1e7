use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{
    anyhow,
    Context,
};
use clap::{
    Args,
    ValueEnum,
};
use indexmap::IndexMap;
use itertools::Itertools;
use log::info;
use serde::Serialize;
use trackprofile::prelude::*;

use crate::utils::{
    create_output,
    output_path,
    read_intervals,
    read_lengths,
    validate_input,
    UtilsArgs,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum CliNormalize {
    None,
    Center,
    Remap,
}

impl From<CliNormalize> for NormalizeMode {
    fn from(value: CliNormalize) -> Self {
        match value {
            CliNormalize::None => NormalizeMode::None,
            CliNormalize::Center => NormalizeMode::Center,
            CliNormalize::Remap => NormalizeMode::Remap,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ProfileArgs {
    #[arg(
        short,
        long,
        num_args = 1..,
        required = true,
        help = "Paths to bedGraph tracks. One output table is written per track."
    )]
    tracks: Vec<PathBuf>,

    #[arg(
        short = 'g',
        long,
        required = true,
        help = "Chromosome lengths: a chrom-sizes table or a FASTA index (.fai)."
    )]
    genome: PathBuf,

    #[arg(
        short,
        long,
        required = true,
        help = "Feature annotation, BED or GFF3 (by extension)."
    )]
    annotation: PathBuf,

    #[arg(
        short,
        long,
        required = true,
        help = "Prefix for the generated output files."
    )]
    output: PathBuf,

    #[arg(
        short = 'O',
        long,
        num_args = 1..,
        help = "Order of the chromosomes. Defaults to the order of the lengths file."
    )]
    order: Option<Vec<String>>,

    #[arg(
        long,
        help = "JSON file with the profile configuration. Flags below are ignored \
                when it is given."
    )]
    config: Option<PathBuf>,

    #[arg(
        short,
        long,
        num_args = 1..,
        help_heading = "CONDITIONING ARGS",
        help = "Moving average window. Give one value for all tracks or one per \
                track; 0 disables smoothing of that track."
    )]
    smooth: Option<Vec<usize>>,

    #[arg(
        long,
        default_value_t = false,
        help_heading = "CONDITIONING ARGS",
        help = "Average forward and backward smoothing passes."
    )]
    symmetric: bool,

    #[arg(
        short,
        long,
        value_enum,
        default_value_t = CliNormalize::None,
        help_heading = "CONDITIONING ARGS",
        help = "Normalization applied after smoothing."
    )]
    normalize: CliNormalize,

    #[arg(
        short,
        long,
        help_heading = "PROFILE ARGS",
        help = "Resample every fragment to this many points, or 'longest-fragment'. \
                Raw fragments are written when omitted."
    )]
    length: Option<TargetLength>,

    #[arg(
        long,
        default_value_t = false,
        help_heading = "PROFILE ARGS",
        help = "Label output rows with interval names."
    )]
    names: bool,

    #[arg(
        long,
        help_heading = "PROFILE ARGS",
        help = "FASTA with the reference sequence. Signal outside of dimers is set \
                to zero before conditioning."
    )]
    dimer_fasta: Option<PathBuf>,

    #[arg(
        long,
        help_heading = "ANNOTATION ARGS",
        help = "Keep only GFF records from this source."
    )]
    gff_source: Option<String>,

    #[arg(
        long,
        default_value = "gene",
        help_heading = "ANNOTATION ARGS",
        help = "Keep only GFF records of this feature type."
    )]
    gff_type: String,
}

#[derive(Serialize)]
struct Summary<'a> {
    tracks:  Vec<String>,
    config:  &'a ProfileConfig,
    offsets: &'a ChromOffsetTable,
    stats:   &'a [TrackStats],
}

impl ProfileArgs {
    fn profile_config(&self) -> anyhow::Result<ProfileConfig> {
        if let Some(path) = &self.config {
            validate_input(path)?;
            return ProfileConfig::from_json(File::open(path)?)
                .with_context(|| format!("Failed to read config {}", path.display()));
        }

        let to_window = |w: usize| (w > 0).then_some(w);
        let smoothing = match self.smooth.as_deref() {
            None => Smoothing::None,
            Some([window]) => {
                match to_window(*window) {
                    Some(w) => Smoothing::Uniform(w),
                    None => Smoothing::None,
                }
            },
            Some(windows) => {
                Smoothing::PerTrack(
                    windows
                        .iter()
                        .map(|w| to_window(*w))
                        .collect(),
                )
            },
        };
        let kind = if self.symmetric {
            SmoothingKind::Symmetric
        } else {
            SmoothingKind::Single
        };

        Ok(ProfileConfig::default()
            .with_smoothing(smoothing)
            .with_smoothing_kind(kind)
            .with_normalize(self.normalize.into())
            .with_target_length(self.length)
            .with_build_name_map(self.names))
    }

    fn load_tracks(
        &self,
        lengths: &ChromLengths,
        utils: &UtilsArgs,
    ) -> anyhow::Result<Vec<BedGraphSource>> {
        let pbar = utils.pbar(self.tracks.len())?;
        let mut sources = Vec::with_capacity(self.tracks.len());
        for path in &self.tracks {
            validate_input(path)?;
            pbar.set_message(path.display().to_string());
            let source = BedGraphSource::from_path(path, lengths.clone())
                .with_context(|| format!("Failed to read track {}", path.display()))?;
            info!(
                "Read {} ({} chromosomes covered)",
                path.display(),
                source.n_covered()
            );
            sources.push(source);
            pbar.inc(1);
        }
        pbar.finish_and_clear();
        Ok(sources)
    }

    fn track_label(
        &self,
        idx: usize,
    ) -> String {
        self.tracks[idx]
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("track{idx}"))
    }

    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let config = self.profile_config()?;
        let lengths = read_lengths(&self.genome)?;
        let chrom_order = self
            .order
            .clone()
            .unwrap_or_else(|| lengths.keys().cloned().collect_vec());

        let filter = GffFilter::default()
            .with_source(self.gff_source.clone())
            .with_feature_type(Some(self.gff_type.clone()));
        let intervals = read_intervals(&self.annotation, &filter)?;
        if intervals.is_empty() {
            return Err(anyhow!(
                "No intervals found in {}",
                self.annotation.display()
            ));
        }

        let mut pipeline = ProfilePipeline::new(config.clone());
        if let Some(fasta) = &self.dimer_fasta {
            validate_input(fasta)?;
            let sequences: IndexMap<String, Vec<u8>> = read_fasta_sequences(File::open(fasta)?)
                .with_context(|| format!("Failed to read {}", fasta.display()))?;
            pipeline = pipeline.with_dimer_filter(sequences);
        }

        let sources = self.load_tracks(&lengths, utils)?;
        let output = pipeline.run(&sources, &chrom_order, &intervals)?;

        for (idx, track) in output.tracks.iter().enumerate() {
            let path = output_path(&self.output, &format!("{}.tsv", self.track_label(idx)));
            let writer = BufWriter::new(create_output(&path)?);
            match track {
                TrackProfile::Matrix(matrix) => write_matrix_tsv(writer, matrix)?,
                TrackProfile::Fragments(set) => write_fragments_tsv(writer, set)?,
            }
            info!("Wrote {} profiles to {}", track.len(), path.display());
        }

        let summary = Summary {
            tracks:  (0..self.tracks.len())
                .map(|idx| self.track_label(idx))
                .collect(),
            config:  &config,
            offsets: &output.offsets,
            stats:   &output.stats,
        };
        let summary_path = output_path(&self.output, "summary.json");
        serde_json::to_writer_pretty(BufWriter::new(create_output(&summary_path)?), &summary)?;
        info!("Wrote summary to {}", summary_path.display());
        Ok(())
    }
}
