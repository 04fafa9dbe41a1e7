use std::fs::File;
use std::path::{
    Path,
    PathBuf,
};

use anyhow::{
    anyhow,
    Context,
};
use clap::Args;
use console::style;
use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use log::LevelFilter;
use trackprofile::prelude::*;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        long,
        default_value_t = 1,
        help_heading = "UTILS",
        help = "Number of threads to use. 0 uses one thread per core."
    )]
    pub threads: usize,

    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help_heading = "UTILS",
        help = "Increase log verbosity (-v info, -vv debug)."
    )]
    pub verbose: u8,

    #[arg(
        long,
        default_value_t = false,
        help_heading = "UTILS",
        help = "Show a progress bar."
    )]
    pub progress: bool,
}

impl UtilsArgs {
    /// Installs the logger and sizes the library thread pool. Must run
    /// before any library call touches the pool.
    pub fn setup(&self) -> anyhow::Result<()> {
        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        };
        pretty_env_logger::formatted_builder()
            .filter_level(level)
            .parse_env("RUST_LOG")
            .try_init()?;

        std::env::set_var("TRACKPROFILE_NUM_THREADS", self.threads.to_string());
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build_global()?;
        Ok(())
    }

    pub fn pbar(
        &self,
        total: usize,
    ) -> anyhow::Result<ProgressBar> {
        if self.progress {
            init_pbar(total)
        } else {
            Ok(ProgressBar::hidden())
        }
    }
}

pub fn init_pbar(total: usize) -> anyhow::Result<ProgressBar> {
    let progress_bar = ProgressBar::new(total as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}, ETA: {eta}] \
                 [{bar:40.cyan/blue}] {pos:>5.green}/{len:5} {msg}",
            )?
            .progress_chars("#>-"),
    );
    progress_bar.set_message("Processing...");
    Ok(progress_bar)
}

pub fn validate_input(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        return Err(anyhow!(
            "Path {} does not exist.",
            style(path.display()).red()
        ));
    }
    if !path.is_file() {
        return Err(anyhow!(
            "Path {} is not a file.",
            style(path.display()).red()
        ));
    }
    Ok(())
}

pub fn create_output(path: &Path) -> anyhow::Result<File> {
    if path.is_dir() {
        return Err(anyhow!(
            "Output path {} is a directory.",
            style(path.display()).red()
        ));
    }
    File::create(path).with_context(|| format!("Failed to create {}", path.display()))
}

fn has_extension(
    path: &Path,
    extensions: &[&str],
) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            extensions
                .iter()
                .any(|x| e.eq_ignore_ascii_case(x))
        })
}

/// Chromosome lengths from a `.fai` index or a chrom-sizes table.
pub fn read_lengths(path: &Path) -> anyhow::Result<ChromLengths> {
    validate_input(path)?;
    let file = File::open(path)?;
    let lengths = if has_extension(path, &["fai"]) {
        read_fai_lengths(file)
    } else {
        read_chrom_sizes(file)
    }
    .with_context(|| format!("Failed to read chromosome lengths from {}", path.display()))?;
    if lengths.is_empty() {
        return Err(anyhow!("No chromosomes found in {}", path.display()));
    }
    Ok(lengths)
}

/// Intervals from a BED file, or from GFF when the extension says so.
pub fn read_intervals(
    path: &Path,
    filter: &GffFilter,
) -> anyhow::Result<Vec<IntervalRecord>> {
    validate_input(path)?;
    let file = File::open(path)?;
    if has_extension(path, &["gff", "gff3"]) {
        read_gff_intervals(file, filter)
    } else {
        read_bed_intervals(file)
    }
    .with_context(|| format!("Failed to read intervals from {}", path.display()))
}

/// `prefix.suffix`, keeping the directory of `prefix`.
pub fn output_path(
    prefix: &Path,
    suffix: &str,
) -> PathBuf {
    let mut name = prefix
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(suffix);
    prefix.with_file_name(name)
}
