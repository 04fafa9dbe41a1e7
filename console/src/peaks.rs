use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Args;
use itertools::Itertools;
use log::info;
use trackprofile::prelude::*;

use crate::utils::{
    create_output,
    read_lengths,
    validate_input,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct PeaksArgs {
    #[arg(required = true, help = "Path to a bedGraph track.")]
    track: PathBuf,

    #[arg(
        short = 'g',
        long,
        required = true,
        help = "Chromosome lengths: a chrom-sizes table or a FASTA index (.fai)."
    )]
    genome: PathBuf,

    #[arg(short, long, required = true, help = "Path of the output BED file.")]
    output: PathBuf,

    #[arg(
        short = 'r',
        long,
        default_value_t = 200,
        help = "Number of positions on each side a peak must exceed."
    )]
    range: usize,

    #[arg(
        short,
        long,
        default_value_t = EdgeMode::Wrap,
        help = "Behaviour at the signal ends: wrap or clip."
    )]
    mode: EdgeMode,

    #[arg(
        short,
        long,
        help = "Smooth the signal with this moving average window first."
    )]
    smooth: Option<usize>,
}

impl PeaksArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        validate_input(&self.track)?;
        let lengths = read_lengths(&self.genome)?;
        let chrom_order = lengths.keys().cloned().collect_vec();
        let source = BedGraphSource::from_path(&self.track, lengths)?;

        let (mut flat, offsets) = assemble(&source, &chrom_order)?;
        if let Some(window) = self.smooth {
            flat.smooth(window, SmoothingKind::Single)?;
        }

        let peaks = peak_detect(flat.as_slice(), self.range, self.mode)?
            .into_iter()
            .enumerate()
            .map(|(n, idx)| {
                let (chrom, pos) = offsets
                    .resolve(idx)
                    .ok_or_else(|| anyhow!("Peak index {idx} outside of the genome"))?;
                Ok(IntervalRecord::new(chrom, pos, pos + 1).with_name(Some(format!("peak_{n}"))))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        write_bed_intervals(BufWriter::new(create_output(&self.output)?), &peaks)?;
        info!("Wrote {} peaks to {}", peaks.len(), self.output.display());
        Ok(())
    }
}
