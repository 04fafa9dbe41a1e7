use std::io::BufWriter;
use std::path::PathBuf;

use clap::Args;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use trackprofile::prelude::*;

use crate::utils::{
    create_output,
    read_lengths,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct RandomArgs {
    #[arg(
        required = true,
        help = "Chromosome lengths: a chrom-sizes table or a FASTA index (.fai)."
    )]
    genome: PathBuf,

    #[arg(short, long, required = true, help = "Path of the output BED file.")]
    output: PathBuf,

    #[arg(
        short = 'c',
        long,
        default_value_t = 6000,
        help = "Maximal size of a fragment."
    )]
    max_chunk: usize,

    #[arg(long, help = "Seed for reproducible fragments.")]
    seed: Option<u64>,
}

impl RandomArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let lengths = read_lengths(&self.genome)?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let fragments = random_fragments(&lengths, self.max_chunk, &mut rng)?;
        write_bed_intervals(BufWriter::new(create_output(&self.output)?), &fragments)?;
        info!(
            "Wrote {} random fragments to {}",
            fragments.len(),
            self.output.display()
        );
        Ok(())
    }
}
