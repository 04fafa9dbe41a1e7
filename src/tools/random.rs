use log::info;
use rand::Rng;

use crate::data_structs::IntervalRecord;
use crate::error::{
    ProfileError,
    Result,
};
use crate::io::ChromLengths;

/// Tiles every chromosome with consecutive intervals of random length.
///
/// Lengths are drawn uniformly from `1..=max_chunk`; the last interval of a
/// chromosome is clipped to its end. Profiles over such fragments serve as
/// a background to compare annotated features against.
pub fn random_fragments<R: Rng + ?Sized>(
    lengths: &ChromLengths,
    max_chunk: usize,
    rng: &mut R,
) -> Result<Vec<IntervalRecord>> {
    if max_chunk == 0 {
        return Err(ProfileError::invalid_parameter(
            "maximal fragment size must be a positive integer",
        ));
    }

    let mut fragments = Vec::new();
    for (chrom, &length) in lengths {
        let mut start = 0;
        while start < length {
            let end = (start + rng.gen_range(1..=max_chunk)).min(length);
            fragments.push(IntervalRecord::new(chrom.as_str(), start, end));
            start = end;
        }
    }
    info!(
        "Generated {} random fragments over {} chromosomes",
        fragments.len(),
        lengths.len()
    );
    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn lengths() -> ChromLengths {
        ChromLengths::from_iter([
            ("chrI".to_string(), 1000),
            ("chrII".to_string(), 37),
            ("chrM".to_string(), 0),
        ])
    }

    #[test]
    fn fragments_tile_each_chromosome() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let fragments = random_fragments(&lengths(), 50, &mut rng).unwrap();

        for (chrom, &length) in lengths().iter() {
            let on_chrom = fragments
                .iter()
                .filter(|f| f.chrom() == chrom)
                .collect::<Vec<_>>();
            if length == 0 {
                assert!(on_chrom.is_empty());
                continue;
            }
            assert_eq!(on_chrom.first().unwrap().start(), 0);
            assert_eq!(on_chrom.last().unwrap().end(), length);
            for pair in on_chrom.windows(2) {
                assert_eq!(pair[0].end(), pair[1].start());
            }
            assert!(on_chrom
                .iter()
                .all(|f| f.length() >= 1 && f.length() <= 50));
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let first = random_fragments(&lengths(), 20, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let second = random_fragments(&lengths(), 20, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unit_chunks_cover_every_position() {
        let lengths = ChromLengths::from_iter([("c".to_string(), 5)]);
        let fragments =
            random_fragments(&lengths, 1, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
        assert_eq!(fragments.len(), 5);
    }

    #[test]
    fn zero_chunk_is_rejected() {
        assert!(matches!(
            random_fragments(&lengths(), 0, &mut ChaCha8Rng::seed_from_u64(0)),
            Err(ProfileError::InvalidParameter(_))
        ));
    }
}
