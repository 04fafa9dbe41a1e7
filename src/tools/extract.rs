//! Strand-aware extraction of per-interval fragments from flat signals.

use itertools::Itertools;
use log::{
    debug,
    warn,
};
use rayon::prelude::*;

use crate::data_structs::typedef::Fragment;
use crate::data_structs::{
    ChromOffsetTable,
    FlatSignal,
    FragmentSet,
    IntervalRecord,
    NameIndex,
};
use crate::error::Result;
use crate::utils::{
    sanitize,
    THREAD_POOL,
};

/// Copies the values of one interval out of `flat`.
///
/// Reverse-strand fragments are returned back to front; unstranded records
/// are read as forward. Non-finite values become `0.0`. The fragment is an
/// owned copy, so later changes to `flat` never reach it.
pub fn extract_fragment(
    flat: &FlatSignal,
    offsets: &ChromOffsetTable,
    interval: &IntervalRecord,
) -> Result<Fragment> {
    let range = offsets.locate(interval.chrom(), interval.start(), interval.end())?;
    let mut fragment = flat.slice(range)?.to_vec();
    if interval.strand().is_reverse() {
        fragment.reverse();
    }
    sanitize(&mut fragment);
    Ok(fragment)
}

/// Extracts one fragment per interval, preserving interval order.
///
/// With `build_name_map` set the result also maps every interval name to
/// its fragment. If any interval is unnamed the lookup is skipped with a
/// warning; the extraction itself still completes.
pub fn extract(
    flat: &FlatSignal,
    offsets: &ChromOffsetTable,
    intervals: &[IntervalRecord],
    build_name_map: bool,
) -> Result<FragmentSet> {
    let names = name_index(intervals, build_name_map);
    extract_with_names(flat, offsets, intervals, names)
}

/// Runs [`extract`] over several tracks sharing one offset table.
///
/// Row `i` of every returned set belongs to interval `i`. Tracks are
/// processed on the crate thread pool.
pub fn extract_all(
    flats: &[FlatSignal],
    offsets: &ChromOffsetTable,
    intervals: &[IntervalRecord],
    build_name_map: bool,
) -> Result<Vec<FragmentSet>> {
    let names = name_index(intervals, build_name_map);
    THREAD_POOL.install(|| {
        flats
            .par_iter()
            .map(|flat| extract_with_names(flat, offsets, intervals, names.clone()))
            .collect::<Result<Vec<_>>>()
    })
}

fn extract_with_names(
    flat: &FlatSignal,
    offsets: &ChromOffsetTable,
    intervals: &[IntervalRecord],
    names: Option<NameIndex>,
) -> Result<FragmentSet> {
    let fragments = intervals
        .iter()
        .map(|interval| extract_fragment(flat, offsets, interval))
        .collect::<Result<Vec<_>>>()?;
    debug!("Extracted {} fragments", fragments.len());
    Ok(FragmentSet::new(fragments, names))
}

/// Name → interval index. Duplicate names resolve to the last interval.
fn name_index(
    intervals: &[IntervalRecord],
    build_name_map: bool,
) -> Option<NameIndex> {
    if !build_name_map {
        return None;
    }
    let unnamed = intervals
        .iter()
        .filter(|i| i.name().is_none())
        .count();
    if unnamed > 0 {
        warn!(
            "{} of {} intervals have no name, name lookup is not built",
            unnamed,
            intervals.len()
        );
        return None;
    }

    let index = intervals
        .iter()
        .enumerate()
        .filter_map(|(idx, i)| i.name().clone().map(|name| (name, idx)))
        .collect::<NameIndex>();
    let duplicates = intervals
        .iter()
        .filter_map(|i| i.name().as_deref())
        .duplicates()
        .count();
    if duplicates > 0 {
        warn!("{duplicates} interval names occur more than once, the last occurrence is kept");
    }
    Some(index)
}
