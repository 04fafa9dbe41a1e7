use std::io::{
    Read,
    Write,
};

use bio::io::gff::GffType;
use log::{
    debug,
    info,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::PosType;
use crate::data_structs::{
    IntervalRecord,
    Strand,
};
use crate::error::{
    ProfileError,
    Result,
};
use crate::with_field_fn;

/// Reads BED records in file order. Columns past the sixth are ignored.
pub fn read_bed_intervals<R: Read>(reader: R) -> Result<Vec<IntervalRecord>> {
    let intervals = bio::io::bed::Reader::new(reader)
        .records()
        .map(|r| r.map(IntervalRecord::from).map_err(ProfileError::from))
        .collect::<Result<Vec<_>>>()?;
    debug!("Read {} BED intervals", intervals.len());
    Ok(intervals)
}

/// Writes intervals as BED. All rows get the same number of columns: six
/// when any interval is stranded, four when any is named, three otherwise.
pub fn write_bed_intervals<W: Write>(
    writer: W,
    intervals: &[IntervalRecord],
) -> Result<()> {
    let with_strand = intervals
        .iter()
        .any(|i| i.strand() != Strand::None);
    let with_name = intervals
        .iter()
        .any(|i| i.name().is_some());
    let mut writer = bio::io::bed::Writer::new(writer);
    for interval in intervals {
        writer.write(&interval.to_bed_record(with_name, with_strand))?;
    }
    Ok(())
}

/// Which GFF records become intervals. `None` accepts any value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GffFilter {
    pub source:       Option<String>,
    pub feature_type: Option<String>,
}

impl Default for GffFilter {
    fn default() -> Self {
        Self {
            source:       None,
            feature_type: Some("gene".into()),
        }
    }
}

impl GffFilter {
    with_field_fn!(source, Option<String>);

    with_field_fn!(feature_type, Option<String>);

    /// Filter that keeps every record.
    pub fn any() -> Self {
        Self {
            source:       None,
            feature_type: None,
        }
    }

    fn accepts(
        &self,
        record: &bio::io::gff::Record,
    ) -> bool {
        self.source
            .as_ref()
            .map_or(true, |s| s == record.source())
            && self
                .feature_type
                .as_ref()
                .map_or(true, |t| t == record.feature_type())
    }
}

/// Reads GFF3 features accepted by `filter` as half-open intervals.
///
/// The interval name is the `Name` attribute, or `ID` when there is none.
pub fn read_gff_intervals<R: Read>(
    reader: R,
    filter: &GffFilter,
) -> Result<Vec<IntervalRecord>> {
    let mut intervals = Vec::new();
    let mut skipped = 0usize;
    for record in bio::io::gff::Reader::new(reader, GffType::GFF3).records() {
        let record = record?;
        if !filter.accepts(&record) {
            skipped += 1;
            continue;
        }
        intervals.push(gff_to_interval(&record)?);
    }
    info!(
        "Read {} GFF intervals ({} records filtered out)",
        intervals.len(),
        skipped
    );
    Ok(intervals)
}

/// GFF positions are 1-based and inclusive.
fn gff_to_interval(record: &bio::io::gff::Record) -> Result<IntervalRecord> {
    let start = *record.start();
    let end = *record.end();
    if start == 0 {
        return Err(ProfileError::parse(format!(
            "GFF record on {} starts at 0, positions are 1-based",
            record.seqname()
        )));
    }
    let name = record
        .attributes()
        .get("Name")
        .or_else(|| record.attributes().get("ID"))
        .cloned();
    Ok(
        IntervalRecord::new(record.seqname(), (start - 1) as PosType, end as PosType)
            .with_name(name)
            .with_strand(Strand::from(record.strand())),
    )
}
