use std::fmt::Display;

use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::enums::Strand;
use crate::data_structs::typedef::PosType;
use crate::{
    getter_fn,
    with_field_fn,
};

/// One feature annotation: a half-open interval on a chromosome, optionally
/// named and stranded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalRecord {
    chrom:  String,
    start:  PosType,
    end:    PosType,
    name:   Option<String>,
    strand: Strand,
}

impl IntervalRecord {
    /// Creates an unnamed, unstranded record. Bounds are validated against
    /// the chromosome length at extraction time.
    pub fn new<S: Into<String>>(
        chrom: S,
        start: PosType,
        end: PosType,
    ) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            name: None,
            strand: Strand::None,
        }
    }

    getter_fn!(chrom, String);

    getter_fn!(name, Option<String>);

    with_field_fn!(name, Option<String>);

    with_field_fn!(strand, Strand);

    pub fn start(&self) -> PosType {
        self.start
    }

    pub fn end(&self) -> PosType {
        self.end
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Number of positions covered. Zero for malformed (`start >= end`)
    /// records.
    pub fn length(&self) -> PosType {
        self.end.saturating_sub(self.start)
    }
}

impl From<bio::io::bed::Record> for IntervalRecord {
    fn from(value: bio::io::bed::Record) -> Self {
        Self {
            chrom:  value.chrom().to_string(),
            start:  value.start() as PosType,
            end:    value.end() as PosType,
            name:   value
                .name()
                .filter(|name| *name != ".")
                .map(String::from),
            strand: Strand::from(value.strand()),
        }
    }
}

impl From<&IntervalRecord> for bio::io::bed::Record {
    fn from(value: &IntervalRecord) -> Self {
        let stranded = value.strand != Strand::None;
        value.to_bed_record(stranded || value.name.is_some(), stranded)
    }
}

impl IntervalRecord {
    /// BED record with a fixed column layout: the name column is written
    /// (as `.` when unnamed) if `with_name`, score and strand if
    /// `with_strand`.
    pub(crate) fn to_bed_record(
        &self,
        with_name: bool,
        with_strand: bool,
    ) -> bio::io::bed::Record {
        let mut record = bio::io::bed::Record::new();
        record.set_chrom(&self.chrom);
        record.set_start(self.start as u64);
        record.set_end(self.end as u64);
        if with_name || with_strand {
            record.set_name(self.name.as_deref().unwrap_or("."));
        }
        if with_strand {
            record.set_score("0");
            record.push_aux(&self.strand.to_string());
        }
        record
    }
}

impl Display for IntervalRecord {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{} ({})",
            self.chrom, self.start, self.end, self.strand
        )
    }
}
