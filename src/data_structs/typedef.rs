/// Genomic coordinate (0-based, half-open intervals).
pub type PosType = usize;
/// Numeric type of every signal value held by the core.
pub type SignalType = f64;
/// Strand-oriented, independently owned copy of one interval's values.
pub type Fragment = Vec<SignalType>;
