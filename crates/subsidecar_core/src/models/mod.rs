//! Data model: stream snapshots, probe reports, subtitle families, outcomes.

mod enums;
mod media;

pub use enums::{
    ExtractionOutcome, StreamKind, SubtitleKind, ASS_KIND, EXTRACTED_TAG_VALUE, SRT_KIND,
};
pub use media::{ProbeReport, StreamDescriptor};
