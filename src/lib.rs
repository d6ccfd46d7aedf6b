pub mod cli;
pub mod input;
pub mod model;
pub mod pipeline;
pub mod report;

pub mod prelude {
    pub use crate::input::pairs::{IngestOptions, MicTransform, NumericMode};
    pub use crate::model::calls::{Call, Category, CategoryCount, Tier};
    pub use crate::model::config::{BreakpointConfig, ErrorWeights, TierWeights};
    pub use crate::model::measurement::{CandidateMode, MeasurementPair, MeasurementSet};
    pub use crate::model::ordinal::Ordinal;
    pub use crate::pipeline::stage2_classify::{DiaBreakpoints, classify_candidate};
    pub use crate::pipeline::stage3_indices::{IndexError, IndexResult, compute_indices};
    pub use crate::pipeline::stage4_scan::{
        CancelToken, RankBy, ScanOptions, ScanOutcome, scan_breakpoints,
    };
}
