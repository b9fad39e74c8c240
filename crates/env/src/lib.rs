//! Turning resolved sources into one environment
//!
//! Raw entries are normalized into canonical keys, folded together in source
//! order by the [`MergeEngine`], and driven end to end by [`Pipeline`], which
//! also decides what a failed source means for the run.

pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod summary;

pub use merge::{KeyReport, MergeEngine, MergeReport, OverrideMark, SourceReport, SourceStatus};
pub use normalize::{canonical_key, normalize_entry};
pub use pipeline::{source_error_line, ErrorMode, Pipeline, PipelineFailure, PipelineOutput};
pub use summary::render_summary;
