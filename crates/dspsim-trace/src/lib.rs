pub mod source;
pub mod trace;

// Re-export commonly used types/functions for consumers
pub use source::{load_source, window, Source, SourceLine};
pub use trace::{trace, Change, ErrorOut, Report, StepOut};
