mod summary;
pub mod views;

pub use summary::{LeadPrioritizationReport, ReportOptions, ScoredModel};
