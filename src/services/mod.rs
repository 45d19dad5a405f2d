//! Business logic services.

mod analysis;

pub use analysis::AnalysisService;
