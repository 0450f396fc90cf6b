// Aggregation & Reporting: run summaries, sheet/snapshot exports, console report.

pub mod console;
pub mod export;
pub mod summary;
