//! Layout reconstruction from positioned text runs.

mod classifier;
mod columns;
mod layout;
mod options;
mod table_detector;
mod tolerance;

pub use classifier::{BlockClassifier, LineContext, LineKind, PageStats};
pub use columns::cluster_columns;
pub use layout::{group_into_lines, group_into_paragraphs, LayoutAnalyzer, PageLayout};
pub use options::LayoutThresholds;
pub use table_detector::{DetectedTable, TableDetector};
pub use tolerance::{estimate_x_tolerance, median_height};
