//! Document model types.
//!
//! Text runs come in from a [`PdfSource`](crate::source::PdfSource), are
//! assembled into per-page [`Line`]s, [`Paragraph`]s and [`ColumnCluster`]s,
//! and leave as classified [`Block`]s collected into a [`Document`].

mod block;
mod diagnostic;
mod document;
mod line;
mod run;

pub use block::{Block, Span, TableBlock};
pub use diagnostic::{CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, LogSink, NullSink};
pub use document::{Document, Metadata, Page};
pub use line::{ColumnCluster, Line, Paragraph};
pub use run::TextRun;
