//! In-memory source.

use crate::error::Result;
use crate::model::{Metadata, TextRun};

use super::{check_page, PdfSource};

/// A document held as pre-extracted text runs.
///
/// # Example
///
/// ```
/// use pdf2html::{MemorySource, PdfSource, TextRun};
///
/// let source = MemorySource::new()
///     .with_title("Notes")
///     .with_page(vec![TextRun::new("Hello", 72.0, 720.0, "Helvetica", 12.0)]);
///
/// assert_eq!(source.page_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<Vec<TextRun>>,
    metadata: Metadata,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source from a list of pages.
    pub fn from_pages(pages: Vec<Vec<TextRun>>) -> Self {
        Self {
            pages,
            metadata: Metadata::default(),
        }
    }

    /// Append a page.
    pub fn with_page(mut self, runs: Vec<TextRun>) -> Self {
        self.pages.push(runs);
        self
    }

    /// Set the metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    /// Replace the metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Append a page in place.
    pub fn push_page(&mut self, runs: Vec<TextRun>) {
        self.pages.push(runs);
    }
}

impl PdfSource for MemorySource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_runs(&self, number: u32) -> Result<Vec<TextRun>> {
        check_page(number, self.page_count())?;
        Ok(self.pages[(number - 1) as usize].clone())
    }

    fn metadata(&self) -> Result<Metadata> {
        Ok(self.metadata.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_memory_source_pages() {
        let source = MemorySource::new()
            .with_page(vec![TextRun::new("one", 0.0, 0.0, "F1", 10.0)])
            .with_page(vec![]);

        assert_eq!(source.page_count(), 2);
        assert_eq!(source.page_runs(1).unwrap()[0].text, "one");
        assert!(source.page_runs(2).unwrap().is_empty());
        assert!(matches!(
            source.page_runs(3),
            Err(Error::PageOutOfRange(3, 2))
        ));
    }

    #[test]
    fn test_memory_source_metadata() {
        let source = MemorySource::new().with_title("Report");
        assert_eq!(source.metadata().unwrap().title.as_deref(), Some("Report"));
    }

    #[test]
    fn test_with_metadata_replaces_title() {
        let metadata = Metadata {
            author: Some("Ada".to_string()),
            ..Metadata::default()
        };
        let source = MemorySource::new().with_title("Draft").with_metadata(metadata);

        let read = source.metadata().unwrap();
        assert_eq!(read.author.as_deref(), Some("Ada"));
        assert!(read.title.is_none());
    }

    #[test]
    fn test_push_page_appends_in_order() {
        let mut source = MemorySource::new().with_page(vec![TextRun::new("one", 0.0, 0.0, "F1", 10.0)]);
        source.push_page(vec![TextRun::new("two", 0.0, 0.0, "F1", 10.0)]);
        source.push_page(Vec::new());

        assert_eq!(source.page_count(), 3);
        assert_eq!(source.page_runs(2).unwrap()[0].text, "two");
        assert!(source.page_runs(3).unwrap().is_empty());
    }
}
