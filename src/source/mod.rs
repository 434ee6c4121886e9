//! Input capability: where text runs come from.
//!
//! The layout pipeline never touches PDF bytes. It asks a [`PdfSource`] for
//! a page count, the text runs of each page and the document metadata. A
//! [`SourceProvider`] constructs sources from raw bytes and reports a typed
//! error when the underlying reader cannot be brought up at all.

mod memory;

#[cfg(feature = "lopdf")]
mod pdf;

pub use memory::MemorySource;

#[cfg(feature = "lopdf")]
pub use pdf::{LopdfProvider, LopdfSource};

use crate::error::{Error, Result};
use crate::model::{Metadata, TextRun};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Read access to an opened document.
///
/// Pages are numbered from 1. Implementations must be shareable across
/// threads so pages can be processed in parallel.
pub trait PdfSource: Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Text runs of one page, in content-stream order.
    fn page_runs(&self, number: u32) -> Result<Vec<TextRun>>;

    /// Document metadata.
    fn metadata(&self) -> Result<Metadata> {
        Ok(Metadata::default())
    }
}

impl<S: PdfSource + ?Sized> PdfSource for &S {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn page_runs(&self, number: u32) -> Result<Vec<TextRun>> {
        (**self).page_runs(number)
    }

    fn metadata(&self) -> Result<Metadata> {
        (**self).metadata()
    }
}

/// Constructs sources from raw document bytes.
pub trait SourceProvider {
    /// The source type produced by this provider.
    type Source: PdfSource;

    /// Bring up the underlying reader.
    ///
    /// Failing here is fatal: no page is attempted and the error is
    /// returned as [`Error::BackendUnavailable`].
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Open a document.
    fn load(&self, data: &[u8]) -> Result<Self::Source>;
}

/// Check that data starts with the PDF header.
pub fn check_pdf_header(data: &[u8]) -> Result<()> {
    if data.starts_with(PDF_MAGIC) {
        Ok(())
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check a page number against a page count.
pub(crate) fn check_page(number: u32, count: u32) -> Result<()> {
    if number == 0 || number > count {
        return Err(Error::PageOutOfRange(number, count));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_pdf_header() {
        assert!(check_pdf_header(b"%PDF-1.7\n").is_ok());
        assert!(matches!(
            check_pdf_header(b"PK\x03\x04"),
            Err(Error::UnknownFormat)
        ));
        assert!(check_pdf_header(b"").is_err());
    }

    #[test]
    fn test_check_page() {
        assert!(check_page(1, 3).is_ok());
        assert!(matches!(check_page(0, 3), Err(Error::PageOutOfRange(0, 3))));
        assert!(matches!(check_page(4, 3), Err(Error::PageOutOfRange(4, 3))));
    }
}
