//! Rendering options and page selection.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// MathJax bundle referenced by the default HTML shell.
pub const MATHJAX_URL: &str = "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js";

/// Options for HTML output.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Title used when the document metadata carries none
    pub title_fallback: Option<String>,

    /// Math rendering script referenced from the shell (None = no script)
    pub math_script: Option<String>,

    /// Include the baseline stylesheet
    pub include_styles: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title_fallback = Some(title.into());
        self
    }

    /// Set the math script URL.
    pub fn with_math_script(mut self, url: impl Into<String>) -> Self {
        self.math_script = Some(url.into());
        self
    }

    /// Omit the math script.
    pub fn without_math_script(mut self) -> Self {
        self.math_script = None;
        self
    }

    /// Enable or disable the baseline stylesheet.
    pub fn with_styles(mut self, include: bool) -> Self {
        self.include_styles = include;
        self
    }

    /// Resolve the title to show: metadata first, then the fallback.
    ///
    /// A blank candidate counts as absent.
    pub fn resolve_title(&self, metadata_title: Option<&str>) -> Option<String> {
        metadata_title
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                self.title_fallback
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
            })
            .map(str::to_string)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title_fallback: None,
            math_script: Some(MATHJAX_URL.to_string()),
            include_styles: true,
        }
    }
}

/// Which pages to convert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A single page (1-indexed)
    Single(u32),
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    List(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Single(n) => *n == page,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::List(pages) => pages.contains(&page),
        }
    }

    /// Selected page numbers of a document with `count` pages, ascending.
    pub fn pages(&self, count: u32) -> Vec<u32> {
        (1..=count).filter(|p| self.includes(*p)).collect()
    }

    /// Parse a page selection string (e.g., "3", "1-10", "1,3,5-7").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        if !s.contains(',') {
            if s.contains('-') {
                return Ok(PageSelection::Range(parse_span(s)?));
            }
            return Ok(PageSelection::Single(parse_page(s)?));
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            if part.contains('-') {
                pages.extend(parse_span(part)?);
            } else {
                pages.push(parse_page(part)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::List(pages))
    }
}

/// `start-end` with `start <= end`.
fn parse_span(s: &str) -> Result<RangeInclusive<u32>> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| Error::InvalidPageRange(s.trim().to_string()))?;
    let (start, end) = (parse_page(start)?, parse_page(end)?);
    if start > end {
        return Err(Error::InvalidPageRange(s.trim().to_string()));
    }
    Ok(start..=end)
}

fn parse_page(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(s.trim().to_string())),
        Ok(n) => Ok(n),
    }
}
