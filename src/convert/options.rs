//! Conversion options.

use crate::parser::LayoutThresholds;
use crate::render::{PageSelection, RenderOptions};

/// Options for document conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Rendering options
    pub render: RenderOptions,

    /// Layout heuristic thresholds
    pub thresholds: LayoutThresholds,

    /// Process pages in parallel
    pub parallel: bool,

    /// Which pages to convert
    pub pages: PageSelection,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title used when the document has none.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.render = self.render.with_title(title);
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Set layout thresholds.
    pub fn with_thresholds(mut self, thresholds: LayoutThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set the math script URL.
    pub fn with_math_script(mut self, url: impl Into<String>) -> Self {
        self.render = self.render.with_math_script(url);
        self
    }

    /// Enable or disable the baseline stylesheet.
    pub fn with_styles(mut self, include: bool) -> Self {
        self.render = self.render.with_styles(include);
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            thresholds: LayoutThresholds::default(),
            parallel: true,
            pages: PageSelection::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_title("Fallback")
            .sequential()
            .with_pages(PageSelection::Single(2))
            .with_styles(false);

        assert_eq!(options.render.title_fallback.as_deref(), Some("Fallback"));
        assert!(!options.parallel);
        assert_eq!(options.pages, PageSelection::Single(2));
        assert!(!options.render.include_styles);
    }

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert!(options.parallel);
        assert_eq!(options.pages, PageSelection::All);
        assert_eq!(options.thresholds, LayoutThresholds::default());
    }
}
