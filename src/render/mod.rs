//! Rendering of reconstructed documents to HTML and JSON.

mod html;
mod json;
mod options;
mod result;
mod shell;

pub use html::{escape_html, HtmlRenderer};
pub use json::{to_json, JsonFormat};
pub use options::{PageSelection, RenderOptions, MATHJAX_URL};
pub use result::RenderStats;
pub use shell::{wrap_document, ERROR_HTML};
