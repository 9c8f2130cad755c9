//! URL handling for research pages
//!
//! This module normalizes research-page URLs to a stable absolute form and
//! derives stable internal names from link titles or URL slugs. The naming
//! rule is deliberately pure: the crawler (for failed pages) and the
//! identifier resolver (for never-crawled link targets) must agree on the
//! name they produce for the same input.

mod naming;
mod normalize;

pub use naming::{fallback_name_from_title, sanitize_filename, slug_from_url};
pub use normalize::{is_research_href, normalize_research_url};
