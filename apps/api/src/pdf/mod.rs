// PDF export: pagination planning over client-side section captures, page
// composition with printpdf, and a text-only fallback document.

pub mod compose;
pub mod fallback;
pub mod handlers;
pub mod paginate;
pub mod types;
