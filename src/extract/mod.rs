// HTML extraction: meta tags, headings, and visible text.

pub mod snapshot;
