//! Document renderer implementation.

mod http;

pub use http::HttpDocumentRenderer;
