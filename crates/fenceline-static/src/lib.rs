//! Static HTML build for MDX blog posts.
//!
//! Renders every post in a content directory to HTML, replacing code fences
//! with highlighted markup.

pub mod assets;
pub mod builder;
pub mod markdown;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use markdown::render_markdown;
