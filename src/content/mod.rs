//! Content module - posts, front matter, markdown, and the source adapter

mod frontmatter;
pub mod markdown;
mod post;
pub mod publish;
pub mod store;

pub use frontmatter::FrontMatter;
pub use post::{Post, PostSummary, ReadingTime, WORDS_PER_MINUTE};
pub use store::{ContentSource, CreatedPost, LocalStore};
