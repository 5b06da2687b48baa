//! Git repository cache adapter.

mod cache;
mod discover;

pub use cache::{GitRepositoryCache, relative_checkout_path};
pub use discover::{DOCKERFILE, TEMPLATE_FILE, discover_tools};
