//! Request handler module
//!
//! Route table dispatch plus the two endpoint handlers: the rendered game
//! page and the static asset tree.

pub mod assets;
pub mod pages;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
