//! Core of the hotnot content board.
//!
//! This crate provides:
//! - Identity tokens derived from client addresses
//! - Markdown to sanitized HTML rendering
//! - A file-per-slot content store for topic bodies, comments and assessments
//! - Topic aggregation (sentiment statistics, seen/unseen split)
//! - Comment collection for display

mod address;
mod aggregate;
mod board;
mod comments;
mod error;
mod identity;
mod renderer;
mod store;
mod types;

pub use address::SlotAddress;
pub use aggregate::{TopicAggregator, hotness_percent};
pub use board::{Board, BoardConfig, Submission, TopicPage};
pub use comments::CommentCollector;
pub use error::BoardError;
pub use identity::{IdentityRegistry, IdentityResolver, digest, host_of};
pub use renderer::{render_markdown, render_page, sanitize};
pub use store::ContentStore;
pub use types::{
    Assessment, CommentView, Identity, SaveKind, TopicListing, TopicSummary, TopicTitle,
};
