//! External API clients
//!
//! The post board is a JSON collection reached over HTTP; see `post_board`.

pub mod post_board;

pub use post_board::{format_when, posts_from_records, NewPost, Post, PostBoardClient};
