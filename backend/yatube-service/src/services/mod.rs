//! Business logic layer
//!
//! Thin service structs over the repositories. Handlers own HTTP
//! concerns (status codes, redirects); services own validation
//! orchestration and database access.

pub mod comments;
pub mod feed;
pub mod follow;
pub mod groups;
pub mod posts;
pub mod users;

pub use comments::CommentService;
pub use feed::FeedService;
pub use follow::FollowService;
pub use groups::GroupService;
pub use posts::{PostService, SaveOutcome};
pub use users::UserService;
