//! Database repositories.

mod blog;
mod category;
mod keyword;
mod like;
mod user;

pub use blog::{BlogFilter, BlogRepository, BlogScope, SortDirection, sort_column};
pub use category::CategoryRepository;
pub use keyword::KeywordRepository;
pub use like::LikeRepository;
pub use user::UserRepository;
