//! Database entities.

pub mod blog;
pub mod blog_keyword;
pub mod category;
pub mod keyword;
pub mod like;
pub mod user;

pub use blog::Entity as Blog;
pub use blog_keyword::Entity as BlogKeyword;
pub use category::Entity as Category;
pub use keyword::Entity as Keyword;
pub use like::Entity as Like;
pub use user::Entity as User;
