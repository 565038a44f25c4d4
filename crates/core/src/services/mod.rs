//! Business logic services.

#![allow(missing_docs)]

pub mod account;
pub mod blog;
pub mod category;
pub mod email;
pub mod token;

pub use account::{
    AccountService, ChangeEmailInput, ChangePasswordInput, ChangePhoneInput, ChangeUsernameInput,
    LoginInput, RegisterInput, ResetPasswordInput, UploadedImage,
};
pub use blog::{
    BlogAuthor, BlogLikeEntry, BlogListItem, BlogPage, BlogService, CreateBlogInput,
};
pub use category::CategoryService;
pub use email::Mailer;
pub use token::{Claims, TokenPurpose, TokenService};
