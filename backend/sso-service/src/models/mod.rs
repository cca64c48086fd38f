/// Data models for accounts and applications
pub mod app;
pub mod user;

pub use app::App;
pub use user::User;
