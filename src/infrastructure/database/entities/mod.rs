//! Database entities module

pub mod refresh_token;
pub mod technician;
pub mod user;

pub use refresh_token::Entity as RefreshToken;
pub use technician::Entity as Technician;
pub use user::Entity as User;
