pub mod jwt;
pub mod password;
pub mod totp;
pub mod user_store;

pub use jwt::{Claims, JwtKeys};
pub use user_store::UserStore;
