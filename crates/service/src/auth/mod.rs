//! Accounts: registration, login tokens, profiles, avatars, password reset.

mod avatar;
mod mailer;
mod password;
mod reset_codes;
mod service;
mod token;

pub use avatar::{ImageKind, sniff_image};
pub use mailer::{LogMailer, Mailer, SmtpMailer, mailer_from_config};
pub use password::{hash_password, verify_password};
pub use reset_codes::ResetCodeCache;
pub use service::{AuthService, LoginRequest, LoginResult, RegisterUser, UpdateProfile};
pub use token::{Claims, TokenSigner};
