//! Shared constants for the Questline backend.

/// Maximum number of rows any list query may return.
pub const MAX_QUERY_LIMIT: usize = 1000;

/// Messages returned by `GET /api/messages` when no limit is given.
pub const DEFAULT_MESSAGE_LIMIT: usize = 200;

/// Default number of rows for other list endpoints.
pub const DEFAULT_QUERY_LIMIT: usize = 50;

/// MySQL connection pool: maximum connections.
pub const DB_POOL_MAX_CONNECTIONS: u32 = 10;

/// MySQL connection pool: acquire timeout in seconds.
pub const DB_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// MySQL connection pool: idle timeout in seconds.
pub const DB_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Lifetime of an emailed password reset code.
pub const RESET_CODE_TTL_SECS: u64 = 600;

/// Number of digits in a password reset code.
pub const RESET_CODE_DIGITS: u32 = 6;

/// How often the background sweeper drops expired reset codes.
pub const RESET_CODE_SWEEP_INTERVAL_SECS: u64 = 60;

/// Lifetime of an auth token.
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Largest avatar upload accepted, in bytes.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Title given to games created implicitly on first reference.
pub const DEFAULT_GAME_TITLE: &str = "Untitled Adventure";

/// Name given to characters created implicitly on first reference.
pub const DEFAULT_CHARACTER_NAME: &str = "Adventurer";

/// Title given to conversation logs saved without one.
pub const DEFAULT_CONVERSATION_TITLE: &str = "New Conversation";

/// Signing key used when `JWT_SECRET` is unset. Only suitable for local development.
pub const DEV_JWT_SECRET: &str = "questline-dev-secret";

/// Error message when the external AI server is not configured.
pub const AI_SERVER_NOT_CONFIGURED: &str = "AI server not configured (AI_SERVER_URL not set)";

/// SMTP relay used when `MAIL_HOST` is unset.
pub const DEFAULT_MAIL_HOST: &str = "smtp.gmail.com";

/// Implicit-TLS submission port; 587 switches to STARTTLS.
pub const DEFAULT_MAIL_PORT: u16 = 465;
