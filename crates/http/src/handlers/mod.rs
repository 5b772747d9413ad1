#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]

pub mod ai;
pub mod auth;
pub mod conversations;
pub mod legacy;
pub mod messages;
pub mod sessions;
