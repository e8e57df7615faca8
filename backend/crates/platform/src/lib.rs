//! Platform Crate - Technical Infrastructure
//!
//! Building blocks the feature crates share and that carry no clinical
//! meaning of their own:
//! - Session-token signing (HMAC-SHA256, URL-safe base64)
//! - Password hashing (Argon2id, NIST SP 800-63B policy)
//! - Cookie and bearer token extraction
//! - Client identification (IP, User-Agent) for the session audit trail
//! - Sandboxed media storage with atomic writes

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
pub mod storage;
