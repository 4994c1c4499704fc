//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations for the front-end core:
//! - Durable per-origin key-value storage (memory and file backed)
//! - Cryptographic helpers (SHA-256, Base64/Base64url)
//! - HTTP client construction and bearer-token plumbing
//! - Clear-text password handling with zeroization

pub mod crypto;
pub mod http;
pub mod password;
pub mod storage;
