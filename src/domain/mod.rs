//! Domain layer for the cafe console.
//!
//! Types and rules that are independent of Zellij and of the HTTP transport.
//!
//! # Organization
//!
//! - [`error`]: Error taxonomy and result alias
//! - [`normalize`]: String normalization used by filtering and sorting
//! - [`cafe`]: Cafe, category and write-payload models

pub mod cafe;
pub mod error;
pub mod normalize;

pub use cafe::{Cafe, CafeKey, CafePayload, CafeRecord, Category, CategoryRef, NO_CATEGORY};
pub use error::{ConsoleError, Result};
pub use normalize::{normalize, normalize_opt};
