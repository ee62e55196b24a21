//! Foundation types for Bakul.
//!
//! This crate provides the identity and temporal types shared by every other
//! Bakul crate: the store-assigned [`ItemId`], the random [`ItemUuid`] every
//! item receives at creation, and the [`Clock`] used to stamp creation and
//! modification times.
//!
//! # Key Types
//!
//! - [`ItemId`] — Opaque, store-assigned identity of a tree item
//! - [`ItemUuid`] — 32-character lowercase hexadecimal identifier
//! - [`UuidGenerator`] — Injected capability producing [`ItemUuid`]s
//! - [`Clock`] / [`MonotonicClock`] — Strictly increasing timestamps

pub mod clock;
pub mod error;
pub mod id;
pub mod uuid;

pub use clock::{Clock, FixedStepClock, MonotonicClock, Timestamp};
pub use error::TypeError;
pub use id::ItemId;
pub use uuid::{ItemUuid, RandomUuidGenerator, SequentialUuidGenerator, UuidGenerator};
