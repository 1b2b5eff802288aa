//! # Rite Ledger Testkit
//!
//! Testing utilities for the Rite Ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: pre-populated registries and request builders for the
//!   standard ceremonial scenarios
//! - **Generators**: proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust
//! use rite_ledger_testkit::fixtures::CeremonyFixture;
//!
//! # async fn example() {
//! let fixture = CeremonyFixture::sovereign();
//! let ledger = fixture.ledger();
//! let record = ledger.append(fixture.crown_request()).await.unwrap();
//! # }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use rite_ledger_testkit::generators::{record_from_params, DispatchParams};
//!
//! proptest! {
//!     #[test]
//!     fn hash_is_deterministic(params: DispatchParams) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::CeremonyFixture;
