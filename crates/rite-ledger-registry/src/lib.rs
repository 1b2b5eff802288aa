//! # Rite Ledger Registry
//!
//! The read-mostly directory of realms and capsules, and the authorization
//! gate that validates every dispatch before any write occurs.
//!
//! Registry state is explicit, passed-in state (a [`Registry`] value), not
//! an ambient process global, so tests construct isolated instances. It is
//! loaded at startup and mutated only by the administrative path; the hot
//! dispatch path reads it through [`authorize`].
//!
//! ## Key Types
//!
//! - [`Realm`] - An administrative domain with custodians and governance
//! - [`Capsule`] - A named capability invocable within a realm
//! - [`Registry`] - The directory, with JSON load/save
//! - [`Denial`] - The five-variant authorization failure taxonomy

pub mod capsule;
pub mod error;
pub mod gate;
pub mod realm;
pub mod registry;

pub use capsule::Capsule;
pub use error::{Denial, RegistryError};
pub use gate::authorize;
pub use realm::{Governance, Realm, RealmBuilder, RealmMetadata, RealmStatus};
pub use registry::Registry;
