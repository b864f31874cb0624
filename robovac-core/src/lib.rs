//! Capability model and data-point translation for robotic vacuums that speak
//! the local key/value data-point protocol.
//!
//! Every supported hardware model is a [`model::ModelDescriptor`] value held by
//! a [`registry::Registry`]. Resolving a model yields the effective
//! logical-to-DPS mapping ([`resolve::ResolvedMapping`]) that the
//! [`translate::Translator`] uses to decode device snapshots and to encode
//! commands, after the feature gate in [`gate`] has approved them.

pub mod activity;
pub mod bus;
pub mod bus_contract;
pub mod codec;
pub mod consumables;
pub mod defaults;
pub mod dps;
pub mod error;
pub mod faults;
pub mod gate;
pub mod model;
pub mod models;
pub mod registry;
pub mod resolve;
pub mod translate;
pub mod value;
pub mod vocab;

pub use error::{DecodeError, EncodeError, Error};
pub use model::{HostFeatures, ModelDescriptor};
pub use registry::Registry;
pub use translate::{DecodeIssue, Translator};
