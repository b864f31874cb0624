//! Glue between a device transport, the message bus and the data-point
//! translator.

pub mod meta;
pub mod robotvac;
pub mod transport;

pub use meta::DeviceMeta;
pub use robotvac::VacuumComponent;
pub use transport::DpsTransport;
