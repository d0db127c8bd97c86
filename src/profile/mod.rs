//! Visitor profile collection
//!
//! A profile combines one external geolocation lookup with fields derived
//! purely from caller-supplied client signals. Geolocation failure never
//! blocks local-field collection.

pub mod collector;
pub mod models;
pub mod rules;

pub use collector::{GeoInfo, GeoLookup, IpApiLookup, ProfileCollector};
pub use models::{Browser, ClientSignals, Device, Os, VisitorProfile};
