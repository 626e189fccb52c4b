//! Device-management agent pieces for managed field phones
//!
//! - [`register`]: one-shot registration of the device with the update server
//! - [`radio`]: radio-on and SMS requests to the radio-control component,
//!   and the wait for connectivity
//! - [`platform`]: the telephony, connectivity and broadcast ports both
//!   depend on, with host adapters

pub mod broadcast;
pub mod config;
pub mod platform;
pub mod radio;
pub mod register;
