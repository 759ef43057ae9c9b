//! # teambeam
//!
//! Send and receive TeamBeam transfers. Uploads are reserved, sent file by
//! file in adaptive chunks, resumed from what the server already holds after
//! a failure, and confirmed once every file is complete.

pub mod auth;
pub mod cli;
pub mod skalio_id;
pub mod skp;
pub mod upload;
