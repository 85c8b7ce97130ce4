//! camdir library crate.
//!
//! Enumerates camera devices, opens a chosen one and releases it again,
//! over any platform implementing [`media::MediaDevices`].

pub mod camera;
pub mod cli;
pub mod config;
pub mod devices;
pub mod media;
