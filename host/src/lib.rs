//! Demo service host
//!
//! A minimal process with a handful of IPC services. `build.rs` generates
//! `UserInterface::get_service_instance` from the services declared under
//! `hos::services`.

pub mod hos;
