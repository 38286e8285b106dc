// Library for the binaries and tests

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod poller;
pub mod render;
pub mod routes;
pub mod sampler;
pub mod version;
