//! Platform API layer: the `PlatformApi` trait and its `reqwest` client.

pub mod api;
pub mod client;
pub mod wire;

pub use api::PlatformApi;
pub use client::PlatformHttp;
pub use wire::*;
