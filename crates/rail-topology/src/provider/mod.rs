//! Rail network providers.

pub mod static_network;

pub use static_network::StaticRailNetwork;
