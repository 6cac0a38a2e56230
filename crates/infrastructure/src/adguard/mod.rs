pub mod client;
mod dto;

pub use client::AdGuardHttpClient;
