pub mod client;

pub use client::SocrataClient;
