//! 上游机构后端访问

pub mod client;
pub mod requests;
#[cfg(test)]
pub mod testing;
pub mod transport;

pub use client::{BackendClient, Ensured};
pub use requests::BackendRequest;
pub use transport::{HttpTransport, Transport};
