pub mod body;
pub mod client;
pub mod error;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::GreenwaveClient;
pub use error::ClientError;
pub use transport::{HttpTransport, Transport};
