//! Async client for the Cisco APIC native REST API (XML flavor).
//!
//! Three concerns live here: session authentication (`aaaLogin` + cookie
//! jar), DN / class queries, and single-object commits. The managed
//! object itself is modeled generically in [`mo::Mo`] -- there is no
//! per-class type registry, the APIC's information model stays on the
//! controller.

pub mod auth;
pub mod client;
pub mod error;
pub mod mo;
pub mod transport;

pub use auth::Credentials;
pub use client::ApicClient;
pub use error::Error;
pub use mo::Mo;
pub use transport::{TlsMode, TransportConfig};
