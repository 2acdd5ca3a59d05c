//! Identity provider implementations

pub mod in_memory;
#[cfg(feature = "remote-auth")]
pub mod remote;

pub use in_memory::InMemoryIdentityProvider;
#[cfg(feature = "remote-auth")]
pub use remote::RemoteIdentityProvider;
