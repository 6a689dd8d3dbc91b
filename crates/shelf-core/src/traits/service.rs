//! Service marker trait.

/// Marker trait for business logic services.
///
/// Implemented by every service in `shelf-service`; services are
/// `Send + Sync` so one instance can back concurrent commands.
pub trait Service: Send + Sync + 'static {}
