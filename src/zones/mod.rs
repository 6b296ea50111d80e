pub mod error;
pub mod projection;
pub mod zone_resolver;
