pub mod airport;
pub mod cleaner;
pub mod error;
pub mod record;
pub mod trip_source;
