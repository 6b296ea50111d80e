pub mod daily;
pub mod error;
pub mod hourly;
pub mod observation;
pub mod weather_code;
