pub mod lat_lon;
pub mod weekday;
