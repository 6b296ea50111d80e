use nyc_trip_weather::{PipelineConfig, PipelineError, TripWeatherPipeline};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), PipelineError> {
    env_logger::init();

    // Optional JSON config path as the first argument.
    let config = match std::env::args().nth(1) {
        Some(path) => PipelineConfig::from_json_file(Path::new(&path))?,
        None => PipelineConfig::default(),
    };

    let pipeline = TripWeatherPipeline::with_config(config).await?;
    let output = pipeline.run().await?;

    println!("taxi trips:      {:?}", output.taxi.shape());
    println!("ride-hail trips: {:?}", output.ride_hail.shape());
    println!("hourly weather:  {:?}", output.hourly_weather.shape());
    println!("daily weather:   {:?}", output.daily_weather.shape());
    println!("{}", output.daily_weather.head(Some(5)));
    Ok(())
}
