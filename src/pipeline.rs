//! Entry point wiring discovery, trip cleaning, weather cleaning and
//! aggregation into one batch run.

use crate::aggregate::concat_frames;
use crate::config::PipelineConfig;
use crate::data_loader::DataLoader;
use crate::discovery::link_lister::list_links;
use crate::discovery::month_filter::MonthFilter;
use crate::error::PipelineError;
use crate::trips::cleaner::load_and_clean;
use crate::trips::error::TripDataError;
use crate::trips::trip_source::TripSource;
use crate::weather::daily::load_daily;
use crate::weather::error::WeatherError;
use crate::weather::hourly::load_hourly;
use crate::zones::zone_resolver::ZoneResolver;
use bon::bon;
use log::error;
use polars::prelude::DataFrame;
use std::future::Future;

/// Month file URLs found on the listing page, per source, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredMonths {
    pub taxi: Vec<String>,
    pub ride_hail: Vec<String>,
}

impl DiscoveredMonths {
    pub fn for_source(&self, source: TripSource) -> &[String] {
        match source {
            TripSource::Taxi => &self.taxi,
            TripSource::RideHail => &self.ride_hail,
        }
    }
}

/// The four combined tables handed to downstream consumers.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub taxi: DataFrame,
    pub ride_hail: DataFrame,
    pub hourly_weather: DataFrame,
    pub daily_weather: DataFrame,
}

/// Batch pipeline over the NYC trip and weather datasets.
///
/// Construct with [`TripWeatherPipeline::new`] for the default configuration
/// or [`TripWeatherPipeline::with_config`]. The zone layer is loaded once at
/// construction.
///
/// ```no_run
/// # use nyc_trip_weather::{PipelineError, TripSource, TripWeatherPipeline};
/// # async fn run() -> Result<(), PipelineError> {
/// let pipeline = TripWeatherPipeline::new().await?;
/// let taxi = pipeline.trips().source(TripSource::Taxi).call().await?;
/// println!("{} taxi trips", taxi.height());
/// # Ok(())
/// # }
/// ```
pub struct TripWeatherPipeline {
    config: PipelineConfig,
    loader: DataLoader,
    zones: ZoneResolver,
}

#[bon]
impl TripWeatherPipeline {
    pub async fn with_config(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        config.sampling.sample_size(1)?;
        tokio::fs::create_dir_all(&config.cache_dir)
            .await
            .map_err(|e| PipelineError::CacheDirCreation(config.cache_dir.clone(), e))?;

        let zones = ZoneResolver::from_file(&config.zone_file, &config.crs)?;

        let loader = DataLoader::new(&config.cache_dir, config.http)?;
        Ok(Self {
            config,
            loader,
            zones,
        })
    }

    pub async fn new() -> Result<Self, PipelineError> {
        Self::with_config(PipelineConfig::default()).await
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn zones(&self) -> &ZoneResolver {
        &self.zones
    }

    /// Lists the configured page once and splits its links into taxi and
    /// ride-hail month files.
    pub async fn discover_months(&self) -> Result<DiscoveredMonths, PipelineError> {
        let links = list_links(
            self.loader.client(),
            &self.config.listing_url,
            self.loader.http(),
        )
        .await?;
        Ok(DiscoveredMonths {
            taxi: self
                .month_filter(TripSource::Taxi)?
                .filter_expecting(&links, self.config.expected_months),
            ride_hail: self
                .month_filter(TripSource::RideHail)?
                .filter_expecting(&links, self.config.expected_months),
        })
    }

    fn month_filter(&self, source: TripSource) -> Result<MonthFilter, PipelineError> {
        Ok(MonthFilter::new(
            source,
            self.config.first_year,
            self.config.last_year,
        )?)
    }

    /// Cleans every month of `source` and combines them in month order.
    ///
    /// Without `urls` the month files are discovered from the listing page.
    /// A month that fails to download or clean is logged and skipped; an
    /// unsupported sampling configuration aborts the run.
    #[builder]
    pub async fn trips(
        &self,
        source: TripSource,
        urls: Option<Vec<String>>,
    ) -> Result<DataFrame, PipelineError> {
        let urls = match urls {
            Some(urls) => urls,
            None => self.discover_months().await?.for_source(source).to_vec(),
        };

        let mut frames = Vec::with_capacity(urls.len());
        for url in &urls {
            let sampling = &self.config.sampling;
            match load_and_clean(&self.loader, source, url, &self.zones, sampling).await {
                Ok(trips) => match trips.to_frame() {
                    Ok(df) => frames.push(df),
                    Err(e) => error!("Skipping {} month {}: {}", source, url, e),
                },
                Err(TripDataError::Sampling(e)) => return Err(e.into()),
                Err(e) => error!("Skipping {} month {}: {}", source, url, e),
            }
        }
        Ok(concat_frames(&source.to_string(), frames)?)
    }

    /// Hourly weather for every configured CSV, combined in list order.
    pub async fn hourly_weather(&self) -> Result<DataFrame, PipelineError> {
        self.weather_frames("weather-hourly", |url| load_hourly(&self.loader, url))
            .await
    }

    /// Daily weather for every configured CSV, combined in list order.
    pub async fn daily_weather(&self) -> Result<DataFrame, PipelineError> {
        self.weather_frames("weather-daily", |url| load_daily(&self.loader, url))
            .await
    }

    async fn weather_frames<'a, F, Fut>(
        &'a self,
        dataset: &str,
        load: F,
    ) -> Result<DataFrame, PipelineError>
    where
        F: Fn(&'a str) -> Fut,
        Fut: Future<Output = Result<DataFrame, WeatherError>>,
    {
        let mut frames = Vec::with_capacity(self.config.weather_urls.len());
        for url in &self.config.weather_urls {
            match load(url.as_str()).await {
                Ok(df) => frames.push(df),
                Err(e) => error!("Skipping {} file {}: {}", dataset, url, e),
            }
        }
        Ok(concat_frames(dataset, frames)?)
    }

    /// Runs discovery once, then produces all four combined tables.
    pub async fn run(&self) -> Result<PipelineOutput, PipelineError> {
        let months = self.discover_months().await?;
        let taxi = self
            .trips()
            .source(TripSource::Taxi)
            .urls(months.taxi.clone())
            .call()
            .await?;
        let ride_hail = self
            .trips()
            .source(TripSource::RideHail)
            .urls(months.ride_hail.clone())
            .call()
            .await?;
        let hourly_weather = self.hourly_weather().await?;
        let daily_weather = self.daily_weather().await?;
        Ok(PipelineOutput {
            taxi,
            ride_hail,
            hourly_weather,
            daily_weather,
        })
    }
}
