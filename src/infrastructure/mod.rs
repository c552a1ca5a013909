// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod csv_dataset;
pub mod openweather_client;
pub mod system_clock;
