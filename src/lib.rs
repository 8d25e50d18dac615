//! Client for the Jolpica-F1 (Ergast-compatible) Formula 1 API
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use jolpica_client::{ClientConfig, JolpicaClient, ResourceQuery};
//!
//! let client = JolpicaClient::new(ClientConfig::default())?;
//! let query = ResourceQuery::new("results")
//!     .filter("season", "2021")
//!     .filter("drivers", "max_verstappen");
//! let races = client.get_all(&query, true).await?;
//! if let Some(warning) = races.warning() {
//!     eprintln!("{}", warning);
//! }
//! println!("{} races", races.records().len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod resource;

pub use api::{format_error, JolpicaClient};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use resource::{Collection, Completeness, Endpoint, Envelope, PathSpec, ResourceQuery};
