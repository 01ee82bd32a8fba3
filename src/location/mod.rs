//! Location resolution tiers
//!
//! Each tier turns free text into a [`ResolvedLocation`] or declines:
//! - Gazetteer: fixed table of Philippine places, no network
//! - Coordinates: literal `lat,lon` pairs
//! - Geocoder: country-restricted external lookup

use async_trait::async_trait;

use crate::Result;
use crate::models::ResolvedLocation;

pub mod coordinates;
pub mod gazetteer;
pub mod geocoder;

pub use coordinates::CoordinateParser;
pub use gazetteer::{Gazetteer, describe_point};
pub use geocoder::{GeocodeHit, Geocoder, GeocoderStrategy, NominatimClient};

/// One step of the resolver's fallback chain.
///
/// `Ok(None)` means "not mine, try the next tier"; an error stops the chain.
#[async_trait]
pub trait LocationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(&self, query: &str) -> Result<Option<ResolvedLocation>>;
}
