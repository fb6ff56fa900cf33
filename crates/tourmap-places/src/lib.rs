pub mod cache;
pub mod client;
pub mod error;
pub mod listing;
pub mod lookup;
pub mod types;

pub use cache::PlaceDetailCache;
pub use client::PlacesClient;
pub use error::PlacesError;
pub use listing::{Destination, DestinationPage, ListingClient, ListingLocation, PageMeta};
pub use lookup::{PlaceLookupService, DETAIL_FIELDS};
