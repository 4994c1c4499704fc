//! Shipping Backend API
//!
//! Thin wrappers over the backend services the front-end calls:
//! pricing, user profile, ratings, guide creation and public tracking.
//! Protected calls carry `Authorization: Bearer <idToken>` taken from an
//! [`IdTokenSource`]; a missing token fails locally with `NO_SESSION`.

pub mod client;
pub mod guides;
pub mod pricing;
pub mod profile;
pub mod ratings;
pub mod tracking;

pub use client::{ApiClient, ApiConfig};
pub use guides::{CreatedGuide, NewGuide, Party, create_guide};
pub use platform::http::IdTokenSource;
pub use pricing::{PriceBreakdown, PriceQuote, calculate_price};
pub use profile::{UserProfile, get_profile};
pub use ratings::{Rating, submit_rating};
pub use tracking::{Tracking, TrackingEvent, track_shipment};
