//! Retreat domain module.
//!
//! # Module Structure
//!
//! - `model`: Retreat candidate and render-contract types
//! - `extractor`: Pure snippet extraction from typed search items
//! - `repository`: Repository trait for retreat persistence

mod extractor;
mod model;
mod repository;

pub use extractor::{MAX_CANDIDATES, SOURCE_DOMAINS, build_query, extract};
pub use model::{DATE_UNAVAILABLE, FALLBACK_IMAGE_URL, RetreatCandidate, RetreatView};
pub use repository::RetreatRepository;
