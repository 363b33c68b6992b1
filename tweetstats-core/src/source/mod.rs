//! Record sources
//!
//! A [`RecordSource`] produces the record set the engine analyses and says
//! where it came from. Two implementations exist:
//!
//! - [`SyntheticSource`]: the seeded fixture generator. Every set it returns
//!   is labelled [`Provenance::Synthetic`], including the per-user selection
//!   that stands in for live collection.
//! - [`ExternalSource`]: a caller-supplied CSV, JSON or JSON Lines file,
//!   labelled [`Provenance::External`].

pub mod external;
pub mod filter;
pub mod synthetic;

pub use external::ExternalSource;
pub use filter::RecordFilter;
pub use synthetic::{Persona, PostingStyle, SyntheticSource, PERSONAS};

use crate::error::Result;
use crate::types::{Provenance, RecordSet};

/// Trait implemented by every record source.
pub trait RecordSource {
    /// Provenance label of the sets this source returns.
    fn provenance(&self) -> Provenance;

    /// Human-readable description for logs and report headers.
    fn describe(&self) -> String;

    /// Produce the record set.
    fn load(&self) -> Result<RecordSet>;
}
