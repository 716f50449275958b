//! Shared core of the charts clients: fetching and caching the JSON
//! datasets, joining them into display records, and the small state
//! machines (rotation, selection) both front ends drive.

pub mod error;
pub mod fetch;
pub mod highlights;
pub mod index;
pub mod key;
pub mod merge;
pub mod model;
pub mod pipeline;
pub mod platform;
pub mod query;
pub mod rotation;
pub mod selection;

pub use error::{FetchError, LoadError};
pub use fetch::{Dataset, FetchCache, JsonSource, MemorySource};
pub use highlights::{Badge, HighlightCard, HighlightGroup};
pub use index::ReferenceIndex;
pub use key::Key;
pub use merge::{ChartKind, DEFAULT_COVER, UNKNOWN_ARTIST, UNKNOWN_TITLE};
pub use model::{ArtistCredit, ChartEntry, MergedRecord};
pub use pipeline::{ChartSession, Generation, LoadPlan, LoadTicket, LoadedChart};
pub use platform::{Header, Platform};
pub use rotation::{Category, Rotation, Transition, Trigger, Widget};
pub use selection::{CoverClick, Selection};
