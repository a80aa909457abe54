//! Shared types for querying a time-series service: column descriptors,
//! raw wire values, decoded datums and the page-fetch seam.

pub mod column;
pub mod datum;
pub mod error;
pub mod fetch;
pub mod page;

pub use column::{ColumnDescriptor, ColumnKind, ScalarType};
pub use datum::{Datum, Record};
pub use error::{DecodeError, FetchError};
pub use fetch::{FetchFuture, PageFetcher};
pub use page::{Page, RawRow, RawTimePoint, RawValue};
