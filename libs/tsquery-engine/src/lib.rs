pub mod decoder;
pub mod error;
pub mod paginator;
pub mod render;

pub use decoder::{decode_page, decode_row, decode_value};
pub use error::QueryError;
pub use paginator::{DecodedPage, Paginator};
pub use render::{render_datum, render_record};
