//! Primitive value types with their own parsing rules
//!
//! Every type here is produced by the data model, never by free user text,
//! so the renderer inserts their `Display` output without escaping.

pub mod color;
pub mod date;
pub mod length;
pub mod link;

pub use color::{Color, ColorError};
pub use date::{time_span, Date, DateError};
pub use length::{Length, LengthError, LengthUnit};
pub use link::{clean_url, Link, LinkError};
