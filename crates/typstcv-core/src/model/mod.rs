//! Document model: validation of the `cv:` block into typed entries
//!
//! Raw YAML is read field by field so that one pass reports every problem
//! with its path. Entry variants are matched structurally (see [`entry`]).

pub mod dates;
pub mod document;
pub mod entry;
pub mod error;
pub(crate) mod fields;
pub mod input;
pub mod section;
pub mod settings;
pub mod social;

pub use dates::{DateString, EntryDates, ValidationContext};
pub use document::{Connection, ConnectionKind, Cv};
pub use entry::{
    match_entry, EducationEntry, Entry, EntryKind, ExperienceEntry, NormalEntry, OneLineEntry,
    PublicationEntry,
};
pub use error::{FieldPath, ValidationError, ValidationIssue};
pub use input::{parse_input, validate_input, InputDocument, InputError};
pub use section::{section_title, Section};
pub use settings::{RenderSettings, Settings, DEFAULT_OUTPUT_FOLDER};
pub use social::{Network, SocialNetwork};
