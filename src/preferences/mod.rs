//! User preferences: a reactive key/value store plus typed groups.

pub mod library;
pub mod source;
pub mod store;

pub use library::LibraryPreferences;
pub use source::{SourcePreferences, DEFAULT_LANGUAGES};
pub use store::{Preference, PreferenceChange, PreferenceStore, PreferenceStream};
