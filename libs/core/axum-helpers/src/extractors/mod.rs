//! Request extractors with the shared error body on rejection.

pub mod validated_json;

pub use validated_json::ValidatedJson;
