//! Domain models
//!
//! Request bodies are decoded into these types at the HTTP edge.
//! Invalid input returns ValidationError, not panic.

pub mod envelope;
pub mod farm;
pub mod lake;
pub mod validation;

pub use envelope::ResponseEnvelope;
pub use farm::{sample_farms, FarmRecord, FARMER_FIELD, SAMPLE_FARMER};
pub use lake::{IngestRequest, LakeDocument, Provenance, SourceSystem, SOURCE_FIELD};
pub use validation::ValidationError;
