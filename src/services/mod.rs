pub mod conversion;
pub mod exercises;
pub mod http;

pub use conversion::{convert_handwriting, convert_handwriting_with_deadline, ConversionOutcome};
pub use exercises::ExerciseService;
pub use http::{validated_fetch, ApiClient, ApiRequest, RequestBody};
