pub mod definitions;
pub mod operations;
pub mod properties;
pub mod types;

pub use definitions::*;
pub use operations::*;
pub use properties::*;
pub use types::{ApiKey, ApiKeyLocation, NormalizedName, SecurityScheme, Spec, SpecInfo};
