pub mod composition;
pub mod name_normalizer;
pub mod prune;
pub mod schema_parser;
pub mod spec_to_ir;
pub mod tag_filter;

pub use composition::resolve_compositions;
pub use prune::prune_unused_definitions;
pub use schema_parser::{CompositionRequest, ParsedDefinitions, SchemaParser};
pub use spec_to_ir::{DEFAULT_SERVICE, TransformOptions, transform, transform_with_options};
pub use tag_filter::filter_by_tags;
