//! core data model and pure helpers for the codefresh provider.

pub mod encoding;
pub mod features;
pub mod manifest;
pub mod model;
pub mod reconcile;
pub mod validation;
pub mod yaml;

pub use encoding::{double_encode, encode_component};
pub use features::decode_feature_flags;
pub use manifest::{Address, Block, JsonMap, Manifest};
pub use reconcile::{diff, Diff};
pub use validation::{validate_manifest, ValidationError, ValidationReport};
pub use yaml::{normalize_yaml, yaml_equivalent};
