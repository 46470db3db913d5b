//! Query builder surface used by dialect extensions.

pub mod extension;
pub mod query;

pub use extension::{ExtensionFn, ExtensionRegistry};
pub use query::{
    DEFAULT_GEOMETRY_TYPE, DEFAULT_POINT_CONSTRUCTOR, DataValue, OptionValue, PointValue, Query,
};
