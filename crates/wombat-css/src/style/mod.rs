//! Value types, property metadata, and computed styles.

pub mod color;
pub mod computed;
pub mod properties;
pub mod value;
