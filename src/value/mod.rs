//! Value module - In-memory representation of YAML/JSON objects.
//!
//! Values are cheap to clone; containers are shared behind `Arc`.

mod de;
mod value;

pub use value::*;
