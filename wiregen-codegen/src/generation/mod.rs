//! Generation-side primitives shared by language backends.

mod imports;
mod unit;

pub use imports::ImportCollector;
pub use unit::GeneratedUnit;
