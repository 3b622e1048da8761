//! Planar simple-features geometries with text and binary codecs.
//!
//! The crate models points, lines, polygons, their multi variants, and
//! geometry collections over 2D f64 coordinates.  Geometries parse from and
//! write to WKT, encode to ISO WKB and to an internal SRID-carrying binary
//! format, answer measurement and accessor queries, and support the named
//! spatial predicates.

pub mod algorithms;
pub mod blob;
mod coordinate;
mod envelope;
pub mod errors;
pub mod fgf;
mod geometry;
pub mod wkb;
pub mod wkt;

pub use crate::algorithms::{contains, crosses, intersects, overlaps, touches, within};
pub use crate::coordinate::Coordinate;
pub use crate::envelope::Envelope;
pub use crate::geometry::{Geometry, Polygon, Shape};
