mod measures;
mod point_in_polygon;
mod relate;
mod segment;
mod simplicity;

pub use measures::{line_centroid, line_length, polygon_area, polygon_centroid, ring_signed_area};
pub use point_in_polygon::{locate_in_polygon, locate_in_ring, Location};
pub use relate::{contains, crosses, intersects, overlaps, touches, within};
pub use segment::{intersect_segments, point_on_segment, SegmentIntersection};
pub use simplicity::{is_simple_path, is_simple_polygon, is_valid_polygon};

pub(crate) use measures::shape_centroid;
