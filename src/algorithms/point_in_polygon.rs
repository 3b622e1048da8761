use super::segment::point_on_segment;
use crate::{Coordinate, Polygon};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Location {
    Inside,
    Boundary,
    Outside,
}

/// Locate a point relative to a closed ring, by winding number.
/// The ring must be closed (first == last coordinate).
pub fn locate_in_ring(point: Coordinate, ring: &[Coordinate]) -> Location {
    for segment in ring.windows(2) {
        if point_on_segment(point, segment[0], segment[1]) {
            return Location::Boundary;
        }
    }
    let mut wn: i32 = 0;
    for segment in ring.windows(2) {
        wn += winding_number(point, segment[0], segment[1]);
    }
    if wn != 0 {
        Location::Inside
    } else {
        Location::Outside
    }
}

/// Locate a point relative to a polygon; a point within a hole is Outside.
pub fn locate_in_polygon(point: Coordinate, polygon: &Polygon) -> Location {
    match locate_in_ring(point, &polygon.shell) {
        Location::Outside => Location::Outside,
        Location::Boundary => Location::Boundary,
        Location::Inside => {
            for hole in &polygon.holes {
                match locate_in_ring(point, hole) {
                    Location::Inside => return Location::Outside,
                    Location::Boundary => return Location::Boundary,
                    Location::Outside => {}
                }
            }
            Location::Inside
        }
    }
}

fn winding_number(point: Coordinate, start: Coordinate, end: Coordinate) -> i32 {
    // Calculate the two halves of the cross-product (= lx - rx)
    let lx = (end.x - start.x) * (point.y - start.y);
    let rx = (end.y - start.y) * (point.x - start.x);

    if start.y <= point.y {
        // Upward crossing
        if end.y > point.y && lx > rx {
            return 1;
        }
    } else {
        // Downward crossing
        if end.y <= point.y && lx < rx {
            return -1;
        }
    }
    0
}
