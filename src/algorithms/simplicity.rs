use super::point_in_polygon::{locate_in_ring, Location};
use super::segment::{intersect_segments, SegmentIntersection};
use crate::{Coordinate, Envelope, Polygon};

/// A simple path has no degenerate segments and no self-intersections among
/// non-adjacent segments.  Adjacent segments may meet only at their shared
/// vertex; a closed path may additionally meet itself at its closing point.
pub fn is_simple_path(coords: &[Coordinate]) -> bool {
    if coords.len() < 2 {
        return true;
    }
    for w in coords.windows(2) {
        if w[0] == w[1] {
            return false;
        }
    }
    let closed = coords.first() == coords.last();
    let segments = coords.len() - 1;
    for i in 0..segments {
        for j in (i + 1)..segments {
            match intersect_segments(coords[i], coords[i + 1], coords[j], coords[j + 1]) {
                SegmentIntersection::None => {}
                SegmentIntersection::Overlap(_, _) => return false,
                SegmentIntersection::Point(p) => {
                    if j == i + 1 {
                        if p != coords[j] {
                            return false;
                        }
                    } else if closed && i == 0 && j == segments - 1 {
                        if p != coords[0] {
                            return false;
                        }
                    } else {
                        return false;
                    }
                }
            }
        }
    }
    true
}

/// How two rings meet: not at all, at a single point, or more than that.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum RingContact {
    Disjoint,
    Touch(Coordinate),
    Crossing,
}

pub(crate) fn ring_contact(ring_a: &[Coordinate], ring_b: &[Coordinate]) -> RingContact {
    let mut touch: Option<Coordinate> = None;
    for wa in ring_a.windows(2) {
        for wb in ring_b.windows(2) {
            match intersect_segments(wa[0], wa[1], wb[0], wb[1]) {
                SegmentIntersection::None => {}
                SegmentIntersection::Overlap(_, _) => return RingContact::Crossing,
                SegmentIntersection::Point(p) => match touch {
                    None => touch = Some(p),
                    Some(existing) if existing == p => {}
                    Some(_) => return RingContact::Crossing,
                },
            }
        }
    }
    match touch {
        None => RingContact::Disjoint,
        Some(p) => RingContact::Touch(p),
    }
}

/// The exterior ring is simple and no hole crosses it.
pub fn is_simple_polygon(polygon: &Polygon) -> bool {
    if !polygon.rings().all(is_simple_path) {
        return false;
    }
    polygon
        .holes
        .iter()
        .all(|hole| ring_contact(hole, &polygon.shell) != RingContact::Crossing)
}

/// OGC polygon validity: every ring closed and simple, holes inside the
/// exterior touching it at no more than one point, holes pairwise disjoint
/// (again up to a single touch point) and not nested.
pub fn is_valid_polygon(polygon: &Polygon) -> bool {
    if polygon.shell.is_empty() {
        return polygon.holes.is_empty();
    }
    for ring in polygon.rings() {
        if ring.len() < 4 || ring.first() != ring.last() || !is_simple_path(ring) {
            return false;
        }
    }
    let shell_env = Envelope::of_coords(&polygon.shell);
    for (i, hole) in polygon.holes.iter().enumerate() {
        let hole_env = Envelope::of_coords(hole);
        if !shell_env.contains_envelope(hole_env) {
            return false;
        }
        let touch = match ring_contact(hole, &polygon.shell) {
            RingContact::Crossing => return false,
            RingContact::Touch(p) => Some(p),
            RingContact::Disjoint => None,
        };
        if locate_in_ring(probe_point(hole, touch), &polygon.shell) != Location::Inside {
            return false;
        }
        for other in &polygon.holes[..i] {
            if !hole_env.intersects(Envelope::of_coords(other)) {
                continue;
            }
            let touch = match ring_contact(hole, other) {
                RingContact::Crossing => return false,
                RingContact::Touch(p) => Some(p),
                RingContact::Disjoint => None,
            };
            if locate_in_ring(probe_point(hole, touch), other) == Location::Inside {
                return false;
            }
            if locate_in_ring(probe_point(other, touch), hole) == Location::Inside {
                return false;
            }
        }
    }
    true
}

/// Find a ring vertex that is not the touch point.  Rings have at least 3
/// distinct vertices, so this always finds one.
fn probe_point(ring: &[Coordinate], touch: Option<Coordinate>) -> Coordinate {
    for &coord in ring {
        if touch != Some(coord) {
            return coord;
        }
    }
    ring[0]
}
