use crate::Coordinate;

/// How two closed segments intersect, if at all.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SegmentIntersection {
    None,
    Point(Coordinate),
    Overlap(Coordinate, Coordinate),
}

/// Check the intersection of two segments A and B.
///
/// NB: This does not do an initial check with Envelopes; the caller should do that.
pub fn intersect_segments(
    start_a: Coordinate,
    end_a: Coordinate,
    start_b: Coordinate,
    end_b: Coordinate,
) -> SegmentIntersection {
    if (start_a == start_b && end_a == end_b) || (start_a == end_b && end_a == start_b) {
        if start_a == end_a {
            return SegmentIntersection::Point(start_a);
        }
        return SegmentIntersection::Overlap(start_a, end_a);
    }

    let da = end_a - start_a; // The vector for segment A
    let db = end_b - start_b; // The vector for segment B
    let offset = start_b - start_a; // The offset between segments (starts)

    let da_x_db = da.cross(db);
    let offset_x_da = offset.cross(da);

    if da_x_db == 0. {
        // The segments are parallel.  A degenerate segment is a point, which
        // reduces to a point-on-segment check.
        if da.dot(da) == 0. {
            if point_on_segment(start_a, start_b, end_b) {
                return SegmentIntersection::Point(start_a);
            }
            return SegmentIntersection::None;
        }
        if db.dot(db) == 0. {
            if point_on_segment(start_b, start_a, end_a) {
                return SegmentIntersection::Point(start_b);
            }
            return SegmentIntersection::None;
        }
        // If the offset is not also parallel, they must be disjoint.
        if offset_x_da != 0. {
            return SegmentIntersection::None;
        }
        // If the offset is also parallel, check for overlap.
        let da_2 = da.dot(da);
        // Offset, in units of da.
        let t0 = offset.dot(da) / da_2;
        // start_a to end_b, in units of da.
        let t1 = t0 + da.dot(db) / da_2;
        let t_min = t0.min(t1);
        let t_max = t0.max(t1);
        if t_min > 1. || t_max < 0. {
            return SegmentIntersection::None;
        }
        let start = start_a + da * t_min.max(0.);
        let end = start_a + da * t_max.min(1.);
        if start == end {
            SegmentIntersection::Point(start)
        } else {
            SegmentIntersection::Overlap(start, end)
        }
    } else {
        // The segments are not parallel, so they are disjoint or intersect at
        // a point.  Calculate where the infinite lines would intersect; if
        // that is on both segments, the segments intersect.
        let ta = offset.cross(db) / da_x_db;
        let tb = offset_x_da / da_x_db;
        if 0. <= ta && ta <= 1. && 0. <= tb && tb <= 1. {
            return SegmentIntersection::Point(start_a + da * ta);
        }
        SegmentIntersection::None
    }
}

/// Is point on the closed segment from start to end?
pub fn point_on_segment(point: Coordinate, start: Coordinate, end: Coordinate) -> bool {
    let delta = end - start;
    let offset = point - start;
    if delta.cross(offset) != 0. {
        return false;
    }
    let delta_2 = delta.dot(delta);
    if delta_2 == 0. {
        return point == start;
    }
    let t = offset.dot(delta) / delta_2;
    0. <= t && t <= 1.
}

/// Parameter of point along the segment from start to end, assuming it is
/// collinear with the segment.
pub(crate) fn segment_param(start: Coordinate, end: Coordinate, point: Coordinate) -> f64 {
    let delta = end - start;
    let offset = point - start;
    if delta.x.abs() >= delta.y.abs() {
        if delta.x == 0. {
            0.
        } else {
            offset.x / delta.x
        }
    } else {
        offset.y / delta.y
    }
}
