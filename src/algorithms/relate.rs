use super::point_in_polygon::{locate_in_polygon, Location};
use super::segment::{intersect_segments, point_on_segment, segment_param, SegmentIntersection};
use crate::{Coordinate, Geometry, Polygon, Shape};

/// Do the geometries share any point?
pub fn intersects(a: &Geometry, b: &Geometry) -> bool {
    if !a.envelope().intersects(b.envelope()) {
        return false;
    }
    let a = Parts::of(a.shape());
    let b = Parts::of(b.shape());

    for &p in &a.points {
        if b.covers_point(p) {
            return true;
        }
    }
    for &p in &b.points {
        if a.covers_point(p) {
            return true;
        }
    }
    if lines_touch_lines(&a.lines, &b.lines) {
        return true;
    }
    if !a.lines.is_empty() && !b.polygons.is_empty() {
        let class = classify_lines(&a.lines, &b.polygons);
        if class.inside || class.boundary {
            return true;
        }
    }
    if !b.lines.is_empty() && !a.polygons.is_empty() {
        let class = classify_lines(&b.lines, &a.polygons);
        if class.inside || class.boundary {
            return true;
        }
    }
    if !a.polygons.is_empty() && !b.polygons.is_empty() {
        let ab = classify_lines(&a.ring_lines(), &b.polygons);
        let ba = classify_lines(&b.ring_lines(), &a.polygons);
        if ab.inside || ab.boundary || ba.inside || ba.boundary {
            return true;
        }
    }
    false
}

/// DE-9IM crosses, specialized to line/line and line/area.
///
/// Two line sets cross when their segments intersect at one or more points
/// that are not shared endpoints of both, with no collinear overlap.  A line
/// crosses an area when part of it lies in the area's interior and part in
/// the exterior.  All other type pairings are false.
pub fn crosses(a: &Geometry, b: &Geometry) -> bool {
    if !a.envelope().intersects(b.envelope()) {
        return false;
    }
    let a = Parts::of(a.shape());
    let b = Parts::of(b.shape());

    if !a.lines.is_empty() && !b.lines.is_empty() && lines_cross_lines(&a.lines, &b.lines) {
        return true;
    }
    if !a.lines.is_empty() && !b.polygons.is_empty() {
        let class = classify_lines(&a.lines, &b.polygons);
        if class.inside && class.outside {
            return true;
        }
    }
    if !b.lines.is_empty() && !a.polygons.is_empty() {
        let class = classify_lines(&b.lines, &a.polygons);
        if class.inside && class.outside {
            return true;
        }
    }
    false
}

/// Every point of b lies in a, and b reaches a's interior.
pub fn contains(a: &Geometry, b: &Geometry) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if !a.envelope().contains_envelope(b.envelope()) {
        return false;
    }
    let a = Parts::of(a.shape());
    let b = Parts::of(b.shape());

    // Areas cannot live inside lower-dimensional geometry.
    if !b.polygons.is_empty() && a.polygons.is_empty() {
        return false;
    }
    if !b.lines.is_empty() && a.polygons.is_empty() && a.lines.is_empty() {
        return false;
    }

    let mut interior_met = false;
    for &p in &b.points {
        match a.locate_point(p) {
            PointClass::Interior => interior_met = true,
            PointClass::Boundary => {}
            PointClass::Exterior => return false,
        }
    }
    if !b.lines.is_empty() {
        if !a.polygons.is_empty() {
            let class = classify_lines(&b.lines, &a.polygons);
            if class.outside {
                return false;
            }
            interior_met |= class.inside;
        } else if lines_contain_lines(&a.lines, &b.lines) {
            interior_met = true;
        } else {
            return false;
        }
    }
    if !b.polygons.is_empty() {
        let class = classify_lines(&b.ring_lines(), &a.polygons);
        if class.outside {
            return false;
        }
        // A hole of a poking into b's interior breaks containment.
        let holes = a.hole_lines();
        if !holes.is_empty() && classify_lines(&holes, &b.polygons).inside {
            return false;
        }
        interior_met |= class.inside || class.boundary;
    }
    interior_met
}

/// Inverse of contains.
pub fn within(a: &Geometry, b: &Geometry) -> bool {
    contains(b, a)
}

/// The geometries meet, but only along boundaries: their interiors share
/// no point.
pub fn touches(a: &Geometry, b: &Geometry) -> bool {
    if !a.envelope().intersects(b.envelope()) {
        return false;
    }
    if !intersects(a, b) {
        return false;
    }
    let a = Parts::of(a.shape());
    let b = Parts::of(b.shape());
    !interiors_meet(&a, &b)
}

/// Equal-dimension partial overlap: the interiors meet, but each geometry
/// also keeps interior of its own outside the other.
pub fn overlaps(a: &Geometry, b: &Geometry) -> bool {
    if a.dimension() != b.dimension() {
        return false;
    }
    if !a.envelope().intersects(b.envelope()) {
        return false;
    }
    let pa = Parts::of(a.shape());
    let pb = Parts::of(b.shape());
    match a.dimension() {
        0 => {
            let shared = pa.points.iter().any(|&p| pb.points.contains(&p));
            let a_extra = pa.points.iter().any(|&p| !pb.points.contains(&p));
            let b_extra = pb.points.iter().any(|&p| !pa.points.contains(&p));
            shared && a_extra && b_extra
        }
        1 => {
            let mut overlap = false;
            for la in &pa.lines {
                for wa in la.windows(2) {
                    for lb in &pb.lines {
                        for wb in lb.windows(2) {
                            if let SegmentIntersection::Overlap(_, _) =
                                intersect_segments(wa[0], wa[1], wb[0], wb[1])
                            {
                                overlap = true;
                            }
                        }
                    }
                }
            }
            overlap
                && !lines_contain_lines(&pa.lines, &pb.lines)
                && !lines_contain_lines(&pb.lines, &pa.lines)
        }
        _ => {
            let ab = classify_lines(&pa.ring_lines(), &pb.polygons);
            let ba = classify_lines(&pb.ring_lines(), &pa.polygons);
            ab.inside && ab.outside && ba.inside && ba.outside
        }
    }
}

/// A geometry decomposed into its point, line, and polygon components.
struct Parts<'a> {
    points: Vec<Coordinate>,
    lines: Vec<&'a [Coordinate]>,
    polygons: Vec<&'a Polygon>,
}

enum PointClass {
    Interior,
    Boundary,
    Exterior,
}

impl<'a> Parts<'a> {
    fn of(shape: &'a Shape) -> Self {
        let mut parts = Parts {
            points: Vec::new(),
            lines: Vec::new(),
            polygons: Vec::new(),
        };
        parts.collect(shape);
        parts
    }

    fn collect(&mut self, shape: &'a Shape) {
        match shape {
            Shape::Point(Some(c)) => self.points.push(*c),
            Shape::Point(None) => {}
            Shape::MultiPoint(coords) => self.points.extend(coords.iter().copied()),
            Shape::LineString(coords) => {
                if !coords.is_empty() {
                    self.lines.push(coords);
                }
            }
            Shape::MultiLineString(lines) => self
                .lines
                .extend(lines.iter().map(|l| l.as_slice()).filter(|l| !l.is_empty())),
            Shape::Polygon(polygon) => {
                if !polygon.shell.is_empty() {
                    self.polygons.push(polygon);
                }
            }
            Shape::MultiPolygon(polygons) => self
                .polygons
                .extend(polygons.iter().filter(|p| !p.shell.is_empty())),
            Shape::GeometryCollection(members) => {
                for member in members {
                    self.collect(member.shape());
                }
            }
        }
    }

    fn ring_lines(&self) -> Vec<&'a [Coordinate]> {
        self.polygons
            .iter()
            .flat_map(|polygon| polygon.rings())
            .collect()
    }

    fn hole_lines(&self) -> Vec<&'a [Coordinate]> {
        self.polygons
            .iter()
            .flat_map(|polygon| polygon.holes.iter().map(|h| h.as_slice()))
            .collect()
    }

    fn covers_point(&self, p: Coordinate) -> bool {
        !matches!(self.locate_point(p), PointClass::Exterior)
    }

    fn locate_point(&self, p: Coordinate) -> PointClass {
        for polygon in &self.polygons {
            match locate_in_polygon(p, polygon) {
                Location::Inside => return PointClass::Interior,
                Location::Boundary => return PointClass::Boundary,
                Location::Outside => {}
            }
        }
        for line in &self.lines {
            if line.windows(2).any(|w| point_on_segment(p, w[0], w[1])) {
                if is_boundary_endpoint(p, &self.lines) {
                    return PointClass::Boundary;
                }
                return PointClass::Interior;
            }
        }
        if self.points.contains(&p) {
            return PointClass::Interior;
        }
        PointClass::Exterior
    }
}

/// An open line's boundary is its two endpoints; a closed part has none.
fn is_boundary_endpoint(p: Coordinate, lines: &[&[Coordinate]]) -> bool {
    lines.iter().any(|line| {
        line.first() != line.last() && (line.first() == Some(&p) || line.last() == Some(&p))
    })
}

fn lines_touch_lines(lines_a: &[&[Coordinate]], lines_b: &[&[Coordinate]]) -> bool {
    for la in lines_a {
        for wa in la.windows(2) {
            for lb in lines_b {
                for wb in lb.windows(2) {
                    if intersect_segments(wa[0], wa[1], wb[0], wb[1])
                        != SegmentIntersection::None
                    {
                        return true;
                    }
                }
            }
        }
    }
    false
}

fn lines_cross_lines(lines_a: &[&[Coordinate]], lines_b: &[&[Coordinate]]) -> bool {
    let mut proper = false;
    for la in lines_a {
        for wa in la.windows(2) {
            for lb in lines_b {
                for wb in lb.windows(2) {
                    match intersect_segments(wa[0], wa[1], wb[0], wb[1]) {
                        SegmentIntersection::None => {}
                        // A shared 1-dimensional stretch is never a crossing.
                        SegmentIntersection::Overlap(_, _) => return false,
                        SegmentIntersection::Point(p) => {
                            if !(is_boundary_endpoint(p, lines_a)
                                && is_boundary_endpoint(p, lines_b))
                            {
                                proper = true;
                            }
                        }
                    }
                }
            }
        }
    }
    proper
}

/// Every point of the b lines lies on some a segment.
fn lines_contain_lines(lines_a: &[&[Coordinate]], lines_b: &[&[Coordinate]]) -> bool {
    for lb in lines_b {
        for wb in lb.windows(2) {
            let (start, end) = (wb[0], wb[1]);
            if start == end {
                continue;
            }
            let mut params = vec![0., 1.];
            for la in lines_a {
                for wa in la.windows(2) {
                    match intersect_segments(start, end, wa[0], wa[1]) {
                        SegmentIntersection::None => {}
                        SegmentIntersection::Point(p) => {
                            params.push(segment_param(start, end, p))
                        }
                        SegmentIntersection::Overlap(p, q) => {
                            params.push(segment_param(start, end, p));
                            params.push(segment_param(start, end, q));
                        }
                    }
                }
            }
            params.sort_by(f64::total_cmp);
            for pair in params.windows(2) {
                if pair[1] <= pair[0] {
                    continue;
                }
                let mid = start + (end - start) * ((pair[0] + pair[1]) / 2.);
                let on_a = lines_a
                    .iter()
                    .any(|la| la.windows(2).any(|wa| point_on_segment(mid, wa[0], wa[1])));
                if !on_a {
                    return false;
                }
            }
        }
    }
    true
}

#[derive(Default)]
struct LineClass {
    inside: bool,
    outside: bool,
    boundary: bool,
}

/// Split every line segment at its intersections with the polygons' rings and
/// classify the pieces (by midpoint) and the vertices against the polygons.
fn classify_lines(lines: &[&[Coordinate]], polygons: &[&Polygon]) -> LineClass {
    let mut class = LineClass::default();
    for line in lines {
        for &vertex in line.iter() {
            class.note(locate_in_polygons(vertex, polygons));
        }
        for w in line.windows(2) {
            let (start, end) = (w[0], w[1]);
            if start == end {
                continue;
            }
            let mut params = vec![0., 1.];
            for polygon in polygons {
                for ring in polygon.rings() {
                    for rw in ring.windows(2) {
                        match intersect_segments(start, end, rw[0], rw[1]) {
                            SegmentIntersection::None => {}
                            SegmentIntersection::Point(p) => {
                                params.push(segment_param(start, end, p))
                            }
                            SegmentIntersection::Overlap(p, q) => {
                                params.push(segment_param(start, end, p));
                                params.push(segment_param(start, end, q));
                            }
                        }
                    }
                }
            }
            params.sort_by(f64::total_cmp);
            for pair in params.windows(2) {
                if pair[1] <= pair[0] {
                    continue;
                }
                let mid = start + (end - start) * ((pair[0] + pair[1]) / 2.);
                class.note(locate_in_polygons(mid, polygons));
            }
        }
    }
    class
}

impl LineClass {
    fn note(&mut self, location: Location) {
        match location {
            Location::Inside => self.inside = true,
            Location::Outside => self.outside = true,
            Location::Boundary => self.boundary = true,
        }
    }
}

fn locate_in_polygons(p: Coordinate, polygons: &[&Polygon]) -> Location {
    let mut boundary = false;
    for polygon in polygons {
        match locate_in_polygon(p, polygon) {
            Location::Inside => return Location::Inside,
            Location::Boundary => boundary = true,
            Location::Outside => {}
        }
    }
    if boundary {
        Location::Boundary
    } else {
        Location::Outside
    }
}

fn interiors_meet(a: &Parts, b: &Parts) -> bool {
    for &p in &a.points {
        if matches!(b.locate_point(p), PointClass::Interior) {
            return true;
        }
    }
    for &p in &b.points {
        if matches!(a.locate_point(p), PointClass::Interior) {
            return true;
        }
    }
    for la in &a.lines {
        for wa in la.windows(2) {
            for lb in &b.lines {
                for wb in lb.windows(2) {
                    match intersect_segments(wa[0], wa[1], wb[0], wb[1]) {
                        SegmentIntersection::None => {}
                        SegmentIntersection::Overlap(_, _) => return true,
                        SegmentIntersection::Point(p) => {
                            if !is_boundary_endpoint(p, &a.lines)
                                && !is_boundary_endpoint(p, &b.lines)
                            {
                                return true;
                            }
                        }
                    }
                }
            }
        }
    }
    if !a.lines.is_empty()
        && !b.polygons.is_empty()
        && classify_lines(&a.lines, &b.polygons).inside
    {
        return true;
    }
    if !b.lines.is_empty()
        && !a.polygons.is_empty()
        && classify_lines(&b.lines, &a.polygons).inside
    {
        return true;
    }
    if !a.polygons.is_empty() && !b.polygons.is_empty() {
        if classify_lines(&a.ring_lines(), &b.polygons).inside
            || classify_lines(&b.ring_lines(), &a.polygons).inside
        {
            return true;
        }
        // Identical or ring-sharing interiors: probe a representative
        // interior point of each polygon against the other set.
        for polygon in &a.polygons {
            if let Some(probe) = interior_probe(polygon) {
                if locate_in_polygons(probe, &b.polygons) == Location::Inside {
                    return true;
                }
            }
        }
        for polygon in &b.polygons {
            if let Some(probe) = interior_probe(polygon) {
                if locate_in_polygons(probe, &a.polygons) == Location::Inside {
                    return true;
                }
            }
        }
    }
    false
}

fn interior_probe(polygon: &Polygon) -> Option<Coordinate> {
    let centroid = super::measures::polygon_centroid(polygon)?;
    if locate_in_polygon(centroid, polygon) == Location::Inside {
        Some(centroid)
    } else {
        None
    }
}
