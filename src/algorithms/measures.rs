use crate::{Coordinate, Polygon, Shape};

/// Sum of consecutive segment lengths.
pub fn line_length(coords: &[Coordinate]) -> f64 {
    coords.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Signed shoelace area of a closed ring; positive for counter-clockwise.
pub fn ring_signed_area(ring: &[Coordinate]) -> f64 {
    ring.windows(2).map(|w| w[0].cross(w[1])).sum::<f64>() / 2.
}

/// Area of the exterior ring minus the holes, never negative.
pub fn polygon_area(polygon: &Polygon) -> f64 {
    let shell = ring_signed_area(&polygon.shell).abs();
    let holes: f64 = polygon
        .holes
        .iter()
        .map(|hole| ring_signed_area(hole).abs())
        .sum();
    (shell - holes).max(0.)
}

/// Length-weighted centroid of a path; falls back to the vertex average for
/// zero-length paths.
pub fn line_centroid(coords: &[Coordinate]) -> Option<Coordinate> {
    if coords.is_empty() {
        return None;
    }
    let mut total = 0.;
    let mut acc = Coordinate::new(0., 0.);
    for w in coords.windows(2) {
        let length = w[0].distance(w[1]);
        acc = acc + (w[0] + w[1]) * (0.5 * length);
        total += length;
    }
    if total == 0. {
        return vertex_average(coords);
    }
    Some(acc * (1. / total))
}

/// Area-weighted centroid of exterior minus holes; falls back to the shell's
/// line centroid for zero-area polygons.
pub fn polygon_centroid(polygon: &Polygon) -> Option<Coordinate> {
    if polygon.shell.is_empty() {
        return None;
    }
    let mut area_sum = 0.;
    let mut acc = Coordinate::new(0., 0.);
    for (index, ring) in polygon.rings().enumerate() {
        let signed = ring_signed_area(ring);
        if signed == 0. {
            continue;
        }
        let weight = if index == 0 {
            signed.abs()
        } else {
            -signed.abs()
        };
        acc = acc + ring_centroid(ring, signed) * weight;
        area_sum += weight;
    }
    if area_sum == 0. {
        return line_centroid(&polygon.shell);
    }
    Some(acc * (1. / area_sum))
}

pub(crate) fn shape_centroid(shape: &Shape) -> Option<Coordinate> {
    match shape {
        Shape::Point(coord) => *coord,
        Shape::MultiPoint(coords) => vertex_average(coords),
        Shape::LineString(coords) => line_centroid(coords),
        Shape::MultiLineString(lines) => {
            weighted_centroid(lines.iter().filter_map(|coords| {
                Some((line_centroid(coords)?, line_length(coords)))
            }))
        }
        Shape::Polygon(polygon) => polygon_centroid(polygon),
        Shape::MultiPolygon(polygons) => {
            weighted_centroid(polygons.iter().filter_map(|polygon| {
                Some((polygon_centroid(polygon)?, polygon_area(polygon)))
            }))
        }
        Shape::GeometryCollection(_) => None,
    }
}

fn vertex_average(coords: &[Coordinate]) -> Option<Coordinate> {
    if coords.is_empty() {
        return None;
    }
    let sum = coords
        .iter()
        .fold(Coordinate::new(0., 0.), |acc, &c| acc + c);
    Some(sum * (1. / coords.len() as f64))
}

fn weighted_centroid(parts: impl Iterator<Item = (Coordinate, f64)>) -> Option<Coordinate> {
    let mut total = 0.;
    let mut acc = Coordinate::new(0., 0.);
    let mut any = None;
    for (centroid, weight) in parts {
        any.get_or_insert(centroid);
        acc = acc + centroid * weight;
        total += weight;
    }
    if total == 0. {
        // All parts degenerate; any part's centroid is as good as another.
        return any;
    }
    Some(acc * (1. / total))
}

fn ring_centroid(ring: &[Coordinate], signed_area: f64) -> Coordinate {
    let mut sx = 0.;
    let mut sy = 0.;
    for w in ring.windows(2) {
        let cross = w[0].cross(w[1]);
        sx += (w[0].x + w[1].x) * cross;
        sy += (w[0].y + w[1].y) * cross;
    }
    Coordinate::new(sx / (6. * signed_area), sy / (6. * signed_area))
}
