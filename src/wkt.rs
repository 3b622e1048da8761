//! Well-Known Text parsing and writing, plus the SVG path rendering.
//! Parsing is delegated to the `wkt` crate; the writers are fixed-precision
//! formatters that trim trailing zeros.

use crate::errors::ParseError;
use crate::{Coordinate, Geometry, Polygon, Shape};
use ::wkt::types;
use ::wkt::types::Coord;

impl From<Coord<f64>> for Coordinate {
    fn from(coord: Coord<f64>) -> Self {
        Coordinate {
            x: coord.x,
            y: coord.y,
        }
    }
}

/// Parse a single WKT geometry.  The result carries SRID 0; rebind with
/// `Geometry::with_srid` as needed.
pub fn parse_wkt(wkt_str: &str) -> Result<Geometry, ParseError> {
    let wkt_geoms =
        ::wkt::Wkt::from_str(wkt_str).map_err(|e: &str| ParseError::InvalidWkt(e.to_string()))?;
    let mut items = wkt_geoms.items;
    if items.len() != 1 {
        return Err(ParseError::NotOneGeometry(items.len()));
    }
    from_wkt_geometry(items.remove(0))
}

fn from_wkt_geometry(geom: ::wkt::Geometry<f64>) -> Result<Geometry, ParseError> {
    let shape = match geom {
        ::wkt::Geometry::Point(p) => Shape::Point(p.0.map(Coordinate::from)),
        ::wkt::Geometry::LineString(ls) => Shape::LineString(linestring_to_coords(ls)),
        ::wkt::Geometry::Polygon(poly) => Shape::Polygon(from_wkt_polygon(poly)),
        ::wkt::Geometry::MultiPoint(mp) => Shape::MultiPoint(
            mp.0.into_iter()
                .filter_map(|p| p.0.map(Coordinate::from))
                .collect(),
        ),
        ::wkt::Geometry::MultiLineString(mls) => Shape::MultiLineString(
            mls.0.into_iter().map(linestring_to_coords).collect(),
        ),
        ::wkt::Geometry::MultiPolygon(mpoly) => Shape::MultiPolygon(
            mpoly.0.into_iter().map(from_wkt_polygon).collect(),
        ),
        ::wkt::Geometry::GeometryCollection(gc) => {
            let members: Result<Vec<Geometry>, ParseError> =
                gc.0.into_iter().map(from_wkt_geometry).collect();
            Shape::GeometryCollection(members?)
        }
    };
    Ok(Geometry::new(shape, 0)?)
}

fn linestring_to_coords(linestring: types::LineString<f64>) -> Vec<Coordinate> {
    linestring.0.into_iter().map(Coordinate::from).collect()
}

fn from_wkt_polygon(poly: types::Polygon<f64>) -> Polygon {
    let mut linestrings = poly.0;
    if linestrings.is_empty() {
        return Polygon {
            shell: Vec::new(),
            holes: Vec::new(),
        };
    }
    let shell = linestring_to_coords(linestrings.remove(0));
    let holes = linestrings.into_iter().map(linestring_to_coords).collect();
    Polygon { shell, holes }
}

/// Render a geometry as WKT with coordinates rounded to the given decimal
/// precision, trailing zeros trimmed.
pub fn write_wkt(geom: &Geometry, precision: usize) -> String {
    write_shape(geom.shape(), precision)
}

fn write_shape(shape: &Shape, precision: usize) -> String {
    match shape {
        Shape::Point(None) => "POINT EMPTY".to_string(),
        Shape::Point(Some(c)) => format!("POINT({})", format_coord(*c, precision)),
        Shape::LineString(coords) => {
            if coords.is_empty() {
                "LINESTRING EMPTY".to_string()
            } else {
                format!("LINESTRING({})", format_coords(coords, precision))
            }
        }
        Shape::Polygon(polygon) => {
            if polygon.shell.is_empty() {
                "POLYGON EMPTY".to_string()
            } else {
                format!("POLYGON({})", format_rings(polygon, precision))
            }
        }
        Shape::MultiPoint(coords) => {
            if coords.is_empty() {
                "MULTIPOINT EMPTY".to_string()
            } else {
                format!("MULTIPOINT({})", format_coords(coords, precision))
            }
        }
        Shape::MultiLineString(lines) => {
            if lines.is_empty() {
                "MULTILINESTRING EMPTY".to_string()
            } else {
                let parts: Vec<String> = lines
                    .iter()
                    .map(|l| format!("({})", format_coords(l, precision)))
                    .collect();
                format!("MULTILINESTRING({})", parts.join(", "))
            }
        }
        Shape::MultiPolygon(polygons) => {
            if polygons.is_empty() {
                "MULTIPOLYGON EMPTY".to_string()
            } else {
                let parts: Vec<String> = polygons
                    .iter()
                    .map(|p| format!("({})", format_rings(p, precision)))
                    .collect();
                format!("MULTIPOLYGON({})", parts.join(", "))
            }
        }
        Shape::GeometryCollection(members) => {
            if members.is_empty() {
                "GEOMETRYCOLLECTION EMPTY".to_string()
            } else {
                let parts: Vec<String> = members
                    .iter()
                    .map(|m| write_shape(m.shape(), precision))
                    .collect();
                format!("GEOMETRYCOLLECTION({})", parts.join(", "))
            }
        }
    }
}

/// Render a geometry as SVG path data: y is negated so north is up, numbers
/// use the same trimmed fixed precision as the WKT writer.
pub fn write_svg(geom: &Geometry, precision: usize) -> String {
    match geom.shape() {
        Shape::Point(None) => String::new(),
        Shape::Point(Some(c)) => format!(
            "cx=\"{}\" cy=\"{}\"",
            format_number(c.x, precision),
            format_number(-c.y, precision)
        ),
        Shape::LineString(coords) => svg_path(coords, precision),
        Shape::Polygon(polygon) => svg_polygon(polygon, precision),
        Shape::MultiPoint(coords) => {
            let parts: Vec<String> = coords
                .iter()
                .map(|c| {
                    format!(
                        "cx=\"{}\" cy=\"{}\"",
                        format_number(c.x, precision),
                        format_number(-c.y, precision)
                    )
                })
                .collect();
            parts.join(";")
        }
        Shape::MultiLineString(lines) => {
            let parts: Vec<String> = lines.iter().map(|l| svg_path(l, precision)).collect();
            parts.join(";")
        }
        Shape::MultiPolygon(polygons) => {
            let parts: Vec<String> =
                polygons.iter().map(|p| svg_polygon(p, precision)).collect();
            parts.join(";")
        }
        Shape::GeometryCollection(members) => {
            let parts: Vec<String> =
                members.iter().map(|m| write_svg(m, precision)).collect();
            parts.join(";")
        }
    }
}

fn svg_path(coords: &[Coordinate], precision: usize) -> String {
    let mut out = String::from("M");
    for c in coords {
        out.push(' ');
        out.push_str(&format_number(c.x, precision));
        out.push(' ');
        out.push_str(&format_number(-c.y, precision));
    }
    out.push(' ');
    out
}

fn svg_polygon(polygon: &Polygon, precision: usize) -> String {
    let rings: Vec<String> = polygon
        .rings()
        .map(|ring| {
            let mut out = String::from("M");
            for (index, c) in ring.iter().enumerate() {
                if index == 1 {
                    out.push_str(" L");
                }
                out.push(' ');
                out.push_str(&format_number(c.x, precision));
                out.push(' ');
                out.push_str(&format_number(-c.y, precision));
            }
            out.push_str(" z");
            out
        })
        .collect();
    rings.join(" ")
}

fn format_rings(polygon: &Polygon, precision: usize) -> String {
    let parts: Vec<String> = polygon
        .rings()
        .map(|ring| format!("({})", format_coords(ring, precision)))
        .collect();
    parts.join(", ")
}

fn format_coords(coords: &[Coordinate], precision: usize) -> String {
    let parts: Vec<String> = coords
        .iter()
        .map(|&c| format_coord(c, precision))
        .collect();
    parts.join(", ")
}

fn format_coord(coord: Coordinate, precision: usize) -> String {
    format!(
        "{} {}",
        format_number(coord.x, precision),
        format_number(coord.y, precision)
    )
}

fn format_number(value: f64, precision: usize) -> String {
    let mut out = format!("{:.*}", precision, value);
    if out.contains('.') {
        while out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.pop();
        }
    }
    if out == "-0" {
        out = "0".to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAVE_CRES: &str = "LINESTRING(-88.6748409363057 43.1035032292994,-88.6464173694267 42.9981688343949,-88.607961955414 42.9680732929936,-88.5160033566879 42.9363057770701,-88.4390925286624 43.0031847579618)";

    fn coords(raw: &[(f64, f64)]) -> Vec<Coordinate> {
        raw.iter().map(|&c| c.into()).collect()
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_wkt("xyz"), Err(ParseError::InvalidWkt(_))));
        assert_eq!(parse_wkt(""), Err(ParseError::NotOneGeometry(0)));
    }

    #[test]
    fn test_parse_point() {
        let geom = parse_wkt("POINT(1.0 1.0)").unwrap();
        assert_eq!(geom.shape(), &Shape::Point(Some((1., 1.).into())));
        let geom = parse_wkt("POINT (3 4)").unwrap();
        assert_eq!(geom.shape(), &Shape::Point(Some((3., 4.).into())));
    }

    #[test]
    fn test_parse_linestring() {
        let geom = parse_wkt("LINESTRING(1 1,2 3,4 8, -6 3)").unwrap();
        assert_eq!(
            geom.shape(),
            &Shape::LineString(coords(&[(1., 1.), (2., 3.), (4., 8.), (-6., 3.)]))
        );
        let geom = parse_wkt("LINESTRING EMPTY").unwrap();
        assert_eq!(geom.shape(), &Shape::LineString(Vec::new()));
    }

    #[test]
    fn test_parse_single_point_linestring_fails() {
        assert_eq!(
            parse_wkt("LINESTRING(1 1)"),
            Err(ParseError::Structure(
                crate::errors::GeometryError::SingleCoordinate
            ))
        );
    }

    #[test]
    fn test_parse_polygon_with_holes() {
        let geom = parse_wkt(
            "POLYGON((-5 -5, -5 5, 5 5, 5 -5, -5 -5),(0 0, 3 0, 3 3, 0 3, 0 0))",
        )
        .unwrap();
        assert_eq!(
            geom.shape(),
            &Shape::Polygon(Polygon {
                shell: coords(&[(-5., -5.), (-5., 5.), (5., 5.), (5., -5.), (-5., -5.)]),
                holes: vec![coords(&[(0., 0.), (3., 0.), (3., 3.), (0., 3.), (0., 0.)])],
            })
        );
    }

    #[test]
    fn test_parse_multi_geometries() {
        let geom = parse_wkt("MULTIPOINT((2 3), (7 8))").unwrap();
        assert_eq!(
            geom.shape(),
            &Shape::MultiPoint(coords(&[(2., 3.), (7., 8.)]))
        );
        let geom = parse_wkt("MULTILINESTRING((1 1, 5 5), (1 3, 3 1))").unwrap();
        assert_eq!(
            geom.shape(),
            &Shape::MultiLineString(vec![
                coords(&[(1., 1.), (5., 5.)]),
                coords(&[(1., 3.), (3., 1.)])
            ])
        );
        let geom = parse_wkt(
            "MULTIPOLYGON(((1 1, 1 -1, -1 -1, -1 1, 1 1)),((1 1, 3 1, 3 3, 1 3, 1 1)))",
        )
        .unwrap();
        assert_eq!(geom.geometry_type(), "MULTIPOLYGON");
        let geom =
            parse_wkt("GEOMETRYCOLLECTION(POINT(1 2), LINESTRING(0 0, 1 1))").unwrap();
        assert_eq!(geom.geometry_type(), "GEOMETRYCOLLECTION");
        assert_eq!(geom.dimension(), 1);
    }

    #[test]
    fn test_write_wkt_trims_precision() {
        let road = parse_wkt("LINESTRING(-88.9139332929936 42.5082802993631,-88.8203027197452 42.5985669235669,-88.7383759681529 42.7239650127389,-88.6113059044586 42.9680732929936,-88.3655256496815 43.1402866687898)").unwrap();
        assert_eq!(
            write_wkt(&road, 6),
            "LINESTRING(-88.913933 42.50828, -88.820303 42.598567, -88.738376 42.723965, -88.611306 42.968073, -88.365526 43.140287)"
        );
    }

    #[test]
    fn test_write_wkt_road() {
        let road = parse_wkt(DAVE_CRES).unwrap();
        assert_eq!(
            write_wkt(&road, 6),
            "LINESTRING(-88.674841 43.103503, -88.646417 42.998169, -88.607962 42.968073, -88.516003 42.936306, -88.439093 43.003185)"
        );
    }

    #[test]
    fn test_write_wkt_shapes() {
        let point = Geometry::point((1.5, -2.).into());
        assert_eq!(write_wkt(&point, 6), "POINT(1.5 -2)");
        assert_eq!(write_wkt(&Geometry::empty_point(), 6), "POINT EMPTY");
        let polygon = parse_wkt("POLYGON((0 0, 1 0, 1 1, 0 0))").unwrap();
        assert_eq!(write_wkt(&polygon, 6), "POLYGON((0 0, 1 0, 1 1, 0 0))");
        let donut =
            parse_wkt("POLYGON((0 0, 4 0, 4 4, 0 4, 0 0), (1 1, 1 2, 2 2, 2 1, 1 1))").unwrap();
        assert_eq!(
            write_wkt(&donut, 6),
            "POLYGON((0 0, 4 0, 4 4, 0 4, 0 0), (1 1, 1 2, 2 2, 2 1, 1 1))"
        );
        let multi = parse_wkt(
            "MULTIPOLYGON(((1 1, 1 -1, -1 -1, -1 1, 1 1)),((1 1, 3 1, 3 3, 1 3, 1 1)))",
        )
        .unwrap();
        assert_eq!(
            write_wkt(&multi, 6),
            "MULTIPOLYGON(((1 1, 1 -1, -1 -1, -1 1, 1 1)), ((1 1, 3 1, 3 3, 1 3, 1 1)))"
        );
        let collection =
            parse_wkt("GEOMETRYCOLLECTION(POINT(1 2), LINESTRING(0 0, 1 1))").unwrap();
        assert_eq!(
            write_wkt(&collection, 6),
            "GEOMETRYCOLLECTION(POINT(1 2), LINESTRING(0 0, 1 1))"
        );
    }

    #[test]
    fn test_wkt_round_trip_precision() {
        let road = parse_wkt(DAVE_CRES).unwrap();
        let rendered = write_wkt(&road, 6);
        let reparsed = parse_wkt(&rendered).unwrap();
        if let (Shape::LineString(a), Shape::LineString(b)) =
            (road.shape(), reparsed.shape())
        {
            for (ca, cb) in a.iter().zip(b.iter()) {
                assert!((ca.x - cb.x).abs() < 1e-6);
                assert!((ca.y - cb.y).abs() < 1e-6);
            }
        } else {
            panic!("expected linestrings");
        }
    }

    #[test]
    fn test_write_svg() {
        let road = parse_wkt(DAVE_CRES).unwrap();
        assert_eq!(
            write_svg(&road, 6),
            "M -88.674841 -43.103503 -88.646417 -42.998169 -88.607962 -42.968073 -88.516003 -42.936306 -88.439093 -43.003185 "
        );
        let point = parse_wkt("POINT(-88.5945861592357 42.9480095987261)").unwrap();
        assert_eq!(
            write_svg(&point, 6),
            "cx=\"-88.594586\" cy=\"-42.94801\""
        );
        let polygon = parse_wkt("POLYGON((0 0, 1 0, 1 1, 0 0))").unwrap();
        assert_eq!(write_svg(&polygon, 6), "M 0 0 L 1 0 1 -1 0 0 z");
    }
}
