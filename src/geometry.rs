use crate::algorithms;
use crate::errors::GeometryError;
use crate::{Coordinate, Envelope};

/// A polygon's coordinate rings: one exterior shell, zero or more holes.
/// Non-empty rings are closed (first == last) with at least 4 coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub shell: Vec<Coordinate>,
    pub holes: Vec<Vec<Coordinate>>,
}

impl Polygon {
    pub fn new(
        shell: Vec<Coordinate>,
        holes: Vec<Vec<Coordinate>>,
    ) -> Result<Self, GeometryError> {
        let polygon = Polygon { shell, holes };
        polygon.validate_rings()?;
        Ok(polygon)
    }

    pub fn rings(&self) -> impl Iterator<Item = &[Coordinate]> {
        std::iter::once(self.shell.as_slice()).chain(self.holes.iter().map(|h| h.as_slice()))
    }

    pub(crate) fn validate_rings(&self) -> Result<(), GeometryError> {
        for ring in self.rings() {
            validate_ring(ring)?;
        }
        Ok(())
    }
}

fn validate_ring(ring: &[Coordinate]) -> Result<(), GeometryError> {
    if ring.is_empty() {
        return Ok(());
    }
    if ring.len() < 4 {
        return Err(GeometryError::ShortRing(ring.len()));
    }
    if ring.first() != ring.last() {
        return Err(GeometryError::UnclosedRing);
    }
    Ok(())
}

fn validate_line(coords: &[Coordinate]) -> Result<(), GeometryError> {
    if coords.len() == 1 {
        return Err(GeometryError::SingleCoordinate);
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Point(Option<Coordinate>),
    LineString(Vec<Coordinate>),
    Polygon(Polygon),
    MultiPoint(Vec<Coordinate>),
    MultiLineString(Vec<Vec<Coordinate>>),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
}

impl Shape {
    pub(crate) fn validate(&self) -> Result<(), GeometryError> {
        match self {
            Shape::Point(_) | Shape::MultiPoint(_) => Ok(()),
            Shape::LineString(coords) => validate_line(coords),
            Shape::Polygon(polygon) => polygon.validate_rings(),
            Shape::MultiLineString(lines) => {
                lines.iter().try_for_each(|coords| validate_line(coords))
            }
            Shape::MultiPolygon(polygons) => {
                polygons.iter().try_for_each(|p| p.validate_rings())
            }
            // Members were validated at their own construction.
            Shape::GeometryCollection(_) => Ok(()),
        }
    }

    // Collection members always carry their container's SRID.
    pub(crate) fn bind_member_srid(&mut self, srid: u32) {
        if let Shape::GeometryCollection(members) = self {
            for member in members {
                member.srid = srid;
                member.shape.bind_member_srid(srid);
            }
        }
    }

    pub(crate) fn for_each_coord(&self, f: &mut dyn FnMut(Coordinate)) {
        match self {
            Shape::Point(coord) => {
                if let Some(c) = coord {
                    f(*c);
                }
            }
            Shape::MultiPoint(coords) | Shape::LineString(coords) => {
                coords.iter().for_each(|&c| f(c))
            }
            Shape::MultiLineString(lines) => {
                lines.iter().flatten().for_each(|&c| f(c))
            }
            Shape::Polygon(polygon) => {
                polygon.rings().flatten().for_each(|&c| f(c))
            }
            Shape::MultiPolygon(polygons) => polygons
                .iter()
                .flat_map(|p| p.rings())
                .flatten()
                .for_each(|&c| f(c)),
            Shape::GeometryCollection(members) => members
                .iter()
                .for_each(|member| member.shape.for_each_coord(f)),
        }
    }
}

/// A geometry value: a shape plus the SRID of its coordinate system.
/// SRID 0 means unspecified.  Immutable once constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    shape: Shape,
    srid: u32,
}

impl Geometry {
    pub fn new(mut shape: Shape, srid: u32) -> Result<Self, GeometryError> {
        shape.validate()?;
        shape.bind_member_srid(srid);
        Ok(Geometry { shape, srid })
    }

    pub fn point(coord: Coordinate) -> Self {
        Geometry {
            shape: Shape::Point(Some(coord)),
            srid: 0,
        }
    }

    pub fn empty_point() -> Self {
        Geometry {
            shape: Shape::Point(None),
            srid: 0,
        }
    }

    pub fn line_string(coords: Vec<Coordinate>) -> Result<Self, GeometryError> {
        Geometry::new(Shape::LineString(coords), 0)
    }

    pub fn polygon(
        shell: Vec<Coordinate>,
        holes: Vec<Vec<Coordinate>>,
    ) -> Result<Self, GeometryError> {
        Ok(Geometry {
            shape: Shape::Polygon(Polygon::new(shell, holes)?),
            srid: 0,
        })
    }

    pub fn multi_point(coords: Vec<Coordinate>) -> Self {
        Geometry {
            shape: Shape::MultiPoint(coords),
            srid: 0,
        }
    }

    pub fn multi_line_string(lines: Vec<Vec<Coordinate>>) -> Result<Self, GeometryError> {
        Geometry::new(Shape::MultiLineString(lines), 0)
    }

    pub fn multi_polygon(polygons: Vec<Polygon>) -> Result<Self, GeometryError> {
        Geometry::new(Shape::MultiPolygon(polygons), 0)
    }

    pub fn collection(members: Vec<Geometry>) -> Self {
        let mut shape = Shape::GeometryCollection(members);
        shape.bind_member_srid(0);
        Geometry { shape, srid: 0 }
    }

    /// Rebind the SRID; collection members are rebound with it.
    pub fn with_srid(mut self, srid: u32) -> Self {
        self.srid = srid;
        self.shape.bind_member_srid(srid);
        self
    }

    pub fn srid(&self) -> u32 {
        self.srid
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    fn derived(&self, shape: Shape) -> Geometry {
        Geometry {
            shape,
            srid: self.srid,
        }
    }

    // Scalar queries.  Inapplicable operations return None, never a zero.

    pub fn dimension(&self) -> u32 {
        match &self.shape {
            Shape::Point(_) | Shape::MultiPoint(_) => 0,
            Shape::LineString(_) | Shape::MultiLineString(_) => 1,
            Shape::Polygon(_) | Shape::MultiPolygon(_) => 2,
            Shape::GeometryCollection(members) => members
                .iter()
                .map(Geometry::dimension)
                .max()
                .unwrap_or(0),
        }
    }

    pub fn geometry_type(&self) -> &'static str {
        match &self.shape {
            Shape::Point(_) => "POINT",
            Shape::LineString(_) => "LINESTRING",
            Shape::Polygon(_) => "POLYGON",
            Shape::MultiPoint(_) => "MULTIPOINT",
            Shape::MultiLineString(_) => "MULTILINESTRING",
            Shape::MultiPolygon(_) => "MULTIPOLYGON",
            Shape::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.shape {
            Shape::Point(coord) => coord.is_none(),
            Shape::LineString(coords) => coords.is_empty(),
            Shape::Polygon(polygon) => polygon.shell.is_empty(),
            Shape::MultiPoint(coords) => coords.is_empty(),
            Shape::MultiLineString(lines) => lines.iter().all(|l| l.is_empty()),
            Shape::MultiPolygon(polygons) => polygons.iter().all(|p| p.shell.is_empty()),
            Shape::GeometryCollection(members) => members.iter().all(Geometry::is_empty),
        }
    }

    pub fn envelope(&self) -> Envelope {
        let mut envelope = Envelope::new_empty();
        self.shape.for_each_coord(&mut |c| envelope.expand_coord(c));
        envelope
    }

    pub fn x(&self) -> Option<f64> {
        match &self.shape {
            Shape::Point(Some(c)) => Some(c.x),
            _ => None,
        }
    }

    pub fn y(&self) -> Option<f64> {
        match &self.shape {
            Shape::Point(Some(c)) => Some(c.y),
            _ => None,
        }
    }

    pub fn num_points(&self) -> Option<usize> {
        match &self.shape {
            Shape::LineString(coords) => Some(coords.len()),
            _ => None,
        }
    }

    /// The 1-indexed nth point of a LineString.
    pub fn point_n(&self, n: usize) -> Option<Geometry> {
        match &self.shape {
            Shape::LineString(coords) => {
                if n == 0 {
                    return None;
                }
                let coord = *coords.get(n - 1)?;
                Some(self.derived(Shape::Point(Some(coord))))
            }
            _ => None,
        }
    }

    pub fn start_point(&self) -> Option<Geometry> {
        match &self.shape {
            Shape::LineString(coords) => {
                let coord = *coords.first()?;
                Some(self.derived(Shape::Point(Some(coord))))
            }
            _ => None,
        }
    }

    pub fn end_point(&self) -> Option<Geometry> {
        match &self.shape {
            Shape::LineString(coords) => {
                let coord = *coords.last()?;
                Some(self.derived(Shape::Point(Some(coord))))
            }
            _ => None,
        }
    }

    pub fn is_closed(&self) -> Option<bool> {
        match &self.shape {
            Shape::LineString(coords) => {
                if coords.is_empty() {
                    return None;
                }
                Some(coords.first() == coords.last())
            }
            _ => None,
        }
    }

    pub fn is_ring(&self) -> Option<bool> {
        match &self.shape {
            Shape::LineString(coords) => {
                if coords.is_empty() {
                    return None;
                }
                Some(coords.first() == coords.last() && algorithms::is_simple_path(coords))
            }
            _ => None,
        }
    }

    pub fn length(&self) -> Option<f64> {
        match &self.shape {
            Shape::Point(_) | Shape::MultiPoint(_) => None,
            Shape::LineString(coords) => Some(algorithms::line_length(coords)),
            Shape::MultiLineString(lines) => {
                Some(lines.iter().map(|l| algorithms::line_length(l)).sum())
            }
            Shape::Polygon(polygon) => Some(perimeter(polygon)),
            Shape::MultiPolygon(polygons) => Some(polygons.iter().map(perimeter).sum()),
            Shape::GeometryCollection(members) => {
                let lengths: Vec<f64> =
                    members.iter().filter_map(Geometry::length).collect();
                if lengths.is_empty() {
                    None
                } else {
                    Some(lengths.iter().sum())
                }
            }
        }
    }

    pub fn area(&self) -> f64 {
        match &self.shape {
            Shape::Polygon(polygon) => algorithms::polygon_area(polygon),
            Shape::MultiPolygon(polygons) => {
                polygons.iter().map(algorithms::polygon_area).sum()
            }
            Shape::GeometryCollection(members) => members.iter().map(Geometry::area).sum(),
            _ => 0.,
        }
    }

    pub fn centroid(&self) -> Option<Geometry> {
        let coord = algorithms::shape_centroid(&self.shape)?;
        Some(self.derived(Shape::Point(Some(coord))))
    }

    pub fn boundary(&self) -> Option<Geometry> {
        match &self.shape {
            Shape::Point(_) | Shape::MultiPoint(_) | Shape::GeometryCollection(_) => None,
            Shape::LineString(coords) => {
                if coords.is_empty() {
                    return None;
                }
                Some(self.clone())
            }
            Shape::MultiLineString(_) => Some(self.clone()),
            Shape::Polygon(polygon) => {
                Some(self.derived(Shape::MultiLineString(ring_lines(polygon))))
            }
            Shape::MultiPolygon(polygons) => Some(self.derived(Shape::MultiLineString(
                polygons.iter().flat_map(ring_lines).collect(),
            ))),
        }
    }

    pub fn is_simple(&self) -> bool {
        match &self.shape {
            Shape::Point(_) => true,
            Shape::MultiPoint(coords) => {
                for (i, a) in coords.iter().enumerate() {
                    if coords[..i].contains(a) {
                        return false;
                    }
                }
                true
            }
            Shape::LineString(coords) => algorithms::is_simple_path(coords),
            Shape::MultiLineString(lines) => {
                lines.iter().all(|l| algorithms::is_simple_path(l))
            }
            Shape::Polygon(polygon) => algorithms::is_simple_polygon(polygon),
            Shape::MultiPolygon(polygons) => {
                polygons.iter().all(algorithms::is_simple_polygon)
            }
            Shape::GeometryCollection(members) => members.iter().all(Geometry::is_simple),
        }
    }

    pub fn is_valid(&self) -> bool {
        match &self.shape {
            Shape::Point(_) | Shape::MultiPoint(_) => true,
            Shape::LineString(coords) => {
                coords.is_empty() || algorithms::is_simple_path(coords)
            }
            Shape::MultiLineString(lines) => lines
                .iter()
                .all(|l| l.is_empty() || algorithms::is_simple_path(l)),
            Shape::Polygon(polygon) => algorithms::is_valid_polygon(polygon),
            Shape::MultiPolygon(polygons) => {
                polygons.iter().all(algorithms::is_valid_polygon)
            }
            Shape::GeometryCollection(members) => members.iter().all(Geometry::is_valid),
        }
    }
}

fn perimeter(polygon: &Polygon) -> f64 {
    polygon.rings().map(algorithms::line_length).sum()
}

fn ring_lines(polygon: &Polygon) -> Vec<Vec<Coordinate>> {
    polygon.rings().map(|ring| ring.to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wkt::parse_wkt;

    const DAVE_CRES: &str = "LINESTRING(-88.6748409363057 43.1035032292994,-88.6464173694267 42.9981688343949,-88.607961955414 42.9680732929936,-88.5160033566879 42.9363057770701,-88.4390925286624 43.0031847579618)";

    fn coords(raw: &[(f64, f64)]) -> Vec<Coordinate> {
        raw.iter().map(|&c| c.into()).collect()
    }

    #[test]
    fn test_structural_invariants() {
        assert_eq!(
            Geometry::line_string(coords(&[(0., 0.)])).unwrap_err(),
            GeometryError::SingleCoordinate
        );
        assert_eq!(
            Geometry::polygon(coords(&[(0., 0.), (1., 0.), (0., 0.)]), Vec::new())
                .unwrap_err(),
            GeometryError::ShortRing(3)
        );
        assert_eq!(
            Geometry::polygon(
                coords(&[(0., 0.), (1., 0.), (1., 1.), (0., 1.)]),
                Vec::new()
            )
            .unwrap_err(),
            GeometryError::UnclosedRing
        );
        assert!(Geometry::line_string(Vec::new()).is_ok());
    }

    #[test]
    fn test_srid_binding() {
        let geom = Geometry::point((1., 2.).into()).with_srid(4326);
        assert_eq!(geom.srid(), 4326);
        assert_eq!(Geometry::point((1., 2.).into()).srid(), 0);
        // Derived geometries keep the source SRID.
        let line = parse_wkt("LINESTRING(0 0, 1 1)").unwrap().with_srid(4326);
        assert_eq!(line.start_point().unwrap().srid(), 4326);
        assert_eq!(line.centroid().unwrap().srid(), 4326);
    }

    #[test]
    fn test_collection_members_share_srid() {
        let point = Geometry::point((1., 2.).into()).with_srid(2249);
        let inner = Geometry::collection(vec![point]);
        let outer = Geometry::collection(vec![inner]).with_srid(4326);
        assert_eq!(outer.srid(), 4326);
        if let Shape::GeometryCollection(members) = outer.shape() {
            let inner = &members[0];
            assert_eq!(inner.srid(), 4326);
            if let Shape::GeometryCollection(leaves) = inner.shape() {
                assert_eq!(leaves[0].srid(), 4326);
            } else {
                panic!("expected nested collection");
            }
        } else {
            panic!("expected collection");
        }
    }

    #[test]
    fn test_dimension_and_type() {
        let point = Geometry::point((0., 0.).into());
        let line = Geometry::line_string(coords(&[(0., 0.), (1., 1.)])).unwrap();
        let polygon = Geometry::polygon(
            coords(&[(0., 0.), (1., 0.), (1., 1.), (0., 0.)]),
            Vec::new(),
        )
        .unwrap();
        assert_eq!(point.dimension(), 0);
        assert_eq!(line.dimension(), 1);
        assert_eq!(polygon.dimension(), 2);
        assert_eq!(point.geometry_type(), "POINT");
        assert_eq!(line.geometry_type(), "LINESTRING");
        assert_eq!(polygon.geometry_type(), "POLYGON");
        let collection = Geometry::collection(vec![point, line]);
        assert_eq!(collection.dimension(), 1);
        assert_eq!(collection.geometry_type(), "GEOMETRYCOLLECTION");
    }

    #[test]
    fn test_road_scenario() {
        let road = parse_wkt(DAVE_CRES).unwrap();
        assert_eq!(road.num_points(), Some(5));
        assert_eq!(road.is_closed(), Some(false));
        assert_eq!(road.is_ring(), Some(false));
        assert!(!road.is_empty());
        assert!(road.is_simple());
        assert!(road.is_valid());
        let start = road.start_point().unwrap();
        assert_eq!(start.x(), Some(-88.6748409363057));
        assert_eq!(start.y(), Some(43.1035032292994));
        let end = road.end_point().unwrap();
        assert_eq!(end.x(), Some(-88.4390925286624));
        assert_eq!(end.y(), Some(43.0031847579618));
        // point_n is 1-indexed.
        assert_eq!(road.point_n(5), road.end_point());
        assert_eq!(road.point_n(1), road.start_point());
        assert_eq!(road.point_n(0), None);
        assert_eq!(road.point_n(6), None);
    }

    #[test]
    fn test_road_length() {
        let jeff = parse_wkt("LINESTRING(-88.9139332929936 42.5082802993631,-88.8203027197452 42.5985669235669,-88.7383759681529 42.7239650127389,-88.6113059044586 42.9680732929936,-88.3655256496815 43.1402866687898)").unwrap();
        assert!((jeff.length().unwrap() - 0.8551694164147895).abs() < 1e-9);
        let dave = parse_wkt(DAVE_CRES).unwrap();
        assert!((dave.length().unwrap() - 0.35714690780353586).abs() < 1e-9);
        assert_eq!(dave.area(), 0.);
    }

    #[test]
    fn test_lake_measures() {
        let lake = parse_wkt("POLYGON((-88.7968950764331 43.2305732929936,-88.7935511273885 43.1553344394904,-88.716640299363 43.1570064140127,-88.7250001719745 43.2339172420382,-88.7968950764331 43.2305732929936))").unwrap();
        assert!((lake.area() - 0.0056748625704927669).abs() < 1e-12);
        assert!((lake.length().unwrap() - 0.30157858985653774).abs() < 1e-9);
        assert_eq!(lake.dimension(), 2);
        assert!(lake.is_valid());
    }

    #[test]
    fn test_rectangle_area_and_ring() {
        let ring = parse_wkt("LINESTRING(0 0, 4 0, 4 3, 0 3, 0 0)").unwrap();
        assert_eq!(ring.is_closed(), Some(true));
        assert_eq!(ring.is_ring(), Some(true));
        let rectangle = parse_wkt("POLYGON((0 0, 4 0, 4 3, 0 3, 0 0))").unwrap();
        assert_eq!(rectangle.area(), 12.);
        assert_eq!(rectangle.length(), Some(14.));
    }

    #[test]
    fn test_absent_queries() {
        let point = Geometry::point((1., 2.).into());
        let polygon = parse_wkt("POLYGON((0 0, 1 0, 1 1, 0 0))").unwrap();
        assert_eq!(point.length(), None);
        assert_eq!(point.num_points(), None);
        assert_eq!(point.start_point(), None);
        assert_eq!(point.is_closed(), None);
        assert_eq!(point.boundary(), None);
        assert_eq!(polygon.x(), None);
        assert_eq!(polygon.num_points(), None);
        assert_eq!(polygon.is_closed(), None);
        assert_eq!(point.x(), Some(1.));
        assert_eq!(point.y(), Some(2.));
    }

    #[test]
    fn test_is_empty() {
        assert!(Geometry::empty_point().is_empty());
        assert!(Geometry::line_string(Vec::new()).unwrap().is_empty());
        assert!(Geometry::multi_point(Vec::new()).is_empty());
        assert!(Geometry::collection(Vec::new()).is_empty());
        assert!(!Geometry::point((0., 0.).into()).is_empty());
    }

    #[test]
    fn test_envelope() {
        let road = parse_wkt(DAVE_CRES).unwrap();
        let envelope = road.envelope();
        assert_eq!(envelope.x_min, -88.6748409363057);
        assert_eq!(envelope.x_max, -88.4390925286624);
        assert_eq!(envelope.y_min, 42.9363057770701);
        assert_eq!(envelope.y_max, 43.1035032292994);
        assert!(Geometry::empty_point().envelope().is_empty());
        let point = Geometry::point((1., 2.).into());
        assert_eq!(point.envelope().center(), Coordinate::new(1., 2.));
    }

    #[test]
    fn test_boundary() {
        let line = parse_wkt("LINESTRING(0 0, 1 1)").unwrap();
        assert_eq!(line.boundary(), Some(line.clone()));
        let polygon = parse_wkt("POLYGON((0 0, 1 0, 1 1, 0 0))").unwrap();
        let boundary = polygon.boundary().unwrap();
        assert_eq!(boundary.geometry_type(), "MULTILINESTRING");
        assert_eq!(boundary.dimension(), 1);
        assert_eq!(boundary.length(), polygon.length());
    }

    #[test]
    fn test_centroid() {
        let point = Geometry::point((3., 4.).into());
        assert_eq!(point.centroid(), Some(point.clone()));
        let square = parse_wkt("POLYGON((0 0, 2 0, 2 2, 0 2, 0 0))").unwrap();
        let centroid = square.centroid().unwrap();
        assert_eq!(centroid.x(), Some(1.));
        assert_eq!(centroid.y(), Some(1.));
        assert_eq!(Geometry::empty_point().centroid(), None);
    }

    #[test]
    fn test_multi_point_simplicity() {
        let simple = Geometry::multi_point(coords(&[(0., 0.), (1., 1.)]));
        let repeated = Geometry::multi_point(coords(&[(0., 0.), (1., 1.), (0., 0.)]));
        assert!(simple.is_simple());
        assert!(!repeated.is_simple());
    }
}
