//! Internal spatial binary format.
//!
//! The blob wraps one geometry with its SRID and, for non-empty geometries,
//! a precomputed bounding box.  Layout, all little-endian:
//!
//! | bytes | content                                           |
//! |-------|---------------------------------------------------|
//! | 1     | header, always `0x00`                             |
//! | 4     | SRID as u32, 0 meaning unspecified                |
//! | 1     | envelope marker: `0x00` absent, `0x01` present,   |
//! |       | `0xFF` empty-geometry sentinel                    |
//! | 32    | min_x, min_y, max_x, max_y (marker `0x01` only)   |
//! | 4+    | geometry type code, then the type payload         |
//! | 1     | terminator, always `0xFE`                         |
//!
//! The type payload mirrors the WKB payloads except that members of
//! multi-geometries and collections carry only a type code, not a byte-order
//! flag.  Decoding verifies a stored envelope against the geometry.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Read;

use crate::errors::CodecError;
use crate::wkb;
use crate::{Coordinate, Geometry, Polygon, Shape};

const HEADER: u8 = 0x00;
const TERMINATOR: u8 = 0xFE;

const NO_ENVELOPE: u8 = 0x00;
const ENVELOPE: u8 = 0x01;
const EMPTY_GEOMETRY: u8 = 0xFF;

pub fn read_blob(bytes: &[u8]) -> Result<Geometry, CodecError> {
    let mut reader = bytes;
    let header = reader.read_u8()?;
    if header != HEADER {
        return Err(CodecError::BadHeader(header));
    }
    let srid = reader.read_u32::<LittleEndian>()?;
    let marker = reader.read_u8()?;
    let stored_envelope = match marker {
        NO_ENVELOPE | EMPTY_GEOMETRY => None,
        ENVELOPE => {
            let min_x = reader.read_f64::<LittleEndian>()?;
            let min_y = reader.read_f64::<LittleEndian>()?;
            let max_x = reader.read_f64::<LittleEndian>()?;
            let max_y = reader.read_f64::<LittleEndian>()?;
            Some((min_x, min_y, max_x, max_y))
        }
        unknown => return Err(CodecError::BadEnvelopeMarker(unknown)),
    };
    let shape = read_shape(&mut reader, srid)?;
    if reader.read_u8().map_err(|_| CodecError::MissingTerminator)? != TERMINATOR {
        return Err(CodecError::MissingTerminator);
    }
    if !reader.is_empty() {
        return Err(CodecError::TrailingBytes);
    }
    let geom = Geometry::new(shape, srid)?;
    let envelope = geom.envelope();
    match stored_envelope {
        Some((min_x, min_y, max_x, max_y)) => {
            if envelope.is_empty()
                || envelope.x_min != min_x
                || envelope.y_min != min_y
                || envelope.x_max != max_x
                || envelope.y_max != max_y
            {
                return Err(CodecError::EnvelopeMismatch);
            }
        }
        None => {
            if marker == EMPTY_GEOMETRY && !geom.is_empty() {
                return Err(CodecError::EnvelopeMismatch);
            }
        }
    }
    Ok(geom)
}

pub fn write_blob(geom: &Geometry) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    out.write_u8(HEADER)?;
    out.write_u32::<LittleEndian>(geom.srid())?;
    let envelope = geom.envelope();
    if envelope.is_empty() {
        out.write_u8(EMPTY_GEOMETRY)?;
    } else {
        out.write_u8(ENVELOPE)?;
        out.write_f64::<LittleEndian>(envelope.x_min)?;
        out.write_f64::<LittleEndian>(envelope.y_min)?;
        out.write_f64::<LittleEndian>(envelope.x_max)?;
        out.write_f64::<LittleEndian>(envelope.y_max)?;
    }
    write_shape(&mut out, geom.shape())?;
    out.write_u8(TERMINATOR)?;
    Ok(out)
}

fn read_shape(reader: &mut &[u8], srid: u32) -> Result<Shape, CodecError> {
    let code = reader.read_u32::<LittleEndian>()?;
    match code {
        wkb::POINT => {
            let coord = read_coord(reader)?;
            if coord.x.is_nan() && coord.y.is_nan() {
                Ok(Shape::Point(None))
            } else {
                Ok(Shape::Point(Some(coord)))
            }
        }
        wkb::LINESTRING => Ok(Shape::LineString(read_coord_seq(reader)?)),
        wkb::POLYGON => Ok(Shape::Polygon(read_polygon_rings(reader)?)),
        wkb::MULTIPOINT => {
            let count = reader.read_u32::<LittleEndian>()? as usize;
            let mut coords = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                match read_shape(reader, srid)? {
                    Shape::Point(Some(c)) => coords.push(c),
                    _ => return Err(CodecError::UnexpectedMemberType),
                }
            }
            Ok(Shape::MultiPoint(coords))
        }
        wkb::MULTILINESTRING => {
            let count = reader.read_u32::<LittleEndian>()? as usize;
            let mut lines = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                match read_shape(reader, srid)? {
                    Shape::LineString(coords) => lines.push(coords),
                    _ => return Err(CodecError::UnexpectedMemberType),
                }
            }
            Ok(Shape::MultiLineString(lines))
        }
        wkb::MULTIPOLYGON => {
            let count = reader.read_u32::<LittleEndian>()? as usize;
            let mut polygons = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                match read_shape(reader, srid)? {
                    Shape::Polygon(polygon) => polygons.push(polygon),
                    _ => return Err(CodecError::UnexpectedMemberType),
                }
            }
            Ok(Shape::MultiPolygon(polygons))
        }
        wkb::GEOMETRYCOLLECTION => {
            let count = reader.read_u32::<LittleEndian>()? as usize;
            let mut members = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                let shape = read_shape(reader, srid)?;
                // Members inherit the enclosing blob's SRID.
                members.push(Geometry::new(shape, srid)?);
            }
            Ok(Shape::GeometryCollection(members))
        }
        unknown => Err(CodecError::UnknownTypeCode(unknown)),
    }
}

fn read_polygon_rings(reader: &mut &[u8]) -> Result<Polygon, CodecError> {
    let ring_count = reader.read_u32::<LittleEndian>()? as usize;
    let mut rings = Vec::with_capacity(ring_count.min(1024));
    for _ in 0..ring_count {
        rings.push(read_coord_seq(reader)?);
    }
    let shell = if rings.is_empty() {
        Vec::new()
    } else {
        rings.remove(0)
    };
    Ok(Polygon {
        shell,
        holes: rings,
    })
}

fn read_coord_seq(reader: &mut &[u8]) -> Result<Vec<Coordinate>, CodecError> {
    let count = reader.read_u32::<LittleEndian>()? as usize;
    let mut coords = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        coords.push(read_coord(reader)?);
    }
    Ok(coords)
}

fn read_coord(reader: &mut impl Read) -> Result<Coordinate, CodecError> {
    let x = reader.read_f64::<LittleEndian>()?;
    let y = reader.read_f64::<LittleEndian>()?;
    Ok(Coordinate::new(x, y))
}

fn write_shape(out: &mut Vec<u8>, shape: &Shape) -> Result<(), CodecError> {
    out.write_u32::<LittleEndian>(wkb::shape_code(shape))?;
    match shape {
        Shape::Point(coord) => {
            let c = coord.unwrap_or_else(|| Coordinate::new(f64::NAN, f64::NAN));
            write_coord(out, c)?;
        }
        Shape::LineString(coords) => write_coord_seq(out, coords)?,
        Shape::Polygon(polygon) => write_polygon_rings(out, polygon)?,
        Shape::MultiPoint(coords) => {
            out.write_u32::<LittleEndian>(coords.len() as u32)?;
            for &c in coords {
                write_shape(out, &Shape::Point(Some(c)))?;
            }
        }
        Shape::MultiLineString(lines) => {
            out.write_u32::<LittleEndian>(lines.len() as u32)?;
            for line in lines {
                write_shape(out, &Shape::LineString(line.clone()))?;
            }
        }
        Shape::MultiPolygon(polygons) => {
            out.write_u32::<LittleEndian>(polygons.len() as u32)?;
            for polygon in polygons {
                write_shape(out, &Shape::Polygon(polygon.clone()))?;
            }
        }
        Shape::GeometryCollection(members) => {
            out.write_u32::<LittleEndian>(members.len() as u32)?;
            for member in members {
                write_shape(out, member.shape())?;
            }
        }
    }
    Ok(())
}

fn write_polygon_rings(out: &mut Vec<u8>, polygon: &Polygon) -> Result<(), CodecError> {
    if polygon.shell.is_empty() {
        out.write_u32::<LittleEndian>(0)?;
        return Ok(());
    }
    out.write_u32::<LittleEndian>(1 + polygon.holes.len() as u32)?;
    for ring in polygon.rings() {
        out.write_u32::<LittleEndian>(ring.len() as u32)?;
        for &c in ring {
            write_coord(out, c)?;
        }
    }
    Ok(())
}

fn write_coord_seq(out: &mut Vec<u8>, coords: &[Coordinate]) -> Result<(), CodecError> {
    out.write_u32::<LittleEndian>(coords.len() as u32)?;
    for &c in coords {
        write_coord(out, c)?;
    }
    Ok(())
}

fn write_coord(out: &mut Vec<u8>, coord: Coordinate) -> Result<(), CodecError> {
    out.write_f64::<LittleEndian>(coord.x)?;
    out.write_f64::<LittleEndian>(coord.y)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wkt::parse_wkt;

    fn to_hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    fn from_hex(hex: &str) -> Vec<u8> {
        (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
            .collect()
    }

    fn round_trip(wkt_str: &str, srid: u32) {
        let geom = parse_wkt(wkt_str).unwrap().with_srid(srid);
        let bytes = write_blob(&geom).unwrap();
        assert_eq!(read_blob(&bytes).unwrap(), geom, "{}", wkt_str);
    }

    #[test]
    fn test_point_blob_bytes() {
        let geom = parse_wkt("POINT(1 2)").unwrap().with_srid(4326);
        let bytes = write_blob(&geom).unwrap();
        assert_eq!(
            to_hex(&bytes),
            concat!(
                "00",
                "e6100000",
                "01",
                "000000000000f03f",
                "0000000000000040",
                "000000000000f03f",
                "0000000000000040",
                "01000000",
                "000000000000f03f",
                "0000000000000040",
                "fe",
            )
        );
    }

    #[test]
    fn test_round_trips() {
        round_trip("POINT(-88.5945861592357 42.9480095987261)", 4326);
        round_trip("LINESTRING(0 0, 1 1, 2 0)", 0);
        round_trip("LINESTRING EMPTY", 4326);
        round_trip(
            "POLYGON((-5 -5, -5 5, 5 5, 5 -5, -5 -5),(0 0, 3 0, 3 3, 0 3, 0 0))",
            2249,
        );
        round_trip("MULTIPOINT((2 3), (7 8))", 4326);
        round_trip("MULTILINESTRING((1 1, 5 5), (1 3, 3 1))", 0);
        round_trip(
            "MULTIPOLYGON(((1 1, 1 -1, -1 -1, -1 1, 1 1)),((1 1, 3 1, 3 3, 1 3, 1 1)))",
            4326,
        );
        round_trip("GEOMETRYCOLLECTION(POINT(1 2), LINESTRING(0 0, 1 1))", 0);

        let empty_collection = Geometry::collection(Vec::new()).with_srid(4326);
        let bytes = write_blob(&empty_collection).unwrap();
        assert_eq!(read_blob(&bytes).unwrap(), empty_collection);
    }

    #[test]
    fn test_collection_round_trip_keeps_member_srid() {
        let collection = Geometry::collection(vec![Geometry::point((1., 2.).into())])
            .with_srid(4326);
        let bytes = write_blob(&collection).unwrap();
        let decoded = read_blob(&bytes).unwrap();
        assert_eq!(decoded, collection);
        if let crate::Shape::GeometryCollection(members) = decoded.shape() {
            assert_eq!(members[0].srid(), 4326);
        } else {
            panic!("expected collection");
        }
    }

    #[test]
    fn test_empty_geometry_marker() {
        let bytes = write_blob(&Geometry::empty_point().with_srid(4326)).unwrap();
        // Header, SRID, sentinel, then type and payload with no envelope.
        assert_eq!(bytes[5], 0xFF);
        assert_eq!(read_blob(&bytes).unwrap(), Geometry::empty_point().with_srid(4326));
    }

    #[test]
    fn test_missing_envelope_accepted() {
        let bytes = from_hex(concat!(
            "00",
            "e6100000",
            "00",
            "01000000",
            "000000000000f03f",
            "0000000000000040",
            "fe",
        ));
        let geom = read_blob(&bytes).unwrap();
        assert_eq!(geom, parse_wkt("POINT(1 2)").unwrap().with_srid(4326));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(read_blob(&[]), Err(CodecError::Truncated));
        assert_eq!(read_blob(&from_hex("17")), Err(CodecError::BadHeader(0x17)));
        assert_eq!(
            read_blob(&from_hex("00e61000000a")),
            Err(CodecError::BadEnvelopeMarker(0x0a))
        );

        let good = write_blob(&parse_wkt("POINT(1 2)").unwrap()).unwrap();

        let mut no_terminator = good.clone();
        no_terminator.pop();
        assert_eq!(read_blob(&no_terminator), Err(CodecError::MissingTerminator));

        let mut trailing = good.clone();
        trailing.push(0);
        assert_eq!(read_blob(&trailing), Err(CodecError::TrailingBytes));

        // Stored envelope disagreeing with the coordinates.
        let mut bad_envelope = good;
        bad_envelope[6] = 0x99;
        assert_eq!(read_blob(&bad_envelope), Err(CodecError::EnvelopeMismatch));
    }
}
