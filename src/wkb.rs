//! ISO Well-Known Binary codec.
//!
//! A WKB value is a 1-byte byte-order flag (0 = big-endian, 1 =
//! little-endian), a u32 geometry type code, and a type-specific payload of
//! u32 counts and f64 coordinates.  Members of multi-geometries and
//! collections are full WKB values with their own byte-order flag.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Read;

use crate::errors::CodecError;
use crate::{Coordinate, Geometry, Polygon, Shape};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

const BIG_ENDIAN_FLAG: u8 = 0;
const LITTLE_ENDIAN_FLAG: u8 = 1;

pub(crate) const POINT: u32 = 1;
pub(crate) const LINESTRING: u32 = 2;
pub(crate) const POLYGON: u32 = 3;
pub(crate) const MULTIPOINT: u32 = 4;
pub(crate) const MULTILINESTRING: u32 = 5;
pub(crate) const MULTIPOLYGON: u32 = 6;
pub(crate) const GEOMETRYCOLLECTION: u32 = 7;

/// Decode a single WKB geometry, rejecting trailing bytes.  The result
/// carries SRID 0: plain WKB does not transport one.
pub fn read_wkb(bytes: &[u8]) -> Result<Geometry, CodecError> {
    let mut reader = bytes;
    let shape = read_shape(&mut reader)?;
    if !reader.is_empty() {
        return Err(CodecError::TrailingBytes);
    }
    Ok(Geometry::new(shape, 0)?)
}

pub fn write_wkb(geom: &Geometry, order: ByteOrder) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    write_shape(&mut out, geom.shape(), order)?;
    Ok(out)
}

fn read_shape(reader: &mut &[u8]) -> Result<Shape, CodecError> {
    let flag = reader.read_u8()?;
    let order = match flag {
        BIG_ENDIAN_FLAG => ByteOrder::BigEndian,
        LITTLE_ENDIAN_FLAG => ByteOrder::LittleEndian,
        unknown => return Err(CodecError::UnknownByteOrder(unknown)),
    };
    let code = read_u32(reader, order)?;
    match code {
        POINT => {
            let coord = read_coord(reader, order)?;
            if coord.x.is_nan() && coord.y.is_nan() {
                Ok(Shape::Point(None))
            } else {
                Ok(Shape::Point(Some(coord)))
            }
        }
        LINESTRING => Ok(Shape::LineString(read_coord_seq(reader, order)?)),
        POLYGON => Ok(Shape::Polygon(read_polygon_rings(reader, order)?)),
        MULTIPOINT => {
            let count = read_u32(reader, order)? as usize;
            let mut coords = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                match read_shape(reader)? {
                    Shape::Point(Some(c)) => coords.push(c),
                    _ => return Err(CodecError::UnexpectedMemberType),
                }
            }
            Ok(Shape::MultiPoint(coords))
        }
        MULTILINESTRING => {
            let count = read_u32(reader, order)? as usize;
            let mut lines = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                match read_shape(reader)? {
                    Shape::LineString(coords) => lines.push(coords),
                    _ => return Err(CodecError::UnexpectedMemberType),
                }
            }
            Ok(Shape::MultiLineString(lines))
        }
        MULTIPOLYGON => {
            let count = read_u32(reader, order)? as usize;
            let mut polygons = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                match read_shape(reader)? {
                    Shape::Polygon(polygon) => polygons.push(polygon),
                    _ => return Err(CodecError::UnexpectedMemberType),
                }
            }
            Ok(Shape::MultiPolygon(polygons))
        }
        GEOMETRYCOLLECTION => {
            let count = read_u32(reader, order)? as usize;
            let mut members = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                let shape = read_shape(reader)?;
                members.push(Geometry::new(shape, 0)?);
            }
            Ok(Shape::GeometryCollection(members))
        }
        unknown => Err(CodecError::UnknownTypeCode(unknown)),
    }
}

fn read_polygon_rings(reader: &mut &[u8], order: ByteOrder) -> Result<Polygon, CodecError> {
    let ring_count = read_u32(reader, order)? as usize;
    let mut rings = Vec::with_capacity(ring_count.min(1024));
    for _ in 0..ring_count {
        rings.push(read_coord_seq(reader, order)?);
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

fn read_coord_seq(
    reader: &mut &[u8],
    order: ByteOrder,
) -> Result<Vec<Coordinate>, CodecError> {
    let count = read_u32(reader, order)? as usize;
    let mut coords = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        coords.push(read_coord(reader, order)?);
    }
    Ok(coords)
}

fn read_coord(reader: &mut &[u8], order: ByteOrder) -> Result<Coordinate, CodecError> {
    let x = read_f64(reader, order)?;
    let y = read_f64(reader, order)?;
    Ok(Coordinate::new(x, y))
}

fn read_u32(reader: &mut impl Read, order: ByteOrder) -> Result<u32, CodecError> {
    Ok(match order {
        ByteOrder::BigEndian => reader.read_u32::<BigEndian>()?,
        ByteOrder::LittleEndian => reader.read_u32::<LittleEndian>()?,
    })
}

fn read_f64(reader: &mut impl Read, order: ByteOrder) -> Result<f64, CodecError> {
    Ok(match order {
        ByteOrder::BigEndian => reader.read_f64::<BigEndian>()?,
        ByteOrder::LittleEndian => reader.read_f64::<LittleEndian>()?,
    })
}

pub(crate) fn shape_code(shape: &Shape) -> u32 {
    match shape {
        Shape::Point(_) => POINT,
        Shape::LineString(_) => LINESTRING,
        Shape::Polygon(_) => POLYGON,
        Shape::MultiPoint(_) => MULTIPOINT,
        Shape::MultiLineString(_) => MULTILINESTRING,
        Shape::MultiPolygon(_) => MULTIPOLYGON,
        Shape::GeometryCollection(_) => GEOMETRYCOLLECTION,
    }
}

fn write_shape(out: &mut Vec<u8>, shape: &Shape, order: ByteOrder) -> Result<(), CodecError> {
    let flag = match order {
        ByteOrder::BigEndian => BIG_ENDIAN_FLAG,
        ByteOrder::LittleEndian => LITTLE_ENDIAN_FLAG,
    };
    out.write_u8(flag)?;
    write_u32(out, shape_code(shape), order)?;
    match shape {
        Shape::Point(coord) => {
            // WKB has no empty-point payload; NaN/NaN is the conventional
            // encoding and decodes back to the empty point.
            let c = coord.unwrap_or_else(|| Coordinate::new(f64::NAN, f64::NAN));
            write_coord(out, c, order)?;
        }
        Shape::LineString(coords) => write_coord_seq(out, coords, order)?,
        Shape::Polygon(polygon) => write_polygon_rings(out, polygon, order)?,
        Shape::MultiPoint(coords) => {
            write_u32(out, coords.len() as u32, order)?;
            for &c in coords {
                write_shape(out, &Shape::Point(Some(c)), order)?;
            }
        }
        Shape::MultiLineString(lines) => {
            write_u32(out, lines.len() as u32, order)?;
            for line in lines {
                write_shape(out, &Shape::LineString(line.clone()), order)?;
            }
        }
        Shape::MultiPolygon(polygons) => {
            write_u32(out, polygons.len() as u32, order)?;
            for polygon in polygons {
                write_shape(out, &Shape::Polygon(polygon.clone()), order)?;
            }
        }
        Shape::GeometryCollection(members) => {
            write_u32(out, members.len() as u32, order)?;
            for member in members {
                write_shape(out, member.shape(), order)?;
            }
        }
    }
    Ok(())
}

fn write_polygon_rings(
    out: &mut Vec<u8>,
    polygon: &Polygon,
    order: ByteOrder,
) -> Result<(), CodecError> {
    if polygon.shell.is_empty() {
        write_u32(out, 0, order)?;
        return Ok(());
    }
    write_u32(out, 1 + polygon.holes.len() as u32, order)?;
    for ring in polygon.rings() {
        write_u32(out, ring.len() as u32, order)?;
        for &c in ring {
            write_coord(out, c, order)?;
        }
    }
    Ok(())
}

fn write_coord_seq(
    out: &mut Vec<u8>,
    coords: &[Coordinate],
    order: ByteOrder,
) -> Result<(), CodecError> {
    write_u32(out, coords.len() as u32, order)?;
    for &c in coords {
        write_coord(out, c, order)?;
    }
    Ok(())
}

fn write_coord(out: &mut Vec<u8>, coord: Coordinate, order: ByteOrder) -> Result<(), CodecError> {
    write_f64(out, coord.x, order)?;
    write_f64(out, coord.y, order)
}

fn write_u32(out: &mut Vec<u8>, value: u32, order: ByteOrder) -> Result<(), CodecError> {
    match order {
        ByteOrder::BigEndian => out.write_u32::<BigEndian>(value)?,
        ByteOrder::LittleEndian => out.write_u32::<LittleEndian>(value)?,
    }
    Ok(())
}

fn write_f64(out: &mut Vec<u8>, value: f64, order: ByteOrder) -> Result<(), CodecError> {
    match order {
        ByteOrder::BigEndian => out.write_f64::<BigEndian>(value)?,
        ByteOrder::LittleEndian => out.write_f64::<LittleEndian>(value)?,
    }
    Ok(())
}
