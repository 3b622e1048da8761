//! FGF (FDO Geometry Format) encoding, little-endian.
//!
//! A simple geometry is a u32 type code, a u32 dimensionality flag, then its
//! counts and coordinates; every coordinate is written as an x/y/z triple
//! with z fixed to 0.  Multi-geometries and collections are a type code and
//! member count followed by full FGF members.  Write-only: nothing in the
//! library reads FGF back.

use byteorder::{LittleEndian, WriteBytesExt};

use crate::errors::CodecError;
use crate::wkb;
use crate::{Coordinate, Geometry, Polygon, Shape};

// Dimensionality bitmask with only the Z bit set.
const DIM_XYZ: u32 = 1;

pub fn write_fgf(geom: &Geometry) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    write_shape(&mut out, geom.shape())?;
    Ok(out)
}

fn write_shape(out: &mut Vec<u8>, shape: &Shape) -> Result<(), CodecError> {
    out.write_u32::<LittleEndian>(wkb::shape_code(shape))?;
    match shape {
        Shape::Point(coord) => {
            out.write_u32::<LittleEndian>(DIM_XYZ)?;
            let c = coord.unwrap_or_else(|| Coordinate::new(f64::NAN, f64::NAN));
            write_coord(out, c)?;
        }
        Shape::LineString(coords) => {
            out.write_u32::<LittleEndian>(DIM_XYZ)?;
            write_coord_seq(out, coords)?;
        }
        Shape::Polygon(polygon) => {
            out.write_u32::<LittleEndian>(DIM_XYZ)?;
            write_polygon_rings(out, polygon)?;
        }
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
        write_coord_seq(out, ring)?;
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
    out.write_f64::<LittleEndian>(0.)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wkt::parse_wkt;

    fn to_hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    #[test]
    fn test_reference_linestring_bytes() {
        let road = parse_wkt("LINESTRING(-88.6748409363057 43.1035032292994,-88.6464173694267 42.9981688343949,-88.607961955414 42.9680732929936,-88.5160033566879 42.9363057770701,-88.4390925286624 43.0031847579618)").unwrap();
        assert_eq!(
            to_hex(&write_fgf(&road).unwrap()),
            "020000000100000005000000d7db0998302b56c0876f04983f8d454000000000000000004250f5e65e2956c068ce11ffc37f45400000000000000000c8ed42d9e82656c0efc45ed3e97b454000000000000000007366f132062156c036c921ded8774540000000000000000078a18c171a1c56c053a5af5b688045400000000000000000"
        );
    }

    #[test]
    fn test_point_bytes() {
        let point = parse_wkt("POINT(1 2)").unwrap();
        assert_eq!(
            to_hex(&write_fgf(&point).unwrap()),
            concat!(
                "01000000",
                "01000000",
                "000000000000f03f",
                "0000000000000040",
                "0000000000000000",
            )
        );
    }

    #[test]
    fn test_polygon_ring_layout() {
        let polygon = parse_wkt("POLYGON((0 0, 1 0, 1 1, 0 0))").unwrap();
        let bytes = write_fgf(&polygon).unwrap();
        // Type, dimensionality, ring count, point count, 4 x/y/z triples.
        assert_eq!(bytes.len(), 4 + 4 + 4 + 4 + 4 * 24);
        assert_eq!(&bytes[..12], &[3, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0]);
    }
}
