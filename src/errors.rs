use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum GeometryError {
    #[error("LineString has a single coordinate")]
    SingleCoordinate,

    #[error("Ring has {0} coordinates; a closed ring needs at least 4")]
    ShortRing(usize),

    #[error("Ring is not closed: first and last coordinates differ")]
    UnclosedRing,
}

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Invalid WKT: {0}")]
    InvalidWkt(String),

    #[error("Expected a single geometry, found {0}")]
    NotOneGeometry(usize),

    #[error(transparent)]
    Structure(#[from] GeometryError),
}

#[derive(Error, Debug, PartialEq)]
pub enum CodecError {
    #[error("Unexpected end of input")]
    Truncated,

    #[error("Trailing bytes after geometry payload")]
    TrailingBytes,

    #[error("Unknown geometry type code {0}")]
    UnknownTypeCode(u32),

    #[error("Unknown byte-order flag {0:#04x}")]
    UnknownByteOrder(u8),

    #[error("Bad header byte {0:#04x}")]
    BadHeader(u8),

    #[error("Bad envelope marker {0:#04x}")]
    BadEnvelopeMarker(u8),

    #[error("Missing terminator byte")]
    MissingTerminator,

    #[error("Stored envelope does not match the geometry's bounding box")]
    EnvelopeMismatch,

    #[error("Collection member has an unexpected geometry type")]
    UnexpectedMemberType,

    #[error(transparent)]
    Structure(#[from] GeometryError),
}

impl From<std::io::Error> for CodecError {
    fn from(_: std::io::Error) -> Self {
        CodecError::Truncated
    }
}
