use quick_xml::events::attributes::AttrError;
use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, TrackError>;

/// Errors produced while turning GPX content into a [`GpxData`](crate::gpx_types::GpxData).
///
/// Every variant belongs to one of two families, see [`ErrorKind`].
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),
    #[error("content is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("document has no <gpx> root element")]
    MissingRoot,
    #[error("content after the <gpx> root element")]
    ContentAfterRoot,
    #[error("unexpected end of document inside <{0}>")]
    UnexpectedEof(&'static str),
    #[error("track contains no points")]
    EmptyTrack,
    #[error("track point {index}: missing attribute '{attribute}'")]
    MissingCoordinate {
        index: usize,
        attribute: &'static str,
    },
    #[error("track point {index}: invalid value '{value}' for attribute '{attribute}'")]
    InvalidCoordinate {
        index: usize,
        attribute: &'static str,
        value: String,
    },
    #[error("track point {index}: {attribute} {value} is outside [{min}, {max}]")]
    CoordinateOutOfRange {
        index: usize,
        attribute: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl From<AttrError> for TrackError {
    fn from(e: AttrError) -> Self {
        Self::XmlParse(e.into())
    }
}

/// The two failure families callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unparseable content or a track without points.
    MalformedTrack,
    /// A point with missing or out-of-range coordinates.
    InvalidCoordinate,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::MalformedTrack => "MalformedTrackError",
            Self::InvalidCoordinate => "InvalidCoordinateError",
        }
    }
}

impl TrackError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::XmlParse(_)
            | Self::Utf8(_)
            | Self::MissingRoot
            | Self::ContentAfterRoot
            | Self::UnexpectedEof(_)
            | Self::EmptyTrack => ErrorKind::MalformedTrack,
            Self::MissingCoordinate { .. }
            | Self::InvalidCoordinate { .. }
            | Self::CoordinateOutOfRange { .. } => ErrorKind::InvalidCoordinate,
        }
    }
}

impl From<TrackError> for JsValue {
    fn from(e: TrackError) -> Self {
        let err = js_sys::Error::new(&e.to_string());
        err.set_name(e.kind().name());
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(TrackError::EmptyTrack.kind(), ErrorKind::MalformedTrack);
        assert_eq!(TrackError::MissingRoot.kind(), ErrorKind::MalformedTrack);
        let err = TrackError::MissingCoordinate {
            index: 3,
            attribute: "lat",
        };
        assert_eq!(err.kind(), ErrorKind::InvalidCoordinate);
        assert_eq!(err.kind().name(), "InvalidCoordinateError");
    }

    #[test]
    fn test_display() {
        let err = TrackError::CoordinateOutOfRange {
            index: 0,
            attribute: "lat",
            value: 91.0,
            min: -90.0,
            max: 90.0,
        };
        assert_eq!(err.to_string(), "track point 0: lat 91 is outside [-90, 90]");
    }
}
