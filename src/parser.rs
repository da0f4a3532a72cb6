use chrono::{DateTime, Utc};
use log::{debug, warn};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, TrackError};
use crate::gpx_types::TrackPoint;

/// Raw output of the XML stage: points in document order, distances not yet computed.
#[derive(Debug, Default)]
pub struct ParsedTrack {
    pub name: Option<String>,
    pub points: Vec<TrackPoint>,
}

/// Parse a GPX XML string, concatenating the points of every `<trkseg>` of
/// every `<trk>` in document order.
///
/// Coordinates are checked for presence and numeric form here; range checks
/// happen in [`analyze`](crate::analyzer::analyze).
pub fn parse_gpx(xml: &str) -> Result<ParsedTrack> {
    let mut reader = Reader::from_str(xml);
    let mut track = ParsedTrack::default();
    let mut seen_root = false;
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if depth == 0 {
                    check_root(e.local_name().as_ref(), seen_root)?;
                    seen_root = true;
                }
                match e.local_name().as_ref() {
                    b"trk" if depth > 0 => parse_track(&mut reader, &mut track)?,
                    _ => depth += 1,
                }
            }
            Event::Empty(e) if depth == 0 => {
                check_root(e.local_name().as_ref(), seen_root)?;
                seen_root = true;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(TrackError::UnexpectedEof("gpx"));
    }
    if !seen_root {
        return Err(TrackError::MissingRoot);
    }

    Ok(track)
}

/// Exactly one top-level element, and it must be `<gpx>`.
fn check_root(name: &[u8], seen_root: bool) -> Result<()> {
    if seen_root {
        Err(TrackError::ContentAfterRoot)
    } else if name != b"gpx" {
        Err(TrackError::MissingRoot)
    } else {
        Ok(())
    }
}

/// Parse a `<trk>` element. Only the first track name is kept.
fn parse_track<'a>(reader: &mut Reader<&'a [u8]>, track: &mut ParsedTrack) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"name" => {
                    let name = read_text_owned(reader, &e)?;
                    if track.name.is_none() && !name.trim().is_empty() {
                        track.name = Some(name.trim().to_string());
                    }
                }
                b"trkseg" => parse_segment(reader, &mut track.points)?,
                _ => skip_element(reader, &e)?,
            },
            Event::End(e) if e.local_name().as_ref() == b"trk" => break,
            Event::Eof => return Err(TrackError::UnexpectedEof("trk")),
            _ => {}
        }
    }

    Ok(())
}

/// Parse a `<trkseg>` element, appending its points.
fn parse_segment<'a>(reader: &mut Reader<&'a [u8]>, points: &mut Vec<TrackPoint>) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"trkpt" => {
                    let pt = parse_point(&e, reader, points.len())?;
                    points.push(pt);
                }
                _ => skip_element(reader, &e)?,
            },
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"trkpt" {
                    let (lat, lon) = parse_lat_lon(&e, points.len())?;
                    points.push(TrackPoint::new(lat, lon));
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"trkseg" => break,
            Event::Eof => return Err(TrackError::UnexpectedEof("trkseg")),
            _ => {}
        }
    }

    Ok(())
}

/// Parse lat/lon attributes from a `<trkpt>` start tag.
fn parse_lat_lon(e: &BytesStart<'_>, index: usize) -> Result<(f64, f64)> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr_result in e.attributes() {
        let attr = attr_result?;
        let attribute = match attr.key.local_name().as_ref() {
            b"lat" => "lat",
            b"lon" => "lon",
            _ => continue,
        };
        let val = std::str::from_utf8(&attr.value)?.trim();
        let parsed = val
            .parse::<f64>()
            .map_err(|_| TrackError::InvalidCoordinate {
                index,
                attribute,
                value: val.to_string(),
            })?;
        if attribute == "lat" {
            lat = Some(parsed);
        } else {
            lon = Some(parsed);
        }
    }

    let lat = lat.ok_or(TrackError::MissingCoordinate {
        index,
        attribute: "lat",
    })?;
    let lon = lon.ok_or(TrackError::MissingCoordinate {
        index,
        attribute: "lon",
    })?;

    Ok((lat, lon))
}

/// Parse a `<trkpt>` and its children. Called after `Event::Start` for the point.
fn parse_point<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
    index: usize,
) -> Result<TrackPoint> {
    let (lat, lon) = parse_lat_lon(start, index)?;
    let mut point = TrackPoint::new(lat, lon);

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"ele" => {
                    let text = read_text_owned(reader, &e)?;
                    point.elevation = parse_elevation(&text);
                    if point.elevation.is_none() {
                        warn!("track point {index}: ignoring unusable elevation '{text}'");
                    }
                }
                b"time" => {
                    let text = read_text_owned(reader, &e)?;
                    point.timestamp = parse_time(&text);
                    if point.timestamp.is_none() {
                        debug!("track point {index}: ignoring unparseable time '{text}'");
                    }
                }
                // extensions, hr, cadence, GPX 1.0 speed/course...
                _ => skip_element(reader, &e)?,
            },
            Event::End(e) if e.local_name().as_ref() == b"trkpt" => break,
            Event::Eof => return Err(TrackError::UnexpectedEof("trkpt")),
            _ => {}
        }
    }

    Ok(point)
}

fn parse_elevation(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn skip_element(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<()> {
    reader.read_to_end(start.name())?;
    Ok(())
}

/// Read text content of an element as an owned String.
/// Handles regular text, CDATA sections, and entity references.
fn read_text_owned<'a>(reader: &mut Reader<&'a [u8]>, start: &BytesStart<'_>) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Text(e) => text.push_str(std::str::from_utf8(e.as_ref())?),
            Event::CData(e) => text.push_str(std::str::from_utf8(e.as_ref())?),
            Event::GeneralRef(e) => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    match std::str::from_utf8(e.as_ref())? {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        _ => {}
                    }
                }
            }
            Event::End(e) if e.name().0 == end_name.as_slice() => break,
            Event::Eof => return Err(TrackError::UnexpectedEof("text element")),
            _ => {}
        }
    }

    Ok(text)
}
