//! Location track files.
//!
//! One sample per line: `latitude,longitude,seconds`, where `seconds` is the
//! time elapsed since the previous sample. Blank lines and lines starting
//! with `#` are skipped.

use std::fs;
use std::path::Path;
use std::time::Duration;

use geowatch::geo::Coordinate;

use crate::error::CliError;

/// One recorded position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub location: Coordinate,
    /// Time since the previous sample.
    pub elapsed: Duration,
}

/// Read and parse a track file.
pub fn load_track(path: &Path) -> Result<Vec<TrackPoint>, CliError> {
    let content = fs::read_to_string(path).map_err(|error| CliError::TrackRead {
        path: path.to_path_buf(),
        error,
    })?;

    parse_track(&content).map_err(|(line, reason)| CliError::TrackParse {
        path: path.to_path_buf(),
        line,
        reason,
    })
}

/// Parse track text, reporting the 1-based line number of the first bad line.
pub fn parse_track(content: &str) -> Result<Vec<TrackPoint>, (usize, String)> {
    let mut points = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let point = parse_line(line).map_err(|reason| (index + 1, reason))?;
        points.push(point);
    }

    Ok(points)
}

fn parse_line(line: &str) -> Result<TrackPoint, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [lat, lon, secs] = fields.as_slice() else {
        return Err(format!(
            "expected 'latitude,longitude,seconds', found {} field(s)",
            fields.len()
        ));
    };

    let latitude: f64 = lat
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat))?;
    let longitude: f64 = lon
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lon))?;
    let seconds: f64 = secs
        .parse()
        .map_err(|_| format!("invalid seconds '{}'", secs))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("seconds must be non-negative, found '{}'", secs));
    }

    let elapsed = Duration::try_from_secs_f64(seconds)
        .map_err(|e| format!("invalid seconds '{}': {}", secs, e))?;

    let location = Coordinate::try_new(latitude, longitude).map_err(|e| e.to_string())?;
    Ok(TrackPoint { location, elapsed })
}
