//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::str::FromStr;
use std::time::Duration;

use ini::{Ini, Properties};

use super::engine::EngineConfig;
use super::file::{ConfigFile, ConfigFileError};
use crate::geo::Coordinate;
use crate::region::Region;

const MONITORING_SECTION: &str = "monitoring";
const REGION_SECTION_PREFIX: &str = "region.";

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from defaults and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut engine = EngineConfig::default();

    // [monitoring] section
    if let Some(section) = ini.section(Some(MONITORING_SECTION)) {
        if let Some(v) = section.get("capacity") {
            engine.capacity = parse_number(MONITORING_SECTION, "capacity", v)?;
        }
        if let Some(v) = section.get("min_radius") {
            engine.expansion.min_radius_m = parse_number(MONITORING_SECTION, "min_radius", v)?;
        }
        if let Some(v) = section.get("max_radius") {
            engine.expansion.max_radius_m = parse_number(MONITORING_SECTION, "max_radius", v)?;
        }
        if let Some(v) = section.get("default_min_dwell") {
            engine.default_min_dwell =
                parse_duration(v).ok_or_else(|| invalid_duration(MONITORING_SECTION, "default_min_dwell", v))?;
        }
    }
    engine.validate()?;

    // [region.<identifier>] sections, in file order
    let mut regions = Vec::new();
    for (name, properties) in ini.iter() {
        let Some(identifier) = name.and_then(|n| n.strip_prefix(REGION_SECTION_PREFIX)) else {
            continue;
        };
        let section = name.unwrap_or_default();
        regions.push(parse_region(section, identifier.trim(), properties)?);
    }

    Ok(ConfigFile { engine, regions })
}

fn parse_region(
    section: &str,
    identifier: &str,
    properties: &Properties,
) -> Result<Region, ConfigFileError> {
    let latitude: f64 = parse_number(section, "latitude", require(section, properties, "latitude")?)?;
    let longitude: f64 =
        parse_number(section, "longitude", require(section, properties, "longitude")?)?;
    let radius: f64 = parse_number(section, "radius", require(section, properties, "radius")?)?;

    let center = Coordinate::try_new(latitude, longitude).map_err(|e| {
        ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: "latitude/longitude".to_string(),
            value: format!("{}, {}", latitude, longitude),
            reason: e.to_string(),
        }
    })?;

    let mut region = Region::new(identifier, center, radius);
    if let Some(v) = properties.get("min_dwell") {
        let dwell = parse_duration(v).ok_or_else(|| invalid_duration(section, "min_dwell", v))?;
        region = region.with_min_dwell(dwell);
    }
    Ok(region)
}

fn require<'a>(
    section: &str,
    properties: &'a Properties,
    key: &str,
) -> Result<&'a str, ConfigFileError> {
    properties
        .get(key)
        .ok_or_else(|| ConfigFileError::MissingValue {
            section: section.to_string(),
            key: key.to_string(),
        })
}

fn parse_number<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a number".to_string(),
        })
}

fn invalid_duration(section: &str, key: &str, value: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: "expected a duration like '500', '90s', '10m' or '1h'".to_string(),
    }
}

/// Parse a duration given in whole seconds with an optional `s`, `m` or `h` suffix.
pub(super) fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim().to_lowercase();
    let (digits, multiplier) = match value.chars().last()? {
        's' => (&value[..value.len() - 1], 1),
        'm' => (&value[..value.len() - 1], 60),
        'h' => (&value[..value.len() - 1], 3_600),
        _ => (value.as_str(), 1),
    };
    let amount: u64 = digits.trim().parse().ok()?;
    amount.checked_mul(multiplier).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        ConfigFile::from_ini_str(content)
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("500"), Some(Duration::from_secs(500)));
        assert_eq!(parse_duration("90s"), Some(Duration::from_secs(90)));
        assert_eq!(parse_duration("10m"), Some(Duration::from_secs(600)));
        assert_eq!(parse_duration(" 2H "), Some(Duration::from_secs(7_200)));
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("m"), None);
        assert_eq!(parse_duration("-5"), None);
        assert_eq!(parse_duration("soon"), None);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = parse("").unwrap();
        assert_eq!(config.engine, EngineConfig::default());
        assert!(config.regions.is_empty());
    }

    #[test]
    fn test_invalid_capacity() {
        let err = parse("[monitoring]\ncapacity = lots\n").unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { ref key, .. } if key == "capacity"));
    }

    #[test]
    fn test_capacity_above_platform_limit() {
        let err = parse("[monitoring]\ncapacity = 40\n").unwrap_err();
        assert!(matches!(err, ConfigFileError::Engine(_)));
    }

    #[test]
    fn test_inverted_radius_bounds() {
        let err = parse("[monitoring]\nmin_radius = 500\nmax_radius = 100\n").unwrap_err();
        assert!(err.to_string().contains("exceeds maximum radius"));
    }

    #[test]
    fn test_region_missing_radius() {
        let err = parse("[region.A]\nlatitude = 1\nlongitude = 2\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::MissingValue { ref section, ref key } if section == "region.A" && key == "radius"
        ));
    }

    #[test]
    fn test_region_invalid_center() {
        let err = parse("[region.A]\nlatitude = 95\nlongitude = 2\nradius = 10\n").unwrap_err();
        assert!(err.to_string().contains("Invalid latitude"));
    }

    #[test]
    fn test_region_invalid_dwell() {
        let err =
            parse("[region.A]\nlatitude = 1\nlongitude = 2\nradius = 10\nmin_dwell = later\n")
                .unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { ref key, .. } if key == "min_dwell"));
    }

    #[test]
    fn test_unrelated_sections_ignored() {
        let config = parse("[display]\ncolor = green\n[region.A]\nlatitude = 1\nlongitude = 2\nradius = 10\n")
            .unwrap();
        assert_eq!(config.regions.len(), 1);
        assert_eq!(config.regions[0].identifier(), "A");
    }

    #[test]
    fn test_duplicate_regions_rejected_by_catalog() {
        let config = parse(
            "[region.A]\nlatitude = 1\nlongitude = 2\nradius = 10\n\
             [region. A]\nlatitude = 1\nlongitude = 2\nradius = 10\n",
        )
        .unwrap();
        assert!(config.catalog().is_err());
    }
}
