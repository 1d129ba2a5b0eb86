//! Packaged map resource naming
//!
//! A **packaged map resource** is a gzip-compressed map shipped with the
//! application. Its version is embedded in the file name:
//!
//! - `gzipped-taiwan-taco-2016053101.map` -> version `2016053101`
//!
//! Names are parsed into a typed [`ResourceName`] instead of being sliced at
//! fixed offsets, so malformed names are rejected rather than misread.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TacoError, resource as resource_error};

/// Name prefix shared by every packaged map resource
pub const RESOURCE_PREFIX: &str = "gzipped-taiwan-taco-";

/// Name suffix shared by every packaged map resource
pub const RESOURCE_SUFFIX: &str = ".map";

/// Number of zero-padded digits in an embedded version
pub const VERSION_DIGITS: usize = 10;

/// Version of a map dataset, as embedded in a resource name
///
/// `MapVersion::NONE` (0) stands for "nothing installed yet".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MapVersion(u64);

impl MapVersion {
    /// Version recorded when no map has ever been installed
    pub const NONE: MapVersion = MapVersion(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl From<u64> for MapVersion {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for MapVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = VERSION_DIGITS)
    }
}

/// A validated packaged map resource name with its embedded version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceName {
    name: String,
    version: MapVersion,
}

impl ResourceName {
    /// Parse a resource name, returning `None` if it does not follow the
    /// `gzipped-taiwan-taco-<10 digits>.map` convention
    pub fn parse(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// Build the canonical resource name for a version
    pub fn for_version(version: MapVersion) -> Self {
        Self {
            name: format!("{RESOURCE_PREFIX}{version}{RESOURCE_SUFFIX}"),
            version,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> MapVersion {
        self.version
    }
}

impl FromStr for ResourceName {
    type Err = TacoError;

    fn from_str(name: &str) -> Result<Self> {
        let digits = name
            .strip_prefix(RESOURCE_PREFIX)
            .and_then(|rest| rest.strip_suffix(RESOURCE_SUFFIX))
            .filter(|digits| {
                digits.len() == VERSION_DIGITS && digits.bytes().all(|b| b.is_ascii_digit())
            })
            .ok_or_else(|| resource_error::invalid_name(name))?;

        let value = digits
            .parse::<u64>()
            .map_err(|_| resource_error::invalid_name(name))?;

        Ok(Self {
            name: name.to_string(),
            version: MapVersion(value),
        })
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Select the packaged map resource to install from a listing
///
/// Names that do not follow the naming convention are ignored. When several
/// resources match, the one with the highest embedded version wins, so the
/// result does not depend on listing order.
pub fn select_resource<S: AsRef<str>>(names: &[S]) -> Result<ResourceName> {
    names
        .iter()
        .filter_map(|name| ResourceName::parse(name.as_ref()))
        .max_by_key(ResourceName::version)
        .ok_or_else(|| resource_error::not_found(names.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_name() {
        let name = ResourceName::parse("gzipped-taiwan-taco-2016053101.map").unwrap();
        assert_eq!(name.version(), MapVersion::new(2_016_053_101));
        assert_eq!(name.as_str(), "gzipped-taiwan-taco-2016053101.map");
    }

    #[test]
    fn test_parse_zero_padded_version() {
        let name = ResourceName::parse("gzipped-taiwan-taco-0000000007.map").unwrap();
        assert_eq!(name.version().get(), 7);
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        for bad in [
            "random.map",
            "gzipped-taiwan-taco-.map",
            "gzipped-taiwan-taco-123.map",
            "gzipped-taiwan-taco-00000000001.map",
            "gzipped-taiwan-taco-20160531ab.map",
            "gzipped-taiwan-taco-2016053101.map.gz",
            "taiwan-taco.map",
            "gzipped-taiwan-taco-+016053101.map",
        ] {
            assert!(ResourceName::parse(bad).is_none(), "accepted {bad}");
        }
    }

    #[test]
    fn test_from_str_reports_invalid_name() {
        let err = "random.map".parse::<ResourceName>().unwrap_err();
        assert!(matches!(err, TacoError::InvalidResourceName { name } if name == "random.map"));
    }

    #[test]
    fn test_for_version_round_trips() {
        let name = ResourceName::for_version(MapVersion::new(42));
        assert_eq!(name.as_str(), "gzipped-taiwan-taco-0000000042.map");
        assert_eq!(ResourceName::parse(name.as_str()), Some(name));
    }

    #[test]
    fn test_version_display_is_zero_padded() {
        assert_eq!(MapVersion::new(3).to_string(), "0000000003");
        assert_eq!(MapVersion::NONE.to_string(), "0000000000");
        assert!(MapVersion::NONE.is_none());
    }

    #[test]
    fn test_select_resource_skips_unrelated_names() {
        let names = ["README.txt", "gzipped-taiwan-taco-0000000005.map", "render.xml"];
        let selected = select_resource(&names).unwrap();
        assert_eq!(selected.version().get(), 5);
    }

    #[test]
    fn test_select_resource_prefers_highest_version() {
        let names = [
            "gzipped-taiwan-taco-0000000009.map",
            "gzipped-taiwan-taco-0000000012.map",
            "gzipped-taiwan-taco-0000000010.map",
        ];
        assert_eq!(select_resource(&names).unwrap().version().get(), 12);
    }

    #[test]
    fn test_select_resource_not_found() {
        let err = select_resource(&["random.map"]).unwrap_err();
        assert!(matches!(err, TacoError::ResourceNotFound { available: 1 }));

        let empty: [&str; 0] = [];
        assert!(matches!(
            select_resource(&empty).unwrap_err(),
            TacoError::ResourceNotFound { available: 0 }
        ));
    }
}
