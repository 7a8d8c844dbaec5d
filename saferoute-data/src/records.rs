//! Wire records for the surveillance dataset.
//!
//! The public CCTV dataset publishes Korean column names and is loose about
//! types: coordinates and camera counts arrive as numbers or as strings
//! depending on the export. Records are decoded leniently and converted to
//! [`FacilityPoint`]s one by one; unusable rows are skipped with a warning.

use geo::Coord;
use saferoute_core::{FacilityPoint, ProviderError, SurveillanceDetails};
use serde::Deserialize;
use serde_json::Value;

/// One row of the surveillance dataset.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SurveillanceRecord {
    /// Latitude in degrees.
    #[serde(rename = "위도", default)]
    pub latitude: Option<Value>,
    /// Longitude in degrees.
    #[serde(rename = "경도", default)]
    pub longitude: Option<Value>,
    /// Road-name address of the installation.
    #[serde(rename = "소재지도로명주소", default)]
    pub address: Option<String>,
    /// Declared installation purpose.
    #[serde(rename = "설치목적구분", default)]
    pub purpose: Option<String>,
    /// Number of cameras.
    #[serde(rename = "카메라대수", default)]
    pub camera_count: Option<Value>,
}

/// One page of the surveillance dataset API.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveillancePage {
    /// Rows on this page. A missing array means the payload is malformed.
    #[serde(default)]
    pub data: Option<Vec<SurveillanceRecord>>,
    /// Total rows across all pages, when reported.
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl SurveillancePage {
    /// Take the rows, failing when the page has no `data` array.
    ///
    /// # Errors
    /// Returns [`ProviderError::Parse`] when `data` is absent.
    pub fn into_records(self) -> Result<Vec<SurveillanceRecord>, ProviderError> {
        self.data.ok_or_else(|| ProviderError::Parse {
            message: "surveillance payload has no data array".to_owned(),
        })
    }
}

impl SurveillanceRecord {
    /// Convert the row into a facility, or `None` when its location is
    /// missing or invalid.
    #[must_use]
    pub fn into_facility(self) -> Option<FacilityPoint> {
        let latitude = self.latitude.as_ref().and_then(coerce_f64)?;
        let longitude = self.longitude.as_ref().and_then(coerce_f64)?;
        let details = SurveillanceDetails {
            address: self.address.filter(|value| !value.trim().is_empty()),
            purpose: self.purpose.filter(|value| !value.trim().is_empty()),
            camera_count: camera_count(self.camera_count.as_ref()),
        };
        FacilityPoint::surveillance(
            Coord {
                x: longitude,
                y: latitude,
            },
            details,
        )
        .ok()
    }
}

/// Convert rows into facilities, logging and skipping unusable ones.
#[must_use]
pub fn collect_surveillance(records: Vec<SurveillanceRecord>) -> Vec<FacilityPoint> {
    let total = records.len();
    let points: Vec<_> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let point = record.into_facility();
            if point.is_none() {
                log::warn!("skipping surveillance record {index}: missing or invalid location");
            }
            point
        })
        .collect();
    if points.len() < total {
        log::warn!(
            "kept {} of {total} surveillance records",
            points.len()
        );
    }
    points
}

/// Read a number that may be encoded as a JSON number or a decimal string.
fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed: Option<f64> = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|number| number.is_finite())
}

/// Camera count, defaulting to one when absent, zero or unreadable.
///
/// String values are read up to the first non-digit, so `"3대"` counts as 3.
fn camera_count(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(text)) => leading_integer(text),
        _ => None,
    };
    parsed.filter(|count| *count > 0).unwrap_or(1)
}

fn leading_integer(text: &str) -> Option<u32> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
