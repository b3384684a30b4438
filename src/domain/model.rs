use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// 上游欄位可能是 `null` 或型別不符，一律視為預設值
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

/// 型別不符的欄位當作缺值，不讓整份公報解析失敗
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            tracing::debug!("Ignoring malformed field: {}", e);
            Ok(None)
        }
    }
}

/// Keeps the string entries of an array; anything else in it is dropped.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// GeoJSON bulletin collection as returned by the bulletin service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulletinPayload {
    #[serde(default, deserialize_with = "nullable")]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, deserialize_with = "nullable")]
    pub properties: Bulletin,
}

/// One bulletin, valid for the regions it lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bulletin {
    #[serde(default, deserialize_with = "nullable")]
    pub regions: Vec<RegionRef>,
    #[serde(rename = "dangerRatings", default, deserialize_with = "nullable")]
    pub danger_ratings: Vec<DangerRating>,
    #[serde(rename = "avalancheProblems", default, deserialize_with = "nullable")]
    pub avalanche_problems: Vec<AvalancheProblem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionRef {
    #[serde(rename = "regionID", default, deserialize_with = "lenient")]
    pub region_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DangerRating {
    #[serde(rename = "mainValue", default, deserialize_with = "lenient")]
    pub main_value: Option<String>,
    #[serde(rename = "customData", default, deserialize_with = "lenient")]
    pub custom_data: Option<CustomData>,
}

impl DangerRating {
    pub fn subdivision(&self) -> Option<&str> {
        self.custom_data
            .as_ref()?
            .ch
            .as_ref()?
            .subdivision
            .as_deref()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomData {
    #[serde(rename = "CH", default, deserialize_with = "lenient")]
    pub ch: Option<RegionalData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionalData {
    #[serde(default, deserialize_with = "lenient")]
    pub subdivision: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvalancheProblem {
    #[serde(rename = "problemType", default, deserialize_with = "lenient")]
    pub problem_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub elevation: Option<ElevationRange>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub aspects: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevationRange {
    #[serde(rename = "lowerBound", default, deserialize_with = "lenient")]
    pub lower_bound: Option<ElevationBound>,
    #[serde(rename = "upperBound", default, deserialize_with = "lenient")]
    pub upper_bound: Option<ElevationBound>,
}

/// Elevation bound as sent upstream: usually metres, occasionally a
/// fractional number or a string such as `treeline`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElevationBound {
    Metres(i64),
    Number(Number),
    Label(String),
}

impl ElevationBound {
    /// True when the bound reads as a height (`2200`, `2200.0`, `"2200"`).
    pub fn is_numeric(&self) -> bool {
        match self {
            ElevationBound::Metres(_) | ElevationBound::Number(_) => true,
            ElevationBound::Label(s) => s.trim().parse::<f64>().is_ok(),
        }
    }

    /// `2200m` for heights, the label unchanged otherwise.
    pub fn with_unit(&self) -> String {
        if self.is_numeric() {
            format!("{}m", self)
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for ElevationBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElevationBound::Metres(m) => write!(f, "{}", m),
            ElevationBound::Number(n) => write!(f, "{}", n),
            ElevationBound::Label(s) => write!(f, "{}", s.trim()),
        }
    }
}

impl BulletinPayload {
    /// First bulletin whose region list contains `region_id`.
    pub fn bulletin_for(&self, region_id: &str) -> Option<(&Bulletin, &RegionRef)> {
        self.features.iter().find_map(|feature| {
            feature
                .properties
                .regions
                .iter()
                .find(|r| r.region_id.as_deref() == Some(region_id))
                .map(|region| (&feature.properties, region))
        })
    }
}
