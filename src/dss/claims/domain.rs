use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A land-rights claim as supplied by callers.
///
/// Field intake is deliberately forgiving: claims arrive from upstream intake
/// systems of uneven quality, so absent or malformed fields coerce to the
/// zero/falsy value instead of rejecting the record. Unknown fields are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Claim {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_text"
    )]
    pub claim_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_text"
    )]
    pub claimant: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_text"
    )]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient_status")]
    pub status: ClaimStatus,
    #[serde(deserialize_with = "lenient_area")]
    pub area_ha: f64,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    pub created: Option<NaiveDate>,
    #[serde(deserialize_with = "truthy")]
    pub docs_complete: bool,
    #[serde(deserialize_with = "truthy")]
    pub is_duplicate: bool,
    #[serde(deserialize_with = "truthy")]
    pub is_in_critical_wildlife_zone: bool,
    #[serde(deserialize_with = "truthy")]
    pub community_support: bool,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_land_use"
    )]
    pub land_type: Option<LandUseKind>,
}

impl Claim {
    /// Boundary coercion for untyped payloads. Any JSON value becomes a claim;
    /// non-objects collapse to the all-defaults record.
    pub fn from_value(value: &Value) -> Claim {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// Review status reported by the upstream case workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ClaimStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Land-use category attached to a claim parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandUseKind {
    DegradedForest,
    CommunityForest,
    Agroforestry,
    ProtectedZone,
}

impl LandUseKind {
    pub const ALL: [LandUseKind; 4] = [
        LandUseKind::DegradedForest,
        LandUseKind::CommunityForest,
        LandUseKind::Agroforestry,
        LandUseKind::ProtectedZone,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            LandUseKind::DegradedForest => "degraded_forest",
            LandUseKind::CommunityForest => "community_forest",
            LandUseKind::Agroforestry => "agroforestry",
            LandUseKind::ProtectedZone => "protected_zone",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "degraded_forest" => Some(Self::DegradedForest),
            "community_forest" => Some(Self::CommunityForest),
            "agroforestry" => Some(Self::Agroforestry),
            "protected_zone" => Some(Self::ProtectedZone),
            _ => None,
        }
    }
}

fn truthiness(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(truthiness(&value))
}

fn lenient_area<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let area = match &value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    // Area is a non-negative surface measure; anything else reads as absent.
    Ok(if area.is_finite() && area > 0.0 {
        area
    } else {
        0.0
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) if !text.is_empty() => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn lenient_status<'de, D>(deserializer: D) -> Result<ClaimStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(ClaimStatus::from_label)
        .unwrap_or_default())
}

fn lenient_land_use<'de, D>(deserializer: D) -> Result<Option<LandUseKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(LandUseKind::from_label))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()))
}
