//! Raw profile validation and canonical user records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::RangeInclusive;

/// Raw profile shape as it appears in collected dumps. Unknown fields —
/// including the name fields the collector may have stored — are ignored on
/// deserialization and never reach a [`UserRecord`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub bdate: Option<String>,
    #[serde(default)]
    pub sex: Option<i64>,
    #[serde(default)]
    pub has_photo: Option<i64>,
    #[serde(default)]
    pub university: Option<Value>,
}

/// Canonical per-user record kept in the dataset. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub year: i32,
    pub sex: i64,
    pub has_photo: i64,
    pub has_university: i64,
}

/// Validate and canonicalize a raw profile.
///
/// Rejects (`None`) when the birth date is absent, is not `day.month.year`
/// (exactly two dots), has a non-numeric year, or the year falls outside
/// `years`. Rejection is silent: such users simply never enter the dataset.
pub fn normalize_profile(
    id: &str,
    raw: &RawProfile,
    years: &RangeInclusive<i32>,
) -> Option<UserRecord> {
    let bdate = raw.bdate.as_deref()?;
    if bdate.matches('.').count() != 2 {
        return None;
    }
    let year: i32 = bdate.rsplit('.').next()?.trim().parse().ok()?;
    if !years.contains(&year) {
        return None;
    }

    Some(UserRecord {
        id: id.to_string(),
        year,
        sex: raw.sex.unwrap_or(0),
        has_photo: raw.has_photo.unwrap_or(0),
        has_university: if is_truthy(raw.university.as_ref()) { 1 } else { 0 },
    })
}

/// Present and non-null/zero/empty, in the JSON sense.
fn is_truthy(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}
