use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Visitor data posted by the consent button on the website.
///
/// Every part is optional. Sub-objects that are missing or falsy are absent;
/// any other non-object value counts as present with no data in it.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct InboundPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub device: Option<Device>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<Location>,
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<Page>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub user_agent: Option<Value>,
    #[serde(default)]
    pub platform: Option<Value>,
    #[serde(default)]
    pub language: Option<Value>,
    #[serde(default)]
    pub timezone: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub screen: Option<Screen>,
    #[serde(default)]
    pub cookies_enabled: Option<Value>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    #[serde(default)]
    pub width: Option<Value>,
    #[serde(default)]
    pub height: Option<Value>,
    #[serde(default)]
    pub pixel_ratio: Option<Value>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Location {
    #[serde(default)]
    pub ok: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub coords: Option<Coords>,
    #[serde(default)]
    pub reason: Option<Value>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Coords {
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
    #[serde(default)]
    pub accuracy: Option<Value>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Page {
    #[serde(default)]
    pub url: Option<Value>,
    #[serde(default)]
    pub referrer: Option<Value>,
}

/// Outcome of the browser geolocation request
#[derive(Clone, Debug, PartialEq)]
pub enum LocationReport<'a> {
    Acquired(&'a Coords),
    Unavailable { reason: Option<&'a Value> },
}

impl Location {
    pub fn report(&self) -> LocationReport<'_> {
        match (self.ok.as_ref().is_some_and(truthy), &self.coords) {
            (true, Some(coords)) => LocationReport::Acquired(coords),
            _ => LocationReport::Unavailable {
                reason: self.reason.as_ref(),
            },
        }
    }
}

impl InboundPayload {
    /// Parses a request body, falling back to an empty payload when the body
    /// is empty, malformed or not a JSON object.
    pub fn from_body(body: &[u8]) -> Self {
        let value = match serde_json::from_slice::<Value>(body) {
            Ok(value) if value.is_object() => value,
            Ok(_) => {
                debug!("Request body is not a JSON object, using an empty payload");
                return Self::default();
            }
            Err(e) => {
                debug!("Failed to parse request body, using an empty payload: {}", e);
                return Self::default();
            }
        };

        serde_json::from_value(value).unwrap_or_default()
    }
}

/// JavaScript truthiness, which is what the browser side relies on for flags
/// like `location.ok`.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(v) if v.is_object() => Some(serde_json::from_value(v).unwrap_or_default()),
        Some(v) if truthy(&v) => Some(T::default()),
        _ => None,
    })
}
