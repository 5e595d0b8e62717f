//! Thin client for the hosted generative model.
//!
//! Three best-effort calls: student-card verification, coordinate-to-zone
//! naming and timetable parsing. Every failure path degrades to `None`; the
//! commerce core never sees an error from here and never blocks on it.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::domain::user::Schedule;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Result of the student-card check, used only at account-creation time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IdentityCheck {
    #[serde(alias = "fullName")]
    pub full_name: String,
    #[serde(alias = "studentId")]
    pub student_id: String,
    #[serde(alias = "isValid")]
    pub is_valid: bool,
}

pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Reads `GEMINI_API_KEY` (and optional `GEMINI_ENDPOINT`,
    /// `GEMINI_MODEL`). Without a key the client is a no-op and every call
    /// degrades.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            log::warn!("GEMINI_API_KEY not set; AI verification and zone naming are disabled");
        }
        Self {
            http: reqwest::Client::new(),
            endpoint: std::env::var("GEMINI_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_key,
        }
    }

    /// A client with no credentials; used by tests and offline deployments.
    pub fn disabled() -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }

    async fn generate(&self, parts: Value, json_response: bool) -> Option<String> {
        let api_key = self.api_key.as_ref()?;
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, api_key
        );
        let mut body = json!({ "contents": [{ "parts": parts }] });
        if json_response {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }

        let response = match self.http.post(&url).json(&body).send().await {
            Ok(r) => r,
            Err(e) => {
                log::warn!("model call failed: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            log::warn!("model call returned {}", response.status());
            return None;
        }
        let payload: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                log::warn!("model response was not JSON: {e}");
                return None;
            }
        };
        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_owned)
    }

    /// Extract name, student id and validity from a card photo.
    pub async fn verify_identity(&self, image_base64: &str) -> Option<IdentityCheck> {
        let parts = json!([
            { "inlineData": { "mimeType": "image/jpeg", "data": image_base64 } },
            { "text": "Extract the information from this U-AUBEN student card. \
                       Return only JSON with keys full_name, student_id and is_valid. \
                       If this is not a valid U-AUBEN card, set is_valid to false." }
        ]);
        let text = self.generate(parts, true).await?;
        match serde_json::from_str(&text) {
            Ok(check) => Some(check),
            Err(e) => {
                log::warn!("unparseable identity answer: {e}");
                None
            }
        }
    }

    /// Name the campus zone for a coordinate pair. Absence means the zone
    /// stays unset.
    pub async fn resolve_zone(&self, lat: f64, lng: f64) -> Option<String> {
        let parts = json!([{
            "text": format!(
                "You know the Université Aube Nouvelle campus in Ouagadougou. \
                 Translate GPS coordinates lat {lat}, lng {lng} into a zone name \
                 students use (e.g. Pavillon G, Faso Kanu, Administration, \
                 Entrée Principale, Cafétéria). Answer with the zone name only."
            )
        }]);
        let zone = self.generate(parts, false).await?;
        let zone = zone.trim();
        if zone.is_empty() {
            None
        } else {
            Some(zone.to_string())
        }
    }

    /// Turn a timetable photo into busy slots plus advisory text.
    pub async fn parse_schedule(&self, image_base64: &str) -> Option<Schedule> {
        let parts = json!([
            { "inlineData": { "mimeType": "image/jpeg", "data": image_base64 } },
            { "text": "Analyse this student timetable image. Return JSON with a \
                       'busy_slots' list of {day, start_time, end_time} records and \
                       an 'advice' string suggesting the best delivery windows." }
        ]);
        let text = self.generate(parts, true).await?;
        match serde_json::from_str(&text) {
            Ok(schedule) => Some(schedule),
            Err(e) => {
                log::warn!("unparseable schedule answer: {e}");
                None
            }
        }
    }
}
