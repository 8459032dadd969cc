// Voice assistant requests, intent dispatch and spoken replies

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

mod dispatcher;
pub mod speech;

pub use dispatcher::{IntentDispatcher, TEMPERATURE_RANGE};

/// Name of the slot carrying the requested setpoint in `ChangeTemperatureIntent`.
pub const TEMPERATURE_SLOT: &str = "temperature";

/// Incoming voice platform request envelope.
///
/// Only the fields the dispatcher needs are modelled; everything else in
/// the platform payload is ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct VoiceEnvelope {
    #[serde(default)]
    pub session: Option<SessionBody>,

    pub request: RequestBody,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SessionBody {
    #[serde(default)]
    pub user: Option<UserBody>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserBody {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RequestBody {
    /// Missing or null types fall through to the fallback reply
    #[serde(rename = "type", default)]
    pub request_type: Option<String>,

    #[serde(default)]
    pub intent: Option<IntentBody>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct IntentBody {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub slots: Option<HashMap<String, SlotBody>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SlotBody {
    #[serde(default)]
    pub value: Option<String>,
}

impl VoiceEnvelope {
    /// Caller's platform user id, "anonymous" when absent.
    pub fn user_id(&self) -> &str {
        self.session
            .as_ref()
            .and_then(|s| s.user.as_ref())
            .and_then(|u| u.user_id.as_deref())
            .unwrap_or("anonymous")
    }
}

/// Voice request after decoding: what kind of turn this is.
#[derive(Clone, Debug, PartialEq)]
pub enum VoiceRequest {
    Launch,
    Intent(Intent),
    SessionEnded,
    /// Request type the skill does not handle (empty when missing)
    Unrecognized(String),
}

/// Closed set of intents the skill understands.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    ImHome,
    EnvironmentalImpact,
    AnyUpdates,
    GetAnnouncement,
    TreeHealth,
    /// Raw slot text; parsed and range-checked by the dispatcher
    ChangeTemperature { value: Option<String> },
    GetTemperature,
    Help,
    Stop,
    Cancel,
    /// Intent name outside the closed set (empty when the intent is missing)
    Unknown(String),
}

impl Intent {
    /// Map a declared intent name and its slots onto the closed set.
    pub fn from_name(name: &str, slots: Option<&HashMap<String, SlotBody>>) -> Self {
        match name {
            "ImHomeIntent" => Intent::ImHome,
            "GetEnvironmentalImpactIntent" => Intent::EnvironmentalImpact,
            "AnyUpdatesIntent" => Intent::AnyUpdates,
            "GetAnnouncementIntent" => Intent::GetAnnouncement,
            "GetCurrentTreeHealthIntent" => Intent::TreeHealth,
            "ChangeTemperatureIntent" => Intent::ChangeTemperature {
                value: slots
                    .and_then(|slots| slots.get(TEMPERATURE_SLOT))
                    .and_then(|slot| slot.value.clone()),
            },
            "GetTemperatureIntent" => Intent::GetTemperature,
            "AMAZON.HelpIntent" => Intent::Help,
            "AMAZON.StopIntent" => Intent::Stop,
            "AMAZON.CancelIntent" => Intent::Cancel,
            other => Intent::Unknown(other.to_string()),
        }
    }

    /// Wire name, used for logging.
    pub fn name(&self) -> &str {
        match self {
            Intent::ImHome => "ImHomeIntent",
            Intent::EnvironmentalImpact => "GetEnvironmentalImpactIntent",
            Intent::AnyUpdates => "AnyUpdatesIntent",
            Intent::GetAnnouncement => "GetAnnouncementIntent",
            Intent::TreeHealth => "GetCurrentTreeHealthIntent",
            Intent::ChangeTemperature { .. } => "ChangeTemperatureIntent",
            Intent::GetTemperature => "GetTemperatureIntent",
            Intent::Help => "AMAZON.HelpIntent",
            Intent::Stop => "AMAZON.StopIntent",
            Intent::Cancel => "AMAZON.CancelIntent",
            Intent::Unknown(name) => name,
        }
    }
}

impl From<&RequestBody> for VoiceRequest {
    fn from(body: &RequestBody) -> Self {
        match body.request_type.as_deref().unwrap_or_default() {
            "LaunchRequest" => VoiceRequest::Launch,
            "IntentRequest" => match body.intent {
                Some(ref intent) => VoiceRequest::Intent(Intent::from_name(
                    intent.name.as_deref().unwrap_or_default(),
                    intent.slots.as_ref(),
                )),
                None => VoiceRequest::Intent(Intent::Unknown(String::new())),
            },
            "SessionEndedRequest" => VoiceRequest::SessionEnded,
            other => VoiceRequest::Unrecognized(other.to_string()),
        }
    }
}

impl VoiceRequest {
    /// Short label for logs.
    pub fn kind(&self) -> &str {
        match self {
            VoiceRequest::Launch => "LaunchRequest",
            VoiceRequest::Intent(_) => "IntentRequest",
            VoiceRequest::SessionEnded => "SessionEndedRequest",
            VoiceRequest::Unrecognized(kind) => kind,
        }
    }
}

/// Errors decoding a voice request body
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceRequestError {
    /// Not JSON, or no `request` object
    Malformed(String),
}

impl fmt::Display for VoiceRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceRequestError::Malformed(msg) => write!(f, "malformed voice request: {}", msg),
        }
    }
}

impl std::error::Error for VoiceRequestError {}

/// Decode a raw request body into its envelope and domain request.
pub fn parse_request(body: &[u8]) -> Result<(VoiceEnvelope, VoiceRequest), VoiceRequestError> {
    let envelope: VoiceEnvelope = serde_json::from_slice(body)
        .map_err(|e| VoiceRequestError::Malformed(e.to_string()))?;

    let request = VoiceRequest::from(&envelope.request);
    Ok((envelope, request))
}

/// Spoken reply produced for one voice request.
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceResponse {
    pub speech_text: String,
    pub end_session: bool,
}

impl VoiceResponse {
    /// Reply that keeps the session open.
    pub fn speak(text: impl Into<String>) -> Self {
        Self {
            speech_text: text.into(),
            end_session: false,
        }
    }

    /// Reply that closes the session.
    pub fn end(text: impl Into<String>) -> Self {
        Self {
            speech_text: text.into(),
            end_session: true,
        }
    }
}
