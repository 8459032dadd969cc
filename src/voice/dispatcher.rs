use crate::announcement::AnnouncementSlot;
use crate::dashboard::{DashboardPatch, DashboardStore};
use crate::voice::speech;
use crate::voice::{Intent, VoiceRequest, VoiceResponse};
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{info, warn};

/// Setpoints the change-temperature intent accepts (°C, inclusive).
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 16.0..=28.0;

/// Routes decoded voice requests to their canned replies.
///
/// Owns handles to the announcement slot and the dashboard record; the only
/// intents that mutate state are the announcement readers (consume) and
/// `ChangeTemperature` (patch).
#[derive(Clone)]
pub struct IntentDispatcher {
    announcements: Arc<AnnouncementSlot>,
    dashboard: Arc<DashboardStore>,
}

impl IntentDispatcher {
    pub fn new(announcements: Arc<AnnouncementSlot>, dashboard: Arc<DashboardStore>) -> Self {
        Self {
            announcements,
            dashboard,
        }
    }

    /// Produce the reply for one request. Total: every input gets a reply.
    pub fn handle(&self, request: &VoiceRequest) -> VoiceResponse {
        match request {
            VoiceRequest::Launch => self.launch(),
            VoiceRequest::Intent(intent) => self.intent(intent),
            VoiceRequest::SessionEnded => VoiceResponse::end(speech::GOODBYE),
            VoiceRequest::Unrecognized(kind) => {
                info!(request_type = %kind, "Unrecognized voice request type");
                VoiceResponse::speak(speech::UNKNOWN_REQUEST)
            }
        }
    }

    /// Launch peeks so the update is still there for "any updates".
    fn launch(&self) -> VoiceResponse {
        match self.announcements.peek() {
            Some(announcement) => VoiceResponse::speak(speech::welcome_with_update(&announcement)),
            None => VoiceResponse::speak(speech::WELCOME),
        }
    }

    fn intent(&self, intent: &Intent) -> VoiceResponse {
        match intent {
            Intent::ImHome => VoiceResponse::speak(speech::im_home(&self.dashboard.read())),
            Intent::EnvironmentalImpact => {
                VoiceResponse::speak(speech::environmental_impact(&self.dashboard.read()))
            }
            Intent::AnyUpdates => match self.announcements.consume() {
                Some(announcement) => VoiceResponse::speak(speech::any_updates(&announcement)),
                None => VoiceResponse::speak(speech::NO_UPDATES),
            },
            Intent::GetAnnouncement => match self.announcements.consume() {
                Some(announcement) => {
                    VoiceResponse::speak(speech::latest_announcement(&announcement))
                }
                None => VoiceResponse::speak(speech::NO_ANNOUNCEMENTS),
            },
            Intent::TreeHealth => VoiceResponse::speak(speech::tree_health(&self.dashboard.read())),
            Intent::ChangeTemperature { value } => self.change_temperature(value.as_deref()),
            Intent::GetTemperature => {
                VoiceResponse::speak(speech::current_temperature(&self.dashboard.read()))
            }
            Intent::Help => VoiceResponse::speak(speech::HELP),
            Intent::Stop | Intent::Cancel => VoiceResponse::end(speech::GOODBYE),
            Intent::Unknown(name) => {
                info!(intent = %name, "Unknown intent, using fallback reply");
                VoiceResponse::speak(speech::UNKNOWN_INTENT)
            }
        }
    }

    /// Out-of-range or unparsable values get a spoken correction and leave
    /// the dashboard untouched.
    fn change_temperature(&self, raw: Option<&str>) -> VoiceResponse {
        let requested = match raw.map(str::trim).and_then(|s| s.parse::<f64>().ok()) {
            Some(v) if v.is_finite() => v,
            _ => {
                warn!(slot_value = ?raw, "Temperature slot is not a number");
                return VoiceResponse::speak(speech::TEMPERATURE_NOT_UNDERSTOOD);
            }
        };

        if !TEMPERATURE_RANGE.contains(&requested) {
            warn!(requested, "Requested temperature outside allowed range");
            return VoiceResponse::speak(speech::temperature_out_of_range(requested));
        }

        let state = self.dashboard.patch(&DashboardPatch::temperature(requested));
        info!(temperature = state.temperature, "Heating setpoint changed by voice");

        VoiceResponse::speak(speech::temperature_changed(state.temperature))
    }
}
