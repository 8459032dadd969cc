use crate::api::AppState;
use crate::voice::{parse_request, speech, VoiceRequest, VoiceResponse};
use axum::{body::Bytes, extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Voice platform response envelope
#[derive(Serialize)]
pub(crate) struct AlexaResponse {
    version: &'static str,
    response: AlexaResponseBody,
}

#[derive(Serialize)]
struct AlexaResponseBody {
    #[serde(rename = "outputSpeech")]
    output_speech: OutputSpeech,
    #[serde(rename = "shouldEndSession")]
    should_end_session: bool,
}

#[derive(Serialize)]
struct OutputSpeech {
    #[serde(rename = "type")]
    speech_type: &'static str,
    ssml: String,
}

impl From<VoiceResponse> for AlexaResponse {
    fn from(reply: VoiceResponse) -> Self {
        Self {
            version: "1.0",
            response: AlexaResponseBody {
                output_speech: OutputSpeech {
                    speech_type: "SSML",
                    ssml: speech::to_ssml(&reply.speech_text),
                },
                should_end_session: reply.end_session,
            },
        }
    }
}

/// POST /api/alexa - Answer a voice request
///
/// Always 200 with a speech response; bodies that cannot be decoded get the
/// generic failure line.
pub(crate) async fn handle_voice_request(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<AlexaResponse> {
    if state.check_body_size(body.len()).is_err() {
        warn!(size = body.len(), "Voice request body too large");
        return Json(VoiceResponse::speak(speech::REQUEST_FAILED).into());
    }

    let (envelope, request) = match parse_request(&body) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Failed to decode voice request");
            return Json(VoiceResponse::speak(speech::REQUEST_FAILED).into());
        }
    };

    let intent = match &request {
        VoiceRequest::Intent(intent) => intent.name(),
        _ => "-",
    };
    info!(
        request_type = %request.kind(),
        intent = %intent,
        user_id = %envelope.user_id(),
        "Handling voice request"
    );

    Json(state.dispatcher.handle(&request).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EcoNudgeConfig;

    fn create_test_state() -> Arc<AppState> {
        Arc::new(AppState::new(&EcoNudgeConfig::default()))
    }

    #[tokio::test]
    async fn test_launch_wraps_speech_in_ssml() {
        let state = create_test_state();
        let body = Bytes::from_static(br#"{"request": {"type": "LaunchRequest"}}"#);

        let Json(response) = handle_voice_request(State(state), body).await;

        assert_eq!(response.version, "1.0");
        assert_eq!(response.response.output_speech.speech_type, "SSML");
        assert_eq!(
            response.response.output_speech.ssml,
            format!("<speak>{}</speak>", speech::WELCOME)
        );
        assert!(!response.response.should_end_session);
    }

    #[tokio::test]
    async fn test_malformed_body_gets_failure_speech() {
        let state = create_test_state();
        let body = Bytes::from_static(b"definitely not json");

        let Json(response) = handle_voice_request(State(state), body).await;

        assert_eq!(
            response.response.output_speech.ssml,
            "<speak>Sorry, there was an error processing your request.</speak>"
        );
        assert!(!response.response.should_end_session);
    }
}
