use serde_json::json;
use thiserror::Error;

/// Provider response for a call that was accepted.
#[derive(Debug, Clone, Default)]
pub struct CallResponse {
    /// Raw provider response body, stored on the call log
    pub response_data: Option<String>,
}

#[derive(Debug, Error)]
pub enum TelephonyError {
    #[error("Telephony provider rejected the call: {0}")]
    Provider(String),
    #[error("Telephony transport error: {0}")]
    Transport(String),
}

/// External capability that places a single phone call. One invocation is
/// one attempt; retry policy lives with the caller.
#[async_trait::async_trait]
pub trait ITelephonyService: Send + Sync {
    async fn place_call(
        &self,
        phone_number: &str,
        message: &str,
    ) -> Result<CallResponse, TelephonyError>;
}

/// Vapi voice-call API client.
pub struct VapiCallerService {
    client: reqwest::Client,
    api_key: String,
    phone_number_id: String,
}

impl VapiCallerService {
    const BASE_URL: &'static str = "https://api.vapi.ai";

    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("VAPI_API_KEY").ok()?;
        let phone_number_id = std::env::var("VAPI_PHONE_NUMBER_ID").ok()?;
        Some(Self {
            client: reqwest::Client::new(),
            api_key,
            phone_number_id,
        })
    }
}

#[async_trait::async_trait]
impl ITelephonyService for VapiCallerService {
    async fn place_call(
        &self,
        phone_number: &str,
        message: &str,
    ) -> Result<CallResponse, TelephonyError> {
        let payload = json!({
            "phoneNumberId": self.phone_number_id,
            "customer": {
                "number": phone_number
            },
            "assistant": {
                "firstMessage": message,
                "model": {
                    "provider": "openai",
                    "model": "gpt-3.5-turbo",
                    "messages": [
                        {
                            "role": "system",
                            "content": "You are a helpful reminder assistant. Deliver the reminder message clearly and concisely, then end the call."
                        }
                    ]
                },
                "voice": {
                    "provider": "11labs",
                    "voiceId": "21m00Tcm4TlvDq8ikWAM"
                }
            }
        });

        let res = self
            .client
            .post(format!("{}/call/phone", Self::BASE_URL))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| TelephonyError::Transport(e.to_string()))?;

        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        if status.is_success() {
            Ok(CallResponse {
                response_data: Some(body),
            })
        } else {
            Err(TelephonyError::Provider(format!("{}: {}", status, body)))
        }
    }
}

/// Used when the Vapi credentials are missing from the environment. Every
/// attempt fails, which surfaces the misconfiguration on the call log
/// instead of pretending calls went out.
pub struct UnconfiguredTelephonyService {}

#[async_trait::async_trait]
impl ITelephonyService for UnconfiguredTelephonyService {
    async fn place_call(
        &self,
        _phone_number: &str,
        _message: &str,
    ) -> Result<CallResponse, TelephonyError> {
        Err(TelephonyError::Provider(
            "Telephony provider is not configured".into(),
        ))
    }
}

/// Telephony for in-memory contexts; accepts every call without side
/// effects.
pub struct StubTelephonyService {}

#[async_trait::async_trait]
impl ITelephonyService for StubTelephonyService {
    async fn place_call(
        &self,
        _phone_number: &str,
        _message: &str,
    ) -> Result<CallResponse, TelephonyError> {
        Ok(CallResponse::default())
    }
}
