// SPDX-License-Identifier: MIT

//! FCM push notification sender.
//!
//! One attempt per recipient, no queueing and no retry. Callers decide how
//! to react to failures; the fan-out path logs and keeps going.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::AppError;

const FCM_SEND_URL: &str = "https://fcm.googleapis.com/fcm/send";

/// A notification recorded by the mock sender (tests only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPush {
    pub device_token: String,
    pub title: String,
    pub body: String,
}

/// Mock bookkeeping for offline tests.
struct MockPush {
    sent: Mutex<Vec<SentPush>>,
    fail_tokens: Mutex<HashSet<String>>,
}

/// FCM client wrapper.
pub struct PushService {
    http: reqwest::Client,
    server_key: String,
    endpoint: String,
    mock: Option<MockPush>,
}

impl PushService {
    pub fn new(server_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            server_key,
            endpoint: FCM_SEND_URL.to_string(),
            mock: None,
        }
    }

    /// Create a mock sender that records sends instead of calling FCM.
    pub fn new_mock() -> Self {
        Self {
            http: reqwest::Client::new(),
            server_key: String::new(),
            endpoint: String::new(),
            mock: Some(MockPush {
                sent: Mutex::new(Vec::new()),
                fail_tokens: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Device tokens the mock sender should fail on (tests only).
    pub fn set_mock_fail_tokens(&self, tokens: impl IntoIterator<Item = String>) {
        if let Some(mock) = &self.mock {
            let mut guard = mock.fail_tokens.lock().unwrap();
            guard.clear();
            guard.extend(tokens);
        }
    }

    /// Notifications recorded by the mock sender (tests only).
    pub fn mock_sent(&self) -> Vec<SentPush> {
        self.mock
            .as_ref()
            .map(|mock| mock.sent.lock().unwrap().clone())
            .unwrap_or_default()
    }

    /// Attempt a single delivery to one device.
    pub async fn send(&self, device_token: &str, title: &str, body: &str) -> Result<(), AppError> {
        if let Some(mock) = &self.mock {
            if mock.fail_tokens.lock().unwrap().contains(device_token) {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "mock push failure for token {device_token}"
                )));
            }

            mock.sent.lock().unwrap().push(SentPush {
                device_token: device_token.to_string(),
                title: title.to_string(),
                body: body.to_string(),
            });
            return Ok(());
        }

        let payload = serde_json::json!({
            "to": device_token,
            "notification": {
                "title": title,
                "body": body,
            },
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("FCM request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "FCM returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}
