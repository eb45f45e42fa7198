//! Server-side scheduled actions: register, poll history, unschedule.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::transport::decode_reply;

/// One step of a scheduled action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledActionStep {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
}

fn duration_from_ms<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<Duration>, D::Error> {
    let ms: Option<u64> = Option::deserialize(d)?;
    Ok(ms.map(Duration::from_millis))
}

/// A named, repeating step sequence the server executes autonomously.
///
/// `name` and at least one step are mandatory. Every bound is optional: an
/// unset (or zero) bound is omitted from the wire payload so the server
/// default stays in force.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduledAction {
    pub name: String,
    pub steps: Vec<ScheduledActionStep>,
    /// How many times to run the sequence.
    #[serde(default)]
    pub times: Option<u32>,
    /// Pause between repeats.
    #[serde(default, rename = "intervalMs", deserialize_with = "duration_from_ms")]
    pub interval: Option<Duration>,
    #[serde(default, rename = "maxHistoryItems")]
    pub max_history_items: Option<u32>,
    /// Stop after this many passing repeats.
    #[serde(default, rename = "maxPass")]
    pub max_pass: Option<u32>,
    /// Stop after this many failing repeats.
    #[serde(default, rename = "maxFail")]
    pub max_fail: Option<u32>,
}

#[derive(Serialize)]
struct ScheduleRequest<'a> {
    name: &'a str,
    steps: &'a [ScheduledActionStep],
    #[serde(skip_serializing_if = "Option::is_none")]
    times: Option<u32>,
    #[serde(rename = "intervalMs", skip_serializing_if = "Option::is_none")]
    interval_ms: Option<u64>,
    #[serde(rename = "maxHistoryItems", skip_serializing_if = "Option::is_none")]
    max_history_items: Option<u32>,
    #[serde(rename = "maxPass", skip_serializing_if = "Option::is_none")]
    max_pass: Option<u32>,
    #[serde(rename = "maxFail", skip_serializing_if = "Option::is_none")]
    max_fail: Option<u32>,
}

#[derive(Serialize)]
struct NameRequest<'a> {
    name: &'a str,
}

fn bound(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v > 0)
}

/// Exception raised by a failed step, as the server reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionStepException {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub stacktrace: String,
}

/// Outcome of one step within one repeat. `result` is meaningful when the
/// step passed, `exception` when it did not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionStepResult {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: i64,
    pub passed: bool,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub exception: Option<ActionStepException>,
}

/// Execution history of a scheduled action: how many repeats ran, and the
/// per-repeat step outcomes in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionHistory {
    #[serde(default)]
    pub repeats: i64,
    #[serde(default, rename = "stepResults")]
    pub step_results: Vec<Vec<ActionStepResult>>,
}

impl Driver {
    /// Registers `action` on the server. An invalid definition fails here,
    /// without a round trip. Re-registering a name is the server's business;
    /// no idempotency guard is kept client-side.
    pub async fn schedule_action(&self, action: &ScheduledAction) -> Result<()> {
        if action.name.is_empty() {
            return Err(Error::MissingName);
        }
        if action.steps.is_empty() {
            return Err(Error::MissingSteps);
        }
        let request = ScheduleRequest {
            name: &action.name,
            steps: &action.steps,
            times: bound(action.times),
            interval_ms: action
                .interval
                .filter(|i| !i.is_zero())
                .map(|i| i.as_millis() as u64),
            max_history_items: bound(action.max_history_items),
            max_pass: bound(action.max_pass),
            max_fail: bound(action.max_fail),
        };
        self.execute_post(Some(serde_json::to_value(&request)?), "appium/schedule_action")
            .await?;
        Ok(())
    }

    /// Fetches the history accumulated so far. Read-only and repeatable;
    /// polling does not consume or reset anything.
    pub async fn action_history(&self, name: &str) -> Result<ActionHistory> {
        self.fetch_action_history("appium/action_history", name).await
    }

    /// Removes the schedule and returns its final history in the same
    /// response. This is the only call that both mutates the schedule and
    /// reports the complete picture; polling afterwards yields
    /// [`Error::ActionNotFound`].
    pub async fn unschedule_action(&self, name: &str) -> Result<ActionHistory> {
        self.fetch_action_history("appium/unschedule_action", name)
            .await
    }

    async fn fetch_action_history(&self, suffix: &str, name: &str) -> Result<ActionHistory> {
        if name.is_empty() {
            return Err(Error::MissingName);
        }
        let payload = serde_json::to_value(&NameRequest { name })?;
        let raw = match self.execute_post(Some(payload), suffix).await {
            Err(Error::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
                return Err(Error::ActionNotFound(name.to_string()));
            }
            other => other?,
        };
        decode_reply(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_definition_reads_from_json() {
        let action: ScheduledAction = serde_json::from_str(
            r#"{
                "name": "health-check",
                "steps": [{"type": "click", "name": "tap-refresh"}],
                "intervalMs": 1500,
                "maxFail": 2
            }"#,
        )
        .unwrap();
        assert_eq!(action.name, "health-check");
        assert_eq!(action.steps[0].kind, "click");
        assert_eq!(action.interval, Some(Duration::from_millis(1500)));
        assert_eq!(action.times, None);
        assert_eq!(action.max_fail, Some(2));
    }

    #[test]
    fn step_serializes_type_key_and_omits_empty_payload() {
        let step = ScheduledActionStep {
            kind: "assert".into(),
            name: "check".into(),
            payload: None,
        };
        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value, serde_json::json!({"type": "assert", "name": "check"}));
    }

    #[test]
    fn failed_step_carries_exception() {
        let result: ActionStepResult = serde_json::from_str(
            r#"{
                "name": "s1",
                "type": "click",
                "timestamp": 1000,
                "passed": false,
                "result": null,
                "exception": {"name": "StaleObjectException", "message": "gone", "stacktrace": ""}
            }"#,
        )
        .unwrap();
        assert!(!result.passed);
        assert_eq!(result.exception.unwrap().name, "StaleObjectException");
        assert_eq!(result.result, Value::Null);
    }
}
