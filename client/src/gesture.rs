//! Gesture payload synthesis for the `appium/gestures/*` endpoints.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::geometry::PointF;
use crate::transport::decode_value;

/// Direction string expected by the gesture endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Maps a 2-D vector to the dominant cardinal direction. Ties go horizontal.
pub(crate) fn direction_from_vector(dx: i32, dy: i32) -> Result<GestureDirection> {
    if dx == 0 && dy == 0 {
        return Err(Error::ZeroVector);
    }
    // Widen before abs so i32::MIN cannot overflow.
    if (dx as i64).abs() >= (dy as i64).abs() {
        if dx > 0 {
            Ok(GestureDirection::Right)
        } else {
            Ok(GestureDirection::Left)
        }
    } else if dy > 0 {
        Ok(GestureDirection::Down)
    } else {
        Ok(GestureDirection::Up)
    }
}

/// Element reference carrying the same id under both the legacy JSONWP key
/// and the W3C one; server versions differ in which they read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ElementRef {
    #[serde(rename = "ELEMENT")]
    legacy: String,
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    w3c: String,
}

impl ElementRef {
    /// `None` for an empty id: the gesture targets absolute screen
    /// coordinates instead of an element.
    pub(crate) fn new(id: &str) -> Option<Self> {
        if id.is_empty() {
            return None;
        }
        Some(Self {
            legacy: id.to_string(),
            w3c: id.to_string(),
        })
    }
}

/// Decode-side counterpart of [`ElementRef`]: servers answer with either
/// identifier key populated.
#[derive(Debug, Deserialize)]
pub(crate) struct ElementId {
    #[serde(rename = "ELEMENT")]
    legacy: Option<String>,
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    w3c: Option<String>,
}

impl ElementId {
    pub(crate) fn into_id(self) -> Result<String> {
        self.w3c.or(self.legacy).ok_or(Error::MissingElementId)
    }
}

/// Payload for `double_click` and `long_click`.
#[derive(Serialize)]
pub(crate) struct TapGestureRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) origin: Option<ElementRef>,
    /// Milliseconds; the server default applies when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) duration: Option<i64>,
}

/// Payload for the `drag` gesture. Element drags set `origin`; screen drags
/// set `start`. `end` is always absolute.
#[derive(Serialize)]
pub(crate) struct DragRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) origin: Option<ElementRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) start: Option<PointF>,
    pub(crate) end: PointF,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) speed: Option<u32>,
}

/// Payload for the `fling` gesture.
#[derive(Serialize)]
pub(crate) struct FlingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) origin: Option<ElementRef>,
    pub(crate) direction: GestureDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) speed: Option<u32>,
}

/// Payload for the `scroll_to` gesture. `max_swipes` of 0 leaves the swipe
/// budget to the server.
#[derive(Serialize)]
pub(crate) struct ScrollToRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) origin: Option<ElementRef>,
    pub(crate) strategy: &'static str,
    pub(crate) selector: &'a str,
    #[serde(rename = "maxSwipes")]
    pub(crate) max_swipes: i32,
}

impl Driver {
    fn gesture_path(&self, action: &str) -> String {
        self.session_path(&format!("appium/gestures/{action}"))
    }

    /// Issues a gesture whose success is the HTTP outcome alone.
    pub(crate) async fn perform_gesture(
        &self,
        action: &str,
        payload: &impl Serialize,
    ) -> Result<()> {
        self.transport()
            .post(&self.gesture_path(action), Some(serde_json::to_value(payload)?))
            .await?;
        Ok(())
    }

    /// Issues a gesture and decodes the `{"value": ...}` envelope. An absent
    /// or null value is `None`, not an error.
    pub(crate) async fn gesture_value<T: DeserializeOwned>(
        &self,
        action: &str,
        payload: &impl Serialize,
    ) -> Result<Option<T>> {
        let raw = self
            .transport()
            .post(&self.gesture_path(action), Some(serde_json::to_value(payload)?))
            .await?;
        decode_value(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_vector_has_no_direction() {
        assert!(matches!(direction_from_vector(0, 0), Err(Error::ZeroVector)));
    }

    #[test]
    fn dominant_axis_wins() {
        assert_eq!(direction_from_vector(10, 3).unwrap(), GestureDirection::Right);
        assert_eq!(direction_from_vector(-10, 3).unwrap(), GestureDirection::Left);
        assert_eq!(direction_from_vector(3, 10).unwrap(), GestureDirection::Down);
        assert_eq!(direction_from_vector(3, -10).unwrap(), GestureDirection::Up);
    }

    #[test]
    fn ties_resolve_horizontal() {
        assert_eq!(direction_from_vector(5, 5).unwrap(), GestureDirection::Right);
        assert_eq!(direction_from_vector(-5, 5).unwrap(), GestureDirection::Left);
        assert_eq!(direction_from_vector(-5, -5).unwrap(), GestureDirection::Left);
    }

    #[test]
    fn extreme_vectors_do_not_overflow() {
        assert_eq!(
            direction_from_vector(i32::MIN, 1).unwrap(),
            GestureDirection::Left
        );
        assert_eq!(
            direction_from_vector(1, i32::MIN).unwrap(),
            GestureDirection::Up
        );
    }

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(GestureDirection::Up).unwrap(),
            serde_json::json!("up")
        );
    }

    #[test]
    fn empty_id_means_no_origin() {
        assert_eq!(ElementRef::new(""), None);
    }

    #[test]
    fn element_ref_carries_both_identifier_keys() {
        let value = serde_json::to_value(ElementRef::new("abc").unwrap()).unwrap();
        assert_eq!(value["ELEMENT"], "abc");
        assert_eq!(value["element-6066-11e4-a52e-4f735466cecf"], "abc");
    }

    #[test]
    fn element_id_prefers_w3c_key() {
        let id: ElementId =
            serde_json::from_str(r#"{"ELEMENT":"old","element-6066-11e4-a52e-4f735466cecf":"new"}"#)
                .unwrap();
        assert_eq!(id.into_id().unwrap(), "new");

        let id: ElementId = serde_json::from_str(r#"{"ELEMENT":"old"}"#).unwrap();
        assert_eq!(id.into_id().unwrap(), "old");

        let id: ElementId = serde_json::from_str("{}").unwrap();
        assert!(matches!(id.into_id(), Err(Error::MissingElementId)));
    }
}
