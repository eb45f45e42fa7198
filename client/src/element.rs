use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;

use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::geometry::{Point, PointF, Rect, Size};
use crate::gesture::{
    DragRequest, ElementRef, FlingRequest, ScrollToRequest, TapGestureRequest,
    direction_from_vector,
};
use crate::selector::Selector;
use crate::transport::decode_reply;

/// Remote handle to one on-screen element. Identity is the server-assigned
/// id; the element stops resolving when the session ends or the view is
/// detached, and there is no explicit release.
#[derive(Clone)]
pub struct Element<'d> {
    driver: &'d Driver,
    id: String,
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl std::fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Element").field(&self.id).finish()
    }
}

#[derive(Serialize)]
struct SendKeysRequest<'a> {
    text: &'a str,
    replace: bool,
}

impl<'d> Element<'d> {
    pub(crate) fn new(driver: &'d Driver, id: String) -> Self {
        Self { driver, id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn path(&self, suffix: &str) -> String {
        format!("element/{}/{suffix}", self.id)
    }

    pub async fn text(&self) -> Result<String> {
        let raw = self.driver.execute_get(&self.path("text")).await?;
        decode_reply(&raw)
    }

    pub async fn attribute(&self, name: &str) -> Result<String> {
        let raw = self
            .driver
            .execute_get(&self.path(&format!("attribute/{name}")))
            .await?;
        decode_reply(&raw)
    }

    /// Accessibility content description.
    pub async fn content_description(&self) -> Result<String> {
        let raw = self.driver.execute_get(&self.path("name")).await?;
        decode_reply(&raw)
    }

    pub async fn size(&self) -> Result<Size> {
        let raw = self.driver.execute_get(&self.path("size")).await?;
        decode_reply(&raw)
    }

    pub async fn rect(&self) -> Result<Rect> {
        let raw = self.driver.execute_get(&self.path("rect")).await?;
        decode_reply(&raw)
    }

    pub async fn location(&self) -> Result<Point> {
        let raw = self.driver.execute_get(&self.path("location")).await?;
        decode_reply(&raw)
    }

    /// PNG bytes of the element's current rendering.
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        let raw = self.driver.execute_get(&self.path("screenshot")).await?;
        let encoded: String = decode_reply(&raw)?;
        Ok(BASE64.decode(encoded.as_bytes())?)
    }

    pub async fn click(&self) -> Result<()> {
        self.driver.execute_post(None, &self.path("click")).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        self.driver.execute_post(None, &self.path("clear")).await?;
        Ok(())
    }

    /// Sends `text` to the element. `replace` defaults to true: existing
    /// content is overwritten unless the caller opts into appending.
    pub async fn send_keys(&self, text: &str, replace: Option<bool>) -> Result<()> {
        let request = SendKeysRequest {
            text,
            replace: replace.unwrap_or(true),
        };
        self.driver
            .execute_post(Some(serde_json::to_value(&request)?), &self.path("value"))
            .await?;
        Ok(())
    }

    pub async fn double_click(&self) -> Result<()> {
        let payload = TapGestureRequest {
            origin: ElementRef::new(&self.id),
            duration: None,
        };
        self.driver.perform_gesture("double_click", &payload).await
    }

    /// Long-presses the element. `duration` is in seconds, rounded to whole
    /// milliseconds on the wire; the server default applies when `None`.
    pub async fn long_click(&self, duration: Option<f64>) -> Result<()> {
        let payload = TapGestureRequest {
            origin: ElementRef::new(&self.id),
            duration: duration.map(|secs| (secs * 1000.0).round() as i64),
        };
        self.driver.perform_gesture("long_click", &payload).await
    }

    /// Swipes within the element; offsets are relative to its current
    /// top-left corner. The bounds are fetched first, so this is two
    /// requests and the geometry may go stale in between.
    pub async fn swipe(&self, start: Point, end: Point, speed: Option<u32>) -> Result<()> {
        self.swipe_float(start.into(), end.into(), speed).await
    }

    pub async fn swipe_float(&self, start: PointF, end: PointF, speed: Option<u32>) -> Result<()> {
        let rect = self.rect().await?;
        let left = rect.origin.x as f64;
        let top = rect.origin.y as f64;
        self.driver
            .drag_float(
                PointF {
                    x: left + start.x,
                    y: top + start.y,
                },
                PointF {
                    x: left + end.x,
                    y: top + end.y,
                },
                speed,
            )
            .await
    }

    /// Drags the element to an absolute end point.
    pub async fn drag(&self, end: Point, speed: Option<u32>) -> Result<()> {
        self.drag_float(end.into(), speed).await
    }

    pub async fn drag_float(&self, end: PointF, speed: Option<u32>) -> Result<()> {
        self.driver
            .send_drag(&DragRequest {
                origin: ElementRef::new(&self.id),
                start: None,
                end,
                speed,
            })
            .await
    }

    /// Drags this element onto the center of `dest`, located live.
    pub async fn drag_to(&self, dest: &Element<'_>, speed: Option<u32>) -> Result<()> {
        let rect = dest.rect().await?;
        self.drag_float(rect.center(), speed).await
    }

    /// Flings in the direction of `(dx, dy)`. The magnitude only breaks the
    /// axis tie; `speed` is normalized to its absolute value and left to the
    /// server default when zero. The server reports completion in the
    /// response body, and an incomplete fling is an error even on HTTP 200.
    pub async fn flick(&self, dx: i32, dy: i32, speed: i32) -> Result<()> {
        let direction = direction_from_vector(dx, dy)?;
        let payload = FlingRequest {
            origin: ElementRef::new(&self.id),
            direction,
            speed: (speed != 0).then(|| speed.unsigned_abs()),
        };
        let completed = self.driver.gesture_value::<bool>("fling", &payload).await?;
        if completed != Some(true) {
            return Err(Error::GestureIncomplete);
        }
        Ok(())
    }

    /// Swipes within this (scrollable) element until `selector` matches.
    /// `max_swipes` of `None` sends 0, leaving the budget to the server.
    pub async fn scroll_to(&self, selector: &Selector, max_swipes: Option<i32>) -> Result<()> {
        let (strategy, value) = selector.strategy_and_value();
        let payload = ScrollToRequest {
            origin: ElementRef::new(&self.id),
            strategy,
            selector: value,
            max_swipes: max_swipes.unwrap_or(0),
        };
        self.driver.perform_gesture("scroll_to", &payload).await
    }

    /// Scrolls within this element until `dest` is on screen.
    pub async fn scroll_to_element(&self, dest: &Element<'_>) -> Result<()> {
        let path = format!("appium/element/{}/scroll_to/{}", self.id, dest.id);
        self.driver.execute_post(None, &path).await?;
        Ok(())
    }

    pub async fn find_element(&self, selector: &Selector) -> Result<Element<'d>> {
        self.driver.find_scoped(selector, Some(&self.id)).await
    }
}
