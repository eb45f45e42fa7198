use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::element::Element;
use crate::error::Result;
use crate::geometry::{Point, PointF, RectF, Size};
use crate::gesture::{DragRequest, ElementId};
use crate::selector::Selector;
use crate::transport::{HttpTransport, Transport, decode_reply};

/// Handle to one automation session on a remote uiautomator2 server.
///
/// All operations are plain request/response exchanges: nothing here spawns
/// tasks, registers callbacks, or polls in the background. The handle is
/// immutable, so concurrent calls are as safe as the server makes them.
pub struct Driver {
    transport: Arc<dyn Transport>,
    session_id: String,
}

#[derive(Serialize)]
struct NewSessionRequest {
    capabilities: Value,
}

#[derive(Deserialize)]
struct NewSessionReply {
    #[serde(rename = "sessionId")]
    session_id: String,
}

#[derive(Serialize)]
struct FindRequest<'a> {
    strategy: &'static str,
    selector: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
}

impl Driver {
    /// Opens a new session against `base_url`.
    pub async fn connect(base_url: &str) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(base_url));
        let request = NewSessionRequest {
            capabilities: serde_json::json!({ "alwaysMatch": {} }),
        };
        let raw = transport
            .post("session", Some(serde_json::to_value(&request)?))
            .await?;
        let reply: NewSessionReply = decode_reply(&raw)?;
        Ok(Self {
            transport,
            session_id: reply.session_id,
        })
    }

    /// Adopts a session created elsewhere.
    pub fn attach(base_url: &str, session_id: &str) -> Self {
        Self::with_transport(Arc::new(HttpTransport::new(base_url)), session_id)
    }

    /// Builds a driver over a caller-supplied transport.
    pub fn with_transport(transport: Arc<dyn Transport>, session_id: &str) -> Self {
        Self {
            transport,
            session_id: session_id.to_string(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Ends the session on the server.
    pub async fn quit(self) -> Result<()> {
        self.transport
            .delete(&format!("session/{}", self.session_id))
            .await?;
        Ok(())
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn session_path(&self, suffix: &str) -> String {
        format!("session/{}/{suffix}", self.session_id)
    }

    pub(crate) async fn execute_get(&self, suffix: &str) -> Result<Bytes> {
        self.transport.get(&self.session_path(suffix)).await
    }

    pub(crate) async fn execute_post(&self, payload: Option<Value>, suffix: &str) -> Result<Bytes> {
        self.transport.post(&self.session_path(suffix), payload).await
    }

    pub async fn find_element(&self, selector: &Selector) -> Result<Element<'_>> {
        self.find_scoped(selector, None).await
    }

    pub async fn find_elements(&self, selector: &Selector) -> Result<Vec<Element<'_>>> {
        let raw = self
            .execute_post(Some(find_payload(selector, None)?), "elements")
            .await?;
        let ids: Vec<ElementId> = decode_reply(&raw)?;
        ids.into_iter()
            .map(|id| Ok(Element::new(self, id.into_id()?)))
            .collect()
    }

    pub(crate) async fn find_scoped(
        &self,
        selector: &Selector,
        context: Option<&str>,
    ) -> Result<Element<'_>> {
        let raw = self
            .execute_post(Some(find_payload(selector, context)?), "element")
            .await?;
        let id: ElementId = decode_reply(&raw)?;
        Ok(Element::new(self, id.into_id()?))
    }

    /// Reports the device screen size.
    pub async fn device_size(&self) -> Result<Size> {
        let raw = self.execute_get("window/current/size").await?;
        decode_reply(&raw)
    }

    /// Whole-screen area in the shape the gesture endpoints accept.
    pub async fn screen_area(&self) -> Result<RectF> {
        Ok(RectF::from(self.device_size().await?))
    }

    /// Drags between two absolute screen points. `speed` is left to the
    /// server default when `None`.
    pub async fn drag(&self, start: Point, end: Point, speed: Option<u32>) -> Result<()> {
        self.drag_float(start.into(), end.into(), speed).await
    }

    pub async fn drag_float(&self, start: PointF, end: PointF, speed: Option<u32>) -> Result<()> {
        self.send_drag(&DragRequest {
            origin: None,
            start: Some(start),
            end,
            speed,
        })
        .await
    }

    pub(crate) async fn send_drag(&self, request: &DragRequest) -> Result<()> {
        self.perform_gesture("drag", request).await
    }
}

fn find_payload(selector: &Selector, context: Option<&str>) -> Result<Value> {
    let (strategy, value) = selector.strategy_and_value();
    Ok(serde_json::to_value(&FindRequest {
        strategy,
        selector: value,
        context,
    })?)
}
