//! Client for Appium uiautomator2-compatible automation servers.
//!
//! The crate covers locating elements, reading their geometry and text, and
//! driving them through synthesized gestures (click, drag, swipe, fling) and
//! server-side scheduled actions — named, repeating step sequences the
//! server executes on its own and reports back through history polls.
//!
//! Every operation is one awaited request/response exchange; retry and
//! deadline policy belong to the [`Transport`] or the caller.

mod driver;
mod element;
mod error;
mod geometry;
mod gesture;
mod schedule;
mod selector;
mod transport;

pub use driver::Driver;
pub use element::Element;
pub use error::{Error, Result};
pub use geometry::{Point, PointF, Rect, RectF, Size};
pub use gesture::GestureDirection;
pub use schedule::{
    ActionHistory, ActionStepException, ActionStepResult, ScheduledAction, ScheduledActionStep,
};
pub use selector::Selector;
pub use transport::{HttpTransport, Transport};

pub use reqwest::StatusCode;
