use serde::{Deserialize, Serialize};

/// Device-pixel coordinates as the server reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Sub-pixel coordinates for gesture math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for PointF {
    fn from(p: Point) -> Self {
        Self {
            x: p.x as f64,
            y: p.y as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// Element bounds: top-left corner plus extent. The wire shape is the flat
/// `{x, y, width, height}` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    #[serde(flatten)]
    pub origin: Point,
    #[serde(flatten)]
    pub size: Size,
}

impl Rect {
    /// Center point, integer midpoint before widening.
    pub fn center(&self) -> PointF {
        PointF {
            x: (self.origin.x + self.size.width / 2) as f64,
            y: (self.origin.y + self.size.height / 2) as f64,
        }
    }
}

/// Floating-point rectangle in the shape the gesture endpoints accept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectF {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl RectF {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

impl From<Size> for RectF {
    fn from(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width as f64, size.height as f64)
    }
}

impl From<Rect> for RectF {
    fn from(rect: Rect) -> Self {
        Self::new(
            rect.origin.x as f64,
            rect.origin.y as f64,
            rect.size.width as f64,
            rect.size.height as f64,
        )
    }
}
