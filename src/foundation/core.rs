use std::fmt;

use smallvec::SmallVec;

pub use kurbo::{Point, Rect, Size, Vec2};

/// Opaque handle to an element owned by the renderer surface.
///
/// The engine never owns the element; a handle whose element disappeared is simply skipped.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TargetId(pub u32);

/// Color channel. `R`, `G`, `B` are in `[0, 255]`, `A` is in `[0, 1]`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Red.
    R,
    /// Green.
    G,
    /// Blue.
    B,
    /// Alpha.
    A,
}

impl Channel {
    /// All channels in `r, g, b, a` order.
    pub const ALL: [Channel; 4] = [Channel::R, Channel::G, Channel::B, Channel::A];
}

/// A visual property the engine can write to a target.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    /// Horizontal translation in pixels.
    X,
    /// Vertical translation in pixels.
    Y,
    /// Horizontal translation as a percentage of the target's own width.
    XPercent,
    /// Vertical translation as a percentage of the target's own height.
    YPercent,
    /// Uniform scale.
    Scale,
    /// Horizontal scale.
    ScaleX,
    /// Vertical scale.
    ScaleY,
    /// 2D rotation in degrees.
    Rotation,
    /// Rotation around the X axis in degrees.
    RotationX,
    /// Rotation around the Y axis in degrees.
    RotationY,
    /// Horizontal skew in degrees.
    SkewX,
    /// Vertical skew in degrees.
    SkewY,
    /// Opacity in `[0, 1]`.
    Opacity,
    /// Blur radius in pixels.
    Blur,
    /// Letter spacing (unit chosen by the renderer).
    LetterSpacing,
    /// Foreground color channel.
    Color(Channel),
    /// Background color channel.
    BackgroundColor(Channel),
    /// Top clip inset in percent.
    ClipTop,
    /// Right clip inset in percent.
    ClipRight,
    /// Bottom clip inset in percent.
    ClipBottom,
    /// Left clip inset in percent.
    ClipLeft,
    /// Vertical compensation written while a pinned region is active.
    PinOffset,
    /// Text content (discrete).
    Text,
}

impl Property {
    /// Discrete properties switch at completion instead of interpolating.
    pub fn is_discrete(self) -> bool {
        matches!(self, Self::Text)
    }

    /// Value assumed when neither the engine cache nor the surface knows the property.
    pub fn default_value(self) -> Value {
        match self {
            Self::Scale | Self::ScaleX | Self::ScaleY | Self::Opacity => Value::Number(1.0),
            Self::Color(Channel::A) | Self::BackgroundColor(Channel::A) => Value::Number(1.0),
            Self::Text => Value::Text(String::new()),
            _ => Value::Number(0.0),
        }
    }

    /// Parse a plain scalar property name (`"x"`, `"opacity"`, `"skewY"`, `"rotate"`, ...).
    ///
    /// Compound CSS properties (`color`, `filter`, `clipPath`) are expanded by the config layer.
    pub fn parse(name: &str) -> Option<Self> {
        let p = match name {
            "x" => Self::X,
            "y" => Self::Y,
            "xPercent" => Self::XPercent,
            "yPercent" => Self::YPercent,
            "scale" => Self::Scale,
            "scaleX" => Self::ScaleX,
            "scaleY" => Self::ScaleY,
            "rotation" | "rotate" => Self::Rotation,
            "rotationX" | "rotateX" => Self::RotationX,
            "rotationY" | "rotateY" => Self::RotationY,
            "skewX" => Self::SkewX,
            "skewY" => Self::SkewY,
            "opacity" | "autoAlpha" => Self::Opacity,
            "blur" => Self::Blur,
            "letterSpacing" => Self::LetterSpacing,
            "clipTop" => Self::ClipTop,
            "clipRight" => Self::ClipRight,
            "clipBottom" => Self::ClipBottom,
            "clipLeft" => Self::ClipLeft,
            "pinOffset" => Self::PinOffset,
            "text" | "innerText" => Self::Text,
            _ => return None,
        };
        Some(p)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(c) => write!(f, "color.{c:?}"),
            Self::BackgroundColor(c) => write!(f, "backgroundColor.{c:?}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Current or target value of a property.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Continuous value.
    Number(f64),
    /// Discrete text value.
    Text(String),
}

impl Value {
    /// Numeric payload, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }

    /// Interpolate towards `to` with eased factor `t` (may lie outside `[0, 1]`).
    ///
    /// Numbers interpolate linearly; anything else holds `self` until `t >= 1`.
    pub fn interpolate(&self, to: &Value, t: f64) -> Value {
        match (self, to) {
            (Self::Number(a), Self::Number(b)) => Self::Number(crate::foundation::math::lerp(*a, *b, t)),
            _ => {
                if t >= 1.0 {
                    to.clone()
                } else {
                    self.clone()
                }
            }
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Small ordered property mapping. Later entries for the same property win on write.
pub type PropMap = SmallVec<[(Property, Value); 4]>;

/// Straight (non-premultiplied) RGBA color used to expand color properties.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    /// Red in `[0, 255]`.
    pub r: f64,
    /// Green in `[0, 255]`.
    pub g: f64,
    /// Blue in `[0, 255]`.
    pub b: f64,
    /// Alpha in `[0, 1]`.
    pub a: f64,
}

impl Rgba {
    /// Build a color from channel values.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Expand into four channel properties using `prop` (e.g. `Property::Color`).
    pub fn channels(self, prop: fn(Channel) -> Property) -> [(Property, Value); 4] {
        [
            (prop(Channel::R), Value::Number(self.r)),
            (prop(Channel::G), Value::Number(self.g)),
            (prop(Channel::B), Value::Number(self.b)),
            (prop(Channel::A), Value::Number(self.a)),
        ]
    }
}
