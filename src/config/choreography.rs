use crate::animation::tween::{Overwrite, TweenSpec};
use crate::config::values::{PropsDef, expand_props};
use crate::engine::EngineOptions;
use crate::foundation::core::TargetId;
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::scroll::scrub::SnapSpec;
use crate::scroll::trigger::{Scrub, TriggerSpec};

/// A whole page's choreography: engine options plus effects registered in document order.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ChoreographyDef {
    /// Options a host may use to construct the [`crate::Engine`].
    #[serde(default)]
    pub options: EngineOptions,
    /// Effects, registered in order. Horizontal containers must precede regions nested in them.
    #[serde(default)]
    pub effects: Vec<EffectDef>,
}

impl ChoreographyDef {
    /// Parse a JSON document.
    pub fn from_json(s: &str) -> ChoreoResult<Self> {
        serde_json::from_str(s).map_err(|e| ChoreoError::serde(e.to_string()))
    }
}

/// One entry of [`ChoreographyDef::effects`], tagged by `"type"`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EffectDef {
    /// Immediate writes.
    Set(SetDef),
    /// One tween per matched target, optionally scroll-controlled.
    Tween(TweenDef),
    /// A timeline of positioned children, optionally scroll-controlled.
    Timeline(TimelineDef),
    /// A region that only schedules tweens when entered.
    Trigger(TriggerDef),
    /// A horizontal pin-scroll container.
    Horizontal(HorizontalDef),
    /// Scroll-speed transform.
    Velocity(VelocityDef),
    /// Pointer follower.
    Cursor(CursorDef),
    /// Text reveal.
    Decrypt(DecryptDef),
    /// Pointer reactions, one per matched element.
    Hover(HoverDef),
}

impl EffectDef {
    /// Short name used in logs and load reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Set(_) => "set",
            Self::Tween(_) => "tween",
            Self::Timeline(_) => "timeline",
            Self::Trigger(_) => "trigger",
            Self::Horizontal(_) => "horizontal",
            Self::Velocity(_) => "velocity",
            Self::Cursor(_) => "cursor",
            Self::Decrypt(_) => "decrypt",
            Self::Hover(_) => "hover",
        }
    }
}

/// Immediate property writes, like an authored style.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SetDef {
    /// Selector.
    pub targets: String,
    /// Values written.
    pub props: PropsDef,
}

/// `true`/`false` or `"none" | "all" | "auto"`.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum OverwriteDef {
    /// `true` is [`Overwrite::All`], `false` is [`Overwrite::None`].
    Flag(bool),
    /// An explicit mode.
    Mode(Overwrite),
}

impl Default for OverwriteDef {
    fn default() -> Self {
        Self::Mode(Overwrite::None)
    }
}

impl From<OverwriteDef> for Overwrite {
    fn from(v: OverwriteDef) -> Self {
        match v {
            OverwriteDef::Flag(b) => b.into(),
            OverwriteDef::Mode(m) => m,
        }
    }
}

/// A tween applied to every match of a selector.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweenDef {
    /// Selector; `"$self"` and `"$follow"` are meaningful inside hover reactions.
    pub targets: String,
    /// End values.
    #[serde(default)]
    pub to: PropsDef,
    /// Start values, written as soon as the tween is registered.
    #[serde(default)]
    pub from: Option<PropsDef>,
    /// Seconds; 0.5 when omitted.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Ease name such as `"power3.out"` or `"elastic.out(1, 0.5)"`.
    #[serde(default)]
    pub ease: Option<String>,
    /// Seconds before the tween starts.
    #[serde(default)]
    pub delay: f64,
    /// Seconds between consecutive targets.
    #[serde(default)]
    pub stagger: f64,
    /// How the tween treats others writing the same properties.
    #[serde(default)]
    pub overwrite: OverwriteDef,
    /// Hand playback to a scroll region.
    #[serde(default)]
    pub scroll_trigger: Option<ScrollTriggerDef>,
}

impl TweenDef {
    /// Tween parameters aimed at `target`, ignoring selector and stagger.
    pub fn spec(&self, target: TargetId) -> ChoreoResult<TweenSpec> {
        let mut spec = TweenSpec::new(target).delay(self.delay).overwrite(self.overwrite);
        if let Some(d) = self.duration {
            spec = spec.duration(d);
        }
        if let Some(ease) = &self.ease {
            spec = spec.ease(ease.parse()?);
        }
        spec.to = expand_props(&self.to)?;
        if let Some(from) = &self.from {
            spec.from = Some(expand_props(from)?);
        }
        Ok(spec)
    }
}

/// `true` (direct), `false` (off) or a lag in seconds.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ScrubDef {
    /// Direct or off.
    Flag(bool),
    /// Smoothed catch-up in seconds.
    Lag(f64),
}

impl From<ScrubDef> for Scrub {
    fn from(v: ScrubDef) -> Self {
        match v {
            ScrubDef::Flag(true) => Scrub::Direct,
            ScrubDef::Flag(false) => Scrub::Off,
            ScrubDef::Lag(lag) => Scrub::from_lag(lag),
        }
    }
}

/// `false` (off), `true` (container default) or an increment.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum SnapDef {
    /// Off, or the container's own increment.
    Flag(bool),
    /// Progress step.
    Increment(f64),
}

/// Scroll region options.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollTriggerDef {
    /// Anchor selector. Omitted: each target anchors its own region.
    #[serde(default)]
    pub trigger: Option<String>,
    /// Pair the i-th anchor match with the i-th target instead of anchoring one group region.
    #[serde(default)]
    pub each: bool,
    /// Start boundary, e.g. `"top 80%"`.
    #[serde(default)]
    pub start: Option<String>,
    /// End boundary, e.g. `"bottom top"` or `"+=500"`.
    #[serde(default)]
    pub end: Option<String>,
    /// Hold the anchor in place while the region is active.
    #[serde(default)]
    pub pin: bool,
    /// Tie playback to scroll position.
    #[serde(default)]
    pub scrub: Option<ScrubDef>,
    /// Snap increment.
    #[serde(default)]
    pub snap: Option<SnapDef>,
    /// Four actions, e.g. `"play none none reverse"`.
    #[serde(default)]
    pub toggle_actions: Option<String>,
    /// Name of a horizontal container to measure along.
    #[serde(default)]
    pub container_animation: Option<String>,
}

impl ScrollTriggerDef {
    /// Region parameters for `anchor`; the container is attached by the loader.
    pub fn region(&self, anchor: Option<TargetId>) -> ChoreoResult<TriggerSpec> {
        let mut spec = TriggerSpec {
            anchor,
            pin: self.pin,
            ..TriggerSpec::default()
        };
        if let Some(s) = &self.start {
            spec.start = Some(s.parse()?);
        }
        if let Some(e) = &self.end {
            spec.end = Some(e.parse()?);
        }
        if let Some(scrub) = self.scrub {
            spec.scrub = scrub.into();
        }
        spec.snap = match self.snap {
            Some(SnapDef::Increment(i)) => Some(SnapSpec::new(i)),
            Some(SnapDef::Flag(true)) => {
                return Err(ChoreoError::invalid_region(
                    "snap: true needs an increment outside horizontal containers",
                ));
            }
            _ => None,
        };
        if let Some(actions) = &self.toggle_actions {
            spec.toggle_actions = actions.parse()?;
        }
        Ok(spec)
    }
}

/// Values inherited by timeline children.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct TimelineDefaultsDef {
    /// Ease for children without their own.
    #[serde(default)]
    pub ease: Option<String>,
}

/// A positioned timeline child.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TimelineChildDef {
    /// Tween fields; `scrollTrigger` is ignored here.
    #[serde(flatten)]
    pub tween: TweenDef,
    /// Position string (`"-=1.5"`, `"<"`, `"intro+=0.2"`, ...); empty appends.
    #[serde(default)]
    pub position: String,
    /// Name the child's start so later children can refer to it.
    #[serde(default)]
    pub label: Option<String>,
}

/// A timeline built from positioned children.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDef {
    /// Inherited child values.
    #[serde(default)]
    pub defaults: TimelineDefaultsDef,
    /// Children in insertion order.
    pub children: Vec<TimelineChildDef>,
    /// Hand playback to a scroll region.
    #[serde(default)]
    pub scroll_trigger: Option<ScrollTriggerDef>,
}

/// A bare region whose forward entry schedules tweens.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerDef {
    /// Region options.
    #[serde(flatten)]
    pub region: ScrollTriggerDef,
    /// Tweens scheduled on every forward entry.
    #[serde(default)]
    pub on_enter: Vec<TweenDef>,
}

/// Horizontal pin-scroll container.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HorizontalDef {
    /// Name nested regions use in `containerAnimation`.
    pub name: String,
    /// Pinned viewport-sized element.
    pub wrapper: String,
    /// Element holding the panels side by side.
    pub track: String,
    /// Panels, in order.
    pub panels: String,
    /// Defaults to a one second lag.
    #[serde(default)]
    pub scrub: Option<ScrubDef>,
    /// Defaults to one stop per panel.
    #[serde(default)]
    pub snap: Option<SnapDef>,
}

/// Scroll-speed transform; omitted fields keep the skew defaults.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct VelocityDef {
    /// Selector.
    pub targets: String,
    /// Property name.
    #[serde(default)]
    pub property: Option<String>,
    /// Velocity per unit of property.
    #[serde(default)]
    pub divisor: Option<f64>,
    /// Largest magnitude.
    #[serde(default)]
    pub max: Option<f64>,
    /// Decay seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Decay ease.
    #[serde(default)]
    pub ease: Option<String>,
}

/// Pointer follower layers.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorDef {
    /// Fast layer selector.
    #[serde(default)]
    pub dot: Option<String>,
    /// Trailing layer selector.
    #[serde(default)]
    pub aura: Option<String>,
    /// Aura smoothing per reference frame.
    #[serde(default)]
    pub base_factor: Option<f64>,
    /// Dot tween seconds.
    #[serde(default)]
    pub dot_duration: Option<f64>,
}

/// Text reveal.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptDef {
    /// Selector of the text element.
    pub target: String,
    /// Final text.
    pub text: String,
    /// Filler characters.
    #[serde(default)]
    pub alphabet: Option<String>,
    /// Seconds per tick.
    #[serde(default)]
    pub interval: Option<f64>,
    /// Characters revealed per tick.
    #[serde(default)]
    pub rate: Option<f64>,
    /// Start on region entry instead of at load. Without `trigger`, the target anchors it.
    #[serde(default)]
    pub scroll_trigger: Option<ScrollTriggerDef>,
}

/// Pointer offset to property mapping.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerMappingDef {
    /// Property name.
    pub property: String,
    /// `"x"` or `"y"`.
    pub axis: crate::effects::hover::PointerAxis,
    /// Multiplier.
    pub scale: f64,
    /// Measure in half extents instead of pixels.
    #[serde(default)]
    pub normalized: bool,
}

/// Pointer reactions.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverDef {
    /// Hit areas; one reaction set per match.
    pub targets: String,
    /// Elements that follow the pointer, paired with `targets` by index.
    #[serde(default)]
    pub follow_target: Option<String>,
    /// Mappings applied to the follow target while the pointer moves inside.
    #[serde(default)]
    pub follow: Vec<PointerMappingDef>,
    /// Follow tween seconds.
    #[serde(default)]
    pub follow_duration: Option<f64>,
    /// Follow tween ease.
    #[serde(default)]
    pub follow_ease: Option<String>,
    /// Tweens scheduled when the pointer enters.
    #[serde(default)]
    pub on_enter: Vec<TweenDef>,
    /// Tweens scheduled on every move inside.
    #[serde(default)]
    pub on_move: Vec<TweenDef>,
    /// Tweens scheduled when the pointer leaves.
    #[serde(default)]
    pub on_leave: Vec<TweenDef>,
}

#[cfg(test)]
#[path = "../../tests/unit/config/choreography.rs"]
mod tests;
