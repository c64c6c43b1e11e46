use std::str::FromStr;

use crate::foundation::core::{Rect, Size};
use crate::foundation::error::{ChoreoError, ChoreoResult};

/// Scroll direction a tracker measures along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Axis {
    /// Page scroll; element top/bottom against viewport height.
    #[default]
    Vertical,
    /// Horizontal container travel; element left/right against viewport width.
    Horizontal,
}

impl Axis {
    fn span(self, rect: Rect) -> (f64, f64) {
        match self {
            Self::Vertical => (rect.y0, rect.height()),
            Self::Horizontal => (rect.x0, rect.width()),
        }
    }

    /// Viewport extent along this axis.
    pub fn extent(self, viewport: Size) -> f64 {
        match self {
            Self::Vertical => viewport.height,
            Self::Horizontal => viewport.width,
        }
    }
}

/// A point along an element or the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Offset {
    /// Fraction of the extent, in percent (`top` = 0, `center` = 50, `bottom` = 100).
    Percent(f64),
    /// Pixels from the leading edge.
    Px(f64),
}

impl Offset {
    fn at(self, extent: f64) -> f64 {
        match self {
            Self::Percent(p) => extent * p / 100.0,
            Self::Px(px) => px,
        }
    }

    fn parse(token: &str, whole: &str) -> ChoreoResult<Self> {
        let bad = || ChoreoError::invalid_region(format!("bad boundary '{whole}'"));
        match token {
            "top" | "left" => return Ok(Self::Percent(0.0)),
            "center" => return Ok(Self::Percent(50.0)),
            "bottom" | "right" => return Ok(Self::Percent(100.0)),
            _ => {}
        }
        if let Some(p) = token.strip_suffix('%') {
            return p.trim().parse().map(Self::Percent).map_err(|_| bad());
        }
        let px = token.strip_suffix("px").unwrap_or(token);
        px.trim().parse().map(Self::Px).map_err(|_| bad())
    }
}

/// A region boundary: where along the scroll axis a region starts or ends.
#[derive(Clone, Debug, PartialEq)]
pub enum Boundary {
    /// `"<element-edge> <viewport-edge>"`: reached when that element point meets that viewport
    /// point. A lone edge meets the viewport's leading edge.
    Edges {
        /// Point on the anchor element.
        element: Offset,
        /// Point on the viewport.
        viewport: Offset,
    },
    /// `"+=N"`: relative to the resolved start (percentages are of the viewport extent).
    Relative(Offset),
    /// A plain scroll position in pixels.
    Absolute(f64),
}

impl FromStr for Boundary {
    type Err = ChoreoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(rest) = trimmed.strip_prefix("+=") {
            return Offset::parse(rest.trim(), s).map(Self::Relative);
        }
        if let Ok(v) = trimmed.parse::<f64>() {
            return Ok(Self::Absolute(v));
        }
        let mut parts = trimmed.split_whitespace();
        let (Some(el), vp, None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ChoreoError::invalid_region(format!("bad boundary '{s}'")));
        };
        Ok(Self::Edges {
            element: Offset::parse(el, s)?,
            viewport: match vp {
                Some(vp) => Offset::parse(vp, s)?,
                None => Offset::Percent(0.0),
            },
        })
    }
}

impl Boundary {
    /// Resolve to a scroll position along `axis`.
    ///
    /// `anchor` is the element's layout rect; without one the whole scrollable document
    /// (`[0, scroll_limit + viewport]`) stands in. `start` is the resolved start, used by
    /// relative ends.
    pub fn resolve(
        &self,
        anchor: Option<Rect>,
        axis: Axis,
        viewport: Size,
        scroll_limit: f64,
        start: f64,
    ) -> f64 {
        let vp_extent = axis.extent(viewport);
        match self {
            Self::Absolute(v) => *v,
            Self::Relative(off) => start + off.at(vp_extent),
            Self::Edges { element, viewport } => {
                let (lead, extent) = match anchor {
                    Some(rect) => axis.span(rect),
                    None => (0.0, scroll_limit + vp_extent),
                };
                lead + element.at(extent) - viewport.at(vp_extent)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/boundary.rs"]
mod tests;
