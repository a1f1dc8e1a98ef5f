//! Render styles and render hints for weather particles.
//!
//! The simulation never draws anything itself. It carries the selected
//! [`RenderStyle`] through to its output so a renderer downstream knows how
//! each particle should be drawn.
//!
//! # Styles
//!
//! | Style | Host index | Rain | Snow |
//! |-------|-----------:|:----:|:----:|
//! | [`RenderStyle::Multipoint`] | 0 | | yes |
//! | [`RenderStyle::Multistreak`] | 1 | | yes |
//! | [`RenderStyle::Numeric`] | 2 | | |
//! | [`RenderStyle::Points`] | 3 | yes | |
//! | [`RenderStyle::Spheres`] | 4 | | |
//! | [`RenderStyle::Sprites`] | 5 | yes | |
//! | [`RenderStyle::Streak`] | 6 | yes | |
//! | [`RenderStyle::BlobbySurface`] | 7 | | |
//! | [`RenderStyle::Cloud`] | 8 | | yes |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{normalize_label, WeatherKind};
use crate::error::ValidationError;

/// How a particle is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStyle {
    /// Several points per particle.
    Multipoint,
    /// Several short streaks per particle.
    Multistreak,
    /// Particle index drawn as text.
    Numeric,
    /// Single point.
    Points,
    /// Shaded sphere.
    Spheres,
    /// Camera-facing textured quad.
    Sprites,
    /// Motion streak along the velocity.
    Streak,
    /// Metaball surface.
    BlobbySurface,
    /// Soft volumetric puff.
    Cloud,
}

impl RenderStyle {
    /// Every style, in host index order.
    pub const ALL: [RenderStyle; 9] = [
        RenderStyle::Multipoint,
        RenderStyle::Multistreak,
        RenderStyle::Numeric,
        RenderStyle::Points,
        RenderStyle::Spheres,
        RenderStyle::Sprites,
        RenderStyle::Streak,
        RenderStyle::BlobbySurface,
        RenderStyle::Cloud,
    ];

    /// Integer value the host animation package uses for this style.
    pub fn host_index(self) -> u32 {
        match self {
            RenderStyle::Multipoint => 0,
            RenderStyle::Multistreak => 1,
            RenderStyle::Numeric => 2,
            RenderStyle::Points => 3,
            RenderStyle::Spheres => 4,
            RenderStyle::Sprites => 5,
            RenderStyle::Streak => 6,
            RenderStyle::BlobbySurface => 7,
            RenderStyle::Cloud => 8,
        }
    }

    /// Look up a style by host index.
    pub fn from_host_index(index: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.host_index() == index)
    }

    /// Human-readable label, as shown in menus.
    pub fn label(self) -> &'static str {
        match self {
            RenderStyle::Multipoint => "Multipoint",
            RenderStyle::Multistreak => "Multistreak",
            RenderStyle::Numeric => "Numeric",
            RenderStyle::Points => "Points",
            RenderStyle::Spheres => "Spheres",
            RenderStyle::Sprites => "Sprites",
            RenderStyle::Streak => "Streak",
            RenderStyle::BlobbySurface => "Blobby Surface",
            RenderStyle::Cloud => "Cloud",
        }
    }
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RenderStyle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Self::ALL
            .iter()
            .copied()
            .find(|style| normalize_label(style.label()) == wanted)
            .ok_or_else(|| ValidationError::UnknownLabel {
                what: "render style",
                label: s.to_string(),
            })
    }
}

/// Size hints passed along with the render style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderHints {
    /// Upper bound on the drawn particle radius.
    pub max_radius: f32,
    /// Scale applied to every particle radius.
    pub radius_multiplier: f32,
}

impl Default for RenderHints {
    fn default() -> Self {
        Self {
            max_radius: 1.0,
            radius_multiplier: 1.0,
        }
    }
}

impl RenderHints {
    /// Hints for a weather kind drawn with a given style.
    ///
    /// Rain sprites are drawn much smaller than the sprite default, otherwise
    /// they read as hail.
    pub fn for_style(kind: WeatherKind, style: RenderStyle) -> Self {
        match (kind, style) {
            (WeatherKind::Rain, RenderStyle::Sprites) => Self {
                max_radius: 2.0,
                radius_multiplier: 0.1,
            },
            _ => Self::default(),
        }
    }
}
