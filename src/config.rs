//! Validated simulation configuration.
//!
//! A [`Config`] can only be obtained through [`validate`] (or
//! [`Config::preset`], which goes through it), so holding one means the
//! emitter shape and render style are legal for the chosen weather kind and
//! the rate is positive.
//!
//! ```ignore
//! let config = validate(WeatherKind::Rain, 100, EmitterShape::Omni, RenderStyle::Points)?
//!     .with_gravity(9.8)?
//!     .with_seed(7);
//! ```

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::visuals::{RenderHints, RenderStyle};

/// Frames per second of the reference timeline.
pub const FRAME_RATE: f32 = 24.0;

/// Length of the reference timeline in frames.
pub const TIMELINE_FRAMES: u32 = 50;

/// Default maximum particle age: one pass over the reference timeline.
pub const DEFAULT_MAX_AGE: f32 = TIMELINE_FRAMES as f32 / FRAME_RATE;

/// Default emitter position, well above the ground plane.
pub const DEFAULT_ORIGIN: Vec3 = Vec3::new(0.0, 20.0, 0.0);

/// Default RNG seed. Runs are reproducible unless a seed is chosen.
pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;

/// Emission rates offered as presets.
pub const RATE_PRESETS: [u32; 3] = [50, 100, 200];

/// Lowercases a label and drops separators so "Blobby Surface",
/// "blobby_surface" and "blobby-surface" compare equal.
pub(crate) fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Kind of precipitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    /// Fast, straight-falling drops.
    Rain,
    /// Slow, drifting flakes.
    Snow,
}

impl WeatherKind {
    /// Every weather kind.
    pub const ALL: [WeatherKind; 2] = [WeatherKind::Rain, WeatherKind::Snow];

    /// Emitter shapes offered for this kind.
    pub fn allowed_shapes(self) -> &'static [EmitterShape] {
        match self {
            WeatherKind::Rain => &[
                EmitterShape::Omni,
                EmitterShape::Distributed,
                EmitterShape::Volume,
            ],
            WeatherKind::Snow => &[EmitterShape::Distributed],
        }
    }

    /// Render styles offered for this kind.
    pub fn allowed_styles(self) -> &'static [RenderStyle] {
        match self {
            WeatherKind::Rain => &[
                RenderStyle::Points,
                RenderStyle::Sprites,
                RenderStyle::Streak,
            ],
            WeatherKind::Snow => &[
                RenderStyle::Multipoint,
                RenderStyle::Multistreak,
                RenderStyle::Cloud,
            ],
        }
    }

    /// Shape used when none is picked.
    pub fn default_shape(self) -> EmitterShape {
        self.allowed_shapes()[0]
    }

    /// Style used when none is picked.
    pub fn default_style(self) -> RenderStyle {
        self.allowed_styles()[0]
    }

    /// Default gravity magnitude.
    pub fn default_gravity(self) -> f32 {
        match self {
            WeatherKind::Rain => 9.8,
            WeatherKind::Snow => 9.0,
        }
    }

    /// Default linear drag coefficient. Both kinds fall freely so that
    /// particles reach the ground within [`DEFAULT_MAX_AGE`].
    pub fn default_drag(self) -> f32 {
        0.0
    }

    /// Initial downward speed of emitted particles.
    pub fn emission_speed(self) -> f32 {
        match self {
            WeatherKind::Rain => 3.0,
            WeatherKind::Snow => 1.0,
        }
    }

    /// Horizontal velocity jitter as a fraction of the emission speed.
    pub fn horizontal_spread(self) -> f32 {
        match self {
            WeatherKind::Rain => 0.05,
            WeatherKind::Snow => 0.3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            WeatherKind::Rain => "Rain",
            WeatherKind::Snow => "Snow",
        }
    }
}

impl fmt::Display for WeatherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WeatherKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Self::ALL
            .iter()
            .copied()
            .find(|kind| normalize_label(kind.label()) == wanted)
            .ok_or_else(|| ValidationError::UnknownLabel {
                what: "weather kind",
                label: s.to_string(),
            })
    }
}

/// Spatial distribution of spawned particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitterShape {
    /// Everything spawns at the emitter origin.
    Omni,
    /// Spawns across a horizontal square at the origin's height.
    Distributed,
    /// Spawns anywhere inside a flat box around the origin.
    Volume,
}

impl EmitterShape {
    /// Every emitter shape.
    pub const ALL: [EmitterShape; 3] = [
        EmitterShape::Omni,
        EmitterShape::Distributed,
        EmitterShape::Volume,
    ];

    /// Integer value the host animation package uses for this shape.
    pub fn host_index(self) -> u32 {
        match self {
            EmitterShape::Omni => 0,
            EmitterShape::Distributed => 1,
            EmitterShape::Volume => 4,
        }
    }

    fn label(self) -> &'static str {
        match self {
            EmitterShape::Omni => "Omni",
            EmitterShape::Distributed => "Distributed",
            EmitterShape::Volume => "Volume",
        }
    }
}

impl fmt::Display for EmitterShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EmitterShape {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Self::ALL
            .iter()
            .copied()
            .find(|shape| normalize_label(shape.label()) == wanted)
            .ok_or_else(|| ValidationError::UnknownLabel {
                what: "emitter shape",
                label: s.to_string(),
            })
    }
}

/// A validated set of simulation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    kind: WeatherKind,
    rate: u32,
    shape: EmitterShape,
    style: RenderStyle,
    gravity: f32,
    drag: f32,
    wind: Vec3,
    origin: Vec3,
    max_age: f32,
    seed: u64,
}

/// Check a user selection and turn it into a [`Config`].
///
/// Physical parameters start at the weather kind's defaults and can be
/// adjusted with the `with_*` methods afterwards.
pub fn validate(
    kind: WeatherKind,
    rate: i64,
    shape: EmitterShape,
    style: RenderStyle,
) -> Result<Config, ValidationError> {
    if !kind.allowed_shapes().contains(&shape) {
        return Err(ValidationError::ShapeNotAllowed { kind, shape });
    }
    if rate <= 0 {
        return Err(ValidationError::NonPositiveRate(rate));
    }
    let rate = u32::try_from(rate).map_err(|_| ValidationError::RateOutOfRange(rate))?;
    if !kind.allowed_styles().contains(&style) {
        return Err(ValidationError::StyleNotAllowed { kind, style });
    }

    Ok(Config {
        kind,
        rate,
        shape,
        style,
        gravity: kind.default_gravity(),
        drag: kind.default_drag(),
        wind: Vec3::ZERO,
        origin: DEFAULT_ORIGIN,
        max_age: DEFAULT_MAX_AGE,
        seed: DEFAULT_SEED,
    })
}

impl Config {
    /// A valid configuration using the kind's default shape and style.
    pub fn preset(kind: WeatherKind, rate: u32) -> Result<Self, ValidationError> {
        validate(kind, i64::from(rate), kind.default_shape(), kind.default_style())
    }

    /// Set the gravity magnitude.
    pub fn with_gravity(mut self, gravity: f32) -> Result<Self, ValidationError> {
        if !(gravity.is_finite() && gravity > 0.0) {
            return Err(ValidationError::InvalidGravity(gravity));
        }
        self.gravity = gravity;
        Ok(self)
    }

    /// Set the linear drag coefficient (0 disables drag).
    pub fn with_drag(mut self, drag: f32) -> Result<Self, ValidationError> {
        if !(drag.is_finite() && drag >= 0.0) {
            return Err(ValidationError::InvalidDrag(drag));
        }
        self.drag = drag;
        Ok(self)
    }

    /// Set a constant wind acceleration.
    pub fn with_wind(mut self, wind: Vec3) -> Result<Self, ValidationError> {
        if !wind.is_finite() {
            return Err(ValidationError::InvalidWind(wind));
        }
        self.wind = wind;
        Ok(self)
    }

    /// Move the emitter.
    pub fn with_origin(mut self, origin: Vec3) -> Result<Self, ValidationError> {
        if !origin.is_finite() {
            return Err(ValidationError::InvalidOrigin(origin));
        }
        self.origin = origin;
        Ok(self)
    }

    /// Set the age (seconds) past which particles expire.
    pub fn with_max_age(mut self, max_age: f32) -> Result<Self, ValidationError> {
        if !(max_age.is_finite() && max_age > 0.0) {
            return Err(ValidationError::InvalidMaxAge(max_age));
        }
        self.max_age = max_age;
        Ok(self)
    }

    /// Seed the emitter's random number generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Weather kind.
    pub fn kind(&self) -> WeatherKind {
        self.kind
    }

    /// Particles emitted per second.
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Emitter shape.
    pub fn shape(&self) -> EmitterShape {
        self.shape
    }

    /// Render style.
    pub fn style(&self) -> RenderStyle {
        self.style
    }

    /// Gravity magnitude.
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Linear drag coefficient.
    pub fn drag(&self) -> f32 {
        self.drag
    }

    /// Wind acceleration.
    pub fn wind(&self) -> Vec3 {
        self.wind
    }

    /// Emitter origin.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Maximum particle age in seconds.
    pub fn max_age(&self) -> f32 {
        self.max_age
    }

    /// RNG seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Size hints for the selected style.
    pub fn render_hints(&self) -> RenderHints {
        RenderHints::for_style(self.kind, self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rain_accepts_every_shape() {
        for shape in EmitterShape::ALL {
            let config = validate(WeatherKind::Rain, 100, shape, RenderStyle::Points).unwrap();
            assert_eq!(config.shape(), shape);
            assert_eq!(config.rate(), 100);
        }
    }

    #[test]
    fn test_validate_snow_rejects_omni() {
        let err =
            validate(WeatherKind::Snow, 100, EmitterShape::Omni, RenderStyle::Cloud).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ShapeNotAllowed {
                kind: WeatherKind::Snow,
                shape: EmitterShape::Omni,
            }
        );
    }

    #[test]
    fn test_validate_rejects_non_positive_rate() {
        for rate in [0, -1, i64::MIN] {
            let err = validate(WeatherKind::Rain, rate, EmitterShape::Omni, RenderStyle::Points)
                .unwrap_err();
            assert_eq!(err, ValidationError::NonPositiveRate(rate));
        }
        let err = validate(WeatherKind::Rain, i64::MAX, EmitterShape::Omni, RenderStyle::Points)
            .unwrap_err();
        assert_eq!(err, ValidationError::RateOutOfRange(i64::MAX));
    }

    #[test]
    fn test_validate_rejects_foreign_style() {
        let err =
            validate(WeatherKind::Rain, 50, EmitterShape::Omni, RenderStyle::Cloud).unwrap_err();
        assert!(matches!(err, ValidationError::StyleNotAllowed { .. }));

        // Styles nobody offers are rejected for both kinds.
        for kind in WeatherKind::ALL {
            let err = validate(kind, 50, kind.default_shape(), RenderStyle::Numeric).unwrap_err();
            assert!(matches!(err, ValidationError::StyleNotAllowed { .. }));
        }
    }

    #[test]
    fn test_preset_defaults() {
        let rain = Config::preset(WeatherKind::Rain, 100).unwrap();
        assert_eq!(rain.shape(), EmitterShape::Omni);
        assert_eq!(rain.style(), RenderStyle::Points);
        assert_eq!(rain.gravity(), 9.8);
        assert_eq!(rain.origin(), DEFAULT_ORIGIN);
        assert!((rain.max_age() - 50.0 / 24.0).abs() < 1e-6);

        let snow = Config::preset(WeatherKind::Snow, 50).unwrap();
        assert_eq!(snow.shape(), EmitterShape::Distributed);
        assert_eq!(snow.style(), RenderStyle::Multipoint);
        assert_eq!(snow.gravity(), 9.0);
        assert_eq!(snow.drag(), 0.0);
    }

    #[test]
    fn test_rate_presets_validate_for_every_kind() {
        for kind in WeatherKind::ALL {
            for rate in RATE_PRESETS {
                assert_eq!(Config::preset(kind, rate).unwrap().rate(), rate);
            }
        }
    }

    #[test]
    fn test_non_finite_wind_and_origin_are_rejected() {
        let config = Config::preset(WeatherKind::Snow, 100).unwrap();
        let nan_wind = Vec3::new(f32::NAN, 0.0, 0.0);
        assert!(matches!(
            config.clone().with_wind(nan_wind),
            Err(ValidationError::InvalidWind(w)) if w.x.is_nan()
        ));
        let far = Vec3::new(0.0, f32::INFINITY, 0.0);
        assert_eq!(
            config.clone().with_origin(far).unwrap_err(),
            ValidationError::InvalidOrigin(far)
        );

        let moved = config
            .with_wind(Vec3::X)
            .and_then(|c| c.with_origin(Vec3::new(1.0, 5.0, 1.0)))
            .unwrap();
        assert_eq!(moved.wind(), Vec3::X);
        assert_eq!(moved.origin(), Vec3::new(1.0, 5.0, 1.0));
    }

    #[test]
    fn test_snow_emits_slower_than_rain() {
        assert!(WeatherKind::Snow.emission_speed() < WeatherKind::Rain.emission_speed());
    }

    #[test]
    fn test_builder_rejects_bad_physics() {
        let config = Config::preset(WeatherKind::Rain, 100).unwrap();
        assert_eq!(
            config.clone().with_gravity(0.0).unwrap_err(),
            ValidationError::InvalidGravity(0.0)
        );
        assert!(config.clone().with_gravity(f32::NAN).is_err());
        assert!(config.clone().with_drag(-0.1).is_err());
        assert!(config.clone().with_max_age(0.0).is_err());
        assert_eq!(config.with_gravity(3.7).unwrap().gravity(), 3.7);
    }

    #[test]
    fn test_parse_kind_and_shape() {
        assert_eq!("rain".parse::<WeatherKind>(), Ok(WeatherKind::Rain));
        assert_eq!(" Snow".trim().parse::<WeatherKind>(), Ok(WeatherKind::Snow));
        assert_eq!("DISTRIBUTED".parse::<EmitterShape>(), Ok(EmitterShape::Distributed));
        assert!("Hail".parse::<WeatherKind>().is_err());
        assert!("Cone".parse::<EmitterShape>().is_err());
    }

    #[test]
    fn test_shape_host_indices() {
        assert_eq!(EmitterShape::Omni.host_index(), 0);
        assert_eq!(EmitterShape::Distributed.host_index(), 1);
        assert_eq!(EmitterShape::Volume.host_index(), 4);
    }
}
