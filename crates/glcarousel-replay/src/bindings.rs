use carouselconfig::{GestureSettings, SettleCurveSetting, ViewportSettings};
use glcarousel::{GestureTuning, SettleCurve, Viewport};

pub fn map_settle_curve(setting: SettleCurveSetting) -> SettleCurve {
    match setting {
        SettleCurveSetting::Linear => SettleCurve::Linear,
        SettleCurveSetting::Smoothstep => SettleCurve::Smoothstep,
        SettleCurveSetting::EaseInOut => SettleCurve::EaseInOut,
    }
}

pub fn gesture_tuning(settings: &GestureSettings) -> GestureTuning {
    GestureTuning {
        settle_duration: settings.settle_duration,
        activation_threshold: settings.activation_threshold,
        snap_deceleration: settings.snap_deceleration,
        settle_curve: map_settle_curve(settings.settle_curve),
    }
}

/// Configured viewport, replaced by `--size` when given.
pub fn resolve_viewport(configured: ViewportSettings, size: Option<(u32, u32)>) -> Viewport {
    match size {
        Some((width, height)) => Viewport::new(width as f32, height as f32),
        None => Viewport::new(configured.width, configured.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_settings_match_library_defaults() {
        assert_eq!(
            gesture_tuning(&GestureSettings::default()),
            GestureTuning::default()
        );
    }

    #[test]
    fn custom_settings_are_carried_over() {
        let settings = GestureSettings {
            settle_duration: Duration::from_millis(40),
            activation_threshold: 12.0,
            snap_deceleration: 0.5,
            settle_curve: SettleCurveSetting::Linear,
        };
        let tuning = gesture_tuning(&settings);
        assert_eq!(tuning.settle_duration, Duration::from_millis(40));
        assert_eq!(tuning.activation_threshold, 12.0);
        assert_eq!(tuning.snap_deceleration, 0.5);
        assert_eq!(tuning.settle_curve, SettleCurve::Linear);
    }

    #[test]
    fn size_override_wins() {
        let configured = ViewportSettings {
            width: 1080.0,
            height: 1920.0,
        };
        assert_eq!(
            resolve_viewport(configured, None),
            Viewport::new(1080.0, 1920.0)
        );
        assert_eq!(
            resolve_viewport(configured, Some((32, 18))),
            Viewport::new(32.0, 18.0)
        );
    }
}
