//! Tracker configuration, loaded from a JSON file.
//!
//! Every field has a default, so a configuration file only needs to list what it changes:
//!
//! ```json
//! {
//!     "provider": { "max_hands": 1 },
//!     "style": { "bbox_color": "#ffff00" },
//!     "measure": [4, 8]
//! }
//! ```

use std::{fs, io, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{hand::provider::ProviderOptions, image::Color, landmark::LandmarkIdx};

/// Colors and sizes used when drawing onto frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawStyle {
    /// Radius of the circles marking each landmark of an extracted hand.
    pub landmark_radius: u32,
    pub landmark_color: Color,
    /// Distance between the hand's bounding box and the rectangle drawn around it.
    pub bbox_padding: i32,
    pub bbox_color: Color,
    pub bbox_thickness: u32,
    /// Radius of the circles drawn at both ends and the middle of a measured distance.
    pub distance_radius: u32,
    pub distance_thickness: u32,
    pub distance_color: Color,
    pub joint_color: Color,
    pub connection_color: Color,
    /// Line width of the skeleton's bones, also used as radius of its joints.
    pub skeleton_thickness: u32,
    pub fps_color: Color,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            landmark_radius: 5,
            landmark_color: Color::BLACK,
            bbox_padding: 20,
            bbox_color: Color::GREEN,
            bbox_thickness: 2,
            distance_radius: 15,
            distance_thickness: 3,
            distance_color: Color::RED,
            joint_color: Color::RED,
            connection_color: Color::WHITE,
            skeleton_thickness: 2,
            fps_color: Color::MAGENTA,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub provider: ProviderOptions,
    pub style: DrawStyle,
    /// Which of the detected hands to extract geometry from.
    pub hand_index: usize,
    /// Landmark whose pixel position is reported for every frame.
    pub report_landmark: usize,
    /// Pair of landmarks to measure the distance between on every frame.
    pub measure: Option<(usize, usize)>,
    /// Mirror frames horizontally before detection, like a selfie camera.
    pub mirror: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            provider: ProviderOptions::default(),
            style: DrawStyle::default(),
            hand_index: 0,
            report_landmark: LandmarkIdx::ThumbTip.index(),
            measure: None,
            mirror: false,
        }
    }
}

impl TrackerConfig {
    /// Loads the configuration stored at `path`.
    ///
    /// A missing file is not an error; the default configuration is used instead.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("'{}' does not exist, using default configuration", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read '{}'", path.display()))
            }
        };

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse configuration '{}'", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid configuration '{}'", path.display()))?;
        log::debug!("loaded configuration from '{}'", path.display());
        Ok(config)
    }

    /// Writes this configuration to `path` as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("failed to write '{}'", path.display()))
    }

    /// Checks that the provider options are valid and all landmark identifiers exist.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.provider.validate()?;
        LandmarkIdx::from_index(self.report_landmark).context("`report_landmark`")?;
        if let Some((a, b)) = self.measure {
            LandmarkIdx::from_index(a).context("`measure`")?;
            LandmarkIdx::from_index(b).context("`measure`")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file() {
        let config: TrackerConfig = serde_json::from_str(
            r##"{
                "provider": { "max_hands": 1 },
                "style": { "bbox_color": "#ffff00", "bbox_padding": 10 },
                "measure": [4, 8]
            }"##,
        )
        .unwrap();
        assert_eq!(config.provider.max_hands, 1);
        assert_eq!(config.provider.min_detection_confidence, 0.5);
        assert_eq!(config.style.bbox_color, Color::YELLOW);
        assert_eq!(config.style.bbox_padding, 10);
        assert_eq!(config.style.landmark_radius, 5);
        assert_eq!(config.measure, Some((4, 8)));
        assert_eq!(config.report_landmark, 4);
        assert!(!config.mirror);
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrackerConfig::load(dir.path().join("handmarks.json")).unwrap();
        assert_eq!(config, TrackerConfig::default());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("handmarks.json");
        let config = TrackerConfig {
            hand_index: 1,
            mirror: true,
            measure: Some((8, 12)),
            ..TrackerConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(TrackerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn load_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");

        fs::write(&path, "{ not json").unwrap();
        let err = TrackerConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"), "{err}");

        fs::write(&path, r#"{ "measure": [4, 21] }"#).unwrap();
        let err = TrackerConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("invalid configuration"), "{err}");
        assert!(format!("{err:#}").contains("landmark index 21"), "{err:#}");
    }
}
