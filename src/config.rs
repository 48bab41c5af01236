use crate::scroll::{Edge, TriggerPosition};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Which flavour of decoration the page uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub(crate) enum Variant {
    /// A handful of solid blocks that spin in turns.
    #[default]
    Blocks,
    /// Many soft blobs drifting around, plus a dot following the pointer.
    Blobs,
}

impl Variant {
    pub(crate) fn default_block_count(self) -> usize {
        match self {
            Self::Blocks => 7,
            Self::Blobs => 35,
        }
    }
}

/// Where the greeting has to be for the page to switch phases.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TriggerConfig {
    /// Crossing this while scrolling down shows the profile; crossing it back up hides it.
    pub start: TriggerPosition,
    /// The end of the trigger's active range.
    pub end: TriggerPosition,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            start: TriggerPosition::new(Edge::Bottom, Edge::Center),
            end: TriggerPosition::new(Edge::Bottom, Edge::Top),
        }
    }
}

/// Everything that can be customized about the page.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub variant: Variant,

    /// The text shown before scrolling.
    pub greeting: String,

    pub name: String,

    pub roles: Vec<String>,

    /// FIGlet font used for the greeting and name banners.
    pub font: String,

    /// Number of decorative blocks. Defaults depend on the variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<usize>,

    /// Seed for block placement and motion. Random if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    pub fps: u32,

    /// Draw the trigger thresholds.
    pub markers: bool,

    /// Seconds the pointer marker takes to catch up with the pointer.
    pub pointer_smoothing: f64,

    pub trigger: TriggerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            greeting: "Hello There".into(),
            name: "I'm Fulton Browne".into(),
            roles: vec!["software engineer".into(), "photographer".into(), "hiker".into()],
            font: "standard".into(),
            blocks: None,
            seed: None,
            fps: 30,
            markers: false,
            pointer_smoothing: 0.3,
            trigger: TriggerConfig::default(),
        }
    }
}

impl Config {
    const MAX_FPS: u32 = 120;
    const MAX_BLOCKS: usize = 200;

    /// Load the config at `path`, or the one in the default location if there's no path.
    ///
    /// A missing file at the default location just means defaults.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::read(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn default_path() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "folio")?;
        Some(dirs.config_dir().join("config.yaml"))
    }

    pub(crate) fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        // an empty file is a valid, all-defaults config
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        tracing::debug!("loaded config from {}", path.display());
        Self::from_yaml(&contents)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 || self.fps > Self::MAX_FPS {
            return Err(ConfigError::Invalid(format!("fps must be between 1 and {}, got {}", Self::MAX_FPS, self.fps)));
        }
        if self.block_count() > Self::MAX_BLOCKS {
            return Err(ConfigError::Invalid(format!(
                "at most {} blocks are supported, got {}",
                Self::MAX_BLOCKS,
                self.block_count()
            )));
        }
        if !self.pointer_smoothing.is_finite() || self.pointer_smoothing < 0.0 {
            return Err(ConfigError::Invalid("pointer_smoothing must be a non negative number".into()));
        }
        Ok(())
    }

    pub(crate) fn block_count(&self) -> usize {
        self.blocks.unwrap_or_else(|| self.variant.default_block_count())
    }

    pub(crate) fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("reading {0}: {1}")]
    Io(PathBuf, io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn empty_is_default() {
        assert_eq!(Config::from_yaml("").expect("parse failed"), Config::default());
    }

    #[rstest]
    #[case::blocks(Variant::Blocks, 7)]
    #[case::blobs(Variant::Blobs, 35)]
    fn default_block_count(#[case] variant: Variant, #[case] expected: usize) {
        let config = Config { variant, ..Default::default() };
        assert_eq!(config.block_count(), expected);
    }

    #[test]
    fn parse_full() {
        let input = r"
variant: blobs
greeting: Howdy
roles: [writer]
blocks: 12
seed: 99
markers: true
trigger:
  start: top 75%
";
        let config = Config::from_yaml(input).expect("parse failed");
        assert_eq!(config.variant, Variant::Blobs);
        assert_eq!(config.greeting, "Howdy");
        assert_eq!(config.name, "I'm Fulton Browne");
        assert_eq!(config.roles, vec!["writer".to_string()]);
        assert_eq!(config.block_count(), 12);
        assert_eq!(config.seed, Some(99));
        assert!(config.markers);
        assert_eq!(config.trigger.start, TriggerPosition::new(Edge::Top, Edge::Percent(75.0)));
        assert_eq!(config.trigger.end, TriggerPosition::new(Edge::Bottom, Edge::Top));
    }

    #[rstest]
    #[case::unknown_field("colour: red")]
    #[case::bad_variant("variant: squares")]
    #[case::bad_trigger("trigger:\n  start: sideways")]
    fn parse_invalid(#[case] input: &str) {
        assert!(matches!(Config::from_yaml(input), Err(ConfigError::Parse(_))));
    }

    #[rstest]
    #[case::zero_fps(Config { fps: 0, ..Default::default() })]
    #[case::too_many_blocks(Config { blocks: Some(1000), ..Default::default() })]
    #[case::negative_smoothing(Config { pointer_smoothing: -1.0, ..Default::default() })]
    fn validation(#[case] config: Config) {
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn round_trips_through_yaml() {
        let config = Config { seed: Some(4), markers: true, ..Default::default() };
        let yaml = config.to_yaml().expect("serialize failed");
        assert_eq!(Config::from_yaml(&yaml).expect("parse failed"), config);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "fps: 60").expect("write failed");
        let config = Config::load(Some(file.path())).expect("load failed");
        assert_eq!(config.fps, 60);
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = Config::load(Some(&dir.path().join("nope.yaml")));
        assert!(matches!(result, Err(ConfigError::Io(..))));
    }

    #[test]
    fn load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "fps: 500").expect("write failed");
        assert!(matches!(Config::load(Some(file.path())), Err(ConfigError::Invalid(_))));
    }
}
