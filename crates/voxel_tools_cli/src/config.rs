//! Settings file for the voxel tools command line.
//!
//! ```toml
//! param_path = "lac.npy"
//! mask_path = "mask.npy"
//! attribute_name = "lac_ves"
//! axis_order = "zyx"
//! output_dir = "output"
//! scale = 0.01
//!
//! [smooth]
//! voxel_amount = 512
//! radius = 1.0
//! transfer = "nearest"
//! # transfer = { inverse_distance = { neighbors = 8, power = 2.0 } }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use voxel_tools::constants::{
	DEFAULT_ATTRIBUTE_NAME, DEFAULT_RADIUS, DEFAULT_VOXEL_AMOUNT, RADIUS_RANGE, VOXEL_AMOUNT_RANGE,
};
use voxel_tools::{AxisOrder, ResampleConfig, TransferMode};

/// Root configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Parameter (value) volume, NPY.
	pub param_path: PathBuf,
	/// Mask volume, NPY, same shape as the parameter volume.
	pub mask_path: PathBuf,
	/// Name of the per-point attribute.
	#[serde(default = "default_attribute_name")]
	pub attribute_name: String,
	/// Axis order of both stored arrays.
	#[serde(default)]
	pub axis_order: AxisOrderSetting,
	/// Output directory for the written geometry.
	#[serde(default = "default_output_dir")]
	pub output_dir: PathBuf,
	/// Uniform scale from grid units to world units.
	#[serde(default = "default_scale")]
	pub scale: f32,
	/// Smooth operation settings.
	#[serde(default)]
	pub smooth: SmoothConfig,
}

/// Stored axis order of the input arrays.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisOrderSetting {
	Xyz,
	#[default]
	Zyx,
}

impl From<AxisOrderSetting> for AxisOrder {
	fn from(setting: AxisOrderSetting) -> Self {
		match setting {
			AxisOrderSetting::Xyz => AxisOrder::Xyz,
			AxisOrderSetting::Zyx => AxisOrder::Zyx,
		}
	}
}

/// Points → volume → mesh settings.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmoothConfig {
	/// Voxels along the longest side of the padded cloud bounds.
	pub voxel_amount: u32,
	/// Sphere radius around each point, world units.
	pub radius: f32,
	/// How values are carried onto the resampled points.
	pub transfer: TransferSetting,
}

impl Default for SmoothConfig {
	fn default() -> Self {
		Self {
			voxel_amount: DEFAULT_VOXEL_AMOUNT,
			radius: DEFAULT_RADIUS,
			transfer: TransferSetting::default(),
		}
	}
}

impl SmoothConfig {
	pub fn resample_config(&self) -> ResampleConfig {
		ResampleConfig::default()
			.with_voxel_amount(self.voxel_amount)
			.with_radius(self.radius)
	}
}

/// Attribute transfer mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferSetting {
	/// Exact copy of the nearest source value.
	#[default]
	Nearest,
	/// Inverse distance weighted blend of the nearest `neighbors` values.
	InverseDistance {
		neighbors: usize,
		#[serde(default = "default_power")]
		power: f32,
	},
}

impl From<TransferSetting> for TransferMode {
	fn from(setting: TransferSetting) -> Self {
		match setting {
			TransferSetting::Nearest => TransferMode::Nearest,
			TransferSetting::InverseDistance { neighbors, power } => {
				TransferMode::InverseDistance { neighbors, power }
			}
		}
	}
}

fn default_attribute_name() -> String {
	DEFAULT_ATTRIBUTE_NAME.to_string()
}

fn default_output_dir() -> PathBuf {
	PathBuf::from("output")
}

fn default_scale() -> f32 {
	1.0
}

fn default_power() -> f32 {
	2.0
}

impl Config {
	/// Load configuration from a TOML file.
	///
	/// Relative paths are resolved against the file's directory.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		let mut config = Self::parse(&content)
			.with_context(|| format!("Invalid config file: {}", path.display()))?;

		let base = path.parent().unwrap_or(Path::new("."));
		config.resolve_paths(base);
		Ok(config)
	}

	/// Parse and validate configuration text.
	pub fn parse(content: &str) -> Result<Self> {
		let config: Config = toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
		config.validate()?;
		Ok(config)
	}

	fn validate(&self) -> Result<()> {
		if self.attribute_name.trim().is_empty() {
			anyhow::bail!("attribute_name must not be empty");
		}
		if !self.scale.is_finite() || self.scale <= 0.0 {
			anyhow::bail!("scale must be finite and positive, got {}", self.scale);
		}

		let (min_amount, max_amount) = VOXEL_AMOUNT_RANGE;
		if !(min_amount..=max_amount).contains(&self.smooth.voxel_amount) {
			anyhow::bail!(
				"smooth.voxel_amount must be in {}..={}, got {}",
				min_amount,
				max_amount,
				self.smooth.voxel_amount
			);
		}
		let (min_radius, max_radius) = RADIUS_RANGE;
		if !(min_radius..=max_radius).contains(&self.smooth.radius) {
			anyhow::bail!(
				"smooth.radius must be in {}..={}, got {}",
				min_radius,
				max_radius,
				self.smooth.radius
			);
		}

		if let TransferSetting::InverseDistance { neighbors, power } = self.smooth.transfer {
			if neighbors == 0 {
				anyhow::bail!("smooth.transfer.inverse_distance.neighbors must be at least 1");
			}
			if !power.is_finite() || power < 0.0 {
				anyhow::bail!(
					"smooth.transfer.inverse_distance.power must be finite and non-negative, got {}",
					power
				);
			}
		}

		Ok(())
	}

	fn resolve_paths(&mut self, base: &Path) {
		for path in [&mut self.param_path, &mut self.mask_path, &mut self.output_dir] {
			if path.is_relative() {
				*path = base.join(&*path);
			}
		}
	}
}
