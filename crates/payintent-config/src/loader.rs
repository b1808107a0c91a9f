//! Multi-file configuration loading.
//!
//! A file may list other files under `include`, and included files may
//! include further files. All top-level sections are merged into one table;
//! a section defined in two files is an error, as is loading a file twice.

use crate::{resolve_env_vars, Config, ConfigError};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// Loads a configuration file together with everything it includes.
pub struct ConfigLoader {
	/// Directory relative includes are resolved against
	base_path: PathBuf,
	/// Canonical paths of files already read
	visited: HashSet<PathBuf>,
	/// File each top-level section was defined in
	section_origin: HashMap<String, PathBuf>,
}

impl ConfigLoader {
	pub fn new(base_path: impl AsRef<Path>) -> Self {
		Self {
			base_path: base_path.as_ref().to_path_buf(),
			visited: HashSet::new(),
			section_origin: HashMap::new(),
		}
	}

	/// Loads `config_path` and its includes, breadth first, into a validated
	/// [`Config`].
	pub async fn load_config(
		&mut self,
		config_path: impl AsRef<Path>,
	) -> Result<Config, ConfigError> {
		let mut merged = toml::Table::new();
		let mut pending = VecDeque::from([self.locate(config_path.as_ref())?]);

		while let Some(path) = pending.pop_front() {
			let mut table = self.read_table(&path).await?;
			for include in take_includes(&mut table)? {
				pending.push_back(self.locate(&include)?);
			}
			self.merge(&mut merged, table, &path)?;
		}

		let config: Config = toml::Value::Table(merged).try_into()?;
		config.validate()?;
		Ok(config)
	}

	/// Reads one file, substituting environment variables.
	async fn read_table(&mut self, path: &Path) -> Result<toml::Table, ConfigError> {
		let canonical = path.canonicalize().map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("Cannot resolve path {}: {}", path.display(), e),
			))
		})?;
		if !self.visited.insert(canonical.clone()) {
			return Err(ConfigError::Validation(format!(
				"Circular include detected: {} was already loaded",
				canonical.display()
			)));
		}

		tracing::debug!(path = %canonical.display(), "Loading configuration file");
		let raw = tokio::fs::read_to_string(path).await?;
		Ok(toml::from_str(&resolve_env_vars(&raw)?)?)
	}

	/// Moves the sections of `table` into `merged`, refusing redefinitions.
	fn merge(
		&mut self,
		merged: &mut toml::Table,
		table: toml::Table,
		source: &Path,
	) -> Result<(), ConfigError> {
		for (section, value) in table {
			if let Some(first) = self.section_origin.get(&section) {
				return Err(ConfigError::Validation(format!(
					"Duplicate section '{}' found in {} and {}. \
					Each top-level section must be unique across all configuration files.",
					section,
					first.display(),
					source.display()
				)));
			}
			self.section_origin
				.insert(section.clone(), source.to_path_buf());
			merged.insert(section, value);
		}
		Ok(())
	}

	/// Resolves `path` against the base directory and checks it exists.
	fn locate(&self, path: &Path) -> Result<PathBuf, ConfigError> {
		let resolved = if path.is_absolute() {
			path.to_path_buf()
		} else {
			self.base_path.join(path)
		};

		if !resolved.exists() {
			return Err(ConfigError::Io(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("Configuration file not found: {}", resolved.display()),
			)));
		}
		Ok(resolved)
	}
}

/// Removes and returns the `include` directive, a string or list of strings.
fn take_includes(table: &mut toml::Table) -> Result<Vec<PathBuf>, ConfigError> {
	match table.remove("include") {
		None => Ok(Vec::new()),
		Some(toml::Value::String(path)) => Ok(vec![PathBuf::from(path)]),
		Some(toml::Value::Array(items)) => items
			.into_iter()
			.map(|item| match item {
				toml::Value::String(path) => Ok(PathBuf::from(path)),
				_ => Err(ConfigError::Validation(
					"Include array must contain only strings".into(),
				)),
			})
			.collect(),
		Some(_) => Err(ConfigError::Validation(
			"Include must be a string or array of strings".into(),
		)),
	}
}
