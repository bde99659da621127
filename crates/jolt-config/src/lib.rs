//! Configuration for the lowering engine.
//!
//! A `jolt.toml` file has three sections:
//!
//! ```toml
//! [lowering]
//! allow_boolean_bitwise = true
//! resolve_static_type_tests = true
//!
//! [hierarchy]
//! minimal_jdk = true
//! aliases = { Shape = "shapes.Shape" }
//!
//! [[hierarchy.classes]]
//! name = "shapes.Shape"
//! kind = "interface"
//!
//! [logging]
//! level = "info"
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use jolt_types::{ClassHierarchy, ClassKind, HierarchyError, TypeAliases, TypeHierarchy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod logging;

pub use logging::{init_tracing, LoggingConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // Keep the message only; the default `Display` embeds a source snippet.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl From<HierarchyError> for ConfigError {
    fn from(err: HierarchyError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoltConfig {
    #[serde(default)]
    pub lowering: LoweringConfig,
    #[serde(default)]
    pub hierarchy: HierarchyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoweringConfig {
    /// Accept `&`, `|` and `^` between two booleans (non-short-circuit logic).
    #[serde(default = "default_true")]
    pub allow_boolean_bitwise: bool,

    /// Decide `instanceof` at compile time when the hierarchy proves the answer.
    ///
    /// When disabled every non-null type test becomes a runtime check.
    #[serde(default = "default_true")]
    pub resolve_static_type_tests: bool,
}

impl Default for LoweringConfig {
    fn default() -> Self {
        Self {
            allow_boolean_bitwise: true,
            resolve_static_type_tests: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HierarchyConfig {
    /// Start from the built-in `java.lang` types (wrappers, `Number`, `String`, ...).
    #[serde(default = "default_true")]
    pub minimal_jdk: bool,

    /// Additional class declarations. Order does not matter.
    #[serde(default)]
    pub classes: Vec<ClassDeclConfig>,

    /// Surface type name aliases, added on top of the defaults.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            minimal_jdk: true,
            classes: Vec::new(),
            aliases: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassDeclConfig {
    /// Binary name, e.g. `shapes.Circle`.
    pub name: String,
    #[serde(default = "ClassDeclConfig::default_kind")]
    pub kind: ClassKind,
    #[serde(default, rename = "final")]
    pub is_final: bool,
    #[serde(default)]
    pub supertypes: Vec<String>,
}

impl ClassDeclConfig {
    fn default_kind() -> ClassKind {
        ClassKind::Class
    }
}

impl HierarchyConfig {
    /// Build the class table described by this section.
    ///
    /// Declarations are applied once all of their supertypes are known, so they may appear in
    /// any order. Duplicates, unknown supertypes and inheritance cycles are rejected.
    pub fn build(&self) -> Result<ClassHierarchy, ConfigError> {
        let mut hierarchy = if self.minimal_jdk {
            ClassHierarchy::with_minimal_jdk()
        } else {
            ClassHierarchy::new()
        };

        let mut seen = BTreeSet::new();
        for decl in &self.classes {
            if !seen.insert(decl.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "class `{}` is declared more than once",
                    decl.name
                )));
            }
            if hierarchy.contains(&decl.name) {
                return Err(ConfigError::Invalid(format!(
                    "class `{}` redeclares a built-in type",
                    decl.name
                )));
            }
        }

        let mut pending: Vec<&ClassDeclConfig> = self.classes.iter().collect();
        while !pending.is_empty() {
            let (ready, blocked): (Vec<_>, Vec<_>) = pending.into_iter().partition(|decl| {
                decl.supertypes
                    .iter()
                    .all(|supertype| hierarchy.contains(supertype))
            });

            if ready.is_empty() {
                return Err(unresolvable(&blocked, &seen));
            }
            for decl in ready {
                hierarchy.declare(
                    decl.name.clone(),
                    decl.kind,
                    decl.is_final,
                    decl.supertypes.iter().cloned(),
                )?;
            }
            pending = blocked;
        }

        tracing::debug!(
            target: "jolt.config",
            classes = hierarchy.len(),
            declared = self.classes.len(),
            "built class hierarchy"
        );
        Ok(hierarchy)
    }

    /// The default aliases extended with this section's `aliases` table.
    pub fn type_aliases(&self) -> TypeAliases {
        let mut aliases = TypeAliases::default();
        for (alias, target) in &self.aliases {
            aliases.insert(alias.clone(), target.clone());
        }
        aliases
    }
}

fn unresolvable(blocked: &[&ClassDeclConfig], declared: &BTreeSet<&str>) -> ConfigError {
    for decl in blocked {
        if let Some(missing) = decl
            .supertypes
            .iter()
            .find(|supertype| !declared.contains(supertype.as_str()))
        {
            return HierarchyError::UnknownSupertype {
                class: decl.name.clone(),
                supertype: missing.clone(),
            }
            .into();
        }
    }
    // Every supertype is declared somewhere yet nothing can be applied.
    let class = blocked
        .first()
        .map(|decl| decl.name.clone())
        .unwrap_or_default();
    HierarchyError::Cycle { class }.into()
}

impl JoltConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: JoltConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Semantic checks that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (alias, target) in &self.hierarchy.aliases {
            if alias.trim().is_empty() || target.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "type alias `{alias}` = `{target}` must not be empty"
                )));
            }
        }
        if let Err(err) = tracing_subscriber::EnvFilter::try_new(self.logging.level_directives()) {
            tracing::warn!(
                target: "jolt.config",
                level = %self.logging.level,
                error = %err,
                "invalid logging directives are ignored"
            );
        }
        Ok(())
    }
}
