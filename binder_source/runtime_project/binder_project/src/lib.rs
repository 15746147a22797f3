use std::{
    fmt::{Display, Formatter},
    fs,
    path::{Path, PathBuf},
};
use toml::Value;

pub const CONFIG_FILE: &str = "binder.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinderConfig {
    pub name: String,
    /// Target type the dev runner refreshes and binds against.
    pub events_collection: String,
    pub scene: PathBuf,
    pub bindings: PathBuf,
    pub log_filter: String,
}

impl BinderConfig {
    pub fn default_for_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events_collection: "EventsCollection".to_string(),
            scene: PathBuf::from("scene.json"),
            bindings: PathBuf::from("bindings.json"),
            log_filter: "info".to_string(),
        }
    }

    /// Make relative file paths absolute against `root`.
    pub fn rooted(mut self, root: &Path) -> Self {
        self.scene = resolve_local_path(&self.scene, root);
        self.bindings = resolve_local_path(&self.bindings, root);
        self
    }
}

#[derive(Debug)]
pub enum ProjectError {
    Io(std::io::Error),
    ParseToml(toml::de::Error),
    MissingField(&'static str),
    InvalidField(&'static str, String),
}

impl Display for ProjectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::ParseToml(err) => write!(f, "{err}"),
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::InvalidField(field, reason) => write!(f, "invalid field `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ProjectError {}

impl From<std::io::Error> for ProjectError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::de::Error> for ProjectError {
    fn from(value: toml::de::Error) -> Self {
        Self::ParseToml(value)
    }
}

pub fn resolve_local_path(input: &Path, root: &Path) -> PathBuf {
    if input.is_absolute() {
        input.to_path_buf()
    } else {
        root.join(input)
    }
}

/// Load `binder.toml` from `root`. A missing file yields defaults named
/// after the directory.
pub fn load_config(root: &Path) -> Result<BinderConfig, ProjectError> {
    let path = root.join(CONFIG_FILE);
    let config = if path.exists() {
        parse_config(&fs::read_to_string(path)?)?
    } else {
        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("binder");
        BinderConfig::default_for_name(name)
    };
    Ok(config.rooted(root))
}

pub fn parse_config(contents: &str) -> Result<BinderConfig, ProjectError> {
    let value: Value = contents.parse::<Value>()?;
    let project = value
        .get("project")
        .and_then(Value::as_table)
        .ok_or(ProjectError::MissingField("project"))?;

    let name = project
        .get("name")
        .and_then(Value::as_str)
        .ok_or(ProjectError::MissingField("project.name"))?;
    let mut config = BinderConfig::default_for_name(name);

    if let Some(raw) = optional_str(project, "events_collection", "project.events_collection")? {
        if raw.trim().is_empty() {
            return Err(ProjectError::InvalidField(
                "project.events_collection",
                "must not be empty".to_string(),
            ));
        }
        config.events_collection = raw.to_string();
    }
    if let Some(raw) = optional_str(project, "scene", "project.scene")? {
        config.scene = PathBuf::from(raw);
    }
    if let Some(raw) = optional_str(project, "bindings", "project.bindings")? {
        config.bindings = PathBuf::from(raw);
    }

    if let Some(log) = value.get("log").and_then(Value::as_table) {
        if let Some(filter) = optional_str(log, "filter", "log.filter")? {
            config.log_filter = filter.to_string();
        }
    }

    Ok(config)
}

fn optional_str<'a>(
    table: &'a toml::map::Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<Option<&'a str>, ProjectError> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(ProjectError::InvalidField(
            field,
            format!("expected a string, found {}", other.type_str()),
        )),
    }
}

pub fn default_config_toml(name: &str) -> String {
    format!(
        r#"[project]
name = "{name}"
events_collection = "EventsCollection"
scene = "scene.json"
bindings = "bindings.json"

[log]
filter = "info"
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = parse_config(
            r#"[project]
name = "Demo"
events_collection = "Events"
scene = "levels/one.json"
bindings = "wired.json"

[log]
filter = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.name, "Demo");
        assert_eq!(config.events_collection, "Events");
        assert_eq!(config.scene, PathBuf::from("levels/one.json"));
        assert_eq!(config.bindings, PathBuf::from("wired.json"));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let config = parse_config("[project]\nname = \"Demo\"\n").unwrap();
        assert_eq!(config, BinderConfig::default_for_name("Demo"));
        assert_eq!(
            parse_config(&default_config_toml("Demo")).unwrap(),
            BinderConfig::default_for_name("Demo")
        );
    }

    #[test]
    fn missing_name_is_reported() {
        let err = parse_config("[project]\nscene = \"a.json\"\n").unwrap_err();
        assert!(matches!(err, ProjectError::MissingField("project.name")));
        assert_eq!(err.to_string(), "missing required field `project.name`");
    }

    #[test]
    fn wrong_field_type_is_invalid() {
        let err = parse_config("[project]\nname = \"D\"\nscene = 3\n").unwrap_err();
        assert!(matches!(err, ProjectError::InvalidField("project.scene", _)));
        assert!(matches!(
            parse_config("[project]\nname = \"D\"\nevents_collection = \" \"\n"),
            Err(ProjectError::InvalidField("project.events_collection", _))
        ));
    }

    #[test]
    fn broken_toml_is_a_parse_error() {
        assert!(matches!(
            parse_config("[project\nname ="),
            Err(ProjectError::ParseToml(_))
        ));
    }

    #[test]
    fn relative_paths_resolve_against_root() {
        let root = Path::new("/projects/demo");
        let mut config = BinderConfig::default_for_name("Demo");
        config.bindings = PathBuf::from("/abs/bindings.json");
        let rooted = config.rooted(root);
        assert_eq!(rooted.scene, root.join("scene.json"));
        assert_eq!(rooted.bindings, PathBuf::from("/abs/bindings.json"));
    }
}
