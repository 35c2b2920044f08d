//! Runtime settings read from the environment

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::engine::{default_jar_path, EngineLocator};
use crate::error::{Error, Result};
use crate::update::registry::DOCKER_HUB_API;
use crate::update::{DockerHubRegistry, UpdateChecker, Version};

pub const ENV_ENGINE: &str = "ARLINGTON_ENGINE";
pub const ENV_JAVA: &str = "ARLINGTON_JAVA";
pub const ENV_JAR: &str = "ARLINGTON_JAR";
pub const ENV_NO_UPDATE_CHECK: &str = "ARLINGTON_NO_UPDATE_CHECK";
pub const ENV_IMAGE: &str = "ARLINGTON_IMAGE";
pub const ENV_REGISTRY_URL: &str = "ARLINGTON_REGISTRY_URL";
pub const ENV_CURRENT_VERSION: &str = "ARLINGTON_CURRENT_VERSION";
pub const ENV_UPDATE_TIMEOUT: &str = "ARLINGTON_UPDATE_TIMEOUT_SECS";

pub const DEFAULT_IMAGE: &str = "pdfix/validate-pdf-arlington";
pub const DEFAULT_UPDATE_TIMEOUT_SECS: u64 = 5;

/// Settings for one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    pub engine: EngineLocator,
    pub update_check: bool,
    /// Registry repository checked for newer releases
    pub image: String,
    pub registry_url: String,
    pub current_version: Version,
    pub update_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build settings from an arbitrary variable source; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let engine = match get(ENV_ENGINE) {
            Some(command_line) => parse_engine(&command_line)?,
            None => {
                let java = get(ENV_JAVA).unwrap_or_else(|| "java".to_string());
                let jar = get(ENV_JAR).map(PathBuf::from).unwrap_or_else(default_jar_path);
                EngineLocator::java_jar(java, &jar)
            }
        };

        let update_check = !get(ENV_NO_UPDATE_CHECK).is_some_and(|value| is_truthy(&value));

        let current_version = match get(ENV_CURRENT_VERSION) {
            Some(value) => value.parse::<Version>().map_err(|e| {
                Error::Settings {
                    var: ENV_CURRENT_VERSION,
                    reason: e.to_string(),
                }
            })?,
            None => crate_version(),
        };

        let update_timeout = match get(ENV_UPDATE_TIMEOUT) {
            Some(value) => {
                let secs: u64 = value.trim().parse().map_err(|_| Error::Settings {
                    var: ENV_UPDATE_TIMEOUT,
                    reason: format!("expected a number of seconds, got '{value}'"),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_UPDATE_TIMEOUT_SECS),
        };

        Ok(Self {
            engine,
            update_check,
            image: get(ENV_IMAGE).unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            registry_url: get(ENV_REGISTRY_URL).unwrap_or_else(|| DOCKER_HUB_API.to_string()),
            current_version,
            update_timeout,
        })
    }

    /// Checker for this invocation, `None` when update checks are disabled
    pub fn update_checker(&self) -> Option<UpdateChecker<DockerHubRegistry>> {
        self.update_check.then(|| {
            UpdateChecker::new(
                DockerHubRegistry::new(self.image.clone(), self.update_timeout)
                    .with_base_url(self.registry_url.clone()),
                self.image.clone(),
                self.current_version,
            )
        })
    }
}

fn parse_engine(command_line: &str) -> Result<EngineLocator> {
    let words = shell_words::split(command_line).map_err(|e| Error::Settings {
        var: ENV_ENGINE,
        reason: e.to_string(),
    })?;

    let mut words = words.into_iter().map(OsString::from);
    let program = words.next().ok_or_else(|| Error::Settings {
        var: ENV_ENGINE,
        reason: "empty command".to_string(),
    })?;

    Ok(EngineLocator::new(program, words.collect()))
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

fn crate_version() -> Version {
    env!("CARGO_PKG_VERSION")
        .parse()
        .unwrap_or(Version::new(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.engine.program, "java");
        assert_eq!(s.engine.leading_args[0], "-jar");
        assert!(s.update_check);
        assert_eq!(s.image, DEFAULT_IMAGE);
        assert_eq!(s.registry_url, DOCKER_HUB_API);
        assert_eq!(s.current_version, crate_version());
        assert_eq!(s.update_timeout, Duration::from_secs(DEFAULT_UPDATE_TIMEOUT_SECS));
        assert!(s.update_checker().is_some());
    }

    #[test]
    fn test_java_and_jar_overrides() {
        let s = settings(&[(ENV_JAVA, "/usr/lib/jvm/bin/java"), (ENV_JAR, "/opt/arl.jar")]).unwrap();
        assert_eq!(s.engine, EngineLocator::java_jar("/usr/lib/jvm/bin/java", "/opt/arl.jar".as_ref()));
    }

    #[test]
    fn test_engine_command_line_is_split() {
        let s = settings(&[(ENV_ENGINE, "sh '/tmp/fake engine.sh' --quiet")]).unwrap();
        assert_eq!(s.engine.program, "sh");
        assert_eq!(s.engine.leading_args, vec![OsString::from("/tmp/fake engine.sh"), OsString::from("--quiet")]);
    }

    #[test]
    fn test_unbalanced_engine_quotes_rejected() {
        let err = settings(&[(ENV_ENGINE, "java -jar 'broken")]).unwrap_err();
        assert!(matches!(err, Error::Settings { var: ENV_ENGINE, .. }));
    }

    #[test]
    fn test_update_check_toggle() {
        assert!(!settings(&[(ENV_NO_UPDATE_CHECK, "1")]).unwrap().update_check);
        assert!(!settings(&[(ENV_NO_UPDATE_CHECK, "yes")]).unwrap().update_checker().is_some());
        assert!(settings(&[(ENV_NO_UPDATE_CHECK, "0")]).unwrap().update_check);
        assert!(settings(&[(ENV_NO_UPDATE_CHECK, "false")]).unwrap().update_check);
        assert!(settings(&[(ENV_NO_UPDATE_CHECK, "")]).unwrap().update_check);
    }

    #[test]
    fn test_registry_overrides() {
        let s = settings(&[
            (ENV_IMAGE, "acme/arlington"),
            (ENV_REGISTRY_URL, "http://registry.local/v2/repositories"),
            (ENV_CURRENT_VERSION, "v2.1"),
            (ENV_UPDATE_TIMEOUT, "12"),
        ])
        .unwrap();
        assert_eq!(s.image, "acme/arlington");
        assert_eq!(s.registry_url, "http://registry.local/v2/repositories");
        assert_eq!(s.current_version, Version::new(2, 1, 0));
        assert_eq!(s.update_timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_malformed_numbers_rejected() {
        assert!(matches!(
            settings(&[(ENV_UPDATE_TIMEOUT, "soon")]),
            Err(Error::Settings { var: ENV_UPDATE_TIMEOUT, .. })
        ));
        assert!(matches!(
            settings(&[(ENV_CURRENT_VERSION, "latest")]),
            Err(Error::Settings { var: ENV_CURRENT_VERSION, .. })
        ));
    }
}
