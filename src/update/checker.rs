//! Newer-version notification

use super::registry::VersionRegistry;
use super::supervisor::UpdateCheck;
use super::version::Version;
use crate::error::UpdateCheckError;

/// Compares the running version with the registry's newest release
pub struct UpdateChecker<G> {
    registry: G,
    image: String,
    current: Version,
}

impl<G: VersionRegistry> UpdateChecker<G> {
    pub fn new(registry: G, image: impl Into<String>, current: Version) -> Self {
        Self {
            registry,
            image: image.into(),
            current,
        }
    }

    /// `Some(latest)` when the registry has a newer release than the running one
    pub fn newer_version(&self) -> Result<Option<Version>, UpdateCheckError> {
        let latest = self.registry.latest_version()?;
        tracing::debug!(current = %self.current, %latest, "update check complete");
        Ok((latest > self.current).then_some(latest))
    }

    pub fn notice(&self, latest: Version) -> String {
        format!(
            "A new version of {image} is available: {latest} (current: {current}).\n\
             Run `docker pull {image}:latest` to update.",
            image = self.image,
            current = self.current,
        )
    }
}

impl<G: VersionRegistry + 'static> UpdateCheck for UpdateChecker<G> {
    /// Prints to stderr; stdout may be carrying the validation report
    fn check_for_updates(&self) -> Result<(), UpdateCheckError> {
        if let Some(latest) = self.newer_version()? {
            eprintln!("{}", self.notice(latest));
        }
        Ok(())
    }
}
