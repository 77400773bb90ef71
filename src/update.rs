//! Release version comparison and an optional background update check.

use serde::Deserialize;

pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Release description served by the update endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReleaseInfo {
    pub version: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Whether `latest` is a strictly newer `vX.Y.Z` than `current`.
///
/// Missing parts count as zero. Anything that does not parse is never newer.
pub fn is_newer(latest: &str, current: &str) -> bool {
    match (parse_version(latest), parse_version(current)) {
        (Some(latest), Some(current)) => latest > current,
        _ => false,
    }
}

fn parse_version(version: &str) -> Option<Vec<u64>> {
    let mut parts = version
        .trim_start_matches('v')
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    while parts.len() < 3 {
        parts.push(0);
    }
    Some(parts)
}

#[cfg(feature = "update-check")]
pub use check::{UpdateCheck, fetch_release};

#[cfg(feature = "update-check")]
mod check {
    use std::sync::mpsc::{self, Receiver, TryRecvError};
    use std::thread;
    use std::time::Duration;

    use anyhow::{Context, Result};
    use log::debug;

    use super::{CURRENT_VERSION, ReleaseInfo, is_newer};

    const TIMEOUT: Duration = Duration::from_secs(5);

    /// GET the release description at `url`
    pub fn fetch_release(url: &str) -> Result<ReleaseInfo> {
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(format!("sheetcut/{}", CURRENT_VERSION))
            .build()
            .context("failed to build HTTP client")?;

        client
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .with_context(|| format!("update request failed: {}", url))?
            .json::<ReleaseInfo>()
            .context("invalid update response")
    }

    /// Update check running on a background thread.
    ///
    /// Only a newer release is ever delivered; network and parse failures
    /// are logged at debug level and otherwise ignored.
    pub struct UpdateCheck {
        receiver: Receiver<ReleaseInfo>,
    }

    impl UpdateCheck {
        pub fn spawn(url: impl Into<String>) -> Self {
            let url = url.into();
            let (sender, receiver) = mpsc::channel();

            thread::spawn(move || match fetch_release(&url) {
                Ok(release) if is_newer(&release.version, CURRENT_VERSION) => {
                    let _ = sender.send(release);
                }
                Ok(release) => debug!("Up to date (latest {})", release.version),
                Err(e) => debug!("Update check failed: {:#}", e),
            });

            Self { receiver }
        }

        /// Non-blocking poll for a newer release
        pub fn poll(&self) -> Option<ReleaseInfo> {
            match self.receiver.try_recv() {
                Ok(release) => Some(release),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
            }
        }

        /// Wait up to `timeout` for the check to finish
        pub fn wait(&self, timeout: Duration) -> Option<ReleaseInfo> {
            self.receiver.recv_timeout(timeout).ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_newer() {
        assert!(is_newer("v1.2.0", "v1.1.9"));
        assert!(is_newer("2.0", "v1.9.9"));
        assert!(is_newer("v1.0.10", "1.0.9"));
        assert!(!is_newer("v1.1.0", "v1.1.0"));
        assert!(!is_newer("v1.0", "1.0.0"));
        assert!(!is_newer("v1.0.0", "v1.0.1"));
    }

    #[test]
    fn test_unparsable_is_never_newer() {
        assert!(!is_newer("latest", "v1.0.0"));
        assert!(!is_newer("v2.0.0-beta", "v1.0.0"));
        assert!(!is_newer("v2.0.0", ""));
    }

    #[test]
    fn test_release_info_extra_fields() {
        let info: ReleaseInfo =
            serde_json::from_str(r#"{"version": "v0.2.0", "download": "x"}"#).unwrap();
        assert_eq!(info.version, "v0.2.0");
        assert_eq!(info.url, None);
    }

    #[cfg(feature = "update-check")]
    #[test]
    fn test_unreachable_endpoint_reports_nothing() {
        use std::time::Duration;

        // Port 9 (discard) is closed on loopback, so the request is refused.
        let url = "http://127.0.0.1:9/release.json";
        assert!(fetch_release(url).is_err());

        let check = UpdateCheck::spawn(url);
        assert_eq!(check.wait(Duration::from_secs(10)), None);
        assert_eq!(check.poll(), None);
    }
}
