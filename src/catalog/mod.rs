//! Release catalog fetching and filtering
//!
//! The Go project publishes its releases as a JSON document listing every
//! release and, per release, one archive per platform/packaging combination.
//! This module fetches that document and narrows it down to the archives
//! that are actually installable on the current host.
//!
//! The catalog is fetched fresh on every query; nothing is cached and the
//! single GET is never retried. A non-200 response or a decode failure is
//! fatal to the whole command, which is the right behavior for a single-shot
//! CLI tool.
//!
//! Ordering matters: the server returns releases newest-first, and that
//! ordering is trusted rather than recomputed locally. "Latest stable" is
//! defined as the first installable entry of the filtered sequence.

use crate::core::GovmError;
use crate::utils::platform::{HostPlatform, host_platform};
use serde::{Deserialize, Serialize};

/// The fixed catalog endpoint. `include=all` also returns unstable and
/// historical releases, which `list all` wants to show.
pub const CATALOG_URL: &str = "https://go.dev/dl/?mode=json&include=all";

/// Base URL archives are downloaded from during bootstrap.
pub const DOWNLOAD_BASE_URL: &str = "https://go.dev/dl";

/// One platform/packaging combination of a release.
///
/// Field names mirror the wire format exactly; all fields are defaulted on
/// decode so partially-populated historical entries parse the same way the
/// original lenient decoder treated them (missing fields become zero values
/// and then fail the installability predicate).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ArchiveEntry {
    /// Archive file name, e.g. `go1.22.0.linux-amd64.tar.gz`
    #[serde(default)]
    pub filename: String,
    /// Target operating system tag (`linux`, `darwin`, `windows`, ...)
    #[serde(default)]
    pub os: String,
    /// Target architecture tag (`amd64`, `arm64`, `386`, `armv6l`, ...)
    #[serde(default)]
    pub arch: String,
    /// Canonical version this archive belongs to, e.g. `go1.22.0`
    #[serde(default)]
    pub version: String,
    /// Published SHA-256 of the archive contents
    #[serde(default)]
    pub sha256: String,
    /// Archive size in bytes
    #[serde(default)]
    pub size: u64,
    /// Packaging kind: `archive`, `installer`, or `source`
    #[serde(default)]
    pub kind: String,
}

/// One published release with its per-platform archives.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReleaseEntry {
    /// Canonical version, e.g. `go1.22.0`
    pub version: String,
    /// Whether this is a stable release
    #[serde(default)]
    pub stable: bool,
    /// Per-platform archives, keyed `files` on the wire
    #[serde(rename = "files", default)]
    pub files: Vec<ArchiveEntry>,
}

impl ArchiveEntry {
    /// Whether this archive can be installed on the given host.
    ///
    /// True iff `os`/`arch` match the host tags, the packaging kind is
    /// `archive` (not `installer` or `source`), and a checksum is published.
    #[must_use]
    pub fn is_installable_on(&self, host: HostPlatform) -> bool {
        self.os == host.os
            && self.arch == host.arch
            && self.kind == "archive"
            && !self.sha256.is_empty()
    }

    /// Whether this archive can be installed on the current host.
    #[must_use]
    pub fn is_installable(&self) -> bool {
        self.is_installable_on(host_platform())
    }
}

/// Keep only archives of stable releases that are installable on `host`,
/// preserving the server's newest-first ordering.
#[must_use]
pub fn filter_installable_on(releases: &[ReleaseEntry], host: HostPlatform) -> Vec<ArchiveEntry> {
    let mut installable = Vec::new();
    for release in releases {
        for entry in &release.files {
            if release.stable && entry.is_installable_on(host) {
                installable.push(entry.clone());
            }
        }
    }
    installable
}

/// [`filter_installable_on`] against the current host.
#[must_use]
pub fn filter_installable(releases: &[ReleaseEntry]) -> Vec<ArchiveEntry> {
    filter_installable_on(releases, host_platform())
}

/// Client for the release catalog endpoint and its archive downloads.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    url: String,
    download_base: String,
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogClient {
    /// Create a client for the fixed public endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self {
            url: CATALOG_URL.to_string(),
            download_base: DOWNLOAD_BASE_URL.to_string(),
        }
    }

    /// Create a client for an alternate catalog endpoint (tests).
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            download_base: DOWNLOAD_BASE_URL.to_string(),
        }
    }

    /// Create a client with alternate catalog and download endpoints
    /// (tests).
    #[must_use]
    pub fn with_urls(url: impl Into<String>, download_base: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            download_base: download_base.into(),
        }
    }

    /// Download URL for an archive published in the catalog.
    #[must_use]
    pub fn download_url(&self, filename: &str) -> String {
        format!("{}/{filename}", self.download_base)
    }

    /// Fetch the full release list.
    ///
    /// # Errors
    ///
    /// Returns [`GovmError::CatalogRequest`] when the endpoint is
    /// unreachable or answers non-200, and [`GovmError::CatalogParse`] when
    /// the body does not decode. Single attempt, surfaced to the caller.
    pub async fn fetch(&self) -> Result<Vec<ReleaseEntry>, GovmError> {
        tracing::debug!(url = %self.url, "fetching release catalog");

        let response =
            reqwest::get(&self.url)
                .await
                .map_err(|e| GovmError::CatalogRequest {
                    status: e.to_string(),
                    url: self.url.clone(),
                })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(GovmError::CatalogRequest {
                status: status.to_string(),
                url: self.url.clone(),
            });
        }

        let releases: Vec<ReleaseEntry> =
            response
                .json()
                .await
                .map_err(|e| GovmError::CatalogParse {
                    reason: e.to_string(),
                })?;

        tracing::debug!(releases = releases.len(), "catalog fetched");
        Ok(releases)
    }

    /// Fetch the catalog and keep only installable stable archives, in
    /// server order.
    ///
    /// # Errors
    ///
    /// Propagates [`CatalogClient::fetch`] failures.
    pub async fn fetch_installable(&self) -> Result<Vec<ArchiveEntry>, GovmError> {
        let releases = self.fetch().await?;
        Ok(filter_installable(&releases))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: HostPlatform = HostPlatform {
        os: "linux",
        arch: "amd64",
    };

    fn entry(os: &str, arch: &str, kind: &str, sha256: &str) -> ArchiveEntry {
        ArchiveEntry {
            filename: "go1.22.0.linux-amd64.tar.gz".to_string(),
            os: os.to_string(),
            arch: arch.to_string(),
            version: "go1.22.0".to_string(),
            sha256: sha256.to_string(),
            size: 1024,
            kind: kind.to_string(),
        }
    }

    #[test]
    fn installable_requires_matching_platform_archive_kind_and_checksum() {
        assert!(entry("linux", "amd64", "archive", "abc").is_installable_on(HOST));
        assert!(!entry("darwin", "amd64", "archive", "abc").is_installable_on(HOST));
        assert!(!entry("linux", "arm64", "archive", "abc").is_installable_on(HOST));
        assert!(!entry("linux", "amd64", "installer", "abc").is_installable_on(HOST));
        assert!(!entry("linux", "amd64", "source", "abc").is_installable_on(HOST));
        assert!(!entry("linux", "amd64", "archive", "").is_installable_on(HOST));
    }

    #[test]
    fn linux_arm_matches_armv6l_tag() {
        let host = HostPlatform {
            os: "linux",
            arch: "armv6l",
        };
        assert!(entry("linux", "armv6l", "archive", "abc").is_installable_on(host));
        assert!(!entry("linux", "arm", "archive", "abc").is_installable_on(host));
    }

    #[test]
    fn filter_keeps_server_order_and_drops_unstable() {
        let releases = vec![
            ReleaseEntry {
                version: "go1.23rc1".to_string(),
                stable: false,
                files: vec![entry("linux", "amd64", "archive", "aaa")],
            },
            ReleaseEntry {
                version: "go1.22.0".to_string(),
                stable: true,
                files: vec![
                    entry("darwin", "arm64", "archive", "bbb"),
                    entry("linux", "amd64", "archive", "ccc"),
                ],
            },
            ReleaseEntry {
                version: "go1.21.5".to_string(),
                stable: true,
                files: vec![entry("linux", "amd64", "archive", "ddd")],
            },
        ];

        let installable = filter_installable_on(&releases, HOST);
        let checksums: Vec<&str> = installable.iter().map(|e| e.sha256.as_str()).collect();
        assert_eq!(checksums, vec!["ccc", "ddd"]);
    }

    #[test]
    fn wire_format_round_trips_exact_field_names() {
        let json = r#"[{
            "version": "go1.22.0",
            "stable": true,
            "files": [{
                "filename": "go1.22.0.linux-amd64.tar.gz",
                "os": "linux",
                "arch": "amd64",
                "version": "go1.22.0",
                "sha256": "deadbeef",
                "size": 12345,
                "kind": "archive"
            }]
        }]"#;

        let releases: Vec<ReleaseEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(releases.len(), 1);
        assert!(releases[0].stable);
        assert_eq!(releases[0].files[0].sha256, "deadbeef");
        assert_eq!(releases[0].files[0].size, 12345);

        let encoded = serde_json::to_string(&releases[0]).unwrap();
        assert!(encoded.contains("\"files\""));
        assert!(encoded.contains("\"sha256\""));
    }

    #[test]
    fn missing_fields_decode_to_zero_values() {
        let json = r#"[{"version": "go1.4", "files": [{"filename": "go1.4.src.tar.gz"}]}]"#;
        let releases: Vec<ReleaseEntry> = serde_json::from_str(json).unwrap();
        assert!(!releases[0].stable);
        assert!(!releases[0].files[0].is_installable_on(HOST));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_catalog_request_error() {
        // Discard port on loopback; connection is refused immediately.
        let client = CatalogClient::with_url("http://127.0.0.1:9/dl/?mode=json");
        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, GovmError::CatalogRequest { .. }));
    }
}
