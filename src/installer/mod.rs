//! Toolchain installation and first-run bootstrap
//!
//! Installing a version normally rides on an existing Go toolchain: the
//! bootstrap compiler fetches the tiny per-version installer package
//! (`golang.org/dl/<version>`), and that subcommand's `download` action does
//! the actual archive download, checksum verification, and unpack into
//! `<home>/sdk/<version>`. Checksum and unpack failures there propagate as
//! fatal install errors; they are not re-verified here.
//!
//! When no toolchain exists anywhere on the host, [`Installer::bootstrap`]
//! breaks the chicken-and-egg: it resolves the newest stable release from
//! the catalog, downloads that one archive directly, verifies its published
//! SHA-256, and unpacks it. The result is used as the bootstrap compiler
//! for everything else; no binary ships with govm.
//!
//! Install state is derived entirely from disk: a version whose
//! `bin/go version` probe succeeds is already installed and the whole
//! operation is a cheap no-op.

use crate::catalog::{ArchiveEntry, CatalogClient};
use crate::core::GovmError;
use crate::sdk::Sdk;
use crate::utils::platform::get_home_dir;
use crate::utils::process::CommandRunner;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Locate an existing `go` binary on the PATH.
#[must_use]
pub fn find_go() -> Option<PathBuf> {
    which::which("go").ok()
}

/// Outcome of an ensure-installed operation.
#[derive(Debug)]
pub struct InstallOutcome {
    /// Path to the installed version's toolchain entrypoint
    pub entrypoint: PathBuf,
    /// Whether a first-run bootstrap was performed along the way
    pub bootstrapped: bool,
}

/// Installs toolchain versions under the sdk layout.
pub struct Installer<'a> {
    runner: &'a dyn CommandRunner,
    sdk: &'a Sdk,
    catalog: &'a CatalogClient,
}

impl<'a> Installer<'a> {
    /// Create an installer over the given runner, sdk layout, and catalog.
    pub fn new(runner: &'a dyn CommandRunner, sdk: &'a Sdk, catalog: &'a CatalogClient) -> Self {
        Self {
            runner,
            sdk,
            catalog,
        }
    }

    /// Ensure `version` is installed, returning its toolchain entrypoint.
    ///
    /// Already-installed versions (verified by an execution probe, not mere
    /// directory presence) return immediately. Otherwise the version is
    /// fetched through the per-version installer subcommand, bootstrapping
    /// a compiler first if the host has none.
    ///
    /// # Errors
    ///
    /// Returns [`GovmError::Download`] when fetching the installer package
    /// fails (including unknown explicit versions, which are not validated
    /// up front), and [`GovmError::Install`] when the subcommand's
    /// `download` action fails.
    pub async fn ensure_installed(
        &self,
        version: &str,
        cl: Option<&str>,
    ) -> Result<InstallOutcome, GovmError> {
        let entrypoint = self.sdk.entrypoint(version);
        if self.runner.run_capture(&entrypoint, &["version"]).is_ok() {
            tracing::debug!(version, "already installed, nothing to do");
            return Ok(InstallOutcome {
                entrypoint,
                bootstrapped: false,
            });
        }

        let (gobin, bootstrapped) = match find_go() {
            Some(gobin) => (gobin, false),
            None => {
                let (gobin, _) = self.bootstrap().await?;
                (gobin, true)
            }
        };

        let entrypoint = self.install_using(&gobin, version, cl)?;
        Ok(InstallOutcome {
            entrypoint,
            bootstrapped,
        })
    }

    /// Install `version` through the given bootstrap compiler.
    ///
    /// Runs `go install golang.org/dl/<version>@latest`, then the fetched
    /// subcommand's `download` action (with the changelist argument for tip
    /// builds). The subcommand owns download, checksum verification, and
    /// unpack; its failure is fatal.
    ///
    /// # Errors
    ///
    /// See [`Installer::ensure_installed`].
    pub fn install_using(
        &self,
        gobin: &Path,
        version: &str,
        cl: Option<&str>,
    ) -> Result<PathBuf, GovmError> {
        let package = format!("golang.org/dl/{version}@latest");
        self.runner
            .run(gobin, &["install", &package], &[("GO111MODULE", "on")])
            .map_err(|e| GovmError::Download {
                version: version.to_string(),
                reason: e.to_string(),
            })?;

        let subcommand = self.gobin_dir(gobin)?.join(version);
        let result = match cl {
            Some(cl) => self.runner.run(&subcommand, &["download", cl], &[]),
            None => self.runner.run(&subcommand, &["download"], &[]),
        };
        result.map_err(|e| GovmError::Install {
            version: version.to_string(),
            reason: e.to_string(),
        })?;

        Ok(self.sdk.entrypoint(version))
    }

    /// Install the newest stable release without an existing toolchain and
    /// return `(entrypoint, version)`.
    ///
    /// # Errors
    ///
    /// Propagates catalog failures, and returns [`GovmError::Download`],
    /// [`GovmError::ChecksumMismatch`], or [`GovmError::Install`] for the
    /// download, verification, and unpack phases respectively.
    pub async fn bootstrap(&self) -> Result<(PathBuf, String), GovmError> {
        let installable = self.catalog.fetch_installable().await?;
        let newest = installable
            .first()
            .ok_or_else(|| GovmError::Download {
                version: "latest".to_string(),
                reason: "no installable release for this platform".to_string(),
            })?;
        let version = newest.version.clone();

        tracing::info!(version, "no toolchain found, bootstrapping");
        self.fetch_and_unpack(newest).await?;

        Ok((self.sdk.entrypoint(&version), version))
    }

    async fn fetch_and_unpack(&self, entry: &ArchiveEntry) -> Result<(), GovmError> {
        let url = self.catalog.download_url(&entry.filename);
        let download_err = |reason: String| GovmError::Download {
            version: entry.version.clone(),
            reason,
        };

        tracing::debug!(url = %url, "downloading bootstrap archive");
        let mut response = reqwest::get(&url).await.map_err(|e| download_err(e.to_string()))?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(download_err(format!("{} {url}", response.status())));
        }

        // Stream to a temp file, hashing as chunks arrive; release
        // archives run to a hundred megabytes.
        let mut archive = tempfile::NamedTempFile::new()?;
        let mut hasher = Sha256::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| download_err(e.to_string()))?
        {
            hasher.update(&chunk);
            archive.write_all(&chunk)?;
        }
        archive.flush()?;

        check_digest(
            &entry.filename,
            &entry.sha256,
            &hex::encode(hasher.finalize()),
        )?;

        let dest = self.sdk.version_root(&entry.version);
        unpack_archive(&entry.filename, archive.path(), &dest).map_err(|e| GovmError::Install {
            version: entry.version.clone(),
            reason: e.to_string(),
        })
    }

    /// Directory the per-version installer subcommand lands in:
    /// `go env GOBIN`, else `go env GOPATH` + `/bin`, else `<home>/go/bin`.
    fn gobin_dir(&self, gobin: &Path) -> Result<PathBuf, GovmError> {
        if let Ok(dir) = self.runner.run_capture(gobin, &["env", "GOBIN"]) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        if let Ok(gopath) = self.runner.run_capture(gobin, &["env", "GOPATH"]) {
            if !gopath.is_empty() {
                return Ok(PathBuf::from(gopath).join("bin"));
            }
        }

        Ok(get_home_dir()
            .map_err(|e| GovmError::Install {
                version: "unknown".to_string(),
                reason: e.to_string(),
            })?
            .join("go")
            .join("bin"))
    }
}

/// Compare a computed SHA-256 hex digest against the published checksum
/// (case-insensitive).
fn check_digest(filename: &str, expected: &str, actual: &str) -> Result<(), GovmError> {
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(GovmError::ChecksumMismatch {
            filename: filename.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// Unpack a release archive into `dest`, stripping the top-level `go/`
/// component so `dest/bin/go` is the entrypoint.
fn unpack_archive(filename: &str, archive: &Path, dest: &Path) -> anyhow::Result<()> {
    if filename.ends_with(".zip") {
        extract_zip(archive, dest)
    } else {
        extract_tar_gz(archive, dest)
    }
}

fn extract_tar_gz(archive: &Path, dest: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    let file = std::fs::File::open(archive)
        .with_context(|| format!("failed to open archive: {}", archive.display()))?;
    let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(file));

    std::fs::create_dir_all(dest)
        .with_context(|| format!("failed to create directory: {}", dest.display()))?;

    for entry in tar.entries().context("failed to read tar archive")? {
        let mut entry = entry.context("failed to read archive entry")?;
        let path = entry.path().context("invalid entry path in archive")?.into_owned();

        let Some(rel) = strip_archive_root(&path) else {
            continue;
        };

        let output_path = dest.join(rel);
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        entry
            .unpack(&output_path)
            .with_context(|| format!("failed to extract: {}", output_path.display()))?;
    }

    Ok(())
}

fn extract_zip(archive: &Path, dest: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    let file = std::fs::File::open(archive)
        .with_context(|| format!("failed to open archive: {}", archive.display()))?;
    let mut zip = zip::ZipArchive::new(file)
        .with_context(|| format!("failed to read zip archive: {}", archive.display()))?;

    std::fs::create_dir_all(dest)
        .with_context(|| format!("failed to create directory: {}", dest.display()))?;

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .with_context(|| format!("failed to read archive entry {i}"))?;
        let entry_path = entry
            .enclosed_name()
            .with_context(|| format!("invalid entry path in archive: entry {i}"))?;

        let Some(rel) = strip_archive_root(&entry_path) else {
            continue;
        };

        let output_path = dest.join(rel);
        if entry.is_dir() {
            std::fs::create_dir_all(&output_path)
                .with_context(|| format!("failed to create directory: {}", output_path.display()))?;
        } else {
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory: {}", parent.display()))?;
            }
            let mut outfile = std::fs::File::create(&output_path)
                .with_context(|| format!("failed to create file: {}", output_path.display()))?;
            std::io::copy(&mut entry, &mut outfile)
                .with_context(|| format!("failed to extract: {}", output_path.display()))?;
        }
    }

    Ok(())
}

/// Release archives nest everything under a single `go/` directory; map
/// `go/bin/go` to `bin/go`. Entries outside that root (or escaping via
/// `..`) are skipped.
fn strip_archive_root(path: &Path) -> Option<PathBuf> {
    use std::path::Component;

    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(root)) if root == "go" => {}
        _ => return None,
    }

    let rel = components.as_path();
    if rel.as_os_str().is_empty()
        || rel.components().any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(rel.to_path_buf())
}
