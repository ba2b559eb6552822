//! Version specifier resolution
//!
//! Turns a free-form user specifier into a canonical `go`-prefixed version
//! identifier. Three shapes are accepted, checked in order:
//!
//! 1. `up`, `latest`, `update` - symbolic aliases for the newest stable
//!    release, taken as the first installable entry in catalog order
//! 2. `tip`, `gotip` - the development tip, optionally carrying a
//!    changelist number for the source-build path
//! 3. anything else - an explicit version, normalized by prefixing `go`
//!
//! Explicit versions are deliberately *not* validated against the catalog:
//! `govm 1.99` resolves fine and fails later, at download time. Validating
//! up front would cost a catalog round-trip on every explicit install and
//! still could not vouch for tip builds, so the downstream failure is the
//! contract.
//!
//! Resolution is a pure function of the specifier and a catalog snapshot;
//! the catalog is only consulted for the aliases in (1).

use crate::catalog::{ArchiveEntry, CatalogClient};
use crate::core::GovmError;

/// Canonical identifier of the development tip.
pub const TIP_VERSION: &str = "gotip";

/// A specifier resolved to a canonical version, plus the optional
/// changelist carried through for tip builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Canonical `go`-prefixed version, e.g. `go1.22.0` or `gotip`
    pub version: String,
    /// Changelist number for tip builds, passed to the installer
    /// subcommand's `download` action
    pub cl: Option<String>,
}

/// Normalize a version specifier to its canonical `go`-prefixed form.
///
/// Bare numbers get the `go` prefix prepended; the check is idempotent, so
/// `normalize(normalize(v)) == normalize(v)` for any input.
#[must_use]
pub fn normalize(spec: &str) -> String {
    if spec.starts_with("go") {
        spec.to_string()
    } else {
        format!("go{spec}")
    }
}

/// Resolve a specifier against an already-filtered catalog snapshot.
///
/// `installable` must be the stable, host-installable archives in server
/// (newest-first) order, as produced by
/// [`filter_installable`](crate::catalog::filter_installable).
///
/// # Errors
///
/// Returns [`GovmError::UnknownSpecifier`] when an alias asks for the
/// newest release but the filtered catalog is empty (nothing installable
/// on this host).
pub fn resolve_in(
    spec: &str,
    extra: Option<&str>,
    installable: &[ArchiveEntry],
) -> Result<Resolved, GovmError> {
    let spec = spec.to_lowercase();
    match spec.as_str() {
        "up" | "latest" | "update" => {
            let newest = installable
                .first()
                .ok_or_else(|| GovmError::UnknownSpecifier { spec: spec.clone() })?;
            Ok(Resolved {
                version: newest.version.clone(),
                cl: None,
            })
        }
        "tip" | "gotip" => Ok(Resolved {
            version: TIP_VERSION.to_string(),
            cl: extra.map(str::to_string),
        }),
        explicit => Ok(Resolved {
            version: normalize(explicit),
            cl: None,
        }),
    }
}

/// Resolve a specifier, fetching the catalog only when an alias needs it.
///
/// Explicit versions and tip resolve without any network traffic.
///
/// # Errors
///
/// Propagates catalog fetch failures for the `up|latest|update` aliases,
/// plus everything [`resolve_in`] can return.
pub async fn resolve(
    spec: &str,
    extra: Option<&str>,
    catalog: &CatalogClient,
) -> Result<Resolved, GovmError> {
    let lowered = spec.to_lowercase();
    let needs_catalog = matches!(lowered.as_str(), "up" | "latest" | "update");

    let installable = if needs_catalog {
        catalog.fetch_installable().await?
    } else {
        Vec::new()
    };

    resolve_in(&lowered, extra, &installable)
}
