// src/tools/bundle.rs

//! Local bundle handling: unpacking and cleanup.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use crate::errors::{DeployexecError, Result};
use crate::exec::{ProcessSpec, find_in_path, run};

/// Name of a bundle without its `.zip` extension.
pub fn bundle_name(bundle: &str) -> &str {
    bundle.strip_suffix(".zip").unwrap_or(bundle)
}

/// Unpack `<dir>/<bundle>` into `<dir>/<bundle name>` with `unzip`.
///
/// Returns the directory the bundle was unpacked into.
pub async fn unzip_bundle(dir: &Path, bundle: &str) -> Result<PathBuf> {
    let unzip =
        find_in_path("unzip").ok_or_else(|| DeployexecError::ToolNotFound("unzip".to_string()))?;
    unzip_bundle_with(&unzip, dir, bundle).await
}

/// [`unzip_bundle`] with an explicit `unzip` binary.
pub async fn unzip_bundle_with(unzip: &Path, dir: &Path, bundle: &str) -> Result<PathBuf> {
    let archive = dir.join(bundle);
    let target = dir.join(bundle_name(bundle));

    tokio::fs::create_dir(&target)
        .await
        .with_context(|| format!("creating bundle directory {}", target.display()))?;

    let spec = ProcessSpec::new(unzip)
        .arg(archive.as_os_str())
        .arg("-d")
        .arg(target.as_os_str());

    run(&spec, None)
        .await
        .into_result()
        .with_context(|| format!("failed to unzip the bundle {bundle}"))?;

    info!(bundle, target = %target.display(), "bundle unpacked");
    Ok(target)
}

/// Remove local files and directories left behind by a deployment.
///
/// Paths that no longer exist are skipped.
pub async fn remove_local_files<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    for path in paths {
        let path = path.as_ref();
        info!(path = %path.display(), "Removing file");

        let metadata = match tokio::fs::symlink_metadata(path).await {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "already removed");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() {
            tokio::fs::remove_dir_all(path).await?;
        } else {
            tokio::fs::remove_file(path).await?;
        }
    }

    Ok(())
}
