//! Manifest build step shared by `build` and `serve`.

use crate::{
    config::SiteConfig,
    log,
    manifest::{BuildOptions, BuildReport, build_manifest},
};
use anyhow::{Context, Result};

/// Scan `build.content` and write `build.output`.
pub fn build_index(config: &SiteConfig) -> Result<BuildReport> {
    let build = &config.build;
    let options = BuildOptions {
        extension: &build.extension,
        meta: build.meta,
    };

    log!("build"; "scanning {}", build.content.display());
    let report = build_manifest(&build.content, &build.output, options)
        .with_context(|| format!("Failed to build {}", build.output.display()))?;

    log!(
        "build";
        "generated {} with {} entries",
        build.output.display(),
        report.entries
    );
    Ok(report)
}
