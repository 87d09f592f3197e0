//! Static site build command.

use std::path::PathBuf;

use anyhow::Result;
use fenceline_static::{BuildConfig, StaticBuilder};

use crate::config::ConfigFile;

/// Run the build command.
pub fn run(file_config: ConfigFile, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building posts from {}...", file_config.content.dir);

    let config = BuildConfig {
        content_dir: PathBuf::from(&file_config.content.dir),
        output_dir: output.unwrap_or_else(|| PathBuf::from(&file_config.content.output)),
        minify: minify.unwrap_or(file_config.build.minify),
        base_url: file_config.content.base_url,
        title: file_config.content.title,
        theme: file_config.highlight.theme,
        plain: file_config.highlight.plain,
    };

    let result = StaticBuilder::new(config)?.build()?;

    tracing::info!(
        "Built {} posts with {} code blocks in {}ms ({} drafts skipped)",
        result.pages,
        result.code_blocks,
        result.duration_ms,
        result.drafts
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
