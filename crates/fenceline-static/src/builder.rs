//! Static site builder.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use fenceline_highlight::{HighlightError, Highlighter, DEFAULT_THEME};
use fenceline_mdx::{parse_mdx, Frontmatter, ParsedDoc};

use crate::assets::AssetPipeline;
use crate::markdown::render_markdown;
use crate::templates::{Context, TemplateEngine, TocEntry};

/// Stylesheet written under `assets/`.
const CODE_CSS_FILE: &str = "code.css";

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Source content directory
    pub content_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Base URL for the site
    pub base_url: String,

    /// Site title
    pub title: String,

    /// Syntect theme name
    pub theme: String,

    /// Use the unstyled tokenizer instead of syntect
    pub plain: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content/blog"),
            output_dir: PathBuf::from("public"),
            minify: true,
            base_url: "/".to_string(),
            title: "Blog".to_string(),
            theme: DEFAULT_THEME.to_string(),
            plain: false,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Number of code fences rendered
    pub code_blocks: usize,

    /// Number of draft posts skipped
    pub drafts: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read content: {0}")]
    ReadError(String),

    #[error("Failed to parse MDX: {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Output path {output} is used by both {first} and {second}")]
    DuplicateOutput {
        output: String,
        first: String,
        second: String,
    },

    #[error("Failed to set up highlighter: {0}")]
    Highlight(#[from] HighlightError),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A post to be built.
#[derive(Debug)]
struct PageInfo {
    /// Source file path
    source_path: PathBuf,

    /// Output path
    output_path: PathBuf,

    /// Parsed document
    doc: ParsedDoc,
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    highlighter: Highlighter,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        let highlighter = if config.plain {
            Highlighter::plain()
        } else {
            Highlighter::syntect(&config.theme)?
        };

        tracing::debug!("Using {} tokenizer", highlighter.tokenizer_name());

        Ok(Self {
            config,
            highlighter,
            templates: TemplateEngine::new(),
        })
    }

    /// Build the static site.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let (pages, drafts) = self.discover_pages()?;

        let results: Vec<Result<usize, BuildError>> = pages
            .par_iter()
            .map(|page| self.build_page(page))
            .collect();

        let mut code_blocks = 0;
        for result in results {
            code_blocks += result?;
        }

        self.generate_assets()?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: pages.len(),
            code_blocks,
            drafts,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Discover all posts in the content directory, returning them with the draft count.
    fn discover_pages(&self) -> Result<(Vec<PageInfo>, usize), BuildError> {
        let mut pages = Vec::new();
        let mut drafts = 0;
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

        if !self.config.content_dir.exists() {
            return Err(BuildError::ReadError(format!(
                "Content directory not found: {}",
                self.config.content_dir.display()
            )));
        }

        for entry in WalkDir::new(&self.config.content_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "mdx" && ext != "md" {
                continue;
            }

            let content = fs::read_to_string(path)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

            let doc = parse_mdx(&content).map_err(|e| BuildError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            if doc.frontmatter.as_ref().is_some_and(|f| f.draft) {
                tracing::info!("Skipping draft {}", path.display());
                drafts += 1;
                continue;
            }

            let relative_path = path
                .strip_prefix(&self.config.content_dir)
                .unwrap_or(path)
                .to_path_buf();

            let output_path = self.calculate_output_path(&relative_path, &doc.frontmatter);

            if let Some(first) = claimed.insert(output_path.clone(), path.to_path_buf()) {
                return Err(BuildError::DuplicateOutput {
                    output: output_path.display().to_string(),
                    first: first.display().to_string(),
                    second: path.display().to_string(),
                });
            }

            pages.push(PageInfo {
                source_path: path.to_path_buf(),
                output_path,
                doc,
            });
        }

        Ok((pages, drafts))
    }

    /// Calculate output path for a post.
    fn calculate_output_path(&self, relative: &Path, frontmatter: &Option<Frontmatter>) -> PathBuf {
        if let Some(slug) = frontmatter.as_ref().and_then(|fm| fm.slug.as_deref()) {
            // Only plain segments, so a slug cannot leave the output directory
            let slug: PathBuf = Path::new(slug)
                .components()
                .filter_map(|c| match c {
                    Component::Normal(segment) => Some(segment),
                    _ => None,
                })
                .collect();
            return self.config.output_dir.join(slug).join("index.html");
        }

        let stem = relative
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("index");
        let parent = relative.parent().unwrap_or(Path::new(""));

        if stem == "index" {
            // blog/my-post/index.mdx -> public/my-post/index.html
            self.config.output_dir.join(parent).join("index.html")
        } else {
            // blog/my-post.mdx -> public/my-post/index.html
            self.config
                .output_dir
                .join(parent)
                .join(stem)
                .join("index.html")
        }
    }

    /// Build a single post, returning the number of fences it rendered.
    fn build_page(&self, page: &PageInfo) -> Result<usize, BuildError> {
        let content_html = render_markdown(&page.doc, &self.highlighter);

        let toc: Vec<TocEntry> = page
            .doc
            .toc
            .iter()
            .map(|e| TocEntry {
                title: e.title.clone(),
                id: e.id.clone(),
                level: e.level,
            })
            .collect();

        let fm = page.doc.frontmatter.as_ref();
        let title = page
            .doc
            .title()
            .map(str::to_string)
            .unwrap_or_else(|| "Untitled".to_string());

        let context = Context {
            title,
            site_title: self.config.title.clone(),
            date: fm.and_then(|f| f.date.clone()),
            description: fm.and_then(|f| f.description.clone()),
            time_to_read: page.doc.time_to_read(),
            content: content_html,
            toc,
            styles: vec![format!("{}assets/{}", self.config.base_url, CODE_CSS_FILE)],
        };

        let html = self
            .templates
            .render_page("post.html", &context)
            .map_err(|e: minijinja::Error| BuildError::TemplateError(e.to_string()))?;

        if let Some(parent) = page.output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        fs::write(&page.output_path, html).map_err(|e| BuildError::WriteError(e.to_string()))?;

        tracing::debug!(
            "Rendered {} -> {}",
            page.source_path.display(),
            page.output_path.display()
        );

        Ok(page.doc.fences.len())
    }

    /// Write the code block stylesheet.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Writing unminified CSS: {}", e);
                css.clone()
            })
        } else {
            css
        };

        fs::write(assets_dir.join(CODE_CSS_FILE), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn builds_posts_with_highlighted_code() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        let out = temp.path().join("public");

        write(
            &content.join("react-element-in-state/index.mdx"),
            "---\ntitle: React element in state\ndate: \"2019-11-02\"\n---\n\n```jsx {2}\nconst a = 1\nconst b = 2\n```\n",
        );
        write(
            &content.join("hello.md"),
            "---\ntitle: Hello\n---\n\nNo code here.\n",
        );

        let builder = StaticBuilder::new(BuildConfig {
            content_dir: content,
            output_dir: out.clone(),
            plain: true,
            ..Default::default()
        })
        .unwrap();
        let result = builder.build().unwrap();

        assert_eq!(result.pages, 2);
        assert_eq!(result.code_blocks, 1);
        assert_eq!(result.drafts, 0);

        let post = fs::read_to_string(out.join("react-element-in-state/index.html")).unwrap();
        assert!(post.contains("React element in state"));
        assert!(post.contains(r#"<div class="token-line highlight-line"><span class="line-number">2</span>"#));

        assert!(out.join("hello/index.html").exists());
        assert!(out.join("assets/code.css").exists());
    }

    #[test]
    fn skips_drafts_and_honours_slug() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        let out = temp.path().join("public");

        write(&content.join("wip.mdx"), "---\ntitle: WIP\ndraft: true\n---\nbody");
        write(
            &content.join("dont-follow.mdx"),
            "---\ntitle: Renamed\nslug: /custom/\n---\nbody",
        );

        let builder = StaticBuilder::new(BuildConfig {
            content_dir: content,
            output_dir: out.clone(),
            plain: true,
            minify: false,
            ..Default::default()
        })
        .unwrap();
        let result = builder.build().unwrap();

        assert_eq!(result.pages, 1);
        assert_eq!(result.drafts, 1);
        assert!(out.join("custom/index.html").exists());
        assert!(!out.join("wip/index.html").exists());
    }

    #[test]
    fn colliding_output_paths_are_an_error() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        let out = temp.path().join("public");

        write(&content.join("foo.md"), "---\ntitle: Flat\n---\nbody");
        write(&content.join("foo/index.md"), "---\ntitle: Nested\n---\nbody");

        let builder = StaticBuilder::new(BuildConfig {
            content_dir: content,
            output_dir: out.clone(),
            plain: true,
            ..Default::default()
        })
        .unwrap();

        let err = builder.build().unwrap_err();
        match err {
            BuildError::DuplicateOutput { output, .. } => {
                assert!(output.ends_with("index.html"));
                assert!(Path::new(&output).starts_with(&out));
            }
            other => panic!("expected DuplicateOutput, got {other:?}"),
        }
        assert!(!out.join("foo/index.html").exists());
    }

    #[test]
    fn repeated_slug_is_an_error() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");

        write(&content.join("a.md"), "---\ntitle: A\nslug: same\n---\nbody");
        write(&content.join("b.md"), "---\ntitle: B\nslug: same\n---\nbody");

        let builder = StaticBuilder::new(BuildConfig {
            content_dir: content,
            output_dir: temp.path().join("public"),
            plain: true,
            ..Default::default()
        })
        .unwrap();

        assert!(matches!(
            builder.build(),
            Err(BuildError::DuplicateOutput { .. })
        ));
    }

    #[test]
    fn slug_cannot_escape_output_dir() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        let out = temp.path().join("site/public");

        write(
            &content.join("post.md"),
            "---\ntitle: Sneaky\nslug: ../../escaped\n---\nbody",
        );

        let builder = StaticBuilder::new(BuildConfig {
            content_dir: content,
            output_dir: out.clone(),
            plain: true,
            ..Default::default()
        })
        .unwrap();
        builder.build().unwrap();

        assert!(out.join("escaped/index.html").exists());
        assert!(!temp.path().join("escaped").exists());
    }

    #[test]
    fn syntect_build_styles_tokens() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        let out = temp.path().join("public");

        write(&content.join("post.md"), "---\ntitle: Rust\n---\n\n```rust\nfn main() {}\n```\n");

        let builder = StaticBuilder::new(BuildConfig {
            content_dir: content,
            output_dir: out.clone(),
            ..Default::default()
        })
        .unwrap();
        builder.build().unwrap();

        let post = fs::read_to_string(out.join("post/index.html")).unwrap();
        assert!(post.contains(r#"<pre class="language-rust" style="#));
        assert!(post.contains(r#"<span style="color:#"#));
    }

    #[test]
    fn unknown_theme_fails_early() {
        let result = StaticBuilder::new(BuildConfig {
            theme: "no-such-theme".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(BuildError::Highlight(_))));
    }

    #[test]
    fn missing_content_dir_is_an_error() {
        let temp = tempdir().unwrap();
        let builder = StaticBuilder::new(BuildConfig {
            content_dir: temp.path().join("nope"),
            output_dir: temp.path().join("public"),
            plain: true,
            ..Default::default()
        })
        .unwrap();

        assert!(matches!(builder.build(), Err(BuildError::ReadError(_))));
    }
}
