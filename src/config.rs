//! Project configuration: an optional `quillpress.yaml` discovered by
//! walking up from the invocation directory. Every key has a default, and a
//! missing file is not an error — the defaults reproduce the conventional
//! layout of a `blog/` directory next to the invocation.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;

/// The configuration file name searched for in the invocation directory and
/// its ancestors.
pub const CONFIG_FILE: &str = "quillpress.yaml";

#[derive(Deserialize)]
struct PageSize(usize);
impl Default for PageSize {
    fn default() -> Self {
        PageSize(5)
    }
}

/// The on-disk configuration format. Fields are optional; the effective
/// values come from [`Config`].
#[derive(Deserialize, Default)]
struct Project {
    blog_dir: Option<PathBuf>,
    source_dir: Option<PathBuf>,
    post_template: Option<PathBuf>,
    listing_template: Option<PathBuf>,
    #[serde(default)]
    posts_per_page: PageSize,
    title: Option<String>,
    site_url: Option<String>,
    escape_html: Option<bool>,
}

/// Effective project configuration.
#[derive(Debug)]
pub struct Config {
    /// Root of the generated site. The listing root is
    /// `{blog_dir}/index.html`.
    pub blog_dir: PathBuf,

    /// The directory scanned (non-recursively) for `.md` sources.
    pub source_dir: PathBuf,

    /// The single-post template (`{{TITLE}}`, `{{DATE}}`, `{{CONTENT}}`).
    pub post_template: PathBuf,

    /// The listing-page template (`{{POSTS}}`, `{{PAGINATION}}`).
    pub listing_template: PathBuf,

    /// The number of posts per listing page.
    pub posts_per_page: usize,

    /// The site title, used by the Atom feed.
    pub title: String,

    /// Absolute base URL of the published site. The Atom feed is only
    /// written when this is set.
    pub site_url: Option<String>,

    /// Whether to HTML-escape title, date, and excerpt values interpolated
    /// into templates. On by default; turn off only for trusted authors who
    /// put markup in their metadata.
    pub escape_html: bool,
}

impl Config {
    /// Searches `dir` and its ancestors for [`CONFIG_FILE`] and loads the
    /// first one found. No file anywhere up the tree means the defaults.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let mut current = Some(dir);
        while let Some(dir) = current {
            let path = dir.join(CONFIG_FILE);
            if path.exists() {
                return Config::from_project_file(&path);
            }
            current = dir.parent();
        }
        Ok(Config::from_project(Project::default()))
    }

    /// Loads configuration from a specific project file.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .map_err(|e| anyhow!("Opening project file `{}`: {}", path.display(), e))?;
        let project: Project = serde_yaml::from_reader(file)
            .map_err(|e| anyhow!("Loading configuration `{}`: {}", path.display(), e))?;
        Ok(Config::from_project(project))
    }

    fn from_project(project: Project) -> Config {
        let blog_dir = project.blog_dir.unwrap_or_else(|| PathBuf::from("blog"));
        Config {
            source_dir: project
                .source_dir
                .unwrap_or_else(|| blog_dir.join("markdown")),
            post_template: project
                .post_template
                .unwrap_or_else(|| blog_dir.join("template.html")),
            listing_template: project
                .listing_template
                .unwrap_or_else(|| blog_dir.join("listing.html")),
            posts_per_page: project.posts_per_page.0,
            title: project.title.unwrap_or_else(|| String::from("Blog")),
            site_url: project.site_url,
            escape_html: project.escape_html.unwrap_or(true),
            blog_dir,
        }
    }
}
