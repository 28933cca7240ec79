//! Print a single post or project

use anyhow::{anyhow, Result};

use crate::content::MarkdownRenderer;
use crate::Folio;

/// Print the record for `slug` as JSON, or its body as HTML
pub fn run(folio: &Folio, content_type: &str, slug: &str, html: bool) -> Result<()> {
    let output = render(folio, content_type, slug, html)?;
    println!("{}", output);
    Ok(())
}

fn render(folio: &Folio, content_type: &str, slug: &str, html: bool) -> Result<String> {
    let renderer = || MarkdownRenderer::from_config(&folio.config.highlight);

    match content_type {
        "post" | "posts" => {
            let post = folio
                .blog()
                .get_post_by_slug(slug)?
                .ok_or_else(|| anyhow!("Blog post not found: {}", slug))?;
            if html {
                Ok(renderer().render(&post.content))
            } else {
                Ok(serde_json::to_string_pretty(&post)?)
            }
        }
        "project" | "projects" => {
            let project = folio
                .projects()
                .get_project_by_slug(slug)?
                .ok_or_else(|| anyhow!("Project not found: {}", slug))?;
            if html {
                Ok(renderer().render(&project.content))
            } else {
                Ok(serde_json::to_string_pretty(&project)?)
            }
        }
        _ => anyhow::bail!("Unknown type: {}. Available: post, project", content_type),
    }
}
