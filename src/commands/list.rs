//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::content::{sort_newest_first, tag_summary, ProjectPreview};
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str, category: Option<&str>, grouped: bool) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let mut posts = folio.blog().list_posts()?;
            sort_newest_first(&mut posts);
            println!("Posts ({}):", posts.len());
            for post in posts {
                let date = if post.date.is_empty() { "----------" } else { post.date.as_str() };
                println!("  {} - {} [{}]", date, post.title, post.path);
            }
        }
        "project" | "projects" => {
            let store = folio.projects();
            if grouped {
                for (category, projects) in store.list_projects_grouped_by_category()? {
                    println!("{} ({}):", category, projects.len());
                    print_projects(&projects);
                }
            } else {
                let projects = match category {
                    Some(category) => store.list_projects_by_category(category)?,
                    None => store.list_project_previews()?,
                };
                println!("Projects ({}):", projects.len());
                print_projects(&projects);
            }
        }
        "tag" | "tags" => {
            let posts = folio.blog().list_posts()?;
            let tags = tag_summary(&posts);
            println!("Tags ({}):", tags.len());
            for tag in tags {
                println!("  {} ({}) [{}]", tag.name, tag.count, tag.slug);
            }
        }
        "category" | "categories" => {
            let posts = folio.blog().list_posts()?;
            let mut categories: HashMap<String, usize> = HashMap::new();
            for post in &posts {
                for cat in &post.categories {
                    *categories.entry(cat.clone()).or_insert(0) += 1;
                }
            }
            println!("Categories ({}):", categories.len());
            let mut categories: Vec<_> = categories.into_iter().collect();
            categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            for (cat, count) in categories {
                println!("  {} ({})", cat, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, projects, tags, categories",
                content_type
            );
        }
    }

    Ok(())
}

fn print_projects(projects: &[ProjectPreview]) {
    for project in projects {
        println!(
            "  {:>6} - {} ({}) [{}]",
            project.order, project.title, project.category, project.path
        );
    }
}
