//! Validate content files

use anyhow::Result;

use crate::content::{duplicate_slugs, ContentDir};
use crate::Folio;

/// Problems found across the content directories
#[derive(Debug, Default)]
pub struct CheckReport {
    pub files: usize,
    pub problems: Vec<String>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Parse every blog and project file, collecting failures and duplicate slugs
/// instead of stopping at the first one
pub fn check(folio: &Folio) -> Result<CheckReport> {
    let mut report = CheckReport::default();
    check_dir(folio.blog().content_dir(), &mut report)?;
    check_dir(folio.projects().content_dir(), &mut report)?;
    Ok(report)
}

fn check_dir(dir: &ContentDir, report: &mut CheckReport) -> Result<()> {
    let files = dir.files()?;
    report.files += files.len();

    for file in &files {
        if let Err(e) = file.read() {
            report.problems.push(e.to_string());
        }
    }

    for (slug, names) in duplicate_slugs(&files) {
        report.problems.push(format!(
            "duplicate slug '{}' in {}: {}",
            slug,
            dir.root().display(),
            names.join(", ")
        ));
    }

    Ok(())
}

/// Run the check command
pub fn run(folio: &Folio) -> Result<()> {
    let report = check(folio)?;

    for problem in &report.problems {
        println!("  ✗ {}", problem);
    }

    if !report.is_clean() {
        anyhow::bail!(
            "{} problem(s) in {} content file(s)",
            report.problems.len(),
            report.files
        );
    }

    println!("Checked {} content file(s), no problems found", report.files);
    Ok(())
}
