//! `devplan render <plan.json>`: write HTML and Markdown documents for a
//! plan.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use devplan_core::render::{render_html, render_markdown};

use crate::config::OutputDirs;
use crate::output::{read_plan, write_file};

pub fn run_render(file: &Path, output: Option<&Path>) -> Result<()> {
    let plan = read_plan(file)?;
    let docs_dir = OutputDirs::resolve().docs_dir;
    let (html_path, md_path) = default_output_paths(file, output, &docs_dir);
    debug!(html = %html_path.display(), markdown = %md_path.display(), "rendering plan");

    write_file(&html_path, &render_html(&plan))?;
    write_file(&md_path, &render_markdown(&plan))?;

    println!("HTML written to {}", html_path.display());
    println!("Markdown written to {}", md_path.display());
    Ok(())
}

/// HTML and Markdown paths for a render of `file`.
///
/// An explicit `output` names the HTML file; otherwise it is
/// `<docs_dir>/<file stem>.html`. Markdown always sits next to the HTML.
pub fn default_output_paths(
    file: &Path,
    output: Option<&Path>,
    docs_dir: &Path,
) -> (PathBuf, PathBuf) {
    let html = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "development_plan".to_string());
            docs_dir.join(format!("{stem}.html"))
        }
    };
    let markdown = html.with_extension("md");
    (html, markdown)
}
