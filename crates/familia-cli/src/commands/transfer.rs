//! The `familia export` and `familia import` commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use familia_core::content::ContentKind;
use familia_core::transcoder::{dated_export_file_name, export_file_name};

use super::App;

pub fn export(
    app: &App,
    kind: ContentKind,
    category: &str,
    output: Option<PathBuf>,
    dated: bool,
) -> Result<()> {
    let text = app.library.export_csv(kind, category)?;

    let Some(output) = output else {
        print!("{text}");
        return Ok(());
    };

    let path = export_path(output, kind, category, dated.then(|| app.tracker.today()));
    std::fs::write(&path, &text)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Exported {category} to {}", path.display());
    Ok(())
}

/// Where an export lands: `output` itself, or a generated file name inside it
/// when it is a directory. A `dated` export names the file after that day.
fn export_path(
    output: PathBuf,
    kind: ContentKind,
    category: &str,
    dated: Option<NaiveDate>,
) -> PathBuf {
    if !output.is_dir() {
        return output;
    }
    let file_name = match dated {
        Some(date) => dated_export_file_name(kind, category, date),
        None => export_file_name(category),
    };
    output.join(file_name)
}

pub fn import(app: &App, kind: ContentKind, category: &str, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let import = app
        .library
        .import_csv(kind, category, &text)
        .with_context(|| format!("failed to import {}", file.display()))?;

    println!(
        "Imported {} row(s) into {category} ({} line(s) skipped)",
        import.category.len(),
        import.skipped
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_path_names_files_inside_directories() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();

        assert_eq!(
            export_path(dir.path().to_path_buf(), ContentKind::Phrases, "Bedtime", Some(date)),
            dir.path().join("phrases_Bedtime_2024-06-02.csv")
        );
        assert_eq!(
            export_path(dir.path().to_path_buf(), ContentKind::Vocabulary, "Colors", None),
            dir.path().join("Colors.csv")
        );

        let file = dir.path().join("mine.csv");
        assert_eq!(
            export_path(file.clone(), ContentKind::Vocabulary, "Colors", Some(date)),
            file
        );
    }
}
