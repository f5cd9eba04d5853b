//! Course file scanner - discovers and parses course files from the filesystem

use std::fs;
use std::path::Path;
use std::time::Instant;

use serde::Deserialize;
use walkdir::WalkDir;

use crate::domain::catalog::{Course, CourseCatalog};
use crate::domain::progress::Chapter;

/// On-disk course schema (one .toml file per course).
#[derive(Debug, Deserialize)]
struct CourseFile {
    id: String,
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    chapters: Vec<ChapterSpec>,
}

#[derive(Debug, Deserialize)]
struct ChapterSpec {
    id: String,
    title: String,
    #[serde(default)]
    duration: Option<String>,
}

impl From<CourseFile> for Course {
    fn from(file: CourseFile) -> Self {
        Course {
            id: file.id,
            title: file.title,
            summary: file.summary,
            level: file.level.unwrap_or_else(|| "beginner".to_string()),
            chapters: file
                .chapters
                .into_iter()
                .map(|chapter| {
                    Chapter::new(
                        chapter.id,
                        chapter.title,
                        chapter.duration.unwrap_or_else(|| "--".to_string()),
                    )
                })
                .collect(),
        }
    }
}

/// Course file scanner
pub struct CatalogScanner;

impl CatalogScanner {
    /// Scan a root directory for course .toml files
    pub fn scan(root: impl AsRef<Path>) -> CourseCatalog {
        let started = Instant::now();
        let root = root.as_ref();
        let mut catalog = CourseCatalog::new();
        let mut scanned_files = 0;
        let mut errors = Vec::new();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    errors.push(err.to_string());
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                continue;
            }

            // Skip files larger than 1MB
            let metadata = match entry.metadata() {
                Ok(meta) => meta,
                Err(err) => {
                    errors.push(format!("{}: {}", path.display(), err));
                    continue;
                }
            };
            if metadata.len() > 1024 * 1024 {
                continue;
            }

            scanned_files += 1;

            if let Err(err) = Self::load_course_file(path, &mut catalog) {
                errors.push(format!("{}: {}", path.display(), err));
            }
        }

        catalog.sort_by_id();
        catalog.scanned_files = scanned_files;
        catalog.errors = errors;
        catalog.scan_ms = started.elapsed().as_millis();

        catalog
    }

    fn load_course_file(path: &Path, catalog: &mut CourseCatalog) -> anyhow::Result<()> {
        let content = fs::read_to_string(path)?;
        let file: CourseFile = toml::from_str(&content)?;
        catalog.push(file.into())?;
        Ok(())
    }
}

/// Built-in starter catalog, used when the courses directory yields
/// nothing so a fresh install still has content to work through.
pub fn starter_catalog() -> CourseCatalog {
    let mut catalog = CourseCatalog::new();

    let courses = vec![
        Course {
            id: "candlesticks-101".to_string(),
            title: "Candlestick Foundations".to_string(),
            summary: "Reading single candles and the stories they tell.".to_string(),
            level: "beginner".to_string(),
            chapters: vec![
                Chapter::new("anatomy", "Candle anatomy", "8 min"),
                Chapter::new("wicks", "Wicks and rejection", "11 min"),
                Chapter::new("engulfing", "Engulfing patterns", "14 min"),
                Chapter::new("doji", "Doji and indecision", "9 min"),
            ],
        },
        Course {
            id: "support-resistance".to_string(),
            title: "Support & Resistance".to_string(),
            summary: "Drawing levels that other traders actually watch.".to_string(),
            level: "beginner".to_string(),
            chapters: vec![
                Chapter::new("levels", "Horizontal levels", "12 min"),
                Chapter::new("zones", "Levels are zones", "10 min"),
                Chapter::new("flips", "Support/resistance flips", "13 min"),
            ],
        },
        Course {
            id: "risk-management".to_string(),
            title: "Risk Management".to_string(),
            summary: "Position sizing, stops, and surviving losing streaks.".to_string(),
            level: "intermediate".to_string(),
            chapters: vec![
                Chapter::new("sizing", "Position sizing", "15 min"),
                Chapter::new("stops", "Stop placement", "12 min"),
                Chapter::new("expectancy", "Expectancy math", "18 min"),
                Chapter::new("drawdown", "Drawdown discipline", "10 min"),
                Chapter::new("journal", "Journaling trades", "7 min"),
            ],
        },
    ];

    for course in courses {
        // Built-in content is known-valid.
        let _ = catalog.push(course);
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_catalog_is_valid_and_sorted_input() {
        let catalog = starter_catalog();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.get("risk-management").is_some());
        assert_eq!(catalog.total_chapters(), 12);
    }

    #[test]
    fn scan_collects_courses_and_errors() {
        let dir = std::env::temp_dir().join(format!("traderoom-scan-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        fs::write(
            dir.join("basics.toml"),
            r#"
id = "basics"
title = "Basics"

[[chapters]]
id = "one"
title = "One"
duration = "5 min"
"#,
        )
        .unwrap();
        fs::write(dir.join("broken.toml"), "id = ").unwrap();
        fs::write(dir.join("ignored.txt"), "not a course").unwrap();

        let catalog = CatalogScanner::scan(&dir);
        assert_eq!(catalog.scanned_files, 2);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.errors.len(), 1);
        assert_eq!(catalog.get("basics").unwrap().chapters.len(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }
}
