//! CSV Export
//!
//! Writes the completion report, the member roster, and the portfolio
//! to CSV files.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::modules::reports::ReportRow;
use crate::store::MemberRecord;

/// Write the completion report to a CSV file
pub fn write_report(path: &Path, rows: &[ReportRow]) -> Result<usize, Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["course_id", "title", "chapters", "completed", "percent"])?;

    for row in rows {
        wtr.write_record([
            row.course_id.clone(),
            row.title.clone(),
            row.total_chapters.to_string(),
            row.completed_chapters.to_string(),
            row.percent.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(rows.len())
}

/// Write the member roster to a CSV file
pub fn write_members(
    path: &Path,
    members: &[MemberRecord],
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["name", "role", "tier", "joined_at"])?;

    for member in members {
        wtr.write_record([
            member.name.clone(),
            member.role.id().to_string(),
            member.tier.id().to_string(),
            member.joined_at.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(members.len())
}

/// Write tracked symbols and their notes to a CSV file
pub fn write_portfolio(
    path: &Path,
    tracked: &BTreeSet<String>,
    notes: &BTreeMap<String, String>,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["symbol", "note"])?;

    for symbol in tracked {
        let note = notes.get(symbol).cloned().unwrap_or_default();
        wtr.write_record([symbol.clone(), note])?;
    }

    wtr.flush()?;
    Ok(tracked.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::{MembershipTier, Role};

    #[test]
    fn report_csv_has_header_and_rows() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("traderoom-report-{}.csv", std::process::id()));

        let rows = vec![ReportRow {
            course_id: "basics".into(),
            title: "Basics".into(),
            total_chapters: 3,
            completed_chapters: 1,
            percent: 33,
        }];
        let written = write_report(&path, &rows).unwrap();
        assert_eq!(written, 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("course_id,title,chapters,completed,percent"));
        assert!(content.contains("basics,Basics,3,1,33"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn members_csv_uses_stable_ids() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("traderoom-members-{}.csv", std::process::id()));

        let members = vec![MemberRecord {
            name: "dana".into(),
            role: Role::Admin,
            tier: MembershipTier::Premium,
            joined_at: "2026-01-15".into(),
        }];
        write_members(&path, &members).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("dana,admin,premium,2026-01-15"));
        std::fs::remove_file(&path).ok();
    }
}
