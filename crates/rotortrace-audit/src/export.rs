//! The exporter: serialize a filtered set of entries for transfer.
//!
//! CSV is the baseline tabular format; JSON is the richer structured
//! format. A requested format with no implementation degrades to CSV, and
//! the degrade is logged explicitly so it is never silent.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use rotortrace_contracts::entry::AuditLogEntry;

/// Transfer formats accepted by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    /// Accepted for forward compatibility; currently degrades to CSV.
    Pdf,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

/// Render `entries` in the requested format.
pub fn render(entries: &[AuditLogEntry], format: ExportFormat) -> Vec<u8> {
    match format {
        ExportFormat::Csv => render_csv(entries),
        ExportFormat::Json => render_json(entries),
        ExportFormat::Pdf => {
            warn!(
                requested = %ExportFormat::Pdf,
                served = %ExportFormat::Csv,
                "export format not implemented; degrading to tabular format"
            );
            render_csv(entries)
        }
    }
}

fn render_csv(entries: &[AuditLogEntry]) -> Vec<u8> {
    let mut out = String::from("timestamp,user,action,category,level,description,changes\n");

    for entry in entries {
        let changes = entry
            .changes
            .as_ref()
            .map(|changes| {
                serde_json::to_string(changes)
                    .unwrap_or_else(|_| "[]".to_string())
            })
            .unwrap_or_default();

        let row = [
            entry.timestamp.to_rfc3339(),
            entry.actor.user_name.clone(),
            entry.action.as_str().to_string(),
            entry.category.as_str().to_string(),
            entry.level.as_str().to_string(),
            entry.description.clone(),
            changes,
        ];

        let escaped: Vec<String> = row.iter().map(|field| csv_escape(field)).collect();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }

    out.into_bytes()
}

fn render_json(entries: &[AuditLogEntry]) -> Vec<u8> {
    // Entries round-trip through serde by construction; an empty array is
    // the only sensible fallback if that ever stops holding.
    serde_json::to_vec_pretty(entries).unwrap_or_else(|_| b"[]".to_vec())
}

/// RFC-4180-style quoting: fields containing a comma, quote, or newline are
/// wrapped in quotes, with inner quotes doubled.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_escape_quotes_only_when_needed() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn empty_set_exports_header_only() {
        let bytes = render(&[], ExportFormat::Csv);
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "timestamp,user,action,category,level,description,changes\n"
        );
    }
}
