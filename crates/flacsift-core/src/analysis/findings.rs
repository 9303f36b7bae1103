use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Which stage of the analysis produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Header,
    Metadata,
    Stream,
    Checksum,
    Io,
    Filename,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Header => "header",
            Category::Metadata => "metadata",
            Category::Stream => "stream",
            Category::Checksum => "checksum",
            Category::Io => "io",
            Category::Filename => "filename",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub category: Category,
    pub message: String,
}

impl Finding {
    pub fn error(category: Category, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            category,
            message: message.into(),
        }
    }

    pub fn warning(category: Category, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            category,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileStatus {
    Valid,
    ValidWithWarnings,
    Invalid,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Valid => "VALID",
            FileStatus::ValidWithWarnings => "VALID_WITH_WARNINGS",
            FileStatus::Invalid => "INVALID",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any error makes a file invalid; warnings alone only qualify it.
pub fn derive_status(findings: &[Finding]) -> FileStatus {
    if findings.iter().any(Finding::is_error) {
        FileStatus::Invalid
    } else if findings.is_empty() {
        FileStatus::Valid
    } else {
        FileStatus::ValidWithWarnings
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairAction {
    Reencode,
    Rename,
}

/// Remediation hint for a downstream repair tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairSuggestion {
    pub action: RepairAction,
    pub reason: &'static str,
}

pub fn suggest_repairs(status: FileStatus, findings: &[Finding]) -> Vec<RepairSuggestion> {
    if status == FileStatus::Invalid {
        return vec![RepairSuggestion {
            action: RepairAction::Reencode,
            reason: "structural corruption detected",
        }];
    }
    if findings.iter().any(|f| f.category == Category::Filename) {
        return vec![RepairSuggestion {
            action: RepairAction::Rename,
            reason: "non-portable filename",
        }];
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_empty_is_valid() {
        assert_eq!(derive_status(&[]), FileStatus::Valid);
    }

    #[test]
    fn test_status_warning_only() {
        let findings = vec![Finding::warning(Category::Filename, "trailing space")];
        assert_eq!(derive_status(&findings), FileStatus::ValidWithWarnings);
    }

    #[test]
    fn test_status_error_dominates() {
        let findings = vec![
            Finding::warning(Category::Filename, "trailing space"),
            Finding::error(Category::Metadata, "stream-info block missing"),
        ];
        assert_eq!(derive_status(&findings), FileStatus::Invalid);
    }

    #[test]
    fn test_suggestions() {
        let rename = vec![Finding::warning(Category::Filename, "reserved name")];
        let suggestions = suggest_repairs(derive_status(&rename), &rename);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].action, RepairAction::Rename);

        let broken = vec![Finding::error(Category::Header, "bad signature")];
        let suggestions = suggest_repairs(derive_status(&broken), &broken);
        assert_eq!(suggestions[0].action, RepairAction::Reencode);

        assert!(suggest_repairs(FileStatus::Valid, &[]).is_empty());
    }
}
