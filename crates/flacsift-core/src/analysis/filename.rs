use super::findings::{Category, Finding};

const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const MAX_NAME_BYTES: usize = 255;

/// Warn about file names that will not survive a copy to every common filesystem.
pub fn check_filename(name: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    let mut reserved: Vec<char> = name.chars().filter(|c| RESERVED_CHARS.contains(c)).collect();
    reserved.dedup();
    if !reserved.is_empty() {
        let list: String = reserved.iter().collect();
        findings.push(Finding::warning(
            Category::Filename,
            format!("Filename contains reserved characters: {}", list),
        ));
    }

    if name.chars().any(char::is_control) {
        findings.push(Finding::warning(
            Category::Filename,
            "Filename contains control characters",
        ));
    }

    let stem = name.split('.').next().unwrap_or(name);
    if RESERVED_NAMES
        .iter()
        .any(|reserved| stem.eq_ignore_ascii_case(reserved))
    {
        findings.push(Finding::warning(
            Category::Filename,
            format!("Filename uses a reserved device name: {}", stem),
        ));
    }

    if name.ends_with('.') || name.ends_with(' ') {
        findings.push(Finding::warning(
            Category::Filename,
            "Filename ends with a dot or space",
        ));
    }

    if name.len() > MAX_NAME_BYTES {
        findings.push(Finding::warning(
            Category::Filename,
            format!(
                "Filename is {} bytes long (limit {})",
                name.len(),
                MAX_NAME_BYTES
            ),
        ));
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portable_name() {
        assert!(check_filename("01 - Intro (Remastered).flac").is_empty());
        assert!(check_filename("Sigur Rós - Hoppípolla.flac").is_empty());
    }

    #[test]
    fn test_reserved_characters() {
        let findings = check_filename("What? Why: Now.flac");
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.ends_with("?:"));
    }

    #[test]
    fn test_reserved_device_name() {
        assert_eq!(check_filename("con.flac").len(), 1);
        assert_eq!(check_filename("console.flac").len(), 0);
    }

    #[test]
    fn test_trailing_and_length() {
        assert_eq!(check_filename("track.flac ").len(), 1);
        let long = format!("{}.flac", "a".repeat(260));
        assert_eq!(check_filename(&long).len(), 1);
        assert_eq!(check_filename("tab\there.flac").len(), 1);
    }
}
