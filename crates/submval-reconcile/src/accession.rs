use regex::Regex;

use crate::errors::{ReconcileError, ReconcileResult};

const ACCESSION_PATTERN: &str = r"^phs\d{6}$";

/// Check that a study accession looks like `phs000123`.
pub fn validate_accession(accession: &str) -> ReconcileResult<()> {
    let pattern =
        Regex::new(ACCESSION_PATTERN).map_err(|err| ReconcileError::Schema(err.to_string()))?;
    if pattern.is_match(accession.trim()) {
        Ok(())
    } else {
        Err(ReconcileError::InvalidAccession(accession.to_string()))
    }
}

/// Parse a study version recorded as a plain integer.
pub fn validate_version(version: &str) -> ReconcileResult<u32> {
    version
        .trim()
        .parse::<u32>()
        .map_err(|_| ReconcileError::InvalidVersion(version.to_string()))
}

/// Highest version among registry version strings such as
/// `phs000123.v1.p1|phs000123.v3`.
///
/// Pieces may be separated by `|` or `;`. Pieces without a readable `vN`
/// segment are ignored; `None` when nothing parses.
pub fn latest_version(versions: &str) -> Option<String> {
    versions
        .split(['|', ';'])
        .filter_map(|piece| {
            let segment = piece.trim().split('.').nth(1)?;
            segment.strip_prefix('v')?.parse::<u32>().ok()
        })
        .max()
        .map(|version| version.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accession_requires_six_digits() {
        assert!(validate_accession("phs000123").is_ok());
        assert!(validate_accession("phs00123").is_err());
        assert!(validate_accession("phs0001234").is_err());
        assert!(validate_accession("PHS000123").is_err());
    }

    #[test]
    fn version_must_be_integer() {
        assert_eq!(validate_version(" 3 ").expect("version"), 3);
        assert!(matches!(
            validate_version("v3"),
            Err(ReconcileError::InvalidVersion(_))
        ));
    }

    #[test]
    fn latest_version_picks_maximum() {
        assert_eq!(
            latest_version("phs000123.v1.p1|phs000123.v3").as_deref(),
            Some("3")
        );
        assert_eq!(
            latest_version("phs000123.v12.p1;phs000123.v2.p1").as_deref(),
            Some("12")
        );
        assert_eq!(latest_version("phs000123"), None);
    }
}
