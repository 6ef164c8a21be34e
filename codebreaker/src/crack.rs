use anyhow::{bail, Result};
use gridcrypt::breaker::{analyze_ciphertext, BreakReport};
use gridcrypt::cipher::decrypt;
use gridcrypt::cli::{load_candidates, load_ciphertext};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct CrackOptions {
    /// Candidate words given on the command line
    pub words: Vec<String>,
    /// Dictionary file with one candidate per line
    pub dictionary: Option<PathBuf>,
    pub json: bool,
    /// Decrypt under every recovered key and list the readable results
    pub plaintexts: bool,
    pub raw: bool,
}

/// A decryption under one recovered key that contains a candidate word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidatePlaintext {
    pub key: usize,
    pub plaintext: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: String,
    #[serde(flatten)]
    report: &'a BreakReport,
    plaintexts: &'a [CandidatePlaintext],
}

/// Recover candidate keys for a ciphertext file
pub fn run(path: &Path, options: &CrackOptions) -> Result<String> {
    let ciphertext = load_ciphertext(path, options.raw)?;
    let mut words = options.words.clone();
    if let Some(dictionary) = &options.dictionary {
        words.extend(load_candidates(dictionary)?);
    }
    if words.is_empty() {
        bail!("No candidate words given (use --word or --words)");
    }

    let report = analyze_ciphertext(&ciphertext, &words);
    let plaintexts = if options.plaintexts {
        candidate_plaintexts(&ciphertext, &report, &words)?
    } else {
        Vec::new()
    };

    if options.json {
        let json = JsonReport {
            file: path.display().to_string(),
            report: &report,
            plaintexts: &plaintexts,
        };
        return Ok(format!("{}\n", serde_json::to_string_pretty(&json)?));
    }

    Ok(render_text(path, &words, &report, options.plaintexts, &plaintexts))
}

/// Decrypt under each key either reading produced and keep the results that
/// contain at least one candidate word
pub fn candidate_plaintexts(
    ciphertext: &str,
    report: &BreakReport,
    words: &[String],
) -> Result<Vec<CandidatePlaintext>> {
    let keys: BTreeSet<usize> = report
        .reported_keys
        .union(&report.implied_keys)
        .copied()
        .filter(|&k| k > 0)
        .collect();

    let mut found = Vec::new();
    for key in keys {
        let plaintext = decrypt(key, ciphertext)?;
        if words.iter().any(|w| plaintext.contains(w.as_str())) {
            found.push(CandidatePlaintext { key, plaintext });
        }
    }
    Ok(found)
}

fn render_text(
    path: &Path,
    words: &[String],
    report: &BreakReport,
    show_plaintexts: bool,
    plaintexts: &[CandidatePlaintext],
) -> String {
    let mut output = String::new();
    output.push_str("Codebreaker Key Recovery\n");
    output.push_str("========================\n\n");
    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Ciphertext length: {}\n", report.ciphertext_len));
    output.push_str(&format!("Candidate words: {}\n", words.len()));
    output.push_str(&format!("Strides tried: {}\n\n", join(&report.divisors)));

    if report.matches.is_empty() {
        output.push_str("No candidate word found.\n");
        return output;
    }

    output.push_str("Matches:\n");
    for m in &report.matches {
        output.push_str(&format!(
            "  {:<16} start {:>4}  stride {:>4}\n",
            m.word, m.start, m.stride
        ));
    }
    output.push('\n');
    output.push_str(&format!(
        "Possible keys (length ratio): {}\n",
        join(&report.reported_keys)
    ));
    output.push_str(&format!(
        "Possible keys (from stride): {}\n",
        join(&report.implied_keys)
    ));

    if show_plaintexts {
        output.push_str("\nPlaintexts:\n");
        if plaintexts.is_empty() {
            output.push_str("  none contain a candidate word\n");
        }
        for candidate in plaintexts {
            output.push_str(&format!("  k={:<4} {}\n", candidate.key, candidate.plaintext));
        }
    }

    output
}

fn join<'a>(values: impl IntoIterator<Item = &'a usize>) -> String {
    let parts: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_run_reports_both_readings() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("ct.txt");
        std::fs::write(&input, "CPGPRTRHYOAY\n").unwrap();

        let options = CrackOptions {
            words: vec!["CRY".into()],
            plaintexts: true,
            ..Default::default()
        };
        let report = run(&input, &options).unwrap();
        assert!(report.contains("Possible keys (length ratio): 4"));
        assert!(report.contains("Possible keys (from stride): 3"));
        assert!(report.contains("k=3    CRYPTOGRAPHY"));
    }

    #[test]
    fn test_run_json() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("ct.txt");
        let words = dir.path().join("words.txt");
        std::fs::write(&input, "ACDHTITKAOHNTAWLEEATNDLN").unwrap();
        std::fs::write(&words, "# battle plan\nDAWN\nLINE\n").unwrap();

        let options = CrackOptions {
            dictionary: Some(words),
            json: true,
            plaintexts: true,
            ..Default::default()
        };
        let output = run(&input, &options).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["ciphertext_len"], 24);
        assert_eq!(value["reported_keys"], serde_json::json!([6]));
        assert_eq!(value["implied_keys"], serde_json::json!([4]));
        assert_eq!(value["plaintexts"][0]["key"], 4);
        assert_eq!(
            value["plaintexts"][0]["plaintext"],
            "ATTACKATDAWNHOLDTHELINEN"
        );
    }

    #[test]
    fn test_run_requires_words() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("ct.txt");
        std::fs::write(&input, "CPGPRTRHYOAY").unwrap();
        assert!(run(&input, &CrackOptions::default()).is_err());
    }

    #[test]
    fn test_no_match() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("ct.txt");
        std::fs::write(&input, "CPGPRTRHYOAY").unwrap();
        let options = CrackOptions {
            words: vec!["ZEBRA".into()],
            ..Default::default()
        };
        assert!(run(&input, &options).unwrap().contains("No candidate word found."));
    }
}
