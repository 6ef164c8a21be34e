use anyhow::Result;
use gridcrypt::breaker::divisors;
use gridcrypt::cli::load_ciphertext;
use std::collections::BTreeMap;
use std::path::Path;

/// A grid shape that holds the ciphertext with no remainder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub columns: usize,
    pub rows: usize,
}

/// Every `columns × rows` grid whose cell count equals `len`
pub fn grid_shapes(len: usize) -> Vec<GridShape> {
    let mut columns = divisors(len);
    if len > 0 {
        columns.push(len);
    }
    columns
        .into_iter()
        .map(|columns| GridShape {
            columns,
            rows: len / columns,
        })
        .collect()
}

/// Describe which keys a ciphertext file could have been produced with.
pub fn analyze_file(path: &Path, raw: bool) -> Result<String> {
    let ciphertext = load_ciphertext(path, raw)?;
    let len = ciphertext.chars().count();

    let mut frequency: BTreeMap<char, usize> = BTreeMap::new();
    for c in ciphertext.chars() {
        *frequency.entry(c).or_default() += 1;
    }
    let mut common: Vec<(char, usize)> = frequency.into_iter().collect();
    common.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut output = String::new();
    output.push_str("Grid Transpose Analyzer\n");
    output.push_str("=======================\n\n");
    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Ciphertext length: {}\n", len));
    output.push_str(&format!("Distinct characters: {}\n\n", common.len()));

    output.push_str("Lossless grid shapes (key = columns):\n");
    let shapes = grid_shapes(len);
    if shapes.is_empty() {
        output.push_str("  none\n");
    }
    for shape in shapes {
        output.push_str(&format!(
            "  k={:<5} {} rows\n",
            shape.columns, shape.rows
        ));
    }

    // Transposition keeps letter counts, so these match the plaintext's
    output.push_str("\nMost common characters:\n");
    for (c, count) in common.iter().take(5) {
        output.push_str(&format!("  {:?} {}\n", c, count));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_grid_shapes() {
        let shapes = grid_shapes(12);
        let columns: Vec<usize> = shapes.iter().map(|s| s.columns).collect();
        assert_eq!(columns, vec![1, 2, 3, 4, 6, 12]);
        assert!(shapes.iter().all(|s| s.columns * s.rows == 12));
        assert!(grid_shapes(0).is_empty());
    }

    #[test]
    fn test_analyze_file_lists_shapes() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("ct.txt");
        std::fs::write(&input, "CPGPRTRHYOAY\n").unwrap();
        let report = analyze_file(&input, false).unwrap();
        assert!(report.contains("Ciphertext length: 12"));
        assert!(report.contains("k=3     4 rows"));
        assert!(report.contains("'Y' 2"));
    }
}
