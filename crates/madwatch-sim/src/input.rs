//! Finite reading sources parsed from text.

use anyhow::{Context, Result, bail};
use std::io::Read;
use std::path::Path;

/// Parse whitespace or newline separated numbers. Lines starting with `#`
/// are comments.
pub fn parse_readings(text: &str) -> Result<Vec<f64>> {
    let mut readings = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        for token in line.split_whitespace() {
            let value: f64 = token
                .parse()
                .with_context(|| format!("line {}: invalid reading {:?}", line_no + 1, token))?;
            if !value.is_finite() {
                bail!("line {}: reading {:?} is not finite", line_no + 1, token);
            }
            readings.push(value);
        }
    }
    Ok(readings)
}

/// Read readings from `path`, or from stdin when `path` is `-`.
pub fn read_readings(path: &Path) -> Result<Vec<f64>> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    parse_readings(&text)
}
