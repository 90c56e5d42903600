// Log query helpers: timestamp parsing and line assembly

use chrono::{DateTime, Utc};

/// Parses a `since`/`until` filter into unix seconds relative to `now`.
///
/// Accepted forms: unix seconds (`1700000000`, `1700000000.5`), RFC 3339
/// (`2024-01-02T15:04:05Z`), or a relative duration meaning "that long ago"
/// (`90s`, `10m`, `1h30m`, `2d`).
pub fn parse_timestamp(value: &str, now: DateTime<Utc>) -> Result<i64, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("empty timestamp".into());
    }
    if let Ok(secs) = value.parse::<i64>() {
        return Ok(secs);
    }
    if let Ok(secs) = value.parse::<f64>() {
        // `as` would turn nan into 0 and inf into i64::MAX
        if !secs.is_finite() || secs.abs() >= i64::MAX as f64 {
            return Err(format!("invalid timestamp or duration: {:?}", value));
        }
        return Ok(secs.trunc() as i64);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp());
    }
    let ago = parse_duration_secs(value)
        .ok_or_else(|| format!("invalid timestamp or duration: {:?}", value))?;
    Ok(now.timestamp() - ago)
}

/// `1h30m` style durations; units d, h, m, s. Returns seconds.
fn parse_duration_secs(value: &str) -> Option<i64> {
    let mut total = 0i64;
    let mut digits = String::new();
    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let n: i64 = digits.parse().ok()?;
        digits.clear();
        let unit = match ch {
            'd' => 86_400,
            'h' => 3_600,
            'm' => 60,
            's' => 1,
            _ => return None,
        };
        total = total.checked_add(n.checked_mul(unit)?)?;
    }
    // trailing number without a unit
    if !digits.is_empty() {
        return None;
    }
    Some(total)
}

/// Reassembles log chunks into lines. Chunks do not align with newlines, so
/// a partial line is held until its terminator (or the end of the stream).
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    pending: String,
    lines: Vec<String>,
}

impl LineBuffer {
    pub(crate) fn push(&mut self, chunk: &[u8]) {
        self.pending.push_str(&String::from_utf8_lossy(chunk));
        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            self.lines
                .push(line.trim_end_matches(['\n', '\r']).to_string());
        }
    }

    pub(crate) fn finish(mut self) -> Vec<String> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.lines.push(rest.trim_end_matches('\r').to_string());
        }
        self.lines
    }
}
