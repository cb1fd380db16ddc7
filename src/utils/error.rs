use crate::error::SubmissionErrorKind;

/// Node messages that mean the nonce we signed with cannot be used as-is.
const NONCE_CONFLICT_HINTS: [&str; 6] = [
    "nonce too low",
    "nonce too high",
    "invalid nonce",
    "already known",
    "replacement transaction underpriced",
    "known transaction",
];

const UNDERPRICED_HINTS: [&str; 4] = [
    "underpriced",
    "fee too low",
    "max fee per gas less than block base fee",
    "feecap",
];

const INSUFFICIENT_FUNDS_HINTS: [&str; 2] = ["insufficient funds", "insufficient balance"];

pub fn compact_error_message(message: &str, max_len: usize) -> String {
    let mut raw = message.to_string();
    if let Some((prefix, _)) = raw.split_once(" text: ") {
        raw = format!("{prefix} text=<omitted>");
    }
    if let Some((prefix, _)) = raw.split_once("Stack backtrace:") {
        raw = prefix.to_string();
    }

    let mut compact = String::with_capacity(raw.len().min(max_len.saturating_add(16)));
    let mut prev_ws = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !prev_ws && !compact.is_empty() {
                compact.push(' ');
            }
            prev_ws = true;
            continue;
        }
        compact.push(ch);
        prev_ws = false;
        if compact.len() > max_len {
            break;
        }
    }
    if compact.len() <= max_len {
        compact
    } else {
        let mut cut = max_len;
        while !compact.is_char_boundary(cut) {
            cut -= 1;
        }
        compact.truncate(cut);
        compact.push_str("...(truncated)");
        compact
    }
}

/// Maps a node's rejection text onto [`SubmissionErrorKind`].
///
/// JSON-RPC rejections only carry free text, so this is the single place where
/// that text is inspected; everything downstream matches on the enum.
pub fn classify_submission_error(message: &str) -> SubmissionErrorKind {
    let msg = message.to_ascii_lowercase();
    if NONCE_CONFLICT_HINTS.iter().any(|needle| msg.contains(needle)) {
        return SubmissionErrorKind::NonceConflict;
    }
    if UNDERPRICED_HINTS.iter().any(|needle| msg.contains(needle)) {
        return SubmissionErrorKind::Underpriced;
    }
    if INSUFFICIENT_FUNDS_HINTS
        .iter()
        .any(|needle| msg.contains(needle))
    {
        return SubmissionErrorKind::InsufficientFunds;
    }
    SubmissionErrorKind::Rejected
}
