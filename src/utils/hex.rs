use alloy::primitives::{Address, B256};

/// Clean a hex string by removing "0x" prefix and whitespace
pub fn clean_hex(s: &str) -> &str {
    let s = s.trim();
    if let Some(stripped) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        stripped
    } else {
        s
    }
}

fn shorten(full: &str) -> String {
    if full.len() <= 10 {
        return full.to_string();
    }
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// `0x1234...abcd` rendering of a checksummed address for log lines.
pub fn short_address(address: Address) -> String {
    shorten(&address.to_string())
}

pub fn short_hash(hash: B256) -> String {
    shorten(&format!("{hash:#x}"))
}
