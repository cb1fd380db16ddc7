use std::fs;
use std::path::Path;

fn write_minimal_env_template(file: &mut fs::File) -> std::io::Result<()> {
    use std::io::Write;
    writeln!(file, "# Redact cycler configuration")?;
    writeln!(file, "# Network defaults target Sepolia; override only when needed.")?;
    writeln!(file)?;
    writeln!(
        file,
        "#REDACT_RPC_URL=\"https://ethereum-sepolia-rpc.publicnode.com/\""
    )?;
    writeln!(file, "#REDACT_CHAIN_ID=\"11155111\"")?;
    writeln!(file)?;
    writeln!(file, "REDACT_CONFIG_FILE=\"config.json\"")?;
    writeln!(file, "REDACT_ACCOUNTS_FILE=\"pk.txt\"")?;
    writeln!(file, "REDACT_PROXY_FILE=\"proxy.txt\"")?;
    writeln!(file)?;
    writeln!(file, "RUST_LOG=\"info,redact_cycler=info\"")?;
    Ok(())
}

/// Splits a `.env` line into `(key, value)`, dropping comments and surrounding quotes.
pub fn parse_env_line(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    let value_no_comment = value.split('#').next().unwrap_or("").trim();
    let parsed = if value_no_comment.len() >= 2
        && ((value_no_comment.starts_with('"') && value_no_comment.ends_with('"'))
            || (value_no_comment.starts_with('\'') && value_no_comment.ends_with('\'')))
    {
        &value_no_comment[1..value_no_comment.len() - 1]
    } else {
        value_no_comment
    };
    Some((key, parsed))
}

fn load_dot_env() {
    let path = Path::new(".env");
    if !path.exists() {
        return;
    }

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ENV] Failed to read .env: {}", e);
            return;
        }
    };

    for (key, value) in content.lines().filter_map(parse_env_line) {
        // Process environment wins over the file.
        if std::env::var_os(key).is_some() {
            continue;
        }
        std::env::set_var(key, value);
    }
}

fn ensure_env_example_exists() {
    let env_example = Path::new(".env.example");
    if env_example.exists() {
        return;
    }
    if let Ok(mut file) = fs::File::create(env_example) {
        let _ = write_minimal_env_template(&mut file);
    }
}

pub fn harden_env_setup() {
    ensure_env_example_exists();
    load_dot_env();
}
