//! Profile configuration.
//!
//! Configuration is a TOML file with named sections. The effective profile
//! is the `[general]` table merged with the table named by `--table`
//! (section keys win), deserialized with defaults for anything unset.
//!
//! The file is located at:
//! 1. The `--config` path, when given
//! 2. `./mailpost.toml`
//! 3. `/etc/mailpost.toml`

use std::path::{Path, PathBuf};

use lettre::Address;
use serde::{Deserialize, Serialize};

use crate::error::{MailpostError, Result};

/// The merged, validated settings for one run. Immutable after load; the
/// only post-load mutation is the `--mailto` recipient override applied
/// before [`validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// SMTP server hostname.
    pub mail_server: String,
    /// SMTP server port (0 = default 25).
    pub mail_server_port: u16,
    /// TLS-on-connect instead of opportunistic STARTTLS.
    pub mail_server_ssl: bool,
    /// SMTP username (empty = no authentication).
    pub auth_user: String,
    /// SMTP password.
    pub auth_pass: String,
    /// Skip server certificate verification.
    pub skip_cert_verify: bool,
    /// Sender address.
    pub mail_from: String,
    /// Sender display name.
    pub mail_from_name: String,
    /// Recipient address.
    pub mail_to: String,
    /// Recipient display name.
    pub mail_to_name: String,
    /// Carbon-copy address (empty = no Cc header).
    pub mail_to_cc: String,
    /// Blind-carbon-copy address (empty = no Bcc header).
    pub mail_to_bcc: String,
    /// Subject template, at most one `%s` slot.
    pub msg_subj: String,
    /// Plain-text body template, at most one `%s` slot.
    pub msg_text: String,
    /// Append-mode log file (empty = log to stdout).
    pub log_file: String,
    /// Attachment path template, at most one `%s` slot.
    pub attach_file: String,
    /// Maximum attachment size in bytes (0 = unlimited).
    pub max_file_size: u64,
    /// Directory for the best-effort side copy (empty = no copy).
    pub copy_to_path: String,
    /// Regex the attachment name must match to proceed.
    pub match_name: String,
    /// Regex that skips the run when the attachment name matches.
    pub skip_name: String,
}

impl Profile {
    /// Copy with the password hidden, for debug dumps.
    pub fn redacted(&self) -> Profile {
        let mut copy = self.clone();
        if !copy.auth_pass.is_empty() {
            copy.auth_pass = "<redacted>".to_string();
        }
        copy
    }
}

// ── Load / merge ────────────────────────────────────────────────

/// Load and merge the profile for `section` from the configuration file.
pub fn load(explicit: Option<&Path>, section: &str) -> Result<Profile> {
    let path = config_file_path(explicit)?;
    let contents =
        std::fs::read_to_string(&path).map_err(|e| MailpostError::io(&path, e))?;
    tracing::debug!(path = %path.display(), section, "loading configuration");
    parse(&contents, section)
}

/// Merge `[general]` with the named section and deserialize the result.
///
/// A missing named section is tolerated: the profile is then `[general]`
/// alone. An unparsable file or a value of the wrong type is fatal.
pub fn parse(contents: &str, section: &str) -> Result<Profile> {
    let root: toml::Table =
        toml::from_str(contents).map_err(|e| MailpostError::ConfigParse(e.to_string()))?;

    let mut merged = match root.get("general") {
        Some(toml::Value::Table(table)) => table.clone(),
        _ => toml::Table::new(),
    };

    if section != "general" {
        match root.get(section) {
            Some(toml::Value::Table(table)) => {
                for (key, value) in table {
                    merged.insert(key.clone(), value.clone());
                }
            }
            _ => tracing::debug!(section, "section not found, using [general] only"),
        }
    }

    toml::Value::Table(merged)
        .try_into()
        .map_err(|e| MailpostError::ConfigParse(e.to_string()))
}

/// Determine the configuration file path (explicit flag, then cwd, then /etc).
fn config_file_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    for candidate in ["mailpost.toml", "/etc/mailpost.toml"] {
        let candidate = Path::new(candidate);
        if candidate.exists() {
            return Ok(candidate.to_path_buf());
        }
    }
    Err(MailpostError::ConfigNotFound(
        "./mailpost.toml, /etc/mailpost.toml".to_string(),
    ))
}

// ── Validation ──────────────────────────────────────────────────

/// Validate the profile fields, aggregating every failure into one error.
pub fn validate(profile: &Profile) -> Result<()> {
    let mut problems = Vec::new();

    if profile.mail_server.is_empty() {
        problems.push("mail_server is required".to_string());
    } else if !is_valid_hostname(&profile.mail_server) {
        problems.push(format!(
            "mail_server '{}' is not a valid hostname",
            profile.mail_server
        ));
    }

    check_email(&mut problems, "mail_from", &profile.mail_from, true);
    check_email(&mut problems, "mail_to", &profile.mail_to, true);
    check_email(&mut problems, "mail_to_cc", &profile.mail_to_cc, false);
    check_email(&mut problems, "mail_to_bcc", &profile.mail_to_bcc, false);

    if problems.is_empty() {
        Ok(())
    } else {
        Err(MailpostError::Validation(problems.join("; ")))
    }
}

fn check_email(problems: &mut Vec<String>, field: &str, value: &str, required: bool) {
    if value.is_empty() {
        if required {
            problems.push(format!("{field} is required"));
        }
        return;
    }
    if value.parse::<Address>().is_err() {
        problems.push(format!("{field} '{value}' is not a valid email address"));
    }
}

/// RFC 1123 label check: dot-separated labels of alphanumerics and hyphens.
fn is_valid_hostname(host: &str) -> bool {
    if host.is_empty() || host.len() > 253 {
        return false;
    }
    host.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_profile() -> Profile {
        Profile {
            mail_server: "smtp.example.com".to_string(),
            mail_from: "sender@example.com".to_string(),
            mail_to: "dest@example.com".to_string(),
            ..Profile::default()
        }
    }

    #[test]
    fn test_parse_general_only() {
        let contents = r#"
[general]
mail_server = "smtp.example.com"
mail_from = "sender@example.com"
mail_to = "dest@example.com"
max_file_size = 1024
"#;
        let profile = parse(contents, "general").expect("parse");
        assert_eq!(profile.mail_server, "smtp.example.com");
        assert_eq!(profile.max_file_size, 1024);
        assert_eq!(profile.mail_server_port, 0);
        assert!(!profile.mail_server_ssl);
    }

    #[test]
    fn test_parse_section_overrides_general() {
        let contents = r#"
[general]
mail_server = "smtp.example.com"
mail_from = "sender@example.com"
mail_to = "general@example.com"
msg_subj = "General: %s"

[backups]
mail_to = "backups@example.com"
match_name = "\\.tar\\.gz$"
"#;
        let profile = parse(contents, "backups").expect("parse");
        // Section key wins
        assert_eq!(profile.mail_to, "backups@example.com");
        assert_eq!(profile.match_name, "\\.tar\\.gz$");
        // General keys survive where the section is silent
        assert_eq!(profile.mail_server, "smtp.example.com");
        assert_eq!(profile.msg_subj, "General: %s");
    }

    #[test]
    fn test_parse_missing_section_uses_general() {
        let contents = r#"
[general]
mail_server = "smtp.example.com"
"#;
        let profile = parse(contents, "nope").expect("parse");
        assert_eq!(profile.mail_server, "smtp.example.com");
    }

    #[test]
    fn test_parse_invalid_toml_is_fatal() {
        assert!(matches!(
            parse("not [valid toml", "general"),
            Err(MailpostError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_parse_wrong_type_is_fatal() {
        let contents = r#"
[general]
max_file_size = "lots"
"#;
        assert!(matches!(
            parse(contents, "general"),
            Err(MailpostError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_validate_ok() {
        assert!(validate(&valid_profile()).is_ok());
    }

    #[test]
    fn test_validate_aggregates_failures() {
        let profile = Profile {
            mail_server: "bad host!".to_string(),
            mail_from: "not-an-email".to_string(),
            ..Profile::default()
        };
        let err = validate(&profile).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("mail_server"));
        assert!(text.contains("mail_from"));
        assert!(text.contains("mail_to is required"));
    }

    #[test]
    fn test_validate_optional_cc_checked_when_present() {
        let mut profile = valid_profile();
        profile.mail_to_cc = "broken@".to_string();
        let err = validate(&profile).unwrap_err();
        assert!(err.to_string().contains("mail_to_cc"));

        profile.mail_to_cc = String::new();
        assert!(validate(&profile).is_ok());
    }

    #[test]
    fn test_hostname_rules() {
        assert!(is_valid_hostname("localhost"));
        assert!(is_valid_hostname("smtp.example.com"));
        assert!(is_valid_hostname("mail-1.example.co.uk"));
        assert!(!is_valid_hostname(""));
        assert!(!is_valid_hostname("-leading.example.com"));
        assert!(!is_valid_hostname("trailing-.example.com"));
        assert!(!is_valid_hostname("under_score.example.com"));
        assert!(!is_valid_hostname("double..dot"));
    }

    #[test]
    fn test_redacted_hides_password() {
        let mut profile = valid_profile();
        profile.auth_pass = "hunter2".to_string();
        let dump = format!("{:?}", profile.redacted());
        assert!(!dump.contains("hunter2"));
        assert!(dump.contains("<redacted>"));
    }
}
