//! Pipeline orchestration: filter, delay, side copy, gate, build, send.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Profile;
use crate::error::Result;
use crate::message::{self, AttachmentData};
use crate::transport::MailTransport;
use crate::{copier, filter, gate, template};

/// Subject used when a file argument exists but the profile sets none.
const DEFAULT_SUBJECT: &str = "Attachment: %s";

/// Per-invocation options taken from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// The positional attachment-file argument, if any.
    pub attachment_arg: Option<String>,
    /// Pause after filtering, before any copy or send action.
    pub delay: Duration,
}

/// Result of one pipeline run. `Skipped` maps to exit code 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Sent { recipient: String },
    Skipped(String),
}

/// Drive the whole sequence and hand the message to the transport.
///
/// Filter skips and advisory attachment failures are not errors; a
/// transport failure is.
pub fn run(
    profile: &Profile,
    options: &RunOptions,
    transport: &dyn MailTransport,
) -> Result<Outcome> {
    let attach_name = options.attachment_arg.as_deref().unwrap_or("");
    if attach_name.is_empty() {
        tracing::warn!("no attachment argument given");
    } else {
        tracing::info!(file = %attach_name, "attachment argument");
    }

    match filter::evaluate(attach_name, &profile.match_name, &profile.skip_name)? {
        filter::Decision::Proceed => {}
        filter::Decision::Skip(reason) => {
            tracing::debug!(%reason, "filtered, nothing to do");
            return Ok(Outcome::Skipped(reason));
        }
    }

    if !options.delay.is_zero() {
        tracing::info!(seconds = options.delay.as_secs(), "sleeping before dispatch");
        std::thread::sleep(options.delay);
    }

    let (subject, body) = render_parts(profile, attach_name);
    let candidate = resolve_candidate(&profile.attach_file, attach_name);

    if let Some(src) = candidate.as_deref() {
        if !profile.copy_to_path.is_empty() {
            match copier::copy_to_dir(src, Path::new(&profile.copy_to_path)) {
                Ok(dest) => {
                    tracing::info!(from = %src.display(), to = %dest.display(), "side copy written");
                }
                Err(e) => {
                    tracing::warn!(from = %src.display(), error = %e, "side copy failed, continuing");
                }
            }
        }
    }

    let attachment = candidate
        .as_deref()
        .and_then(|path| load_attachment(path, profile.max_file_size));

    let message = message::build_message(profile, &subject, &body, attachment)?;
    transport.deliver(&message)?;
    tracing::info!(recipient = %profile.mail_to, "mail sent");

    Ok(Outcome::Sent {
        recipient: profile.mail_to.clone(),
    })
}

/// Resolve the attachment candidate from the configured path template.
///
/// An empty `attach_file` means no candidate even when an argument was
/// given; with no argument the template is used literally.
fn resolve_candidate(attach_file: &str, attach_name: &str) -> Option<PathBuf> {
    if attach_file.is_empty() {
        return None;
    }
    if attach_name.is_empty() {
        return Some(PathBuf::from(attach_file));
    }
    Some(PathBuf::from(template::render(attach_file, attach_name)))
}

/// Template the subject and body.
///
/// With an attachment name: an empty subject defaults to
/// `"Attachment: %s"`, then both subject and body are rendered. Without
/// one, the configured strings pass through literally.
fn render_parts(profile: &Profile, attach_name: &str) -> (String, String) {
    if attach_name.is_empty() {
        return (profile.msg_subj.clone(), profile.msg_text.clone());
    }

    let subject_template = if profile.msg_subj.is_empty() {
        DEFAULT_SUBJECT
    } else {
        profile.msg_subj.as_str()
    };
    let subject = template::render(subject_template, attach_name);
    let body = if profile.msg_text.is_empty() {
        String::new()
    } else {
        template::render(&profile.msg_text, attach_name)
    };
    (subject, body)
}

/// Gate check plus byte read. Advisory: any failure means "send without
/// attachment".
fn load_attachment(path: &Path, max_size: u64) -> Option<AttachmentData> {
    match gate::check(path, max_size) {
        gate::Decision::Attach => {}
        gate::Decision::Unreadable => {
            tracing::warn!(path = %path.display(), "attachment unreadable, sending without it");
            return None;
        }
        gate::Decision::Oversize { size, limit } => {
            tracing::warn!(path = %path.display(), size, limit, "attachment too large, sending without it");
            return None;
        }
    }

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());

    match std::fs::read(path) {
        Ok(bytes) => {
            tracing::info!(path = %path.display(), "file attached");
            Some(AttachmentData { filename, bytes })
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read attachment, sending without it");
            None
        }
    }
}
