//! Outgoing message assembly.
//!
//! Pure value construction: the dispatcher resolves templates and reads
//! attachment bytes beforehand, so building a [`Message`] touches neither
//! the filesystem nor the network.

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::{Address, Message};

use crate::config::Profile;
use crate::error::{MailpostError, Result};

/// Attachment payload approved by the gate: base filename plus raw bytes.
#[derive(Debug, Clone)]
pub struct AttachmentData {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Assemble the outgoing message.
///
/// From/To are always set (with display names when configured); Cc/Bcc
/// only when their addresses are non-empty; Subject only when non-empty
/// after templating. The body is always plain text, possibly empty.
pub fn build_message(
    profile: &Profile,
    subject: &str,
    body: &str,
    attachment: Option<AttachmentData>,
) -> Result<Message> {
    let mut builder = Message::builder()
        .from(mailbox("mail_from", &profile.mail_from, &profile.mail_from_name)?)
        .to(mailbox("mail_to", &profile.mail_to, &profile.mail_to_name)?);

    if !profile.mail_to_cc.is_empty() {
        builder = builder.cc(mailbox("mail_to_cc", &profile.mail_to_cc, "")?);
    }
    if !profile.mail_to_bcc.is_empty() {
        builder = builder.bcc(mailbox("mail_to_bcc", &profile.mail_to_bcc, "")?);
    }
    if !subject.is_empty() {
        builder = builder.subject(subject);
    }

    let result = match attachment {
        Some(att) => {
            let content_type =
                ContentType::parse("application/octet-stream").expect("valid content type");
            builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(Attachment::new(att.filename).body(att.bytes, content_type)),
            )
        }
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string()),
    };

    result.map_err(|e| MailpostError::Message(e.to_string()))
}

fn mailbox(field: &'static str, address: &str, display_name: &str) -> Result<Mailbox> {
    let parsed: Address = address.parse().map_err(|e| {
        MailpostError::Message(format!("invalid {field} address '{address}': {e}"))
    })?;
    let name = if display_name.is_empty() {
        None
    } else {
        Some(display_name.to_string())
    };
    Ok(Mailbox::new(name, parsed))
}
