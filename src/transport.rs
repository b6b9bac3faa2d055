//! SMTP delivery boundary.
//!
//! [`MailTransport`] is the seam between the pipeline and the network;
//! tests substitute a recording mock, production uses [`SmtpMailer`].

use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};

use crate::config::Profile;
use crate::error::{MailpostError, Result};

/// Port used when the profile leaves `mail_server_port` at 0.
pub const DEFAULT_SMTP_PORT: u16 = 25;

/// Synchronous delivery of one assembled message.
pub trait MailTransport {
    fn deliver(&self, message: &Message) -> Result<()>;
}

/// Production transport wrapping a blocking [`SmtpTransport`].
pub struct SmtpMailer {
    inner: SmtpTransport,
}

impl SmtpMailer {
    /// Build the transport from the profile's server settings.
    ///
    /// `mail_server_ssl` selects TLS-on-connect; otherwise STARTTLS is
    /// used opportunistically when the server offers it. The expected
    /// server name for certificate checks is the configured host.
    pub fn from_profile(profile: &Profile) -> Result<Self> {
        let host = profile.mail_server.as_str();
        let port = if profile.mail_server_port == 0 {
            DEFAULT_SMTP_PORT
        } else {
            profile.mail_server_port
        };

        let tls = TlsParameters::builder(host.to_string())
            .dangerous_accept_invalid_certs(profile.skip_cert_verify)
            .build()
            .map_err(|e| MailpostError::Transport(format!("TLS configuration error: {e}")))?;

        let mut builder = SmtpTransport::builder_dangerous(host).port(port).tls(
            if profile.mail_server_ssl {
                Tls::Wrapper(tls)
            } else {
                Tls::Opportunistic(tls)
            },
        );

        if !profile.auth_user.is_empty() {
            builder = builder.credentials(Credentials::new(
                profile.auth_user.clone(),
                profile.auth_pass.clone(),
            ));
        }

        Ok(Self {
            inner: builder.build(),
        })
    }
}

impl MailTransport for SmtpMailer {
    fn deliver(&self, message: &Message) -> Result<()> {
        self.inner
            .send(message)
            .map(|_| ())
            .map_err(|e| MailpostError::Transport(e.to_string()))
    }
}
