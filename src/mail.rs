pub use self::mailer::*;

#[cfg(feature = "debug-mailer")]
mod mailer {
    use lettre::{SendableEmail, Transport};
    use std::io::Read;

    pub struct DebugTransport;

    impl<'a> Transport<'a> for DebugTransport {
        type Result = Result<(), ()>;

        fn send(&mut self, email: SendableEmail) -> Self::Result {
            println!(
                "{}: from=<{}> to=<{:?}>\n{:#?}",
                email.message_id().to_string(),
                email
                    .envelope()
                    .from()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                email.envelope().to().to_vec(),
                {
                    let mut message = String::new();
                    email
                        .message()
                        .read_to_string(&mut message)
                        .map_err(|_| ())?;
                    message
                },
            );
            Ok(())
        }
    }

    pub type Mailer = Option<DebugTransport>;

    pub fn init() -> Mailer {
        Some(DebugTransport)
    }
}

#[cfg(not(feature = "debug-mailer"))]
mod mailer {
    use flock_models::CONFIG;
    use lettre::{
        smtp::{
            authentication::{Credentials, Mechanism},
            extension::ClientId,
            ConnectionReuseParameters,
        },
        SmtpClient, SmtpTransport,
    };

    pub type Mailer = Option<SmtpTransport>;

    pub fn init() -> Mailer {
        let config = CONFIG.mail.as_ref()?;
        let transport = SmtpClient::new_simple(&config.server)
            .ok()?
            .hello_name(ClientId::Domain(config.helo_name.clone()))
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .smtp_utf8(true)
            .authentication_mechanism(Mechanism::Plain)
            .connection_reuse(ConnectionReuseParameters::NoReuse)
            .transport();
        Some(transport)
    }
}

use flock_models::CONFIG;
use lettre_email::Email;

pub fn build_mail(dest: String, subject: String, body: String) -> Option<Email> {
    Email::builder()
        .from(
            CONFIG
                .mail
                .as_ref()
                .map(|m| m.username.clone())
                .unwrap_or_else(|| format!("flock@{}", CONFIG.base_url)),
        )
        .to(dest)
        .subject(subject)
        .text(body)
        .build()
        .ok()
}
