//! Interactive test account registration
//!
//! Walks through email/password entry, requests a verification code, and
//! accepts up to three codes the server can reject. Malformed codes are
//! turned away locally and do not use up an attempt.

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use crate::account::Credentials;
use crate::api::auth::HEALTH_PATH;
use crate::api::{ApiClient, AuthClient, CodeRequest, VerificationCode};
use crate::common::config::Config;
use crate::common::{Error, RegistrationFailure, Result};

/// Codes the server may reject before the wizard gives up
pub const MAX_CODE_ATTEMPTS: u32 = 3;

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 4;

/// Budget of server-side code attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptBudget {
    remaining: u32,
}

impl AttemptBudget {
    pub fn new(attempts: u32) -> Self {
        Self {
            remaining: attempts,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Spend one attempt on a code the server rejected
    pub fn consume(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

/// Loose email shape check, just enough to catch typos
pub fn looks_like_email(input: &str) -> bool {
    input.contains('@') && input.contains('.')
}

/// Line-oriented prompt over any reader/writer pair
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Print a prompt and read one trimmed line
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt.cyan())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before registration finished",
            )));
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, line: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }
}

/// Run the wizard on the terminal
pub async fn run(config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.server)?;
    let stdin = io::stdin();
    let stdout = io::stdout();

    println!("\n{}", "=".repeat(60));
    println!("{}", "KairoIO Server - Account Registration".bold().cyan());
    println!("{}", "=".repeat(60));

    run_wizard(
        &client,
        stdin.lock(),
        stdout.lock(),
        &config.account.credentials_file,
    )
    .await?;
    Ok(())
}

/// Drive a full registration over arbitrary input/output
///
/// On success the credentials are saved to `save_to` and returned.
pub async fn run_wizard<R: BufRead, W: Write>(
    client: &ApiClient,
    input: R,
    output: W,
    save_to: &Path,
) -> Result<Credentials> {
    let mut prompt = Prompter { input, output };
    let auth = AuthClient::new(client);

    match client.get(HEALTH_PATH).await {
        Ok(response) if response.is_status_success() => {
            prompt.say(format!("{} Server is running", "✓".green()))?;
        }
        Ok(response) => {
            prompt.say(format!(
                "{} Server returned unexpected status {}",
                "✗".red(),
                response.status
            ))?;
        }
        Err(e) => {
            tracing::debug!(error = %e, "health probe failed");
            return Err(Error::ServerUnavailable(client.base_url().to_string()));
        }
    }

    prompt.say(format!("\n{}", "Step 1: Enter your email and password".bold()))?;
    let email = loop {
        let email = prompt.ask("Email address: ")?;
        if looks_like_email(&email) {
            break email;
        }
        prompt.say(format!("{} Please enter a valid email address", "✗".red()))?;
    };
    let password = loop {
        let password = prompt.ask("Password: ")?;
        if password.chars().count() >= MIN_PASSWORD_LEN {
            break password;
        }
        prompt.say(format!(
            "{} Password must be at least {} characters",
            "✗".red(),
            MIN_PASSWORD_LEN
        ))?;
    };

    prompt.say(format!("\n{}", "Step 2: Requesting verification code".bold()))?;
    match auth.request_verification_code(&email).await? {
        CodeRequest::Delivered => {
            prompt.say(format!("{} Verification code sent to {}", "✓".green(), email))?;
        }
        CodeRequest::GeneratedNotDelivered(message) => {
            prompt.say(format!("{} Email sending failed: {}", "⚠".yellow(), message))?;
            prompt.say("  The verification code has been saved on the server.")?;
            prompt.say("  Check the server logs for the verification code.")?;
        }
        CodeRequest::Rejected(message) => {
            prompt.say(format!(
                "{} Failed to generate verification code: {}",
                "✗".red(),
                message
            ))?;
            return Err(Error::registration(&message));
        }
    }

    prompt.say(format!("\n{}", "Step 3: Enter verification code".bold()))?;
    prompt.say("  The code expires after 10 minutes.")?;

    let mut budget = AttemptBudget::new(MAX_CODE_ATTEMPTS);
    let mut last_error = None;

    while !budget.is_exhausted() {
        let raw = prompt.ask("Verification code (6 digits): ")?;
        let code = match VerificationCode::parse(&raw) {
            Ok(code) => code,
            Err(_) => {
                prompt.say(format!("{} Code must be exactly 6 digits", "✗".red()))?;
                continue;
            }
        };

        prompt.say(format!("\n{}", "Step 4: Registering account".bold()))?;
        match auth.register_account(&email, &password, &code).await {
            Ok(registration) => {
                prompt.say(format!("{} Registration successful!", "✓".green()))?;
                if let Some(id) = &registration.account_id {
                    prompt.say(format!("  Account ID: {}", id))?;
                }

                let credentials = Credentials {
                    email,
                    password,
                    code: Some(code.to_string()),
                };
                credentials.save(save_to)?;
                prompt.say(format!(
                    "{} Credentials saved to {}",
                    "✓".green(),
                    save_to.display()
                ))?;
                return Ok(credentials);
            }
            Err(Error::Registration { reason, message }) => {
                prompt.say(format!("{} Registration failed: {}", "✗".red(), message))?;
                if reason == RegistrationFailure::CodeInvalidOrExpired {
                    prompt.say(format!(
                        "{} The verification code is incorrect or expired",
                        "⚠".yellow()
                    ))?;
                }
                budget.consume();
                last_error = Some(Error::Registration { reason, message });

                if budget.is_exhausted() {
                    break;
                }
                prompt.say(format!(
                    "\n{} You have {} attempt(s) remaining",
                    "⚠".yellow(),
                    budget.remaining()
                ))?;
                let retry = prompt.ask("Try again? (y/n) ")?;
                if !retry.eq_ignore_ascii_case("y") {
                    break;
                }
            }
            Err(e) => return Err(e),
        }
    }

    prompt.say(format!(
        "\n{} Registration failed. Run the wizard again to start over",
        "✗".red()
    ))?;
    Err(last_error.unwrap_or_else(|| {
        Error::Registration {
            reason: RegistrationFailure::Unknown,
            message: "no verification code accepted".to_string(),
        }
    }))
}
