//! Test account credential file
//!
//! Three positional lines: email, password, verification code. There is no
//! escaping, so no value may contain a newline.

use std::path::Path;

use crate::common::paths::ensure_parent_dir;
use crate::common::{Error, Result};

/// Credentials of the account the tester logs in with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// Code used at registration; kept for reference only
    pub code: Option<String>,
}

impl Credentials {
    /// Read the credential file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse the three-line format
    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = content.lines().map(str::trim);
        let email = lines.next().unwrap_or_default().to_string();
        let password = lines.next().unwrap_or_default().to_string();
        let code = lines
            .next()
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        if email.is_empty() {
            return Err(Error::Credentials("email (line 1) is missing".to_string()));
        }
        if password.is_empty() {
            return Err(Error::Credentials("password (line 2) is missing".to_string()));
        }

        Ok(Self {
            email,
            password,
            code,
        })
    }

    /// Render the three-line format
    pub fn render(&self) -> Result<String> {
        let code = self.code.as_deref().unwrap_or_default();
        for (field, value) in [
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
            ("code", code),
        ] {
            if value.contains('\n') || value.contains('\r') {
                return Err(Error::Credentials(format!(
                    "{} must not contain a line break",
                    field
                )));
            }
        }
        Ok(format!("{}\n{}\n{}\n", self.email, self.password, code))
    }

    /// Write the credential file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.render()?;
        ensure_parent_dir(path)?;
        std::fs::write(path, content)?;
        tracing::debug!(path = %path.display(), "saved test account");
        Ok(())
    }

    /// Password masked for display
    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }
}
