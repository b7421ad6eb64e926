// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password and secret input from the environment or the terminal.

use std::io::{IsTerminal, Read};

use passvault_core::PassvaultError;
use secrecy::SecretString;

/// Supplies the user's password without a prompt (scripts, CI).
pub const PASSWORD_ENV_VAR: &str = "PASSVAULT_PASSWORD";

fn read_hidden(prompt: &str) -> Result<String, PassvaultError> {
    eprint!("{prompt}");
    rpassword::read_password()
        .map_err(|e| PassvaultError::Validation(format!("failed to read from terminal: {e}")))
}

fn from_env() -> Option<SecretString> {
    std::env::var(PASSWORD_ENV_VAR)
        .ok()
        .filter(|value| !value.is_empty())
        .map(SecretString::from)
}

fn no_terminal() -> PassvaultError {
    PassvaultError::Validation(format!(
        "no password provided; set {PASSWORD_ENV_VAR} or run interactively"
    ))
}

/// Password for an existing account.
pub fn password(username: &str) -> Result<SecretString, PassvaultError> {
    if let Some(password) = from_env() {
        return Ok(password);
    }
    if !std::io::stdin().is_terminal() {
        return Err(no_terminal());
    }
    read_hidden(&format!("Password for {username}: ")).map(SecretString::from)
}

/// Password for a new account, confirmed when typed interactively.
pub fn new_password(username: &str) -> Result<SecretString, PassvaultError> {
    if let Some(password) = from_env() {
        return Ok(password);
    }
    if !std::io::stdin().is_terminal() {
        return Err(no_terminal());
    }
    let first = read_hidden(&format!("New password for {username}: "))?;
    let second = read_hidden("Confirm password: ")?;
    if first != second {
        return Err(PassvaultError::Validation("passwords do not match".to_string()));
    }
    Ok(SecretString::from(first))
}

/// The secret value: hidden prompt on a terminal, otherwise all of stdin
/// minus one trailing newline.
pub fn secret_value() -> Result<SecretString, PassvaultError> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return read_hidden("Secret: ").map(SecretString::from);
    }
    let mut value = String::new();
    stdin
        .lock()
        .read_to_string(&mut value)
        .map_err(|e| PassvaultError::Validation(format!("failed to read secret from stdin: {e}")))?;
    Ok(SecretString::from(strip_newline(value)))
}

fn strip_newline(mut value: String) -> String {
    if value.ends_with('\n') {
        value.pop();
        if value.ends_with('\r') {
            value.pop();
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_trailing_newline() {
        assert_eq!(strip_newline("secret\n".into()), "secret");
        assert_eq!(strip_newline("secret\r\n".into()), "secret");
        assert_eq!(strip_newline("secret\n\n".into()), "secret\n");
        assert_eq!(strip_newline("secret".into()), "secret");
    }
}
