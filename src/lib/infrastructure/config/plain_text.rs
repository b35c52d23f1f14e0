//! Encryptor for secrets stored in clear

use anyhow::{bail, Result};

use crate::domain::config::Encryptor;

/// Treats configured secrets as already decrypted.
///
/// Used when the token comes from the process environment rather than an
/// encrypted configuration store. Whitespace around the value is dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTextEncryptor;

impl Encryptor for PlainTextEncryptor {
    fn decrypt(&self, data: &str) -> Result<String> {
        let value = data.trim();

        if value.is_empty() {
            bail!("secret is blank");
        }

        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_decrypt_returns_trimmed_value() -> TestResult {
        assert_eq!(PlainTextEncryptor.decrypt(" lm_token \n")?, "lm_token");

        Ok(())
    }

    #[test]
    fn test_decrypt_blank_value_fails() {
        assert!(PlainTextEncryptor.decrypt("   ").is_err());
    }
}
