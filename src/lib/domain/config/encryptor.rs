//! Secret decryption

#[cfg(test)]
use mockall::mock;

/// Decrypts values that are stored encrypted in configuration
pub trait Encryptor: Send + Sync + 'static {
    /// Decrypts `data`
    fn decrypt(&self, data: &str) -> anyhow::Result<String>;
}

#[cfg(test)]
mock! {
    pub Encryptor {}

    impl Encryptor for Encryptor {
        fn decrypt(&self, data: &str) -> anyhow::Result<String>;
    }
}
