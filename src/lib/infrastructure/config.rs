//! Configuration stores and secret handling

mod in_memory;
mod plain_text;

pub use in_memory::InMemoryScopeConfig;
pub use plain_text::PlainTextEncryptor;
