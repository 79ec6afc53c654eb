use mvc_types::Fingerprint;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (`"mvc-blob-v1"`, `"mvc-commit-v1"`)
/// that is prepended to every hash computation, so a file whose bytes happen
/// to equal a serialized commit still gets a different fingerprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for file contents.
    pub const BLOB: Self = Self {
        domain: "mvc-blob-v1",
    };
    /// Hasher for serialized commit bodies.
    pub const COMMIT: Self = Self {
        domain: "mvc-commit-v1",
    };

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> Fingerprint {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        Fingerprint::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a serializable value as JSON with domain separation.
    ///
    /// Deterministic as long as the value serializes deterministically
    /// (structs and `BTreeMap`s do; `HashMap`s do not).
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<Fingerprint, HasherError> {
        let data =
            serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}
