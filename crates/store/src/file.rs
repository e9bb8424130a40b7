//! Encrypted flat-file token store.
//!
//! One file per provider at `<dir>/<provider>.cred`, containing
//! `<iv-hex>:<tag-hex>:<ciphertext-hex>`. The payload is the token record
//! serialized as JSON, encrypted with AES-256-GCM under a key derived from
//! the configured secret and salt via scrypt.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use async_trait::async_trait;
use rand::RngCore;
use std::path::PathBuf;
use subgate_types::{GateError, OAuthToken, ProviderId, traits::Result, traits::TokenStore};

/// AES-GCM nonce length in bytes.
const IV_LEN: usize = 12;
/// AES-GCM authentication tag length in bytes.
const TAG_LEN: usize = 16;
/// scrypt cost parameter, log2(N) = 14.
const SCRYPT_LOG_N: u8 = 14;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

/// Token store backed by per-provider encrypted files.
pub struct FileTokenStore {
    dir: PathBuf,
    key: [u8; 32],
}

impl FileTokenStore {
    /// Opens (creating if needed) the credential directory and derives the
    /// encryption key.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] if the secret or salt is empty or left
    /// at the `change-me` placeholder, and [`GateError::Storage`] if the
    /// directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>, secret: &str, salt: &str) -> Result<Self> {
        for (name, value) in [("secret", secret), ("salt", salt)] {
            if value.is_empty() || value == "change-me" {
                return Err(GateError::Config(format!(
                    "encryption {name} is unset, set SUBGATE_ENCRYPTION_{} to a real value",
                    name.to_uppercase()
                )));
            }
        }

        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| GateError::Storage(format!("create {}: {e}", dir.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o700))
                .map_err(|e| GateError::Storage(format!("chmod {}: {e}", dir.display())))?;
        }

        let key = derive_key(secret, salt)?;
        Ok(Self { dir, key })
    }

    fn path_for(&self, provider: &ProviderId) -> PathBuf {
        self.dir.join(provider.credential_file())
    }

    fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        let mut iv = [0u8; IV_LEN];
        rand::rngs::OsRng.fill_bytes(&mut iv);

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        // encrypt() appends the 16-byte tag to the ciphertext
        let mut sealed = cipher
            .encrypt(Nonce::from_slice(&iv), plaintext)
            .map_err(|_| GateError::Storage("encryption failed".into()))?;
        let tag = sealed.split_off(sealed.len() - TAG_LEN);

        Ok(format!(
            "{}:{}:{}",
            hex::encode(iv),
            hex::encode(tag),
            hex::encode(sealed)
        ))
    }

    fn decrypt(&self, content: &str) -> Result<Vec<u8>> {
        let corrupt = || GateError::Storage("credential file is corrupt".into());

        let mut parts = content.trim().splitn(3, ':');
        let iv = hex::decode(parts.next().ok_or_else(corrupt)?).map_err(|_| corrupt())?;
        let tag = hex::decode(parts.next().ok_or_else(corrupt)?).map_err(|_| corrupt())?;
        let ct = hex::decode(parts.next().ok_or_else(corrupt)?).map_err(|_| corrupt())?;
        if iv.len() != IV_LEN || tag.len() != TAG_LEN {
            return Err(corrupt());
        }

        let mut sealed = ct;
        sealed.extend_from_slice(&tag);

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        cipher
            .decrypt(Nonce::from_slice(&iv), sealed.as_slice())
            .map_err(|_| GateError::Storage("credential file failed authentication".into()))
    }
}

fn derive_key(secret: &str, salt: &str) -> Result<[u8; 32]> {
    let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, 32)
        .map_err(|e| GateError::Config(format!("scrypt params: {e}")))?;
    let mut key = [0u8; 32];
    scrypt::scrypt(secret.as_bytes(), salt.as_bytes(), &params, &mut key)
        .map_err(|e| GateError::Config(format!("key derivation: {e}")))?;
    Ok(key)
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self, provider: &ProviderId) -> Result<Option<OAuthToken>> {
        let path = self.path_for(provider);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(GateError::Storage(format!("read {}: {e}", path.display()))),
        };

        let plaintext = self.decrypt(&content)?;
        let token = serde_json::from_slice(&plaintext)
            .map_err(|e| GateError::Storage(format!("credential record: {e}")))?;
        Ok(Some(token))
    }

    async fn save(&self, provider: &ProviderId, token: &OAuthToken) -> Result<()> {
        let plaintext = serde_json::to_vec(token)?;
        let content = self.encrypt(&plaintext)?;
        let path = self.path_for(provider);
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| GateError::Storage(format!("write {}: {e}", path.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|e| GateError::Storage(format!("chmod {}: {e}", path.display())))?;
        }
        tracing::debug!(provider = %provider, "credential saved");
        Ok(())
    }

    async fn remove(&self, provider: &ProviderId) -> Result<()> {
        let path = self.path_for(provider);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GateError::Storage(format!(
                "remove {}: {e}",
                path.display()
            ))),
        }
    }
}
