// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret creation, retrieval and visibility updates.

use std::sync::Arc;

use passvault_config::model::SecretsConfig;
use passvault_core::{
    Encryptor, PassvaultError, Secret, SecretId, SecretStore, UserDirectory, Visibility,
};
use passvault_policy::{
    VisibilityChange, authorize_owner, can_read, names_to_verify, validate_initial_share_list,
    validate_transition,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

/// Creation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretSettings {
    /// Maximum plaintext length in characters.
    pub max_secret_length: usize,
    pub allow_anonymous_create: bool,
}

impl Default for SecretSettings {
    fn default() -> Self {
        Self::from(&SecretsConfig::default())
    }
}

impl From<&SecretsConfig> for SecretSettings {
    fn from(config: &SecretsConfig) -> Self {
        Self {
            max_secret_length: config.max_secret_length,
            allow_anonymous_create: config.allow_anonymous_create,
        }
    }
}

/// Input to [`SecretService::create`].
#[derive(Debug)]
pub struct CreateSecret {
    pub plaintext: SecretString,
    pub visibility: Visibility,
    /// Required (non-empty) for shared secrets, absent or empty otherwise.
    pub share_list: Option<Vec<String>>,
}

impl CreateSecret {
    pub fn new(plaintext: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            plaintext: SecretString::from(plaintext.into()),
            visibility,
            share_list: None,
        }
    }

    pub fn shared_with<I, S>(plaintext: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            share_list: Some(names.into_iter().map(Into::into).collect()),
            ..Self::new(plaintext, Visibility::Shared)
        }
    }
}

/// A decrypted secret.
#[derive(Debug)]
pub struct RevealedSecret {
    pub plaintext: SecretString,
    pub visibility: Visibility,
}

/// Result of an accepted visibility change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityUpdated {
    pub visibility: Visibility,
    pub share_list: Vec<String>,
}

/// Orchestrates the store, directory, encryptor and policy engine.
#[derive(Clone)]
pub struct SecretService {
    store: Arc<dyn SecretStore>,
    directory: Arc<dyn UserDirectory>,
    encryptor: Arc<dyn Encryptor>,
    settings: SecretSettings,
}

impl SecretService {
    pub fn new(
        store: Arc<dyn SecretStore>,
        directory: Arc<dyn UserDirectory>,
        encryptor: Arc<dyn Encryptor>,
        settings: SecretSettings,
    ) -> Self {
        Self {
            store,
            directory,
            encryptor,
            settings,
        }
    }

    pub fn settings(&self) -> &SecretSettings {
        &self.settings
    }

    /// Encrypt and store a new secret owned by `creator`.
    pub async fn create(
        &self,
        creator: Option<&str>,
        request: CreateSecret,
    ) -> Result<SecretId, PassvaultError> {
        self.check_creator(creator, request.visibility)?;
        self.check_plaintext(&request.plaintext)?;

        let share_list = match (request.visibility, request.share_list) {
            (Visibility::Shared, names) => {
                let names = names.unwrap_or_default();
                if names.is_empty() {
                    return Err(PassvaultError::ShareListRequired);
                }
                let candidates: Vec<String> = names
                    .iter()
                    .filter(|name| creator != Some(name.as_str()))
                    .cloned()
                    .collect();
                let unknown = self.unknown_users(&candidates).await?;
                validate_initial_share_list(creator, &names, &unknown)?
            }
            (_, Some(names)) if !names.is_empty() => {
                return Err(PassvaultError::ShareListNotApplicable);
            }
            _ => Vec::new(),
        };

        let ciphertext = self.encryptor.encrypt(request.plaintext.expose_secret())?;
        let secret = Secret {
            id: SecretId::new(),
            ciphertext,
            owner: creator.map(str::to_string),
            visibility: request.visibility,
            share_list,
            created_at: String::new(),
            updated_at: String::new(),
        };

        let stored = self.store.create(secret).await?;
        info!(
            id = %stored.id,
            visibility = %stored.visibility,
            shared_with = stored.share_list.len(),
            anonymous = creator.is_none(),
            "secret created"
        );
        Ok(stored.id)
    }

    /// Fetch and decrypt a secret on behalf of `requester`.
    ///
    /// A missing secret and one the requester may not read produce the same
    /// [`PassvaultError::NotFoundOrForbidden`].
    pub async fn get(
        &self,
        id: &SecretId,
        requester: Option<&str>,
    ) -> Result<RevealedSecret, PassvaultError> {
        let Some(secret) = self.store.get_by_id(id).await? else {
            debug!(%id, "secret not found");
            return Err(PassvaultError::NotFoundOrForbidden);
        };

        if !can_read(&secret, requester) {
            debug!(%id, "read denied");
            return Err(PassvaultError::NotFoundOrForbidden);
        }

        let plaintext = self.encryptor.decrypt(&secret.ciphertext)?;
        debug!(%id, visibility = %secret.visibility, "secret read");
        Ok(RevealedSecret {
            plaintext: SecretString::from(plaintext),
            visibility: secret.visibility,
        })
    }

    /// Apply a visibility change requested by `actor`.
    pub async fn update_visibility(
        &self,
        id: &SecretId,
        actor: Option<&str>,
        change: VisibilityChange,
    ) -> Result<VisibilityUpdated, PassvaultError> {
        let Some(secret) = self.store.get_by_id(id).await? else {
            debug!(%id, "secret not found");
            return Err(PassvaultError::NotFoundOrForbidden);
        };

        if let Err(e) = authorize_owner(&secret, actor) {
            warn!(%id, actor = actor.unwrap_or("<anonymous>"), "visibility change denied: not the owner");
            return Err(e);
        }

        let unknown = self.unknown_users(&names_to_verify(&secret, &change)).await?;
        let transition = match validate_transition(&secret, &change, actor, &unknown) {
            Ok(transition) => transition,
            Err(e) => {
                warn!(%id, from = %secret.visibility, to = %change.visibility, error = %e, "visibility change rejected");
                return Err(e);
            }
        };

        let mut updated = secret;
        transition.apply(&mut updated);
        let stored = self.store.update_visibility(updated).await?;
        info!(
            %id,
            visibility = %stored.visibility,
            shared_with = stored.share_list.len(),
            "visibility updated"
        );

        Ok(VisibilityUpdated {
            visibility: stored.visibility,
            share_list: stored.share_list,
        })
    }

    fn check_creator(
        &self,
        creator: Option<&str>,
        visibility: Visibility,
    ) -> Result<(), PassvaultError> {
        if creator.is_some() {
            return Ok(());
        }
        if !self.settings.allow_anonymous_create {
            warn!("anonymous create rejected: disabled by configuration");
            return Err(PassvaultError::AccessDenied);
        }
        if visibility != Visibility::Public {
            return Err(PassvaultError::Validation(format!(
                "anonymous secrets must be public, not {visibility}"
            )));
        }
        Ok(())
    }

    fn check_plaintext(&self, plaintext: &SecretString) -> Result<(), PassvaultError> {
        let len = plaintext.expose_secret().chars().count();
        if len == 0 {
            return Err(PassvaultError::Validation("secret must not be empty".to_string()));
        }
        if len > self.settings.max_secret_length {
            return Err(PassvaultError::Validation(format!(
                "secret is {len} characters, maximum is {}",
                self.settings.max_secret_length
            )));
        }
        Ok(())
    }

    /// Names from `names` that the directory does not know, first occurrence order.
    async fn unknown_users(&self, names: &[String]) -> Result<Vec<String>, PassvaultError> {
        let mut unknown: Vec<String> = Vec::new();
        for name in names {
            if unknown.contains(name) {
                continue;
            }
            if !self.directory.exists(name).await? {
                unknown.push(name.clone());
            }
        }
        Ok(unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_config() {
        let config = SecretsConfig {
            max_secret_length: 42,
            allow_anonymous_create: true,
        };
        let settings = SecretSettings::from(&config);
        assert_eq!(settings.max_secret_length, 42);
        assert!(settings.allow_anonymous_create);
        assert_eq!(SecretSettings::default().max_secret_length, 100);
    }

    #[test]
    fn create_request_builders() {
        let request = CreateSecret::shared_with("pw", ["bob", "carol"]);
        assert_eq!(request.visibility, Visibility::Shared);
        assert_eq!(request.share_list, Some(vec!["bob".to_string(), "carol".to_string()]));
        assert_eq!(request.plaintext.expose_secret(), "pw");

        let request = CreateSecret::new("pw", Visibility::Public);
        assert!(request.share_list.is_none());
    }

    #[test]
    fn create_request_debug_hides_plaintext() {
        let request = CreateSecret::new("hunter2", Visibility::Private);
        assert!(!format!("{request:?}").contains("hunter2"));
    }
}
