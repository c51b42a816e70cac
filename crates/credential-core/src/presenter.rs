//! Operator-facing credential views
//!
//! Formats credential rows for an admin surface without ever touching
//! raw secret material, and builds edit/revoke links bound to
//! anti-forgery tokens. Token issuance, localization, and owner lookup
//! are explicit collaborators supplied by the hosting environment; this
//! layer is a stateless formatter over store-provided snapshots.

use url::Url;
use uuid::Uuid;

use crate::credential::{Credential, CredentialHandle};
use crate::error::Result;

/// Issues single-use anti-forgery tokens for admin actions
///
/// The presenter embeds tokens in revoke links but never stores or
/// validates them.
pub trait ActionTokenProvider: Send + Sync {
    /// Issue a token bound to an action name and credential id
    fn issue_token(&self, action: &str, credential_id: Uuid) -> String;
}

/// Formats timestamps per operator locale settings
pub trait Localizer: Send + Sync {
    /// Localized "<date> at <time>" string
    fn format_datetime(&self, at: chrono::DateTime<chrono::Utc>) -> String;

    /// Placeholder shown when a credential has never been used
    fn never_used_label(&self) -> String;
}

/// Resolves owner ids to displayable identities
pub trait OwnerDirectory: Send + Sync {
    /// Display name for the owner, if known
    fn display_name(&self, owner_id: Uuid) -> Option<String>;
}

/// A fully formatted row for an operator view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRow {
    pub id: Uuid,
    /// Rendered as an ellipsized suffix, e.g. "…f12345"
    pub truncated_key: String,
    pub description: String,
    pub owner: String,
    pub permissions: String,
    pub last_access: String,
    pub edit_link: Url,
    pub revoke_link: Url,
}

/// Credential presenter
pub struct Presenter {
    admin_base_url: Url,
    tokens: Box<dyn ActionTokenProvider>,
    localizer: Box<dyn Localizer>,
    owners: Box<dyn OwnerDirectory>,
}

impl std::fmt::Debug for Presenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("admin_base_url", &self.admin_base_url)
            .finish_non_exhaustive()
    }
}

impl Presenter {
    /// Create a presenter targeting the given admin base URL
    pub fn new(
        admin_base_url: Url,
        tokens: Box<dyn ActionTokenProvider>,
        localizer: Box<dyn Localizer>,
        owners: Box<dyn OwnerDirectory>,
    ) -> Self {
        Self {
            admin_base_url,
            tokens,
            localizer,
            owners,
        }
    }

    /// Create a presenter from a string admin base URL
    pub fn with_base_url(
        admin_base_url: &str,
        tokens: Box<dyn ActionTokenProvider>,
        localizer: Box<dyn Localizer>,
        owners: Box<dyn OwnerDirectory>,
    ) -> Result<Self> {
        let admin_base_url = Url::parse(admin_base_url)?;
        Ok(Self::new(admin_base_url, tokens, localizer, owners))
    }

    /// Render a credential into display fields
    ///
    /// Fails with InvalidState if the handle is an unhydrated
    /// reference - a partial row must never be emitted silently.
    pub fn render_row(&self, handle: &CredentialHandle) -> Result<CredentialRow> {
        let credential = handle.record()?;

        let owner = self
            .owners
            .display_name(credential.owner_id)
            .unwrap_or_else(|| credential.owner_id.to_string());

        let last_access = match credential.last_access {
            Some(at) => self.localizer.format_datetime(at),
            None => self.localizer.never_used_label(),
        };

        Ok(CredentialRow {
            id: credential.id,
            truncated_key: format!("\u{2026}{}", credential.truncated_key),
            description: credential.description.clone(),
            owner,
            permissions: credential.permissions.label().to_string(),
            last_access,
            edit_link: self.build_edit_link(credential)?,
            revoke_link: self.build_revoke_link(credential)?,
        })
    }

    /// Build the admin URL for editing a credential
    pub fn build_edit_link(&self, credential: &Credential) -> Result<Url> {
        let mut url = self.admin_base_url.clone();
        url.query_pairs_mut()
            .append_pair("action", "edit")
            .append_pair("credential_id", &credential.id.to_string());
        Ok(url)
    }

    /// Build the admin URL for revoking a credential
    ///
    /// Embeds a fresh anti-forgery token from the token collaborator.
    pub fn build_revoke_link(&self, credential: &Credential) -> Result<Url> {
        let token = self.tokens.issue_token("revoke", credential.id);

        let mut url = self.admin_base_url.clone();
        url.query_pairs_mut()
            .append_pair("action", "revoke")
            .append_pair("credential_id", &credential.id.to_string())
            .append_pair("token", &token);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Permissions;
    use crate::error::CredentialError;
    use chrono::{TimeZone, Utc};

    struct FixedTokens;

    impl ActionTokenProvider for FixedTokens {
        fn issue_token(&self, action: &str, credential_id: Uuid) -> String {
            format!("nonce-{}-{}", action, credential_id.simple())
        }
    }

    struct EnglishLocalizer;

    impl Localizer for EnglishLocalizer {
        fn format_datetime(&self, at: chrono::DateTime<Utc>) -> String {
            at.format("%Y-%m-%d at %H:%M").to_string()
        }

        fn never_used_label(&self) -> String {
            "None".to_string()
        }
    }

    struct KnownOwners(Uuid);

    impl OwnerDirectory for KnownOwners {
        fn display_name(&self, owner_id: Uuid) -> Option<String> {
            (owner_id == self.0).then(|| "Ada Lovelace".to_string())
        }
    }

    fn sample(owner: Uuid) -> Credential {
        Credential {
            id: Uuid::new_v4(),
            owner_id: owner,
            description: "Test Key".to_string(),
            consumer_key: "ck_abcdef12345".to_string(),
            secret_hash: "$argon2id$test".to_string(),
            truncated_key: "ef12345".to_string(),
            last_access: None,
            permissions: Permissions::ReadWrite,
            created_at: Utc::now(),
        }
    }

    fn presenter(owner: Uuid) -> Presenter {
        Presenter::new(
            Url::parse("https://example.com/admin/credentials").unwrap(),
            Box::new(FixedTokens),
            Box::new(EnglishLocalizer),
            Box::new(KnownOwners(owner)),
        )
    }

    #[test]
    fn test_render_row_never_used() {
        let owner = Uuid::new_v4();
        let cred = sample(owner);
        let row = presenter(owner)
            .render_row(&CredentialHandle::Hydrated(cred.clone()))
            .unwrap();

        assert_eq!(row.id, cred.id);
        assert_eq!(row.truncated_key, "…ef12345");
        assert_eq!(row.owner, "Ada Lovelace");
        assert_eq!(row.permissions, "Read/Write");
        assert_eq!(row.last_access, "None");
    }

    #[test]
    fn test_render_row_localizes_last_access() {
        let owner = Uuid::new_v4();
        let mut cred = sample(owner);
        cred.last_access = Some(Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 0).unwrap());

        let row = presenter(owner)
            .render_row(&CredentialHandle::Hydrated(cred))
            .unwrap();
        assert_eq!(row.last_access, "2026-03-14 at 09:26");
    }

    #[test]
    fn test_render_row_falls_back_to_owner_id() {
        let cred = sample(Uuid::new_v4());
        // presenter knows a different owner
        let row = presenter(Uuid::new_v4())
            .render_row(&CredentialHandle::Hydrated(cred.clone()))
            .unwrap();
        assert_eq!(row.owner, cred.owner_id.to_string());
    }

    #[test]
    fn test_render_row_rejects_unhydrated_reference() {
        let owner = Uuid::new_v4();
        let err = presenter(owner)
            .render_row(&CredentialHandle::Reference(Uuid::new_v4()))
            .unwrap_err();
        assert!(matches!(err, CredentialError::InvalidState(_)));
    }

    #[test]
    fn test_edit_and_revoke_links() {
        let owner = Uuid::new_v4();
        let cred = sample(owner);
        let presenter = presenter(owner);

        let edit = presenter.build_edit_link(&cred).unwrap();
        assert!(edit.as_str().starts_with("https://example.com/admin/credentials?"));
        assert!(edit.query_pairs().any(|(k, v)| k == "action" && v == "edit"));
        assert!(edit
            .query_pairs()
            .any(|(k, v)| k == "credential_id" && v == cred.id.to_string()));

        let revoke = presenter.build_revoke_link(&cred).unwrap();
        assert!(revoke.query_pairs().any(|(k, v)| k == "action" && v == "revoke"));
        let expected_token = format!("nonce-revoke-{}", cred.id.simple());
        assert!(revoke
            .query_pairs()
            .any(|(k, v)| k == "token" && v == expected_token));
    }

    #[test]
    fn test_with_base_url() {
        let owner = Uuid::new_v4();
        let cred = sample(owner);

        let presenter = Presenter::with_base_url(
            "https://example.com/admin/credentials",
            Box::new(FixedTokens),
            Box::new(EnglishLocalizer),
            Box::new(KnownOwners(owner)),
        )
        .unwrap();
        let edit = presenter.build_edit_link(&cred).unwrap();
        assert!(edit.as_str().starts_with("https://example.com/admin/credentials?"));

        let err = Presenter::with_base_url(
            "not a url",
            Box::new(FixedTokens),
            Box::new(EnglishLocalizer),
            Box::new(KnownOwners(owner)),
        )
        .unwrap_err();
        assert!(matches!(err, CredentialError::Url(_)));
    }

    #[test]
    fn test_rendered_row_carries_no_secret_material() {
        let owner = Uuid::new_v4();
        let cred = sample(owner);
        let row = presenter(owner)
            .render_row(&CredentialHandle::Hydrated(cred.clone()))
            .unwrap();

        let rendered = format!("{:?}", row);
        assert!(!rendered.contains(&cred.secret_hash));
        assert!(!rendered.contains(&cred.consumer_key));
    }
}
