use crate::error::{SessionError, SessionErrorExt};
use crate::model::{Account, LoginRequest};
use charachat_database::{Database, Table};
use charachat_domain::config::KdfConfig;
use charachat_domain::constants::ACCOUNT;
use charachat_kernel::records::timestamp;
use charachat_vault::{FieldKey, KdfParams};
use subtle::ConstantTimeEq;
use tracing::{info, instrument, warn};

/// Outcome of a successful login.
#[derive(Debug)]
pub struct Login {
    pub key: FieldKey,
    pub owner_id: String,
    pub created: bool,
}

/// Password login over the `account` table.
///
/// The first login with an email registers it. Later logins must derive a key whose
/// verifier matches the stored one.
#[derive(Debug, Clone)]
pub struct Accounts {
    table: Table<Account>,
    kdf: KdfParams,
}

impl Accounts {
    #[must_use]
    pub fn new(database: &Database, kdf: &KdfConfig) -> Self {
        Self {
            table: database.table(ACCOUNT),
            kdf: KdfParams {
                memory_kib: kdf.memory_kib,
                iterations: kdf.iterations,
                parallelism: kdf.parallelism,
            },
        }
    }

    /// Verifies (or registers) the credentials and returns the session key.
    ///
    /// # Errors
    /// * [`SessionError::Validation`] For an empty password or a malformed email.
    /// * [`SessionError::InvalidCredentials`] If the password does not match.
    /// * [`SessionError::Vault`] / [`SessionError::Database`] On derivation or store failures.
    #[instrument(level = "debug", skip_all)]
    pub async fn login(&self, request: &LoginRequest) -> Result<Login, SessionError> {
        let email = normalize_email(&request.email)?;
        if request.password.is_empty() {
            return Err(SessionError::Validation { message: "Password is empty".into(), context: None });
        }

        let key = self.derive_key(email.clone(), request.password.clone()).await?;
        let owner_id = key.owner_id().context("owner id")?;
        let verifier = key.verifier().context("verifier")?;

        if let Some(account) = self.table.find_by("email", &email).await.context("loading account")? {
            verify(&account, &verifier)?;
            info!(owner_id = %owner_id, "Session opened");
            return Ok(Login { key, owner_id, created: false });
        }

        let account = Account {
            email: email.clone(),
            owner_id: owner_id.clone(),
            verifier: verifier.clone(),
            created_at: timestamp(),
        };
        if let Err(e) = self.table.insert(account).await {
            // A concurrent first login may have registered the email since the lookup.
            let Some(account) = self.table.find_by("email", &email).await.context("loading account")? else {
                return Err(e).context("registering account");
            };
            verify(&account, &verifier)?;
            info!(owner_id = %owner_id, "Session opened after concurrent registration");
            return Ok(Login { key, owner_id, created: false });
        }

        info!(owner_id = %owner_id, "Account registered");
        Ok(Login { key, owner_id, created: true })
    }

    /// Runs Argon2id on the blocking pool.
    async fn derive_key(&self, email: String, password: String) -> Result<FieldKey, SessionError> {
        let params = self.kdf;
        tokio::task::spawn_blocking(move || FieldKey::derive(&email, &password, &params))
            .await
            .map_err(|e| SessionError::Internal {
                message: e.to_string().into(),
                context: Some("key derivation task".into()),
            })?
            .context("deriving session key")
    }
}

fn normalize_email(email: &str) -> Result<String, SessionError> {
    let email = email.trim().to_lowercase();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty() && !domain.contains('@'));
    if well_formed {
        Ok(email)
    } else {
        Err(SessionError::Validation { message: "Email is malformed".into(), context: None })
    }
}

/// Compares the stored verifier with the derived one in constant time.
fn verify(account: &Account, verifier: &str) -> Result<(), SessionError> {
    let matches = match (hex::decode(&account.verifier), hex::decode(verifier)) {
        (Ok(stored), Ok(derived)) => bool::from(stored.ct_eq(&derived)),
        _ => false,
    };
    if matches {
        return Ok(());
    }
    warn!(owner_id = %account.owner_id, "Login rejected");
    Err(SessionError::InvalidCredentials { message: "Email or password is wrong".into(), context: None })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Aria@Example.COM ").unwrap(), "aria@example.com");
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in ["", "aria", "@example.com", "aria@", "a@b@c"] {
            assert!(matches!(normalize_email(email), Err(SessionError::Validation { .. })), "{email}");
        }
    }

    fn account(verifier: &str) -> Account {
        Account {
            email: "aria@example.com".into(),
            owner_id: "a1b2c3d4e5f6".into(),
            verifier: verifier.into(),
            created_at: timestamp(),
        }
    }

    #[test]
    fn verifier_must_match_exactly() {
        assert!(verify(&account("00ff10"), "00ff10").is_ok());
        assert!(verify(&account("00FF10"), "00ff10").is_ok());
        for derived in ["00ff11", "00ff", "00ff1000"] {
            let err = verify(&account("00ff10"), derived).unwrap_err();
            assert!(matches!(err, SessionError::InvalidCredentials { .. }), "{derived}");
        }
    }

    #[test]
    fn corrupt_stored_verifier_never_matches() {
        let err = verify(&account("not hex"), "not hex").unwrap_err();
        assert!(matches!(err, SessionError::InvalidCredentials { .. }));
    }
}
