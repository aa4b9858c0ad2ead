//! LocalIdentityProvider - accounts kept in memory, optionally mirrored to a JSON file

use crate::types::{Account, IdentityError, IdentityProvider, Session, MIN_PASSWORD_LEN};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// File name used under the data directory
pub const ACCOUNTS_FILE: &str = "accounts.json";

/// Email/password accounts with Argon2 password hashes
///
/// With a backing file, every account change re-reads the file under the
/// write lock first, so several processes sharing a data directory keep each
/// other's accounts. Sessions live only in memory; a restart signs everyone
/// out.
pub struct LocalIdentityProvider {
    /// Keyed by lowercased email
    accounts: RwLock<HashMap<String, Account>>,
    sessions: RwLock<HashMap<String, Session>>,
    path: Option<PathBuf>,
}

impl LocalIdentityProvider {
    pub fn in_memory() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            path: None,
        }
    }

    /// Open the account file in `data_dir`, creating it on first write
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, IdentityError> {
        let path = data_dir.as_ref().join(ACCOUNTS_FILE);
        let accounts = load_accounts(&path)?;
        debug!(path = %path.display(), count = accounts.len(), "Loaded accounts");

        Ok(Self {
            accounts: RwLock::new(accounts),
            sessions: RwLock::new(HashMap::new()),
            path: Some(path),
        })
    }

    pub fn account_count(&self) -> usize {
        self.accounts.read().map(|a| a.len()).unwrap_or(0)
    }

    /// Replace `accounts` with what is on disk
    fn reload(&self, accounts: &mut HashMap<String, Account>) -> Result<(), IdentityError> {
        if let Some(path) = &self.path {
            *accounts = load_accounts(path)?;
        }
        Ok(())
    }

    /// Write through a temp file and a rename
    fn persist(&self, accounts: &HashMap<String, Account>) -> Result<(), IdentityError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| IdentityError::Storage(e.to_string()))?;
        }
        let mut list: Vec<&Account> = accounts.values().collect();
        list.sort_by(|a, b| a.email.cmp(&b.email));
        let json = serde_json::to_string_pretty(&list)
            .map_err(|e| IdentityError::Storage(e.to_string()))?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| IdentityError::Storage(e.to_string()))?;
        std::fs::rename(&tmp, path).map_err(|e| IdentityError::Storage(e.to_string()))
    }

    fn lookup(&self, key: &str) -> Result<Option<Account>, IdentityError> {
        let found = self
            .accounts
            .read()
            .map_err(|_| IdentityError::Storage("account lock poisoned".into()))?
            .get(key)
            .cloned();
        if found.is_some() || self.path.is_none() {
            return Ok(found);
        }

        // Another process may have created it since we last looked
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| IdentityError::Storage("account lock poisoned".into()))?;
        self.reload(&mut accounts)?;
        Ok(accounts.get(key).cloned())
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn create_account(&self, email: &str, password: &str) -> Result<String, IdentityError> {
        let email = email.trim();
        if !shared::is_valid_email(email) {
            return Err(IdentityError::InvalidEmail(email.to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword);
        }
        let password_digest = hash_password(password)?;

        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| IdentityError::Storage("account lock poisoned".into()))?;
        self.reload(&mut accounts)?;
        let key = email.to_lowercase();
        if accounts.contains_key(&key) {
            return Err(IdentityError::EmailTaken(email.to_string()));
        }

        let account = Account {
            uid: Uuid::new_v4().simple().to_string(),
            email: email.to_string(),
            password_digest,
            created_at: Utc::now(),
        };
        let uid = account.uid.clone();
        accounts.insert(key.clone(), account);

        if let Err(e) = self.persist(&accounts) {
            accounts.remove(&key);
            return Err(e);
        }

        info!(email = %email, uid = %uid, "Account created");
        Ok(uid)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let Some(account) = self.lookup(&email.trim().to_lowercase())? else {
            debug!(email = %email, "Sign-in for unknown email");
            return Err(IdentityError::InvalidCredentials);
        };
        if !verify_password(password, &account.password_digest) {
            warn!(email = %email, "Sign-in with wrong password");
            return Err(IdentityError::InvalidCredentials);
        }

        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            uid: account.uid,
            email: account.email,
            issued_at: Utc::now(),
        };
        self.sessions
            .write()
            .map_err(|_| IdentityError::Storage("session lock poisoned".into()))?
            .insert(session.token.clone(), session.clone());

        info!(email = %session.email, uid = %session.uid, "Signed in");
        Ok(session)
    }

    fn sign_out(&self, token: &str) -> Result<(), IdentityError> {
        let removed = self
            .sessions
            .write()
            .map_err(|_| IdentityError::Storage("session lock poisoned".into()))?
            .remove(token);
        match removed {
            Some(session) => {
                info!(uid = %session.uid, "Signed out");
                Ok(())
            }
            None => Err(IdentityError::SessionNotFound),
        }
    }

    fn session(&self, token: &str) -> Result<Session, IdentityError> {
        self.sessions
            .read()
            .map_err(|_| IdentityError::Storage("session lock poisoned".into()))?
            .get(token)
            .cloned()
            .ok_or(IdentityError::SessionNotFound)
    }

    fn uid_for_email(&self, email: &str) -> Option<String> {
        self.lookup(&email.trim().to_lowercase())
            .ok()
            .flatten()
            .map(|a| a.uid)
    }

    fn delete_account(&self, uid: &str) -> Result<(), IdentityError> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| IdentityError::Storage("account lock poisoned".into()))?;
        self.reload(&mut accounts)?;
        let Some(key) = accounts
            .iter()
            .find(|(_, account)| account.uid == uid)
            .map(|(key, _)| key.clone())
        else {
            return Ok(());
        };

        let Some(removed) = accounts.remove(&key) else {
            return Ok(());
        };
        if let Err(e) = self.persist(&accounts) {
            accounts.insert(key, removed);
            return Err(e);
        }
        drop(accounts);

        self.sessions
            .write()
            .map_err(|_| IdentityError::Storage("session lock poisoned".into()))?
            .retain(|_, session| session.uid != uid);

        info!(email = %removed.email, uid = %uid, "Account deleted");
        Ok(())
    }
}

fn load_accounts(path: &Path) -> Result<HashMap<String, Account>, IdentityError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content =
        std::fs::read_to_string(path).map_err(|e| IdentityError::Storage(e.to_string()))?;
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let list: Vec<Account> = serde_json::from_str(&content)
        .map_err(|e| IdentityError::Storage(format!("{}: {}", path.display(), e)))?;
    Ok(list
        .into_iter()
        .map(|a| (a.email.to_lowercase(), a))
        .collect())
}

fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| IdentityError::Storage(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| IdentityError::Storage(e.to_string()))
}

fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "Stored password hash is unreadable");
            false
        }
    }
}
