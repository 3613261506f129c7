use crate::{
    error::{Result, TruSoundError},
    management::storage::SessionStorage,
    trusound::ApiGateway,
    types::Session,
};

/// The persisted login session plus its in-memory copy.
///
/// Reads are synchronous against the copy loaded at [`SessionStore::open`];
/// every change is written through to storage.
pub struct SessionStore<S: SessionStorage> {
    storage: S,
    current: Option<Session>,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Loads the stored session, if any. Fails on a record that exists but
    /// cannot be read or parsed.
    pub async fn open(storage: S) -> Result<Self> {
        let current = storage.load().await?;
        Ok(Self { storage, current })
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Authenticates through `gateway`, persists the session and arms the
    /// gateway with the new token.
    ///
    /// # Errors
    ///
    /// - [`TruSoundError::Validation`] for an empty email or password, before any request
    /// - [`TruSoundError::Auth`] when the server rejects the credentials
    /// - [`TruSoundError::Storage`] when the session cannot be written
    pub async fn login<G: ApiGateway + ?Sized>(
        &mut self,
        gateway: &G,
        email: &str,
        password: &str,
    ) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() {
            return Err(TruSoundError::Validation("email is required".to_string()));
        }
        if password.is_empty() {
            return Err(TruSoundError::Validation("password is required".to_string()));
        }

        let session = gateway.login(email, password).await?;
        self.storage.save(&session).await?;
        gateway.set_token(Some(session.token.clone()));
        self.current = Some(session.clone());
        Ok(session)
    }

    /// Forgets the session in memory and in storage.
    ///
    /// The in-memory session is dropped even if storage cannot be cleared;
    /// that failure is still returned.
    pub async fn logout<G: ApiGateway + ?Sized>(&mut self, gateway: &G) -> Result<()> {
        self.current = None;
        gateway.set_token(None);
        self.storage.clear().await
    }
}
