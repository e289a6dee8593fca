/// Credential state for one OAuth dance.
///
/// The consumer pair identifies the application; the token, token secret
/// and verifier are filled in by the caller as the dance progresses
/// (request token → authorization → access token). The client holds no
/// notion of which phase it is in; it signs with whatever is set.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: String,
    token: Option<String>,
    token_secret: Option<String>,
    verifier: Option<String>,
}

impl Credentials {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Credentials {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: None,
            token_secret: None,
            verifier: None,
        }
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn token_secret(&self) -> Option<&str> {
        self.token_secret.as_deref()
    }

    pub fn verifier(&self) -> Option<&str> {
        self.verifier.as_deref()
    }

    pub fn set_consumer_key(&mut self, consumer_key: impl Into<String>) {
        self.consumer_key = consumer_key.into();
    }

    pub fn set_consumer_secret(&mut self, consumer_secret: impl Into<String>) {
        self.consumer_secret = consumer_secret.into();
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn set_token_secret(&mut self, token_secret: impl Into<String>) {
        self.token_secret = Some(token_secret.into());
    }

    pub fn set_verifier(&mut self, verifier: impl Into<String>) {
        self.verifier = Some(verifier.into());
    }
}
