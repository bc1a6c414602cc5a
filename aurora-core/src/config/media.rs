use url::Url;

use crate::media::MediaClient;

#[derive(Clone)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: Url,
}

impl MediaConfig {
    pub fn client(&self) -> MediaClient {
        MediaClient::new(
            self.cloud_name.clone(),
            self.api_key.clone(),
            self.api_secret.clone(),
            self.api_base.clone(),
        )
    }
}

impl std::fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}
