//! MyMemory translation client

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use super::TranslationProvider;
use super::model::MyMemoryResponse;

static BASE_URL: &str = "https://api.mymemory.translated.net/get";

const TIMEOUT: u64 = 10;

#[derive(Clone)]
pub struct MyMemoryClient {
    client: Client,
    base_url: String,
    target_lang: String,
}

impl std::fmt::Debug for MyMemoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MyMemoryClient")
            .field("base_url", &self.base_url)
            .field("target_lang", &self.target_lang)
            .finish()
    }
}

impl MyMemoryClient {
    /// Client translating into `target_lang` (e.g. `"en"`)
    pub fn new(target_lang: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT))
            .build()
            .context("Failed to build MyMemory HTTP client")?;
        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            target_lang: target_lang.into(),
        })
    }

    /// `langpair` parameter; `auto` maps to MyMemory's autodetect
    fn lang_pair(&self, source_lang: &str) -> String {
        let source = if source_lang == "auto" {
            "autodetect"
        } else {
            source_lang
        };
        format!("{}|{}", source, self.target_lang)
    }

    fn request_url(&self, text: &str, source_lang: &str) -> String {
        format!(
            "{}?q={}&langpair={}",
            self.base_url,
            urlencoding::encode(text),
            urlencoding::encode(&self.lang_pair(source_lang))
        )
    }
}

#[async_trait]
impl TranslationProvider for MyMemoryClient {
    async fn translate(&self, text: &str, source_lang: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.request_url(text, source_lang))
            .send()
            .await?
            .error_for_status()?;
        let body: MyMemoryResponse = response.json().await?;
        Ok(body.into_translation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_pair() {
        let client = MyMemoryClient::new("en").unwrap();
        assert_eq!(client.lang_pair("auto"), "autodetect|en");
        assert_eq!(client.lang_pair("ja"), "ja|en");
    }

    #[test]
    fn test_request_url_is_encoded() {
        let client = MyMemoryClient::new("en").unwrap();
        let url = client.request_url("君の名", "ja");
        assert!(url.starts_with("https://api.mymemory.translated.net/get?q=%E5%90%9B"));
        assert!(url.ends_with("&langpair=ja%7Cen"));
    }
}
