use std::time::Duration;

use crate::{AppError, AppResult};

/// Looks users up in the user service over HTTP.
#[derive(Clone)]
pub struct UserDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl UserDirectory {
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// `Ok(false)` for any non-2xx answer; transport failures and timeouts
    /// are `AppError::Upstream`.
    pub async fn user_exists(&self, id: i64) -> AppResult<bool> {
        let url = format!("{}/user/{id}", self.base_url);
        let response = self.client.get(&url)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(%url, "user lookup failed: {err}");
                AppError::Upstream("User service unavailable".to_owned())
            })?;

        Ok(response.status().is_success())
    }

    /// Checks participants one at a time and fails on the first unknown id.
    pub async fn verify_participants(&self, participants: &[i64]) -> AppResult<()> {
        for &id in participants {
            if !self.user_exists(id).await? {
                return Err(AppError::BadRequest(format!("Invalid participant ID: {id}")));
            }
        }

        Ok(())
    }
}
