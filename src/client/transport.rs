use crate::domain::model::{ContactFields, SubmitResponse};
use crate::utils::error::Result;
use crate::utils::validation::validate_url;
use reqwest::multipart::Form;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends the form to the submission endpoint. An `Err` means the exchange
/// never produced a JSON answer.
pub trait SubmitTransport: Send + Sync {
    fn submit(
        &self,
        fields: &ContactFields,
    ) -> impl std::future::Future<Output = Result<SubmitResponse>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = endpoint.into();
        validate_url("endpoint", &endpoint)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SubmitTransport for HttpSubmitter {
    async fn submit(&self, fields: &ContactFields) -> Result<SubmitResponse> {
        let form = Form::new()
            .text("name", fields.name.clone())
            .text("email", fields.email.clone())
            .text("phone", fields.phone.clone())
            .text("message", fields.message.clone());

        tracing::debug!("Posting contact form to: {}", self.endpoint);
        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        tracing::debug!("Contact endpoint response status: {}", response.status());

        // 400/429/500 也帶 JSON，照樣解析
        let body = response.json::<SubmitResponse>().await?;
        Ok(body)
    }
}
