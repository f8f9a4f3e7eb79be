//! Bridge from tool calls to the upstream inference API.
//!
//! Each operation has a typed form returning `Result<_, Error>` and a
//! string form that renders every outcome, failures included, into the
//! text handed back to the host. Nothing here retries and nothing here
//! holds mutable state, so one bridge can serve overlapping calls.

use log::{debug, error, info, trace};
use std::time::Duration;

use crate::config::BridgeConfig;
use crate::error::{EmptyResult, Error};
use crate::request::{ChatMessage, ChatRequest, CompletionRequest,
  CompletionResponse, ModelsResponse};
use crate::{BridgeResult, ModelDescriptor};

/// Probe sent to infer the loaded model
const IDENTIFY_PROMPT: &str = "What model are you?";
const IDENTIFY_TEMPERATURE: f64 = 0.7;
const IDENTIFY_MAX_TOKENS: i64 = 10;

pub struct InferenceBridge
{   config: BridgeConfig
  , http_client: reqwest::Client
}

impl InferenceBridge
{   /// Build the HTTP client for an already validated config
    pub fn new(config: BridgeConfig) -> Result<Self, Error>
    {   debug!("Creating InferenceBridge for {}", config.api_base);
        let mut builder = reqwest::Client::builder();
        if !config.use_system_proxy
        {   builder = builder.no_proxy();
        }
        if let Some(secs) = config.timeout_secs
        {   builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(|e| {
          error!("Failed to build HTTP client: {}", e);
          Error::InvalidConfiguration(e.to_string())
        })?;
        Ok(InferenceBridge
        {   config
          , http_client
        })
    }

    pub fn config(&self) -> &BridgeConfig
    {   &self.config
    }

    // ===== Typed operations =====

    /// `Ok` when `GET /models` answers 200; the body is not read
    pub async fn check_health(&self) -> Result<(), Error>
    {   let response = self.http_client
          .get(self.config.endpoint("models"))
          .send()
          .await?;
        expect_ok(&response)
    }

    /// Model ids reported by `GET /models`, in upstream order
    pub async fn fetch_models(&self)
      -> Result<Vec<ModelDescriptor>, Error>
    {   let response = self.http_client
          .get(self.config.endpoint("models"))
          .send()
          .await?;
        expect_ok(&response)?;

        let body = response.bytes().await?;
        let models: ModelsResponse = serde_json::from_slice(&body)?;
        let models = models.data.unwrap_or_default();
        debug!("Retrieved {} models", models.len());
        if models.is_empty()
        {   return Err(Error::Empty(EmptyResult::NoModels));
        }
        Ok(models)
    }

    /// Best-effort guess of the loaded model.
    ///
    /// The upstream has no "current model" query, so this sends a tiny
    /// completion and reads the envelope's `model` field. `None` means the
    /// server did not fill it in. Servers that stop echoing the field make
    /// this silently less accurate.
    pub async fn identify_current_model(&self)
      -> Result<Option<String>, Error>
    {   let request = CompletionRequest
        {   model: self.config.default_model.clone()
          , messages: vec![ChatMessage::system(IDENTIFY_PROMPT)]
          , temperature: IDENTIFY_TEMPERATURE
          , max_tokens: IDENTIFY_MAX_TOKENS
        };
        let envelope = self.post_completion(&request).await?;
        Ok(envelope.model_name())
    }

    /// Content of the first choice for `request`
    pub async fn complete_chat(
      &self
    , request: &ChatRequest
    ) -> Result<String, Error>
    {   let body = request.to_completion_request(
          self.config.default_model.as_deref()
        );
        info!(
          "Sending request to LM Studio with {} messages",
          body.messages.len()
        );
        let envelope = self.post_completion(&body).await?;
        info!("Received response from LM Studio");
        envelope.first_content()
    }

    async fn post_completion(
      &self
    , request: &CompletionRequest
    ) -> Result<CompletionResponse, Error>
    {   trace!("Completion request: {:?}", request);
        let response = self.http_client
          .post(self.config.endpoint("chat/completions"))
          .json(request)
          .send()
          .await?;
        expect_ok(&response)?;

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    // ===== String boundary =====

    pub async fn health_check(&self) -> BridgeResult
    {   match self.check_health().await
        {   Ok(()) => {
              "LM Studio API is running and accessible.".to_string()
            }
          , Err(Error::HttpStatus(code)) => {
              format!("LM Studio API returned status code {}.", code)
            }
          , Err(e) => {
              debug!("health_check failed: {}", e);
              format!("Error connecting to LM Studio API: {}", e)
            }
        }
    }

    pub async fn list_models(&self) -> BridgeResult
    {   match self.fetch_models().await
        {   Ok(models) => format_model_list(&models)
          , Err(Error::HttpStatus(code)) => {
              format!("Failed to fetch models. Status code: {}", code)
            }
          , Err(Error::Empty(kind)) => kind.to_string()
          , Err(e) => {
              error!("Error in list_models: {}", e);
              format!("Error listing models: {}", e)
            }
        }
    }

    pub async fn get_current_model(&self) -> BridgeResult
    {   match self.identify_current_model().await
        {   Ok(model) => format!(
              "Currently loaded model: {}",
              model.as_deref().unwrap_or("Unknown")
            )
          , Err(Error::HttpStatus(code)) => format!(
              "Failed to identify current model. Status code: {}",
              code
            )
          , Err(e) => {
              error!("Error in get_current_model: {}", e);
              format!("Error identifying current model: {}", e)
            }
        }
    }

    pub async fn chat_completion(
      &self
    , request: &ChatRequest
    ) -> BridgeResult
    {   match self.complete_chat(request).await
        {   Ok(content) => content
          , Err(Error::HttpStatus(code)) => {
              error!("LM Studio API error: {}", code);
              format!("Error: LM Studio returned status code {}", code)
            }
          , Err(Error::Empty(kind)) => kind.to_string()
          , Err(e) => {
              error!("Error in chat_completion: {}", e);
              format!("Error generating completion: {}", e)
            }
        }
    }
}

fn expect_ok(response: &reqwest::Response) -> Result<(), Error>
{   let status = response.status();
    trace!("Upstream response status: {}", status);
    if status != reqwest::StatusCode::OK
    {   return Err(Error::HttpStatus(status.as_u16()));
    }
    Ok(())
}

/// Header line, blank line, then one `- id` line per model
pub fn format_model_list(models: &[ModelDescriptor]) -> String
{   let mut result = String::from("Available models in LM Studio:\n\n");
    for model in models
    {   result.push_str("- ");
        result.push_str(&model.id);
        result.push('\n');
    }
    result
}
