//! Julep API client for running summarization tasks.
//!
//! The client registers one agent when it connects and creates every task under
//! that agent. Requests are never retried by the HTTP middleware: submission must
//! not be repeated and the poller owns retries of status queries.

use super::{check_status, decode, transport_error};
use crate::error::{config_error, Error};
use async_trait::async_trait;
use log::*;
use meeting_ai::traits::execution::Provider;
use meeting_ai::{Error as ProviderError, Execution, TaskDefinition};
use meeting_auth::api_key::{ApiKeyProvider, BearerTokenAuth};
use meeting_auth::http::{AuthenticatedClient, AuthenticatedClientBuilder};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use service::config::Config;
use std::time::Duration;

const PROVIDER_ID: &str = "julep";

/// Connection settings and the profile of the agent created at startup.
#[derive(Debug, Clone)]
pub struct JulepSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub agent: AgentProfile,
    pub timeout: Duration,
}

impl JulepSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.julep_base_url().to_string(),
            api_key: config.julep_api_key(),
            agent: AgentProfile {
                name: config.agent_name().to_string(),
                model: config.agent_model().to_string(),
                about: config.agent_about().to_string(),
            },
            timeout: config.http_timeout(),
        }
    }
}

/// Request payload for creating an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentProfile {
    pub name: String,
    pub model: String,
    pub about: String,
}

/// Response carrying the ID of a created resource
#[derive(Debug, Deserialize)]
struct CreatedResource {
    id: String,
}

pub struct JulepClient {
    client: AuthenticatedClient,
    base_url: String,
    agent_id: String,
}

impl JulepClient {
    /// Build the client and create the summarization agent.
    pub async fn connect(settings: JulepSettings) -> Result<Self, Error> {
        let api_key = settings
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                warn!("Julep API key is not configured");
                config_error("JULEP_API_KEY is not set")
            })?;

        let client = AuthenticatedClientBuilder::new()
            .with_auth(Box::new(BearerTokenAuth::new(
                ApiKeyProvider::Julep,
                SecretString::new(api_key),
            )))
            .with_timeout(settings.timeout)
            .with_max_retries(0)
            .build()?;
        let base_url = settings.base_url.trim_end_matches('/').to_string();

        debug!("Creating Julep agent \"{}\"", settings.agent.name);
        let response = client
            .post(format!("{base_url}/agents"))
            .json(&settings.agent)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_ID, e))?;
        let agent: CreatedResource = decode(PROVIDER_ID, response).await?;
        info!("Created Julep agent with ID: {}", agent.id);

        Ok(Self {
            client,
            base_url,
            agent_id: agent.id,
        })
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    async fn create(&self, url: String, body: &impl Serialize) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_ID, e))?;
        let created: CreatedResource = decode(PROVIDER_ID, response).await?;
        Ok(created.id)
    }
}

#[async_trait]
impl Provider for JulepClient {
    async fn create_task(&self, definition: &TaskDefinition) -> Result<String, ProviderError> {
        let url = format!("{}/agents/{}/tasks", self.base_url, self.agent_id);
        let task_id = self.create(url, definition).await?;
        debug!("Created Julep task {}", task_id);
        Ok(task_id)
    }

    async fn create_execution(&self, task_id: &str, input: &Value) -> Result<String, ProviderError> {
        let url = format!("{}/tasks/{}/executions", self.base_url, task_id);
        self.create(url, &json!({ "input": input })).await
    }

    async fn get_execution(&self, execution_id: &str) -> Result<Execution, ProviderError> {
        let response = self
            .client
            .get(format!("{}/executions/{}", self.base_url, execution_id))
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_ID, e))?;
        decode(PROVIDER_ID, response).await
    }

    async fn cancel_execution(&self, execution_id: &str) -> Result<(), ProviderError> {
        let response = self
            .client
            .put(format!("{}/executions/{}", self.base_url, execution_id))
            .json(&json!({ "status": "cancelled" }))
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_ID, e))?;
        check_status(PROVIDER_ID, response).await?;
        info!("Cancelled Julep execution {}", execution_id);
        Ok(())
    }

    fn provider_id(&self) -> &str {
        PROVIDER_ID
    }
}
