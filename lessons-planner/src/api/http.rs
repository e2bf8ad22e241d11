//! reqwest-backed lessons API client
//!
//! Collection URLs keep their trailing slash (`/api/tags/`); the API
//! treats `/api/tags` as a different route. Item URLs have none
//! (`/api/tags/4`).

use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::time::Duration;

use lessons_common::api::{
    ActivityRelsUpdate, ActivityUpdate, NewActivity, NewCurriculum, NewLink, NewStep, NewTag,
    TagIdsUpdate,
};
use lessons_common::config::{validate_base_url, ClientSettings};
use lessons_common::models::{
    Activity, ActivityId, Curriculum, CurriculumId, Material, Resource, Step, Tag,
};

use super::LessonsApi;
use crate::error::{ClientError, ClientResult};

const USER_AGENT: &str = concat!("lessons-planner/", env!("CARGO_PKG_VERSION"));

const CURRICULA: &str = "curricula";
const ACTIVITIES: &str = "activities";
const TAGS: &str = "tags";
const MATERIALS: &str = "materials";
const RESOURCES: &str = "resources";
const STEPS: &str = "steps";

/// Lessons API client over HTTP
pub struct HttpLessonsApi {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpLessonsApi {
    /// Create a client for `base_url` (scheme and host, optional path prefix)
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        validate_base_url(base_url)?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> ClientResult<Self> {
        Self::new(
            &settings.api_base_url,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// `<base>/api/<resource>/`
    pub fn collection_url(&self, resource: &str) -> String {
        format!("{}/api/{}/", self.base_url, resource)
    }

    /// `<base>/api/<resource>/<id>`
    pub fn item_url(&self, resource: &str, id: impl Display) -> String {
        format!("{}/api/{}/{}", self.base_url, resource, id)
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> ClientResult<T> {
        tracing::debug!(url = %url, "GET");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Self::decode(url, response).await
    }

    async fn send<B, T>(&self, method: Method, url: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(method = %method, url = %url, "Sending request");

        let response = self
            .http_client
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Self::decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // Error bodies are passed through untouched; non-JSON bodies as a string
            let payload =
                serde_json::from_str::<Value>(&text).unwrap_or_else(|_| Value::String(text));
            tracing::warn!(url = %url, status = status.as_u16(), "API rejected request");
            return Err(ClientError::Api {
                status: status.as_u16(),
                payload,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl LessonsApi for HttpLessonsApi {
    async fn list_curricula(&self) -> ClientResult<Vec<Curriculum>> {
        self.get(&self.collection_url(CURRICULA)).await
    }

    async fn get_curriculum(&self, id: CurriculumId) -> ClientResult<Curriculum> {
        self.get(&self.item_url(CURRICULA, id)).await
    }

    async fn create_curriculum(&self, new: &NewCurriculum) -> ClientResult<Curriculum> {
        self.send(Method::POST, &self.collection_url(CURRICULA), new)
            .await
    }

    async fn update_curriculum_activities(
        &self,
        id: CurriculumId,
        update: &ActivityRelsUpdate,
    ) -> ClientResult<Curriculum> {
        self.send(Method::PATCH, &self.item_url(CURRICULA, id), update)
            .await
    }

    async fn list_activities(&self) -> ClientResult<Vec<Activity>> {
        self.get(&self.collection_url(ACTIVITIES)).await
    }

    async fn create_activity(&self, new: &NewActivity) -> ClientResult<Activity> {
        self.send(Method::POST, &self.collection_url(ACTIVITIES), new)
            .await
    }

    async fn update_activity_tags(
        &self,
        id: ActivityId,
        update: &TagIdsUpdate,
    ) -> ClientResult<Activity> {
        self.send(Method::PATCH, &self.item_url(ACTIVITIES, id), update)
            .await
    }

    async fn update_activity(
        &self,
        id: ActivityId,
        update: &ActivityUpdate,
    ) -> ClientResult<Activity> {
        self.send(Method::PATCH, &self.item_url(ACTIVITIES, id), update)
            .await
    }

    async fn list_tags(&self) -> ClientResult<Vec<Tag>> {
        self.get(&self.collection_url(TAGS)).await
    }

    async fn create_tag(&self, new: &NewTag) -> ClientResult<Tag> {
        self.send(Method::POST, &self.collection_url(TAGS), new).await
    }

    async fn list_materials(&self) -> ClientResult<Vec<Material>> {
        self.get(&self.collection_url(MATERIALS)).await
    }

    async fn create_material(&self, new: &NewLink) -> ClientResult<Material> {
        self.send(Method::POST, &self.collection_url(MATERIALS), new)
            .await
    }

    async fn list_resources(&self) -> ClientResult<Vec<Resource>> {
        self.get(&self.collection_url(RESOURCES)).await
    }

    async fn create_resource(&self, new: &NewLink) -> ClientResult<Resource> {
        self.send(Method::POST, &self.collection_url(RESOURCES), new)
            .await
    }

    async fn list_steps(&self) -> ClientResult<Vec<Step>> {
        self.get(&self.collection_url(STEPS)).await
    }

    async fn create_step(&self, new: &NewStep) -> ClientResult<Step> {
        self.send(Method::POST, &self.collection_url(STEPS), new).await
    }
}
