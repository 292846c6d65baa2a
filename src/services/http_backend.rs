use crate::domain::course::{AssociationRecord, CourseRecord, NewAssociation, NewCourse};
use crate::domain::institution::{InstitutionId, InstitutionRecord, NewInstitution};
use crate::domain::ListEnvelope;
use crate::error::{MigrationError, Result};
use crate::services::backend::DirectoryBackend;
use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

const FIRST_PAGE: &str = "1";

pub struct HttpDirectoryBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDirectoryBackend {
    pub fn new(base_url: &str) -> Self {
        HttpDirectoryBackend {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(MigrationError::ApiError {
            status: status.as_u16(),
            message: server_message(status, &body),
        })
    }

    async fn fetch_list<T: DeserializeOwned>(request: RequestBuilder) -> Result<Vec<T>> {
        let body = Self::send(request).await?.text().await?;
        let envelope: ListEnvelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.into_items())
    }
}

/// Most specific failure text available: the server's `retorno.mensagem`,
/// then the raw body, then the status reason.
pub fn server_message(status: StatusCode, body: &str) -> String {
    let nested = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/retorno/mensagem")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });

    match nested {
        Some(message) if !message.trim().is_empty() => message,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}

#[async_trait]
impl DirectoryBackend for HttpDirectoryBackend {
    async fn list_institutions(
        &self,
        name: &str,
        parent_id: Option<InstitutionId>,
        page_size: u32,
    ) -> Result<Vec<InstitutionRecord>> {
        let mut params = vec![
            ("Nome", name.to_string()),
            ("PageNumber", FIRST_PAGE.to_string()),
            ("PageSize", page_size.to_string()),
        ];
        if let Some(parent) = parent_id {
            params.push(("InstituicaoPaiID", parent.to_string()));
        }

        let request = self
            .client
            .get(self.endpoint("getAllInstituicaoEnsino"))
            .query(&params);
        Self::fetch_list(request).await
    }

    async fn add_institution(&self, payload: &NewInstitution) -> Result<()> {
        let form = payload
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value));

        let request = self
            .client
            .post(self.endpoint("addInstituicaoEnsino"))
            .multipart(form);
        Self::send(request).await?;
        Ok(())
    }

    async fn list_associations(&self) -> Result<Vec<AssociationRecord>> {
        let request = self
            .client
            .get(self.endpoint("getAllInstituicaoEnsinoCurso"));
        Self::fetch_list(request).await
    }

    async fn add_association(&self, payload: &NewAssociation) -> Result<()> {
        let request = self
            .client
            .post(self.endpoint("AddInstituicaoEnsinoCurso"))
            .json(payload);
        Self::send(request).await?;
        Ok(())
    }

    async fn list_courses(&self, designation: &str, page_size: u32) -> Result<Vec<CourseRecord>> {
        let params = [
            ("Designacao", designation.to_string()),
            ("PageNumber", FIRST_PAGE.to_string()),
            ("PageSize", page_size.to_string()),
        ];

        let request = self.client.get(self.endpoint("getAllCurso")).query(&params);
        Self::fetch_list(request).await
    }

    async fn add_course(&self, payload: &NewCourse) -> Result<()> {
        let request = self.client.post(self.endpoint("addCurso")).json(payload);
        Self::send(request).await?;
        Ok(())
    }
}
