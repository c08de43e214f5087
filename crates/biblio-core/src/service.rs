//! Service facade
//!
//! The operation set the HTTP layer calls. Payloads are validated here before
//! any storage call, ids are generated when absent, and project updates and
//! deletes pass the password gate in the same gate slot as the change itself.

use crate::config::StoreConfig;
use crate::error::{BiblioError, Result};
use crate::guard::check_password;
use crate::ids::{new_id, ProjectId};
use crate::payload::{required, source_id, NewProject, ProjectUpdate, SourcePayload};
use crate::persistence::{self, Repository};
use crate::project::{Project, ProjectSummary};
use crate::source::Source;

/// Bibliography operations over one repository
#[derive(Clone)]
pub struct BibliographyService {
    repo: Repository,
}

impl BibliographyService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Validate `config` and open the store it describes
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| BiblioError::Validation(format!("invalid store config: {}", e)))?;
        Ok(Self::new(Repository::open(config).await?))
    }

    /// Service over an in-memory database (for testing)
    pub async fn in_memory() -> Result<Self> {
        Ok(Self::new(Repository::in_memory().await?))
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    // ==================== Projects ====================

    pub async fn create_project(&self, payload: NewProject) -> Result<ProjectSummary> {
        let name = required(payload.name, "name")?;
        let description = required(payload.description, "description")?;
        let password = required(payload.password, "password")?;
        let id = match payload.id {
            Some(raw) => ProjectId::parse(&raw)?,
            None => ProjectId::new(),
        };

        let project = Project::new(id, name, description, password);
        let summary = project.summary();
        self.repo.insert_project(project).await?;
        Ok(summary)
    }

    pub async fn get_project(&self, id: &str) -> Result<ProjectSummary> {
        let id = ProjectId::parse(id)?;
        Ok(self.repo.get_project(id).await?.summary())
    }

    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        let projects = self.repo.list_projects().await?;
        Ok(projects.iter().map(Project::summary).collect())
    }

    /// Malformed ids simply do not exist
    pub async fn project_exists(&self, id: &str) -> Result<bool> {
        match ProjectId::parse(id) {
            Ok(id) => self.repo.project_exists(id).await,
            Err(_) => Ok(false),
        }
    }

    /// Replace name, description and password after checking `old_password`
    pub async fn update_project(&self, payload: ProjectUpdate) -> Result<ProjectSummary> {
        let id = ProjectId::parse(&required(payload.id, "id")?)?;
        let old_password = required(payload.old_password, "old_password")?;
        let name = required(payload.name, "name")?;
        let description = required(payload.description, "description")?;
        let password = required(payload.password, "password")?;

        let updated = Project::new(id, name, description, password);
        let summary = updated.summary();
        self.repo
            .with_project("update_project", id, move |conn, stored| {
                authorize(&stored, &old_password)?;
                persistence::update_project(conn, &updated)
            })
            .await?;
        Ok(summary)
    }

    /// Delete a project and its whole source collection after checking `password`
    pub async fn delete_project(&self, id: &str, password: &str) -> Result<()> {
        let id = ProjectId::parse(id)?;
        let password = password.to_string();
        self.repo
            .with_project("delete_project", id, move |conn, stored| {
                authorize(&stored, &password)?;
                persistence::remove_project(conn, &stored.id)
            })
            .await
    }

    // ==================== Sources ====================

    pub async fn create_source(&self, project_id: &str, payload: SourcePayload) -> Result<Source> {
        let project_id = ProjectId::parse(project_id)?;
        let id = source_id(payload.id.clone())?.unwrap_or_else(new_id);
        let source = build_source(id, payload)?;
        self.repo.insert_source(project_id, source.clone()).await?;
        Ok(source)
    }

    pub async fn get_source(&self, project_id: &str, source_id: &str) -> Result<Source> {
        let project_id = ProjectId::parse(project_id)?;
        self.repo
            .get_source(project_id, source_id.to_string())
            .await
    }

    pub async fn list_sources(&self, project_id: &str) -> Result<Vec<Source>> {
        let project_id = ProjectId::parse(project_id)?;
        self.repo.list_sources(project_id).await
    }

    /// Full replace of every field but the id, which the payload must carry
    pub async fn update_source(&self, project_id: &str, payload: SourcePayload) -> Result<Source> {
        let project_id = ProjectId::parse(project_id)?;
        let id = required(source_id(payload.id.clone())?, "id")?;
        let source = build_source(id, payload)?;
        self.repo.update_source(project_id, source.clone()).await?;
        Ok(source)
    }

    pub async fn delete_source(&self, project_id: &str, source_id: &str) -> Result<()> {
        let project_id = ProjectId::parse(project_id)?;
        self.repo
            .delete_source(project_id, source_id.to_string())
            .await
    }
}

fn authorize(project: &Project, supplied: &str) -> Result<()> {
    if check_password(project, supplied) {
        Ok(())
    } else {
        tracing::warn!(project_id = %project.id, "rejected project mutation: invalid password");
        Err(BiblioError::Unauthorized(project.id.to_string()))
    }
}

fn build_source(id: String, payload: SourcePayload) -> Result<Source> {
    Ok(Source {
        id,
        tag: required(payload.tag, "tag")?,
        url: required(payload.url, "url")?,
        author: required(payload.author, "author")?,
        title: required(payload.title, "title")?,
        date_accessed: required(payload.date_accessed, "date_accessed")?,
        date_published: required(payload.date_published, "date_published")?,
    })
}
