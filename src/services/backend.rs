use crate::domain::course::{AssociationRecord, CourseRecord, NewAssociation, NewCourse};
use crate::domain::institution::{InstitutionId, InstitutionRecord, NewInstitution};
use crate::error::Result;
use async_trait::async_trait;

/// Raw endpoints of the administrative directory service.
///
/// List calls return whatever the remote filter matched; the remote side filters
/// names by substring, so callers must still pick exact matches themselves.
#[async_trait]
pub trait DirectoryBackend: Send + Sync {
    async fn list_institutions(
        &self,
        name: &str,
        parent_id: Option<InstitutionId>,
        page_size: u32,
    ) -> Result<Vec<InstitutionRecord>>;

    async fn add_institution(&self, payload: &NewInstitution) -> Result<()>;

    async fn list_associations(&self) -> Result<Vec<AssociationRecord>>;

    async fn add_association(&self, payload: &NewAssociation) -> Result<()>;

    async fn list_courses(&self, designation: &str, page_size: u32) -> Result<Vec<CourseRecord>>;

    async fn add_course(&self, payload: &NewCourse) -> Result<()>;
}
