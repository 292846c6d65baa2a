use crate::domain::course::CourseId;
use crate::domain::institution::{InstitutionId, NewInstitution};
use crate::domain::offering::{CourseOffering, RawOfferingRecord};
use crate::error::Result;
use crate::services::backend::DirectoryBackend;
use crate::services::directory_client::{DirectoryClient, LinkOutcome};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Skipped,
    Linked,
    AlreadyLinked,
    Abandoned(String),
}

pub struct RowReconciler<B: DirectoryBackend> {
    client: DirectoryClient<B>,
}

impl<B: DirectoryBackend> RowReconciler<B> {
    pub fn new(client: DirectoryClient<B>) -> Self {
        RowReconciler { client }
    }

    pub fn client(&self) -> &DirectoryClient<B> {
        &self.client
    }

    /// Ensures university, sub-unit and course exist remotely and that the
    /// course is linked to the sub-unit.
    ///
    /// Lookup and create failures abandon the row; only a failed association
    /// create comes back as `Err`.
    pub async fn reconcile(&self, raw: &RawOfferingRecord) -> Result<RowOutcome> {
        let Some(offering) = CourseOffering::from_raw(raw) else {
            return Ok(RowOutcome::Skipped);
        };

        let Some(university_id) = self.ensure_university(&offering.university).await else {
            log::error!("University not found nor created: {}", offering.university);
            return Ok(abandon("university unresolved", &offering.university));
        };

        let Some(sub_unit_id) = self
            .ensure_sub_unit(&offering.university, university_id, &offering.sub_unit)
            .await
        else {
            log::error!("Sub-unit not found nor created: {}", offering.sub_unit);
            return Ok(abandon("sub-unit unresolved", &offering.sub_unit));
        };

        let Some(course_id) = self.ensure_course(&offering.course).await else {
            log::error!("Course not found nor created: {}", offering.course);
            return Ok(abandon("course unresolved", &offering.course));
        };

        let outcome = self
            .client
            .link_course(Some(sub_unit_id), course_id, Decimal::ZERO)
            .await?;

        Ok(match outcome {
            LinkOutcome::Linked => RowOutcome::Linked,
            LinkOutcome::AlreadyLinked => RowOutcome::AlreadyLinked,
            LinkOutcome::MissingInstitution => abandon("sub-unit unresolved", &offering.sub_unit),
        })
    }

    async fn ensure_university(&self, name: &str) -> Option<InstitutionId> {
        if let Some(id) = self.client.find_institution_id(name, None).await.ok().flatten() {
            return Some(id);
        }

        let payload = NewInstitution::synthesize(name, None, self.client.defaults());
        self.client.create_institution(&payload).await.ok()
    }

    async fn ensure_sub_unit(
        &self,
        university: &str,
        university_id: InstitutionId,
        name: &str,
    ) -> Option<InstitutionId> {
        if let Some(id) = self
            .client
            .find_institution_id(name, Some(university_id))
            .await
            .ok()
            .flatten()
        {
            return Some(id);
        }

        // The university may have been replaced since this row resolved it.
        let parent_id = match self.client.find_institution_id(university, None).await {
            Ok(Some(fresh)) => fresh,
            _ => university_id,
        };

        log::info!(
            "Creating sub-unit {} under university id {}",
            name,
            parent_id
        );
        let payload = NewInstitution::synthesize(name, Some(parent_id), self.client.defaults());
        if let Ok(id) = self.client.create_institution(&payload).await {
            return Some(id);
        }

        // A create can fail on our side and still land remotely.
        self.client
            .find_institution_id(name, Some(parent_id))
            .await
            .ok()
            .flatten()
    }

    async fn ensure_course(&self, name: &str) -> Option<CourseId> {
        if let Some(id) = self.client.find_course_id(name).await.ok().flatten() {
            return Some(id);
        }
        self.client.create_course(name).await.ok()
    }
}

fn abandon(reason: &str, name: &str) -> RowOutcome {
    RowOutcome::Abandoned(format!("{}: {}", reason, name))
}
