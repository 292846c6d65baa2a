use crate::config::{MigrationConfig, PayloadDefaults};
use crate::domain::course::{CourseId, NewAssociation, NewCourse};
use crate::domain::institution::{InstitutionId, InstitutionRecord, NewInstitution};
use crate::domain::names_match;
use crate::error::{MigrationError, Result};
use crate::services::backend::DirectoryBackend;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    AlreadyLinked,
    MissingInstitution,
}

/// Lookup/create operations against the directory service.
///
/// Every failure is logged where it happens and handed back as an `Err`; a
/// lookup that simply finds nothing is `Ok(None)`.
pub struct DirectoryClient<B: DirectoryBackend> {
    backend: B,
    page_size: u32,
    defaults: PayloadDefaults,
}

impl<B: DirectoryBackend> DirectoryClient<B> {
    pub fn new(backend: B, config: &MigrationConfig) -> Self {
        DirectoryClient {
            backend,
            page_size: config.page_size,
            defaults: config.defaults.clone(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn defaults(&self) -> &PayloadDefaults {
        &self.defaults
    }

    pub async fn find_institution_id(
        &self,
        name: &str,
        parent_id: Option<InstitutionId>,
    ) -> Result<Option<InstitutionId>> {
        let records = self
            .backend
            .list_institutions(name.trim(), parent_id, self.page_size)
            .await
            .inspect_err(|e| log::error!("Institution lookup failed for {:?}: {}", name, e))?;

        match pick_institution(&records, name, parent_id) {
            Some(id) => {
                log::info!("Institution {:?} resolved to id {}", name, id);
                Ok(Some(id))
            }
            None => {
                log::warn!("Institution not found: {:?}", name);
                Ok(None)
            }
        }
    }

    /// Submits the institution and resolves its id with a follow-up lookup,
    /// since the create endpoint does not return one.
    pub async fn create_institution(&self, payload: &NewInstitution) -> Result<InstitutionId> {
        self.backend
            .add_institution(payload)
            .await
            .inspect_err(|e| log::error!("Failed to create institution {:?}: {}", payload.name, e))?;

        if payload.is_sub_unit() {
            log::info!("Sub-unit created: {}", payload.name);
        } else {
            log::info!("University created: {}", payload.name);
        }

        match self.find_institution_id(&payload.name, payload.parent_id).await? {
            Some(id) => Ok(id),
            None => {
                log::error!("Could not retrieve the id of created institution {:?}", payload.name);
                Err(MigrationError::Unresolved {
                    kind: "institution",
                    name: payload.name.clone(),
                })
            }
        }
    }

    pub async fn course_already_linked(
        &self,
        institution_id: InstitutionId,
        course_id: CourseId,
    ) -> Result<bool> {
        let associations = self
            .backend
            .list_associations()
            .await
            .inspect_err(|e| log::error!("Failed to check course association: {}", e))?;

        Ok(associations
            .iter()
            .any(|assoc| assoc.links(institution_id, course_id)))
    }

    pub async fn link_course(
        &self,
        institution_id: Option<InstitutionId>,
        course_id: CourseId,
        monthly_fee: Decimal,
    ) -> Result<LinkOutcome> {
        let Some(institution_id) = institution_id else {
            log::error!(
                "Institution id missing, course id {} could not be linked",
                course_id
            );
            return Ok(LinkOutcome::MissingInstitution);
        };

        // A failed duplicate check counts as "not linked yet".
        if self
            .course_already_linked(institution_id, course_id)
            .await
            .unwrap_or(false)
        {
            log::warn!(
                "Course id {} is already linked to institution id {}",
                course_id,
                institution_id
            );
            return Ok(LinkOutcome::AlreadyLinked);
        }

        let payload = NewAssociation {
            institution_id,
            course_id,
            monthly_fee,
        };
        self.backend.add_association(&payload).await.inspect_err(|e| {
            log::error!(
                "Failed to link course id {} to institution id {}: {}",
                course_id,
                institution_id,
                e
            )
        })?;

        log::info!(
            "Course id {} linked to institution id {}",
            course_id,
            institution_id
        );
        Ok(LinkOutcome::Linked)
    }

    pub async fn find_course_id(&self, name: &str) -> Result<Option<CourseId>> {
        let records = self
            .backend
            .list_courses(name.trim(), self.page_size)
            .await
            .inspect_err(|e| log::error!("Course lookup failed for {:?}: {}", name, e))?;

        let found = records.iter().find(|course| {
            course
                .designation
                .as_deref()
                .is_some_and(|designation| names_match(designation, name))
        });

        match found {
            Some(course) => {
                log::info!(
                    "Course found: {} (id {})",
                    course.designation.as_deref().unwrap_or_default(),
                    course.id
                );
                Ok(Some(course.id))
            }
            None => {
                log::warn!("Course not found: {:?}", name);
                Ok(None)
            }
        }
    }

    pub async fn create_course(&self, name: &str) -> Result<CourseId> {
        let payload = NewCourse::synthesize(name, &self.defaults);
        self.backend
            .add_course(&payload)
            .await
            .inspect_err(|e| log::error!("Failed to create course {:?}: {}", name, e))?;

        log::info!("Course created: {}", name);

        self.find_course_id(name)
            .await?
            .ok_or_else(|| MigrationError::Unresolved {
                kind: "course",
                name: name.to_string(),
            })
    }
}

/// Exact-name pick over a substring-filtered page.
///
/// A scoped lookup never accepts a record reported as top-level, so a faculty
/// named like its university stays distinct. Without a scope, an explicit
/// top-level record wins, then one with no reported parent, then any match.
fn pick_institution(
    records: &[InstitutionRecord],
    name: &str,
    parent_id: Option<InstitutionId>,
) -> Option<InstitutionId> {
    let mut candidates = records.iter().filter(|record| {
        record
            .name
            .as_deref()
            .is_some_and(|stored| names_match(stored, name))
    });

    match parent_id {
        Some(parent) => candidates
            .find(|record| record.belongs_to(parent))
            .map(|record| record.id),
        None => {
            let matches: Vec<&InstitutionRecord> = candidates.collect();
            matches
                .iter()
                .find(|record| record.is_top_level())
                .or_else(|| matches.iter().find(|record| record.parent_id.is_none()))
                .or_else(|| matches.first())
                .map(|record| record.id)
        }
    }
}
