use crate::domain::course::{AssociationRecord, CourseId, CourseRecord, NewAssociation, NewCourse};
use crate::domain::institution::{InstitutionId, InstitutionRecord, NewInstitution};
use crate::error::{MigrationError, Result};
use crate::services::backend::DirectoryBackend;
use async_trait::async_trait;
use std::sync::Mutex;

/// In-process stand-in for the directory service, filtering names by substring
/// the way the real endpoints do and recording every call it receives.
#[derive(Default)]
pub struct MemoryDirectory {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    next_id: i64,
    institutions: Vec<InstitutionRecord>,
    courses: Vec<CourseRecord>,
    associations: Vec<AssociationRecord>,
    calls: Vec<String>,
    creates: usize,
    failing_courses: Vec<String>,
    drop_institution_creates: bool,
    ignore_parent_filter: bool,
    unavailable: bool,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(MigrationError::ApiError {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        Ok(())
    }
}

fn contains_ignoring_case(stored: Option<&String>, query: &str) -> bool {
    stored
        .map(|s| s.to_lowercase().contains(&query.trim().to_lowercase()))
        .unwrap_or(false)
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_institution(&self, name: &str, parent_id: Option<InstitutionId>) -> InstitutionId {
        let mut state = self.state.lock().unwrap();
        let id = InstitutionId(state.next_id());
        state.institutions.push(InstitutionRecord {
            id,
            name: Some(name.to_string()),
            parent_id: Some(parent_id),
        });
        id
    }

    pub fn with_course(&self, designation: &str) -> CourseId {
        let mut state = self.state.lock().unwrap();
        let id = CourseId(state.next_id());
        state.courses.push(CourseRecord {
            id,
            designation: Some(designation.to_string()),
        });
        id
    }

    pub fn with_association(&self, institution_id: InstitutionId, course_id: CourseId) {
        self.state.lock().unwrap().associations.push(AssociationRecord {
            institution_id,
            course_id,
        });
    }

    /// Makes `addCurso` fail for this designation (case-insensitive).
    pub fn fail_course_creation(&self, designation: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_courses
            .push(designation.to_lowercase());
    }

    /// Accepts institution creates without storing them.
    pub fn drop_institution_creates(&self) {
        self.state.lock().unwrap().drop_institution_creates = true;
    }

    /// Answers scoped institution listings with every name match, whatever the parent.
    pub fn ignore_parent_filter(&self) {
        self.state.lock().unwrap().ignore_parent_filter = true;
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unwrap().unavailable = unavailable;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn create_count(&self) -> usize {
        self.state.lock().unwrap().creates
    }

    pub fn institutions(&self) -> Vec<InstitutionRecord> {
        self.state.lock().unwrap().institutions.clone()
    }

    pub fn associations(&self) -> Vec<AssociationRecord> {
        self.state.lock().unwrap().associations.clone()
    }
}

#[async_trait]
impl DirectoryBackend for MemoryDirectory {
    async fn list_institutions(
        &self,
        name: &str,
        parent_id: Option<InstitutionId>,
        page_size: u32,
    ) -> Result<Vec<InstitutionRecord>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("list_institutions:{}", name));
        state.check_available()?;

        let ignore_parent = state.ignore_parent_filter;
        Ok(state
            .institutions
            .iter()
            .filter(|inst| contains_ignoring_case(inst.name.as_ref(), name))
            .filter(|inst| ignore_parent || parent_id.map_or(true, |p| inst.belongs_to(p)))
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn add_institution(&self, payload: &NewInstitution) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("add_institution:{}", payload.name));
        state.check_available()?;

        state.creates += 1;
        if !state.drop_institution_creates {
            let id = InstitutionId(state.next_id());
            state.institutions.push(InstitutionRecord {
                id,
                name: Some(payload.name.clone()),
                parent_id: Some(payload.parent_id),
            });
        }
        Ok(())
    }

    async fn list_associations(&self) -> Result<Vec<AssociationRecord>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list_associations".to_string());
        state.check_available()?;
        Ok(state.associations.clone())
    }

    async fn add_association(&self, payload: &NewAssociation) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!(
            "add_association:{}:{}",
            payload.institution_id, payload.course_id
        ));
        state.check_available()?;

        state.creates += 1;
        state.associations.push(AssociationRecord {
            institution_id: payload.institution_id,
            course_id: payload.course_id,
        });
        Ok(())
    }

    async fn list_courses(&self, designation: &str, page_size: u32) -> Result<Vec<CourseRecord>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("list_courses:{}", designation));
        state.check_available()?;

        Ok(state
            .courses
            .iter()
            .filter(|course| contains_ignoring_case(course.designation.as_ref(), designation))
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn add_course(&self, payload: &NewCourse) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("add_course:{}", payload.designation));
        state.check_available()?;

        if state
            .failing_courses
            .contains(&payload.designation.to_lowercase())
        {
            return Err(MigrationError::ApiError {
                status: 500,
                message: format!("Erro ao gravar curso {}", payload.designation),
            });
        }

        state.creates += 1;
        let id = CourseId(state.next_id());
        state.courses.push(CourseRecord {
            id,
            designation: Some(payload.designation.clone()),
        });
        Ok(())
    }
}
