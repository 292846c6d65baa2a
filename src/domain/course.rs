use crate::config::PayloadDefaults;
use crate::domain::institution::InstitutionId;
use crate::services::acronym::{generate_acronym, random_token};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub i64);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CourseRecord {
    pub id: CourseId,
    #[serde(rename = "designacao", default)]
    pub designation: Option<String>,
}

/// JSON body of `addCurso`. `acronym` and `code` are not guaranteed unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCourse {
    #[serde(rename = "designacao")]
    pub designation: String,
    #[serde(rename = "sigla")]
    pub acronym: String,
    #[serde(rename = "areaFormacaoID")]
    pub field_of_study_id: u32,
    #[serde(rename = "nivelAcademico")]
    pub academic_level: u32,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "categoriaInstituicaoEnsinoID")]
    pub category_id: u32,
}

impl NewCourse {
    pub fn synthesize(name: &str, defaults: &PayloadDefaults) -> Self {
        let acronym = match generate_acronym(name) {
            acronym if acronym.is_empty() => random_token(4),
            acronym => acronym,
        };

        NewCourse {
            designation: name.trim().to_uppercase(),
            acronym,
            field_of_study_id: defaults.field_of_study_id,
            academic_level: defaults.academic_level,
            code: random_token(6),
            category_id: defaults.course_category_id,
        }
    }
}

/// One entry of `getAllInstituicaoEnsinoCurso`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssociationRecord {
    #[serde(rename = "instituicaoEnsinoID")]
    pub institution_id: InstitutionId,
    #[serde(rename = "cursoID")]
    pub course_id: CourseId,
}

impl AssociationRecord {
    pub fn links(&self, institution_id: InstitutionId, course_id: CourseId) -> bool {
        self.institution_id == institution_id && self.course_id == course_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAssociation {
    #[serde(rename = "instituicaoEnsinoID")]
    pub institution_id: InstitutionId,
    #[serde(rename = "cursoID")]
    pub course_id: CourseId,
    #[serde(rename = "valorMensalidade", with = "rust_decimal::serde::float")]
    pub monthly_fee: Decimal,
}
