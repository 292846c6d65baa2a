use serde::Deserialize;

/// Placeholder the export uses when a course has no organizational unit.
pub const NO_SUB_UNIT: &str = "—";

#[derive(Debug, Clone, Deserialize)]
pub struct RawOfferingRecord {
    #[serde(rename = "Universidade / Instituto", default)]
    pub university: String,
    #[serde(rename = "Faculdade / Unidade Orgânica", default)]
    pub sub_unit: String,
    #[serde(rename = "Curso", default)]
    pub course: String,
}

/// A CSV row that is worth reconciling: all three names present and a real sub-unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseOffering {
    pub university: String,
    pub sub_unit: String,
    pub course: String,
}

impl CourseOffering {
    pub fn from_raw(raw: &RawOfferingRecord) -> Option<Self> {
        let university = raw.university.trim();
        let sub_unit = raw.sub_unit.trim();
        let course = raw.course.trim();

        if university.is_empty() || sub_unit.is_empty() || course.is_empty() {
            return None;
        }
        if sub_unit == NO_SUB_UNIT {
            return None;
        }

        Some(CourseOffering {
            university: university.to_string(),
            sub_unit: sub_unit.to_string(),
            course: course.to_string(),
        })
    }
}
