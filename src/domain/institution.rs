use crate::config::PayloadDefaults;
use crate::services::acronym::{generate_acronym, random_token};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstitutionId(pub i64);

impl fmt::Display for InstitutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of `getAllInstituicaoEnsino`. Only the fields the migration reads.
///
/// `parent_id` is `None` when the listing leaves the field out, `Some(None)`
/// for an explicit top-level `null`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstitutionRecord {
    pub id: InstitutionId,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(rename = "instituicaoPaiID", default, deserialize_with = "reported")]
    pub parent_id: Option<Option<InstitutionId>>,
}

fn reported<'de, D>(deserializer: D) -> Result<Option<Option<InstitutionId>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<InstitutionId>::deserialize(deserializer).map(Some)
}

impl InstitutionRecord {
    pub fn is_top_level(&self) -> bool {
        self.parent_id == Some(None)
    }

    /// An unreported parent is left to the remote filter.
    pub fn belongs_to(&self, parent: InstitutionId) -> bool {
        match self.parent_id {
            Some(reported) => reported == Some(parent),
            None => true,
        }
    }
}

/// Create payload for `addInstituicaoEnsino`.
///
/// `acronym` and `tax_identifier` are synthesized and carry no uniqueness guarantee.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInstitution {
    pub name: String,
    pub parent_id: Option<InstitutionId>,
    pub acronym: String,
    pub tax_identifier: String,
    pub province_id: u32,
    pub municipality_id: u32,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub institution_type: u32,
    pub nature: u32,
    pub active: bool,
}

impl NewInstitution {
    /// Fills every field the CSV export lacks from `defaults` and generated values.
    pub fn synthesize(
        name: &str,
        parent_id: Option<InstitutionId>,
        defaults: &PayloadDefaults,
    ) -> Self {
        let name = name.trim();
        let acronym = match generate_acronym(name) {
            acronym if acronym.is_empty() => name.chars().take(5).collect::<String>().to_uppercase(),
            acronym => acronym,
        };
        let mailbox: String = name
            .split_whitespace()
            .collect::<String>()
            .to_lowercase();

        NewInstitution {
            name: name.to_uppercase(),
            parent_id,
            acronym,
            tax_identifier: random_token(8),
            province_id: defaults.province_id,
            municipality_id: defaults.municipality_id,
            address: defaults.address.clone(),
            phone: defaults.phone.clone(),
            email: format!("{}@{}", mailbox, defaults.email_domain),
            institution_type: defaults.institution_type,
            nature: defaults.nature,
            active: true,
        }
    }

    pub fn is_sub_unit(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Multipart form fields, every present value stringified.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("Nome", self.name.clone()),
            ("Sigla", self.acronym.clone()),
            ("NumIdentificacao", self.tax_identifier.clone()),
            ("ProvinciaID", self.province_id.to_string()),
            ("MunicipioID", self.municipality_id.to_string()),
            ("Endereco", self.address.clone()),
            ("Telefone", self.phone.clone()),
            ("Email", self.email.clone()),
            ("TipoInstituicao", self.institution_type.to_string()),
            ("Natureza", self.nature.to_string()),
            ("IsActive", self.active.to_string()),
        ];
        if let Some(parent) = self.parent_id {
            fields.push(("InstituicaoPaiID", parent.to_string()));
        }
        fields.push(("Foto", String::new()));
        fields.push(("DescricaoEmpresa", String::new()));
        fields
    }
}
