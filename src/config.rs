use crate::error::{MigrationError, Result};

pub const DEFAULT_CSV_PATH: &str = "Tabela_Final_com_Pesquisa.csv";
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Fixed values the remote service requires but the CSV export does not carry.
#[derive(Debug, Clone)]
pub struct PayloadDefaults {
    pub province_id: u32,
    pub municipality_id: u32,
    pub address: String,
    pub phone: String,
    pub email_domain: String,
    pub institution_type: u32,
    pub nature: u32,
    pub field_of_study_id: u32,
    pub academic_level: u32,
    pub course_category_id: u32,
}

impl Default for PayloadDefaults {
    fn default() -> Self {
        PayloadDefaults {
            province_id: 3,
            municipality_id: 2607,
            address: "ENDERECO GENÉRICO".to_string(),
            phone: "923000000".to_string(),
            email_domain: "example.ao".to_string(),
            institution_type: 1,
            nature: 1,
            field_of_study_id: 1,
            academic_level: 3,
            course_category_id: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MigrationConfig {
    pub base_url: String,
    pub csv_path: String,
    pub page_size: u32,
    pub skip_malformed: bool,
    pub defaults: PayloadDefaults,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        MigrationConfig {
            base_url: String::new(),
            csv_path: DEFAULT_CSV_PATH.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            skip_malformed: true,
            defaults: PayloadDefaults::default(),
        }
    }
}

impl MigrationConfig {
    pub fn new(base_url: &str) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Reads `BASE_URL` (required), `CSV_PATH` and `PAGE_SIZE` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| MigrationError::MissingConfig("BASE_URL".to_string()))?;

        let mut config = MigrationConfig::new(&base_url);

        if let Some(path) = lookup("CSV_PATH").filter(|v| !v.trim().is_empty()) {
            config = config.with_csv_path(path.trim());
        }

        if let Some(raw) = lookup("PAGE_SIZE") {
            let page_size = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| MigrationError::InvalidConfig {
                    key: "PAGE_SIZE".to_string(),
                    value: raw.clone(),
                })?;
            config = config.with_page_size(page_size);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_csv_path(mut self, path: &str) -> Self {
        self.csv_path = path.to_string();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_skip_malformed(mut self, skip: bool) -> Self {
        self.skip_malformed = skip;
        self
    }

    pub fn with_defaults(mut self, defaults: PayloadDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}
