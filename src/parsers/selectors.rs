use crate::error::ConfigError;
use scraper::Selector;
use serde::{Deserialize, Serialize};

/// Selector lists as they appear in a configuration file
///
/// Every list is ordered: earlier entries win. Adding support for a new
/// markup variant means appending an entry, not writing code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Selectors for the element wrapping one business entry
    #[serde(default = "default_container_selectors")]
    pub containers: Vec<String>,

    /// Candidate selectors for the business name, relative to a container
    #[serde(default = "default_name_selectors")]
    pub name: Vec<String>,

    /// Candidate selectors for the street address, relative to a container
    #[serde(default = "default_address_selectors")]
    pub address: Vec<String>,

    /// Candidate selectors for the phone number, relative to a container
    #[serde(default = "default_phone_selectors")]
    pub phone: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            containers: default_container_selectors(),
            name: default_name_selectors(),
            address: default_address_selectors(),
            phone: default_phone_selectors(),
        }
    }
}

fn to_strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn default_container_selectors() -> Vec<String> {
    to_strings(&[
        ".listado-item",
        ".item-list",
        ".business-listing",
        ".result-item",
        ".comercial-item",
        ".card-item",
        ".listado",
        "article",
    ])
}

fn default_name_selectors() -> Vec<String> {
    to_strings(&[
        ".lnk-nombre",
        "h2",
        ".nombre",
        ".title",
        ".business-name",
        "a[data-omniclick]",
    ])
}

fn default_address_selectors() -> Vec<String> {
    to_strings(&[".direccion", ".address", ".location", ".street-address"])
}

fn default_phone_selectors() -> Vec<String> {
    to_strings(&[
        ".telf",
        ".telefono",
        ".phone",
        ".tel",
        "[data-omniclick-phone]",
        ".tlf",
    ])
}

/// A compiled selector together with its source text (kept for logging)
#[derive(Debug, Clone)]
pub struct Candidate {
    pub source: String,
    pub selector: Selector,
}

/// Compiled, ordered selector lists used by the extraction engine
#[derive(Debug, Clone)]
pub struct SelectorTable {
    pub containers: Vec<Candidate>,
    pub name: Vec<Candidate>,
    pub address: Vec<Candidate>,
    pub phone: Vec<Candidate>,
}

impl SelectorTable {
    /// Compile every selector in the configuration
    ///
    /// The container list must not be empty; field lists may be (the field is
    /// then always unknown).
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        if config.containers.is_empty() {
            return Err(ConfigError::EmptySelectors("containers"));
        }

        Ok(Self {
            containers: compile_list("containers", &config.containers)?,
            name: compile_list("name", &config.name)?,
            address: compile_list("address", &config.address)?,
            phone: compile_list("phone", &config.phone)?,
        })
    }
}

#[cfg(test)]
impl Default for SelectorTable {
    fn default() -> Self {
        Self::compile(&SelectorConfig::default()).expect("built-in selectors should be valid")
    }
}

fn compile_list(list: &'static str, sources: &[String]) -> Result<Vec<Candidate>, ConfigError> {
    sources
        .iter()
        .map(|source| {
            Selector::parse(source)
                .map(|selector| Candidate {
                    source: source.clone(),
                    selector,
                })
                .map_err(|e| ConfigError::Selector {
                    list,
                    selector: source.clone(),
                    reason: e.to_string(),
                })
        })
        .collect()
}
