use serde::{Deserialize, Serialize};

use super::domain::{
    CategoryConfig, ClientPolicy, DepartmentTemplate, EventTypeCode, EventTypeConfig,
    SectorConfig,
};

/// Read-only reference data the resolvers consult.
///
/// Entries keep their declaration order; category option lists and client rule
/// tie-breaks depend on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    #[serde(default)]
    pub event_types: Vec<EventTypeConfig>,
    #[serde(default)]
    pub sectors: Vec<SectorConfig>,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub clients: Vec<ClientPolicy>,
    #[serde(default)]
    pub departments: Vec<DepartmentTemplate>,
}

impl ReferenceTables {
    pub fn event_type(&self, code: EventTypeCode) -> Option<&EventTypeConfig> {
        self.event_types.iter().find(|config| config.code == code)
    }

    pub fn sector(&self, code: &str) -> Option<&SectorConfig> {
        self.sectors
            .iter()
            .find(|sector| sector.code.as_str() == code)
    }

    pub fn category(&self, code: &str) -> Option<&CategoryConfig> {
        self.categories
            .iter()
            .find(|category| category.code.as_str() == code)
    }

    pub fn client(&self, code: &str) -> Option<&ClientPolicy> {
        self.clients.iter().find(|client| client.code.as_str() == code)
    }

    pub fn client_mut(&mut self, code: &str) -> Option<&mut ClientPolicy> {
        self.clients
            .iter_mut()
            .find(|client| client.code.as_str() == code)
    }

    pub fn department(&self, code: &str) -> Option<&DepartmentTemplate> {
        self.departments
            .iter()
            .find(|department| department.code.as_str() == code)
    }
}
