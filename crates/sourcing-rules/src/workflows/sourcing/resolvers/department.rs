use super::Resolution;
use crate::workflows::sourcing::domain::{CategoryCode, DepartmentTemplate, SectorCode};
use crate::workflows::sourcing::tables::ReferenceTables;

pub fn resolve_department<'a>(
    tables: &'a ReferenceTables,
    code: Option<&str>,
) -> Resolution<DepartmentView<'a>> {
    Resolution::lookup(code, |code| tables.department(code).map(DepartmentView::new))
}

/// Department template with advisory mandate checks. Nothing here is enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepartmentView<'a> {
    template: &'a DepartmentTemplate,
}

impl<'a> DepartmentView<'a> {
    pub fn new(template: &'a DepartmentTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &'a DepartmentTemplate {
        self.template
    }

    pub fn allowed_sectors(&self) -> &'a [SectorCode] {
        &self.template.allowed_sectors
    }

    pub fn allowed_categories(&self) -> &'a [CategoryCode] {
        &self.template.allowed_categories
    }

    /// An empty allow-list leaves the department unrestricted.
    pub fn allows_sector(&self, sector: &str) -> bool {
        let allowed = self.allowed_sectors();
        allowed.is_empty() || allowed.iter().any(|code| code.as_str() == sector)
    }

    pub fn allows_category(&self, category: &str) -> bool {
        let allowed = self.allowed_categories();
        allowed.is_empty() || allowed.iter().any(|code| code.as_str() == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::sourcing::catalog::standard_tables;

    #[test]
    fn mandate_checks_are_advisory_lookups() {
        let tables = standard_tables();

        let ti = resolve_department(&tables, Some("ti"))
            .found()
            .expect("ti catalogued");
        assert!(ti.allows_sector("tecnologia"));
        assert!(!ti.allows_sector("construcao"));
        assert!(ti.allows_category("licencas_software"));
        assert!(!ti.allows_category("obras_civis"));

        let suprimentos = resolve_department(&tables, Some("suprimentos"))
            .found()
            .expect("suprimentos catalogued");
        assert!(suprimentos.allows_sector("saude"));
        assert!(suprimentos.allows_category("medicamentos"));

        assert!(resolve_department(&tables, Some("juridico")).is_unknown());
    }
}
