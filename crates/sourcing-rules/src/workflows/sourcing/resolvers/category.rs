use super::Resolution;
use crate::workflows::sourcing::domain::CategoryConfig;
use crate::workflows::sourcing::tables::ReferenceTables;

/// Primary lookup plus the picker options scoped to the given sector.
#[derive(Debug, Clone)]
pub struct CategoryLookup<'a> {
    pub resolution: Resolution<&'a CategoryConfig>,
    pub options: Vec<&'a CategoryConfig>,
}

/// Plain lookup without building the option list.
pub fn lookup_category<'a>(
    tables: &'a ReferenceTables,
    code: Option<&str>,
) -> Resolution<&'a CategoryConfig> {
    Resolution::lookup(code, |code| tables.category(code))
}

pub fn resolve_category<'a>(
    tables: &'a ReferenceTables,
    code: Option<&str>,
    sector: Option<&str>,
) -> CategoryLookup<'a> {
    let resolution = lookup_category(tables, code);
    let options = match sector.map(str::trim).filter(|sector| !sector.is_empty()) {
        Some(sector) => categories_for_sector(tables, sector),
        None => Vec::new(),
    };

    CategoryLookup {
        resolution,
        options,
    }
}

/// Categories whose own sector tag matches, in declaration order.
pub fn categories_for_sector<'a>(
    tables: &'a ReferenceTables,
    sector: &str,
) -> Vec<&'a CategoryConfig> {
    tables
        .categories
        .iter()
        .filter(|category| category.belongs_to(sector))
        .collect()
}
