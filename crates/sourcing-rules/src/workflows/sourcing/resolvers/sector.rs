use super::Resolution;
use crate::workflows::sourcing::domain::SectorConfig;
use crate::workflows::sourcing::tables::ReferenceTables;

pub fn resolve_sector<'a>(
    tables: &'a ReferenceTables,
    code: Option<&str>,
) -> Resolution<&'a SectorConfig> {
    Resolution::lookup(code, |code| tables.sector(code))
}
