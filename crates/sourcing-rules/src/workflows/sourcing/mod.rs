//! Sourcing rules resolution: merges sector, category, client and department
//! reference data into a single recommendation for the sourcing event form.
//!
//! Resolvers look codes up independently; the smart aggregator applies the
//! precedence rules and records why each value was chosen.

pub mod catalog;
pub mod domain;
pub mod import;
mod memo;
pub mod resolvers;
pub mod router;
pub mod smart;
pub mod source;
pub mod tables;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    AcquisitionNature, AuctionPolicy, CategoryCode, CategoryConfig, ClientCode, ClientPolicy,
    ClientRule, DepartmentCode, DepartmentDefaults, DepartmentTemplate, EvaluationMode,
    EventTypeCode, EventTypeConfig, FieldId, FieldSet, FieldValue, FieldValueKind,
    FixedConfiguration, PriceStructure, RuleAction, SectorCode, SectorConfig, Selection,
    WeightSplit,
};
pub use import::ImportError;
pub use memo::{RecommendationCache, DEFAULT_CACHE_CAPACITY};
pub use router::sourcing_router;
pub use smart::{
    aggregate, Alert, AppliedRule, ApprovalGuidance, Aspect, Origin, Severity,
    SmartRecommendation, SmartRulesEngine,
};
pub use source::{LoadedRuleSource, RuleSnapshot, RuleSource, RuleSourceKind, StaticRuleSource};
pub use tables::ReferenceTables;
pub use validation::{validate_tables, TableIssue};
