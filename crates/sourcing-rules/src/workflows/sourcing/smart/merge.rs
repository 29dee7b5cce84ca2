use std::borrow::Cow;

use tracing::debug;

use super::explain::{Explanations, Origin};
use super::{ApprovalGuidance, SmartRecommendation};
use crate::workflows::sourcing::catalog;
use crate::workflows::sourcing::domain::{
    AuctionPolicy, CategoryConfig, EventTypeCode, EventTypeConfig, FieldId, FieldSet,
    SectorConfig, Selection, WeightSplit,
};
use crate::workflows::sourcing::resolvers::{
    lookup_category, resolve_client, resolve_department, resolve_sector, ClientPolicyView,
    DepartmentView, Resolution,
};
use crate::workflows::sourcing::tables::ReferenceTables;

/// Merges sector, category, client and department configuration into one
/// recommendation.
///
/// Returns `None` when no known sector is selected. Values follow precedence
/// (client over category over sector); the audit trail and alerts follow the
/// order in which each step ran.
pub fn aggregate(tables: &ReferenceTables, selection: &Selection) -> Option<SmartRecommendation> {
    let selection = selection.normalized();

    let sector = match resolve_sector(tables, selection.sector.as_deref()) {
        Resolution::Found(sector) => sector,
        Resolution::NotSelected => {
            debug!("no sector selected; recommendation withheld");
            return None;
        }
        Resolution::Unknown(code) => {
            debug!(%code, "sector code not in reference tables; recommendation withheld");
            return None;
        }
    };

    let category = lookup_category(tables, selection.category.as_deref()).found();
    let client = resolve_client(tables, selection.client.as_deref()).found();
    let department = resolve_department(tables, selection.department.as_deref()).found();

    let mut trail = Explanations::default();

    if let Some(category) = category {
        if category
            .sector
            .as_ref()
            .map(|owner| owner != &sector.code)
            .unwrap_or(false)
        {
            trail.category_outside_sector(category, sector);
        }
    }

    let event_type = resolve_event_type(sector, category, client.as_ref(), &mut trail);
    let event = tables
        .event_type(event_type)
        .map(Cow::Borrowed)
        .unwrap_or_else(|| Cow::Owned(catalog::event_type_defaults(event_type)));

    let (auction_allowed, auction_policy) =
        resolve_auction(&event, sector, category, client.as_ref(), &mut trail);
    let weights = resolve_weights(&event, sector, category, client.as_ref(), &mut trail);

    let required_fields = merge_required(&event, sector, category, client.as_ref(), &mut trail);
    let hidden_fields = sector.hidden_fields.clone();
    trail.hidden_fields(sector, &hidden_fields.iter().copied().collect::<Vec<_>>());
    for field in required_fields.intersection(&hidden_fields) {
        trail.required_but_hidden(sector, *field);
    }

    let (blocked_fields, field_locks, suggestions) = match client.as_ref() {
        Some(client) => {
            let blocked = client.blocked_fields();
            trail.blocked_fields(client, &blocked);
            (
                blocked.into_iter().collect::<FieldSet>(),
                client.field_locks(),
                client.suggestions(),
            )
        }
        None => (FieldSet::new(), Vec::new(), Vec::new()),
    };

    let (evaluation_criteria, validations) = match category {
        Some(category) => {
            trail.category_criteria(category);
            (
                category.evaluation_criteria.clone(),
                category.validations.clone(),
            )
        }
        None => (Vec::new(), Vec::new()),
    };

    let response_days = resolve_deadline(
        &event,
        category,
        client.as_ref(),
        department.as_ref(),
        &mut trail,
    );

    let approval = department.as_ref().map(|department| {
        apply_department(department, sector, category, &mut trail);
        let template = department.template();
        ApprovalGuidance {
            department: template.code.clone(),
            approval_threshold: template.approval_threshold,
            multiple_quotes_required: template.multiple_quotes_required,
        }
    });

    let (applied_rules, alerts) = trail.into_parts();

    debug!(
        sector = %sector.code,
        event_type = %event_type,
        applied = applied_rules.len(),
        alerts = alerts.len(),
        "recommendation composed"
    );

    Some(SmartRecommendation {
        event_type,
        event_focus: event.focus.clone(),
        evaluation_mode: event.evaluation_mode,
        price_structure: event.price_structure,
        comparison_enabled: event.comparison,
        acquisition_nature: sector.acquisition_nature,
        auction_allowed,
        auction_policy,
        weights,
        response_days,
        required_fields,
        hidden_fields,
        blocked_fields,
        field_locks,
        suggestions,
        evaluation_criteria,
        validations,
        approval,
        applied_rules,
        alerts,
    })
}

fn resolve_event_type(
    sector: &SectorConfig,
    category: Option<&CategoryConfig>,
    client: Option<&ClientPolicyView<'_>>,
    trail: &mut Explanations,
) -> EventTypeCode {
    let mut current = sector.suggested_event_type;
    trail.sector_event_type(sector);

    let client_lock = client.and_then(|client| client.locked_event_type());

    if client_lock.is_none() {
        if let Some((category, suggested)) = category
            .and_then(|category| category.suggested_event_type.map(|code| (category, code)))
        {
            trail.category_event_type(category, current, suggested);
            current = suggested;
        }
    }

    if let (Some(client), Some(locked)) = (client, client_lock) {
        trail.client_event_type(client, current, locked);
        current = locked;
    }

    current
}

fn resolve_auction(
    event: &EventTypeConfig,
    sector: &SectorConfig,
    category: Option<&CategoryConfig>,
    client: Option<&ClientPolicyView<'_>>,
    trail: &mut Explanations,
) -> (bool, AuctionPolicy) {
    let category_override = category.and_then(|category| {
        category
            .auction_override
            .map(|policy| (category, policy))
    });

    let allowed = match client {
        Some(client) if client.prohibits_auction() => {
            trail.client_prohibits_auction(client);
            false
        }
        _ if sector.auction_policy == AuctionPolicy::Desabilitado => {
            trail.sector_disables_auction(sector);
            false
        }
        _ => match category_override {
            Some((category, AuctionPolicy::Desabilitado)) => {
                trail.category_disables_auction(category);
                false
            }
            _ => event.allows_auction,
        },
    };

    if !allowed {
        return (false, AuctionPolicy::Desabilitado);
    }

    let policy = match category_override {
        Some((category, policy)) if policy != sector.auction_policy => {
            trail.category_auction_timing(category, policy);
            policy
        }
        _ => sector.auction_policy,
    };

    (true, policy)
}

fn resolve_weights(
    event: &EventTypeConfig,
    sector: &SectorConfig,
    category: Option<&CategoryConfig>,
    client: Option<&ClientPolicyView<'_>>,
    trail: &mut Explanations,
) -> WeightSplit {
    let mut weights = WeightSplit::with_technical(event.default_weights.technical);

    let category_weights =
        category.and_then(|category| category.weights.map(|split| (category, split)));
    if let Some((category, suggested)) = category_weights {
        weights = WeightSplit::with_technical(suggested.technical);
        trail.category_weights(category, weights);
    } else if let Some(floor) = sector
        .default_weights
        .filter(|floor| floor.technical > weights.technical)
    {
        weights = WeightSplit::with_technical(floor.technical);
        trail.sector_weight_floor(sector, weights);
    }

    if let Some(client) = client {
        if let Some(minimum) = client.min_technical_weight() {
            if minimum > weights.technical {
                let previous = weights;
                weights = WeightSplit::with_technical(minimum);
                trail.client_weight_floor(client, previous, weights);
            }
        }
    }

    weights
}

fn merge_required(
    event: &EventTypeConfig,
    sector: &SectorConfig,
    category: Option<&CategoryConfig>,
    client: Option<&ClientPolicyView<'_>>,
    trail: &mut Explanations,
) -> FieldSet {
    let mut required: FieldSet = event.required_fields.clone();

    let added = absorb(&mut required, sector.required_fields.iter().copied());
    trail.required_fields(Origin::Sector, &format!("Sector {}", sector.name), &added);

    if let Some(category) = category {
        let added = absorb(&mut required, category.required_fields.iter().copied());
        trail.required_fields(
            Origin::Category,
            &format!("Category {}", category.name),
            &added,
        );
    }

    if let Some(client) = client {
        let added = absorb(&mut required, client.required_fields());
        trail.required_fields(Origin::Client, &format!("Client {}", client.name()), &added);
    }

    required
}

/// Inserts `fields`, returning only the ones that were new.
fn absorb(required: &mut FieldSet, fields: impl IntoIterator<Item = FieldId>) -> Vec<FieldId> {
    fields
        .into_iter()
        .filter(|field| required.insert(*field))
        .collect()
}

fn resolve_deadline(
    event: &EventTypeConfig,
    category: Option<&CategoryConfig>,
    client: Option<&ClientPolicyView<'_>>,
    department: Option<&DepartmentView<'_>>,
    trail: &mut Explanations,
) -> u32 {
    let mut days = event.default_response_days;

    if let Some(department) = department {
        if let Some(base) = department.template().defaults.response_days {
            days = base;
            trail.department_deadline(department, base);
        }
    }

    if let Some(category) = category {
        // Inverted windows settle on the maximum instead of panicking.
        let clamped = days
            .max(category.min_response_days)
            .min(category.max_response_days);
        if clamped != days {
            trail.category_deadline(category, days, clamped);
            days = clamped;
        }
    }

    if let Some(client) = client {
        if let Some(minimum) = client.min_response_days() {
            if minimum > days {
                trail.client_deadline(client, days, minimum);
                days = minimum;
            }
        }
    }

    days
}

fn apply_department(
    department: &DepartmentView<'_>,
    sector: &SectorConfig,
    category: Option<&CategoryConfig>,
    trail: &mut Explanations,
) {
    trail.department_approval(department);

    if !department.allows_sector(sector.code.as_str()) {
        trail.outside_mandate(department, "Sector", sector.code.as_str());
    }
    if let Some(category) = category {
        if !department.allows_category(category.code.as_str()) {
            trail.outside_mandate(department, "Category", category.code.as_str());
        }
    }
}
