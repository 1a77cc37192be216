//! Selection of one inject definition per parameter.
//!
//! Candidates for a `(service, method)` pair are grouped by parameter name
//! and ranked by [`Profiles::priority_score`]. Candidates scoped only to
//! inactive profiles are discarded first; unscoped candidates stay in as
//! the lowest-ranked fallback.

use std::collections::BTreeMap;

use wireplan_common::error::{Result, WireplanError};
use wireplan_definition::inject::InjectDefinition;
use wireplan_definition::profiles::Profiles;
use wireplan_definition::types::Type;

/// Returns the winning inject definition for every parameter of
/// `service::method`, in order of each parameter's first appearance.
///
/// Parameters without an applicable candidate are absent from the result.
///
/// # Errors
///
/// Returns `MultipleInjectOnSameParameter` if two candidates share the
/// highest score for one parameter.
pub fn prioritize_injects<'a>(
    injects: &'a [InjectDefinition],
    profiles: &Profiles,
    service: &Type,
    method: &str,
) -> Result<Vec<&'a InjectDefinition>> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_parameter: BTreeMap<&str, Vec<&InjectDefinition>> = BTreeMap::new();

    for inject in injects {
        if inject.service_type() != service || inject.method_name() != method {
            continue;
        }
        let parameter = inject.parameter_name();
        if !by_parameter.contains_key(parameter) {
            order.push(parameter);
        }
        by_parameter.entry(parameter).or_default().push(inject);
    }

    let mut selected = Vec::with_capacity(order.len());
    for parameter in order {
        let candidates = by_parameter.remove(parameter).unwrap_or_default();
        if let Some(winner) = select(candidates, profiles, service, method, parameter)? {
            selected.push(winner);
        }
    }
    Ok(selected)
}

fn select<'a>(
    candidates: Vec<&'a InjectDefinition>,
    profiles: &Profiles,
    service: &Type,
    method: &str,
    parameter: &str,
) -> Result<Option<&'a InjectDefinition>> {
    let mut by_score: BTreeMap<i32, Vec<&InjectDefinition>> = BTreeMap::new();
    for candidate in candidates {
        if !profiles.is_any_active(candidate.profiles()) {
            continue;
        }
        by_score
            .entry(profiles.priority_score(candidate.profiles()))
            .or_default()
            .push(candidate);
    }

    let Some((score, mut best)) = by_score.pop_last() else {
        return Ok(None);
    };
    if best.len() > 1 {
        return Err(WireplanError::MultipleInjectOnSameParameter {
            service: service.to_string(),
            method: method.to_owned(),
            parameter: parameter.to_owned(),
        });
    }
    tracing::debug!(service = %service, method, parameter, score, "selected inject definition");
    Ok(best.pop())
}
