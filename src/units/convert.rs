use log::debug;

use super::{resolve_unit, table, UnitSystem};
use crate::error::ConversionError;
use crate::model::{Ingredient, IngredientList};
use crate::quantity::Quantity;

/// Converts an ingredient into `target`.
///
/// Fails when the ingredient has no unit, no numeric quantity, or a unit of a
/// different dimension than `target`.
pub fn convert_to(ingredient: &Ingredient, target: &str) -> Result<Ingredient, ConversionError> {
    let Some(from) = &ingredient.typed_unit else {
        return Err(ConversionError::MissingUnit {
            name: ingredient.name.clone(),
        });
    };

    let value = match &ingredient.quantity {
        Quantity::Known(value) => *value,
        Quantity::Unspecified => {
            return Err(ConversionError::UnspecifiedQuantity {
                name: ingredient.name.clone(),
            })
        }
        Quantity::Literal(text) => {
            return Err(ConversionError::NonNumericQuantity {
                name: ingredient.name.clone(),
                quantity: text.clone(),
            })
        }
    };

    let incompatible = || ConversionError::IncompatibleUnits {
        from: from.name.clone(),
        to: target.trim().to_string(),
    };
    let to = resolve_unit(target).ok_or_else(incompatible)?;
    let converted = from.convert(value, &to).ok_or_else(incompatible)?;

    Ok(ingredient.with_amount(converted, to))
}

/// Converts an ingredient into the idiomatic unit of `system`.
///
/// The quantity is first converted to the system's canonical unit for its
/// dimension, then to the unit whose magnitude bucket it falls into. Anything
/// that cannot be converted comes back as an unchanged copy.
pub fn convert_to_system(ingredient: &Ingredient, system: UnitSystem) -> Ingredient {
    let Some(unit) = &ingredient.typed_unit else {
        return ingredient.clone();
    };
    let Some(units) = table::system_units(system, unit.dimension) else {
        return ingredient.clone();
    };

    let canonical = match convert_to(ingredient, units.canonical) {
        Ok(converted) => converted,
        Err(err) => {
            debug!("Keeping '{}' unconverted: {}", ingredient.name, err);
            return ingredient.clone();
        }
    };

    let Some(magnitude) = canonical.quantity.value() else {
        return canonical;
    };
    match units.bucket_for(magnitude) {
        Some(symbol) if symbol != units.canonical => {
            convert_to(&canonical, symbol).unwrap_or(canonical)
        }
        _ => canonical,
    }
}

/// Merges ingredients sharing a name, summing quantities that can be
/// expressed in one unit.
///
/// The unifying unit of a group is `target_unit` when given, otherwise the
/// unit of the first member that has one. Unspecified and non-numeric
/// quantities, and members that cannot be converted, stay separate entries in
/// first-seen order after the summed entry.
pub fn consolidate_by_name(list: &IngredientList, target_unit: Option<&str>) -> IngredientList {
    let mut consolidated = Vec::with_capacity(list.len());

    for (name, group) in list.group_by_name() {
        if let [single] = group.as_slice() {
            consolidated.push((*single).clone());
            continue;
        }
        let merged = consolidate_group(&group, target_unit);
        debug!(
            "Consolidated {} entries of '{}' into {}",
            group.len(),
            name,
            merged.len()
        );
        consolidated.extend(merged);
    }

    IngredientList::from(consolidated)
}

fn consolidate_group(group: &[&Ingredient], target_unit: Option<&str>) -> Vec<Ingredient> {
    let has_unit = |ingredient: &Ingredient| !ingredient.unit.trim().is_empty();
    let group_has_unit = group.iter().any(|member| has_unit(member));
    let unifying = target_unit
        .map(str::trim)
        .filter(|unit| !unit.is_empty())
        .or_else(|| {
            group
                .iter()
                .find(|member| has_unit(member))
                .map(|member| member.unit.trim())
        });

    let mut total: Option<(f64, &Ingredient)> = None;
    let mut leftovers = Vec::new();

    for &member in group {
        let addend = match (&member.quantity, unifying) {
            (Quantity::Known(value), _) if !has_unit(member) => (!group_has_unit).then_some(*value),
            (Quantity::Known(value), Some(unit)) if member.unit.trim() == unit => Some(*value),
            (Quantity::Known(_), Some(unit)) => convert_to(member, unit)
                .ok()
                .and_then(|converted| converted.quantity.value()),
            _ => None,
        };

        match addend {
            Some(value) => {
                let (sum, _) = total.get_or_insert((0.0, member));
                *sum += value;
            }
            None => leftovers.push(member.clone()),
        }
    }

    let mut merged = Vec::with_capacity(leftovers.len() + 1);
    if let Some((sum, template)) = total {
        let unit = if group_has_unit { unifying.unwrap_or("") } else { "" };
        merged.push(Ingredient {
            quantity: Quantity::Known(sum),
            unit: unit.to_string(),
            typed_unit: resolve_unit(unit),
            ..template.clone()
        });
    }
    merged.extend(leftovers);
    merged
}
