use std::collections::HashMap;
use std::ops::Index;

use serde::Serialize;

use super::Item;
use crate::config::UnitsConfig;
use crate::error::ConversionError;
use crate::quantity::Quantity;
use crate::units::{
    self, resolve_unit, select_best_unit_with, Dimension, SmartAmount, TypedUnit, UnitSystem,
};

/// An ingredient with a numeric quantity and a resolved unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: Quantity,
    pub unit: String,
    pub typed_unit: Option<TypedUnit>,
    /// Does not scale with servings
    pub fixed: bool,
    pub optional: bool,
    pub annotation: Option<String>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: Quantity, unit: &str) -> Self {
        let unit = unit.trim();
        Self {
            name: name.into(),
            quantity,
            unit: unit.to_string(),
            typed_unit: resolve_unit(unit),
            fixed: false,
            optional: false,
            annotation: None,
        }
    }

    /// Builds an ingredient from a parsed `@name{...}` component
    pub fn from_item(item: &Item) -> Self {
        Self {
            fixed: item.fixed,
            optional: item.optional,
            annotation: item.annotation.clone(),
            ..Self::new(item.name.clone(), Quantity::parse(&item.quantity), &item.unit)
        }
    }

    pub fn dimension(&self) -> Option<Dimension> {
        self.typed_unit.as_ref().map(|unit| unit.dimension)
    }

    /// Copy of this ingredient with a new numeric amount
    pub fn with_amount(&self, value: f64, unit: TypedUnit) -> Self {
        Self {
            quantity: Quantity::Known(value),
            unit: unit.name.clone(),
            typed_unit: Some(unit),
            ..self.clone()
        }
    }

    pub fn convert_to(&self, target: &str) -> Result<Ingredient, ConversionError> {
        units::convert_to(self, target)
    }

    pub fn convert_to_system(&self, system: UnitSystem) -> Ingredient {
        units::convert_to_system(self, system)
    }

    /// Bartender-style amount for volume ingredients
    pub fn bartender_amount(&self, system: UnitSystem) -> Option<SmartAmount> {
        self.bartender_amount_with(&UnitsConfig {
            system,
            ..UnitsConfig::default()
        })
    }

    /// Bartender amount in the configured system, using its tolerances
    pub fn bartender_amount_with(&self, config: &UnitsConfig) -> Option<SmartAmount> {
        if self.dimension() != Some(Dimension::Volume) {
            return None;
        }
        let ml = self.convert_to("ml").ok()?.quantity.value()?;
        Some(select_best_unit_with(ml, config.system, config))
    }
}

/// Ordered ingredients, duplicates allowed
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct IngredientList(Vec<Ingredient>);

impl IngredientList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ingredient: Ingredient) {
        self.0.push(ingredient);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ingredient> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Ingredient] {
        &self.0
    }

    /// Groups by exact name, keeping the order names are first seen
    pub fn group_by_name(&self) -> Vec<(String, Vec<&Ingredient>)> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(String, Vec<&Ingredient>)> = Vec::new();

        for ingredient in &self.0 {
            match index.get(ingredient.name.as_str()) {
                Some(&i) => groups[i].1.push(ingredient),
                None => {
                    index.insert(&ingredient.name, groups.len());
                    groups.push((ingredient.name.clone(), vec![ingredient]));
                }
            }
        }
        groups
    }

    /// See [`units::consolidate_by_name`]
    pub fn consolidate(&self, target_unit: Option<&str>) -> IngredientList {
        units::consolidate_by_name(self, target_unit)
    }

    pub fn convert_to_system(&self, system: UnitSystem) -> IngredientList {
        self.iter().map(|i| i.convert_to_system(system)).collect()
    }

    /// Pairs each ingredient with its bartender amount, if it has one
    pub fn bartender_amounts(&self, system: UnitSystem) -> Vec<(&Ingredient, Option<SmartAmount>)> {
        self.iter()
            .map(|ingredient| (ingredient, ingredient.bartender_amount(system)))
            .collect()
    }

    pub fn bartender_amounts_with(
        &self,
        config: &UnitsConfig,
    ) -> Vec<(&Ingredient, Option<SmartAmount>)> {
        self.iter()
            .map(|ingredient| (ingredient, ingredient.bartender_amount_with(config)))
            .collect()
    }

    pub fn into_vec(self) -> Vec<Ingredient> {
        self.0
    }
}

impl From<Vec<Ingredient>> for IngredientList {
    fn from(ingredients: Vec<Ingredient>) -> Self {
        Self(ingredients)
    }
}

impl FromIterator<Ingredient> for IngredientList {
    fn from_iter<I: IntoIterator<Item = Ingredient>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for IngredientList {
    type Item = Ingredient;
    type IntoIter = std::vec::IntoIter<Ingredient>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a IngredientList {
    type Item = &'a Ingredient;
    type IntoIter = std::slice::Iter<'a, Ingredient>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Index<usize> for IngredientList {
    type Output = Ingredient;

    fn index(&self, index: usize) -> &Ingredient {
        &self.0[index]
    }
}
