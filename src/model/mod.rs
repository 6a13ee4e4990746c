mod ingredient;

pub use ingredient::{Ingredient, IngredientList};

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::config::UnitsConfig;
use crate::quantity::{format_number, Quantity};
use crate::units::UnitSystem;

/// Front matter and `>>` metadata, keyed by name
pub type Metadata = BTreeMap<String, String>;

/// Metadata key holding the number of servings
pub const SERVINGS_KEY: &str = "servings";

/// An ingredient, cookware or timer reference as written in the recipe.
///
/// The quantity stays textual here: a number, an evaluated fraction, `"some"`
/// or whatever free text the author used.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Item {
    pub name: String,
    pub quantity: String,
    pub unit: String,
    pub annotation: Option<String>,
    pub fixed: bool,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    Text { value: String },
    Ingredient(Item),
    Cookware(Item),
    Timer(Item),
    Section { name: String },
    Note { value: String },
    Comment { value: String },
    BlockComment { value: String },
}

impl Component {
    pub fn text(value: impl Into<String>) -> Self {
        Component::Text {
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Step {
    pub components: Vec<Component>,
}

impl Step {
    pub fn push(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Joins adjacent text components and trims the step's outer whitespace
    pub(crate) fn normalize(&mut self) {
        let mut merged: Vec<Component> = Vec::with_capacity(self.components.len());
        for component in self.components.drain(..) {
            if let (Some(Component::Text { value: last }), Component::Text { value }) =
                (merged.last_mut(), &component)
            {
                last.push_str(value);
                continue;
            }
            merged.push(component);
        }

        if let Some(Component::Text { value }) = merged.first_mut() {
            *value = value.trim_start().to_string();
        }
        if let Some(Component::Text { value }) = merged.last_mut() {
            *value = value.trim_end().to_string();
        }
        merged.retain(|c| !matches!(c, Component::Text { value } if value.is_empty()));

        self.components = merged;
    }

    /// The step as plain text with references rendered by name
    pub fn text(&self) -> String {
        let mut text = String::new();
        for component in &self.components {
            match component {
                Component::Text { value } | Component::Note { value } => text.push_str(value),
                Component::Ingredient(item) | Component::Cookware(item) => {
                    text.push_str(&item.name)
                }
                Component::Timer(item) if item.name.is_empty() => {
                    text.push_str(format!("{} {}", item.quantity, item.unit).trim())
                }
                Component::Timer(item) => text.push_str(&item.name),
                Component::Section { name } => text.push_str(name),
                Component::Comment { .. } | Component::BlockComment { .. } => {}
            }
        }
        text
    }

    pub fn ingredients(&self) -> impl Iterator<Item = &Item> {
        self.components.iter().filter_map(|c| match c {
            Component::Ingredient(item) => Some(item),
            _ => None,
        })
    }

    pub fn cookware(&self) -> impl Iterator<Item = &Item> {
        self.components.iter().filter_map(|c| match c {
            Component::Cookware(item) => Some(item),
            _ => None,
        })
    }

    pub fn timers(&self) -> impl Iterator<Item = &Item> {
        self.components.iter().filter_map(|c| match c {
            Component::Timer(item) => Some(item),
            _ => None,
        })
    }

    fn ingredients_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.components.iter_mut().filter_map(|c| match c {
            Component::Ingredient(item) => Some(item),
            _ => None,
        })
    }
}

/// A parsed recipe. Transformations return new recipes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Recipe {
    pub metadata: Metadata,
    pub steps: Vec<Step>,
}

impl Recipe {
    /// Every ingredient reference in step order, duplicates included
    pub fn ingredients(&self) -> IngredientList {
        self.steps
            .iter()
            .flat_map(Step::ingredients)
            .map(Ingredient::from_item)
            .collect()
    }

    pub fn cookware(&self) -> Vec<&Item> {
        self.steps.iter().flat_map(Step::cookware).collect()
    }

    pub fn timers(&self) -> Vec<&Item> {
        self.steps.iter().flat_map(Step::timers).collect()
    }

    /// Leading number of the `servings` metadata, so `"4 people"` gives 4
    pub fn servings(&self) -> Option<f64> {
        let value = self.metadata.get(SERVINGS_KEY)?.trim();
        let end = value
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(value.len());
        value[..end].parse().ok().filter(|n: &f64| *n > 0.0)
    }

    /// Multiplies every numeric quantity that is not fixed
    pub fn scale(&self, factor: f64) -> Recipe {
        let mut scaled = self.clone();
        for item in scaled.steps.iter_mut().flat_map(Step::ingredients_mut) {
            if item.fixed {
                continue;
            }
            if let Quantity::Known(value) = Quantity::parse(&item.quantity) {
                item.quantity = format_number(value * factor);
            }
        }
        debug!("Scaled recipe by {}", factor);
        scaled
    }

    /// Scales to `servings`; a recipe without known servings keeps its quantities
    pub fn scale_to_servings(&self, servings: f64) -> Recipe {
        let factor = self.servings().map_or(1.0, |current| servings / current);
        let mut scaled = self.scale(factor);
        scaled
            .metadata
            .insert(SERVINGS_KEY.to_string(), format_number(servings));
        scaled
    }

    /// Converts every ingredient reference into the idiomatic unit of `system`
    pub fn convert_to_system(&self, system: UnitSystem) -> Recipe {
        let mut converted = self.clone();
        for item in converted.steps.iter_mut().flat_map(Step::ingredients_mut) {
            let ingredient = Ingredient::from_item(item).convert_to_system(system);
            if let Quantity::Known(value) = ingredient.quantity {
                item.quantity = format_number(value);
                item.unit = ingredient.unit;
            }
        }
        converted
    }

    /// Converts into the system named in the configuration
    pub fn convert_to_default_system(&self, config: &UnitsConfig) -> Recipe {
        self.convert_to_system(config.system)
    }
}
