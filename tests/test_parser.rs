use cooklang_recipe::{parse, parse_bytes, parse_extended, Component, CooklangParser, ParseError};

fn init() {
    let _ = env_logger::try_init();
}

#[test]
fn test_simple_ingredient() {
    init();

    let recipe = parse("Add @flour{500%g}.").unwrap();
    assert_eq!(recipe.steps.len(), 1);

    let ingredients: Vec<_> = recipe.steps[0].ingredients().collect();
    assert_eq!(ingredients.len(), 1);
    assert_eq!(ingredients[0].name, "flour");
    assert_eq!(ingredients[0].quantity, "500");
    assert_eq!(ingredients[0].unit, "g");
    assert!(!ingredients[0].fixed);
    assert!(!ingredients[0].optional);
}

#[test]
fn test_optional_fixed_ingredient() {
    init();

    let recipe = parse("Add @?salt{=1%pinch} to taste.").unwrap();
    let salt = recipe.steps[0].ingredients().next().unwrap();

    assert_eq!(salt.name, "salt");
    assert_eq!(salt.quantity, "1");
    assert_eq!(salt.unit, "pinch");
    assert!(salt.optional);
    assert!(salt.fixed);
}

#[test]
fn test_full_recipe() {
    init();

    let input = r#"---
title: Pancakes
servings: 2
---
Crack @eggs{2} into a #bowl and whisk with @milk{250%ml}.

Heat a #frying pan{} and cook for ~{3%minutes} per side.
Serve with @maple syrup{}(warm).
"#;
    let recipe = parse(input).unwrap();

    assert_eq!(recipe.metadata["title"], "Pancakes");
    assert_eq!(recipe.servings(), Some(2.0));
    assert_eq!(recipe.steps.len(), 2);
    assert_eq!(
        recipe.steps[0].text(),
        "Crack eggs into a bowl and whisk with milk."
    );
    assert_eq!(
        recipe.steps[1].text(),
        "Heat a frying pan and cook for 3 minutes per side. Serve with maple syrup."
    );

    let names: Vec<_> = recipe.ingredients().iter().map(|i| i.name.clone()).collect();
    assert_eq!(names, ["eggs", "milk", "maple syrup"]);

    let syrup = recipe.steps[1].ingredients().next().unwrap();
    assert_eq!(syrup.annotation.as_deref(), Some("warm"));

    let cookware: Vec<_> = recipe.cookware().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(cookware, ["bowl", "frying pan"]);
    assert_eq!(recipe.timers()[0].quantity, "3");
}

#[test]
fn test_components_keep_source_order() {
    init();

    let recipe = parse("Put @butter{10%g} in the #pan and wait ~{1%min}.").unwrap();
    let kinds: Vec<&str> = recipe.steps[0]
        .components
        .iter()
        .map(|c| match c {
            Component::Text { .. } => "text",
            Component::Ingredient(_) => "ingredient",
            Component::Cookware(_) => "cookware",
            Component::Timer(_) => "timer",
            _ => "other",
        })
        .collect();

    assert_eq!(
        kinds,
        ["text", "ingredient", "text", "cookware", "text", "timer", "text"]
    );
}

#[test]
fn test_sections_and_notes() {
    init();

    let input = "= Dough\nMix @flour{200%g}.\n\n> Rest the dough\n> overnight.\n\n=== Filling ===\nChop @apples{3}.";
    let recipe = parse(input).unwrap();

    assert_eq!(recipe.steps.len(), 3);
    assert_eq!(
        recipe.steps[0].components[0],
        Component::Section {
            name: "Dough".to_string()
        }
    );
    assert_eq!(
        recipe.steps[1].components,
        vec![Component::Note {
            value: "Rest the dough overnight.".to_string()
        }]
    );
    assert_eq!(
        recipe.steps[2].components[0],
        Component::Section {
            name: "Filling".to_string()
        }
    );
}

#[test]
fn test_extended_mode_keeps_comments() {
    init();

    let input = "-- prep first\nChop @onion{1}.\n[- optional -]";

    let canonical = parse(input).unwrap();
    assert!(canonical
        .steps
        .iter()
        .flat_map(|s| &s.components)
        .all(|c| !matches!(c, Component::Comment { .. } | Component::BlockComment { .. })));

    let extended = parse_extended(input).unwrap();
    let comments: Vec<_> = extended
        .steps
        .iter()
        .flat_map(|s| &s.components)
        .filter_map(|c| match c {
            Component::Comment { value } | Component::BlockComment { value } => Some(value.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(comments, ["prep first", "optional"]);
}

#[test]
fn test_structural_errors_abort_the_parse() {
    init();

    assert_eq!(
        parse("---\ntitle: x\n").unwrap_err(),
        ParseError::UnterminatedFrontMatter { line: 1 }
    );
    assert!(matches!(
        parse("Add @flour{500").unwrap_err(),
        ParseError::UnterminatedQuantity { line: 1, column: 11 }
    ));
}

#[test]
fn test_parse_bytes() {
    init();

    let recipe = parse_bytes("Add @sugar{2%tbsp}.".as_bytes()).unwrap();
    assert_eq!(recipe.ingredients()[0].name, "sugar");
    assert!(parse_bytes(&[0xc3, 0x28]).is_err());
}

#[test]
fn test_byte_order_mark_is_ignored() {
    init();

    let recipe = CooklangParser::canonical()
        .parse("\u{feff}---\ntitle: Soup\n---\nStir.")
        .unwrap();
    assert_eq!(recipe.metadata["title"], "Soup");
}

#[test]
fn test_recipe_serializes_with_tagged_components() {
    init();

    let recipe = parse("Add @flour{500%g}.").unwrap();
    let json = serde_json::to_value(&recipe).unwrap();

    assert_eq!(json["steps"][0]["components"][1]["type"], "ingredient");
    assert_eq!(json["steps"][0]["components"][1]["name"], "flour");
    assert_eq!(json["steps"][0]["components"][0]["type"], "text");
    assert_eq!(json["steps"][0]["components"][0]["value"], "Add ");
}
