use cooklang_recipe::{
    parse, parse_extended, CooklangConfig, CooklangParser, ParserConfig, UnitSystem, UnitsConfig,
};

fn init() {
    let _ = env_logger::try_init();
}

#[test]
fn test_lonely_sigils_are_plain_text() {
    init();

    let recipe = parse("Email me @ home, use # 2 and ~ 5 minutes.").unwrap();
    assert!(recipe.ingredients().is_empty());
    assert!(recipe.cookware().is_empty());
    assert!(recipe.timers().is_empty());
    assert_eq!(
        recipe.steps[0].text(),
        "Email me @ home, use # 2 and ~ 5 minutes."
    );
}

#[test]
fn test_sigil_before_unicode_number_is_text() {
    init();

    let recipe = parse("Add @½ cup of milk and #² more.").unwrap();
    assert!(recipe.ingredients().is_empty());
    assert!(recipe.cookware().is_empty());
    assert_eq!(recipe.steps[0].text(), "Add @½ cup of milk and #² more.");
}

#[test]
fn test_hyphenated_words_are_not_comments() {
    init();

    let recipe = parse("Use a half--baked crust.").unwrap();
    assert_eq!(recipe.steps[0].text(), "Use a half--baked crust.");
}

#[test]
fn test_bare_ingredient_stops_at_dash() {
    init();

    let recipe = parse("Add @sun-dried tomatoes.").unwrap();
    assert_eq!(recipe.ingredients()[0].name, "sun");
    assert_eq!(recipe.steps[0].text(), "Add sun-dried tomatoes.");
}

#[test]
fn test_braced_name_with_dash_and_digits() {
    init();

    let recipe = parse("Add @sun-dried tomatoes{3%pieces} and @7up{1%can}.").unwrap();
    let ingredients = recipe.ingredients();
    assert_eq!(ingredients[0].name, "sun-dried tomatoes");
    assert_eq!(ingredients[1].name, "7up");
}

#[test]
fn test_unclosed_annotation_is_text() {
    init();

    let recipe = parse("Add @salt{1%tsp}(to taste\nand stir.").unwrap();
    assert_eq!(recipe.ingredients()[0].annotation, None);
    assert_eq!(recipe.steps[0].text(), "Add salt(to taste and stir.");
}

#[test]
fn test_only_whitespace_lines_split_steps() {
    init();

    let recipe = parse("\n\nMix.\n \t \nBake.\n\n\n").unwrap();
    assert_eq!(recipe.steps.len(), 2);
}

#[test]
fn test_empty_input() {
    init();

    let recipe = parse("").unwrap();
    assert!(recipe.steps.is_empty());
    assert!(recipe.metadata.is_empty());
}

#[test]
fn test_unterminated_block_comment_runs_to_end() {
    init();

    let recipe = parse_extended("Mix. [- never closed\nBake.").unwrap();
    assert_eq!(recipe.steps.len(), 2);
    assert_eq!(recipe.steps[0].text(), "Mix.");
}

#[test]
fn test_scaling_a_parsed_recipe() {
    init();

    let recipe = parse(
        ">> servings: 2\nMix @flour{250%g}, @salt{=1%pinch} and @eggs{2}.\nAdd @pepper{}.",
    )
    .unwrap();
    let scaled = recipe.scale_to_servings(3.0);
    let ingredients = scaled.ingredients();

    assert_eq!(ingredients[0].quantity.to_string(), "375");
    assert_eq!(ingredients[1].quantity.to_string(), "1");
    assert_eq!(ingredients[2].quantity.to_string(), "3");
    assert_eq!(ingredients[3].quantity.to_string(), "some");
    assert_eq!(scaled.metadata["servings"], "3");
}

#[test]
fn test_converting_a_parsed_recipe() {
    init();

    let recipe = parse("Heat @oil{2%cups} to @temperature{180%°C}.").unwrap();
    let converted = recipe.convert_to_system(UnitSystem::Us);
    let ingredients = converted.ingredients();

    assert_eq!(ingredients[0].unit, "cup");
    assert_eq!(ingredients[1].unit, "°F");
    assert_eq!(ingredients[1].quantity.to_string(), "356");
}

#[test]
fn test_parser_from_config() {
    init();

    let config = CooklangConfig {
        parser: ParserConfig { extended: true },
        ..CooklangConfig::default()
    };
    let parser = CooklangParser::from_config(&config);
    assert!(parser.config().extended);

    let recipe = parser.parse("Rest ~long nap{2%hours}.").unwrap();
    assert_eq!(recipe.timers()[0].name, "long nap");
}

#[test]
fn test_parser_from_env() {
    init();

    let parser = CooklangParser::from_env().unwrap();
    assert!(parser.parse("Mix @flour{100%g}.").is_ok());
}

#[test]
fn test_configured_unit_system() {
    init();

    let units = UnitsConfig {
        system: UnitSystem::Us,
        ..UnitsConfig::default()
    };
    let recipe = parse("Pour @milk{2%cups} and @rum{45%ml}.").unwrap();

    let converted = recipe.convert_to_default_system(&units);
    assert_eq!(converted.ingredients()[0].unit, "cup");

    let metric = recipe.convert_to_default_system(&UnitsConfig::default());
    assert_eq!(metric.ingredients()[0].unit, "ml");

    let ingredients = recipe.ingredients();
    let amounts = ingredients.bartender_amounts_with(&units);
    assert_eq!(amounts[1].1.as_ref().map(|a| a.to_string()).as_deref(), Some("1 1/2 oz"));
}

#[test]
fn test_long_single_line() {
    init();

    let input = "stir @salt{1%g} well and ".repeat(20_000);
    let recipe = parse(&input).unwrap();

    assert_eq!(recipe.steps.len(), 1);
    assert_eq!(recipe.ingredients().len(), 20_000);
    assert_eq!(recipe.steps[0].text().len(), input.trim().len() - 20_000 * "@{1%g}".len());
}
