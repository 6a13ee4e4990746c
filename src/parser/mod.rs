//! Recipe parser.
//!
//! Pulls tokens from the [`Lexer`] and builds a [`Recipe`] step by step. Name
//! scanning is greedy: tokens are collected until the parser knows what it is
//! looking at, and whatever turns out not to belong to the name is pushed back
//! to the lexer to be parsed again.

use log::{debug, warn};

use crate::config::{load_config, CooklangConfig, ParserConfig};
use crate::error::{ParseError, Result as CooklangResult};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::metadata::parse_front_matter;
use crate::model::{Component, Item, Metadata, Recipe, Step};
use crate::quantity::{evaluate_fraction, SOME};

/// Default quantity for cookware without an explicit amount
const DEFAULT_COOKWARE_QUANTITY: &str = "1";

/// Reusable parser configured for canonical or extended syntax
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CooklangParser {
    config: ParserConfig,
}

impl CooklangParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Drops comments, timer names are single words
    pub fn canonical() -> Self {
        Self::new(ParserConfig { extended: false })
    }

    /// Keeps comments, allows multi-word timer names
    pub fn extended() -> Self {
        Self::new(ParserConfig { extended: true })
    }

    pub fn from_config(config: &CooklangConfig) -> Self {
        Self::new(config.parser)
    }

    /// Parser configured from `cooklang.toml` and `COOKLANG__*` variables
    pub fn from_env() -> CooklangResult<Self> {
        let config = load_config()?;
        Ok(Self::from_config(&config))
    }

    pub fn config(&self) -> ParserConfig {
        self.config
    }

    /// Parses a whole recipe. Either the full recipe or the first structural
    /// error is returned.
    pub fn parse(&self, input: &str) -> Result<Recipe, ParseError> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        Parser::new(input, self.config).parse()
    }

    pub fn parse_bytes(&self, input: &[u8]) -> Result<Recipe, ParseError> {
        self.parse(std::str::from_utf8(input)?)
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    config: ParserConfig,
    metadata: Metadata,
    steps: Vec<Step>,
    current: Step,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, config: ParserConfig) -> Self {
        Self {
            lexer: Lexer::new(input),
            config,
            metadata: Metadata::new(),
            steps: Vec::new(),
            current: Step::default(),
        }
    }

    fn parse(mut self) -> Result<Recipe, ParseError> {
        loop {
            let token = self.lexer.next_token()?;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Newline => self.newline()?,
                TokenKind::FrontMatter => {
                    let front_matter = parse_front_matter(&token.literal);
                    self.metadata.extend(front_matter);
                }
                TokenKind::Metadata => self.metadata_directive(&token.literal),
                TokenKind::At => {
                    let item = self.ingredient()?;
                    self.current.push(Component::Ingredient(item));
                }
                TokenKind::Hash => {
                    let item = self.cookware()?;
                    self.current.push(Component::Cookware(item));
                }
                TokenKind::Tilde => {
                    let item = self.timer()?;
                    self.current.push(Component::Timer(item));
                }
                TokenKind::Section => {
                    self.flush();
                    self.current.push(Component::Section {
                        name: token.literal,
                    });
                }
                TokenKind::Note => {
                    self.flush();
                    self.current.push(Component::Note {
                        value: token.literal,
                    });
                    self.flush();
                }
                TokenKind::Comment => {
                    if self.config.extended {
                        self.flush();
                        self.current.push(Component::Comment {
                            value: token.literal,
                        });
                    }
                    // The comment swallowed its line break
                    self.newline()?;
                }
                TokenKind::BlockComment => {
                    if self.config.extended {
                        self.flush();
                        self.current.push(Component::BlockComment {
                            value: token.literal,
                        });
                    } else {
                        self.collapse_whitespace()?;
                    }
                }
                _ => self.current.push(Component::text(token.literal)),
            }
        }
        self.flush();

        debug!(
            "Parsed recipe with {} metadata keys and {} steps",
            self.metadata.len(),
            self.steps.len()
        );
        Ok(Recipe {
            metadata: self.metadata,
            steps: self.steps,
        })
    }

    /// Ends the current step if it has any content
    fn flush(&mut self) {
        let mut step = std::mem::take(&mut self.current);
        step.normalize();
        if !step.is_empty() {
            self.steps.push(step);
        }
    }

    /// Handles the end of a line. A blank line ends the step, a single line
    /// break becomes a space.
    fn newline(&mut self) -> Result<(), ParseError> {
        let next = self.skip_whitespace()?;
        match next.kind {
            TokenKind::Newline => {
                self.flush();
                loop {
                    let token = self.skip_whitespace()?;
                    if !token.is(TokenKind::Newline) {
                        self.lexer.unread(token);
                        break;
                    }
                }
            }
            TokenKind::Eof => self.lexer.unread(next),
            _ => {
                if self.needs_separator() {
                    self.current.push(Component::text(" "));
                }
                self.lexer.unread(next);
            }
        }
        Ok(())
    }

    fn skip_whitespace(&mut self) -> Result<Token, ParseError> {
        loop {
            let token = self.lexer.next_token()?;
            if !token.is(TokenKind::Whitespace) {
                return Ok(token);
            }
        }
    }

    /// Drops the whitespace after a removed block comment when the text before
    /// it already ends in whitespace
    fn collapse_whitespace(&mut self) -> Result<(), ParseError> {
        let ends_blank = matches!(
            self.current.components.last(),
            Some(Component::Text { value }) if value.ends_with([' ', '\t'])
        );
        if ends_blank && self.lexer.peek_token()?.is(TokenKind::Whitespace) {
            self.lexer.next_token()?;
        }
        Ok(())
    }

    /// Whether a line break after the current content reads as a space
    fn needs_separator(&self) -> bool {
        match self.current.components.last() {
            Some(Component::Text { value }) => !value.ends_with([' ', '\t']),
            Some(Component::Ingredient(_) | Component::Cookware(_) | Component::Timer(_)) => true,
            _ => false,
        }
    }

    fn metadata_directive(&mut self, directive: &str) {
        match directive.split_once(':') {
            Some((key, value)) => {
                self.metadata
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
            None => warn!("Ignoring metadata directive without a value: {}", directive),
        }
    }

    /// Collects name tokens until `{` or something that cannot be part of a
    /// name. Returns the tokens and whether a `{` was found. The terminating
    /// token is consumed only when it is the brace.
    fn collect_name(
        &mut self,
        accept: impl Fn(&Token) -> bool,
    ) -> Result<(Vec<Token>, Option<Token>), ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.lexer.next_token()?;
            if token.is(TokenKind::LBrace) {
                return Ok((tokens, Some(token)));
            }
            if !accept(&token) {
                self.lexer.unread(token);
                return Ok((tokens, None));
            }
            tokens.push(token);
        }
    }

    fn join(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.literal.as_str()).collect::<String>().trim().to_string()
    }

    /// `@name{qty%unit}(annotation)`, `@?name`, or a bare `@word`
    fn ingredient(&mut self) -> Result<Item, ParseError> {
        let optional = self.lexer.peek_token()?.is(TokenKind::Question);
        if optional {
            self.lexer.next_token()?;
        }

        let (mut tokens, brace) = self.collect_name(Token::is_name_part)?;
        let mut item = Item {
            optional,
            ..Default::default()
        };

        match brace {
            Some(open) => {
                item.name = Self::join(&tokens);
                let amount = self.read_amount(&open)?;
                item.quantity = amount.quantity.unwrap_or_else(|| SOME.to_string());
                item.unit = amount.unit;
                item.fixed = amount.fixed;
                item.annotation = self.annotation()?;
            }
            None => {
                let split = tokens
                    .iter()
                    .position(|t| !t.is_alphanumeric())
                    .unwrap_or(tokens.len());
                let rest = tokens.split_off(split);
                self.lexer.unread_all(rest);
                item.name = Self::join(&tokens);
                item.quantity = SOME.to_string();
            }
        }
        Ok(item)
    }

    /// `#name{qty}(annotation)` or a bare `#word`
    fn cookware(&mut self) -> Result<Item, ParseError> {
        let (mut tokens, brace) = self.collect_name(Token::is_name_part)?;
        let mut item = Item {
            quantity: DEFAULT_COOKWARE_QUANTITY.to_string(),
            ..Default::default()
        };

        match brace {
            Some(open) => {
                item.name = Self::join(&tokens);
                let amount = self.read_amount(&open)?;
                if let Some(quantity) = amount.quantity {
                    item.quantity = quantity;
                }
                item.unit = amount.unit;
                item.fixed = amount.fixed;
                item.annotation = self.annotation()?;
            }
            None => {
                let rest = tokens.split_off(tokens.len().min(1));
                self.lexer.unread_all(rest);
                item.name = Self::join(&tokens);
            }
        }
        Ok(item)
    }

    /// `~name{qty%unit}`, `~{qty%unit}` or a bare `~word`
    fn timer(&mut self) -> Result<Item, ParseError> {
        let extended = self.config.extended;
        let (mut tokens, brace) = self.collect_name(|token| {
            if extended {
                matches!(token.kind, TokenKind::Ident | TokenKind::Int | TokenKind::Whitespace)
            } else {
                false
            }
        })?;

        // Canonical names are a single word, read here when the multi-word
        // scan was disabled
        if !extended && brace.is_none() {
            let word = self.lexer.next_token()?;
            if word.is_alphanumeric() {
                tokens.push(word);
            } else {
                self.lexer.unread(word);
            }
        }
        let brace = match brace {
            None if !extended && self.lexer.peek_token()?.is(TokenKind::LBrace) => {
                Some(self.lexer.next_token()?)
            }
            brace => brace,
        };

        let mut item = Item::default();
        match brace {
            Some(open) => {
                item.name = Self::join(&tokens);
                let amount = self.read_amount(&open)?;
                item.quantity = amount.quantity.unwrap_or_default();
                item.unit = amount.unit;
                item.fixed = amount.fixed;
            }
            None => {
                let rest = tokens.split_off(tokens.len().min(1));
                self.lexer.unread_all(rest);
                item.name = Self::join(&tokens);
            }
        }
        item.annotation = self.annotation()?;
        Ok(item)
    }

    /// Reads the contents of a `{...}` block; the opening brace is consumed
    fn read_amount(&mut self, open: &Token) -> Result<Amount, ParseError> {
        let mut quantity = String::new();
        let mut unit = String::new();
        let mut fixed = false;
        let mut in_unit = false;

        loop {
            let token = self.lexer.next_token()?;
            match token.kind {
                TokenKind::RBrace => break,
                TokenKind::Eof => {
                    return Err(ParseError::UnterminatedQuantity {
                        line: open.line,
                        column: open.column,
                    })
                }
                TokenKind::Equal if !in_unit && quantity.trim().is_empty() && !fixed => {
                    fixed = true;
                }
                TokenKind::Percent if !in_unit => in_unit = true,
                _ if in_unit => unit.push_str(&token.literal),
                _ => quantity.push_str(&token.literal),
            }
        }

        let quantity = quantity.trim();
        Ok(Amount {
            quantity: (!quantity.is_empty()).then(|| evaluate_fraction(quantity)),
            unit: unit.trim().to_string(),
            fixed,
        })
    }

    /// An optional `(...)` right after a component. Nothing is consumed when
    /// the parentheses are not closed on the same line.
    fn annotation(&mut self) -> Result<Option<String>, ParseError> {
        if !self.lexer.peek_token()?.is(TokenKind::LParen) {
            return Ok(None);
        }

        let mut tokens = vec![self.lexer.next_token()?];
        let mut depth = 1;
        loop {
            let token = self.lexer.next_token()?;
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        let annotation = Self::join(&tokens[1..]);
                        return Ok(Some(annotation));
                    }
                }
                TokenKind::Newline | TokenKind::Eof => {
                    tokens.push(token);
                    self.lexer.unread_all(tokens);
                    return Ok(None);
                }
                _ => {}
            }
            tokens.push(token);
        }
    }
}

struct Amount {
    quantity: Option<String>,
    unit: String,
    fixed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Recipe {
        CooklangParser::canonical().parse(input).unwrap()
    }

    fn first_ingredient(input: &str) -> Item {
        parse(input).steps[0].ingredients().next().cloned().unwrap()
    }

    #[test]
    fn test_ingredient_with_amount() {
        let item = first_ingredient("Add @flour{500%g}.");
        assert_eq!(item.name, "flour");
        assert_eq!(item.quantity, "500");
        assert_eq!(item.unit, "g");
        assert!(!item.fixed);
        assert!(!item.optional);
    }

    #[test]
    fn test_optional_fixed_ingredient() {
        let item = first_ingredient("Add @?salt{=1%pinch} to taste.");
        assert_eq!(item.name, "salt");
        assert_eq!(item.quantity, "1");
        assert_eq!(item.unit, "pinch");
        assert!(item.optional);
        assert!(item.fixed);
    }

    #[test]
    fn test_multi_word_ingredient() {
        let item = first_ingredient("Season with @ground black pepper{}.");
        assert_eq!(item.name, "ground black pepper");
        assert_eq!(item.quantity, "some");
        assert_eq!(item.unit, "");
    }

    #[test]
    fn test_optional_empty_braces_is_some() {
        let item = first_ingredient("Add @?chili flakes{} if you like.");
        assert_eq!(item.name, "chili flakes");
        assert_eq!(item.quantity, "some");
        assert_eq!(item.unit, "");
        assert!(item.optional);
        assert!(!item.fixed);
    }

    #[test]
    fn test_bare_ingredient_takes_single_word() {
        let recipe = parse("Add @salt and pepper.");
        let step = &recipe.steps[0];
        assert_eq!(step.ingredients().next().unwrap().name, "salt");
        assert_eq!(step.ingredients().next().unwrap().quantity, "some");
        assert_eq!(step.text(), "Add salt and pepper.");
    }

    #[test]
    fn test_fraction_quantity() {
        assert_eq!(first_ingredient("@milk{1 1/2%cups}").quantity, "1.5");
        assert_eq!(first_ingredient("@milk{½%cup}").quantity, "0.5");
        assert_eq!(first_ingredient("@milk{01/2%cup}").quantity, "01/2");
    }

    #[test]
    fn test_ingredient_annotation() {
        let item = first_ingredient("@onion{1}(finely chopped) and");
        assert_eq!(item.annotation.as_deref(), Some("finely chopped"));
    }

    #[test]
    fn test_cookware_defaults() {
        let recipe = parse("Use a #large pot{} and #whisk.");
        let cookware = recipe.cookware();
        assert_eq!(cookware[0].name, "large pot");
        assert_eq!(cookware[0].quantity, "1");
        assert_eq!(cookware[1].name, "whisk");
        assert_eq!(cookware[1].quantity, "1");
        assert_eq!(recipe.steps[0].text(), "Use a large pot and whisk.");
    }

    #[test]
    fn test_cookware_annotation() {
        let recipe = parse("Fry in a #frying pan{}(non-stick) or #wok{2}(large).");
        let cookware = recipe.cookware();
        assert_eq!(cookware[0].name, "frying pan");
        assert_eq!(cookware[0].quantity, "1");
        assert_eq!(cookware[0].annotation.as_deref(), Some("non-stick"));
        assert_eq!(cookware[1].quantity, "2");
        assert_eq!(cookware[1].annotation.as_deref(), Some("large"));

        // without braces the parentheses stay text
        let recipe = parse("Use the #pot(big).");
        assert_eq!(recipe.cookware()[0].annotation, None);
        assert_eq!(recipe.steps[0].text(), "Use the pot(big).");
    }

    #[test]
    fn test_timer_annotation() {
        let recipe = parse("Bake ~{2%h}(covered), then ~rest{5%min}(uncovered) and ~cool(briefly).");
        let timers = recipe.timers();
        assert_eq!(timers[0].name, "");
        assert_eq!(timers[0].quantity, "2");
        assert_eq!(timers[0].unit, "h");
        assert_eq!(timers[0].annotation.as_deref(), Some("covered"));
        assert_eq!(timers[1].name, "rest");
        assert_eq!(timers[1].annotation.as_deref(), Some("uncovered"));
        assert_eq!(timers[2].name, "cool");
        assert_eq!(timers[2].quantity, "");
        assert_eq!(timers[2].annotation.as_deref(), Some("briefly"));

        let extended = CooklangParser::extended()
            .parse("Proof for ~slow rise{2%h}(warm).")
            .unwrap();
        let timer = extended.timers()[0];
        assert_eq!(timer.name, "slow rise");
        assert_eq!(timer.quantity, "2");
        assert_eq!(timer.annotation.as_deref(), Some("warm"));
    }

    #[test]
    fn test_timers() {
        let recipe = parse("Boil ~{10%minutes} then ~rest{5%min}.");
        let timers = recipe.timers();
        assert_eq!(timers[0].name, "");
        assert_eq!(timers[0].quantity, "10");
        assert_eq!(timers[0].unit, "minutes");
        assert_eq!(timers[1].name, "rest");
    }

    #[test]
    fn test_multi_word_timer_needs_extended_mode() {
        let input = "Let it ~slow rise{2%hours}.";

        let canonical = parse(input);
        assert_eq!(canonical.timers()[0].name, "slow");
        assert_eq!(canonical.timers()[0].quantity, "");

        let extended = CooklangParser::extended().parse(input).unwrap();
        assert_eq!(extended.timers()[0].name, "slow rise");
        assert_eq!(extended.timers()[0].quantity, "2");
    }

    #[test]
    fn test_single_newline_becomes_space() {
        let recipe = parse("Mix well\nthen rest.");
        assert_eq!(recipe.steps.len(), 1);
        assert_eq!(recipe.steps[0].text(), "Mix well then rest.");
    }

    #[test]
    fn test_blank_line_splits_steps() {
        let recipe = parse("Mix.\n  \n\nBake.\n");
        assert_eq!(recipe.steps.len(), 2);
        assert_eq!(recipe.steps[1].text(), "Bake.");
    }

    #[test]
    fn test_unterminated_quantity() {
        let err = CooklangParser::canonical().parse("Add\n  @flour{500%g").unwrap_err();
        assert_eq!(err, ParseError::UnterminatedQuantity { line: 2, column: 9 });
    }

    #[test]
    fn test_comments_depend_on_mode() {
        let input = "Mix -- gently\nthen bake [- hot -] well.";

        let canonical = parse(input);
        assert_eq!(canonical.steps.len(), 1);
        assert_eq!(canonical.steps[0].text(), "Mix then bake well.");
        assert_eq!(parse("Stir[- gently -] well.").steps[0].text(), "Stir well.");

        let extended = CooklangParser::extended().parse(input).unwrap();
        let comments: usize = extended
            .steps
            .iter()
            .flat_map(|s| &s.components)
            .filter(|c| matches!(c, Component::Comment { .. } | Component::BlockComment { .. }))
            .count();
        assert_eq!(comments, 2);
    }

    #[test]
    fn test_notes_are_their_own_step() {
        let recipe = parse("Mix.\n> Use cold butter\n> if possible.\nBake.");
        assert_eq!(recipe.steps.len(), 3);
        assert_eq!(
            recipe.steps[1].components,
            vec![Component::Note {
                value: "Use cold butter if possible.".to_string()
            }]
        );
        assert_eq!(recipe.steps[2].text(), "Bake.");
    }

    #[test]
    fn test_section_starts_new_step() {
        let recipe = parse("Prep.\n== Dough ==\nKnead.");
        assert_eq!(recipe.steps.len(), 2);
        assert_eq!(
            recipe.steps[1].components[0],
            Component::Section {
                name: "Dough".to_string()
            }
        );
    }

    #[test]
    fn test_metadata_directive_overrides_front_matter() {
        let recipe = parse("---\nservings: 2\n---\n>> servings: 4\nCook.");
        assert_eq!(recipe.metadata["servings"], "4");
        assert_eq!(recipe.steps.len(), 1);
    }

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        let err = CooklangParser::canonical().parse_bytes(&[0x66, 0xff]).unwrap_err();
        assert!(matches!(err, ParseError::InvalidUtf8(_)));
    }
}
