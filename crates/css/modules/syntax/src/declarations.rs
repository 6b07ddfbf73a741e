//! Declaration blocks (`name: value; ...`) with source lines.
use cssparser::AtRuleParser as CssAtRuleParser;
use cssparser::BasicParseErrorKind;
use cssparser::CowRcStr;
use cssparser::DeclarationParser as CssDeclarationParser;
use cssparser::ParseError;
use cssparser::Parser;
use cssparser::ParserInput;
use cssparser::ParserState;
use cssparser::QualifiedRuleParser as CssQualifiedRuleParser;
use cssparser::RuleBodyItemParser as CssRuleBodyItemParser;
use cssparser::RuleBodyParser as CssRuleBodyParser;

/// A single declaration (property: value [!important]) and where it starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercased property name.
    pub name: String,
    /// Raw value text (without trailing !important).
    pub value: String,
    /// Whether the declaration was marked as `!important`.
    pub important: bool,
    /// 1-based line of the property name within the parsed block.
    pub line: u32,
}

/// Keyword that follows the `!` delimiter of an important declaration.
const IMPORTANT: &str = "important";

/// Split a trailing `!important` (any case, optional space after `!`) off a value.
///
/// Only the final tokens count; the text inside strings or earlier in the value is kept.
fn split_important_tail(value: &str) -> (String, bool) {
    let trimmed = value.trim();
    let keyword_start = trimmed.len().saturating_sub(IMPORTANT.len());
    if let Some(keyword) = trimmed.get(keyword_start..)
        && keyword.eq_ignore_ascii_case(IMPORTANT)
        && let Some(head) = trimmed
            .get(..keyword_start)
            .and_then(|rest| rest.trim_end().strip_suffix('!'))
    {
        return (head.trim_end().to_owned(), true);
    }
    (trimmed.to_owned(), false)
}

/// A declaration parser that records the property name, its raw value and its line.
struct BodyDeclParser;

impl<'input> CssDeclarationParser<'input> for BodyDeclParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'tokens>(
        &mut self,
        name: CowRcStr<'input>,
        input: &mut Parser<'input, 'tokens>,
        decl_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'input, Self::Error>> {
        let start = input.position();
        // Consume until end of the declaration item.
        while input.next_including_whitespace_and_comments().is_ok() {}
        let raw = input.slice_from(start);
        let (value, important) = split_important_tail(raw);
        if value.is_empty() {
            return Err(input.new_error(BasicParseErrorKind::EndOfInput));
        }
        Ok(Declaration {
            name: name.to_ascii_lowercase(),
            value,
            important,
            line: decl_start.source_location().line.saturating_add(1),
        })
    }
}

impl CssAtRuleParser<'_> for BodyDeclParser {
    type Prelude = ();
    type AtRule = Declaration; // Not produced
    type Error = ();
}

impl CssQualifiedRuleParser<'_> for BodyDeclParser {
    type Prelude = ();
    type QualifiedRule = Declaration; // Not produced
    type Error = ();
}

impl CssRuleBodyItemParser<'_, Declaration, ()> for BodyDeclParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

/// Parse the inside of a declaration block, skipping invalid items.
///
/// Nested rules and at-rules are dropped; declarations with an empty value are dropped.
pub fn parse_declaration_block(block: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(block);
    let mut parser = Parser::new(&mut input);
    let mut body = BodyDeclParser;
    CssRuleBodyParser::new(&mut parser, &mut body)
        .flatten()
        .collect()
}
