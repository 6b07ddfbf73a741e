#![cfg(test)]

use core::error::Error;
use std::sync::Arc;

use css_property_spec::{PropertyDictionary, PropertySpecification, SourceLocation, properties};
use css_syntax::CommaPolicy;
use css_values_units::Value;
use rayon::prelude::*;

/// One declaration block per simulated element, each with its own margin.
fn blocks(count: u16) -> Vec<(u16, String)> {
    (0..count)
        .map(|index| {
            (
                index,
                format!("margin: {index}px 1px; border: 1px red; font: italic 12px serif"),
            )
        })
        .collect()
}

#[test]
fn frozen_specification_parses_from_many_threads() -> Result<(), Box<dyn Error>> {
    let _ignored = env_logger::builder().is_test(true).try_init();
    let spec: Arc<PropertySpecification> =
        PropertySpecification::with_default_properties(CommaPolicy::Join)?.freeze()?;

    let results: Vec<(u16, PropertyDictionary)> = blocks(256)
        .into_par_iter()
        .map(|(index, block)| {
            let mut dict = PropertyDictionary::new();
            let rejected = spec.parse_declaration_block(&mut dict, &block, "generated.rcss");
            assert_eq!(rejected, 0, "{block}");
            spec.set_property_defaults(&mut dict);
            (index, dict)
        })
        .collect();

    assert_eq!(results.len(), 256);
    for (index, dict) in &results {
        assert_eq!(dict.len(), properties::NUM_DEFINED - 1);
        assert_eq!(dict.value(properties::MARGIN_TOP), Some(&Value::px(f32::from(*index))));
        assert_eq!(dict.value(properties::MARGIN_LEFT), Some(&Value::px(1.0)));
        assert_eq!(dict.value(properties::FONT_STYLE), Some(&Value::keyword("italic")));
        assert_eq!(
            dict.property(properties::WIDTH).map(|property| property.source.line),
            Some(0)
        );
    }
    Ok(())
}

#[test]
fn dictionaries_are_independent_per_call() -> Result<(), Box<dyn Error>> {
    let spec = PropertySpecification::with_default_properties(CommaPolicy::Join)?.freeze()?;
    let dicts: Vec<PropertyDictionary> = ["1px", "2px", "bogus"]
        .par_iter()
        .map(|value| {
            let mut dict = PropertyDictionary::new();
            let source = SourceLocation::default();
            spec.parse_property_declaration(&mut dict, "padding", value, &source);
            dict
        })
        .collect();
    assert_eq!(dicts[0].value(properties::PADDING_LEFT), Some(&Value::px(1.0)));
    assert_eq!(dicts[1].value(properties::PADDING_LEFT), Some(&Value::px(2.0)));
    assert!(dicts[2].is_empty());
    Ok(())
}
