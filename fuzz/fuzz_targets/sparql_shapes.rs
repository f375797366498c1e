#![no_main]

use libfuzzer_sys::fuzz_target;
use sparql_shapes::parser::{ParseErrorKind, QueryParser};
use sparql_shapes::ShapeAnalyzer;
use std::str;

fuzz_target!(|data: &[u8]| {
    let Ok(query) = str::from_utf8(data) else {
        return;
    };
    let mut analyzer = ShapeAnalyzer::with_parser(QueryParser::new().with_step_limit(100_000));
    if let Ok(components) = analyzer.analyze(query) {
        let lines = components
            .iter()
            .map(|component| component.lines().count())
            .sum::<usize>();
        assert_eq!(lines, analyzer.schema().len());
        for component in &components {
            let total = component.complexity.iter().sum::<i32>();
            assert_eq!(usize::try_from(total).unwrap(), component.lines().count());
            // Rendered components are valid queries again
            if let Err(error) = analyzer.analyze(&component.to_query()) {
                assert_ne!(error.kind(), ParseErrorKind::Syntax, "{error}\n{component}");
            }
        }
    }
});
