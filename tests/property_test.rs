//! Property tests for the text stages.

use proptest::prelude::*;

use unscan::parser::reading_order_text;
use unscan::render::CleanupPipeline;
use unscan::render::Normalizer;
use unscan::structure::{CompiledVocabulary, Correction};
use unscan::{CleanupPreset, PositionedFragment};

fn page_text() -> impl Strategy<Value = String> {
    prop::collection::vec("\\PC{0,40}", 0..12).prop_map(|lines| lines.join("\n"))
}

fn vocabulary_text() -> impl Strategy<Value = String> {
    let tokens = vec![
        "VIDROS", "vIdros", "VIdros", "para-brisa", "PARA-BRISA", "lanternas", "pequenos",
        " reparos", "PEQUENOS", " REPAROS", "faróis", "Auto", "x", " ", "\n",
    ];
    prop::collection::vec(prop::sample::select(tokens), 0..30).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn cleanup_is_idempotent(text in page_text()) {
        let vocabulary = CompiledVocabulary::builtin().unwrap();
        for preset in [CleanupPreset::Minimal, CleanupPreset::Standard] {
            let cleanup = CleanupPipeline::from_preset(preset, &vocabulary);
            let once = cleanup.process(&text);
            prop_assert_eq!(cleanup.process(&once), once);
        }
    }

    #[test]
    fn normalizer_is_idempotent(text in vocabulary_text()) {
        let vocabulary = CompiledVocabulary::builtin().unwrap();
        let normalizer = vocabulary.normalizer();
        let once = normalizer.apply(&text);
        prop_assert_eq!(normalizer.apply(&once), once);
    }

    #[test]
    fn custom_corrections_are_idempotent(text in "[abcdX]{0,40}") {
        let normalizer = Normalizer::new(&[
            Correction::new("ab", "a"),
            Correction::new("abc", "X"),
            Correction::new("bd", "bc"),
        ])
        .unwrap();
        let once = normalizer.apply(&text);
        prop_assert_eq!(normalizer.apply(&once), once);
    }

    #[test]
    fn reading_order_is_sorted_and_stable(offsets in prop::collection::vec(-50i32..50, 0..40)) {
        let fragments: Vec<PositionedFragment> = offsets
            .iter()
            .enumerate()
            .map(|(i, offset)| PositionedFragment::new(i.to_string(), *offset as f32))
            .collect();

        let text = reading_order_text(&fragments);
        let order: Vec<usize> = if text.is_empty() {
            Vec::new()
        } else {
            text.lines().map(|l| l.parse().unwrap()).collect()
        };

        prop_assert_eq!(order.len(), offsets.len());
        for pair in order.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            prop_assert!(offsets[a] < offsets[b] || (offsets[a] == offsets[b] && a < b));
        }
    }
}
