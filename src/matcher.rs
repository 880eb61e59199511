// src/matcher.rs — Locate annotated words inside model output
//
// Splits text into an ordered sequence of plain and annotated segments
// covering the input exactly once, no gaps, no overlaps. Greedy leftmost
// match; when two annotation words start at the same position the one
// listed first wins. The cursor advances past each match, so a word that
// appears several times is annotated at every non-overlapping occurrence.

use crate::session::Annotation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Annotated { word: String, explanation: String },
}

impl Segment {
    /// The surface text this segment covers.
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain(text) => text,
            Segment::Annotated { word, .. } => word,
        }
    }
}

/// Split `text` into render segments. Annotation words absent from the
/// text are silently ignored; empty words are skipped (they would never
/// advance the cursor).
pub fn segment_text(text: &str, annotations: &[Annotation]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    while cursor < text.len() {
        let rest = &text[cursor..];

        // Leftmost occurrence among all words; first-listed wins ties.
        let mut best: Option<(usize, &Annotation)> = None;
        for annotation in annotations {
            if annotation.word.is_empty() {
                continue;
            }
            if let Some(start) = rest.find(&annotation.word) {
                if best.is_none_or(|(best_start, _)| start < best_start) {
                    best = Some((start, annotation));
                }
            }
        }

        let Some((start, annotation)) = best else {
            segments.push(Segment::Plain(rest.to_string()));
            break;
        };

        if start > 0 {
            segments.push(Segment::Plain(rest[..start].to_string()));
        }
        segments.push(Segment::Annotated {
            word: annotation.word.clone(),
            explanation: annotation.explanation.clone(),
        });
        cursor += start + annotation.word.len();
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ann(word: &str, explanation: &str) -> Annotation {
        Annotation {
            word: word.into(),
            explanation: explanation.into(),
        }
    }

    fn rejoin(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text()).collect()
    }

    #[test]
    fn test_cats_and_dogs_scenario() {
        let text = "I like cats and dogs";
        let annotations = vec![ann("cats", "feline pets"), ann("dogs", "canine pets")];

        let segments = segment_text(text, &annotations);
        assert_eq!(
            segments,
            vec![
                Segment::Plain("I like ".into()),
                Segment::Annotated {
                    word: "cats".into(),
                    explanation: "feline pets".into()
                },
                Segment::Plain(" and ".into()),
                Segment::Annotated {
                    word: "dogs".into(),
                    explanation: "canine pets".into()
                },
            ]
        );
        assert_eq!(rejoin(&segments), text);
    }

    #[test]
    fn test_empty_annotation_set_yields_single_plain_segment() {
        let text = "nothing to see here";
        let segments = segment_text(text, &[]);
        assert_eq!(segments, vec![Segment::Plain(text.into())]);
    }

    #[test]
    fn test_empty_text_yields_no_segments() {
        assert!(segment_text("", &[ann("x", "y")]).is_empty());
    }

    #[test]
    fn test_word_not_in_text_is_ignored() {
        let text = "plain sentence";
        let segments = segment_text(text, &[ann("missing", "never found")]);
        assert_eq!(segments, vec![Segment::Plain(text.into())]);
    }

    #[test]
    fn test_repeated_word_annotated_at_each_occurrence() {
        let text = "run, run, run";
        let segments = segment_text(text, &[ann("run", "to move fast")]);
        let annotated = segments
            .iter()
            .filter(|s| matches!(s, Segment::Annotated { .. }))
            .count();
        assert_eq!(annotated, 3);
        assert_eq!(rejoin(&segments), text);
    }

    #[test]
    fn test_tie_break_prefers_first_listed() {
        // Both words match at position 0; no longest-match preference.
        let text = "sunflower field";
        let annotations = vec![ann("sun", "the star"), ann("sunflower", "a plant")];
        let segments = segment_text(text, &annotations);
        assert_eq!(
            segments[0],
            Segment::Annotated {
                word: "sun".into(),
                explanation: "the star".into()
            }
        );
        assert_eq!(rejoin(&segments), text);
    }

    #[test]
    fn test_match_at_end_has_no_trailing_empty_segment() {
        let text = "I like cats";
        let segments = segment_text(text, &[ann("cats", "feline pets")]);
        assert_eq!(
            segments,
            vec![
                Segment::Plain("I like ".into()),
                Segment::Annotated {
                    word: "cats".into(),
                    explanation: "feline pets".into()
                },
            ]
        );
    }

    #[test]
    fn test_multibyte_text_round_trips() {
        let text = "猫が好きです。犬も好きです。";
        let annotations = vec![ann("猫", "cat"), ann("犬", "dog"), ann("好き", "to like")];
        let segments = segment_text(text, &annotations);
        assert_eq!(rejoin(&segments), text);
        assert_eq!(
            segments[0],
            Segment::Annotated {
                word: "猫".into(),
                explanation: "cat".into()
            }
        );
    }

    #[test]
    fn test_empty_word_never_loops() {
        let text = "safe";
        let segments = segment_text(text, &[ann("", "empty")]);
        assert_eq!(segments, vec![Segment::Plain(text.into())]);
    }

    #[test]
    fn test_coverage_is_contiguous() {
        let text = "the quick brown fox jumps over the lazy dog";
        let annotations = vec![
            ann("quick", "fast"),
            ann("fox", "animal"),
            ann("lazy", "idle"),
            ann("the", "article"),
        ];
        let segments = segment_text(text, &annotations);
        // No segment is empty and concatenation reproduces the input.
        assert!(segments.iter().all(|s| !s.text().is_empty()));
        assert_eq!(rejoin(&segments), text);
    }
}
