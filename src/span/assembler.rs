// ============================================================
// Layer 5 — DatasetAssembler
// ============================================================
// Turns question/answer pairs into character-offset Examples by
// searching the knowledge base with the SpanLocator.
//
// For every QaPair:
//   - visit documents in knowledge-base order
//   - the FIRST document where the locator succeeds yields one
//     Example and the search stops (at most one Example per pair)
//   - if the matched text differs from the answer, a
//     PartialMatchRecord is kept for audit
//   - if no document matches, the pair is counted as not found
//
// Diagnostics go to the EventSink; they never change the result.

use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::document::KnowledgeBase;
use crate::domain::events::{answer_preview, PipelineEvent};
use crate::domain::example::{Example, PartialMatchRecord};
use crate::domain::qa_pair::QaPair;
use crate::domain::traits::EventSink;
use crate::span::locator::SpanLocator;

/// Everything one assembly run produced.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub examples:  Vec<Example>,
    pub partials:  Vec<PartialMatchRecord>,
    pub not_found: usize,
    /// Pairs skipped because their answer was empty
    pub invalid:   usize,
    /// Examples per locator tier
    pub by_tier:   BTreeMap<&'static str, usize>,
}

pub struct DatasetAssembler {
    locator: SpanLocator,
}

impl DatasetAssembler {
    pub fn new(locator: SpanLocator) -> Self {
        Self { locator }
    }

    /// Assemble examples, giving each a fresh UUID v4.
    pub fn assemble(
        &self,
        pairs: &[QaPair],
        kb:    &KnowledgeBase,
        sink:  &mut dyn EventSink,
    ) -> Assembly {
        self.assemble_with_ids(pairs, kb, sink, || Uuid::new_v4().to_string())
    }

    /// Assemble examples, taking ids from `next_id`.
    pub fn assemble_with_ids(
        &self,
        pairs:   &[QaPair],
        kb:      &KnowledgeBase,
        sink:    &mut dyn EventSink,
        mut next_id: impl FnMut() -> String,
    ) -> Assembly {
        let mut out = Assembly::default();

        'pairs: for qa in pairs {
            for doc in kb.iter() {
                let found = match self.locator.locate(&qa.answer, &doc.text) {
                    Ok(found) => found,
                    Err(_) => {
                        // Empty answers fail identically for every document
                        out.invalid += 1;
                        sink.record(PipelineEvent::InvalidAnswer {
                            question: qa.question.clone(),
                        });
                        continue 'pairs;
                    }
                };

                let Some((start, text)) = found.span() else {
                    continue;
                };

                let example = Example {
                    id:           next_id(),
                    title:        doc.id.clone(),
                    context:      doc.text.clone(),
                    question:     qa.question.clone(),
                    answer_text:  text.to_string(),
                    answer_start: start,
                };
                debug_assert!(example.is_aligned(), "locator returned a misaligned span");
                *out.by_tier.entry(found.tier()).or_insert(0) += 1;

                if text != qa.answer {
                    let record = PartialMatchRecord {
                        question:        qa.question.clone(),
                        original_answer: qa.answer.clone(),
                        matched_answer:  text.to_string(),
                        document:        doc.id.clone(),
                    };
                    sink.record(PipelineEvent::PartialMatch {
                        question:        record.question.clone(),
                        original_answer: record.original_answer.clone(),
                        matched_answer:  record.matched_answer.clone(),
                        document:        record.document.clone(),
                    });
                    out.partials.push(record);
                }

                out.examples.push(example);
                continue 'pairs;
            }

            out.not_found += 1;
            sink.record(PipelineEvent::AnswerNotFound {
                question:       qa.question.clone(),
                answer_preview: answer_preview(&qa.answer),
            });
        }

        out
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::Document;
    use crate::domain::events::CollectingSink;
    use std::collections::HashSet;

    fn kb() -> KnowledgeBase {
        vec![
            Document::new("hostel.txt", "NRI students may share rooms with Indian students."),
            Document::new("exams.txt",  "Possession of a mobile phone during CAT leads to a grade reduction.\nNRI students may share rooms."),
            Document::new("extra.txt",  "Possession of a mobile phone during CAT leads to a grade reduction."),
        ]
        .into_iter()
        .collect()
    }

    fn assembler() -> DatasetAssembler {
        DatasetAssembler::new(SpanLocator::default())
    }

    #[test]
    fn test_first_matching_document_wins() {
        let pairs = vec![QaPair::new("Phones in CAT?", "mobile phone during CAT")];
        let mut sink = CollectingSink::new();
        let out = assembler().assemble(&pairs, &kb(), &mut sink);

        // matches in exams.txt and extra.txt, but only one example
        assert_eq!(out.examples.len(), 1);
        assert_eq!(out.examples[0].title, "exams.txt");
        assert_eq!(out.examples[0].answer_start, 16);
        assert!(out.partials.is_empty());
        assert!(sink.events.is_empty());
    }

    #[test]
    fn test_every_example_satisfies_binding_invariant() {
        let pairs = vec![
            QaPair::new("Roommates?", "nri students may share rooms"),
            QaPair::new("Phones?",    "Possession of a mobile phone during CAT leads to a grade drop"),
            QaPair::new("Exact?",     "grade reduction"),
        ];
        let out = assembler().assemble(&pairs, &kb(), &mut CollectingSink::new());
        assert_eq!(out.examples.len(), 3);
        assert!(out.examples.iter().all(|e| e.is_aligned()));

        let tiers: Vec<(&str, usize)> = out.by_tier.into_iter().collect();
        assert_eq!(tiers, vec![("case-insensitive", 1), ("exact", 1), ("partial", 1)]);
    }

    #[test]
    fn test_partial_matches_are_recorded() {
        let pairs = vec![QaPair::new("Roommates?", "nri students may share rooms")];
        let mut sink = CollectingSink::new();
        let out = assembler().assemble(&pairs, &kb(), &mut sink);

        assert_eq!(out.examples[0].answer_text, "NRI students may share rooms");
        assert_eq!(out.partials.len(), 1);
        assert_eq!(out.partials[0].document, "hostel.txt");
        assert_eq!(out.partials[0].original_answer, "nri students may share rooms");
        assert_eq!(
            sink.count(|e| matches!(e, PipelineEvent::PartialMatch { .. })),
            1
        );
    }

    #[test]
    fn test_not_found_is_counted_and_reported() {
        let pairs = vec![
            QaPair::new("Fees?", "tuition is refundable within ten days"),
            QaPair::new("Exact?", "grade reduction"),
        ];
        let mut sink = CollectingSink::new();
        let out = assembler().assemble(&pairs, &kb(), &mut sink);

        assert_eq!(out.not_found, 1);
        assert_eq!(out.examples.len(), 1);
        assert_eq!(
            sink.events[0],
            PipelineEvent::AnswerNotFound {
                question:       "Fees?".into(),
                answer_preview: "tuition is refundable within ten days".into(),
            }
        );
    }

    #[test]
    fn test_empty_answers_are_skipped() {
        let pairs = vec![QaPair::new("Blank?", "")];
        let mut sink = CollectingSink::new();
        let out = assembler().assemble(&pairs, &kb(), &mut sink);

        assert!(out.examples.is_empty());
        assert_eq!(out.invalid, 1);
        assert_eq!(out.not_found, 0);
        assert_eq!(sink.events, vec![PipelineEvent::InvalidAnswer { question: "Blank?".into() }]);
    }

    #[test]
    fn test_ids_are_unique() {
        let pairs = vec![
            QaPair::new("a", "grade reduction"),
            QaPair::new("b", "grade reduction"),
            QaPair::new("c", "Indian students"),
        ];
        let out = assembler().assemble(&pairs, &kb(), &mut CollectingSink::new());
        let ids: HashSet<&str> = out.examples.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_injected_ids_are_used_in_order() {
        let pairs = vec![QaPair::new("a", "grade reduction"), QaPair::new("b", "Indian students")];
        let mut n = 0;
        let out = assembler().assemble_with_ids(&pairs, &kb(), &mut CollectingSink::new(), || {
            n += 1;
            format!("ex-{n}")
        });
        let ids: Vec<&str> = out.examples.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["ex-1", "ex-2"]);
    }

    #[test]
    fn test_empty_knowledge_base_finds_nothing() {
        let pairs = vec![QaPair::new("a", "anything")];
        let out = assembler().assemble(&pairs, &KnowledgeBase::default(), &mut CollectingSink::new());
        assert_eq!(out.not_found, 1);
    }
}
