use futures::future::join_all;
use tracing::{info, warn};

use super::ChecklistEngine;
use crate::answer::{
    validate_batch, BatchReport, EntryFailure, FieldAnswer, PreparedEntry, SaveAnswers,
    SaveOutcome,
};
use crate::error::{CoreError, CoreResult};
use crate::field::FieldFilter;
use crate::types::DbId;

impl ChecklistEngine {
    pub async fn list_answers(&self, entity_id: DbId) -> CoreResult<Vec<FieldAnswer>> {
        self.store.list_answers(entity_id).await
    }

    /// Validate a batch as a whole, then persist every entry independently.
    ///
    /// A rejected batch writes nothing. Once validation passes, each entry is
    /// upserted on its own and failures are counted rather than propagated,
    /// so `Err` is reserved for an unknown template or an unreadable field
    /// set.
    pub async fn save_answers(&self, input: &SaveAnswers) -> CoreResult<SaveOutcome> {
        self.get_template(input.template_id).await?;
        let fields = self
            .store
            .list_fields(&FieldFilter::active_for(input.template_id))
            .await?;

        let prepared = match validate_batch(&fields, &input.entries) {
            Ok(prepared) => prepared,
            Err(rejection) => {
                info!(
                    entity_id = input.entity_id,
                    template_id = input.template_id,
                    reason = %rejection.reason,
                    "Answer batch rejected"
                );
                return Ok(SaveOutcome::Rejected(rejection));
            }
        };

        let results = join_all(
            prepared
                .iter()
                .map(|entry| self.persist_entry(input.entity_id, entry)),
        )
        .await;

        let mut answers = Vec::new();
        let mut failures = Vec::new();
        for (entry, result) in prepared.iter().zip(results) {
            match result {
                Ok(answer) => answers.push(answer),
                Err(err) => {
                    warn!(
                        entity_id = input.entity_id,
                        template_field_id = entry.template_field_id,
                        error = %err,
                        "Answer not persisted"
                    );
                    failures.push(EntryFailure {
                        template_field_id: entry.template_field_id,
                        reason: failure_reason(&err),
                    });
                }
            }
        }

        let report = BatchReport {
            succeeded: answers.len(),
            failed: failures.len(),
            answers,
            failures,
        };
        info!(
            entity_id = input.entity_id,
            template_id = input.template_id,
            succeeded = report.succeeded,
            failed = report.failed,
            "Answer batch persisted"
        );
        Ok(SaveOutcome::PartiallyPersisted(report))
    }

    /// Lookup-then-upsert for one entry.
    ///
    /// An explicit `answer_id` must name this entity's answer for this field;
    /// anything else is reported as not found.
    async fn persist_entry(&self, entity_id: DbId, entry: &PreparedEntry) -> CoreResult<FieldAnswer> {
        let field_id = entry.template_field_id;
        if let Some(answer_id) = entry.answer_id {
            return self
                .store
                .update_answer_value(answer_id, entity_id, field_id, &entry.value)
                .await?
                .ok_or_else(|| CoreError::answer_not_found(answer_id));
        }

        if let Some(existing) = self
            .store
            .find_answer(entity_id, field_id)
            .await?
        {
            if let Some(updated) = self
                .store
                .update_answer_value(existing.id, entity_id, field_id, &entry.value)
                .await?
            {
                return Ok(updated);
            }
        }

        self.store
            .upsert_answer(entity_id, field_id, &entry.value)
            .await
    }
}

/// Client-facing reason for a failed entry. Store internals stay in the logs.
fn failure_reason(err: &CoreError) -> String {
    match err {
        CoreError::Internal(_) => "answer could not be stored".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use crate::answer::{AnswerEntry, SaveAnswers, SaveOutcome};
    use crate::engine::test_support::{engine, field, template};
    use crate::error::CoreError;
    use crate::types::DbId;

    fn entry(id: DbId, value: &str) -> AnswerEntry {
        AnswerEntry {
            template_field_id: id,
            value: json!(value),
            answer_id: None,
        }
    }

    #[tokio::test]
    async fn missing_required_field_rejects_and_persists_nothing() {
        let engine = engine();
        let t = template(&engine, "CHK-1").await;
        let a = field(&engine, t.id, "a", true).await;
        field(&engine, t.id, "b", true).await;
        field(&engine, t.id, "c", false).await;

        let outcome = engine
            .save_answers(&SaveAnswers {
                entity_id: 500,
                template_id: t.id,
                entries: vec![entry(a.id, "x")],
            })
            .await
            .unwrap();

        assert_matches!(outcome, SaveOutcome::Rejected(r) if r.reason == "1 missing required field: b");
        assert!(engine.list_answers(500).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_optional_field_is_saved() {
        let engine = engine();
        let t = template(&engine, "CHK-1").await;
        let a = field(&engine, t.id, "a", true).await;
        let b = field(&engine, t.id, "b", true).await;
        let c = field(&engine, t.id, "c", false).await;

        let outcome = engine
            .save_answers(&SaveAnswers {
                entity_id: 500,
                template_id: t.id,
                entries: vec![entry(a.id, "x"), entry(b.id, "y"), entry(c.id, "")],
            })
            .await
            .unwrap();

        assert_matches!(outcome, SaveOutcome::PartiallyPersisted(report) => {
            assert!(report.is_complete());
            assert_eq!(report.succeeded, 3);
        });
    }

    #[tokio::test]
    async fn saving_twice_updates_instead_of_duplicating() {
        let engine = engine();
        let t = template(&engine, "CHK-1").await;
        let a = field(&engine, t.id, "a", true).await;
        let request = |value: &str| SaveAnswers {
            entity_id: 9,
            template_id: t.id,
            entries: vec![entry(a.id, value)],
        };

        engine.save_answers(&request("first")).await.unwrap();
        engine.save_answers(&request("second")).await.unwrap();

        let answers = engine.list_answers(9).await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].value, "second");
    }

    #[tokio::test]
    async fn explicit_answer_id_updates_that_row() {
        let engine = engine();
        let t = template(&engine, "CHK-1").await;
        let a = field(&engine, t.id, "a", false).await;
        engine
            .save_answers(&SaveAnswers {
                entity_id: 9,
                template_id: t.id,
                entries: vec![entry(a.id, "v1")],
            })
            .await
            .unwrap();
        let existing = engine.list_answers(9).await.unwrap().remove(0);

        engine
            .save_answers(&SaveAnswers {
                entity_id: 9,
                template_id: t.id,
                entries: vec![AnswerEntry {
                    template_field_id: a.id,
                    value: json!("v2"),
                    answer_id: Some(existing.id),
                }],
            })
            .await
            .unwrap();

        let answers = engine.list_answers(9).await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].id, existing.id);
        assert_eq!(answers[0].value, "v2");
    }

    #[tokio::test]
    async fn failing_entries_are_counted_not_raised() {
        let engine = engine();
        let t = template(&engine, "CHK-1").await;
        let a = field(&engine, t.id, "a", true).await;
        let b = field(&engine, t.id, "b", false).await;

        let outcome = engine
            .save_answers(&SaveAnswers {
                entity_id: 3,
                template_id: t.id,
                entries: vec![
                    entry(a.id, "ok"),
                    entry(b.id, "ok"),
                    entry(9_999, "orphan"),
                    AnswerEntry {
                        template_field_id: b.id,
                        value: json!("stale"),
                        answer_id: Some(8_888),
                    },
                ],
            })
            .await
            .unwrap();

        assert_matches!(outcome, SaveOutcome::PartiallyPersisted(report) => {
            assert_eq!(report.succeeded, 2);
            assert_eq!(report.failed, 2);
            assert!(!report.is_complete());
            let failed_ids: Vec<DbId> = report.failures.iter().map(|f| f.template_field_id).collect();
            assert!(failed_ids.contains(&9_999));
            let orphan = report.failures.iter().find(|f| f.template_field_id == 9_999).unwrap();
            assert_eq!(orphan.reason, "answer could not be stored");
        });
    }

    #[tokio::test]
    async fn foreign_answer_id_fails_and_leaves_the_other_entity_alone() {
        let engine = engine();
        let t = template(&engine, "CHK-1").await;
        let a = field(&engine, t.id, "a", false).await;
        engine
            .save_answers(&SaveAnswers {
                entity_id: 1,
                template_id: t.id,
                entries: vec![entry(a.id, "owned by 1")],
            })
            .await
            .unwrap();
        let foreign = engine.list_answers(1).await.unwrap().remove(0);

        let outcome = engine
            .save_answers(&SaveAnswers {
                entity_id: 2,
                template_id: t.id,
                entries: vec![AnswerEntry {
                    template_field_id: a.id,
                    value: json!("written by 2"),
                    answer_id: Some(foreign.id),
                }],
            })
            .await
            .unwrap();

        assert_matches!(outcome, SaveOutcome::PartiallyPersisted(report) => {
            assert_eq!(report.succeeded, 0);
            assert_eq!(report.failed, 1);
        });
        assert_eq!(engine.list_answers(1).await.unwrap()[0].value, "owned by 1");
        assert!(engine.list_answers(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_template_is_not_found() {
        let result = engine()
            .save_answers(&SaveAnswers {
                entity_id: 1,
                template_id: 123,
                entries: Vec::new(),
            })
            .await;
        assert_matches!(result, Err(CoreError::NotFound { entity: "FormTemplate", .. }));
    }
}
