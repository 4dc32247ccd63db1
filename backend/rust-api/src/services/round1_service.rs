use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::config::EventSettings;
use crate::metrics::{PURCHASES_TOTAL, QUIZ_SUBMISSIONS_TOTAL};
use crate::models::catalog::QuizQuestionView;
use crate::models::round1::{
    ComponentList, PurchaseRequest, PurchaseResponse, QuizSet, SubmitQuizRequest,
    SubmitQuizResponse, ValidateAnswerRequest, ValidateAnswerResponse,
};
use crate::models::team::{PurchasedComponent, Round1State};

use super::errors::ServiceError;
use super::scoring::{answer_matches, score_quiz};
use super::store::{update_team, Catalog, TeamStore};

/// Round 1 "Component Quest": quiz for currency, then one-time component purchase
pub struct Round1Service {
    teams: Arc<dyn TeamStore>,
    catalog: Arc<dyn Catalog>,
    settings: EventSettings,
}

impl Round1Service {
    pub fn new(teams: Arc<dyn TeamStore>, catalog: Arc<dyn Catalog>, settings: EventSettings) -> Self {
        Self {
            teams,
            catalog,
            settings,
        }
    }

    pub async fn quiz(&self) -> Result<QuizSet, ServiceError> {
        let questions = self
            .catalog
            .active_questions(self.settings.quiz_question_limit)
            .await?;

        Ok(QuizSet {
            count: questions.len(),
            questions: questions.into_iter().map(QuizQuestionView::from).collect(),
        })
    }

    /// Side-effect free check of a single answer against the delivered quiz order
    pub async fn validate_answer(
        &self,
        req: &ValidateAnswerRequest,
    ) -> Result<ValidateAnswerResponse, ServiceError> {
        let questions = self
            .catalog
            .active_questions(self.settings.quiz_question_limit)
            .await?;

        let question = usize::try_from(req.question_index)
            .ok()
            .and_then(|index| questions.get(index))
            .ok_or_else(|| ServiceError::validation("Invalid question index"))?;

        let is_correct = answer_matches(question, Some(req.selected_answer));

        Ok(ValidateAnswerResponse {
            is_correct,
            correct_answer: (!is_correct).then_some(question.correct_answer),
            earned_amount: if is_correct {
                self.settings.reward_per_correct
            } else {
                0
            },
        })
    }

    pub async fn submit_quiz(
        &self,
        req: &SubmitQuizRequest,
    ) -> Result<SubmitQuizResponse, ServiceError> {
        req.validate()?;

        let questions = self
            .catalog
            .active_questions(self.settings.quiz_question_limit)
            .await?;
        let outcome = score_quiz(
            &questions,
            &req.answers,
            self.settings.reward_per_correct,
            self.settings.quiz_bonus,
        );

        update_team(self.teams.as_ref(), &req.team_id, |team| {
            if team.round1.submitted {
                return Err(ServiceError::Conflict(
                    "Components already purchased; the quiz can no longer be resubmitted"
                        .to_string(),
                ));
            }
            team.round1.quiz_score = outcome.correct;
            team.round1.earned_amount = outcome.earned_amount;
            team.round1.total_balance = outcome.total_balance;
            Ok(())
        })
        .await?;

        QUIZ_SUBMISSIONS_TOTAL.inc();
        tracing::info!(
            "Quiz submitted: team={}, correct={}/{}, balance={}",
            req.team_id,
            outcome.correct,
            questions.len(),
            outcome.total_balance
        );

        Ok(SubmitQuizResponse {
            correct_answers: outcome.correct,
            total_questions: questions.len(),
            earned_amount: outcome.earned_amount,
            bonus_amount: outcome.bonus_amount,
            total_balance: outcome.total_balance,
        })
    }

    pub async fn components(&self) -> Result<ComponentList, ServiceError> {
        let components = self.catalog.available_components().await?;
        Ok(ComponentList {
            count: components.len(),
            components,
        })
    }

    /// The one-time, balance-constrained commit that closes round 1.
    ///
    /// All checks run inside the optimistic update so two racing purchases
    /// for the same team can never both succeed.
    pub async fn purchase(&self, req: &PurchaseRequest) -> Result<PurchaseResponse, ServiceError> {
        req.validate()?;

        let resolved = self.catalog.components_by_ids(&req.component_ids).await?;
        let purchase_size = self.settings.purchase_size;

        let result = update_team(self.teams.as_ref(), &req.team_id, |team| {
            if team.round1.submitted {
                return Err(ServiceError::Conflict(
                    "Components have already been purchased".to_string(),
                ));
            }
            if req.component_ids.is_empty() {
                return Err(ServiceError::validation("Component IDs are required"));
            }
            if resolved.len() != req.component_ids.len() {
                return Err(ServiceError::NotFound(
                    "One or more components not found".to_string(),
                ));
            }
            if req.component_ids.len() != purchase_size {
                return Err(ServiceError::validation(format!(
                    "You must purchase exactly {} components",
                    purchase_size
                )));
            }

            let total_cost: i64 = resolved.iter().map(|c| c.price).sum();
            if total_cost > team.round1.total_balance {
                return Err(ServiceError::InsufficientBalance {
                    required: total_cost,
                    available: team.round1.total_balance,
                });
            }

            let purchased_at = Utc::now();
            let snapshot: Vec<PurchasedComponent> = req
                .component_ids
                .iter()
                .filter_map(|id| resolved.iter().find(|c| &c.id == id))
                .map(|c| PurchasedComponent {
                    component_id: c.id.clone(),
                    name: c.name.clone(),
                    component_type: c.component_type,
                    price: c.price,
                    icon: c.icon.clone(),
                    purchased_at,
                })
                .collect();

            let round1 = &mut team.round1;
            round1.purchased_components = snapshot.clone();
            round1.total_balance -= total_cost;
            round1.submitted = true;
            round1.submitted_at = Some(purchased_at);
            round1.final_score = round1.total_balance;

            Ok((snapshot, total_cost))
        })
        .await;

        let (team, (purchased_components, total_cost)) = match result {
            Ok(done) => done,
            Err(err) => {
                PURCHASES_TOTAL
                    .with_label_values(&[purchase_outcome(&err)])
                    .inc();
                tracing::warn!("Purchase rejected for team {}: {}", req.team_id, err);
                return Err(err);
            }
        };

        PURCHASES_TOTAL.with_label_values(&["success"]).inc();
        tracing::info!(
            "Components purchased: team={}, cost={}, remaining={}",
            team.id,
            total_cost,
            team.round1.total_balance
        );

        Ok(PurchaseResponse {
            purchased_components,
            total_cost,
            remaining_balance: team.round1.total_balance,
            round1_score: team.round1.final_score,
        })
    }

    pub async fn round1(&self, team_id: &str) -> Result<Round1State, ServiceError> {
        self.teams
            .find_by_id(team_id)
            .await?
            .map(|team| team.round1)
            .ok_or_else(ServiceError::team_not_found)
    }
}

fn purchase_outcome(err: &ServiceError) -> &'static str {
    match err {
        ServiceError::InsufficientBalance { .. } => "insufficient_balance",
        ServiceError::Conflict(_) => "already_purchased",
        ServiceError::NotFound(_) => "not_found",
        ServiceError::Validation(_) => "invalid",
        _ => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::{Component, ComponentCategory, ComponentType, QuizQuestion};
    use crate::models::team::{Sector, Team};
    use crate::services::memory_store::{MemoryCatalog, MemoryTeamStore};
    use std::collections::HashMap;

    const TEAM_ID: &str = "64b000000000000000000001";

    fn component(id: &str, component_type: ComponentType, price: i64) -> Component {
        Component {
            id: id.to_string(),
            name: format!("Part {}", id),
            component_type,
            icon: "🔧".to_string(),
            description: String::new(),
            price,
            specifications: HashMap::new(),
            is_available: true,
            category: ComponentCategory::Essential,
        }
    }

    fn question(id: &str, correct_answer: i32) -> QuizQuestion {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "question": format!("Question {}", id),
            "options": ["A", "B", "C", "D"],
            "correctAnswer": correct_answer
        }))
        .unwrap()
    }

    async fn service() -> Round1Service {
        let teams = Arc::new(MemoryTeamStore::new());
        teams
            .insert(&Team::new(
                TEAM_ID.to_string(),
                "Quiz Wizards".to_string(),
                vec![],
                Sector::LuminaDistrict,
            ))
            .await
            .unwrap();

        let components = vec![
            component("c1", ComponentType::Sensor, 300),
            component("c2", ComponentType::Signal, 150),
            component("c3", ComponentType::Controller, 400),
            component("c4", ComponentType::Communication, 250),
            component("c5", ComponentType::Cloud, 350),
            component("c6", ComponentType::Actuator, 400),
            component("c7", ComponentType::Cloud, 1500),
        ];
        let questions = (0..12)
            .map(|i| question(&format!("q{:02}", i), i % 4))
            .collect();

        Round1Service::new(
            teams,
            Arc::new(MemoryCatalog::new(components, questions)),
            EventSettings::default(),
        )
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn answers(correct: usize) -> Vec<Option<i32>> {
        (0..12)
            .map(|i| {
                if i < correct {
                    Some(i as i32 % 4)
                } else {
                    Some((i as i32 + 1) % 4)
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn validate_answer_reveals_key_only_when_wrong() {
        let service = service().await;

        let right = service
            .validate_answer(&ValidateAnswerRequest {
                question_index: 1,
                selected_answer: 1,
            })
            .await
            .unwrap();
        assert!(right.is_correct);
        assert_eq!(right.correct_answer, None);
        assert_eq!(right.earned_amount, 100);

        let wrong = service
            .validate_answer(&ValidateAnswerRequest {
                question_index: 1,
                selected_answer: 3,
            })
            .await
            .unwrap();
        assert!(!wrong.is_correct);
        assert_eq!(wrong.correct_answer, Some(1));
        assert_eq!(wrong.earned_amount, 0);

        for index in [-1, 12] {
            let err = service
                .validate_answer(&ValidateAnswerRequest {
                    question_index: index,
                    selected_answer: 0,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn quiz_then_purchase_leaves_remaining_balance_as_score() {
        let service = service().await;

        let quiz = service
            .submit_quiz(&SubmitQuizRequest {
                team_id: TEAM_ID.to_string(),
                answers: answers(8),
            })
            .await
            .unwrap();
        assert_eq!(quiz.correct_answers, 8);
        assert_eq!(quiz.total_balance, 2000);

        let purchase = service
            .purchase(&PurchaseRequest {
                team_id: TEAM_ID.to_string(),
                component_ids: ids(&["c6", "c1", "c2", "c3", "c4", "c5"]),
            })
            .await
            .unwrap();
        assert_eq!(purchase.total_cost, 1850);
        assert_eq!(purchase.remaining_balance, 150);
        assert_eq!(purchase.round1_score, 150);
        assert_eq!(purchase.purchased_components[0].component_id, "c6");

        let round1 = service.round1(TEAM_ID).await.unwrap();
        assert!(round1.submitted);
        assert_eq!(round1.final_score, 150);
    }

    #[tokio::test]
    async fn insufficient_balance_reports_both_amounts_and_changes_nothing() {
        let service = service().await;
        service
            .submit_quiz(&SubmitQuizRequest {
                team_id: TEAM_ID.to_string(),
                answers: answers(0),
            })
            .await
            .unwrap();

        let err = service
            .purchase(&PurchaseRequest {
                team_id: TEAM_ID.to_string(),
                component_ids: ids(&["c1", "c2", "c3", "c4", "c7", "c6"]),
            })
            .await
            .unwrap_err();
        match err {
            ServiceError::InsufficientBalance {
                required,
                available,
            } => {
                assert_eq!(required, 3000);
                assert_eq!(available, 1200);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let round1 = service.round1(TEAM_ID).await.unwrap();
        assert!(!round1.submitted);
        assert_eq!(round1.total_balance, 1200);
        assert!(round1.purchased_components.is_empty());
    }

    #[tokio::test]
    async fn purchase_rejects_wrong_count_and_unknown_ids() {
        let service = service().await;

        let err = service
            .purchase(&PurchaseRequest {
                team_id: TEAM_ID.to_string(),
                component_ids: ids(&["c1", "c2"]),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = service
            .purchase(&PurchaseRequest {
                team_id: TEAM_ID.to_string(),
                component_ids: ids(&["c1", "c2", "c3", "c4", "c5", "nope"]),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = service
            .purchase(&PurchaseRequest {
                team_id: TEAM_ID.to_string(),
                component_ids: ids(&["c1", "c1", "c3", "c4", "c5", "c6"]),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn second_purchase_and_late_quiz_are_conflicts() {
        let service = service().await;
        service
            .submit_quiz(&SubmitQuizRequest {
                team_id: TEAM_ID.to_string(),
                answers: answers(12),
            })
            .await
            .unwrap();
        let all = ids(&["c1", "c2", "c3", "c4", "c5", "c6"]);
        service
            .purchase(&PurchaseRequest {
                team_id: TEAM_ID.to_string(),
                component_ids: all.clone(),
            })
            .await
            .unwrap();

        let err = service
            .purchase(&PurchaseRequest {
                team_id: TEAM_ID.to_string(),
                component_ids: all,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let err = service
            .submit_quiz(&SubmitQuizRequest {
                team_id: TEAM_ID.to_string(),
                answers: answers(12),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(service.round1(TEAM_ID).await.unwrap().final_score, 550);
    }

    #[tokio::test]
    async fn missing_team_id_fails_request_validation() {
        let service = service().await;

        let err = service
            .submit_quiz(&SubmitQuizRequest {
                team_id: String::new(),
                answers: answers(12),
            })
            .await
            .unwrap_err();
        assert!(matches!(&err, ServiceError::Validation(msg) if msg.contains("Team ID is required")));

        let err = service
            .purchase(&PurchaseRequest {
                team_id: String::new(),
                component_ids: ids(&["c1", "c2", "c3", "c4", "c5", "c6"]),
            })
            .await
            .unwrap_err();
        assert!(matches!(&err, ServiceError::Validation(msg) if msg.contains("Team ID is required")));
    }

    #[tokio::test]
    async fn unknown_team_is_not_found() {
        let service = service().await;
        let err = service
            .submit_quiz(&SubmitQuizRequest {
                team_id: "64b0000000000000000000ff".to_string(),
                answers: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
