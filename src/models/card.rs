use serde::{Deserialize, Serialize};

use super::ProductionStage;

/// Production card: an appraisal order moving through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCard {
    pub id: Option<i64>,
    pub uuid: String,
    pub org_id: String,
    pub order_number: Option<String>,
    pub property_address: Option<String>,
    /// `None` when the stored stage is not one we know
    pub current_stage: Option<ProductionStage>,
    pub due_ts: Option<i64>,
    pub created_ts: i64,
    pub modified_ts: i64,
}

impl ProductionCard {
    /// Create a new card in the intake stage
    pub fn new(org_id: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: None,
            uuid: uuid::Uuid::new_v4().to_string(),
            org_id,
            order_number: None,
            property_address: None,
            current_stage: Some(ProductionStage::Intake),
            due_ts: None,
            created_ts: now,
            modified_ts: now,
        }
    }
}

/// The slice of a card the board needs next to each task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummary {
    pub id: i64,
    pub order_number: Option<String>,
    pub property_address: Option<String>,
    pub current_stage: Option<ProductionStage>,
}

impl CardSummary {
    pub fn is_in_correction(&self) -> bool {
        self.current_stage == Some(ProductionStage::Correction)
    }
}
