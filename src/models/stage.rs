use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParseError;
use super::normalize_token;

/// Production pipeline stage of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionStage {
    Intake,
    Scheduling,
    Scheduled,
    Inspected,
    Correction,
    Finalization,
    ReadyForDelivery,
    Delivered,
    Revision,
    Workfile,
    OnHold,
    Cancelled,
}

impl ProductionStage {
    /// Pipeline order
    pub const ALL: [ProductionStage; 12] = [
        ProductionStage::Intake,
        ProductionStage::Scheduling,
        ProductionStage::Scheduled,
        ProductionStage::Inspected,
        ProductionStage::Correction,
        ProductionStage::Finalization,
        ProductionStage::ReadyForDelivery,
        ProductionStage::Delivered,
        ProductionStage::Revision,
        ProductionStage::Workfile,
        ProductionStage::OnHold,
        ProductionStage::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionStage::Intake => "INTAKE",
            ProductionStage::Scheduling => "SCHEDULING",
            ProductionStage::Scheduled => "SCHEDULED",
            ProductionStage::Inspected => "INSPECTED",
            ProductionStage::Correction => "CORRECTION",
            ProductionStage::Finalization => "FINALIZATION",
            ProductionStage::ReadyForDelivery => "READY_FOR_DELIVERY",
            ProductionStage::Delivered => "DELIVERED",
            ProductionStage::Revision => "REVISION",
            ProductionStage::Workfile => "WORKFILE",
            ProductionStage::OnHold => "ON_HOLD",
            ProductionStage::Cancelled => "CANCELLED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductionStage::Intake => "Intake",
            ProductionStage::Scheduling => "Scheduling",
            ProductionStage::Scheduled => "Scheduled",
            ProductionStage::Inspected => "Inspected",
            ProductionStage::Correction => "Correction",
            ProductionStage::Finalization => "Finalization",
            ProductionStage::ReadyForDelivery => "Ready for Delivery",
            ProductionStage::Delivered => "Delivered",
            ProductionStage::Revision => "Revision",
            ProductionStage::Workfile => "Workfile",
            ProductionStage::OnHold => "On Hold",
            ProductionStage::Cancelled => "Cancelled",
        }
    }

    /// Parse a stored or user-typed stage name.
    /// Accepts any case and `-`/space in place of `_`.
    pub fn from_str(s: &str) -> Option<Self> {
        let token = normalize_token(s);
        Self::ALL.iter().copied().find(|stage| stage.as_str() == token)
    }

    pub fn parse(s: &str) -> Result<Self, ParseError> {
        Self::from_str(s).ok_or_else(|| ParseError::UnknownStage(s.to_string()))
    }
}

impl fmt::Display for ProductionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
