use rusqlite::{Connection, OptionalExtension, Row};
use crate::models::{ProductionCard, ProductionStage};
use anyhow::{Context, Result};

const CARD_COLUMNS: &str = "id, uuid, org_id, order_number, property_address, current_stage, due_ts, created_ts, modified_ts";

/// Production card repository
pub struct CardRepo;

impl CardRepo {
    /// Create a card for an org
    pub fn create(
        conn: &Connection,
        org_id: &str,
        order_number: Option<&str>,
        property_address: Option<&str>,
        stage: ProductionStage,
        due_ts: Option<i64>,
    ) -> Result<ProductionCard> {
        let mut card = ProductionCard::new(org_id.to_string());
        card.order_number = order_number.map(str::to_string);
        card.property_address = property_address.map(str::to_string);
        card.current_stage = Some(stage);
        card.due_ts = due_ts;

        conn.execute(
            "INSERT INTO production_cards (uuid, org_id, order_number, property_address,
                    current_stage, due_ts, created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                card.uuid,
                card.org_id,
                card.order_number,
                card.property_address,
                stage.as_str(),
                card.due_ts,
                card.created_ts,
                card.modified_ts,
            ],
        )
        .with_context(|| format!("Failed to create production card for org '{}'", org_id))?;

        let id = conn.last_insert_rowid();
        log::debug!("Created card {} ({}) in org {}", id, card.uuid, org_id);
        Ok(ProductionCard {
            id: Some(id),
            ..card
        })
    }

    /// Get a card by ID, only if it belongs to the org
    pub fn get_by_id(conn: &Connection, org_id: &str, id: i64) -> Result<Option<ProductionCard>> {
        let sql = format!(
            "SELECT {} FROM production_cards WHERE id = ?1 AND org_id = ?2",
            CARD_COLUMNS
        );
        let card = conn
            .query_row(&sql, rusqlite::params![id, org_id], Self::from_row)
            .optional()?;
        Ok(card)
    }

    /// List the org's cards ordered by ID
    pub fn list(conn: &Connection, org_id: &str) -> Result<Vec<ProductionCard>> {
        let sql = format!(
            "SELECT {} FROM production_cards WHERE org_id = ?1 ORDER BY id",
            CARD_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([org_id], Self::from_row)?;

        let mut cards = Vec::new();
        for row in rows {
            cards.push(row?);
        }
        Ok(cards)
    }

    /// Move a card to another pipeline stage
    pub fn set_stage(conn: &Connection, org_id: &str, id: i64, stage: ProductionStage) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn
            .execute(
                "UPDATE production_cards SET current_stage = ?1, modified_ts = ?2
                 WHERE id = ?3 AND org_id = ?4",
                rusqlite::params![stage.as_str(), now, id, org_id],
            )
            .with_context(|| format!("Failed to update stage of card {}", id))?;

        if updated == 0 {
            anyhow::bail!("Card {} not found", id);
        }
        log::info!("Card {} moved to {}", id, stage);
        Ok(())
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<ProductionCard> {
        let uuid: String = row.get(1)?;
        let stage_raw: String = row.get(5)?;
        let current_stage = ProductionStage::from_str(&stage_raw);
        if current_stage.is_none() {
            log::warn!("Card {} has unrecognized stage '{}'", uuid, stage_raw);
        }
        Ok(ProductionCard {
            id: Some(row.get(0)?),
            uuid,
            org_id: row.get(2)?,
            order_number: row.get(3)?,
            property_address: row.get(4)?,
            current_stage,
            due_ts: row.get(6)?,
            created_ts: row.get(7)?,
            modified_ts: row.get(8)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;

    #[test]
    fn test_create_and_get() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let card = CardRepo::create(&conn, "acme", Some("A-1"), Some("1 Main St"), ProductionStage::Intake, None).unwrap();
        let id = card.id.unwrap();

        let loaded = CardRepo::get_by_id(&conn, "acme", id).unwrap().unwrap();
        assert_eq!(loaded, card);
        assert_eq!(loaded.current_stage, Some(ProductionStage::Intake));
    }

    #[test]
    fn test_cards_are_scoped_by_org() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let card = CardRepo::create(&conn, "acme", None, None, ProductionStage::Intake, None).unwrap();
        CardRepo::create(&conn, "other", None, None, ProductionStage::Scheduled, None).unwrap();

        assert!(CardRepo::get_by_id(&conn, "other", card.id.unwrap()).unwrap().is_none());
        assert_eq!(CardRepo::list(&conn, "acme").unwrap().len(), 1);
        assert_eq!(CardRepo::list(&conn, "other").unwrap().len(), 1);
        assert!(CardRepo::set_stage(&conn, "other", card.id.unwrap(), ProductionStage::Correction).is_err());
    }

    #[test]
    fn test_set_stage() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let card = CardRepo::create(&conn, "acme", None, None, ProductionStage::Inspected, None).unwrap();
        CardRepo::set_stage(&conn, "acme", card.id.unwrap(), ProductionStage::Correction).unwrap();
        let loaded = CardRepo::get_by_id(&conn, "acme", card.id.unwrap()).unwrap().unwrap();
        assert_eq!(loaded.current_stage, Some(ProductionStage::Correction));
    }

    #[test]
    fn test_unknown_stage_loads_as_none() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let card = CardRepo::create(&conn, "acme", None, None, ProductionStage::Intake, None).unwrap();
        conn.execute(
            "UPDATE production_cards SET current_stage = 'QA_REVIEW' WHERE id = ?1",
            [card.id.unwrap()],
        )
        .unwrap();
        let loaded = CardRepo::get_by_id(&conn, "acme", card.id.unwrap()).unwrap().unwrap();
        assert_eq!(loaded.current_stage, None);
    }
}
