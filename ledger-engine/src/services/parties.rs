//! Party resolution: one active row per (business, normalized name).

use crate::models::{Party, PartyType};
use crate::services::database::Database;
use crate::services::signature::normalize_text;
use ledger_core::error::AppError;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Get-or-create resolver for counterparties. The lookup key is the
/// name normalized exactly as the signature engine normalizes it, so
/// "TechCorp", "TECHCORP" and " Tech Corp " all resolve to one party.
/// Safe under concurrent callers: the unique constraint on
/// (business_id, normalized_name) turns the losing insert into a
/// re-fetch, never a second row.
#[derive(Clone)]
pub struct PartyResolver {
    db: Database,
}

impl PartyResolver {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[instrument(skip(self), fields(business_id = %business_id, name = %raw_name))]
    pub async fn get_or_create(
        &self,
        business_id: Uuid,
        raw_name: &str,
    ) -> Result<Party, AppError> {
        let display_name = raw_name.trim();
        let normalized = normalize_text(raw_name);
        if normalized.is_empty() {
            return Err(AppError::Validation("Party name is empty".to_string()));
        }

        if let Some(existing) = self
            .db
            .find_party_by_normalized(business_id, &normalized)
            .await?
        {
            return Ok(existing);
        }

        match self
            .db
            .insert_party(business_id, display_name, &normalized, PartyType::Customer)
            .await
        {
            Ok(party) => Ok(party),
            Err(e) if e.is_conflict() => {
                // Another writer created the row between our lookup and
                // insert; take theirs.
                debug!("Party insert conflicted, re-fetching");
                self.db
                    .find_party_by_normalized(business_id, &normalized)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(anyhow::anyhow!(
                            "Party '{}' missing after insert conflict",
                            display_name
                        ))
                    })
            }
            Err(e) => Err(e),
        }
    }
}
