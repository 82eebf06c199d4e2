use crate::backend::{BackendGateway, SubResourceKind};
use crate::model::PlaceRecord;

/// Counts from publishing one place's promotions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromotionTally {
    pub posted: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Posts every complete promotion of `place` under `place_id`
///
/// Promotions without a title, a description or hours are skipped.
/// Failures are logged and counted; they never fail the place.
pub async fn publish_promotions<G: BackendGateway + ?Sized>(
    gateway: &G,
    place_id: i64,
    place: &PlaceRecord,
) -> PromotionTally {
    let mut tally = PromotionTally::default();

    for promotion in place.promotion_data.iter().flatten() {
        if !promotion.is_publishable() {
            tracing::warn!(
                place_id,
                title = %promotion.title,
                "Skipping promotion without description or hours"
            );
            tally.skipped += 1;
            continue;
        }

        let data = match serde_json::to_value(promotion) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(place_id, "Cannot encode promotion: {}", e);
                tally.failed += 1;
                continue;
            }
        };

        match gateway
            .create_sub_resource(place_id, SubResourceKind::Promotions, &data)
            .await
        {
            Ok(status) => {
                tracing::info!(place_id, status, title = %promotion.title, "Posted promotion");
                tally.posted += 1;
            }
            Err(e) => {
                tracing::warn!(place_id, title = %promotion.title, "Promotion post failed: {}", e);
                tally.failed += 1;
            }
        }
    }

    tally
}
