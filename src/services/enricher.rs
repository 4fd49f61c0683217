//! Place enrichment and merge policy.
//!
//! Every landmark and restaurant block is offered to the place catalog
//! for ratings, addresses, identifiers, websites, photos and editorial
//! descriptions. The merge never clobbers a description the caller
//! already wrote: an existing description survives when it is long enough
//! and not a generic placeholder. A failed lookup degrades to the
//! original block; a single unreachable place must not cost the day.

use tracing::{debug, warn};

use crate::api::{Block, BlockKind};
use crate::providers::{with_retry, Deadline, PlaceCatalog, PlaceDetails, PlaceQuery, RetryBudget};

/// Minimum length for a landmark description to be considered sufficient.
pub const MIN_LANDMARK_DESCRIPTION: usize = 20;
/// Minimum length for a restaurant description, when one is present.
pub const MIN_RESTAURANT_DESCRIPTION: usize = 15;

const GENERIC_PLACEHOLDERS: &[&str] = &[
    "landmark",
    "restaurant",
    "attraction",
    "place to visit",
    "point of interest",
];

/// Whether a description is a bare generic placeholder.
pub fn is_generic_description(text: &str) -> bool {
    let trimmed = text.trim().to_lowercase();
    GENERIC_PLACEHOLDERS.contains(&trimmed.as_str())
}

/// Stored photo references are exposed through the proxy path; clients
/// never see raw references.
pub fn photo_proxy_url(reference: &str) -> String {
    format!("/photo-proxy/{reference}?maxwidth=400&maxheight=400")
}

/// Drop ratings outside the valid 1.0–5.0 range.
pub fn sanitize_rating(rating: Option<f64>) -> Option<f64> {
    rating.filter(|r| (1.0..=5.0).contains(r))
}

/// Whether an existing description is good enough to keep as-is.
fn description_sufficient(block: &Block) -> bool {
    let min_len = match block.kind {
        BlockKind::Landmark => MIN_LANDMARK_DESCRIPTION,
        BlockKind::Restaurant => MIN_RESTAURANT_DESCRIPTION,
    };
    let text = block.description.trim();
    text.len() >= min_len && !is_generic_description(text)
}

/// Merge catalog details into a block.
///
/// Identifier, rating, address, website, photo and coordinates are
/// adopted unconditionally when present. The description is only replaced
/// when the existing one is insufficient and the editorial text is an
/// improvement.
pub fn merge_place_details(block: &Block, details: &PlaceDetails) -> Block {
    let mut merged = block.clone();

    merged.place_id = Some(details.place_id.clone());
    merged.rating = sanitize_rating(details.rating).or(merged.rating);
    if details.address.is_some() {
        merged.address = details.address.clone();
    }
    if details.website.is_some() {
        merged.website = details.website.clone();
    }
    if let Some(reference) = &details.photo_reference {
        merged.photo_url = Some(photo_proxy_url(reference));
    }
    if details.location.is_some() {
        merged.location = details.location;
    }

    if !description_sufficient(block) {
        if let Some(editorial) = &details.editorial_description {
            let editorial = editorial.trim();
            if editorial.len() > block.description.trim().len()
                && !is_generic_description(editorial)
            {
                merged.description = editorial.to_string();
            }
        }
    }

    merged
}

/// Enrich a single block through the place catalog.
///
/// Blocks that already carry a place id (restaurants picked straight from
/// the catalog) are returned untouched. Lookup failure or a missing match
/// leaves the block with whatever fields it already had.
pub async fn enhance_block(
    block: &Block,
    destination: &str,
    catalog: &dyn PlaceCatalog,
    budget: &RetryBudget,
    deadline: &Deadline,
) -> Block {
    if block.place_id.is_some() {
        return block.clone();
    }

    let query = PlaceQuery {
        name: block.name.clone(),
        location: block.location,
        destination: destination.to_string(),
    };

    match with_retry("lookup_place", budget, deadline, || {
        catalog.lookup_place(&query)
    })
    .await
    {
        Ok(Some(details)) => {
            debug!(name = %block.name, place_id = %details.place_id, "enriched block");
            merge_place_details(block, &details)
        }
        Ok(None) => {
            debug!(name = %block.name, "no catalog match");
            block.clone()
        }
        Err(error) => {
            warn!(name = %block.name, %error, "enrichment degraded");
            block.clone()
        }
    }
}
