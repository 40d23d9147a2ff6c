//! Catalog queries
//!
//! Annotates each product with the dominant emotion of its reviews and
//! filters the listing by that value. Nothing is cached: every query
//! recomputes from the current store contents.

use sentishop_common::{ProductWithEmotion, Review};

use crate::store::RecordStore;

/// Emotion reported for a product that has no reviews
pub const NO_REVIEWS: &str = "No reviews";

/// Most frequent emotion label among `reviews`
///
/// Ties go to the label whose first occurrence comes earliest in the
/// sequence. An empty sequence yields [`NO_REVIEWS`].
pub fn dominant_emotion<'a, I>(reviews: I) -> String
where
    I: IntoIterator<Item = &'a Review>,
{
    // (label, count) in first-seen order
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for review in reviews {
        match counts.iter_mut().find(|(label, _)| *label == review.emotion) {
            Some((_, count)) => *count += 1,
            None => counts.push((review.emotion.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (label, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((label, count));
        }
    }

    best.map(|(label, _)| label.to_string())
        .unwrap_or_else(|| NO_REVIEWS.to_string())
}

/// Normalized form of an `emotion` query value
///
/// The value is compared case-insensitively but otherwise as given; an
/// empty value means no filter.
fn normalize_filter(emotion_filter: Option<&str>) -> Option<String> {
    emotion_filter.filter(|f| !f.is_empty()).map(str::to_lowercase)
}

/// Annotate every product with its dominant emotion, optionally filtered
///
/// Output keeps product insertion order.
pub async fn list_products(
    store: &RecordStore,
    emotion_filter: Option<&str>,
) -> Vec<ProductWithEmotion> {
    let filter = normalize_filter(emotion_filter);

    let mut listed = Vec::new();
    for product in store.all_products().await {
        let emotion = dominant_emotion(&store.reviews_for(&product.id).await);
        if let Some(wanted) = &filter {
            if emotion.to_lowercase() != *wanted {
                continue;
            }
        }
        listed.push(ProductWithEmotion::new(&product, emotion));
    }
    listed
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentishop_common::{time, uuid_utils, Product};

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            category: "jersey".to_string(),
            price: 100000.0,
            image_url: format!("/uploads/{}.jpg", id),
            created_at: time::now(),
        }
    }

    fn review(product_id: &str, emotion: &str) -> Review {
        Review {
            id: uuid_utils::generate_string(),
            product_id: product_id.to_string(),
            comment: "comment".to_string(),
            emotion: emotion.to_string(),
            score: 0.9,
            created_at: time::now(),
        }
    }

    fn emotions(reviews: &[Review]) -> String {
        dominant_emotion(reviews)
    }

    #[test]
    fn test_no_reviews_sentinel() {
        assert_eq!(emotions(&[]), NO_REVIEWS);
    }

    #[test]
    fn test_single_label() {
        let reviews = vec![review("p", "NEGATIVE"), review("p", "NEGATIVE")];
        assert_eq!(emotions(&reviews), "NEGATIVE");
    }

    #[test]
    fn test_majority_wins() {
        let reviews = vec![review("p", "A"), review("p", "B"), review("p", "A")];
        assert_eq!(emotions(&reviews), "A");
    }

    #[test]
    fn test_majority_wins_even_when_seen_later() {
        let reviews = vec![review("p", "B"), review("p", "A"), review("p", "A")];
        assert_eq!(emotions(&reviews), "A");
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let reviews = vec![review("p", "B"), review("p", "A")];
        assert_eq!(emotions(&reviews), "B");

        let reviews = vec![
            review("p", "NEGATIVE"),
            review("p", "POSITIVE"),
            review("p", "POSITIVE"),
            review("p", "NEGATIVE"),
        ];
        assert_eq!(emotions(&reviews), "NEGATIVE");
    }

    #[test]
    fn test_labels_are_case_sensitive_when_counting() {
        let reviews = vec![review("p", "positive"), review("p", "POSITIVE"), review("p", "POSITIVE")];
        assert_eq!(emotions(&reviews), "POSITIVE");
    }

    async fn store_with(products: &[&str], reviews: &[(&str, &str)]) -> RecordStore {
        let store = RecordStore::new();
        for id in products {
            store.append_product(product(id)).await;
        }
        for (product_id, emotion) in reviews {
            store.append_review(review(product_id, emotion)).await;
        }
        store
    }

    #[tokio::test]
    async fn test_list_annotates_every_product() {
        let store = store_with(&["p1", "p2"], &[("p1", "POSITIVE")]).await;

        let listed = list_products(&store, None).await;

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].emotion, "POSITIVE");
        assert_eq!(listed[1].emotion, NO_REVIEWS);
    }

    #[tokio::test]
    async fn test_filter_is_case_insensitive_and_order_preserving() {
        let store = store_with(
            &["p1", "p2", "p3", "p4"],
            &[
                ("p3", "POSITIVE"),
                ("p2", "NEGATIVE"),
                ("p1", "POSITIVE"),
                ("p1", "NEGATIVE"),
                ("p1", "POSITIVE"),
            ],
        )
        .await;

        let listed = list_products(&store, Some("positive")).await;
        let ids: Vec<&str> = listed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);

        let unfiltered = list_products(&store, None).await;
        let positions: Vec<usize> = ids
            .iter()
            .map(|id| unfiltered.iter().position(|p| p.id == *id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_filter_matches_no_reviews_sentinel() {
        let store = store_with(&["p1", "p2"], &[("p1", "NEGATIVE")]).await;

        let listed = list_products(&store, Some("no REVIEWS")).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "p2");
    }

    #[tokio::test]
    async fn test_empty_filter_is_ignored() {
        let store = store_with(&["p1"], &[]).await;
        assert_eq!(list_products(&store, Some("")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_filter_is_not_trimmed() {
        let store = store_with(&["p1"], &[("p1", "POSITIVE")]).await;

        assert!(list_products(&store, Some(" positive ")).await.is_empty());
        assert!(list_products(&store, Some(" ")).await.is_empty());
        assert_eq!(list_products(&store, Some("Positive")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_dangling_reviews_do_not_appear() {
        let store = store_with(&["p1"], &[("ghost", "NEGATIVE")]).await;

        let listed = list_products(&store, None).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].emotion, NO_REVIEWS);
    }

    #[tokio::test]
    async fn test_listing_follows_new_reviews() {
        let store = store_with(&["p1"], &[]).await;
        assert_eq!(list_products(&store, None).await[0].emotion, NO_REVIEWS);

        store.append_review(review("p1", "POSITIVE")).await;
        assert_eq!(list_products(&store, None).await[0].emotion, "POSITIVE");
    }
}
