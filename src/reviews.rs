//! Reviews on the property detail page.

use tracing::warn;

use crate::forms::{Field, FieldErrors, Outcome, Toast};
use crate::graphql::GraphQlClient;
use crate::models::Review;

const MAX_COMMENT_LEN: usize = 1000;

/// Aggregate shown above the review list
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSummary {
    pub count: usize,
    /// `None` when there are no reviews
    pub average: Option<f32>,
    /// Counts for 1..=5 stars
    pub histogram: [usize; 5],
}

impl ReviewSummary {
    /// Ratings outside 1..=5 are ignored.
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let mut histogram = [0usize; 5];
        let mut sum = 0u32;
        let mut count = 0usize;

        for review in reviews.iter().filter(|r| (1..=5).contains(&r.rating)) {
            histogram[usize::from(review.rating - 1)] += 1;
            sum += u32::from(review.rating);
            count += 1;
        }

        #[allow(clippy::cast_precision_loss)]
        let average = (count > 0).then(|| sum as f32 / count as f32);
        Self {
            count,
            average,
            histogram,
        }
    }
}

/// Newest first.
pub fn sort_newest_first(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[derive(Debug, Default)]
pub struct ReviewDraft {
    pub rating: u8,
    pub comment: String,
    errors: FieldErrors,
}

impl ReviewDraft {
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn validate(&mut self) -> bool {
        let mut errors = FieldErrors::default();
        if !(1..=5).contains(&self.rating) {
            errors.insert(Field::Rating, "Choose a rating from 1 to 5 stars");
        }
        if self.comment.chars().count() > MAX_COMMENT_LEN {
            errors.insert(Field::Comment, "Review is too long");
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    pub async fn submit(&mut self, property_id: &str, client: &GraphQlClient) -> Outcome {
        if !self.validate() {
            return Outcome::Invalid;
        }
        match client.add_review(property_id, self.rating, self.comment.trim()).await {
            Ok(_) => {
                self.rating = 0;
                self.comment.clear();
                Outcome::Navigate(format!("/properties/{property_id}#reviews"))
            }
            Err(err) => {
                warn!("addReview failed: {}", err);
                Outcome::Failed(Toast::error("Could not post review", &err))
            }
        }
    }
}
