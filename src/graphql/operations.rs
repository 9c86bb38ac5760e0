//! Typed wrappers for every operation the app sends to the backend.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use crate::graphql::client::GraphQlClient;
use crate::models::{Property, PropertyInput, PropertyType, Review, User};

const PROPERTY_FIELDS: &str = "id name propertyType price bedrooms bathrooms area address city state \
description amenities images latitude longitude forSale forRent isActive isFeatured agentId \
averageRating createdAt";

const USER_FIELDS: &str = "id fullName phone email role";

/// Browse filters, sent as query variables and reusable client-side
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub for_sale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub for_rent: Option<bool>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub featured_only: bool,
}

impl PropertyFilter {
    pub fn matches(&self, property: &Property) -> bool {
        if !property.is_active {
            return false;
        }
        if let Some(city) = &self.city {
            if !property.city.eq_ignore_ascii_case(city) {
                return false;
            }
        }
        if self.property_type.is_some_and(|t| t != property.property_type) {
            return false;
        }
        if self.min_price.is_some_and(|min| property.price < min)
            || self.max_price.is_some_and(|max| property.price > max)
        {
            return false;
        }
        if self.min_bedrooms.is_some_and(|min| property.bedrooms < min) {
            return false;
        }
        if self.for_sale == Some(true) && !property.for_sale {
            return false;
        }
        if self.for_rent == Some(true) && !property.for_rent {
            return false;
        }
        !self.featured_only || property.is_featured
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPage {
    pub items: Vec<Property>,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub phone: String,
    pub verification_token: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
}

/// Tokens and account returned by `register` and `signIn`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: User,
}

#[derive(Deserialize)]
struct PropertiesData {
    properties: PropertyPage,
}

#[derive(Deserialize)]
struct PropertyData {
    property: Option<Property>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePropertyData {
    create_property: Property,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePropertyData {
    update_property: Property,
}

#[derive(Deserialize)]
struct ReviewsData {
    reviews: Vec<Review>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddReviewData {
    add_review: Review,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendOtpData {
    send_otp: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOtpData {
    verify_otp: VerifyOtpPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOtpPayload {
    verification_token: String,
}

#[derive(Deserialize)]
struct RegisterData {
    register: AuthPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInData {
    sign_in: AuthPayload,
}

#[derive(Deserialize)]
struct MeData {
    me: Option<User>,
}

impl GraphQlClient {
    pub async fn properties(&self, filter: &PropertyFilter, page: u32, limit: u32) -> Result<PropertyPage> {
        let query = format!(
            "query Properties($filter: PropertyFilter, $page: Int!, $limit: Int!) {{ \
             properties(filter: $filter, page: $page, limit: $limit) {{ total items {{ {PROPERTY_FIELDS} }} }} }}"
        );
        let data: PropertiesData = self
            .execute("Properties", &query, json!({ "filter": filter, "page": page, "limit": limit }))
            .await?;
        Ok(data.properties)
    }

    pub async fn property(&self, id: &str) -> Result<Option<Property>> {
        let query = format!("query Property($id: ID!) {{ property(id: $id) {{ {PROPERTY_FIELDS} }} }}");
        let data: PropertyData = self.execute("Property", &query, json!({ "id": id })).await?;
        Ok(data.property)
    }

    pub async fn create_property(&self, input: &PropertyInput) -> Result<Property> {
        let query = format!(
            "mutation CreateProperty($input: PropertyInput!) {{ createProperty(input: $input) {{ {PROPERTY_FIELDS} }} }}"
        );
        let data: CreatePropertyData = self
            .execute("CreateProperty", &query, json!({ "input": input }))
            .await?;
        Ok(data.create_property)
    }

    pub async fn update_property(&self, id: &str, input: &PropertyInput) -> Result<Property> {
        let query = format!(
            "mutation UpdateProperty($id: ID!, $input: PropertyInput!) {{ \
             updateProperty(id: $id, input: $input) {{ {PROPERTY_FIELDS} }} }}"
        );
        let data: UpdatePropertyData = self
            .execute("UpdateProperty", &query, json!({ "id": id, "input": input }))
            .await?;
        Ok(data.update_property)
    }

    pub async fn reviews(&self, property_id: &str) -> Result<Vec<Review>> {
        let query = "query Reviews($propertyId: ID!) { reviews(propertyId: $propertyId) { \
                     id propertyId authorName rating comment createdAt } }";
        let data: ReviewsData = self
            .execute("Reviews", query, json!({ "propertyId": property_id }))
            .await?;
        Ok(data.reviews)
    }

    pub async fn add_review(&self, property_id: &str, rating: u8, comment: &str) -> Result<Review> {
        let query = "mutation AddReview($propertyId: ID!, $rating: Int!, $comment: String!) { \
                     addReview(propertyId: $propertyId, rating: $rating, comment: $comment) { \
                     id propertyId authorName rating comment createdAt } }";
        let data: AddReviewData = self
            .execute(
                "AddReview",
                query,
                json!({ "propertyId": property_id, "rating": rating, "comment": comment }),
            )
            .await?;
        Ok(data.add_review)
    }

    pub async fn send_otp(&self, phone: &str) -> Result<bool> {
        let data: SendOtpData = self
            .execute(
                "SendOtp",
                "mutation SendOtp($phone: String!) { sendOtp(phone: $phone) }",
                json!({ "phone": phone }),
            )
            .await?;
        Ok(data.send_otp)
    }

    /// Returns the verification token the `register` mutation expects.
    pub async fn verify_otp(&self, phone: &str, code: &str) -> Result<String> {
        let data: VerifyOtpData = self
            .execute(
                "VerifyOtp",
                "mutation VerifyOtp($phone: String!, $code: String!) { \
                 verifyOtp(phone: $phone, code: $code) { verificationToken } }",
                json!({ "phone": phone, "code": code }),
            )
            .await?;
        Ok(data.verify_otp.verification_token)
    }

    pub async fn register(&self, input: &RegisterInput) -> Result<AuthPayload> {
        let query = format!(
            "mutation Register($input: RegisterInput!) {{ register(input: $input) {{ \
             accessToken refreshToken user {{ {USER_FIELDS} }} }} }}"
        );
        let data: RegisterData = self.execute("Register", &query, json!({ "input": input })).await?;
        Ok(data.register)
    }

    pub async fn sign_in(&self, identifier: &str, password: &str) -> Result<AuthPayload> {
        let query = format!(
            "mutation SignIn($identifier: String!, $password: String!) {{ \
             signIn(identifier: $identifier, password: $password) {{ \
             accessToken refreshToken user {{ {USER_FIELDS} }} }} }}"
        );
        let data: SignInData = self
            .execute(
                "SignIn",
                &query,
                json!({ "identifier": identifier, "password": password }),
            )
            .await?;
        Ok(data.sign_in)
    }

    pub async fn me(&self) -> Result<Option<User>> {
        let query = format!("query Me {{ me {{ {USER_FIELDS} }} }}");
        let data: MeData = self.execute("Me", &query, json!({})).await?;
        Ok(data.me)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::property;

    #[test]
    fn filter_serializes_only_set_fields() {
        let filter = PropertyFilter {
            city: Some("Lalitpur".into()),
            min_bedrooms: Some(2),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({ "city": "Lalitpur", "minBedrooms": 2 })
        );
    }

    #[test]
    fn filter_matches_client_side() {
        let home = property("p1", None, None);
        let mut filter = PropertyFilter {
            city: Some("lalitpur".into()),
            max_price: Some(30_000_000),
            for_sale: Some(true),
            ..Default::default()
        };
        assert!(filter.matches(&home));

        filter.for_rent = Some(true);
        assert!(!filter.matches(&home));

        let mut inactive = home.clone();
        inactive.is_active = false;
        assert!(!PropertyFilter::default().matches(&inactive));
    }
}
