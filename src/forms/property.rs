use tracing::{info, warn};

use crate::forms::{Field, FieldErrors, Outcome, Toast};
use crate::graphql::GraphQlClient;
use crate::models::{Property, PropertyInput, AMENITIES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { property_id: String },
}

/// List/edit property form
#[derive(Debug, Clone)]
pub struct PropertyForm {
    mode: FormMode,
    input: PropertyInput,
    errors: FieldErrors,
}

impl Default for PropertyForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyForm {
    pub fn new() -> Self {
        Self {
            mode: FormMode::Create,
            input: PropertyInput::default(),
            errors: FieldErrors::default(),
        }
    }

    /// Pre-filled from an existing listing.
    pub fn edit(property: &Property) -> Self {
        Self {
            mode: FormMode::Edit {
                property_id: property.id.clone(),
            },
            input: PropertyInput::from(property),
            errors: FieldErrors::default(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn input(&self) -> &PropertyInput {
        &self.input
    }

    /// Edit fields directly; validation runs again on submit.
    pub fn input_mut(&mut self) -> &mut PropertyInput {
        &mut self.input
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Price as typed. Anything that is not a whole number becomes 0 and
    /// fails validation.
    pub fn set_price_text(&mut self, text: &str) {
        let cleaned: String = text.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
        self.input.price = cleaned.parse().unwrap_or(0);
        self.errors.clear(Field::Price);
    }

    /// Add the amenity if absent, remove it if present.
    pub fn toggle_amenity(&mut self, amenity: &str) {
        if let Some(pos) = self.input.amenities.iter().position(|a| a == amenity) {
            self.input.amenities.remove(pos);
        } else {
            self.input.amenities.push(amenity.to_string());
        }
    }

    pub fn has_amenity(&self, amenity: &str) -> bool {
        self.input.amenities.iter().any(|a| a == amenity)
    }

    /// Checkbox rows for the amenity picker, in display order. Amenities
    /// carried over from an edited listing but no longer offered come last.
    pub fn amenity_choices(&self) -> Vec<(&str, bool)> {
        let mut choices: Vec<(&str, bool)> = AMENITIES
            .iter()
            .map(|amenity| (*amenity, self.has_amenity(amenity)))
            .collect();
        choices.extend(
            self.input
                .amenities
                .iter()
                .filter(|a| !AMENITIES.contains(&a.as_str()))
                .map(|a| (a.as_str(), true)),
        );
        choices
    }

    /// Recompute field errors. Returns `true` when the form may be submitted.
    pub fn validate(&mut self) -> bool {
        let mut errors = FieldErrors::default();
        let input = &self.input;

        if input.name.trim().is_empty() {
            errors.insert(Field::Name, "Property name is required");
        }
        if input.price <= 0 {
            errors.insert(Field::Price, "Valid price is required");
        }
        if input.city.trim().is_empty() {
            errors.insert(Field::City, "City is required");
        }
        if input.state.trim().is_empty() {
            errors.insert(Field::State, "State is required");
        }
        if input.address.trim().is_empty() {
            errors.insert(Field::Address, "Address is required");
        }
        if !input.for_sale && !input.for_rent {
            errors.insert(Field::ListingKind, "Select at least one of For Sale or For Rent");
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Validate, then create or update through the backend.
    pub async fn submit(&mut self, client: &GraphQlClient) -> Outcome {
        if !self.validate() {
            return Outcome::Invalid;
        }

        let result = match &self.mode {
            FormMode::Create => client.create_property(&self.input).await,
            FormMode::Edit { property_id } => client.update_property(property_id, &self.input).await,
        };

        match result {
            Ok(property) => {
                info!("Saved property {} ({})", property.id, property.name);
                Outcome::Navigate(format!("/properties/{}", property.id))
            }
            Err(err) => {
                warn!("Saving property failed: {}", err);
                let title = match self.mode {
                    FormMode::Create => "Could not create listing",
                    FormMode::Edit { .. } => "Could not update listing",
                };
                Outcome::Failed(Toast::error(title, &err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::property;

    fn filled() -> PropertyForm {
        let mut form = PropertyForm::new();
        let input = form.input_mut();
        input.name = "Garden House".into();
        input.city = "Lalitpur".into();
        input.state = "Bagmati".into();
        input.address = "Sanepa".into();
        input.for_sale = true;
        form.set_price_text("1,25,00,000");
        form
    }

    #[test]
    fn complete_form_validates() {
        let mut form = filled();
        assert_eq!(form.input().price, 12_500_000);
        assert!(form.validate());
    }

    #[test]
    fn zero_price_blocks_submission() {
        let mut form = filled();
        form.set_price_text("0");
        assert!(!form.validate());
        assert_eq!(form.errors().get(Field::Price), Some("Valid price is required"));
        assert_eq!(form.errors().len(), 1);
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let mut form = PropertyForm::new();
        assert!(!form.validate());
        assert_eq!(form.errors().get(Field::Name), Some("Property name is required"));
        assert_eq!(form.errors().get(Field::City), Some("City is required"));
        assert_eq!(form.errors().get(Field::State), Some("State is required"));
        assert_eq!(form.errors().get(Field::Address), Some("Address is required"));
        assert!(form.errors().get(Field::ListingKind).is_some());
    }

    #[test]
    fn toggling_an_amenity_twice_restores_the_list() {
        let mut form = filled();
        form.toggle_amenity("Parking");
        let before = form.input().amenities.clone();

        form.toggle_amenity("Gym");
        assert!(form.has_amenity("Gym"));
        form.toggle_amenity("Gym");
        assert_eq!(form.input().amenities, before);

        form.toggle_amenity("Parking");
        form.toggle_amenity("Parking");
        assert_eq!(form.input().amenities, before);
    }

    #[test]
    fn amenity_choices_reflect_toggles() {
        let mut form = filled();
        form.toggle_amenity("Gym");
        form.toggle_amenity("Rooftop");

        let choices = form.amenity_choices();
        assert_eq!(choices.len(), AMENITIES.len() + 1);
        assert_eq!(choices[0], (AMENITIES[0], false));
        assert!(choices.contains(&("Gym", true)));
        assert_eq!(choices.last(), Some(&("Rooftop", true)));
    }

    #[test]
    fn edit_prefills_from_property() {
        let existing = property("p9", Some(27.68), Some(85.31));
        let form = PropertyForm::edit(&existing);
        assert_eq!(
            form.mode(),
            &FormMode::Edit {
                property_id: "p9".into()
            }
        );
        assert_eq!(form.input().name, existing.name);
        assert_eq!(form.input().amenities, existing.amenities);
    }
}
