//! Registration form state and validation.

use super::text_input::TextInput;
use crate::domain::{Coordinates, DomainError, DomainResult, PropertyType, RegistrationInput};

/// Fields of the registration form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Address,
    Owner,
    PropertyType,
    Area,
    Value,
    Latitude,
    Longitude,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Address,
        FormField::Owner,
        FormField::PropertyType,
        FormField::Area,
        FormField::Value,
        FormField::Latitude,
        FormField::Longitude,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Address => "Property address",
            FormField::Owner => "Owner name",
            FormField::PropertyType => "Property type",
            FormField::Area => "Area (sq ft)",
            FormField::Value => "Value (USD)",
            FormField::Latitude => "Latitude",
            FormField::Longitude => "Longitude",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, FormField::Latitude | FormField::Longitude)
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

/// Raw form contents as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub address: TextInput,
    pub owner: TextInput,
    pub property_type: Option<PropertyType>,
    pub area: TextInput,
    pub value: TextInput,
    pub latitude: TextInput,
    pub longitude: TextInput,
    pub focused: FormField,
}

impl RegistrationForm {
    /// The edit buffer behind a field; `None` for the property type picker.
    pub fn input(&self, field: FormField) -> Option<&TextInput> {
        match field {
            FormField::Address => Some(&self.address),
            FormField::Owner => Some(&self.owner),
            FormField::PropertyType => None,
            FormField::Area => Some(&self.area),
            FormField::Value => Some(&self.value),
            FormField::Latitude => Some(&self.latitude),
            FormField::Longitude => Some(&self.longitude),
        }
    }

    pub fn focused_input_mut(&mut self) -> Option<&mut TextInput> {
        match self.focused {
            FormField::Address => Some(&mut self.address),
            FormField::Owner => Some(&mut self.owner),
            FormField::PropertyType => None,
            FormField::Area => Some(&mut self.area),
            FormField::Value => Some(&mut self.value),
            FormField::Latitude => Some(&mut self.latitude),
            FormField::Longitude => Some(&mut self.longitude),
        }
    }

    /// Text shown for a field, whichever kind it is.
    pub fn display_value(&self, field: FormField) -> String {
        match self.input(field) {
            Some(input) => input.value.clone(),
            None => self
                .property_type
                .map(|t| t.label().to_string())
                .unwrap_or_default(),
        }
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
        if let Some(input) = self.focused_input_mut() {
            input.move_end();
        }
    }

    pub fn focus_previous(&mut self) {
        self.focused = self.focused.previous();
        if let Some(input) = self.focused_input_mut() {
            input.move_end();
        }
    }

    /// Steps the property type picker; an unset picker starts at the first type.
    pub fn cycle_property_type(&mut self, forward: bool) {
        self.property_type = Some(match self.property_type {
            None => PropertyType::ALL[0],
            Some(current) if forward => current.next(),
            Some(current) => current.previous(),
        });
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Checks required fields and numbers, producing a registration.
    ///
    /// Coordinates are optional; anything that does not parse counts as 0.
    pub fn validate(&self) -> DomainResult<RegistrationInput> {
        let address = required_text("address", &self.address)?;
        let owner = required_text("owner", &self.owner)?;
        let property_type = self
            .property_type
            .ok_or(DomainError::MissingField("property type"))?;
        let area = positive_number("area", &self.area)?;
        let value = positive_number("value", &self.value)?;

        Ok(RegistrationInput {
            address,
            owner,
            property_type,
            area,
            value,
            coordinates: Coordinates {
                lat: lenient_number(&self.latitude),
                lng: lenient_number(&self.longitude),
            },
        })
    }
}

fn required_text(field: &'static str, input: &TextInput) -> DomainResult<String> {
    let trimmed = input.value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn positive_number(field: &'static str, input: &TextInput) -> DomainResult<f64> {
    let raw = input.value.trim();
    if raw.is_empty() {
        return Err(DomainError::MissingField(field));
    }
    let number: f64 = raw.parse().map_err(|_| DomainError::NotANumber {
        field,
        input: raw.to_string(),
    })?;
    if !number.is_finite() || number <= 0.0 {
        return Err(DomainError::NotPositive { field });
    }
    Ok(number)
}

fn lenient_number(input: &TextInput) -> f64 {
    input
        .value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}
