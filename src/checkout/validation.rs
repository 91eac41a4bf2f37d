//! Shipping Form Validation

use thiserror::Error;

use crate::delivery::DeliveryQuote;

/// Leading three digits accepted for a contact number.
pub const CONTACT_NUMBER_PREFIXES: [&str; 7] = ["013", "014", "015", "016", "017", "018", "019"];

/// Exact number of digits in a contact number.
pub const CONTACT_NUMBER_LEN: usize = 11;

/// Minimum address length, in characters.
pub const MIN_ADDRESS_LEN: usize = 10;

/// A violated shipping-form rule. The message is shown to the shopper as is.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The name is empty.
    #[error("Please enter your name")]
    MissingName,

    /// The contact number is not 11 digits with an accepted prefix.
    #[error("Please enter a valid 11 digit phone number starting with 013-019")]
    InvalidContactNumber,

    /// The address is shorter than [`MIN_ADDRESS_LEN`] characters.
    #[error("Address must be at least 10 characters long")]
    AddressTooShort,

    /// No chargeable delivery quote has resolved yet.
    #[error("Please select your city, zone and area to calculate the delivery charge")]
    MissingDeliveryQuote,
}

/// Raw shipping form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingForm {
    /// Buyer name
    pub name: String,

    /// Contact number
    pub contact_number: String,

    /// Delivery address
    pub address: String,

    /// Optional note for the courier
    pub note: Option<String>,
}

/// Shipping details that passed validation, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingDetails {
    /// Buyer name
    pub name: String,

    /// Contact number, 11 digits
    pub contact_number: String,

    /// Delivery address
    pub address: String,

    /// Note for the courier; `None` when blank
    pub note: Option<String>,
}

/// A validated form paired with the quote it was validated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCheckout {
    /// Shipping details
    pub details: ShippingDetails,

    /// Chargeable delivery quote
    pub quote: DeliveryQuote,
}

impl ShippingForm {
    /// Validate the form against the current delivery quote.
    ///
    /// Rules are checked in order (name, contact number, address, delivery
    /// quote) and the first violation is returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(
        &self,
        quote: Option<&DeliveryQuote>,
    ) -> Result<ValidatedCheckout, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        let contact_number = self.contact_number.trim();
        if !is_valid_contact_number(contact_number) {
            return Err(ValidationError::InvalidContactNumber);
        }

        let address = self.address.trim();
        if address.chars().count() < MIN_ADDRESS_LEN {
            return Err(ValidationError::AddressTooShort);
        }

        let quote = quote
            .filter(|quote| quote.is_chargeable())
            .ok_or(ValidationError::MissingDeliveryQuote)?;

        let note = self
            .note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
            .map(str::to_string);

        Ok(ValidatedCheckout {
            details: ShippingDetails {
                name: name.to_string(),
                contact_number: contact_number.to_string(),
                address: address.to_string(),
                note,
            },
            quote: quote.clone(),
        })
    }
}

/// Whether `number` is exactly 11 ASCII digits starting with an accepted prefix.
pub fn is_valid_contact_number(number: &str) -> bool {
    number.len() == CONTACT_NUMBER_LEN
        && number.bytes().all(|b| b.is_ascii_digit())
        && number
            .get(..3)
            .is_some_and(|prefix| CONTACT_NUMBER_PREFIXES.contains(&prefix))
}
