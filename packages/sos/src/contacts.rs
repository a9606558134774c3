//! Trusted contact validation.

use serde::{Deserialize, Serialize};

use crate::SosError;

/// A contact as stored on the user profile; either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContact {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// A contact an alert can be addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedContact {
    pub name: String,
    pub phone: String,
}

/// Checks that there is at least one contact and that every contact has a
/// non-blank name and phone number.
///
/// # Errors
///
/// * [`SosError::NoTrustedContacts`] if `raw` is empty
/// * [`SosError::InvalidContact`] for the first incomplete contact
pub fn validate_contacts(raw: &[RawContact]) -> Result<Vec<TrustedContact>, SosError> {
    if raw.is_empty() {
        return Err(SosError::NoTrustedContacts);
    }

    raw.iter()
        .enumerate()
        .map(|(index, contact)| {
            let name = filled(contact.name.as_deref());
            let phone = filled(contact.phone.as_deref());

            match (name, phone) {
                (Some(name), Some(phone)) => Ok(TrustedContact {
                    name: name.to_string(),
                    phone: phone.to_string(),
                }),
                _ => {
                    log::warn!("Trusted contact {index} is incomplete");
                    Err(SosError::InvalidContact { index })
                }
            }
        })
        .collect()
}

fn filled(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
