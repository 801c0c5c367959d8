use crate::error::{RemitError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Country-specific bank routing details. The variant is driven by the
/// bank's country; a mismatch is a validation error on `bankRoute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BankRoute {
    /// Euro-area and other IBAN countries.
    Iban { iban: String },
    /// United Kingdom.
    SortCode {
        sort_code: String,
        account_number: String,
    },
    /// Canada.
    Transit {
        transit_number: String,
        institution_number: String,
        account_number: String,
    },
    /// Australia.
    Bsb { bsb: String, account_number: String },
    /// United States.
    Aba {
        routing_number: String,
        account_number: String,
    },
    /// Fallback for countries without a dedicated local scheme.
    Swift {
        swift: String,
        account_number: String,
    },
}

impl BankRoute {
    fn kind(&self) -> &'static str {
        match self {
            Self::Iban { .. } => "iban",
            Self::SortCode { .. } => "sortCode",
            Self::Transit { .. } => "transit",
            Self::Bsb { .. } => "bsb",
            Self::Aba { .. } => "aba",
            Self::Swift { .. } => "swift",
        }
    }
}

/// Optional correspondent bank block for routes that need one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntermediaryBank {
    pub name: String,
    pub swift: String,
}

/// Active/inactive toggle, independent of any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeneficiaryStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    pub id: Uuid,
    pub name: String,
    /// ISO 3166-1 alpha-2 country of the receiving bank.
    pub country: String,
    pub bank_name: String,
    pub route: BankRoute,
    pub intermediary: Option<IntermediaryBank>,
    pub status: BeneficiaryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields collected when creating or editing a beneficiary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryDraft {
    pub name: String,
    pub country: String,
    pub bank_name: String,
    pub route: BankRoute,
    pub intermediary: Option<IntermediaryBank>,
}

impl BeneficiaryDraft {
    /// Field-scoped validation: each failure names the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RemitError::invalid("name", "must not be empty"));
        }
        if self.country.len() != 2 {
            return Err(RemitError::invalid(
                "country",
                "expected an ISO 3166-1 alpha-2 code",
            ));
        }
        if self.bank_name.trim().is_empty() {
            return Err(RemitError::invalid("bankName", "must not be empty"));
        }
        if let Some(expected) = expected_route_kind(&self.country)
            && expected != self.route.kind()
        {
            return Err(RemitError::invalid(
                "bankRoute",
                format!(
                    "{} accounts use the {} scheme, got {}",
                    self.country,
                    expected,
                    self.route.kind()
                ),
            ));
        }
        Ok(())
    }

    pub fn into_beneficiary(self, id: Uuid) -> Beneficiary {
        let now = Utc::now();
        Beneficiary {
            id,
            name: self.name,
            country: self.country,
            bank_name: self.bank_name,
            route: self.route,
            intermediary: self.intermediary,
            status: BeneficiaryStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Beneficiary {
    /// Applies an edit draft in place, keeping identity and status.
    pub fn apply(&mut self, draft: BeneficiaryDraft) {
        self.name = draft.name;
        self.country = draft.country;
        self.bank_name = draft.bank_name;
        self.route = draft.route;
        self.intermediary = draft.intermediary;
        self.updated_at = Utc::now();
    }
}

/// The local banking scheme a country's accounts are expected to use.
/// `None` means any route (including the SWIFT fallback) is accepted.
fn expected_route_kind(country: &str) -> Option<&'static str> {
    match country {
        "GB" => Some("sortCode"),
        "CA" => Some("transit"),
        "AU" => Some("bsb"),
        "US" => Some("aba"),
        "DE" | "FR" | "IE" | "NL" | "ES" | "IT" | "AT" | "BE" | "FI" | "PT" => Some("iban"),
        _ => None,
    }
}

/// ISO currency for a destination country, used to derive an order's
/// currency unless explicitly overridden.
pub fn currency_for_country(country: &str) -> Option<&'static str> {
    match country {
        "US" => Some("USD"),
        "GB" => Some("GBP"),
        "CA" => Some("CAD"),
        "AU" => Some("AUD"),
        "NZ" => Some("NZD"),
        "CH" => Some("CHF"),
        "SG" => Some("SGD"),
        "AE" => Some("AED"),
        "DE" | "FR" | "IE" | "NL" | "ES" | "IT" | "AT" | "BE" | "FI" | "PT" => Some("EUR"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BeneficiaryDraft {
        BeneficiaryDraft {
            name: "TU Berlin".to_string(),
            country: "DE".to_string(),
            bank_name: "Deutsche Bank".to_string(),
            route: BankRoute::Iban {
                iban: "DE89370400440532013000".to_string(),
            },
            intermediary: None,
        }
    }

    #[test]
    fn test_valid_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_route_must_match_country() {
        let mut d = draft();
        d.route = BankRoute::Aba {
            routing_number: "021000021".to_string(),
            account_number: "12345678".to_string(),
        };
        assert!(matches!(
            d.validate(),
            Err(RemitError::InvalidInput {
                field: "bankRoute",
                ..
            })
        ));
    }

    #[test]
    fn test_swift_fallback_for_unmapped_country() {
        let mut d = draft();
        d.country = "JP".to_string();
        d.route = BankRoute::Swift {
            swift: "BOTKJPJT".to_string(),
            account_number: "1234567".to_string(),
        };
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_edit_keeps_identity_and_status() {
        let mut b = draft().into_beneficiary(Uuid::new_v4());
        let id = b.id;
        b.status = BeneficiaryStatus::Inactive;
        let mut edit = draft();
        edit.name = "HU Berlin".to_string();
        b.apply(edit);
        assert_eq!(b.id, id);
        assert_eq!(b.name, "HU Berlin");
        assert_eq!(b.status, BeneficiaryStatus::Inactive);
    }

    #[test]
    fn test_currency_derivation() {
        assert_eq!(currency_for_country("DE"), Some("EUR"));
        assert_eq!(currency_for_country("US"), Some("USD"));
        assert_eq!(currency_for_country("ZZ"), None);
    }

    #[test]
    fn test_route_serialization_is_tagged() {
        let route = BankRoute::SortCode {
            sort_code: "20-00-00".to_string(),
            account_number: "55779911".to_string(),
        };
        let json = serde_json::to_string(&route).unwrap();
        assert!(json.contains("\"kind\":\"sortCode\""));
    }
}
