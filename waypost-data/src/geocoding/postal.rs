//! Postal-code (CEP) detection and lookup payloads.

use serde::Deserialize;
use serde_json::Value;

const POSTAL_CODE_DIGITS: usize = 8;

/// Extract a postal code from `input`.
///
/// Every non-digit character is discarded; the input counts as a postal
/// code when exactly eight digits remain.
///
/// # Examples
///
/// ```
/// use waypost_data::geocoding::normalise_postal_code;
///
/// assert_eq!(normalise_postal_code("01310-100").as_deref(), Some("01310100"));
/// assert_eq!(normalise_postal_code("Av. Paulista, 1000"), None);
/// ```
#[must_use]
pub fn normalise_postal_code(input: &str) -> Option<String> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    (digits.len() == POSTAL_CODE_DIGITS).then_some(digits)
}

/// Address returned by the postal lookup service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostalAddress {
    /// Street name.
    #[serde(default)]
    pub logradouro: Option<String>,
    /// Neighbourhood.
    #[serde(default)]
    pub bairro: Option<String>,
    /// City.
    #[serde(default)]
    pub localidade: Option<String>,
    /// State abbreviation.
    #[serde(default)]
    pub uf: Option<String>,
    /// Error marker. The service sends `true` (or `"true"`) for unknown codes.
    #[serde(default)]
    pub erro: Option<Value>,
}

impl PostalAddress {
    /// Whether the payload flags the code as unknown.
    #[must_use]
    pub fn is_error(&self) -> bool {
        match &self.erro {
            None | Some(Value::Null | Value::Bool(false)) => false,
            Some(Value::String(text)) => !text.eq_ignore_ascii_case("false"),
            Some(_) => true,
        }
    }

    /// Render the address as a geocoding query ending with `country`.
    ///
    /// Returns `None` when the payload carries no address parts at all.
    #[must_use]
    pub fn to_query(&self, country: &str) -> Option<String> {
        let parts: Vec<&str> = [&self.logradouro, &self.bairro, &self.localidade, &self.uf]
            .into_iter()
            .filter_map(|part| part.as_deref().map(str::trim))
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            return None;
        }
        let country = country.trim();
        let mut query = parts.join(", ");
        if !country.is_empty() {
            query.push_str(", ");
            query.push_str(country);
        }
        Some(query)
    }
}
