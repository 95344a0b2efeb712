//! Nominatim `/search` response types (`format=jsonv2`).
//!
//! Coordinates arrive as decimal strings; [`SearchPlace::coords`] parses
//! them.

use rxlocate_core::LatLon;
use serde::Deserialize;

/// One element of the `/search` result array.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPlace {
    pub osm_type: String,
    pub osm_id: u64,
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "type", default)]
    pub place_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub address: Option<PlaceAddress>,
    #[serde(default)]
    pub extratags: Option<ExtraTags>,
}

impl SearchPlace {
    #[must_use]
    pub fn coords(&self) -> Option<LatLon> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lon = self.lon.trim().parse::<f64>().ok()?;
        let point = LatLon::new(lat, lon);
        point.is_valid().then_some(point)
    }

    /// `"osm:{osm_type}:{osm_id}"`, unique within the authoritative source.
    #[must_use]
    pub fn source_id(&self) -> String {
        format!("osm:{}:{}", self.osm_type, self.osm_id)
    }

    #[must_use]
    pub fn is_pharmacy(&self) -> bool {
        matches!(self.place_type.as_deref(), Some("pharmacy" | "chemist"))
    }

    /// Country code from the address details, lower-case.
    #[must_use]
    pub fn country_code(&self) -> Option<&str> {
        self.address.as_ref()?.country_code.as_deref()
    }

    /// One-line `number street, city, state postcode` address, falling back
    /// to the display name when the street is unknown.
    #[must_use]
    pub fn one_line_address(&self) -> String {
        self.address
            .as_ref()
            .and_then(PlaceAddress::one_line)
            .unwrap_or_else(|| self.display_name.clone())
    }
}

/// `addressdetails=1` breakdown. Nominatim picks one of city/town/village
/// depending on settlement size.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceAddress {
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl PlaceAddress {
    #[must_use]
    pub fn locality(&self) -> Option<&str> {
        self.city
            .as_deref()
            .or(self.town.as_deref())
            .or(self.village.as_deref())
    }

    fn one_line(&self) -> Option<String> {
        let road = self.road.as_deref()?;
        let street = match self.house_number.as_deref() {
            Some(number) => format!("{number} {road}"),
            None => road.to_string(),
        };
        let state_zip = [self.state.as_deref(), self.postcode.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        let parts: Vec<&str> = [Some(street.as_str()), self.locality(), Some(state_zip.as_str())]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        Some(parts.join(", "))
    }
}

/// `extratags=1` fields we use.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtraTags {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(rename = "contact:phone", default)]
    pub contact_phone: Option<String>,
}

impl ExtraTags {
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref().or(self.contact_phone.as_deref())
    }
}
