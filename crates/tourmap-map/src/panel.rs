//! Text rendering of the selected place's details.

use std::fmt;

use tourmap_core::PlaceDetails;

/// Shown for every field the lookup did not return.
pub const PLACEHOLDER: &str = "N/A";

/// The side panel's content, one display string per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub place_id: String,
    pub title: String,
    pub rating: String,
    pub reviews: String,
    pub open_now: String,
    pub hours: Vec<String>,
    pub address: String,
    pub phone: String,
    pub website: String,
    /// Photo references, or URLs after [`PanelView::with_photo_urls`].
    pub photos: Vec<String>,
    pub status: String,
}

impl PanelView {
    #[must_use]
    pub fn from_details(details: &PlaceDetails) -> Self {
        let open_now = details
            .opening_hours
            .as_ref()
            .and_then(|h| h.open_now)
            .map_or(PLACEHOLDER, |open| if open { "Open now" } else { "Closed" });

        let address = non_empty(details.formatted_address.as_deref())
            .map(ToOwned::to_owned)
            .or_else(|| {
                details
                    .adr_address
                    .as_deref()
                    .map(strip_tags)
                    .filter(|s| !s.is_empty())
            });

        Self {
            place_id: details.place_id.clone(),
            title: or_placeholder(details.name.as_deref()),
            rating: details
                .rating
                .map_or_else(|| PLACEHOLDER.to_owned(), |r| format!("{r:.1}")),
            reviews: details
                .user_ratings_total
                .map_or_else(|| PLACEHOLDER.to_owned(), |n| format!("{n} reviews")),
            open_now: open_now.to_owned(),
            hours: details
                .opening_hours
                .as_ref()
                .map(|h| h.weekday_text.clone())
                .unwrap_or_default(),
            address: address.unwrap_or_else(|| PLACEHOLDER.to_owned()),
            phone: or_placeholder(details.phone_number.as_deref()),
            website: or_placeholder(details.website.as_deref()),
            photos: details
                .photos
                .iter()
                .map(|p| p.photo_reference.clone())
                .collect(),
            status: details.status.to_string(),
        }
    }

    /// Replaces each photo reference with `to_url(reference)`.
    #[must_use]
    pub fn with_photo_urls<F>(mut self, to_url: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        self.photos = self.photos.iter().map(|r| to_url(r)).collect();
        self
    }
}

impl fmt::Display for PanelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "  place id : {}", self.place_id)?;
        writeln!(f, "  rating   : {} ({})", self.rating, self.reviews)?;
        writeln!(f, "  open     : {}", self.open_now)?;
        if self.hours.is_empty() {
            writeln!(f, "  hours    : {PLACEHOLDER}")?;
        } else {
            writeln!(f, "  hours    :")?;
            for line in &self.hours {
                writeln!(f, "    {line}")?;
            }
        }
        writeln!(f, "  address  : {}", self.address)?;
        writeln!(f, "  phone    : {}", self.phone)?;
        writeln!(f, "  website  : {}", self.website)?;
        if self.photos.is_empty() {
            writeln!(f, "  photos   : {PLACEHOLDER}")?;
        } else {
            writeln!(f, "  photos   :")?;
            for photo in &self.photos {
                writeln!(f, "    {photo}")?;
            }
        }
        write!(f, "  status   : {}", self.status)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn or_placeholder(value: Option<&str>) -> String {
    non_empty(value).unwrap_or(PLACEHOLDER).to_owned()
}

/// Drops `<...>` markup from the microformat address.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_owned()
}
