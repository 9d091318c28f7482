/// One entry as it came off a feed, before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: String,
    pub link: String,
    /// Summary/description text; may still contain markup and entities.
    pub summary: Option<String>,
    /// Publish or update timestamp exactly as the source wrote it.
    pub updated: Option<String>,
    /// Form type when the source carries one (Atom category, search `form`).
    pub form_type: Option<String>,
}

impl RawEntry {
    /// Title and summary joined with a space, for keyword matching.
    #[must_use]
    pub fn combined_text(&self) -> String {
        match self.summary.as_deref() {
            Some(summary) if !summary.trim().is_empty() => format!("{} {summary}", self.title),
            _ => self.title.clone(),
        }
    }
}
