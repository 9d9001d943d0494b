//! Flat business profile record that predates the block builder.
//!
//! Read-only input to the migrator. Field names follow the backend table columns.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyProfile {
    pub business_name: Option<String>,
    /// Older rows carry `name` instead of `business_name`.
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub hero_image_url: Option<String>,
    pub tagline: Option<String>,
    pub value_prop_headline: Option<String>,
    pub value_prop_body: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub impact_stats: Vec<LegacyImpactStat>,
    #[serde(deserialize_with = "null_as_default")]
    pub culture_values: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub benefits: Vec<LegacyBenefit>,
    #[serde(deserialize_with = "null_as_default")]
    pub business_areas: Vec<LegacyBusinessArea>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyImpactStat {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub footnote_optional: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyBenefit {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyBusinessArea {
    pub title: String,
    #[serde(default)]
    pub area_slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl LegacyProfile {
    /// Display name: `business_name`, else `name`. Blank values count as absent.
    pub fn display_name(&self) -> Option<&str> {
        non_blank(&self.business_name).or_else(|| non_blank(&self.name))
    }
}

/// Backend rows hold `null` for never-filled list columns.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `Some(trimmed-nonempty)` or `None`.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_record_deserializes() {
        let profile: LegacyProfile = serde_json::from_str(
            r#"{"business_name":"Acme","impact_stats":[{"label":"Hires","value":"120+"}],"benefits":null,"extra":1}"#,
        )
        .unwrap();
        assert_eq!(profile.display_name(), Some("Acme"));
        assert_eq!(profile.impact_stats.len(), 1);
        assert!(profile.benefits.is_empty());
    }

    #[test]
    fn test_display_name_falls_back_to_name() {
        let profile = LegacyProfile {
            business_name: Some("  ".into()),
            name: Some("Globex".into()),
            ..LegacyProfile::default()
        };
        assert_eq!(profile.display_name(), Some("Globex"));
    }
}
