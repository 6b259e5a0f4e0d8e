//! Card template registry.
//!
//! Single source of truth mapping template identifiers to their
//! renderer capabilities. Create, update, and feed serialization all
//! validate against this table; there is no other template switch.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutFamily {
    Portrait,
    Landscape,
    Compact,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub layout: LayoutFamily,
    /// Whether the template honors the card's theme color.
    pub themeable: bool,
}

const TEMPLATES: &[TemplateDescriptor] = &[
    TemplateDescriptor {
        id: "classic",
        display_name: "Classic",
        layout: LayoutFamily::Portrait,
        themeable: true,
    },
    TemplateDescriptor {
        id: "modern",
        display_name: "Modern",
        layout: LayoutFamily::Landscape,
        themeable: true,
    },
    TemplateDescriptor {
        id: "minimal",
        display_name: "Minimal",
        layout: LayoutFamily::Compact,
        themeable: false,
    },
    TemplateDescriptor {
        id: "gradient",
        display_name: "Gradient",
        layout: LayoutFamily::Portrait,
        themeable: true,
    },
    TemplateDescriptor {
        id: "dark",
        display_name: "Dark",
        layout: LayoutFamily::Portrait,
        themeable: false,
    },
];

pub fn all() -> &'static [TemplateDescriptor] {
    TEMPLATES
}

pub fn lookup(id: &str) -> Option<&'static TemplateDescriptor> {
    TEMPLATES.iter().find(|t| t.id == id)
}

pub fn is_valid(id: &str) -> bool {
    lookup(id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_templates() {
        assert!(is_valid("classic"));
        assert!(is_valid("dark"));
        assert!(!is_valid("Classic")); // ids are lowercase and exact
        assert!(!is_valid("neon"));
    }

    #[test]
    fn test_registry_ids_are_unique() {
        let mut ids: Vec<&str> = all().iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn test_descriptor_fields() {
        let minimal = lookup("minimal").unwrap();
        assert_eq!(minimal.display_name, "Minimal");
        assert!(!minimal.themeable);
    }
}
