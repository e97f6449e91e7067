//! Fixed, ordered message templates. Each template takes one display name,
//! substituted for the `{name}` placeholder.

const NAME_PLACEHOLDER: &str = "{name}";

const TEMPLATES: [&str; 8] = [
    "Hello {name}! Invest today to secure your tomorrow.",
    "{name}, your financial future starts now. Invest!",
    "Dear {name}, small investments bring great results.",
    "{name}, the journey to your financial freedom starts here.",
    "Hello {name}! Your money can work for you. Invest!",
    "{name}, don't wait to invest. The best time is now.",
    "Dear {name}, diversify and multiply your returns.",
    "{name}, every investment is a step toward stability.",
];

#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    templates: &'static [&'static str],
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            templates: &TEMPLATES,
        }
    }
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Render template `index` for `name`; `None` when `index` is out of range.
    pub fn template(&self, index: usize, name: &str) -> Option<String> {
        self.templates
            .get(index)
            .map(|tpl| tpl.replace(NAME_PLACEHOLDER, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_eight_entries_each_naming_the_user() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 8);
        for i in 0..catalog.len() {
            let text = catalog.template(i, "Alice").expect("in range");
            assert!(text.contains("Alice"), "template {i} lost the name: {text}");
            assert!(!text.contains(NAME_PLACEHOLDER));
        }
    }

    #[test]
    fn out_of_range_index_is_none() {
        assert_eq!(Catalog::default().template(8, "Alice"), None);
    }
}
