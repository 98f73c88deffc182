//! Case-insensitive catalog of variable descriptors

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use super::VariableDescriptor;

/// Ordered descriptor list with an O(1) case-insensitive name index.
///
/// Built once per recording and read-only afterwards. When two descriptors
/// share a name under case-insensitive comparison the later one wins and a
/// [`CatalogWarning::DuplicateDescriptor`] is recorded.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    descriptors: Vec<VariableDescriptor>,
    /// Lower-cased name to position in `descriptors`
    index: HashMap<String, usize>,
    warnings: Vec<CatalogWarning>,
}

/// Non-fatal problems found while building a [`FieldCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// `name` was declared again at `replacement`, shadowing the one at `previous`.
    DuplicateDescriptor { name: String, previous: usize, replacement: usize },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogWarning::DuplicateDescriptor { name, previous, replacement } => write!(
                f,
                "Duplicate descriptor '{}': declaration {} replaces declaration {}",
                name, replacement, previous
            ),
        }
    }
}

impl FieldCatalog {
    pub fn new(descriptors: Vec<VariableDescriptor>) -> Self {
        let mut index = HashMap::with_capacity(descriptors.len());
        let mut warnings = Vec::new();

        for (position, descriptor) in descriptors.iter().enumerate() {
            if let Some(previous) = index.insert(descriptor.name.to_lowercase(), position) {
                let warning = CatalogWarning::DuplicateDescriptor {
                    name: descriptor.name.clone(),
                    previous,
                    replacement: position,
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
        }

        debug!(
            "Built field catalog with {} descriptors ({} duplicates)",
            descriptors.len(),
            warnings.len()
        );

        Self { descriptors, index, warnings }
    }

    /// Get a descriptor by name, ignoring case.
    pub fn lookup(&self, name: &str) -> Option<&VariableDescriptor> {
        self.index.get(&name.to_lowercase()).map(|&position| &self.descriptors[position])
    }

    /// All declared descriptors in source order, including shadowed duplicates.
    pub fn all(&self) -> &[VariableDescriptor] {
        &self.descriptors
    }

    /// Descriptors that win their name lookup, in source order.
    pub fn effective(&self) -> impl Iterator<Item = &VariableDescriptor> + '_ {
        self.descriptors.iter().enumerate().filter_map(|(position, descriptor)| {
            let winner = self.index.get(&descriptor.name.to_lowercase()).copied();
            (winner == Some(position)).then_some(descriptor)
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_lowercase())
    }

    /// Number of distinct (case-insensitive) names.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }

    /// Descriptors that do not fit inside a record of `record_len` bytes.
    pub fn overflowing(&self, record_len: usize) -> impl Iterator<Item = &VariableDescriptor> + '_ {
        self.descriptors.iter().filter(move |descriptor| !descriptor.fits_within(record_len))
    }
}

impl FromIterator<VariableDescriptor> for FieldCatalog {
    fn from_iter<I: IntoIterator<Item = VariableDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VariableType;
    use proptest::prelude::*;

    fn speed_catalog() -> FieldCatalog {
        FieldCatalog::new(vec![
            VariableDescriptor::new("SessionTime", VariableType::Float64, 0, 1).with_unit("s"),
            VariableDescriptor::new("Speed", VariableType::Float32, 8, 1).with_unit("m/s"),
            VariableDescriptor::new("Gear", VariableType::Int32, 12, 1),
        ])
    }

    #[test]
    fn lookup_ignores_case() {
        let catalog = speed_catalog();
        let expected = catalog.lookup("Speed").expect("Speed should be present");

        assert_eq!(catalog.lookup("speed"), Some(expected));
        assert_eq!(catalog.lookup("SPEED"), Some(expected));
        assert_eq!(expected.unit, "m/s");
        assert!(catalog.lookup("Throttle").is_none());
    }

    #[test]
    fn all_preserves_declaration_order() {
        let catalog = speed_catalog();
        let names: Vec<&str> = catalog.all().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["SessionTime", "Speed", "Gear"]);
        assert!(catalog.warnings().is_empty());
    }

    #[test]
    fn duplicate_names_warn_and_last_wins() {
        let catalog = FieldCatalog::new(vec![
            VariableDescriptor::new("Speed", VariableType::Float32, 0, 1),
            VariableDescriptor::new("Gear", VariableType::Int32, 4, 1),
            VariableDescriptor::new("SPEED", VariableType::Float64, 8, 1),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.all().len(), 3);
        assert_eq!(catalog.lookup("speed").map(|d| d.offset), Some(8));
        assert_eq!(
            catalog.warnings(),
            [CatalogWarning::DuplicateDescriptor {
                name: "SPEED".to_string(),
                previous: 0,
                replacement: 2
            }]
        );

        let effective: Vec<&str> = catalog.effective().map(|d| d.name.as_str()).collect();
        assert_eq!(effective, ["Gear", "SPEED"]);
    }

    #[test]
    fn overflowing_reports_descriptors_past_record_end() {
        let catalog = speed_catalog();
        let overflowing: Vec<&str> = catalog.overflowing(12).map(|d| d.name.as_str()).collect();
        assert_eq!(overflowing, ["Speed", "Gear"]);
        assert_eq!(catalog.overflowing(16).count(), 0);
    }

    proptest! {
        #[test]
        fn prop_lookup_is_case_insensitive(name in "[a-zA-Z][a-zA-Z0-9_]{0,24}") {
            let catalog = FieldCatalog::new(vec![
                VariableDescriptor::new(name.clone(), VariableType::Float32, 0, 1),
            ]);
            prop_assert!(catalog.lookup(&name.to_uppercase()).is_some());
            prop_assert!(catalog.lookup(&name.to_lowercase()).is_some());
            prop_assert_eq!(catalog.lookup(&name), catalog.lookup(&name.to_uppercase()));
        }
    }
}
