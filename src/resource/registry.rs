//! Static table of the resource types the API exposes
//!
//! Each entry names the path segment the API uses for the resource and the
//! filters it accepts. The table is read-only and shared process-wide.

/// A queryable resource type and the filters it accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Path segment used by the API (e.g. "driverStandings")
    pub name: &'static str,
    /// Human readable name (e.g. "Driver Standings")
    pub display_name: &'static str,
    pub mandatory_filters: &'static [&'static str],
    pub optional_filters: &'static [&'static str],
}

impl ResourceDescriptor {
    pub fn is_mandatory(&self, filter: &str) -> bool {
        self.mandatory_filters.contains(&filter)
    }

    /// Whether the filter is allowed at all (mandatory or optional)
    pub fn accepts(&self, filter: &str) -> bool {
        self.is_mandatory(filter) || self.optional_filters.contains(&filter)
    }

    /// Mandatory filters first, then optional ones
    pub fn filters(&self) -> impl Iterator<Item = &'static str> {
        self.mandatory_filters
            .iter()
            .chain(self.optional_filters.iter())
            .copied()
    }
}

pub static RESOURCES: &[ResourceDescriptor] = &[
    ResourceDescriptor {
        name: "circuits",
        display_name: "Circuits",
        mandatory_filters: &[],
        optional_filters: &[
            "season",
            "round",
            "constructors",
            "drivers",
            "fastest",
            "grid",
            "results",
            "status",
        ],
    },
    ResourceDescriptor {
        name: "constructors",
        display_name: "Constructors",
        mandatory_filters: &[],
        optional_filters: &[
            "season", "round", "circuits", "drivers", "fastest", "grid", "results", "status",
        ],
    },
    ResourceDescriptor {
        name: "constructorStandings",
        display_name: "Constructor Standings",
        mandatory_filters: &["season"],
        optional_filters: &["round", "constructors", "position"],
    },
    ResourceDescriptor {
        name: "drivers",
        display_name: "Drivers",
        mandatory_filters: &[],
        optional_filters: &[
            "season",
            "round",
            "circuits",
            "constructors",
            "fastest",
            "grid",
            "results",
            "status",
        ],
    },
    ResourceDescriptor {
        name: "driverStandings",
        display_name: "Driver Standings",
        mandatory_filters: &["season"],
        optional_filters: &["round", "drivers", "position"],
    },
    ResourceDescriptor {
        name: "laps",
        display_name: "Laps",
        mandatory_filters: &["season", "round"],
        optional_filters: &["drivers", "constructors", "laps"],
    },
    ResourceDescriptor {
        name: "pitstops",
        display_name: "Pit Stops",
        mandatory_filters: &["season", "round"],
        optional_filters: &["drivers", "laps", "pitstops"],
    },
    ResourceDescriptor {
        name: "qualifying",
        display_name: "Qualifying",
        mandatory_filters: &[],
        optional_filters: &[
            "season",
            "round",
            "circuits",
            "constructors",
            "drivers",
            "grid",
            "fastest",
            "status",
        ],
    },
    ResourceDescriptor {
        name: "races",
        display_name: "Races",
        mandatory_filters: &[],
        optional_filters: &[
            "season",
            "round",
            "circuits",
            "constructors",
            "drivers",
            "grid",
            "status",
        ],
    },
    ResourceDescriptor {
        name: "results",
        display_name: "Results",
        mandatory_filters: &[],
        optional_filters: &[
            "season",
            "round",
            "circuits",
            "constructors",
            "drivers",
            "fastest",
            "grid",
            "status",
        ],
    },
    ResourceDescriptor {
        name: "seasons",
        display_name: "Seasons",
        mandatory_filters: &[],
        optional_filters: &["season", "circuits", "constructors", "drivers", "grid", "status"],
    },
    ResourceDescriptor {
        name: "sprint",
        display_name: "Sprint",
        mandatory_filters: &[],
        optional_filters: &["season", "round"],
    },
    ResourceDescriptor {
        name: "status",
        display_name: "Status",
        mandatory_filters: &[],
        optional_filters: &[
            "status",
            "season",
            "round",
            "circuits",
            "constructors",
            "drivers",
            "results",
        ],
    },
];

/// Look up a resource type by API name or display name.
///
/// Matching ignores ASCII case and whitespace, so "driverStandings",
/// "driverstandings" and "Driver Standings" resolve to the same entry.
pub fn get_resource(name: &str) -> Option<&'static ResourceDescriptor> {
    let wanted: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    if wanted.is_empty() {
        return None;
    }
    RESOURCES
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(&wanted))
}

/// Display names of every known resource type, in table order
pub fn all_names() -> Vec<&'static str> {
    RESOURCES.iter().map(|r| r.display_name).collect()
}

/// Sorted, de-duplicated union of every filter any resource type accepts
pub fn all_filters() -> Vec<&'static str> {
    let mut filters: Vec<&'static str> = RESOURCES.iter().flat_map(|r| r.filters()).collect();
    filters.sort_unstable();
    filters.dedup();
    filters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_resource_is_case_and_space_insensitive() {
        let by_name = get_resource("driverStandings").unwrap();
        assert_eq!(by_name.name, "driverStandings");
        assert_eq!(get_resource("driverstandings"), Some(by_name));
        assert_eq!(get_resource("Driver Standings"), Some(by_name));
        assert_eq!(get_resource("Pit Stops").unwrap().name, "pitstops");
    }

    #[test]
    fn test_get_resource_unknown() {
        assert!(get_resource("teams").is_none());
        assert!(get_resource("").is_none());
        assert!(get_resource("   ").is_none());
    }

    #[test]
    fn test_mandatory_and_optional() {
        let laps = get_resource("laps").unwrap();
        assert!(laps.is_mandatory("season"));
        assert!(laps.is_mandatory("round"));
        assert!(laps.accepts("drivers"));
        assert!(!laps.is_mandatory("drivers"));
        assert!(!laps.accepts("grid"));
    }

    #[test]
    fn test_all_filters_sorted_unique() {
        let filters = all_filters();
        let mut sorted = filters.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(filters, sorted);
        assert!(filters.contains(&"position"));
        assert!(filters.contains(&"pitstops"));
        assert_eq!(filters.iter().filter(|f| **f == "season").count(), 1);
    }

    #[test]
    fn test_all_names() {
        let names = all_names();
        assert_eq!(names.len(), RESOURCES.len());
        assert!(names.contains(&"Constructor Standings"));
    }

    #[test]
    fn test_table_has_no_duplicate_names() {
        for (i, a) in RESOURCES.iter().enumerate() {
            for b in &RESOURCES[i + 1..] {
                assert!(!a.name.eq_ignore_ascii_case(b.name), "duplicate {}", a.name);
            }
            for filter in a.mandatory_filters {
                assert!(
                    !a.optional_filters.contains(filter),
                    "{} lists '{}' as both mandatory and optional",
                    a.name,
                    filter
                );
            }
        }
    }
}
