//! Catalogs of known field variables, record kinds and profile columns.

use std::fmt;

/// Category of field output file. Each kind bundles one or more fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    VelocityPressure,
    Temperature,
    Composition,
    Viscosity,
    Density,
    Stress,
    PrincipalAxis,
    Age,
}

impl RecordKind {
    pub const ALL: [RecordKind; 8] = [
        RecordKind::VelocityPressure,
        RecordKind::Temperature,
        RecordKind::Composition,
        RecordKind::Viscosity,
        RecordKind::Density,
        RecordKind::Stress,
        RecordKind::PrincipalAxis,
        RecordKind::Age,
    ];

    /// File name tag, as in `{name}_{tag}{isnap:05}`.
    pub fn tag(self) -> &'static str {
        match self {
            RecordKind::VelocityPressure => "vp",
            RecordKind::Temperature => "t",
            RecordKind::Composition => "c",
            RecordKind::Viscosity => "eta",
            RecordKind::Density => "rho",
            RecordKind::Stress => "str",
            RecordKind::PrincipalAxis => "sx",
            RecordKind::Age => "age",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Names of the fields stored in this record, in record order.
    pub fn field_names(self) -> &'static [&'static str] {
        match self {
            RecordKind::VelocityPressure => &["u", "v", "w", "p"],
            RecordKind::Temperature => &["t"],
            RecordKind::Composition => &["c"],
            RecordKind::Viscosity => &["eta"],
            RecordKind::Density => &["rho"],
            RecordKind::Stress => &["str"],
            RecordKind::PrincipalAxis => &["sx", "sy", "sz", "x"],
            RecordKind::Age => &["age"],
        }
    }

    pub fn is_bundle(self) -> bool {
        self.field_names().len() > 1
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCatalogEntry {
    pub name: &'static str,
    pub kind: RecordKind,
    pub description: &'static str,
}

const FIELD_CATALOG: [FieldCatalogEntry; 14] = [
    FieldCatalogEntry {
        name: "t",
        kind: RecordKind::Temperature,
        description: "Temperature",
    },
    FieldCatalogEntry {
        name: "u",
        kind: RecordKind::VelocityPressure,
        description: "x Velocity",
    },
    FieldCatalogEntry {
        name: "v",
        kind: RecordKind::VelocityPressure,
        description: "y Velocity",
    },
    FieldCatalogEntry {
        name: "w",
        kind: RecordKind::VelocityPressure,
        description: "z Velocity",
    },
    FieldCatalogEntry {
        name: "p",
        kind: RecordKind::VelocityPressure,
        description: "Pressure",
    },
    FieldCatalogEntry {
        name: "c",
        kind: RecordKind::Composition,
        description: "Composition",
    },
    FieldCatalogEntry {
        name: "eta",
        kind: RecordKind::Viscosity,
        description: "Viscosity",
    },
    FieldCatalogEntry {
        name: "rho",
        kind: RecordKind::Density,
        description: "Density",
    },
    FieldCatalogEntry {
        name: "str",
        kind: RecordKind::Stress,
        description: "Stress (second invariant)",
    },
    FieldCatalogEntry {
        name: "sx",
        kind: RecordKind::PrincipalAxis,
        description: "x Principal stress axis",
    },
    FieldCatalogEntry {
        name: "sy",
        kind: RecordKind::PrincipalAxis,
        description: "y Principal stress axis",
    },
    FieldCatalogEntry {
        name: "sz",
        kind: RecordKind::PrincipalAxis,
        description: "z Principal stress axis",
    },
    FieldCatalogEntry {
        name: "x",
        kind: RecordKind::PrincipalAxis,
        description: "Principal stress magnitude",
    },
    FieldCatalogEntry {
        name: "age",
        kind: RecordKind::Age,
        description: "Age",
    },
];

pub fn field_catalog() -> &'static [FieldCatalogEntry] {
    &FIELD_CATALOG
}

pub fn lookup_field(name: &str) -> Option<&'static FieldCatalogEntry> {
    FIELD_CATALOG.iter().find(|entry| entry.name == name)
}

/// Named column of a radial profile table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileVariable {
    pub name: &'static str,
    pub column: usize,
    pub description: &'static str,
}

const fn profile(name: &'static str, column: usize, description: &'static str) -> ProfileVariable {
    ProfileVariable {
        name,
        column,
        description,
    }
}

const PROFILE_CATALOG: [ProfileVariable; 13] = [
    profile("r", 0, "Radial coordinate"),
    profile("t", 1, "Temperature"),
    profile("tmin", 2, "Minimum temperature"),
    profile("tmax", 3, "Maximum temperature"),
    profile("vzabs", 4, "Vertical velocity amplitude"),
    profile("vzmin", 5, "Minimum vertical velocity"),
    profile("vzmax", 6, "Maximum vertical velocity"),
    profile("vhrms", 7, "Horizontal velocity rms"),
    profile("vhmin", 8, "Minimum horizontal velocity"),
    profile("vhmax", 9, "Maximum horizontal velocity"),
    profile("eta", 10, "Viscosity"),
    profile("etamin", 11, "Minimum viscosity"),
    profile("etamax", 12, "Maximum viscosity"),
];

pub fn profile_catalog() -> &'static [ProfileVariable] {
    &PROFILE_CATALOG
}

pub fn lookup_profile_variable(name: &str) -> Option<&'static ProfileVariable> {
    PROFILE_CATALOG.iter().find(|var| var.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_bundled_name_is_cataloged_under_its_kind() {
        for kind in RecordKind::ALL {
            for name in kind.field_names() {
                let entry = lookup_field(name).expect("bundled field missing from catalog");
                assert_eq!(entry.kind, kind, "{name}");
            }
        }
    }

    #[test]
    fn catalog_names_are_unique() {
        let names: HashSet<_> = field_catalog().iter().map(|e| e.name).collect();
        assert_eq!(names.len(), field_catalog().len());
    }

    #[test]
    fn tags_round_trip() {
        for kind in RecordKind::ALL {
            assert_eq!(RecordKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(RecordKind::from_tag("time.dat"), None);
        assert!(RecordKind::VelocityPressure.is_bundle());
        assert!(!RecordKind::Temperature.is_bundle());
    }

    #[test]
    fn profile_columns_are_distinct() {
        let columns: HashSet<_> = profile_catalog().iter().map(|v| v.column).collect();
        assert_eq!(columns.len(), profile_catalog().len());
        assert_eq!(lookup_profile_variable("vhrms").map(|v| v.column), Some(7));
        assert!(lookup_profile_variable("nope").is_none());
    }
}
