//! Ordinal grade tables.
//!
//! Each categorical diamond attribute is ranked by its position in a fixed
//! table, worst grade first. Filters address grades by index into these
//! tables rather than by label.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdinalTable {
    pub name: &'static str,
    labels: &'static [&'static str],
}

pub const COLOR: OrdinalTable = OrdinalTable {
    name: "color",
    labels: &["L", "K", "J", "I", "H", "G", "F", "E", "D"],
};

pub const CLARITY: OrdinalTable = OrdinalTable {
    name: "clarity",
    labels: &["SI2", "SI1", "VS2", "VS1", "VVS2", "VVS1", "IF", "FL"],
};

pub const POLISH: OrdinalTable = OrdinalTable {
    name: "polish",
    labels: &["ID", "EX", "VG", "GD", "FR"],
};

pub const SYMMETRY: OrdinalTable = OrdinalTable {
    name: "symmetry",
    labels: &["ID", "EX", "VG", "GD", "FR"],
};

pub const FLUORESCENCE: OrdinalTable = OrdinalTable {
    name: "fluorescence",
    labels: &["NON", "FNT", "MED", "STG"],
};

const ALL: [OrdinalTable; 5] = [COLOR, CLARITY, POLISH, SYMMETRY, FLUORESCENCE];

impl OrdinalTable {
    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn label(&self, index: usize) -> Option<&'static str> {
        self.labels.get(index).copied()
    }

    /// Position of `label` in the table. Labels are case-sensitive.
    pub fn rank(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| *l == label)
    }

    /// Labels from `min` through `max`, both inclusive.
    ///
    /// Indices past the end are clamped to the last grade. A negative index
    /// or an inverted pair gives an empty slice.
    pub fn slice(&self, min: i64, max: i64) -> &'static [&'static str] {
        if min < 0 || max < 0 {
            return &[];
        }
        let len = self.labels.len() as i64;
        let start = min.min(len);
        let end = max.saturating_add(1).min(len);
        if start >= end {
            return &[];
        }
        &self.labels[start as usize..end as usize]
    }
}

/// Table for a graded attribute name, if the attribute is graded.
pub fn table_for(attribute: &str) -> Option<OrdinalTable> {
    ALL.iter().copied().find(|t| t.name == attribute)
}
