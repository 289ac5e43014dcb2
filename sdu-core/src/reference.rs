//! Static CID (ICD-10) reference table and the dashboard/chart fixtures.
//!
//! Nothing here touches the network. The monthly series, category split and
//! dashboard counters are display fixtures with no relationship to lookups.

use serde::Serialize;

/// One row of the CID reference table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceCodeEntry {
    pub code: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub case_count: u32,
    /// Percentage, e.g. `15.2` for 15.2%.
    pub prevalence_rate: f64,
}

impl ReferenceCodeEntry {
    pub fn prevalence_label(&self) -> String {
        format!("{:.1}%", self.prevalence_rate)
    }

    pub fn case_count_label(&self) -> String {
        group_thousands(u64::from(self.case_count))
    }
}

const CID_TABLE: [ReferenceCodeEntry; 5] = [
    ReferenceCodeEntry {
        code: "I10",
        description: "Hipertensão essencial (primária)",
        category: "Doenças do aparelho circulatório",
        case_count: 1245,
        prevalence_rate: 15.2,
    },
    ReferenceCodeEntry {
        code: "E11",
        description: "Diabetes mellitus não-insulino-dependente",
        category: "Doenças endócrinas, nutricionais e metabólicas",
        case_count: 987,
        prevalence_rate: 12.1,
    },
    ReferenceCodeEntry {
        code: "J44",
        description: "Outras doenças pulmonares obstrutivas crônicas",
        category: "Doenças do aparelho respiratório",
        case_count: 543,
        prevalence_rate: 6.7,
    },
    ReferenceCodeEntry {
        code: "M79",
        description: "Outros transtornos dos tecidos moles",
        category: "Doenças do sistema osteomuscular",
        case_count: 432,
        prevalence_rate: 5.3,
    },
    ReferenceCodeEntry {
        code: "Z51",
        description: "Outros cuidados médicos",
        category: "Fatores que influenciam o estado de saúde",
        case_count: 321,
        prevalence_rate: 3.9,
    },
];

/// All table entries, most prevalent first.
pub fn entries() -> &'static [ReferenceCodeEntry] {
    &CID_TABLE
}

/// Exact, case-insensitive lookup. Blank input is never a match.
pub fn lookup(code: &str) -> Option<&'static ReferenceCodeEntry> {
    let key = code.to_uppercase();
    if key.trim().is_empty() {
        return None;
    }
    CID_TABLE.iter().find(|entry| entry.code == key)
}

/// Comma-separated list of known codes, for "not found" hints.
pub fn known_codes() -> String {
    CID_TABLE
        .iter()
        .map(|e| e.code)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Cases per month (Jan..Jun).
pub const MONTHLY_CASES: [(&str, u64); 6] = [
    ("Jan", 145),
    ("Fev", 167),
    ("Mar", 198),
    ("Abr", 234),
    ("Mai", 189),
    ("Jun", 243),
];

/// A slice of the category distribution chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryShare {
    pub name: &'static str,
    pub percent: u8,
    pub color: (u8, u8, u8),
}

pub const CATEGORY_SHARES: [CategoryShare; 5] = [
    CategoryShare { name: "Circulatório", percent: 35, color: (0x88, 0x84, 0xd8) },
    CategoryShare { name: "Endócrino", percent: 25, color: (0x82, 0xca, 0x9d) },
    CategoryShare { name: "Respiratório", percent: 20, color: (0xff, 0xc6, 0x58) },
    CategoryShare { name: "Osteomuscular", percent: 12, color: (0xff, 0x7c, 0x7c) },
    CategoryShare { name: "Outros", percent: 8, color: (0x8d, 0xd1, 0xe1) },
];

/// A dashboard counter card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStat {
    pub title: &'static str,
    pub value: u64,
    pub description: &'static str,
}

pub const DASHBOARD_STATS: [DashboardStat; 4] = [
    DashboardStat {
        title: "Total records",
        value: 12_547,
        description: "Exams and diagnoses stored",
    },
    DashboardStat {
        title: "Unique patients",
        value: 3_892,
        description: "Patients registered in the system",
    },
    DashboardStat {
        title: "Uploads today",
        value: 47,
        description: "New files sent",
    },
    DashboardStat {
        title: "CIDs looked up",
        value: 156,
        description: "Codes searched this week",
    },
];

/// pt-BR digit grouping: `12547` → `12.547`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let lower = lookup("i10").expect("i10 should resolve");
        let upper = lookup("I10").expect("I10 should resolve");
        assert_eq!(lower, upper);
        assert_eq!(lower.description, "Hipertensão essencial (primária)");
    }

    #[test]
    fn unknown_and_blank_codes() {
        assert!(lookup("Z99").is_none());
        assert!(lookup("").is_none());
        assert!(lookup("   ").is_none());
        assert!(lookup("I1").is_none());
        assert!(lookup("I100").is_none());
    }

    #[test]
    fn table_has_five_entries() {
        assert_eq!(entries().len(), 5);
        assert_eq!(known_codes(), "I10, E11, J44, M79, Z51");
    }

    #[test]
    fn labels() {
        let e = lookup("e11").unwrap();
        assert_eq!(e.prevalence_label(), "12.1%");
        assert_eq!(e.case_count_label(), "987");
        assert_eq!(lookup("I10").unwrap().case_count_label(), "1.245");
    }

    #[test]
    fn grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(12_547), "12.547");
        assert_eq!(group_thousands(1_234_567), "1.234.567");
    }

    #[test]
    fn category_shares_sum_to_100() {
        let total: u32 = CATEGORY_SHARES.iter().map(|s| u32::from(s.percent)).sum();
        assert_eq!(total, 100);
    }

    proptest! {
        #[test]
        fn repeated_lookups_agree(code in "[a-zA-Z][0-9]{2}") {
            let first = lookup(&code).map(|e| e.code);
            let second = lookup(&code.to_lowercase()).map(|e| e.code);
            let third = lookup(&code.to_uppercase()).map(|e| e.code);
            prop_assert_eq!(first, second);
            prop_assert_eq!(second, third);
        }
    }
}
