use crate::models::filter::{FilterCatalog, FilterGroup};

/// Resolve opaque filter codes to `"<CODE> - <name>"` labels.
///
/// Codes are matched case-insensitively against the employment, age,
/// earnings and education groups in that order. A code no group knows is
/// returned uppercased, so unknown codes still render.
pub fn labels_for<S: AsRef<str>>(codes: &[S], catalog: &FilterCatalog) -> Vec<String> {
    codes
        .iter()
        .map(|code| label_for(code.as_ref(), catalog))
        .collect()
}

pub fn label_for(code: &str, catalog: &FilterCatalog) -> String {
    let code = code.to_uppercase();
    FilterGroup::ALL
        .iter()
        .find_map(|group| {
            catalog
                .options(*group)
                .iter()
                .find(|option| option.code.to_uppercase() == code)
        })
        .map(|option| format!("{} - {}", code, option.name))
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filter::FilterOption;

    fn option(code: &str, name: &str) -> FilterOption {
        FilterOption {
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    fn catalog() -> FilterCatalog {
        FilterCatalog {
            employment_codes: vec![
                option("EMP1", "Retail Trade"),
                option("CNS16", "Health Care and Social Assistance"),
            ],
            age_groups: vec![option("CA01", "29 or younger"), option("DUP", "age duplicate")],
            earnings_brackets: vec![option("CE03", ">$3,333/month"), option("DUP", "earnings")],
            education_levels: vec![option("CD04", "Bachelor's or advanced degree")],
        }
    }

    #[test]
    fn test_lowercase_code_resolves_in_employment_group() {
        assert_eq!(labels_for(&["emp1"], &catalog()), vec!["EMP1 - Retail Trade"]);
    }

    #[test]
    fn test_label_uses_uppercased_code_whatever_the_catalog_spelling() {
        let catalog = FilterCatalog {
            employment_codes: vec![option("emp1", "Retail")],
            ..Default::default()
        };
        assert_eq!(labels_for(&["emp1"], &catalog), vec!["EMP1 - Retail"]);
        assert_eq!(label_for("Emp1", &catalog), "EMP1 - Retail");
    }

    #[test]
    fn test_unknown_code_falls_back_to_uppercase() {
        assert_eq!(labels_for(&["zzz"], &catalog()), vec!["ZZZ"]);
        assert_eq!(labels_for(&["zzz"], &FilterCatalog::default()), vec!["ZZZ"]);
    }

    #[test]
    fn test_first_group_in_priority_order_wins() {
        assert_eq!(label_for("dup", &catalog()), "DUP - age duplicate");
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let codes = vec!["cd04".to_string(), "ca01".to_string(), "cd04".to_string()];
        assert_eq!(
            labels_for(&codes, &catalog()),
            vec![
                "CD04 - Bachelor's or advanced degree",
                "CA01 - 29 or younger",
                "CD04 - Bachelor's or advanced degree",
            ]
        );
    }
}
